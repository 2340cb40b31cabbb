//! Translation of host keyboard events into Atari ST scancodes.
//!
//! [`keymap::Keymap`] holds all per-machine remapping state and feeds a
//! [`keymap::KeySink`]. The `replay` module drives it from a text script.

pub mod config;
pub mod keymap;
pub mod replay;

pub use config::KeymapConfig;
pub use keymap::{KeyAction, KeyMod, KeySink, KeySymbol, Keymap, ScanCode};
