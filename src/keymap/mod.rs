//! Host key event to target scancode remapping.

pub mod handlers;
pub mod parsing;
pub mod shortcut;
pub mod table;
pub mod types;

use std::collections::{HashMap, HashSet};

use tracing::{debug, info, warn};

use crate::config::KeymapConfig;

pub use shortcut::{ShortcutAction, ShortcutLatch};
pub use types::*;

/// All remapping state of one emulated machine.
///
/// The offset is detected at most once per lifetime; [`Keymap::reset`]
/// starts a new lifetime when the machine is re-initialized.
#[derive(Debug, Clone)]
pub struct Keymap {
    scancode_offset: Option<i32>,
    fallback_offset: i32,
    disable_key_repeat: bool,
    scancode_cache: HashMap<KeySymbol, PhysicalScanCode>,
    pub(crate) key_states: HashMap<KeySymbol, bool>,
    /// Held keys whose press went to the shortcut latch instead of the sink.
    pub(crate) latched: HashSet<KeySymbol>,
    pub(crate) shortcut: ShortcutLatch,
}

impl Default for Keymap {
    fn default() -> Self {
        Self::new(&KeymapConfig::default())
    }
}

impl Keymap {
    pub fn new(config: &KeymapConfig) -> Self {
        Self {
            scancode_offset: None,
            fallback_offset: config.fallback_scancode_offset,
            disable_key_repeat: config.disable_key_repeat,
            scancode_cache: HashMap::new(),
            key_states: HashMap::new(),
            latched: HashSet::new(),
            shortcut: ShortcutLatch::default(),
        }
    }

    /// Forgets everything learned from host events.
    pub fn reset(&mut self) {
        self.scancode_offset = None;
        self.scancode_cache.clear();
        self.key_states.clear();
        self.latched.clear();
        self.shortcut = ShortcutLatch::default();
    }

    /// Detected host scancode offset, `None` while still unknown.
    #[inline]
    pub fn scancode_offset(&self) -> Option<i32> {
        self.scancode_offset
    }

    #[inline]
    pub fn disable_key_repeat(&self) -> bool {
        self.disable_key_repeat
    }

    #[inline]
    pub fn is_pressed(&self, symbol: KeySymbol) -> bool {
        self.key_states.get(&symbol).copied().unwrap_or(false)
    }

    #[inline]
    pub fn shortcut(&self) -> &ShortcutLatch {
        &self.shortcut
    }

    #[inline]
    pub fn shortcut_mut(&mut self) -> &mut ShortcutLatch {
        &mut self.shortcut
    }

    /// Stores a valid physical scancode for `symbol`, or recalls the last one
    /// seen when the host reports 0. Returns 0 when nothing is known.
    pub fn record_or_recall(
        &mut self,
        symbol: KeySymbol,
        physical: PhysicalScanCode,
    ) -> PhysicalScanCode {
        if physical != 0 {
            self.scancode_cache.insert(symbol, physical);
            return physical;
        }

        let recalled = self.scancode_cache.get(&symbol).copied().unwrap_or(0);
        if recalled == 0 {
            warn!("Key scancode is 0 for '{}'", symbol);
        }
        recalled
    }

    /// Translates a host key to a target scancode.
    ///
    /// Keypad digits follow the numlock bit of `modifiers`. Keys without a
    /// fixed code are shifted by the detected host offset.
    pub fn remap(
        &mut self,
        symbol: KeySymbol,
        physical: PhysicalScanCode,
        modifiers: KeyMod,
    ) -> Option<ScanCode> {
        if let Some(code) = table::resolve_keypad(symbol, modifiers.num_lock()) {
            return Some(code);
        }

        let physical = self.record_or_recall(symbol, physical);
        debug!("Keypress: '{}' scancode is {}", symbol, physical);

        if self.scancode_offset.is_none() {
            self.detect_offset(symbol, physical);
        }

        table::lookup(symbol).or_else(|| self.translate_by_offset(symbol, physical))
    }

    fn detect_offset(&mut self, symbol: KeySymbol, physical: PhysicalScanCode) {
        match table::infer_offset(symbol, physical) {
            Some(offset) if offset >= 0 => {
                info!(
                    "Detected scancode offset = {} (key: '{}' with scancode ${:02x})",
                    offset, symbol, physical
                );
                self.scancode_offset = Some(offset);
            }
            Some(offset) => {
                debug!(
                    "Ignoring negative scancode offset {} from key '{}'",
                    offset, symbol
                );
            }
            None => {}
        }
    }

    fn translate_by_offset(
        &self,
        symbol: KeySymbol,
        physical: PhysicalScanCode,
    ) -> Option<ScanCode> {
        let offset = match self.scancode_offset {
            Some(offset) => offset,
            None => {
                warn!(
                    "Unknown key: scancode = {} (${:02x}), keycode = '{}'",
                    physical, physical, symbol
                );
                warn!("trying offset {} (the most likely!)", self.fallback_offset);
                self.fallback_offset
            }
        };

        let code = ScanCode::from_offset(physical, offset);
        if code.is_none() {
            warn!(
                "Key '{}' with scancode {} is outside the target range at offset {}",
                symbol, physical, offset
            );
        }
        code
    }
}
