//! Scripted host key events.
//!
//! One event per line:
//!
//! ```text
//! down <key> <physical> [modifiers]
//! up <key> <physical> [modifiers]
//! tick
//! ```
//!
//! `physical` is decimal, `0x`-hex or `$`-hex. Modifiers are joined with `+`
//! (`lctrl+num`). Blank lines and `#` comments are skipped; `#<n>` as a key
//! name is the raw host symbol `n`.

use std::ops::ControlFlow;
use std::time::Instant;

use anyhow::{Context, bail};
use crossbeam_channel::{Receiver, select};

use crate::config::KeymapConfig;
use crate::keymap::parsing::parse_modifiers;
use crate::keymap::{KeyAction, KeyMod, KeySink, KeySymbol, Keymap, PhysicalScanCode, ShortcutLatch};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HostEvent {
    KeyDown {
        symbol: KeySymbol,
        physical: PhysicalScanCode,
        modifiers: KeyMod,
    },
    KeyUp {
        symbol: KeySymbol,
        physical: PhysicalScanCode,
        modifiers: KeyMod,
    },
    /// End of an emulated frame.
    Tick,
}

fn parse_physical(text: &str) -> anyhow::Result<PhysicalScanCode> {
    let parsed = if let Some(hex) = text.strip_prefix("0x").or_else(|| text.strip_prefix('$')) {
        u32::from_str_radix(hex, 16)
    } else {
        text.parse::<u32>()
    };
    parsed.with_context(|| format!("invalid scancode '{}'", text))
}

/// `#12` names a raw key symbol; any other `#` token starts a comment.
fn is_comment(token: &str) -> bool {
    token
        .strip_prefix('#')
        .is_some_and(|rest| rest.is_empty() || !rest.chars().all(|c| c.is_ascii_digit()))
}

pub fn parse_event_line(line: &str) -> anyhow::Result<Option<HostEvent>> {
    let mut parts = line.split_whitespace().take_while(|token| !is_comment(token));
    let Some(kind) = parts.next() else {
        return Ok(None);
    };

    let event = match kind.to_lowercase().as_str() {
        "tick" => HostEvent::Tick,
        verb @ ("down" | "up") => {
            let symbol: KeySymbol = parts.next().context("missing key name")?.parse()?;
            let physical = parse_physical(parts.next().context("missing scancode")?)?;
            let modifiers = parse_modifiers(parts.next().unwrap_or(""))?;
            if verb == "down" {
                HostEvent::KeyDown {
                    symbol,
                    physical,
                    modifiers,
                }
            } else {
                HostEvent::KeyUp {
                    symbol,
                    physical,
                    modifiers,
                }
            }
        }
        other => bail!("unknown event '{}'", other),
    };

    if let Some(extra) = parts.next() {
        bail!("unexpected trailing '{}'", extra);
    }

    Ok(Some(event))
}

pub fn parse_script(text: &str) -> anyhow::Result<Vec<HostEvent>> {
    let mut events = Vec::new();
    for (index, line) in text.lines().enumerate() {
        if let Some(event) =
            parse_event_line(line).with_context(|| format!("line {}", index + 1))?
        {
            events.push(event);
        }
    }
    Ok(events)
}

/// Drives a [`Keymap`] the way a host front end would.
#[derive(Debug, Clone, Default)]
pub struct Replay {
    keymap: Keymap,
    modifiers: KeyMod,
}

impl Replay {
    pub fn new(config: &KeymapConfig) -> Self {
        Self {
            keymap: Keymap::new(config),
            modifiers: KeyMod::empty(),
        }
    }

    pub fn keymap(&self) -> &Keymap {
        &self.keymap
    }

    /// Feeds one event. Ticks run the held-key housekeeping with the
    /// modifiers of the most recent key event.
    pub fn feed<S: KeySink + ?Sized>(&mut self, event: HostEvent, sink: &mut S) {
        match event {
            HostEvent::KeyDown {
                symbol,
                physical,
                modifiers,
            } => {
                self.modifiers = modifiers;
                self.keymap.key_down(symbol, physical, modifiers, sink);
            }
            HostEvent::KeyUp {
                symbol,
                physical,
                modifiers,
            } => {
                self.modifiers = modifiers;
                self.keymap.key_up(symbol, physical, modifiers, sink);
            }
            HostEvent::Tick => self.keymap.debounce_all_keys(self.modifiers, sink),
        }
    }

    /// Takes the pending shortcut, as the front end does at frame start.
    pub fn poll_shortcut(&mut self) -> Option<ShortcutLatch> {
        self.keymap.shortcut_mut().take()
    }

    /// Start-of-frame work: held-key housekeeping, then the latched shortcut.
    pub fn end_frame<S: KeySink + ?Sized>(&mut self, sink: &mut S) -> Option<ShortcutLatch> {
        self.feed(HostEvent::Tick, sink);
        self.poll_shortcut()
    }

    /// Feeds `events` and runs a frame on every `ticker` tick, however fast
    /// events arrive. A `Tick` event runs an extra frame.
    ///
    /// `report` sees the actions of each step and, after a frame, the
    /// shortcut it polled. Returning `Break` stops the loop. A last frame
    /// runs when `events` disconnects.
    pub fn run_frames<F>(
        &mut self,
        events: &Receiver<HostEvent>,
        ticker: &Receiver<Instant>,
        mut report: F,
    ) where
        F: FnMut(&[KeyAction], Option<ShortcutLatch>) -> ControlFlow<()>,
    {
        let mut actions: Vec<KeyAction> = Vec::new();

        loop {
            let flow = select! {
                recv(events) -> event => match event {
                    Ok(HostEvent::Tick) => {
                        let latch = self.end_frame(&mut actions);
                        report(&actions, latch)
                    }
                    Ok(event) => {
                        self.feed(event, &mut actions);
                        report(&actions, None)
                    }
                    Err(_) => {
                        let latch = self.end_frame(&mut actions);
                        let _ = report(&actions, latch);
                        ControlFlow::Break(())
                    }
                },
                recv(ticker) -> _ => {
                    let latch = self.end_frame(&mut actions);
                    report(&actions, latch)
                }
            };

            if flow.is_break() {
                break;
            }
            actions.clear();
        }
    }

    /// Runs a whole script and returns every action sent to the key matrix.
    pub fn run_script(&mut self, text: &str) -> anyhow::Result<Vec<KeyAction>> {
        let mut actions = Vec::new();
        for event in parse_script(text)? {
            self.feed(event, &mut actions);
        }
        Ok(actions)
    }
}
