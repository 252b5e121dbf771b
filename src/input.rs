/// Keyboard handling.
///
/// Instead of acting on each key event individually, the tracker records the
/// frame on which every key was last pressed or repeated. Movement keys count
/// as held while that record is fresh, which lets Space and an arrow key be
/// held together.
///
/// Works on two classes of terminal:
/// * **Keyboard-enhancement capable** (kitty protocol, Ghostty, etc.): proper
///   `Press` / `Repeat` / `Release` events, so keys are dropped on release.
/// * **Classic terminals**: only `Press` events, with OS key-repeat showing up
///   as repeated presses. Keys expire after the hold window, which is shorter
///   than the gap between repeats would ever be while a key is held.

use std::collections::HashMap;

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

/// Hold window length in milliseconds. OS key-repeat runs at 15 Hz or
/// faster, so a held key always refreshes well within this.
const HOLD_WINDOW_MS: u64 = 133;

const LEFT_KEYS: [KeyCode; 3] = [KeyCode::Left, KeyCode::Char('a'), KeyCode::Char('A')];
const RIGHT_KEYS: [KeyCode; 3] = [KeyCode::Right, KeyCode::Char('d'), KeyCode::Char('D')];

/// One-shot actions produced by a key press.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Command {
    Fire,
    Restart,
    Quit,
}

/// Which way the kitty wants to move this tick.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Intent {
    pub left: bool,
    pub right: bool,
}

#[derive(Debug)]
pub struct InputTracker {
    /// Each held key → the frame it was last seen (press or repeat).
    key_frame: HashMap<KeyCode, u64>,
    hold_window: u64,
}

impl InputTracker {
    pub fn new(hold_window: u64) -> Self {
        InputTracker {
            key_frame: HashMap::new(),
            hold_window,
        }
    }

    /// Tracker whose hold window spans the same wall time at any tick rate.
    pub fn for_tick_rate(tick_rate: u32) -> Self {
        let frames = (HOLD_WINDOW_MS * tick_rate as u64).div_ceil(1000);
        InputTracker::new(frames.max(1))
    }

    /// Record a key event seen on `frame` and return the command it triggers,
    /// if any. Commands fire on the initial press only.
    pub fn handle(&mut self, key: &KeyEvent, frame: u64) -> Option<Command> {
        match key.kind {
            // Classic terminals send auto-repeat as further presses; only a
            // press on a key that wasn't already held counts.
            KeyEventKind::Press => {
                let was_held = self.any_held(&[key.code], frame);
                self.key_frame.insert(key.code, frame);
                if was_held {
                    None
                } else {
                    command_for(key)
                }
            }
            // Refresh timestamp so the key stays held
            KeyEventKind::Repeat => {
                self.key_frame.insert(key.code, frame);
                None
            }
            KeyEventKind::Release => {
                self.key_frame.remove(&key.code);
                None
            }
        }
    }

    pub fn intent(&self, frame: u64) -> Intent {
        Intent {
            left: self.any_held(&LEFT_KEYS, frame),
            right: self.any_held(&RIGHT_KEYS, frame),
        }
    }

    /// Returns true if any of `keys` was seen within the hold window.
    fn any_held(&self, keys: &[KeyCode], frame: u64) -> bool {
        keys.iter().any(|key| {
            self.key_frame
                .get(key)
                .map(|&last| frame.saturating_sub(last) <= self.hold_window)
                .unwrap_or(false)
        })
    }
}

fn command_for(key: &KeyEvent) -> Option<Command> {
    match key.code {
        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
            Some(Command::Quit)
        }
        KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => Some(Command::Quit),
        KeyCode::Char('r') | KeyCode::Char('R') => Some(Command::Restart),
        KeyCode::Char(' ') => Some(Command::Fire),
        _ => None,
    }
}
