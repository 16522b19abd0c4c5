//! Hardware boundary: clock, idle, display sink and buttons.

use std::ops::{BitOr, BitOrAssign};

use crate::error::Result;

/// A set of buttons as a bitmask.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Buttons(pub u8);

impl Buttons {
    pub const NONE: Buttons = Buttons(0);
    pub const B: Buttons = Buttons(1 << 2);
    pub const A: Buttons = Buttons(1 << 3);
    pub const DOWN: Buttons = Buttons(1 << 4);
    pub const LEFT: Buttons = Buttons(1 << 5);
    pub const RIGHT: Buttons = Buttons(1 << 6);
    pub const UP: Buttons = Buttons(1 << 7);

    /// Returns the raw mask.
    pub fn bits(self) -> u8 {
        self.0
    }

    /// Returns true if every button in `other` is in `self`.
    pub fn contains(self, other: Buttons) -> bool {
        self.0 & other.0 == other.0
    }

    /// Returns true if no button in `other` is in `self`.
    pub fn is_disjoint(self, other: Buttons) -> bool {
        self.0 & other.0 == 0
    }

    /// Parses a button name as used in key bindings.
    pub fn from_name(name: &str) -> Option<Buttons> {
        match name.to_ascii_lowercase().as_str() {
            "left" => Some(Buttons::LEFT),
            "right" => Some(Buttons::RIGHT),
            "up" => Some(Buttons::UP),
            "down" => Some(Buttons::DOWN),
            "a" => Some(Buttons::A),
            "b" => Some(Buttons::B),
            _ => None,
        }
    }
}

impl BitOr for Buttons {
    type Output = Buttons;

    fn bitor(self, rhs: Buttons) -> Buttons {
        Buttons(self.0 | rhs.0)
    }
}

impl BitOrAssign for Buttons {
    fn bitor_assign(&mut self, rhs: Buttons) {
        self.0 |= rhs.0;
    }
}

/// Services the rendering core needs from its host.
///
/// `now_millis` must be monotonic. `idle` must return; it is the only place
/// the frame loop suspends.
pub trait Platform {
    /// Milliseconds since an arbitrary fixed origin.
    fn now_millis(&self) -> u64;

    /// Yields for a short, implementation-defined interval.
    fn idle(&mut self);

    /// Commits a packed framebuffer to the display.
    fn present(&mut self, buffer: &[u8]) -> Result<()>;

    /// Currently held buttons.
    fn button_state(&self) -> Buttons;
}
