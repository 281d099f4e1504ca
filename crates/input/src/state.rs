use crate::action::Action;
use std::sync::atomic::{AtomicBool, Ordering};

/// Shared "currently pressed" flag for every action.
///
/// Key handlers write individual flags; the tick loop takes one
/// [`InputSnapshot`] per frame. One atomic per action means a writer on
/// another OS thread never needs a lock, and a frame never sees a torn read
/// of a single flag.
#[derive(Debug, Default)]
pub struct InputState {
    pressed: [AtomicBool; Action::COUNT],
}

impl InputState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&self, action: Action, pressed: bool) {
        self.pressed[action.index()].store(pressed, Ordering::Release);
    }

    pub fn press(&self, action: Action) {
        self.set(action, true);
    }

    pub fn release(&self, action: Action) {
        self.set(action, false);
    }

    pub fn is_pressed(&self, action: Action) -> bool {
        self.pressed[action.index()].load(Ordering::Acquire)
    }

    /// Release every action (e.g. when the window loses focus).
    pub fn clear(&self) {
        for flag in &self.pressed {
            flag.store(false, Ordering::Release);
        }
    }

    /// Capture all flags at once for a single tick.
    pub fn snapshot(&self) -> InputSnapshot {
        let mut snap = InputSnapshot::default();
        for action in Action::ALL {
            if self.is_pressed(action) {
                snap.set(action, true);
            }
        }
        snap
    }
}

/// Immutable per-frame view of the input state, packed into a bitfield.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct InputSnapshot {
    bits: u16,
}

impl InputSnapshot {
    pub const fn empty() -> Self {
        Self { bits: 0 }
    }

    /// Snapshot with exactly the given actions held.
    pub fn with(actions: &[Action]) -> Self {
        let mut snap = Self::empty();
        for &a in actions {
            snap.set(a, true);
        }
        snap
    }

    #[inline]
    pub const fn is_pressed(&self, action: Action) -> bool {
        self.bits & (1 << action.index()) != 0
    }

    #[inline]
    pub fn set(&mut self, action: Action, pressed: bool) {
        let bit = 1 << action.index();
        if pressed {
            self.bits |= bit;
        } else {
            self.bits &= !bit;
        }
    }

    pub fn pressed(&self) -> impl Iterator<Item = Action> + '_ {
        Action::ALL.into_iter().filter(|a| self.is_pressed(*a))
    }
}
