//! Input: logical actions mapped from platform key events.
//!
//! # Invariants
//! - The simulation consumes actions, never raw key events.
//! - Key state has a single writer per action; the tick reads one snapshot per frame.

pub mod action;
pub mod bindings;
pub mod state;

pub use action::{Action, ParseActionError};
pub use bindings::KeyBindings;
pub use state::{InputSnapshot, InputState};
