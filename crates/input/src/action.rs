use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// A logical action the simulation reacts to.
///
/// Platform layers translate key events into these; the session only ever
/// asks whether an action is currently held.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Action {
    Forward,
    Back,
    Left,
    Right,
    Jump,
    Pause,
    /// Turn the heading (and follow camera) counter-clockwise.
    RotateLeft,
    /// Turn the heading (and follow camera) clockwise.
    RotateRight,
}

impl Action {
    pub const COUNT: usize = 8;

    pub const ALL: [Action; Self::COUNT] = [
        Action::Forward,
        Action::Back,
        Action::Left,
        Action::Right,
        Action::Jump,
        Action::Pause,
        Action::RotateLeft,
        Action::RotateRight,
    ];

    /// Dense index used by the per-action storage.
    pub const fn index(self) -> usize {
        self as usize
    }

    pub const fn name(self) -> &'static str {
        match self {
            Action::Forward => "forward",
            Action::Back => "back",
            Action::Left => "left",
            Action::Right => "right",
            Action::Jump => "jump",
            Action::Pause => "pause",
            Action::RotateLeft => "rotate-left",
            Action::RotateRight => "rotate-right",
        }
    }
}

impl std::fmt::Display for Action {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown action `{0}`")]
pub struct ParseActionError(pub String);

impl FromStr for Action {
    type Err = ParseActionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Action::ALL
            .into_iter()
            .find(|a| a.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| ParseActionError(s.to_string()))
    }
}
