use crate::action::Action;
use crate::state::InputState;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Maps platform key-code names (`KeyW`, `Space`, `ArrowLeft`, ...) to actions.
///
/// Codes follow the physical-key naming used by browsers and winit, so a
/// platform layer can forward the code name verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyBindings {
    keys: BTreeMap<String, Action>,
}

impl Default for KeyBindings {
    fn default() -> Self {
        let mut bindings = Self::empty();
        bindings.bind("KeyW", Action::Forward);
        bindings.bind("KeyS", Action::Back);
        bindings.bind("KeyA", Action::Left);
        bindings.bind("KeyD", Action::Right);
        bindings.bind("Space", Action::Jump);
        bindings.bind("Escape", Action::Pause);
        bindings.bind("ArrowLeft", Action::RotateLeft);
        bindings.bind("ArrowRight", Action::RotateRight);
        bindings
    }
}

impl KeyBindings {
    pub fn empty() -> Self {
        Self {
            keys: BTreeMap::new(),
        }
    }

    /// Bind a key code to an action, replacing any previous binding for that code.
    pub fn bind(&mut self, code: &str, action: Action) {
        if let Some(old) = self.keys.insert(code.to_string(), action) {
            if old != action {
                tracing::debug!("rebound {code}: {old} -> {action}");
            }
        }
    }

    pub fn unbind(&mut self, code: &str) -> Option<Action> {
        self.keys.remove(code)
    }

    pub fn action_for(&self, code: &str) -> Option<Action> {
        self.keys.get(code).copied()
    }

    /// All codes bound to `action`.
    pub fn codes_for(&self, action: Action) -> Vec<&str> {
        self.keys
            .iter()
            .filter(|(_, a)| **a == action)
            .map(|(code, _)| code.as_str())
            .collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, Action)> {
        self.keys.iter().map(|(code, a)| (code.as_str(), *a))
    }

    /// Forward a key event into the shared state. Returns the action it
    /// touched, or `None` for unbound keys.
    pub fn handle_key(&self, state: &InputState, code: &str, pressed: bool) -> Option<Action> {
        let action = self.action_for(code)?;
        state.set(action, pressed);
        Some(action)
    }
}
