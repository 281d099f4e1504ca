use serde::{Deserialize, Serialize};

/// Session lifecycle.
///
/// `Idle -> Running -> {Paused <-> Running} -> GameOver`, and any of
/// Running/Paused/GameOver back to Idle through a reset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SessionState {
    #[default]
    Idle,
    Running,
    Paused,
    GameOver,
}

impl std::fmt::Display for SessionState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Idle => "idle",
            Self::Running => "running",
            Self::Paused => "paused",
            Self::GameOver => "game over",
        };
        f.write_str(name)
    }
}

/// Notification for the UI layer. The session only writes these; it never
/// reads menu state back.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum UiSignal {
    GameOver,
    Pause,
    Resume,
    Quit,
}

impl UiSignal {
    pub fn deliver(self, sink: &mut dyn UiSink) {
        match self {
            UiSignal::GameOver => sink.on_game_over(),
            UiSignal::Pause => sink.on_pause(),
            UiSignal::Resume => sink.on_resume(),
            UiSignal::Quit => sink.on_quit(),
        }
    }
}

/// UI collaborator: toggles menus in response to lifecycle signals.
pub trait UiSink {
    fn on_game_over(&mut self) {}
    fn on_pause(&mut self) {}
    fn on_resume(&mut self) {}
    fn on_quit(&mut self) {}
}
