//! Game kernel: authoritative session state, box physics and tick scheduling.
//!
//! # Invariants
//! - A tick is a pure function of the session state and one input snapshot
//!   (spawn positions come from a seeded generator).
//! - Bounds are recomputed from position before any collision test reads them.
//! - No tick runs after the loop is cancelled (pause, quit, game over).
//! - Game over is entered at most once per run.

pub mod body;
pub mod camera;
pub mod collision;
pub mod config;
pub mod controls;
pub mod error;
pub mod events;
pub mod lifecycle;
pub mod rng;
pub mod schedule;
pub mod session;

pub use body::{Axis, BodyDesc, Bounds, Dimensions, GroundResponse, MotionMode, RigidBox};
pub use camera::FollowCamera;
pub use collision::intersects;
pub use config::{CameraConfig, ControlScheme, ObstacleConfig, SessionConfig, SpawnConfig};
pub use error::{ConfigError, LifecycleError};
pub use events::SessionEvent;
pub use lifecycle::{SessionState, UiSignal, UiSink};
pub use rng::SpawnRng;
pub use schedule::{FrameScheduler, FrameToken};
pub use session::Session;
