//! Shared types used by the simulation kernel and every collaborator crate.

pub mod types;

pub use types::{EntityId, EntityKind, Transform};
