//! wgpu render backend.
//!
//! Every drawable is the same unit cube, so the whole scene is a single
//! instanced draw: one instance per box carrying its model matrix and color.
//!
//! # Invariants
//! - The backend reads a `SceneMirror`; it never sees the session.
//! - Frame rate and simulation rate are the same; one draw per tick.

mod gpu;
mod mesh;
mod shaders;

pub use gpu::BoxRenderer;
