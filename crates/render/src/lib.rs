//! Rendering adapter: mirrors session entities into drawables.
//!
//! # Invariants
//! - Renderers never mutate session state; they read a [`SceneMirror`].
//! - Drawables are added and released only through drained session events.
//! - Transforms are copied from the session once per frame by `sync`.

mod renderer;
mod scene;

pub use renderer::{DebugTextRenderer, Lighting, RenderView, Renderer};
pub use scene::{Drawable, SceneMirror, kind_color};

pub fn crate_info() -> &'static str {
    concat!("boxdodge-render v", env!("CARGO_PKG_VERSION"))
}
