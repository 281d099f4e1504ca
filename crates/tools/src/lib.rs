//! Developer tooling: read-only views of a running session.
//!
//! # Invariants
//! - Inspectors never mutate the session.

mod inspector;

pub use inspector::{BodyInfo, SessionInspector, SessionSummary};

pub fn crate_info() -> &'static str {
    concat!("boxdodge-tools v", env!("CARGO_PKG_VERSION"))
}
