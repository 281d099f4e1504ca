use crate::lifecycle::SessionState;
use boxdodge_common::{EntityId, EntityKind, Transform};
use serde::{Deserialize, Serialize};

/// Record of a session change a collaborator may need to mirror.
///
/// Renderers drain these to add and release visuals; transforms of live
/// entities are read directly each frame and are not logged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum SessionEvent {
    /// Entity entered the scene with the given transform (scale = dimensions).
    Spawned {
        id: EntityId,
        kind: EntityKind,
        transform: Transform,
    },
    /// Entity left the scene; its visual should be released.
    Despawned { id: EntityId, kind: EntityKind },
    StateChanged { from: SessionState, to: SessionState },
}

impl SessionEvent {
    pub fn entity(&self) -> Option<EntityId> {
        match self {
            Self::Spawned { id, .. } | Self::Despawned { id, .. } => Some(*id),
            Self::StateChanged { .. } => None,
        }
    }
}
