use boxdodge_common::{EntityId, EntityKind};
use boxdodge_kernel::{RigidBox, Session, SessionState};
use glam::Vec3;

/// Read-only queries against a session, for the HUD, the CLI and debugging.
pub struct SessionInspector;

impl SessionInspector {
    pub fn summary(session: &Session) -> SessionSummary {
        let player = session.player();
        SessionSummary {
            state: session.state(),
            frame: session.frame(),
            spawn_interval: session.spawn_interval(),
            obstacle_count: session.obstacles().len(),
            faulted: session.bodies().filter(|b| b.is_faulted()).count(),
            pending_events: session.events().len(),
            player_position: player.position,
            player_velocity: player.velocity,
            heading: session.heading(),
            grounded: Self::is_grounded(session),
        }
    }

    /// Player bottom at or below the ground top, the same test that gates a
    /// jump.
    pub fn is_grounded(session: &Session) -> bool {
        session.player().bounds().bottom <= session.ground().bounds().top
    }

    pub fn inspect(session: &Session, id: EntityId) -> Option<BodyInfo> {
        session.bodies().find(|b| b.id() == id).map(BodyInfo::from)
    }

    /// Obstacles ordered by horizontal distance to the player, closest first.
    pub fn nearest_obstacles(session: &Session, limit: usize) -> Vec<(BodyInfo, f32)> {
        let p = session.player().position;
        let mut list: Vec<_> = session
            .obstacles()
            .iter()
            .map(|o| {
                let d = (o.position - p).with_y(0.0).length();
                (BodyInfo::from(o), d)
            })
            .collect();
        list.sort_by(|a, b| a.1.total_cmp(&b.1));
        list.truncate(limit);
        list
    }
}

/// Snapshot of the session for display.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionSummary {
    pub state: SessionState,
    pub frame: u64,
    pub spawn_interval: u64,
    pub obstacle_count: usize,
    pub faulted: usize,
    pub pending_events: usize,
    pub player_position: Vec3,
    pub player_velocity: Vec3,
    pub heading: f32,
    pub grounded: bool,
}

impl std::fmt::Display for SessionSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let p = self.player_position;
        write!(
            f,
            "Session: {} frame={} interval={} obstacles={} player=({:.2}, {:.2}, {:.2}){}",
            self.state,
            self.frame,
            self.spawn_interval,
            self.obstacle_count,
            p.x,
            p.y,
            p.z,
            if self.grounded { " grounded" } else { "" }
        )?;
        if self.faulted > 0 {
            write!(f, " faulted={}", self.faulted)?;
        }
        Ok(())
    }
}

/// One box, as seen by the inspector.
#[derive(Debug, Clone, PartialEq)]
pub struct BodyInfo {
    pub id: EntityId,
    pub kind: EntityKind,
    pub position: Vec3,
    pub velocity: Vec3,
    pub size: Vec3,
    pub faulted: bool,
}

impl From<&RigidBox> for BodyInfo {
    fn from(body: &RigidBox) -> Self {
        Self {
            id: body.id(),
            kind: body.kind(),
            position: body.position,
            velocity: body.velocity,
            size: body.dimensions().as_vec3(),
            faulted: body.is_faulted(),
        }
    }
}

impl std::fmt::Display for BodyInfo {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} [{}] pos=({:.2}, {:.2}, {:.2}) vel=({:.3}, {:.3}, {:.3})",
            self.kind,
            self.id.short(),
            self.position.x,
            self.position.y,
            self.position.z,
            self.velocity.x,
            self.velocity.y,
            self.velocity.z,
        )?;
        if self.faulted {
            f.write_str(" FAULTED")?;
        }
        Ok(())
    }
}
