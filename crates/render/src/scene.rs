use boxdodge_common::{EntityId, EntityKind, Transform};
use boxdodge_kernel::{Session, SessionEvent};
use glam::Mat4;
use std::collections::BTreeMap;

/// Linear RGB for each entity kind.
pub fn kind_color(kind: EntityKind) -> [f32; 3] {
    match kind {
        // 0x1e90ff
        EntityKind::Player => [30.0 / 255.0, 144.0 / 255.0, 1.0],
        EntityKind::Ground => [1.0, 1.0, 1.0],
        EntityKind::Obstacle => [1.0, 0.0, 0.0],
    }
}

/// One visual box: a unit cube placed by `transform`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Drawable {
    pub kind: EntityKind,
    pub transform: Transform,
    pub color: [f32; 3],
}

impl Drawable {
    pub fn new(kind: EntityKind, transform: Transform) -> Self {
        Self {
            kind,
            transform,
            color: kind_color(kind),
        }
    }

    pub fn model_matrix(&self) -> Mat4 {
        let t = &self.transform;
        Mat4::from_scale_rotation_translation(t.scale, t.rotation, t.position)
    }
}

/// Renderer-side copy of the session's scene.
///
/// Membership changes only through [`SceneMirror::apply`]; [`SceneMirror::sync`]
/// refreshes transforms of entities already present.
#[derive(Debug, Default)]
pub struct SceneMirror {
    drawables: BTreeMap<EntityId, Drawable>,
}

impl SceneMirror {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add and release drawables for the given events, in order.
    pub fn apply(&mut self, events: &[SessionEvent]) {
        for event in events {
            match *event {
                SessionEvent::Spawned {
                    id,
                    kind,
                    transform,
                } => {
                    if self
                        .drawables
                        .insert(id, Drawable::new(kind, transform))
                        .is_some()
                    {
                        tracing::warn!("{kind} {} spawned twice; replaced", id.short());
                    }
                }
                SessionEvent::Despawned { id, kind } => {
                    if self.drawables.remove(&id).is_none() {
                        tracing::warn!("release of unknown {kind} {}", id.short());
                    }
                }
                SessionEvent::StateChanged { .. } => {}
            }
        }
    }

    /// Copy current transforms out of `session`.
    pub fn sync(&mut self, session: &Session) {
        for body in session.bodies() {
            if let Some(d) = self.drawables.get_mut(&body.id()) {
                d.transform = body.transform();
            }
        }
    }

    /// Drain the session's pending events, then sync.
    pub fn update(&mut self, session: &mut Session) {
        let events = session.drain_events();
        self.apply(&events);
        self.sync(session);
    }

    pub fn get(&self, id: EntityId) -> Option<&Drawable> {
        self.drawables.get(&id)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&EntityId, &Drawable)> {
        self.drawables.iter()
    }

    pub fn len(&self) -> usize {
        self.drawables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.drawables.is_empty()
    }

    pub fn count_of(&self, kind: EntityKind) -> usize {
        self.drawables.values().filter(|d| d.kind == kind).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use boxdodge_input::InputSnapshot;
    use boxdodge_kernel::SessionConfig;
    use glam::Vec3;

    #[test]
    fn new_session_populates_player_and_ground() {
        let mut session = Session::new(SessionConfig::default()).unwrap();
        let mut scene = SceneMirror::new();
        scene.update(&mut session);
        assert_eq!(scene.len(), 2);
        let player = scene.get(session.player().id()).unwrap();
        assert_eq!(player.color, kind_color(EntityKind::Player));
        let ground = scene.get(session.ground().id()).unwrap();
        assert_eq!(ground.transform.scale, Vec3::new(75.0, 0.1, 75.0));
    }

    #[test]
    fn spawn_and_cull_track_obstacles() {
        let mut session = Session::new(SessionConfig::default()).unwrap();
        session.start().unwrap();
        let mut scene = SceneMirror::new();
        session.tick(&InputSnapshot::empty());
        scene.update(&mut session);
        assert_eq!(scene.count_of(EntityKind::Obstacle), 1);

        session.quit();
        scene.update(&mut session);
        assert!(scene.is_empty());
    }

    #[test]
    fn sync_follows_moving_player() {
        let mut session = Session::new(SessionConfig::default()).unwrap();
        session.start().unwrap();
        let mut scene = SceneMirror::new();
        scene.update(&mut session);
        for _ in 0..10 {
            session.tick(&InputSnapshot::empty());
        }
        scene.update(&mut session);
        let id = session.player().id();
        assert_eq!(
            scene.get(id).unwrap().transform.position,
            session.player().position
        );
    }

    #[test]
    fn unknown_release_is_ignored() {
        let mut scene = SceneMirror::new();
        scene.apply(&[SessionEvent::Despawned {
            id: EntityId::new(),
            kind: EntityKind::Obstacle,
        }]);
        assert!(scene.is_empty());
    }

    #[test]
    fn model_matrix_scales_unit_cube() {
        let d = Drawable::new(
            EntityKind::Ground,
            Transform {
                position: Vec3::new(0.0, -2.0, 0.0),
                scale: Vec3::new(75.0, 0.1, 75.0),
                ..Transform::default()
            },
        );
        let corner = d.model_matrix().transform_point3(Vec3::splat(0.5));
        assert!((corner - Vec3::new(37.5, -1.95, 37.5)).length() < 1e-4);
    }
}
