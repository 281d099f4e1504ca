use crate::collision::intersects;
use crate::error::{ConfigError, finite, non_negative, positive};
use boxdodge_common::{EntityId, EntityKind, Transform};
use glam::{Quat, Vec3};
use serde::{Deserialize, Serialize};

/// Default downward acceleration per tick.
pub const DEFAULT_GRAVITY: f32 = -0.005;

/// Box extents. Immutable once a box is created.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Dimensions {
    pub width: f32,
    pub height: f32,
    pub depth: f32,
}

impl Dimensions {
    pub const fn new(width: f32, height: f32, depth: f32) -> Self {
        Self {
            width,
            height,
            depth,
        }
    }

    pub const fn cube(side: f32) -> Self {
        Self::new(side, side, side)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        positive("width", self.width)?;
        positive("height", self.height)?;
        positive("depth", self.depth)?;
        Ok(())
    }

    pub fn as_vec3(&self) -> Vec3 {
        Vec3::new(self.width, self.height, self.depth)
    }
}

/// The six face coordinates of a box, derived from position and dimensions.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Bounds {
    pub bottom: f32,
    pub top: f32,
    pub left: f32,
    pub right: f32,
    pub front: f32,
    pub back: f32,
}

impl Bounds {
    pub fn from_center(center: Vec3, dims: Dimensions) -> Self {
        Self {
            bottom: center.y - dims.height / 2.0,
            top: center.y + dims.height / 2.0,
            left: center.x - dims.width / 2.0,
            right: center.x + dims.width / 2.0,
            front: center.z - dims.depth / 2.0,
            back: center.z + dims.depth / 2.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Axis {
    X,
    Y,
    Z,
}

/// How a box updates its own velocity each step. Exactly one per box.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "kebab-case")]
pub enum MotionMode {
    /// Velocity is owned by an external controller.
    #[default]
    Direct,
    /// Horizontal velocity follows a fixed heading at a speed that grows by
    /// `ramp` every step: `x = sin(angle) * speed`, `z = cos(angle) * speed`.
    Heading { angle: f32, speed: f32, ramp: f32 },
    /// One velocity component grows by `increment` every step.
    Creep { axis: Axis, increment: f32 },
}

impl MotionMode {
    fn validate(&self) -> Result<(), ConfigError> {
        match *self {
            MotionMode::Direct => Ok(()),
            MotionMode::Heading { angle, speed, ramp } => {
                finite("heading angle", angle)?;
                finite("heading speed", speed)?;
                finite("heading ramp", ramp)?;
                Ok(())
            }
            MotionMode::Creep { increment, .. } => finite("creep increment", increment).map(|_| ()),
        }
    }
}

/// Bounce behavior when a box lands on the ground.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GroundResponse {
    /// Fraction of vertical speed kept (and inverted) on landing.
    pub restitution: f32,
    /// Post-bounce speeds below this are snapped to zero.
    pub rest_threshold: f32,
}

impl Default for GroundResponse {
    fn default() -> Self {
        Self {
            restitution: 0.5,
            rest_threshold: 0.02,
        }
    }
}

/// Everything needed to create a [`RigidBox`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BodyDesc {
    pub dimensions: Dimensions,
    pub position: Vec3,
    pub velocity: Vec3,
    pub gravity: f32,
    pub motion: MotionMode,
    pub ground_response: GroundResponse,
}

impl Default for BodyDesc {
    fn default() -> Self {
        Self {
            dimensions: Dimensions::cube(1.0),
            position: Vec3::ZERO,
            velocity: Vec3::ZERO,
            gravity: DEFAULT_GRAVITY,
            motion: MotionMode::Direct,
            ground_response: GroundResponse::default(),
        }
    }
}

impl BodyDesc {
    pub fn new(dimensions: Dimensions) -> Self {
        Self {
            dimensions,
            ..Self::default()
        }
    }

    pub fn at(mut self, position: Vec3) -> Self {
        self.position = position;
        self
    }

    pub fn moving(mut self, velocity: Vec3) -> Self {
        self.velocity = velocity;
        self
    }

    pub fn with_gravity(mut self, gravity: f32) -> Self {
        self.gravity = gravity;
        self
    }

    pub fn with_motion(mut self, motion: MotionMode) -> Self {
        self.motion = motion;
        self
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.dimensions.validate()?;
        for (field, v) in [
            ("position.x", self.position.x),
            ("position.y", self.position.y),
            ("position.z", self.position.z),
            ("velocity.x", self.velocity.x),
            ("velocity.y", self.velocity.y),
            ("velocity.z", self.velocity.z),
            ("gravity", self.gravity),
        ] {
            finite(field, v)?;
        }
        non_negative("restitution", self.ground_response.restitution)?;
        non_negative("rest threshold", self.ground_response.rest_threshold)?;
        self.motion.validate()
    }
}

/// Axis-aligned cuboid simulated by the kernel.
///
/// The box owns an [`EntityId`] naming its visual representation; it never
/// touches rendering itself.
#[derive(Debug, Clone)]
pub struct RigidBox {
    id: EntityId,
    kind: EntityKind,
    dimensions: Dimensions,
    pub position: Vec3,
    pub velocity: Vec3,
    gravity: f32,
    motion: MotionMode,
    response: GroundResponse,
    /// Visual rotation about +Y, radians.
    pub yaw: f32,
    bounds: Bounds,
    faulted: bool,
}

impl RigidBox {
    pub fn new(kind: EntityKind, desc: BodyDesc) -> Result<Self, ConfigError> {
        desc.validate()?;
        let mut body = Self {
            id: EntityId::new(),
            kind,
            dimensions: desc.dimensions,
            position: desc.position,
            velocity: desc.velocity,
            gravity: desc.gravity,
            motion: desc.motion,
            response: desc.ground_response,
            yaw: 0.0,
            bounds: Bounds::default(),
            faulted: false,
        };
        body.recompute_bounds();
        Ok(body)
    }

    pub fn id(&self) -> EntityId {
        self.id
    }

    pub fn kind(&self) -> EntityKind {
        self.kind
    }

    pub fn dimensions(&self) -> Dimensions {
        self.dimensions
    }

    pub fn gravity(&self) -> f32 {
        self.gravity
    }

    pub fn motion(&self) -> MotionMode {
        self.motion
    }

    /// Bounds as of the last recompute.
    pub fn bounds(&self) -> &Bounds {
        &self.bounds
    }

    /// True once integration produced a non-finite value; the box is frozen.
    pub fn is_faulted(&self) -> bool {
        self.faulted
    }

    pub fn recompute_bounds(&mut self) {
        self.bounds = Bounds::from_center(self.position, self.dimensions);
    }

    /// Put the box back into the state described by `desc`, keeping its id.
    pub fn reset_from(&mut self, desc: &BodyDesc) {
        self.position = desc.position;
        self.velocity = desc.velocity;
        self.motion = desc.motion;
        self.yaw = 0.0;
        self.faulted = false;
        self.recompute_bounds();
    }

    /// Advance one tick against `ground`.
    ///
    /// Order matters: bounds are refreshed first, the motion mode updates
    /// velocity, all three axes integrate, and only then is gravity applied.
    /// The ground test inside [`RigidBox::apply_gravity`] therefore sees the
    /// bounds from the start of the tick. Bounds are refreshed again once the
    /// tick settles.
    pub fn step(&mut self, ground: &RigidBox) {
        if self.faulted {
            return;
        }
        let position = self.position;
        let motion = self.motion;

        self.recompute_bounds();
        self.advance_motion();
        self.integrate();
        self.apply_gravity(ground);

        if !(self.position.is_finite() && self.velocity.is_finite()) {
            tracing::error!(
                "{} {} produced non-finite state (pos={:?} vel={:?}); freezing",
                self.kind,
                self.id.short(),
                self.position,
                self.velocity
            );
            self.position = position;
            self.velocity = Vec3::ZERO;
            self.motion = motion;
            self.faulted = true;
        }
        self.recompute_bounds();
    }

    fn advance_motion(&mut self) {
        match &mut self.motion {
            MotionMode::Direct => {}
            MotionMode::Heading { angle, speed, ramp } => {
                *speed += *ramp;
                self.velocity.x = angle.sin() * *speed;
                self.velocity.z = angle.cos() * *speed;
            }
            MotionMode::Creep { axis, increment } => match axis {
                Axis::X => self.velocity.x += *increment,
                Axis::Y => self.velocity.y += *increment,
                Axis::Z => self.velocity.z += *increment,
            },
        }
    }

    fn integrate(&mut self) {
        self.position += self.velocity;
    }

    /// Accelerate downward, then either land on `ground` or fall freely.
    pub fn apply_gravity(&mut self, ground: &RigidBox) {
        self.velocity.y += self.gravity;
        if intersects(self, ground) {
            self.land_on(ground);
        } else {
            self.position.y += self.velocity.y;
        }
    }

    fn land_on(&mut self, ground: &RigidBox) {
        self.position.y = ground.bounds.top + self.dimensions.height / 2.0;
        self.velocity.y *= -self.response.restitution;
        if self.velocity.y.abs() < self.response.rest_threshold {
            self.velocity.y = 0.0;
        }
    }

    /// Transform handed to renderers: unit cube scaled to the box dimensions.
    pub fn transform(&self) -> Transform {
        Transform {
            position: self.position,
            rotation: Quat::from_rotation_y(self.yaw),
            scale: self.dimensions.as_vec3(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ground_with_top(top: f32) -> RigidBox {
        let desc = BodyDesc::new(Dimensions::new(75.0, 0.1, 75.0))
            .at(Vec3::new(0.0, top - 0.05, 0.0))
            .with_gravity(0.0);
        RigidBox::new(EntityKind::Ground, desc).unwrap()
    }

    fn cube_at(y: f32, vy: f32, gravity: f32) -> RigidBox {
        let desc = BodyDesc::new(Dimensions::cube(1.0))
            .at(Vec3::new(0.0, y, 0.0))
            .moving(Vec3::new(0.0, vy, 0.0))
            .with_gravity(gravity);
        RigidBox::new(EntityKind::Player, desc).unwrap()
    }

    #[test]
    fn bounds_match_dimensions_and_center() {
        let fixtures = [
            (Dimensions::new(1.0, 1.0, 1.0), Vec3::ZERO),
            (Dimensions::new(75.0, 0.1, 75.0), Vec3::new(0.0, -2.0, 0.0)),
            (Dimensions::new(2.5, 0.5, 4.0), Vec3::new(-3.0, 7.25, 12.0)),
        ];
        for (dims, pos) in fixtures {
            let mut b = RigidBox::new(EntityKind::Obstacle, BodyDesc::new(dims).at(pos)).unwrap();
            b.position += Vec3::new(0.5, -0.25, 1.0);
            b.recompute_bounds();
            let bounds = b.bounds();
            assert!((bounds.right - bounds.left - dims.width).abs() < 1e-5);
            assert!((bounds.top - bounds.bottom - dims.height).abs() < 1e-5);
            assert!((bounds.back - bounds.front - dims.depth).abs() < 1e-5);
            assert!(((bounds.left + bounds.right) / 2.0 - b.position.x).abs() < 1e-5);
            assert!(((bounds.bottom + bounds.top) / 2.0 - b.position.y).abs() < 1e-5);
            assert!(((bounds.front + bounds.back) / 2.0 - b.position.z).abs() < 1e-5);
        }
    }

    #[test]
    fn rejects_degenerate_dimensions() {
        let err = RigidBox::new(
            EntityKind::Obstacle,
            BodyDesc::new(Dimensions::new(0.0, 1.0, 1.0)),
        )
        .unwrap_err();
        assert!(matches!(
            err,
            ConfigError::NonPositiveDimension { field: "width", .. }
        ));
        assert!(
            RigidBox::new(
                EntityKind::Obstacle,
                BodyDesc::new(Dimensions::new(1.0, -1.0, 1.0))
            )
            .is_err()
        );
    }

    #[test]
    fn rejects_non_finite_velocity() {
        let desc = BodyDesc::default().moving(Vec3::new(f32::NAN, 0.0, 0.0));
        assert!(matches!(
            RigidBox::new(EntityKind::Player, desc),
            Err(ConfigError::NonFinite { .. })
        ));
    }

    #[test]
    fn landing_snaps_and_inverts_velocity() {
        let ground = ground_with_top(0.0);
        assert_eq!(ground.bounds().top, 0.0);
        let mut b = cube_at(1.0, -0.5, 0.0);
        b.step(&ground);
        assert_eq!(b.position.y, 0.5);
        assert_eq!(b.velocity.y, 0.25);
    }

    #[test]
    fn small_bounce_snaps_to_rest() {
        let ground = ground_with_top(0.0);
        let mut b = cube_at(0.5, -0.03, 0.0);
        b.step(&ground);
        // 0.03 * 0.5 = 0.015, under the 0.02 threshold
        assert_eq!(b.velocity.y, 0.0);
        assert_eq!(b.position.y, 0.5);
    }

    #[test]
    fn repeated_bounces_converge_to_rest() {
        let ground = ground_with_top(0.0);
        let mut b = cube_at(1.0, -0.5, DEFAULT_GRAVITY);
        for _ in 0..1000 {
            b.step(&ground);
        }
        assert_eq!(b.velocity.y, 0.0);
        assert!((b.position.y - 0.5).abs() < 1e-6);
    }

    #[test]
    fn falls_from_origin_and_settles_on_ground() {
        let ground = RigidBox::new(
            EntityKind::Ground,
            BodyDesc::new(Dimensions::new(75.0, 0.1, 75.0))
                .at(Vec3::new(0.0, -2.0, 0.0))
                .with_gravity(0.0),
        )
        .unwrap();
        let mut player = cube_at(0.0, -0.01, -0.005);
        for _ in 0..2000 {
            player.step(&ground);
        }
        let resting = ground.bounds().top + 0.5;
        assert!((player.position.y - resting).abs() < 1e-5);
        assert_eq!(player.velocity.y, 0.0);
    }

    #[test]
    fn horizontal_motion_integrates_while_grounded() {
        let ground = ground_with_top(0.0);
        let mut b = cube_at(0.5, 0.0, DEFAULT_GRAVITY);
        b.velocity.x = 0.05;
        b.velocity.z = -0.05;
        b.step(&ground);
        assert!((b.position.x - 0.05).abs() < 1e-6);
        assert!((b.position.z + 0.05).abs() < 1e-6);
        assert_eq!(b.position.y, 0.5);
    }

    #[test]
    fn heading_mode_ramps_speed_along_angle() {
        let ground = ground_with_top(-10.0);
        let desc = BodyDesc::default()
            .with_gravity(0.0)
            .with_motion(MotionMode::Heading {
                angle: std::f32::consts::FRAC_PI_2,
                speed: 0.05,
                ramp: 0.001,
            });
        let mut b = RigidBox::new(EntityKind::Obstacle, desc).unwrap();
        b.step(&ground);
        assert!((b.velocity.x - 0.051).abs() < 1e-6);
        assert!(b.velocity.z.abs() < 1e-6);
        b.step(&ground);
        assert!((b.velocity.x - 0.052).abs() < 1e-6);
        assert!((b.position.x - 0.103).abs() < 1e-5);
    }

    #[test]
    fn heading_zero_moves_toward_positive_z() {
        let ground = ground_with_top(-10.0);
        let desc = BodyDesc::default()
            .with_gravity(0.0)
            .with_motion(MotionMode::Heading {
                angle: 0.0,
                speed: 0.05,
                ramp: 0.0,
            });
        let mut b = RigidBox::new(EntityKind::Obstacle, desc).unwrap();
        b.step(&ground);
        assert!(b.velocity.x.abs() < 1e-6);
        assert!((b.velocity.z - 0.05).abs() < 1e-6);
    }

    #[test]
    fn creep_mode_grows_one_axis() {
        let ground = ground_with_top(-10.0);
        let desc = BodyDesc::default()
            .with_gravity(0.0)
            .moving(Vec3::new(0.0, 0.0, 0.005))
            .with_motion(MotionMode::Creep {
                axis: Axis::Z,
                increment: 0.0003,
            });
        let mut b = RigidBox::new(EntityKind::Obstacle, desc).unwrap();
        for _ in 0..10 {
            b.step(&ground);
        }
        assert!((b.velocity.z - 0.008).abs() < 1e-6);
        assert_eq!(b.velocity.x, 0.0);
    }

    #[test]
    fn direct_mode_leaves_velocity_to_controller() {
        let ground = ground_with_top(-10.0);
        let mut b = cube_at(0.0, 0.0, 0.0);
        b.velocity.x = 0.2;
        b.step(&ground);
        assert_eq!(b.velocity.x, 0.2);
    }

    #[test]
    fn non_finite_velocity_freezes_box() {
        let ground = ground_with_top(-10.0);
        let mut b = cube_at(3.0, 0.0, DEFAULT_GRAVITY);
        b.step(&ground);
        let settled = b.position;
        b.velocity.x = f32::NAN;
        b.step(&ground);
        assert!(b.is_faulted());
        assert_eq!(b.position, settled);
        assert!(b.bounds().left.is_finite());
        b.step(&ground);
        assert_eq!(b.position, settled);
    }

    #[test]
    fn reset_restores_desc_and_keeps_id() {
        let ground = ground_with_top(-10.0);
        let desc = BodyDesc::default().with_gravity(-0.005);
        let mut b = RigidBox::new(EntityKind::Player, desc).unwrap();
        let id = b.id();
        b.yaw = 1.0;
        for _ in 0..5 {
            b.step(&ground);
        }
        b.reset_from(&desc);
        assert_eq!(b.id(), id);
        assert_eq!(b.position, Vec3::ZERO);
        assert_eq!(b.yaw, 0.0);
        assert_eq!(b.bounds().bottom, -0.5);
    }

    #[test]
    fn transform_scales_unit_cube() {
        let b = RigidBox::new(
            EntityKind::Ground,
            BodyDesc::new(Dimensions::new(75.0, 0.1, 75.0)).at(Vec3::new(0.0, -2.0, 0.0)),
        )
        .unwrap();
        let t = b.transform();
        assert_eq!(t.scale, Vec3::new(75.0, 0.1, 75.0));
        assert_eq!(t.position.y, -2.0);
    }

    #[test]
    fn motion_mode_json_is_tagged() {
        let json = r#"{ "mode": "creep", "axis": "z", "increment": 0.0003 }"#;
        let mode: MotionMode = serde_json::from_str(json).unwrap();
        assert_eq!(
            mode,
            MotionMode::Creep {
                axis: Axis::Z,
                increment: 0.0003
            }
        );
    }
}
