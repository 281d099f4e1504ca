use crate::body::{BodyDesc, Dimensions, MotionMode};
use crate::error::{ConfigError, finite, non_negative};
use glam::Vec3;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// How movement actions map onto the player's velocity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ControlScheme {
    /// Movement keys drive world x/z directly; the camera is fixed.
    #[default]
    ScreenRelative,
    /// Rotate actions turn a heading; movement is relative to it and the
    /// camera follows behind the player.
    HeadingRelative,
}

/// Obstacle spawn cadence, in ticks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpawnConfig {
    pub initial_interval: u64,
    /// Subtracted from the interval after every spawn.
    pub interval_step: u64,
    /// The interval never drops below this.
    pub interval_floor: u64,
}

impl Default for SpawnConfig {
    fn default() -> Self {
        Self {
            initial_interval: 200,
            interval_step: 10,
            interval_floor: 20,
        }
    }
}

/// Shape and motion of spawned obstacles.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ObstacleConfig {
    pub dimensions: Dimensions,
    /// Obstacles spawn with x uniformly in `[-band/2, band/2)`.
    pub lateral_band: f32,
    pub spawn_height: f32,
    pub spawn_depth: f32,
    pub velocity: Vec3,
    pub gravity: f32,
    pub motion: MotionMode,
    /// Obstacles further than this behind the player (along +z) are culled.
    pub cull_distance: f32,
}

impl Default for ObstacleConfig {
    fn default() -> Self {
        Self {
            dimensions: Dimensions::cube(1.0),
            lateral_band: 30.0,
            spawn_height: 0.0,
            spawn_depth: -35.0,
            velocity: Vec3::new(0.0, 0.0, 0.005),
            gravity: crate::body::DEFAULT_GRAVITY,
            motion: MotionMode::Heading {
                angle: 0.0,
                speed: 0.05,
                ramp: 0.001,
            },
            cull_distance: 10.0,
        }
    }
}

impl ObstacleConfig {
    /// Body description for an obstacle spawned at lateral offset `x`.
    pub fn desc_at(&self, x: f32) -> BodyDesc {
        BodyDesc::new(self.dimensions)
            .at(Vec3::new(x, self.spawn_height, self.spawn_depth))
            .moving(self.velocity)
            .with_gravity(self.gravity)
            .with_motion(self.motion)
    }
}

/// Camera placement. The fixed pose is used by the screen-relative scheme,
/// the follow parameters by the heading-relative one.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    pub distance: f32,
    pub height: f32,
    pub angle_offset: f32,
    pub fixed_eye: Vec3,
    pub fixed_target: Vec3,
    pub fov_degrees: f32,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            distance: 5.0,
            height: 2.0,
            angle_offset: 0.0,
            fixed_eye: Vec3::new(1.0, 2.0, 7.0),
            fixed_target: Vec3::ZERO,
            fov_degrees: 75.0,
        }
    }
}

/// Everything a [`crate::Session`] needs. All fields default, so a config
/// file only lists what it changes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    pub scheme: ControlScheme,
    pub player: BodyDesc,
    pub ground: BodyDesc,
    pub movement_speed: f32,
    pub jump_impulse: f32,
    /// Radians per tick while a rotate action is held.
    pub rotation_speed: f32,
    pub spawn: SpawnConfig,
    pub obstacle: ObstacleConfig,
    pub camera: CameraConfig,
    /// Seed for obstacle placement.
    pub seed: u64,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            scheme: ControlScheme::default(),
            player: BodyDesc::new(Dimensions::cube(1.0)).moving(Vec3::new(0.0, -0.01, 0.0)),
            ground: BodyDesc::new(Dimensions::new(75.0, 0.1, 75.0))
                .at(Vec3::new(0.0, -2.0, 0.0))
                .with_gravity(0.0),
            movement_speed: 0.05,
            jump_impulse: 0.1,
            rotation_speed: 0.03,
            spawn: SpawnConfig::default(),
            obstacle: ObstacleConfig::default(),
            camera: CameraConfig::default(),
            seed: 42,
        }
    }
}

impl SessionConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.player.validate()?;
        self.ground.validate()?;
        non_negative("movement speed", self.movement_speed)?;
        finite("jump impulse", self.jump_impulse)?;
        finite("rotation speed", self.rotation_speed)?;

        if self.spawn.interval_floor == 0 {
            return Err(ConfigError::ZeroSpawnFloor);
        }
        if self.spawn.initial_interval < self.spawn.interval_floor {
            return Err(ConfigError::IntervalBelowFloor {
                initial: self.spawn.initial_interval,
                floor: self.spawn.interval_floor,
            });
        }

        non_negative("lateral band", self.obstacle.lateral_band)?;
        non_negative("cull distance", self.obstacle.cull_distance)?;
        self.obstacle.desc_at(0.0).validate()?;

        let cam = &self.camera;
        for (field, v) in [
            ("camera distance", cam.distance),
            ("camera height", cam.height),
            ("camera angle offset", cam.angle_offset),
            ("camera eye", cam.fixed_eye.length_squared()),
            ("camera target", cam.fixed_target.length_squared()),
            ("camera fov", cam.fov_degrees),
        ] {
            finite(field, v)?;
        }
        Ok(())
    }

    /// Parse and validate a JSON document.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a JSON config file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path.as_ref())?;
        let config = Self::from_json_str(&text)?;
        tracing::debug!("loaded session config from {}", path.as_ref().display());
        Ok(config)
    }

    pub fn to_json_pretty(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
