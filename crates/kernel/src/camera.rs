use crate::config::CameraConfig;
use glam::Vec3;

/// Camera pose published by the session each tick. Renderers build their
/// projection from it; the kernel only decides where the camera sits.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FollowCamera {
    pub eye: Vec3,
    pub target: Vec3,
    pub fov_degrees: f32,
}

impl FollowCamera {
    /// Fixed pose from the config.
    pub fn fixed(config: &CameraConfig) -> Self {
        Self {
            eye: config.fixed_eye,
            target: config.fixed_target,
            fov_degrees: config.fov_degrees,
        }
    }

    /// Place the camera behind `subject` for the given heading and look at it:
    /// `eye = subject + (d * sin(a + off), h, d * cos(a + off))`.
    pub fn follow(&mut self, config: &CameraConfig, subject: Vec3, angle: f32) {
        let a = angle + config.angle_offset;
        self.eye = subject
            + Vec3::new(
                config.distance * a.sin(),
                config.height,
                config.distance * a.cos(),
            );
        self.target = subject;
    }
}
