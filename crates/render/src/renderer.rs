use crate::scene::SceneMirror;
use boxdodge_kernel::FollowCamera;
use glam::{Mat4, Vec3};
use std::fmt::Write;

/// Near and far clip planes shared by every backend.
pub const Z_NEAR: f32 = 0.1;
pub const Z_FAR: f32 = 1000.0;

/// Camera/view configuration for rendering.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RenderView {
    /// Camera position in world space.
    pub eye: Vec3,
    /// Point the camera is looking at.
    pub target: Vec3,
    /// Vertical field of view in degrees.
    pub fov_degrees: f32,
}

impl Default for RenderView {
    fn default() -> Self {
        Self {
            eye: Vec3::new(1.0, 2.0, 7.0),
            target: Vec3::ZERO,
            fov_degrees: 75.0,
        }
    }
}

impl From<&FollowCamera> for RenderView {
    fn from(cam: &FollowCamera) -> Self {
        Self {
            eye: cam.eye,
            target: cam.target,
            fov_degrees: cam.fov_degrees,
        }
    }
}

impl RenderView {
    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.eye, self.target, Vec3::Y)
    }

    pub fn view_proj(&self, aspect: f32) -> Mat4 {
        let proj = Mat4::perspective_rh(self.fov_degrees.to_radians(), aspect, Z_NEAR, Z_FAR);
        proj * self.view_matrix()
    }
}

/// One directional light plus ambient fill.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Lighting {
    /// Position the directional light shines from, toward the origin.
    pub sun_position: Vec3,
    pub sun_intensity: f32,
    pub ambient: f32,
}

impl Default for Lighting {
    fn default() -> Self {
        Self {
            sun_position: Vec3::new(3.0, 5.0, 1.0),
            sun_intensity: 1.0,
            ambient: 0.5,
        }
    }
}

impl Lighting {
    /// Unit vector pointing from the scene toward the light.
    pub fn to_light(&self) -> Vec3 {
        self.sun_position.try_normalize().unwrap_or(Vec3::Y)
    }
}

/// Renderer-agnostic interface. All renderers implement this trait.
///
/// A renderer reads the mirrored scene and a view, then produces output. It
/// never touches the session.
pub trait Renderer {
    type Output;

    fn render(&self, scene: &SceneMirror, view: &RenderView) -> Self::Output;
}

/// Human-readable dump of the scene, for the CLI and tests.
#[derive(Debug, Default)]
pub struct DebugTextRenderer;

impl DebugTextRenderer {
    pub fn new() -> Self {
        Self
    }
}

impl Renderer for DebugTextRenderer {
    type Output = String;

    fn render(&self, scene: &SceneMirror, view: &RenderView) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "=== Scene ({} drawables) ===", scene.len());
        let _ = writeln!(
            out,
            "Camera: eye=({:.1}, {:.1}, {:.1}) target=({:.1}, {:.1}, {:.1}) fov={:.0}",
            view.eye.x,
            view.eye.y,
            view.eye.z,
            view.target.x,
            view.target.y,
            view.target.z,
            view.fov_degrees
        );
        for (id, d) in scene.iter() {
            let p = d.transform.position;
            let s = d.transform.scale;
            let _ = writeln!(
                out,
                "  [{}] {:<8} pos=({:.2}, {:.2}, {:.2}) size=({:.2}, {:.2}, {:.2})",
                id.short(),
                d.kind.to_string(),
                p.x,
                p.y,
                p.z,
                s.x,
                s.y,
                s.z
            );
        }
        out
    }
}
