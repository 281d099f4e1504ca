//! Player control: maps one input snapshot onto horizontal velocity.
//!
//! Opposing actions resolve by precedence (left over right, forward over
//! back) rather than cancelling, and diagonals are not normalized.

use boxdodge_input::{Action, InputSnapshot};
use glam::Vec3;

/// Unit forward vector for a heading. Heading zero faces -z.
pub fn heading_forward(angle: f32) -> Vec3 {
    Vec3::new(-angle.sin(), 0.0, -angle.cos())
}

/// Unit right vector for a heading. Heading zero's right is +x.
pub fn heading_right(angle: f32) -> Vec3 {
    Vec3::new(angle.cos(), 0.0, -angle.sin())
}

/// World-axis velocity: left/right drive x, forward/back drive z.
pub fn screen_relative_velocity(input: &InputSnapshot, speed: f32) -> Vec3 {
    let x = if input.is_pressed(Action::Left) {
        -speed
    } else if input.is_pressed(Action::Right) {
        speed
    } else {
        0.0
    };
    let z = if input.is_pressed(Action::Forward) {
        -speed
    } else if input.is_pressed(Action::Back) {
        speed
    } else {
        0.0
    };
    Vec3::new(x, 0.0, z)
}

/// Velocity relative to `angle`: forward/back along the heading, left/right
/// strafing across it.
pub fn heading_relative_velocity(input: &InputSnapshot, angle: f32, speed: f32) -> Vec3 {
    let forward = heading_forward(angle);
    let right = heading_right(angle);
    let mut v = Vec3::ZERO;
    if input.is_pressed(Action::Forward) {
        v += forward * speed;
    } else if input.is_pressed(Action::Back) {
        v -= forward * speed;
    }
    if input.is_pressed(Action::Left) {
        v -= right * speed;
    } else if input.is_pressed(Action::Right) {
        v += right * speed;
    }
    v
}

/// Heading after one tick of rotate input.
pub fn turn(input: &InputSnapshot, angle: f32, rotation_speed: f32) -> f32 {
    if input.is_pressed(Action::RotateLeft) {
        angle + rotation_speed
    } else if input.is_pressed(Action::RotateRight) {
        angle - rotation_speed
    } else {
        angle
    }
}
