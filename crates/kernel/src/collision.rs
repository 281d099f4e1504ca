use crate::body::RigidBox;

/// Axis-aligned overlap test between a moving and a stationary box.
///
/// The x and z axes compare current bounds. The y axis anticipates the moving
/// box's next bottom (`bottom + velocity.y`), so a landing registers one tick
/// before the boxes visibly interpenetrate. Swapping the arguments changes
/// which box is anticipated.
///
/// Both boxes must have recomputed bounds.
pub fn intersects(moving: &RigidBox, stationary: &RigidBox) -> bool {
    let m = moving.bounds();
    let s = stationary.bounds();
    let x = m.right >= s.left && m.left <= s.right;
    let y = m.bottom + moving.velocity.y <= s.top && m.top >= s.bottom;
    let z = m.back >= s.front && m.front <= s.back;
    x && y && z
}
