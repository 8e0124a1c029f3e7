//! Pure vector/quaternion helpers behaviors may call from any thread.
//!
//! Vectors and quaternions are `glam` types re-exported here so behavior
//! crates don't need their own `glam` dependency.  Construction goes through
//! glam directly (`Vec3::new`, `Quat::from_xyzw`); this module only adds the
//! degree-based conveniences the behavior contract promises.

pub use glam::{Quat, Vec3};

/// Degrees to radians.
#[inline]
pub fn deg_to_rad(degrees: f32) -> f32 {
    degrees.to_radians()
}

/// Rotation of `degrees` about `axis`.
///
/// `axis` need not be unit length.  A zero (or non-finite) axis has no
/// direction to rotate about and yields the identity.
pub fn axis_angle(axis: Vec3, degrees: f32) -> Quat {
    match axis.try_normalize() {
        Some(unit) => Quat::from_axis_angle(unit, deg_to_rad(degrees)),
        None       => Quat::IDENTITY,
    }
}

/// Transform `v` by the rotation `q`.
#[inline]
pub fn rotate(q: Quat, v: Vec3) -> Vec3 {
    q * v
}
