//! Spatial transform owned by an instance.

use crate::math::{Quat, Vec3};

/// Position, orientation and scale of one instance.
///
/// Each setter replaces its component wholesale; there is no way to observe
/// a half-written value.  The host hands a behavior `&mut Location` only for
/// the instance it is ticking, so a behavior cannot reach another instance's
/// transform.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Location {
    position:    Vec3,
    orientation: Quat,
    scale:       Vec3,
}

impl Location {
    /// Unscaled, unrotated location at `position`.
    pub fn at(position: Vec3) -> Self {
        Self { position, ..Self::default() }
    }

    pub fn new(position: Vec3, orientation: Quat, scale: Vec3) -> Self {
        Self { position, orientation, scale }
    }

    #[inline]
    pub fn position(&self) -> Vec3 {
        self.position
    }

    #[inline]
    pub fn orientation(&self) -> Quat {
        self.orientation
    }

    #[inline]
    pub fn scale(&self) -> Vec3 {
        self.scale
    }

    #[inline]
    pub fn set_position(&mut self, position: Vec3) {
        self.position = position;
    }

    #[inline]
    pub fn set_orientation(&mut self, orientation: Quat) {
        self.orientation = orientation;
    }

    #[inline]
    pub fn set_scale(&mut self, scale: Vec3) {
        self.scale = scale;
    }

    /// Map a point from local space into world space (scale, rotate, translate).
    pub fn transform_point(&self, local: Vec3) -> Vec3 {
        self.position + self.orientation * (self.scale * local)
    }
}

impl Default for Location {
    fn default() -> Self {
        Self { position: Vec3::ZERO, orientation: Quat::IDENTITY, scale: Vec3::ONE }
    }
}
