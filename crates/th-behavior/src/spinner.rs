//! Stateless sample: pulses its scale and spins about an axis.

use th_core::math::{axis_angle, rotate};
use th_core::{InstanceId, Vec3};

use crate::{Behavior, BehaviorResult, Context};

/// Drives its instance's location from logical time alone.
///
/// At elapsed time `t` seconds:
///
/// ```text
/// scale       = splat(pulse_scale(t))                 ∈ [0.5, 1.0]
/// orientation = axis_angle(axis, spin_degrees(t, period_secs))
/// position    = orientation * anchor
/// ```
///
/// Requires a location; an instance spawned without one faults on its first
/// update.
#[derive(Clone, Debug)]
pub struct Spinner {
    pub axis:        Vec3,
    /// Seconds per full turn.
    pub period_secs: f64,
    /// Offset from the origin the instance orbits on.
    pub anchor:      Vec3,
}

impl Default for Spinner {
    fn default() -> Self {
        Self { axis: Vec3::Y, period_secs: 64.0, anchor: Vec3::ZERO }
    }
}

impl Behavior for Spinner {
    type State = ();

    fn update(&self, _id: InstanceId, _state: &mut (), ctx: &mut Context<'_>) -> BehaviorResult<()> {
        let t = ctx.elapsed_secs();
        let orientation = axis_angle(self.axis, spin_degrees(t, self.period_secs) as f32);
        ctx.set_scale(Vec3::splat(pulse_scale(t)))?;
        ctx.set_orientation(orientation)?;
        ctx.set_position(rotate(orientation, self.anchor))
    }
}

/// Sine pulse remapped to `[0.5, 1.0]`.
pub fn pulse_scale(t: f64) -> f32 {
    let unit = (t.sin() + 1.0) * 0.5;
    (unit * 0.5 + 0.5) as f32
}

/// Fraction of the current turn, in degrees `[0, 360)`.
///
/// A non-positive or non-finite period has no turn to be part of and gives 0.
pub fn spin_degrees(t: f64, period_secs: f64) -> f64 {
    if period_secs.is_nan() || period_secs <= 0.0 || !t.is_finite() {
        return 0.0;
    }
    let degrees = (t / period_secs).rem_euclid(1.0) * 360.0;
    // rem_euclid can round up to exactly 1.0 for tiny negative inputs
    if degrees >= 360.0 { 0.0 } else { degrees }
}
