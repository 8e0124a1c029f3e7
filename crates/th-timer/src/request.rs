//! Timer requests issued by behaviors.

use th_core::{InstanceId, Micros};

use crate::TimerMode;

/// What a behavior asked the timer subsystem to do.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum TimerAction {
    /// Register (or replace) a trigger.  An `interval` of zero is a reset.
    Activate { interval: Micros, mode: TimerMode },
    /// Keep the registration but never fire it.
    Stop,
    /// Drop the registration; the instance is updated every frame again.
    Reset,
}

/// A timer action addressed to an instance.
///
/// Behaviors never touch the [`TimerTable`][crate::TimerTable] directly.
/// Requests are buffered while behaviors run (possibly in parallel) and the
/// host applies them afterwards in ascending `issuer` order.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub struct TimerRequest {
    /// Instance whose behavior issued the request.
    pub issuer: InstanceId,
    /// Instance whose timer is affected.
    pub target: InstanceId,
    pub action: TimerAction,
}
