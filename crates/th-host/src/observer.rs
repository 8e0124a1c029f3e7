//! Host observer trait for progress reporting and fault collection.

use th_behavior::BehaviorError;
use th_core::{FrameClock, InstanceId, KindId};

/// Which callback a fault came from.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum Phase {
    Initialize,
    Update,
}

/// A behavior error isolated to one instance.
#[derive(Clone, Debug)]
pub struct Fault {
    pub id:    InstanceId,
    pub kind:  KindId,
    pub phase: Phase,
    pub error: BehaviorError,
}

/// What happened during one frame.
#[derive(Clone, Debug, Default)]
pub struct FrameReport {
    pub clock:       FrameClock,
    /// Instances whose `initialize` ran this frame (faulted ones included).
    pub initialized: usize,
    /// Instances whose `update` ran this frame (faulted ones included).
    pub updated:     usize,
    /// Timer requests dropped because their target does not exist.
    pub violations:  usize,
    pub faults:      Vec<Fault>,
}

impl FrameReport {
    pub fn new(clock: FrameClock) -> Self {
        Self { clock, ..Self::default() }
    }
}

/// Callbacks invoked by [`Host::run`][crate::Host::run] at key points in the
/// frame loop.
///
/// All methods have default no-op implementations so implementors only need to
/// override what they care about.
///
/// # Example: fault logger
///
/// ```rust,ignore
/// struct FaultCounter(usize);
///
/// impl HostObserver for FaultCounter {
///     fn on_fault(&mut self, _fault: &Fault) {
///         self.0 += 1;
///     }
/// }
/// ```
pub trait HostObserver {
    /// Called at the very start of each frame, before any processing.
    fn on_frame_start(&mut self, _clock: FrameClock) {}

    /// Called once per isolated behavior fault, as it is recorded.
    fn on_fault(&mut self, _fault: &Fault) {}

    /// Called at the end of each frame, before the clock advances.
    fn on_frame_end(&mut self, _report: &FrameReport) {}

    /// Called once after the final frame of [`Host::run`][crate::Host::run].
    fn on_finish(&mut self, _final_clock: FrameClock) {}
}

/// A [`HostObserver`] that does nothing.
pub struct NoopObserver;

impl HostObserver for NoopObserver {}
