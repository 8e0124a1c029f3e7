//! Capabilities handed to every behavior callback.

use th_core::{FrameClock, IdAllocator, InstanceId, Location, Micros, Quat, Vec3};
use th_timer::{TimerAction, TimerMode, TimerRequest};

use crate::{BehaviorError, BehaviorResult};

/// Everything a behavior may touch while it runs for one instance.
///
/// The host builds a fresh `Context` for each `initialize`/`update` call and
/// injects the capability handles explicitly:
///
/// | Capability       | Backing                                                    |
/// |------------------|------------------------------------------------------------|
/// | clock            | `FrameClock` copy, identical for every instance this frame |
/// | identity         | shared `&IdAllocator` (atomic, safe across workers)        |
/// | timers           | request buffer, applied by the host after the phase ends   |
/// | location         | `&mut Location` of *this* instance only, if it has one     |
///
/// # Lifetimes
///
/// All borrows live for a single callback.  Nothing in a `Context` can be
/// stashed in behavior state, which is what keeps per-instance state and
/// transforms exclusive to their owner.
pub struct Context<'a> {
    id:       InstanceId,
    clock:    FrameClock,
    ids:      &'a IdAllocator,
    location: Option<&'a mut Location>,
    timers:   Vec<TimerRequest>,
}

impl<'a> Context<'a> {
    /// Build a context for one callback on `id`.
    #[inline]
    pub fn new(
        id:       InstanceId,
        clock:    FrameClock,
        ids:      &'a IdAllocator,
        location: Option<&'a mut Location>,
    ) -> Self {
        Self { id, clock, ids, location, timers: Vec::new() }
    }

    /// Consume the context, yielding the timer requests issued through it.
    pub fn into_requests(self) -> Vec<TimerRequest> {
        self.timers
    }

    // ── Identity ──────────────────────────────────────────────────────────

    /// The instance this callback runs for.
    #[inline]
    pub fn id(&self) -> InstanceId {
        self.id
    }

    /// Allocate a fresh burnable id.
    ///
    /// Exhaustion comes back as an error the behavior may propagate with `?`;
    /// the host treats it as fatal either way.
    pub fn burn_id(&self) -> BehaviorResult<InstanceId> {
        Ok(self.ids.burn()?)
    }

    /// Allocate a fresh persistent id.
    pub fn persistent_id(&self) -> BehaviorResult<InstanceId> {
        Ok(self.ids.persistent()?)
    }

    // ── Clock ─────────────────────────────────────────────────────────────

    #[inline]
    pub fn clock(&self) -> FrameClock {
        self.clock
    }

    /// Current logical time.
    #[inline]
    pub fn now(&self) -> Micros {
        self.clock.logic_time
    }

    /// Current logical time in seconds.
    #[inline]
    pub fn elapsed_secs(&self) -> f64 {
        self.clock.elapsed_secs()
    }

    // ── Timers ────────────────────────────────────────────────────────────

    /// Update `target` every `interval` (`Repeat`) or once after `interval`
    /// (`Once`).  Replaces any earlier registration for `target`.
    pub fn activate_timer(&mut self, target: InstanceId, interval: Micros, mode: TimerMode) {
        self.request(target, TimerAction::Activate { interval, mode });
    }

    /// Stop updating `target` until its timer is re-activated or reset.
    pub fn stop_timer(&mut self, target: InstanceId) {
        self.request(target, TimerAction::Stop);
    }

    /// Drop `target`'s timer so it is updated every frame.
    pub fn reset_timer(&mut self, target: InstanceId) {
        self.request(target, TimerAction::Reset);
    }

    /// Requests issued so far in this callback.
    pub fn pending_requests(&self) -> &[TimerRequest] {
        &self.timers
    }

    fn request(&mut self, target: InstanceId, action: TimerAction) {
        self.timers.push(TimerRequest { issuer: self.id, target, action });
    }

    // ── Location ──────────────────────────────────────────────────────────

    /// This instance's location, if it was spawned with one.
    pub fn location(&self) -> Option<&Location> {
        self.location.as_deref()
    }

    pub fn location_mut(&mut self) -> Option<&mut Location> {
        self.location.as_deref_mut()
    }

    pub fn set_position(&mut self, position: Vec3) -> BehaviorResult<()> {
        self.require_location()?.set_position(position);
        Ok(())
    }

    pub fn set_orientation(&mut self, orientation: Quat) -> BehaviorResult<()> {
        self.require_location()?.set_orientation(orientation);
        Ok(())
    }

    pub fn set_scale(&mut self, scale: Vec3) -> BehaviorResult<()> {
        self.require_location()?.set_scale(scale);
        Ok(())
    }

    fn require_location(&mut self) -> BehaviorResult<&mut Location> {
        let id = self.id;
        self.location.as_deref_mut().ok_or(BehaviorError::NoLocation(id))
    }
}
