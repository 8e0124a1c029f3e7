//! `TimerTable`: the host's timer subsystem.
//!
//! One optional [`Trigger`] per instance.  The table is only ever touched by
//! the host's sequential phases (initialize-apply, poll, apply), never from
//! inside a behavior, so it needs no internal locking.

use th_core::{InstanceId, Micros};

use crate::{TimerAction, TimerMode, TimerRequest, Trigger};

#[cfg(feature = "fx-hash")]
type TriggerMap = rustc_hash::FxHashMap<InstanceId, Trigger>;
#[cfg(not(feature = "fx-hash"))]
type TriggerMap = std::collections::HashMap<InstanceId, Trigger>;

/// Map of instance id → update trigger.
#[derive(Default, Debug)]
pub struct TimerTable {
    triggers: TriggerMap,
}

impl TimerTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a trigger for `id`, armed at `now`.
    ///
    /// Last registration wins: an existing trigger is replaced and returned.
    /// An `interval` of zero removes the registration instead (same as
    /// [`reset`][Self::reset]); `TimerMode::Stop` is the same as
    /// [`stop`][Self::stop].
    pub fn activate(
        &mut self,
        id:       InstanceId,
        now:      Micros,
        interval: Micros,
        mode:     TimerMode,
    ) -> Option<Trigger> {
        if interval == Micros::ZERO {
            return self.reset(id);
        }
        if mode == TimerMode::Stop {
            return self.stop(id);
        }
        self.triggers.insert(id, Trigger::armed(now, interval, mode))
    }

    /// Suspend `id`: keep a registration that never fires.
    pub fn stop(&mut self, id: InstanceId) -> Option<Trigger> {
        self.triggers.insert(id, Trigger::stopped())
    }

    /// Drop any registration for `id`; it is then due every frame.
    pub fn reset(&mut self, id: InstanceId) -> Option<Trigger> {
        self.triggers.remove(&id)
    }

    /// Forget `id` entirely (instance destroyed).
    pub fn remove(&mut self, id: InstanceId) {
        self.triggers.remove(&id);
    }

    /// Apply a buffered behavior request at logical time `now`.
    pub fn apply(&mut self, request: &TimerRequest, now: Micros) -> Option<Trigger> {
        match request.action {
            TimerAction::Activate { interval, mode } => self.activate(request.target, now, interval, mode),
            TimerAction::Stop  => self.stop(request.target),
            TimerAction::Reset => self.reset(request.target),
        }
    }

    /// `true` if `id` should be updated at `now`.
    ///
    /// Instances without a trigger are always due.  Firing advances the
    /// trigger, so call this once per instance per frame.
    pub fn poll(&mut self, id: InstanceId, now: Micros) -> bool {
        match self.triggers.get_mut(&id) {
            None          => true,
            Some(trigger) => trigger.poll(now),
        }
    }

    pub fn get(&self, id: InstanceId) -> Option<&Trigger> {
        self.triggers.get(&id)
    }

    /// Number of registered triggers, stopped ones included.
    pub fn len(&self) -> usize {
        self.triggers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.triggers.is_empty()
    }
}
