//! Type-erased, per-kind instance storage.
//!
//! # Design
//!
//! Every registered behavior kind `B` gets one [`Population<B>`]: the
//! behavior value itself plus a `Vec` of slots holding each instance's
//! lifecycle, `B::State`, and optional [`Location`].  The host stores these
//! as `Box<dyn KindTable>` indexed by `KindId`, so kinds with different state
//! types live side by side.
//!
//! Slots are kept sorted by `InstanceId`.  Ids come from a monotonic
//! allocator, so a spawn is almost always a push.

use std::any::Any;

use th_behavior::{Behavior, BehaviorResult, Context};
use th_core::{FrameClock, IdAllocator, InstanceId, Location, Micros};
use th_timer::{TimerRequest, TimerTable};

// ── Lifecycle ─────────────────────────────────────────────────────────────────

/// Where an instance is in its life.  A destroyed instance has no slot.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum Lifecycle {
    /// Spawned; `initialize` has not run yet.
    Uninitialized,
    /// `initialize` succeeded; eligible for `update`.
    Initialized,
    /// A callback returned an error.  Never invoked again.
    Faulted,
}

// ── Outcome ───────────────────────────────────────────────────────────────────

/// Result of one behavior callback, carried from the (possibly parallel)
/// invoke phase to the sequential apply phase.
#[derive(Debug)]
pub(crate) struct Outcome {
    pub id:       InstanceId,
    pub requests: Vec<TimerRequest>,
    pub result:   BehaviorResult<()>,
}

// ── Trait object ──────────────────────────────────────────────────────────────

/// Type-erased interface over a [`Population<B>`].
///
/// Sealed: only `Population` implements it, which keeps the sorted-slot and
/// lifecycle invariants in this module.
pub(crate) trait KindTable: Send + Sync + 'static + sealed::Sealed {
    fn name(&self) -> &str;

    fn insert(&mut self, id: InstanceId, location: Option<Location>);

    fn remove(&mut self, id: InstanceId) -> bool;

    fn lifecycle(&self, id: InstanceId) -> Option<Lifecycle>;

    fn location(&self, id: InstanceId) -> Option<&Location>;

    /// Run `initialize` for every `Uninitialized` instance, in id order.
    fn initialize_pending(&mut self, clock: FrameClock, ids: &IdAllocator, out: &mut Vec<Outcome>);

    /// Mark initialized instances whose timer is due.  Returns the count.
    fn poll_due(&mut self, timers: &mut TimerTable, now: Micros) -> usize;

    /// Run `update` for every instance marked due by [`poll_due`][Self::poll_due].
    fn update_due(&mut self, clock: FrameClock, ids: &IdAllocator, out: &mut Vec<Outcome>);

    /// Run `update` for one initialized instance, regardless of its timer.
    fn update_one(&mut self, id: InstanceId, clock: FrameClock, ids: &IdAllocator) -> Option<Outcome>;

    fn as_any(&self) -> &dyn Any;
}

mod sealed {
    pub trait Sealed {}
}

// ── Concrete table ────────────────────────────────────────────────────────────

struct Slot<S> {
    id:        InstanceId,
    lifecycle: Lifecycle,
    due:       bool,
    state:     S,
    location:  Option<Location>,
}

/// All instances of one behavior kind.
pub(crate) struct Population<B: Behavior> {
    name:     String,
    behavior: B,
    slots:    Vec<Slot<B::State>>,
    /// Slots still `Uninitialized`; lets the initialize phase skip the scan.
    pending:  usize,
}

impl<B: Behavior> Population<B> {
    pub fn new(name: String, behavior: B) -> Self {
        Self { name, behavior, slots: Vec::new(), pending: 0 }
    }

    pub fn state(&self, id: InstanceId) -> Option<&B::State> {
        self.find(id).map(|i| &self.slots[i].state)
    }

    fn find(&self, id: InstanceId) -> Option<usize> {
        self.slots.binary_search_by_key(&id, |s| s.id).ok()
    }
}

impl<B: Behavior> sealed::Sealed for Population<B> {}

impl<B: Behavior> KindTable for Population<B> {
    fn name(&self) -> &str {
        &self.name
    }

    fn insert(&mut self, id: InstanceId, location: Option<Location>) {
        let slot = Slot {
            id,
            lifecycle: Lifecycle::Uninitialized,
            due: false,
            state: B::State::default(),
            location,
        };
        match self.slots.last() {
            Some(last) if last.id > id => {
                let at = self.slots.partition_point(|s| s.id < id);
                self.slots.insert(at, slot);
            }
            _ => self.slots.push(slot),
        }
        self.pending += 1;
    }

    fn remove(&mut self, id: InstanceId) -> bool {
        let Some(i) = self.find(id) else { return false };
        let slot = self.slots.remove(i);
        if slot.lifecycle == Lifecycle::Uninitialized {
            self.pending -= 1;
        }
        true
    }

    fn lifecycle(&self, id: InstanceId) -> Option<Lifecycle> {
        self.find(id).map(|i| self.slots[i].lifecycle)
    }

    fn location(&self, id: InstanceId) -> Option<&Location> {
        self.find(id).and_then(|i| self.slots[i].location.as_ref())
    }

    fn initialize_pending(&mut self, clock: FrameClock, ids: &IdAllocator, out: &mut Vec<Outcome>) {
        if self.pending == 0 {
            return;
        }
        let behavior = &self.behavior;
        for slot in self.slots.iter_mut().filter(|s| s.lifecycle == Lifecycle::Uninitialized) {
            let mut ctx = Context::new(slot.id, clock, ids, slot.location.as_mut());
            let result = behavior.initialize(slot.id, &mut slot.state, &mut ctx);
            let requests = ctx.into_requests();
            slot.lifecycle = if result.is_ok() { Lifecycle::Initialized } else { Lifecycle::Faulted };
            out.push(Outcome { id: slot.id, requests, result });
        }
        self.pending = 0;
    }

    fn poll_due(&mut self, timers: &mut TimerTable, now: Micros) -> usize {
        let mut due = 0;
        for slot in &mut self.slots {
            slot.due = slot.lifecycle == Lifecycle::Initialized && timers.poll(slot.id, now);
            due += usize::from(slot.due);
        }
        due
    }

    fn update_due(&mut self, clock: FrameClock, ids: &IdAllocator, out: &mut Vec<Outcome>) {
        let behavior = &self.behavior;

        #[cfg(not(feature = "parallel"))]
        {
            out.extend(
                self.slots
                    .iter_mut()
                    .filter(|s| s.due)
                    .map(|slot| run_update(behavior, slot, clock, ids)),
            );
        }

        #[cfg(feature = "parallel")]
        {
            use rayon::prelude::*;

            let outcomes: Vec<Outcome> = self
                .slots
                .par_iter_mut()
                .filter(|s| s.due)
                .map(|slot| run_update(behavior, slot, clock, ids))
                .collect();
            out.extend(outcomes);
        }
    }

    fn update_one(&mut self, id: InstanceId, clock: FrameClock, ids: &IdAllocator) -> Option<Outcome> {
        let i = self.find(id)?;
        if self.slots[i].lifecycle != Lifecycle::Initialized {
            return None;
        }
        Some(run_update(&self.behavior, &mut self.slots[i], clock, ids))
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// Invoke `update` on one slot.  A failing call faults the slot.
fn run_update<B: Behavior>(
    behavior: &B,
    slot:     &mut Slot<B::State>,
    clock:    FrameClock,
    ids:      &IdAllocator,
) -> Outcome {
    slot.due = false;
    let mut ctx = Context::new(slot.id, clock, ids, slot.location.as_mut());
    let result = behavior.update(slot.id, &mut slot.state, &mut ctx);
    let requests = ctx.into_requests();
    if result.is_err() {
        slot.lifecycle = Lifecycle::Faulted;
    }
    Outcome { id: slot.id, requests, result }
}
