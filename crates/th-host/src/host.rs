//! The `Host` struct and its frame loop.

use th_behavior::{Behavior, BehaviorError};
use th_core::{FrameClock, GameClock, HostConfig, IdAllocator, InstanceId, KindId, Location, Micros};
use th_timer::{TimerRequest, TimerTable, Trigger};
use tracing::{debug, debug_span, error, info, warn};

use crate::observer::{Fault, FrameReport, HostObserver, Phase};
use crate::table::{KindTable, Lifecycle, Outcome, Population};
use crate::{HostError, HostResult};

#[cfg(feature = "fx-hash")]
pub(crate) type IdIndex = rustc_hash::FxHashMap<InstanceId, KindId>;
#[cfg(not(feature = "fx-hash"))]
pub(crate) type IdIndex = std::collections::HashMap<InstanceId, KindId>;

/// The reference behavior host.
///
/// Owns the clock, the id allocator, the timer table, and one instance table
/// per registered behavior kind.  Construct via [`HostBuilder`][crate::HostBuilder].
///
/// # Frame loop
///
/// Each frame:
///
/// 1. `observer.on_frame_start(clock)`
/// 2. **Initialize**: every `Uninitialized` instance runs `initialize`, in id
///    order; the timer requests they issued are applied.
/// 3. **Poll**: each `Initialized` instance is checked against its timer (no
///    timer means due every frame).
/// 4. **Update**: due instances run `update` (parallel with the `parallel`
///    feature).
/// 5. **Apply**: outcomes are applied sequentially in ascending id order.
///    Timer requests land in the timer table; errors fault the instance.
/// 6. `observer.on_frame_end(report)`, then the clock advances by one delta.
///
/// Every callback in a frame sees the same [`FrameClock`], so logical time
/// is identical for all instances within a frame and never decreases across
/// frames.
pub struct Host {
    pub(crate) config: HostConfig,
    pub(crate) clock:  GameClock,
    pub(crate) ids:    IdAllocator,
    pub(crate) timers: TimerTable,
    pub(crate) kinds:  Vec<Box<dyn KindTable>>,
    pub(crate) index:  IdIndex,
    /// Set by a fatal error; no frame or step runs afterwards.
    pub(crate) halted: bool,
    #[cfg(feature = "parallel")]
    pub(crate) pool:   Option<rayon::ThreadPool>,
}

impl Host {
    // ── Registration and population ───────────────────────────────────────

    /// Look up a registered kind by name.
    pub fn kind(&self, name: &str) -> HostResult<KindId> {
        self.kinds
            .iter()
            .position(|t| t.name() == name)
            .map(|i| KindId(i as u16))
            .ok_or_else(|| HostError::UnknownKindName(name.to_string()))
    }

    pub fn kind_name(&self, kind: KindId) -> Option<&str> {
        self.kinds.get(kind.index()).map(|t| t.name())
    }

    /// Number of registered kinds.
    pub fn kind_count(&self) -> usize {
        self.kinds.len()
    }

    /// Create an instance of `kind` with a fresh burnable id.
    ///
    /// The instance starts `Uninitialized`; its `initialize` runs at the start
    /// of the next frame.  Behaviors that write transforms need a location.
    pub fn spawn(&mut self, kind: KindId, location: Option<Location>) -> HostResult<InstanceId> {
        if kind.index() >= self.kinds.len() {
            return Err(HostError::UnknownKind(kind));
        }
        let Ok(id) = self.ids.burn() else {
            return Err(self.halt());
        };
        let table = &mut self.kinds[kind.index()];
        table.insert(id, location);
        self.index.insert(id, kind);
        info!(%id, kind = table.name(), has_location = location.is_some(), "spawned");
        Ok(id)
    }

    /// Destroy an instance.  Its state, location, and timer are dropped.
    pub fn despawn(&mut self, id: InstanceId) -> HostResult<()> {
        let kind = self.index.remove(&id).ok_or(HostError::InstanceNotFound(id))?;
        self.kinds[kind.index()].remove(id);
        self.timers.remove(id);
        info!(%id, "despawned");
        Ok(())
    }

    // ── Inspection ────────────────────────────────────────────────────────

    pub fn config(&self) -> &HostConfig {
        &self.config
    }

    /// Change how many frames [`run`][Self::run] simulates in total.
    pub fn set_total_frames(&mut self, total_frames: u64) {
        self.config.total_frames = total_frames;
    }

    /// `true` once a fatal error stopped the host.
    pub fn is_halted(&self) -> bool {
        self.halted
    }

    pub fn kind_of(&self, id: InstanceId) -> Option<KindId> {
        self.index.get(&id).copied()
    }

    pub fn lifecycle(&self, id: InstanceId) -> Option<Lifecycle> {
        self.table_of(id)?.lifecycle(id)
    }

    pub fn location(&self, id: InstanceId) -> Option<&Location> {
        self.table_of(id)?.location(id)
    }

    /// Behavior state of `id`, if it is an instance of a kind registered with
    /// behavior type `B`.
    pub fn state<B: Behavior>(&self, id: InstanceId) -> Option<&B::State> {
        self.table_of(id)?
            .as_any()
            .downcast_ref::<Population<B>>()?
            .state(id)
    }

    /// Current timer registration for `id`.  `None` means due every frame.
    pub fn timer(&self, id: InstanceId) -> Option<&Trigger> {
        self.timers.get(id)
    }

    /// Clock of the frame about to run.
    pub fn clock(&self) -> FrameClock {
        self.clock.snapshot()
    }

    pub fn ids(&self) -> &IdAllocator {
        &self.ids
    }

    /// Live instances, any lifecycle.
    pub fn live_count(&self) -> usize {
        self.index.len()
    }

    /// Live instance ids in ascending order.
    pub fn instance_ids(&self) -> Vec<InstanceId> {
        let mut ids: Vec<InstanceId> = self.index.keys().copied().collect();
        ids.sort_unstable();
        ids
    }

    fn table_of(&self, id: InstanceId) -> Option<&dyn KindTable> {
        let kind = self.index.get(&id)?;
        self.kinds.get(kind.index()).map(|t| t.as_ref())
    }

    // ── Main loop ─────────────────────────────────────────────────────────

    /// Run frames until `config.total_frames` have elapsed.
    pub fn run<O: HostObserver>(&mut self, observer: &mut O) -> HostResult<()> {
        while self.clock.frame() < self.config.total_frames {
            self.process_frame(observer)?;
        }
        observer.on_finish(self.clock.snapshot());
        info!(clock = %self.clock, live = self.live_count(), "run finished");
        Ok(())
    }

    /// Run exactly `n` frames from the current position (ignores
    /// `total_frames`).
    ///
    /// Useful for tests and incremental stepping.
    pub fn run_frames<O: HostObserver>(&mut self, n: u64, observer: &mut O) -> HostResult<()> {
        for _ in 0..n {
            self.process_frame(observer)?;
        }
        Ok(())
    }

    /// Invoke `update` on a single instance at the current clock, bypassing
    /// its timer.  The clock does not advance.
    ///
    /// Fails with `NotInitialized` until the instance's first frame has run,
    /// and with `Faulted` once it has faulted.  A behavior error faults the
    /// instance and is returned.  Exhausting the id allocator halts the host.
    pub fn step_instance(&mut self, id: InstanceId) -> HostResult<()> {
        self.ensure_running()?;
        let kind = self.kind_of(id).ok_or(HostError::InstanceNotFound(id))?;
        let table = &mut self.kinds[kind.index()];
        match table.lifecycle(id) {
            None => return Err(HostError::InstanceNotFound(id)),
            Some(Lifecycle::Uninitialized) => return Err(HostError::NotInitialized(id)),
            Some(Lifecycle::Faulted) => return Err(HostError::Faulted(id)),
            Some(Lifecycle::Initialized) => {}
        }

        let clock = self.clock.snapshot();
        let Some(outcome) = table.update_one(id, clock, &self.ids) else {
            return Err(HostError::InstanceNotFound(id));
        };
        match outcome.result {
            Err(e) if e.is_exhaustion() => Err(self.halt()),
            _ if self.ids.is_exhausted() => Err(self.halt()),
            Ok(()) => {
                let mut report = FrameReport::new(clock);
                for request in &outcome.requests {
                    self.apply_request(request, clock.logic_time, &mut report);
                }
                Ok(())
            }
            Err(e) => {
                error!(%id, error = %e, "behavior faulted");
                Err(HostError::Behavior { id, source: e })
            }
        }
    }

    // ── Core frame processing ─────────────────────────────────────────────

    fn process_frame<O: HostObserver>(&mut self, observer: &mut O) -> HostResult<()> {
        self.ensure_running()?;
        let clock = self.clock.snapshot();
        let _span = debug_span!("frame", frame = clock.frame).entered();
        observer.on_frame_start(clock);
        let mut report = FrameReport::new(clock);

        // ── Phase 1: initialize new instances ─────────────────────────────
        //
        // Their timer requests are applied before polling, so an instance
        // that arms its own timer here is not updated until that timer is due.
        let mut outcomes = Vec::new();
        for table in &mut self.kinds {
            table.initialize_pending(clock, &self.ids, &mut outcomes);
        }
        report.initialized = outcomes.len();
        self.apply_outcomes(Phase::Initialize, outcomes, &mut report, observer)?;

        // ── Phase 2: poll timers ──────────────────────────────────────────
        let mut due = 0;
        for table in &mut self.kinds {
            due += table.poll_due(&mut self.timers, clock.logic_time);
        }

        // ── Phase 3: update (produce) ─────────────────────────────────────
        let mut outcomes = Vec::with_capacity(due);
        self.compute_updates(clock, &mut outcomes);
        report.updated = outcomes.len();

        // ── Phase 4: apply (consume) ──────────────────────────────────────
        //
        // Sorted by id so results are deterministic even when the update
        // phase ran in parallel.
        self.apply_outcomes(Phase::Update, outcomes, &mut report, observer)?;

        debug!(
            initialized = report.initialized,
            updated = report.updated,
            faults = report.faults.len(),
            violations = report.violations,
            "frame done"
        );
        observer.on_frame_end(&report);
        self.clock.advance();
        Ok(())
    }

    /// Run `update` on every due instance across all kinds.
    fn compute_updates(&mut self, clock: FrameClock, out: &mut Vec<Outcome>) {
        // Explicit field borrows so the borrow checker sees disjoint access.
        let ids   = &self.ids;
        let kinds = &mut self.kinds;

        #[cfg(feature = "parallel")]
        {
            if let Some(pool) = &self.pool {
                pool.install(|| {
                    for table in kinds.iter_mut() {
                        table.update_due(clock, ids, out);
                    }
                });
                return;
            }
        }

        for table in kinds.iter_mut() {
            table.update_due(clock, ids, out);
        }
    }

    fn apply_outcomes<O: HostObserver>(
        &mut self,
        phase:    Phase,
        mut outcomes: Vec<Outcome>,
        report:   &mut FrameReport,
        observer: &mut O,
    ) -> HostResult<()> {
        outcomes.sort_unstable_by_key(|o| o.id);
        let now = report.clock.logic_time;

        for outcome in outcomes {
            match outcome.result {
                Ok(()) => {
                    for request in &outcome.requests {
                        self.apply_request(request, now, report);
                    }
                }
                Err(e) if e.is_exhaustion() => return Err(self.halt()),
                Err(e) => self.record_fault(outcome.id, phase, e, report, observer),
            }
        }

        if self.ids.is_exhausted() {
            return Err(self.halt());
        }
        Ok(())
    }

    fn ensure_running(&self) -> HostResult<()> {
        if self.halted { Err(HostError::IdsExhausted) } else { Ok(()) }
    }

    /// Latch the fatal id-exhaustion state.
    fn halt(&mut self) -> HostError {
        if !self.halted {
            error!(clock = %self.clock, "id allocator exhausted; host halted");
            self.halted = true;
        }
        HostError::IdsExhausted
    }

    /// Timer requests for unknown targets are dropped and counted.
    fn apply_request(&mut self, request: &TimerRequest, now: Micros, report: &mut FrameReport) {
        if !self.index.contains_key(&request.target) {
            warn!(
                issuer = %request.issuer,
                target = %request.target,
                "timer request for unknown instance ignored"
            );
            report.violations += 1;
            return;
        }
        self.timers.apply(request, now);
    }

    fn record_fault<O: HostObserver>(
        &mut self,
        id:       InstanceId,
        phase:    Phase,
        error:    BehaviorError,
        report:   &mut FrameReport,
        observer: &mut O,
    ) {
        let kind = self.kind_of(id).unwrap_or(KindId::INVALID);
        error!(%id, ?phase, error = %error, "behavior faulted; instance disabled");
        let fault = Fault { id, kind, phase, error };
        observer.on_fault(&fault);
        report.faults.push(fault);
    }
}
