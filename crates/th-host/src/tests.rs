//! Integration-style tests for the host frame loop.

use std::sync::{Arc, Mutex};

use th_behavior::{Behavior, BehaviorError, BehaviorResult, Context, Countdown, CountdownState, Spinner};
use th_core::{FrameClock, HostConfig, IdAllocator, InstanceId, Location, Micros, Vec3};
use th_timer::TimerMode;

use crate::{Fault, FrameReport, Host, HostBuilder, HostError, HostObserver, Lifecycle, NoopObserver, Phase};

// ── Helpers ───────────────────────────────────────────────────────────────────

/// 10 Hz keeps every frame time a whole multiple of 100 ms.
fn ten_hz(total_frames: u64) -> HostConfig {
    HostConfig { frame_rate_hz: 10, total_frames, num_threads: Some(2) }
}

fn countdown_host() -> (Host, InstanceId) {
    let mut host = HostBuilder::new(ten_hz(200))
        .register("countdown", Countdown::default())
        .build()
        .unwrap();
    let id = host.spawn(host.kind("countdown").unwrap(), None).unwrap();
    (host, id)
}

#[derive(Copy, Clone, PartialEq, Eq, Debug)]
enum Call {
    Init,
    Update,
}

type CallLog = Arc<Mutex<Vec<(InstanceId, Call, Micros)>>>;

/// Records every callback it receives.
struct Recorder {
    log: CallLog,
}

impl Behavior for Recorder {
    /// Number of times `initialize` ran for this instance.
    type State = u32;

    fn initialize(&self, id: InstanceId, inits: &mut u32, ctx: &mut Context<'_>) -> BehaviorResult<()> {
        *inits += 1;
        self.log.lock().unwrap().push((id, Call::Init, ctx.now()));
        Ok(())
    }

    fn update(&self, id: InstanceId, _inits: &mut u32, ctx: &mut Context<'_>) -> BehaviorResult<()> {
        self.log.lock().unwrap().push((id, Call::Update, ctx.now()));
        Ok(())
    }
}

/// Counts updates; faults on update for one chosen instance.
struct Picky {
    victim: InstanceId,
}

impl Behavior for Picky {
    type State = u64;

    fn update(&self, id: InstanceId, updates: &mut u64, _ctx: &mut Context<'_>) -> BehaviorResult<()> {
        if id == self.victim {
            return Err(BehaviorError::fault("picked"));
        }
        *updates += 1;
        Ok(())
    }
}

/// Always fails to initialize.
struct BrokenInit;

impl Behavior for BrokenInit {
    type State = u64;

    fn initialize(&self, _id: InstanceId, _s: &mut u64, _ctx: &mut Context<'_>) -> BehaviorResult<()> {
        Err(BehaviorError::Config("missing asset".into()))
    }

    fn update(&self, _id: InstanceId, updates: &mut u64, _ctx: &mut Context<'_>) -> BehaviorResult<()> {
        *updates += 1;
        Ok(())
    }
}

/// Arms a one-shot timer on itself and counts updates.
struct OneShot {
    delay: Micros,
}

impl Behavior for OneShot {
    type State = u64;

    fn initialize(&self, id: InstanceId, _s: &mut u64, ctx: &mut Context<'_>) -> BehaviorResult<()> {
        ctx.activate_timer(id, self.delay, TimerMode::Once);
        Ok(())
    }

    fn update(&self, _id: InstanceId, updates: &mut u64, _ctx: &mut Context<'_>) -> BehaviorResult<()> {
        *updates += 1;
        Ok(())
    }
}

/// Suspends its own timer on initialize.
struct Sleeper;

impl Behavior for Sleeper {
    type State = u64;

    fn initialize(&self, id: InstanceId, _s: &mut u64, ctx: &mut Context<'_>) -> BehaviorResult<()> {
        ctx.stop_timer(id);
        Ok(())
    }

    fn update(&self, _id: InstanceId, updates: &mut u64, _ctx: &mut Context<'_>) -> BehaviorResult<()> {
        *updates += 1;
        Ok(())
    }
}

/// Resets another instance's timer on initialize.
struct Waker {
    target: InstanceId,
}

impl Behavior for Waker {
    type State = ();

    fn initialize(&self, _id: InstanceId, _s: &mut (), ctx: &mut Context<'_>) -> BehaviorResult<()> {
        ctx.reset_timer(self.target);
        Ok(())
    }

    fn update(&self, _id: InstanceId, _s: &mut (), _ctx: &mut Context<'_>) -> BehaviorResult<()> {
        Ok(())
    }
}

/// Waits on a long timer; any update fails.
struct Fragile;

impl Behavior for Fragile {
    type State = ();

    fn initialize(&self, id: InstanceId, _s: &mut (), ctx: &mut Context<'_>) -> BehaviorResult<()> {
        ctx.activate_timer(id, Micros::from_secs(100), TimerMode::Repeat);
        Ok(())
    }

    fn update(&self, _id: InstanceId, _s: &mut (), _ctx: &mut Context<'_>) -> BehaviorResult<()> {
        Err(BehaviorError::fault("fragile"))
    }
}

/// Updates every `interval`; each update burns an id and ignores failure.
struct Swallower {
    interval: Micros,
}

impl Behavior for Swallower {
    type State = u64;

    fn initialize(&self, id: InstanceId, _s: &mut u64, ctx: &mut Context<'_>) -> BehaviorResult<()> {
        ctx.activate_timer(id, self.interval, TimerMode::Repeat);
        Ok(())
    }

    fn update(&self, _id: InstanceId, updates: &mut u64, ctx: &mut Context<'_>) -> BehaviorResult<()> {
        let _ = ctx.burn_id();
        *updates += 1;
        Ok(())
    }
}

#[derive(Default)]
struct Counting {
    starts:     u64,
    ends:       u64,
    violations: usize,
    faults:     Vec<Fault>,
    finished:   Option<FrameClock>,
}

impl HostObserver for Counting {
    fn on_frame_start(&mut self, _clock: FrameClock) {
        self.starts += 1;
    }

    fn on_fault(&mut self, fault: &Fault) {
        self.faults.push(fault.clone());
    }

    fn on_frame_end(&mut self, report: &FrameReport) {
        self.ends += 1;
        self.violations += report.violations;
    }

    fn on_finish(&mut self, final_clock: FrameClock) {
        self.finished = Some(final_clock);
    }
}

// ── Builder ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod builder_tests {
    use th_behavior::NoopBehavior;
    use th_core::KindId;

    use super::*;

    #[test]
    fn kinds_are_numbered_in_registration_order() {
        let host = HostBuilder::new(HostConfig::default())
            .register("a", NoopBehavior)
            .register("b", Countdown::default())
            .build()
            .unwrap();
        assert_eq!(host.kind("a").unwrap(), KindId(0));
        assert_eq!(host.kind("b").unwrap(), KindId(1));
        assert_eq!(host.kind_name(KindId(1)), Some("b"));
        assert_eq!(host.kind_count(), 2);
        assert!(matches!(host.kind("c"), Err(HostError::UnknownKindName(_))));
    }

    #[test]
    fn duplicate_kind_name_is_rejected() {
        let result = HostBuilder::new(HostConfig::default())
            .register("dup", NoopBehavior)
            .register("dup", Countdown::default())
            .build();
        assert!(matches!(result, Err(HostError::DuplicateKind(name)) if name == "dup"));
    }

    #[test]
    fn invalid_config_is_rejected() {
        let config = HostConfig { frame_rate_hz: 0, ..HostConfig::default() };
        assert!(matches!(HostBuilder::new(config).build(), Err(HostError::Config(_))));
    }

    #[test]
    fn spawn_unknown_kind_fails() {
        let mut host = HostBuilder::new(HostConfig::default()).build().unwrap();
        assert!(matches!(host.spawn(KindId(7), None), Err(HostError::UnknownKind(KindId(7)))));
        assert_eq!(host.live_count(), 0);
    }
}

// ── Lifecycle ─────────────────────────────────────────────────────────────────

#[cfg(test)]
mod lifecycle_tests {
    use th_core::ids::BURNABLE_START;

    use super::*;

    #[test]
    fn spawn_assigns_ascending_burnable_ids() {
        let (mut host, first) = countdown_host();
        let kind = host.kind("countdown").unwrap();
        let second = host.spawn(kind, None).unwrap();
        assert_eq!(first, InstanceId(BURNABLE_START));
        assert_eq!(second, InstanceId(BURNABLE_START + 1));
        assert_eq!(host.kind_of(second), Some(kind));
        assert_eq!(host.live_count(), 2);
    }

    #[test]
    fn first_frame_initializes() {
        let (mut host, id) = countdown_host();
        assert_eq!(host.lifecycle(id), Some(Lifecycle::Uninitialized));
        host.run_frames(1, &mut NoopObserver).unwrap();
        assert_eq!(host.lifecycle(id), Some(Lifecycle::Initialized));
        assert_eq!(host.state::<Countdown>(id).unwrap().remaining, 5);
    }

    #[test]
    fn initialize_once_and_before_any_update() {
        let log = CallLog::default();
        let mut host = HostBuilder::new(ten_hz(100))
            .register("rec", Recorder { log: Arc::clone(&log) })
            .build()
            .unwrap();
        let kind = host.kind("rec").unwrap();
        let a = host.spawn(kind, None).unwrap();
        host.run_frames(3, &mut NoopObserver).unwrap();
        let b = host.spawn(kind, None).unwrap();
        host.run_frames(3, &mut NoopObserver).unwrap();

        let log = log.lock().unwrap();
        for id in [a, b] {
            let calls: Vec<Call> = log.iter().filter(|e| e.0 == id).map(|e| e.1).collect();
            assert_eq!(calls[0], Call::Init, "{id} must initialize first");
            assert_eq!(calls.iter().filter(|&&c| c == Call::Init).count(), 1);
            assert_eq!(host.state::<Recorder>(id), Some(&1));
        }
        // untimed instances update in every frame, including their first
        assert_eq!(log.iter().filter(|e| e.0 == a && e.1 == Call::Update).count(), 6);
        assert_eq!(log.iter().filter(|e| e.0 == b && e.1 == Call::Update).count(), 3);
    }

    #[test]
    fn time_is_shared_within_a_frame_and_never_decreases() {
        let log = CallLog::default();
        let mut host = HostBuilder::new(ten_hz(100))
            .register("rec", Recorder { log: Arc::clone(&log) })
            .build()
            .unwrap();
        let kind = host.kind("rec").unwrap();
        let ids: Vec<InstanceId> = (0..4).map(|_| host.spawn(kind, None).unwrap()).collect();
        host.run_frames(10, &mut NoopObserver).unwrap();

        let log = log.lock().unwrap();
        for &id in &ids {
            let times: Vec<Micros> =
                log.iter().filter(|e| e.0 == id && e.1 == Call::Update).map(|e| e.2).collect();
            assert_eq!(times.len(), 10);
            assert!(times.windows(2).all(|w| w[0] <= w[1]));
            for (frame, t) in times.iter().enumerate() {
                assert_eq!(*t, Micros(frame as u64 * 100_000));
            }
        }
    }

    #[test]
    fn despawn_drops_everything() {
        let (mut host, id) = countdown_host();
        host.run_frames(1, &mut NoopObserver).unwrap();
        assert!(host.timer(id).is_some());
        host.despawn(id).unwrap();
        assert_eq!(host.lifecycle(id), None);
        assert!(host.timer(id).is_none());
        assert!(host.state::<Countdown>(id).is_none());
        assert_eq!(host.live_count(), 0);
        assert!(matches!(host.despawn(id), Err(HostError::InstanceNotFound(_))));
        host.run_frames(50, &mut NoopObserver).unwrap();
    }

    #[test]
    fn state_lookup_with_wrong_type_is_none() {
        let (host, id) = countdown_host();
        assert!(host.state::<Spinner>(id).is_none());
        assert!(host.state::<Countdown>(id).is_some());
    }
}

// ── Countdown through the host ────────────────────────────────────────────────

#[cfg(test)]
mod countdown_tests {
    use super::*;

    fn state(host: &Host, id: InstanceId) -> &CountdownState {
        host.state::<Countdown>(id).unwrap()
    }

    #[test]
    fn updates_every_two_seconds() {
        let (mut host, id) = countdown_host();
        // frames 0..=19: initialize only
        host.run_frames(20, &mut NoopObserver).unwrap();
        assert_eq!(state(&host, id).updates, 0);
        // frame 20 is t = 2 s
        host.run_frames(1, &mut NoopObserver).unwrap();
        assert_eq!(state(&host, id).remaining, 4);
        // through t = 10 s
        host.run_frames(80, &mut NoopObserver).unwrap();
        assert_eq!(state(&host, id).remaining, 0);
        assert_eq!(state(&host, id).updates, 5);
        // keeps counting past zero at t = 12 s
        host.run_frames(20, &mut NoopObserver).unwrap();
        assert_eq!(state(&host, id).remaining, -1);
        assert_eq!(host.lifecycle(id), Some(Lifecycle::Initialized));
    }

    #[test]
    fn update_burns_ids_from_host_allocator() {
        let (mut host, id) = countdown_host();
        host.run_frames(101, &mut NoopObserver).unwrap();
        // spawn took 1000; five updates took 1001..=1005
        assert_eq!(state(&host, id).last_burned, InstanceId(1_005));
        assert_eq!(host.ids().peek_burnable(), 1_006);
    }

    #[test]
    fn stop_at_zero_suspends_timer() {
        let mut host = HostBuilder::new(ten_hz(300))
            .register("countdown", Countdown { stop_at_zero: true, ..Countdown::default() })
            .build()
            .unwrap();
        let id = host.spawn(host.kind("countdown").unwrap(), None).unwrap();
        host.run(&mut NoopObserver).unwrap();
        assert_eq!(state(&host, id).remaining, 0);
        assert_eq!(state(&host, id).updates, 5);
        assert!(host.timer(id).unwrap().is_stopped());
    }

    #[test]
    fn instances_do_not_share_state() {
        let (mut host, a) = countdown_host();
        let b = host.spawn(host.kind("countdown").unwrap(), None).unwrap();
        host.run_frames(1, &mut NoopObserver).unwrap();
        host.step_instance(a).unwrap();
        host.step_instance(a).unwrap();
        assert_eq!(state(&host, a).remaining, 3);
        assert_eq!(state(&host, b).remaining, 5);
    }
}

// ── Timers through the host ───────────────────────────────────────────────────

#[cfg(test)]
mod timer_tests {
    use super::*;

    #[test]
    fn once_timer_updates_exactly_once() {
        let mut host = HostBuilder::new(ten_hz(50))
            .register("once", OneShot { delay: Micros::from_secs(1) })
            .build()
            .unwrap();
        let id = host.spawn(host.kind("once").unwrap(), None).unwrap();
        host.run_frames(10, &mut NoopObserver).unwrap();
        assert_eq!(host.state::<OneShot>(id), Some(&0));
        host.run(&mut NoopObserver).unwrap();
        assert_eq!(host.state::<OneShot>(id), Some(&1));
        assert!(host.timer(id).unwrap().is_stopped());
    }

    #[test]
    fn requests_apply_in_id_order_across_instances() {
        // the sleeper (lower id) stops itself, then the waker resets it
        let sleeper_id = InstanceId(1_000);
        let mut host = HostBuilder::new(ten_hz(5))
            .register("sleeper", Sleeper)
            .register("waker", Waker { target: sleeper_id })
            .build()
            .unwrap();
        assert_eq!(host.spawn(host.kind("sleeper").unwrap(), None).unwrap(), sleeper_id);
        host.spawn(host.kind("waker").unwrap(), None).unwrap();
        host.run(&mut NoopObserver).unwrap();
        assert!(host.timer(sleeper_id).is_none());
        assert_eq!(host.state::<Sleeper>(sleeper_id), Some(&5));
    }

    #[test]
    fn request_for_unknown_target_is_a_violation() {
        let mut host = HostBuilder::new(ten_hz(3))
            .register("waker", Waker { target: InstanceId(424_242) })
            .build()
            .unwrap();
        host.spawn(host.kind("waker").unwrap(), None).unwrap();
        let mut obs = Counting::default();
        host.run(&mut obs).unwrap();
        assert_eq!(obs.violations, 1);
        assert!(host.timer(InstanceId(424_242)).is_none());
    }
}

// ── Faults ────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod fault_tests {
    use super::*;

    #[test]
    fn update_fault_disables_only_that_instance() {
        let victim = InstanceId(1_000);
        let mut host = HostBuilder::new(ten_hz(5))
            .register("picky", Picky { victim })
            .build()
            .unwrap();
        let kind = host.kind("picky").unwrap();
        assert_eq!(host.spawn(kind, None).unwrap(), victim);
        let other = host.spawn(kind, None).unwrap();

        let mut obs = Counting::default();
        host.run(&mut obs).unwrap();

        assert_eq!(host.lifecycle(victim), Some(Lifecycle::Faulted));
        assert_eq!(host.lifecycle(other), Some(Lifecycle::Initialized));
        assert_eq!(host.state::<Picky>(other), Some(&5));
        assert_eq!(obs.faults.len(), 1, "a faulted instance is never invoked again");
        assert_eq!(obs.faults[0].id, victim);
        assert_eq!(obs.faults[0].phase, Phase::Update);
        assert_eq!(obs.faults[0].kind, kind);
    }

    #[test]
    fn initialize_fault_prevents_updates() {
        let mut host = HostBuilder::new(ten_hz(4)).register("broken", BrokenInit).build().unwrap();
        let id = host.spawn(host.kind("broken").unwrap(), None).unwrap();
        let mut obs = Counting::default();
        host.run(&mut obs).unwrap();
        assert_eq!(host.lifecycle(id), Some(Lifecycle::Faulted));
        assert_eq!(host.state::<BrokenInit>(id), Some(&0));
        assert_eq!(obs.faults.len(), 1);
        assert_eq!(obs.faults[0].phase, Phase::Initialize);
    }

    #[test]
    fn spinner_without_location_faults() {
        let mut host = HostBuilder::new(ten_hz(2)).register("spin", Spinner::default()).build().unwrap();
        let kind = host.kind("spin").unwrap();
        let bare = host.spawn(kind, None).unwrap();
        let placed = host.spawn(kind, Some(Location::default())).unwrap();
        let mut obs = Counting::default();
        host.run(&mut obs).unwrap();
        assert_eq!(host.lifecycle(bare), Some(Lifecycle::Faulted));
        assert_eq!(obs.faults[0].error, BehaviorError::NoLocation(bare));
        assert_eq!(host.lifecycle(placed), Some(Lifecycle::Initialized));
    }
}

// ── step_instance ─────────────────────────────────────────────────────────────

#[cfg(test)]
mod step_tests {
    use super::*;

    #[test]
    fn rejects_uninitialized_instance() {
        let (mut host, id) = countdown_host();
        assert!(matches!(host.step_instance(id), Err(HostError::NotInitialized(i)) if i == id));
        assert_eq!(host.state::<Countdown>(id).unwrap().remaining, 0);
    }

    #[test]
    fn bypasses_timer_without_advancing_clock() {
        let (mut host, id) = countdown_host();
        host.run_frames(1, &mut NoopObserver).unwrap();
        let before = host.clock();
        host.step_instance(id).unwrap();
        assert_eq!(host.state::<Countdown>(id).unwrap().remaining, 4);
        assert_eq!(host.clock(), before);
    }

    #[test]
    fn rejects_unknown_and_faulted() {
        let (mut host, _) = countdown_host();
        assert!(matches!(host.step_instance(InstanceId(77)), Err(HostError::InstanceNotFound(_))));

        let victim = InstanceId(1_000);
        let mut host = HostBuilder::new(ten_hz(5)).register("picky", Picky { victim }).build().unwrap();
        host.spawn(host.kind("picky").unwrap(), None).unwrap();
        host.run_frames(1, &mut NoopObserver).unwrap();
        assert!(matches!(host.step_instance(victim), Err(HostError::Faulted(_))));
    }

    #[test]
    fn behavior_error_is_returned_and_faults() {
        let mut host = HostBuilder::new(ten_hz(5)).register("fragile", Fragile).build().unwrap();
        let id = host.spawn(host.kind("fragile").unwrap(), None).unwrap();
        let mut obs = Counting::default();
        host.run(&mut obs).unwrap();
        // its timer never came due, so only a manual step reaches update
        assert!(obs.faults.is_empty());
        assert!(matches!(host.step_instance(id), Err(HostError::Behavior { id: i, .. }) if i == id));
        assert_eq!(host.lifecycle(id), Some(Lifecycle::Faulted));
    }
}

// ── Id exhaustion ─────────────────────────────────────────────────────────────

#[cfg(test)]
mod exhaustion_tests {
    use th_core::ids::PERSISTENT_START;

    use super::*;

    fn tight(burnable: std::ops::Range<u64>) -> IdAllocator {
        IdAllocator::with_ranges(burnable, PERSISTENT_START..PERSISTENT_START + 10)
    }

    #[test]
    fn spawn_fails_when_ids_run_out() {
        let mut host = HostBuilder::new(ten_hz(10))
            .register("countdown", Countdown::default())
            .id_allocator(tight(1_000..1_001))
            .build()
            .unwrap();
        let kind = host.kind("countdown").unwrap();
        host.spawn(kind, None).unwrap();
        assert!(matches!(host.spawn(kind, None), Err(HostError::IdsExhausted)));
        assert_eq!(host.live_count(), 1);
        assert!(host.is_halted());
    }

    #[test]
    fn exhaustion_in_update_stops_the_run() {
        let mut host = HostBuilder::new(ten_hz(200))
            .register("countdown", Countdown::default())
            .id_allocator(tight(1_000..1_002))
            .build()
            .unwrap();
        let id = host.spawn(host.kind("countdown").unwrap(), None).unwrap();
        let mut obs = Counting::default();
        // first update (t = 2 s) takes 1001, second (t = 4 s) finds none
        let result = host.run(&mut obs);
        assert!(matches!(result, Err(HostError::IdsExhausted)));
        assert_eq!(host.clock().frame, 40);
        assert!(obs.faults.is_empty(), "exhaustion is fatal, not a fault");
        assert!(obs.finished.is_none());
        assert_eq!(host.state::<Countdown>(id).unwrap().remaining, 4);
    }

    #[test]
    fn halted_host_refuses_frames_and_steps() {
        let mut host = HostBuilder::new(ten_hz(200))
            .register("countdown", Countdown::default())
            .id_allocator(tight(1_000..1_002))
            .build()
            .unwrap();
        let id = host.spawn(host.kind("countdown").unwrap(), None).unwrap();
        assert!(matches!(host.run(&mut NoopObserver), Err(HostError::IdsExhausted)));
        assert!(host.is_halted());

        let mut obs = Counting::default();
        assert!(matches!(host.run_frames(1, &mut obs), Err(HostError::IdsExhausted)));
        assert_eq!(obs.starts, 0, "no frame may start after a fatal error");
        assert!(matches!(host.step_instance(id), Err(HostError::IdsExhausted)));
        assert_eq!(host.clock().frame, 40);
        assert_eq!(host.state::<Countdown>(id).unwrap().remaining, 4);
    }

    #[test]
    fn ignored_exhaustion_in_step_is_still_fatal() {
        let mut host = HostBuilder::new(ten_hz(200))
            .register("swallower", Swallower { interval: Micros::from_secs(100) })
            .id_allocator(tight(1_000..1_002))
            .build()
            .unwrap();
        let id = host.spawn(host.kind("swallower").unwrap(), None).unwrap();
        host.run_frames(1, &mut NoopObserver).unwrap();

        // takes the last id
        host.step_instance(id).unwrap();
        assert!(!host.is_halted());
        // finds none; the behavior drops the error but the host does not
        assert!(matches!(host.step_instance(id), Err(HostError::IdsExhausted)));
        assert!(host.is_halted());
        assert_eq!(host.state::<Swallower>(id), Some(&2));

        assert!(matches!(host.step_instance(id), Err(HostError::IdsExhausted)));
        assert!(matches!(host.run_frames(1, &mut NoopObserver), Err(HostError::IdsExhausted)));
        assert_eq!(host.state::<Swallower>(id), Some(&2));
        assert_eq!(host.clock().frame, 1);
    }

    #[test]
    fn ignored_exhaustion_in_frame_halts() {
        let mut host = HostBuilder::new(ten_hz(200))
            .register("swallower", Swallower { interval: Micros(100_000) })
            .id_allocator(tight(1_000..1_001))
            .build()
            .unwrap();
        let id = host.spawn(host.kind("swallower").unwrap(), None).unwrap();
        // frame 0 initializes; frame 1 updates and finds no id left
        assert!(matches!(host.run_frames(2, &mut NoopObserver), Err(HostError::IdsExhausted)));
        assert!(host.is_halted());
        assert_eq!(host.clock().frame, 1);
        assert_eq!(host.state::<Swallower>(id), Some(&1));

        assert!(matches!(host.step_instance(id), Err(HostError::IdsExhausted)));
        assert!(matches!(host.run_frames(1, &mut NoopObserver), Err(HostError::IdsExhausted)));
        assert_eq!(host.state::<Swallower>(id), Some(&1));
        assert_eq!(host.clock().frame, 1);
    }
}

// ── Run loop ──────────────────────────────────────────────────────────────────

#[cfg(test)]
mod run_tests {
    use super::*;

    #[test]
    fn run_stops_at_total_frames() {
        let (mut host, _) = countdown_host();
        host.set_total_frames(7);
        assert_eq!(host.config().total_frames, 7);
        assert_eq!(host.config().frame_rate_hz, 10);
        let mut obs = Counting::default();
        host.run(&mut obs).unwrap();
        assert_eq!(obs.starts, 7);
        assert_eq!(obs.ends, 7);
        let finished = obs.finished.unwrap();
        assert_eq!(finished.frame, 7);
        assert_eq!(finished.logic_time, Micros(700_000));
        // already done: a second run is a no-op
        host.run(&mut obs).unwrap();
        assert_eq!(obs.starts, 7);
    }

    #[test]
    fn identical_hosts_produce_identical_results() {
        fn build() -> (Host, Vec<InstanceId>) {
            let mut host = HostBuilder::new(HostConfig { frame_rate_hz: 60, total_frames: 300, num_threads: None })
                .register("countdown", Countdown::default())
                .register("spinner", Spinner { axis: Vec3::Z, period_secs: 4.0, anchor: Vec3::X })
                .build()
                .unwrap();
            let countdown = host.kind("countdown").unwrap();
            let spinner = host.kind("spinner").unwrap();
            let mut ids = Vec::new();
            for i in 0..8 {
                let kind = if i % 2 == 0 { countdown } else { spinner };
                ids.push(host.spawn(kind, Some(Location::at(Vec3::splat(i as f32)))).unwrap());
            }
            host.run(&mut NoopObserver).unwrap();
            (host, ids)
        }

        let (a, ids) = build();
        let (b, _) = build();
        for id in ids {
            assert_eq!(a.location(id), b.location(id));
            assert_eq!(a.state::<Countdown>(id), b.state::<Countdown>(id));
        }
    }

    #[test]
    fn spinner_moves_its_own_location_only() {
        let mut host = HostBuilder::new(ten_hz(10))
            .register("spinner", Spinner::default())
            .register("countdown", Countdown::default())
            .build()
            .unwrap();
        let spun = host.spawn(host.kind("spinner").unwrap(), Some(Location::default())).unwrap();
        let still = host.spawn(host.kind("countdown").unwrap(), Some(Location::at(Vec3::X))).unwrap();
        host.run(&mut NoopObserver).unwrap();
        assert_ne!(host.location(spun).unwrap().scale(), Vec3::ONE);
        assert_eq!(*host.location(still).unwrap(), Location::at(Vec3::X));
    }
}
