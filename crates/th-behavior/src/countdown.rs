//! Stateful sample: a counter ticked by its own repeating timer.

use th_core::{InstanceId, Micros};
use th_timer::TimerMode;
use tracing::{debug, info};

use crate::{Behavior, BehaviorResult, Context};

/// Counts down from `start`, one step per timer firing.
///
/// On initialize the instance arms a repeating timer on itself, so updates
/// arrive every `interval` of logical time rather than every frame.  Each
/// update burns a fresh id and decrements the counter.
///
/// The counter is not clamped: without `stop_at_zero` it keeps going
/// negative.  With `stop_at_zero` the instance stops its own timer on the
/// update that reaches zero and receives no further updates.
#[derive(Clone, Debug)]
pub struct Countdown {
    pub start:        i64,
    pub interval:     Micros,
    pub stop_at_zero: bool,
}

impl Default for Countdown {
    fn default() -> Self {
        Self { start: 5, interval: Micros::from_secs(2), stop_at_zero: false }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CountdownState {
    pub remaining:   i64,
    pub updates:     u64,
    /// Most recent id burned by an update.
    pub last_burned: InstanceId,
}

impl Behavior for Countdown {
    type State = CountdownState;

    fn initialize(&self, id: InstanceId, state: &mut CountdownState, ctx: &mut Context<'_>) -> BehaviorResult<()> {
        state.remaining = self.start;
        ctx.activate_timer(id, self.interval, TimerMode::Repeat);
        info!(%id, start = self.start, interval = %self.interval, "countdown armed");
        Ok(())
    }

    fn update(&self, id: InstanceId, state: &mut CountdownState, ctx: &mut Context<'_>) -> BehaviorResult<()> {
        state.last_burned = ctx.burn_id()?;
        state.remaining -= 1;
        state.updates += 1;
        debug!(%id, remaining = state.remaining, burned = %state.last_burned, now = %ctx.now(), "countdown");

        if self.stop_at_zero && state.remaining == 0 {
            ctx.stop_timer(id);
            info!(%id, "countdown reached zero, timer stopped");
        }
        Ok(())
    }
}
