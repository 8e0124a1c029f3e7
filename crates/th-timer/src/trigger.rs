//! A single timer registration.

use std::fmt;

use th_core::Micros;

/// How a [`Trigger`] behaves once it fires.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
pub enum TimerMode {
    /// Fire a single time, then behave like `Stop`.
    Once,
    /// Fire every `interval`.
    Repeat,
    /// Never fire.  The owning instance is not updated.
    Stop,
}

impl fmt::Display for TimerMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            TimerMode::Once   => "once",
            TimerMode::Repeat => "repeat",
            TimerMode::Stop   => "stop",
        })
    }
}

/// Decides on which frames an instance gets its update.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub struct Trigger {
    /// Earliest logical time at which the trigger fires next.
    pub next_fire: Micros,
    /// Period for `Repeat`, delay for `Once`.
    pub interval:  Micros,
    pub mode:      TimerMode,
}

impl Trigger {
    /// Trigger armed at `now` that first fires at `now + interval`.
    pub fn armed(now: Micros, interval: Micros, mode: TimerMode) -> Self {
        Self { next_fire: Micros(now.0.saturating_add(interval.0)), interval, mode }
    }

    /// A registration that never fires.
    pub fn stopped() -> Self {
        Self { next_fire: Micros(u64::MAX), interval: Micros::ZERO, mode: TimerMode::Stop }
    }

    /// `true` if the trigger fires at `now`; advances internal state when it does.
    pub fn poll(&mut self, now: Micros) -> bool {
        match self.mode {
            TimerMode::Stop => false,
            _ if now < self.next_fire => false,
            TimerMode::Once => {
                self.mode = TimerMode::Stop;
                true
            }
            TimerMode::Repeat => {
                self.next_fire = Micros(self.next_fire.0.saturating_add(self.interval.0));
                // A frame longer than the interval must not queue a burst of
                // catch-up firings.
                if self.next_fire <= now {
                    self.next_fire = Micros(now.0.saturating_add(self.interval.0));
                }
                true
            }
        }
    }

    #[inline]
    pub fn is_stopped(&self) -> bool {
        self.mode == TimerMode::Stop
    }
}
