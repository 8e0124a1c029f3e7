//! Logical time model.
//!
//! # Design
//!
//! Time is an integer count of microseconds (`Micros`).  The host advances a
//! `GameClock` by a fixed delta once per frame; every behavior invoked during
//! that frame sees the same immutable `FrameClock` snapshot:
//!
//!   logic_time(frame n) = n * delta        (for a fixed-rate host)
//!
//! Integer microseconds keep timer arithmetic exact (no floating-point drift)
//! and make the clock monotonic by construction: `advance` only ever adds an
//! unsigned delta.  Floating-point seconds are derived on demand for
//! animation math.

use std::fmt;

use crate::{CoreError, CoreResult};

// ── Micros ────────────────────────────────────────────────────────────────────

/// An absolute logical time or a duration, in microseconds.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Micros(pub u64);

impl Micros {
    pub const ZERO: Micros = Micros(0);

    #[inline]
    pub const fn from_millis(ms: u64) -> Micros {
        Micros(ms * 1_000)
    }

    #[inline]
    pub const fn from_secs(secs: u64) -> Micros {
        Micros(secs * 1_000_000)
    }

    /// Fractional seconds, truncated toward zero to whole microseconds.
    /// Negative and NaN inputs clamp to zero.
    #[inline]
    pub fn from_secs_f64(secs: f64) -> Micros {
        Micros(convert(secs, TimeUnit::Second, TimeUnit::Microsecond).max(0.0) as u64)
    }

    #[inline]
    pub fn as_secs_f64(self) -> f64 {
        convert(self.0 as f64, TimeUnit::Microsecond, TimeUnit::Second)
    }

    #[inline]
    pub fn as_secs_f32(self) -> f32 {
        self.as_secs_f64() as f32
    }

    #[inline]
    pub fn as_millis_f64(self) -> f64 {
        convert(self.0 as f64, TimeUnit::Microsecond, TimeUnit::Millisecond)
    }

    /// Time elapsed from `earlier` to `self`, zero if `earlier` is later.
    #[inline]
    pub fn saturating_since(self, earlier: Micros) -> Micros {
        Micros(self.0.saturating_sub(earlier.0))
    }
}

impl std::ops::Add for Micros {
    type Output = Micros;
    #[inline]
    fn add(self, rhs: Micros) -> Micros {
        Micros(self.0 + rhs.0)
    }
}

impl std::ops::AddAssign for Micros {
    #[inline]
    fn add_assign(&mut self, rhs: Micros) {
        self.0 += rhs.0;
    }
}

impl std::ops::Sub for Micros {
    type Output = Micros;
    #[inline]
    fn sub(self, rhs: Micros) -> Micros {
        Micros(self.0 - rhs.0)
    }
}

impl fmt::Display for Micros {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{:06}s", self.0 / 1_000_000, self.0 % 1_000_000)
    }
}

// ── Unit conversion ───────────────────────────────────────────────────────────

/// Resolution a time value is expressed in.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum TimeUnit {
    Microsecond,
    Millisecond,
    Second,
}

impl TimeUnit {
    #[inline]
    pub const fn micros_per_unit(self) -> u64 {
        match self {
            TimeUnit::Microsecond => 1,
            TimeUnit::Millisecond => 1_000,
            TimeUnit::Second      => 1_000_000,
        }
    }
}

/// Convert `value` expressed in `from` units to `to` units.
///
/// Pure and deterministic; goes through `f64` so fractional results survive.
#[inline]
pub fn convert(value: f64, from: TimeUnit, to: TimeUnit) -> f64 {
    value * from.micros_per_unit() as f64 / to.micros_per_unit() as f64
}

/// Fixed step for a host running at `hz` frames per second (truncated).
///
/// # Panics
/// Panics if `hz == 0`.
#[inline]
pub const fn delta_for_hz(hz: u32) -> Micros {
    Micros(1_000_000 / hz as u64)
}

pub const DELTA_30:  Micros = delta_for_hz(30);
pub const DELTA_60:  Micros = delta_for_hz(60);
pub const DELTA_144: Micros = delta_for_hz(144);

// ── FrameClock ────────────────────────────────────────────────────────────────

/// Immutable clock snapshot handed to every behavior invoked in one frame.
#[derive(Copy, Clone, PartialEq, Eq, Debug, Default)]
pub struct FrameClock {
    /// Logical time of this frame.
    pub logic_time: Micros,
    /// Step between this frame and the next.
    pub delta: Micros,
    /// Zero-based frame counter.
    pub frame: u64,
}

impl FrameClock {
    /// Logical time in seconds, for animation math.
    #[inline]
    pub fn elapsed_secs(&self) -> f64 {
        self.logic_time.as_secs_f64()
    }

    #[inline]
    pub fn delta_secs(&self) -> f32 {
        self.delta.as_secs_f32()
    }
}

impl fmt::Display for FrameClock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "F{} @ {}", self.frame, self.logic_time)
    }
}

// ── GameClock ─────────────────────────────────────────────────────────────────

/// The host's mutable clock.  Only the frame loop advances it.
#[derive(Clone, Debug)]
pub struct GameClock {
    logic_time: Micros,
    delta:      Micros,
    frame:      u64,
}

impl GameClock {
    pub fn new(delta: Micros) -> Self {
        Self { logic_time: Micros::ZERO, delta, frame: 0 }
    }

    /// Advance one frame by the fixed delta.
    #[inline]
    pub fn advance(&mut self) {
        self.advance_by(self.delta);
    }

    /// Advance one frame by an explicit step (variable-rate hosts).
    #[inline]
    pub fn advance_by(&mut self, step: Micros) {
        self.logic_time += step;
        self.frame += 1;
    }

    #[inline]
    pub fn logic_time(&self) -> Micros {
        self.logic_time
    }

    #[inline]
    pub fn delta(&self) -> Micros {
        self.delta
    }

    #[inline]
    pub fn frame(&self) -> u64 {
        self.frame
    }

    #[inline]
    pub fn snapshot(&self) -> FrameClock {
        FrameClock { logic_time: self.logic_time, delta: self.delta, frame: self.frame }
    }
}

impl fmt::Display for GameClock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.snapshot().fmt(f)
    }
}

// ── HostConfig ────────────────────────────────────────────────────────────────

/// Top-level host configuration.
///
/// Typically loaded from a TOML file by the application crate and passed to
/// the host builder.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct HostConfig {
    /// Fixed frame rate.  The step is `1_000_000 / frame_rate_hz` µs.
    pub frame_rate_hz: u32,

    /// Frames `Host::run` simulates before returning.
    pub total_frames: u64,

    /// Worker thread count for the parallel update phase.  `None` uses all
    /// logical cores.  Ignored without the `parallel` feature.
    pub num_threads: Option<usize>,
}

impl HostConfig {
    /// Check the config describes a runnable host.
    pub fn validate(&self) -> CoreResult<()> {
        if self.frame_rate_hz == 0 || self.frame_rate_hz > 1_000_000 {
            return Err(CoreError::Config(format!(
                "frame_rate_hz must be in 1..=1000000, got {}",
                self.frame_rate_hz
            )));
        }
        if self.num_threads == Some(0) {
            return Err(CoreError::Config("num_threads must be at least 1".into()));
        }
        Ok(())
    }

    /// Fixed step per frame.
    #[inline]
    pub fn delta(&self) -> Micros {
        delta_for_hz(self.frame_rate_hz)
    }

    /// Construct a `GameClock` pre-configured for this run.
    pub fn make_clock(&self) -> GameClock {
        GameClock::new(self.delta())
    }
}

impl Default for HostConfig {
    fn default() -> Self {
        Self { frame_rate_hz: 60, total_frames: 600, num_threads: None }
    }
}
