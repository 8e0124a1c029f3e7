//! TOML run description for the demo.

use std::path::Path;

use anyhow::{Context, Result, bail};
use serde::Deserialize;
use th_behavior::{Countdown, Spinner};
use th_core::{HostConfig, Location, Micros, Vec3};

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct RunConfig {
    pub host:      HostConfig,
    pub countdown: CountdownConfig,
    pub spinner:   SpinnerConfig,
    pub instances: Vec<InstanceGroup>,
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct CountdownConfig {
    pub start:         i64,
    pub interval_secs: f64,
    pub stop_at_zero:  bool,
}

impl Default for CountdownConfig {
    fn default() -> Self {
        Self { start: 5, interval_secs: 2.0, stop_at_zero: false }
    }
}

impl CountdownConfig {
    pub fn behavior(&self) -> Countdown {
        Countdown {
            start:        self.start,
            interval:     Micros::from_secs_f64(self.interval_secs),
            stop_at_zero: self.stop_at_zero,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct SpinnerConfig {
    pub axis:        Vec3,
    pub period_secs: f64,
    pub anchor:      Vec3,
}

impl Default for SpinnerConfig {
    fn default() -> Self {
        let d = Spinner::default();
        Self { axis: d.axis, period_secs: d.period_secs, anchor: d.anchor }
    }
}

impl SpinnerConfig {
    pub fn behavior(&self) -> Spinner {
        Spinner { axis: self.axis, period_secs: self.period_secs, anchor: self.anchor }
    }
}

/// `count` instances of one kind, all spawned at `position`.
#[derive(Debug, Deserialize)]
pub struct InstanceGroup {
    pub kind:     String,
    #[serde(default = "one")]
    pub count:    usize,
    /// Omit to spawn without a location.  Spinners need one.
    pub position: Option<Vec3>,
}

fn one() -> usize {
    1
}

impl InstanceGroup {
    pub fn location(&self) -> Option<Location> {
        self.position.map(Location::at)
    }
}

impl RunConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading {}", path.display()))?;
        let config: RunConfig =
            toml::from_str(&text).with_context(|| format!("parsing {}", path.display()))?;
        if config.countdown.interval_secs < 0.0 {
            bail!("countdown.interval_secs must not be negative");
        }
        Ok(config)
    }

    /// One countdown and one spinner, used when no file is given.
    pub fn builtin() -> Self {
        Self {
            instances: vec![
                InstanceGroup { kind: "countdown".into(), count: 1, position: None },
                InstanceGroup { kind: "spinner".into(), count: 1, position: Some(Vec3::ZERO) },
            ],
            ..Self::default()
        }
    }
}
