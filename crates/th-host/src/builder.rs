//! Fluent builder for constructing a [`Host`].

use th_behavior::Behavior;
use th_core::{HostConfig, IdAllocator, KindId};
use th_timer::TimerTable;
use tracing::info;

use crate::host::IdIndex;
use crate::table::{KindTable, Population};
use crate::{Host, HostError, HostResult};

/// Fluent builder for [`Host`].
///
/// The set of behavior kinds is closed once [`build`][Self::build] returns;
/// instances of those kinds are spawned on the built host.
///
/// # Example
///
/// ```rust,ignore
/// let mut host = HostBuilder::new(config)
///     .register("countdown", Countdown::default())
///     .register("spinner", Spinner::default())
///     .build()?;
/// let spinner = host.kind("spinner")?;
/// host.spawn(spinner, Some(Location::default()))?;
/// host.run(&mut NoopObserver)?;
/// ```
pub struct HostBuilder {
    config: HostConfig,
    kinds:  Vec<Box<dyn KindTable>>,
    ids:    Option<IdAllocator>,
}

impl HostBuilder {
    pub fn new(config: HostConfig) -> Self {
        Self { config, kinds: Vec::new(), ids: None }
    }

    /// Register a behavior kind under `name`.
    ///
    /// Kind ids are assigned in registration order starting at 0.  Duplicate
    /// names are reported by [`build`][Self::build].
    pub fn register<B: Behavior>(mut self, name: impl Into<String>, behavior: B) -> Self {
        self.kinds.push(Box::new(Population::new(name.into(), behavior)));
        self
    }

    /// Supply the id allocator.  Defaults to [`IdAllocator::new`].
    pub fn id_allocator(mut self, ids: IdAllocator) -> Self {
        self.ids = Some(ids);
        self
    }

    /// Validate the configuration and registrations and return a ready host.
    pub fn build(self) -> HostResult<Host> {
        self.config.validate()?;

        for (i, table) in self.kinds.iter().enumerate() {
            if self.kinds[..i].iter().any(|t| t.name() == table.name()) {
                return Err(HostError::DuplicateKind(table.name().to_string()));
            }
        }
        if self.kinds.len() >= KindId::INVALID.index() {
            return Err(HostError::Config(format!(
                "at most {} behavior kinds, got {}",
                KindId::INVALID.index(),
                self.kinds.len()
            )));
        }

        #[cfg(feature = "parallel")]
        let pool = match self.config.num_threads {
            Some(n) => Some(
                rayon::ThreadPoolBuilder::new()
                    .num_threads(n)
                    .build()
                    .map_err(|e| HostError::Config(format!("thread pool: {e}")))?,
            ),
            None => None,
        };

        info!(
            kinds = self.kinds.len(),
            frame_rate_hz = self.config.frame_rate_hz,
            total_frames = self.config.total_frames,
            "host built"
        );

        Ok(Host {
            clock:  self.config.make_clock(),
            config: self.config,
            ids:    self.ids.unwrap_or_default(),
            timers: TimerTable::new(),
            kinds:  self.kinds,
            index:  IdIndex::default(),
            halted: false,
            #[cfg(feature = "parallel")]
            pool,
        })
    }
}
