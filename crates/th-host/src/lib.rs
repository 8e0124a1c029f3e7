//! `th-host`: the reference host that drives behavior instances frame by
//! frame.
//!
//! # Quick start
//!
//! ```rust,ignore
//! use th_behavior::{Countdown, Spinner};
//! use th_core::{HostConfig, Location};
//! use th_host::{HostBuilder, NoopObserver};
//!
//! let mut host = HostBuilder::new(HostConfig::default())
//!     .register("countdown", Countdown::default())
//!     .register("spinner", Spinner::default())
//!     .build()?;
//!
//! host.spawn(host.kind("countdown")?, None)?;
//! host.spawn(host.kind("spinner")?, Some(Location::default()))?;
//! host.run(&mut NoopObserver)?;
//! ```
//!
//! # Guarantees
//!
//! - `initialize` runs exactly once per instance, in the first frame after
//!   spawn, and before any `update`.
//! - All callbacks within a frame observe the same logical time; time never
//!   decreases across frames.
//! - A behavior error disables only the instance that raised it.
//! - Id exhaustion is fatal: the frame loop returns
//!   [`HostError::IdsExhausted`].
//!
//! # Feature flags
//!
//! | Feature    | Effect                                                  |
//! |------------|---------------------------------------------------------|
//! | `parallel` | Runs the update phase on Rayon's thread pool.           |
//! | `fx-hash`  | FxHash for the instance index and the timer table.      |

pub mod builder;
pub mod error;
pub mod host;
pub mod observer;
mod table;

#[cfg(test)]
mod tests;

pub use builder::HostBuilder;
pub use error::{HostError, HostResult};
pub use host::Host;
pub use observer::{Fault, FrameReport, HostObserver, NoopObserver, Phase};
pub use table::Lifecycle;
