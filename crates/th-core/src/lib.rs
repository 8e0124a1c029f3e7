//! `th-core`: foundational types for the tick-host behavior framework.
//!
//! This crate is a dependency of every other `th-*` crate.  It has no `th-*`
//! dependencies and few external ones (`glam`, `thiserror`, optional `serde`).
//!
//! # What lives here
//!
//! | Module         | Contents                                                     |
//! |----------------|--------------------------------------------------------------|
//! | [`ids`]        | `InstanceId`, `KindId`, `IdAllocator`                        |
//! | [`time`]       | `Micros`, `GameClock`, `FrameClock`, `HostConfig`, `convert` |
//! | [`math`]       | `Vec3`, `Quat`, `axis_angle`, `rotate`, `deg_to_rad`         |
//! | [`location`]   | `Location` (position / orientation / scale)                  |
//! | [`error`]      | `CoreError`, `CoreResult`                                    |
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                     |
//! |---------|------------------------------------------------------------|
//! | `serde` | Adds `Serialize`/`Deserialize` to ids, time, config, and   |
//! |         | `Location`.                                                |

pub mod error;
pub mod ids;
pub mod location;
pub mod math;
pub mod time;


// ── Re-exports ────────────────────────────────────────────────────────────────

pub use error::{CoreError, CoreResult};
pub use ids::{IdAllocator, IdKind, InstanceId, KindId};
pub use location::Location;
pub use math::{Quat, Vec3};
pub use time::{FrameClock, GameClock, HostConfig, Micros, TimeUnit};
