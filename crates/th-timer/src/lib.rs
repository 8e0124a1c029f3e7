//! `th-timer`: update timers keyed by instance id.
//!
//! # Crate layout
//!
//! | Module       | Contents                                                   |
//! |--------------|------------------------------------------------------------|
//! | [`trigger`]  | `TimerMode` (`Once`, `Repeat`, `Stop`), `Trigger`          |
//! | [`table`]    | `TimerTable`: `id → Trigger` map polled once per frame     |
//! | [`request`]  | `TimerRequest`, `TimerAction`: buffered behavior requests  |
//!
//! # Firing model (summary)
//!
//! An instance with no trigger is updated every frame.  With a trigger it is
//! updated only on frames where the trigger fires:
//!
//! ```text
//! Repeat: fires when next_fire ≤ now, then next_fire += interval
//! Once:   fires when next_fire ≤ now, then becomes Stop
//! Stop:   never fires (instance suspended until re-activated or reset)
//! ```
//!
//! Drift per firing is at most one frame delta: `next_fire` advances by the
//! nominal interval, not from the frame that happened to observe it.

pub mod request;
pub mod table;
pub mod trigger;


pub use request::{TimerAction, TimerRequest};
pub use table::TimerTable;
pub use trigger::{TimerMode, Trigger};
