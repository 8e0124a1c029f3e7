//! `th-behavior`: the behavior contract and stock behaviors.
//!
//! # Crate layout
//!
//! | Module        | Contents                                                    |
//! |---------------|-------------------------------------------------------------|
//! | [`model`]     | `Behavior` trait (`initialize`, `update`, `State`)          |
//! | [`context`]   | `Context<'a>`: clock, ids, timers, own location             |
//! | [`noop`]      | `NoopBehavior`: placeholder that never does anything        |
//! | [`countdown`] | `Countdown`: stateful, timer-driven counter                 |
//! | [`spinner`]   | `Spinner`: stateless scale pulse and rotation               |
//! | [`error`]     | `BehaviorError`, `BehaviorResult<T>`                        |
//!
//! # Lifecycle
//!
//! ```text
//! Uninitialized ──initialize──▶ Initialized ──update──▶ Initialized …
//!        │                           │
//!        └────── error ──▶ Faulted ◀─┘        (despawn from any state → Destroyed)
//! ```
//!
//! The host owns the state machine; behaviors only see the two callbacks.
//! An error returned from either callback disables that one instance and
//! never stops the frame for the others.

pub mod context;
pub mod countdown;
pub mod error;
pub mod model;
pub mod noop;
pub mod spinner;


pub use context::Context;
pub use countdown::{Countdown, CountdownState};
pub use error::{BehaviorError, BehaviorResult};
pub use model::Behavior;
pub use noop::NoopBehavior;
pub use spinner::Spinner;
