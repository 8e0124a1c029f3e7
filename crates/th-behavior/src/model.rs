//! The `Behavior` trait: the main extension point for user code.

use th_core::InstanceId;

use crate::{BehaviorResult, Context};

/// Pluggable per-instance logic.
///
/// The host calls [`initialize`][Self::initialize] exactly once per instance,
/// before the first [`update`][Self::update], and then `update` once per
/// frame on which the instance is due (every frame unless a timer says
/// otherwise).
///
/// # Instance state
///
/// Mutable per-instance data lives in [`State`][Self::State], never in the
/// behavior value itself: one behavior value serves every instance of its
/// kind.  The host creates `State::default()` at spawn time and hands each
/// callback an exclusive `&mut` to that instance's state.  Stateless
/// behaviors use `type State = ();` and implement only `update`.
///
/// # Thread safety
///
/// With the host's `parallel` feature, `update` runs for many instances at
/// once on Rayon workers, so implementations must be `Send + Sync`.  A
/// single instance is never updated concurrently with itself.
///
/// # Example
///
/// ```rust,ignore
/// struct Blink;
///
/// impl Behavior for Blink {
///     type State = bool;
///
///     fn update(&self, _id: InstanceId, lit: &mut bool, ctx: &mut Context<'_>) -> BehaviorResult<()> {
///         *lit = !*lit;
///         ctx.set_scale(Vec3::splat(if *lit { 1.0 } else { 0.0 }))
///     }
/// }
/// ```
pub trait Behavior: Send + Sync + 'static {
    /// Per-instance scratch state.
    type State: Default + Send + Sync + 'static;

    /// One-time setup for `id`.  May prepare `state` and request timers.
    ///
    /// Default: does nothing.
    fn initialize(
        &self,
        _id:    InstanceId,
        _state: &mut Self::State,
        _ctx:   &mut Context<'_>,
    ) -> BehaviorResult<()> {
        Ok(())
    }

    /// Per-frame step for `id`.
    fn update(
        &self,
        id:    InstanceId,
        state: &mut Self::State,
        ctx:   &mut Context<'_>,
    ) -> BehaviorResult<()>;
}
