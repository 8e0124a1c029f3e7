//! A no-op behavior: instances never do anything.

use th_core::InstanceId;

use crate::{Behavior, BehaviorResult, Context};

/// A [`Behavior`] whose update does nothing.
///
/// Useful as a placeholder in tests or for passive instances that only
/// occupy an id and a location.
pub struct NoopBehavior;

impl Behavior for NoopBehavior {
    type State = ();

    fn update(&self, _id: InstanceId, _state: &mut (), _ctx: &mut Context<'_>) -> BehaviorResult<()> {
        Ok(())
    }
}
