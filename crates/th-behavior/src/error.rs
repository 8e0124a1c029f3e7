use th_core::{CoreError, InstanceId};
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum BehaviorError {
    #[error("behavior configuration error: {0}")]
    Config(String),

    /// The behavior asked for a location on an instance spawned without one.
    #[error("{0} has no location")]
    NoLocation(InstanceId),

    /// A fault raised by behavior logic itself.
    #[error("behavior fault: {0}")]
    Fault(String),

    #[error(transparent)]
    Core(#[from] CoreError),
}

impl BehaviorError {
    pub fn fault(msg: impl Into<String>) -> Self {
        BehaviorError::Fault(msg.into())
    }

    /// `true` for errors the host must treat as fatal rather than isolating
    /// them to the one instance.
    pub fn is_exhaustion(&self) -> bool {
        matches!(self, BehaviorError::Core(CoreError::IdsExhausted(_)))
    }
}

pub type BehaviorResult<T> = Result<T, BehaviorError>;
