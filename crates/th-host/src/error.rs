use th_behavior::BehaviorError;
use th_core::{CoreError, InstanceId, KindId};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum HostError {
    #[error("host configuration error: {0}")]
    Config(String),

    #[error("behavior kind {0:?} registered twice")]
    DuplicateKind(String),

    #[error("no behavior kind named {0:?}")]
    UnknownKindName(String),

    #[error("{0} is not a registered behavior kind")]
    UnknownKind(KindId),

    #[error("{0} not found")]
    InstanceNotFound(InstanceId),

    /// Update dispatched before the instance's initialize completed.
    #[error("{0} has not been initialized")]
    NotInitialized(InstanceId),

    #[error("{0} is faulted and no longer ticked")]
    Faulted(InstanceId),

    #[error("{id} faulted: {source}")]
    Behavior {
        id:     InstanceId,
        #[source]
        source: BehaviorError,
    },

    /// The id allocator ran dry.  Fatal: the run cannot continue.
    #[error("id allocator exhausted")]
    IdsExhausted,
}

impl From<CoreError> for HostError {
    fn from(e: CoreError) -> Self {
        match e {
            CoreError::IdsExhausted(_) => HostError::IdsExhausted,
            CoreError::Config(msg)     => HostError::Config(msg),
        }
    }
}

pub type HostResult<T> = Result<T, HostError>;
