//! Framework error type.
//!
//! Sub-crates define their own error enums and wrap `CoreError` as one
//! variant via `#[from]`, so allocator exhaustion keeps its identity all the
//! way up to the host.

use thiserror::Error;

use crate::ids::IdKind;

/// The top-level error type for `th-core` and a common base for sub-crates.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CoreError {
    #[error("{0} id space exhausted")]
    IdsExhausted(IdKind),

    #[error("configuration error: {0}")]
    Config(String),
}

/// Shorthand result type for all `th-*` crates.
pub type CoreResult<T> = Result<T, CoreError>;
