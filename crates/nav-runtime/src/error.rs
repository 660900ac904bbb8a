//! Runtime error types
//!
//! Stack errors are recoverable: a rejected transition leaves the
//! stack byte-for-byte unchanged. [`NavError`] is the umbrella the
//! controller reports through its notification channel.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use nav_graph::ResolutionError;

/// Recoverable errors raised by back-stack transitions
#[derive(Debug, Clone, PartialEq, Error, Serialize, Deserialize)]
pub enum StackError {
    /// Popping the last remaining entry requires explicit session
    /// termination
    #[error("Cannot pop the root entry without terminating the session")]
    CannotPopRoot,

    /// `popUpTo` target is not present in the stack
    #[error("Destination `{0}` is not in the back stack")]
    TargetNotInStack(String),

    /// The navigation session has already been torn down
    #[error("Navigation session has been terminated")]
    SessionTerminated,
}

/// Umbrella error reported by the navigation controller
#[derive(Debug, Clone, PartialEq, Error, Serialize, Deserialize)]
pub enum NavError {
    /// The request could not be resolved to a destination
    #[error(transparent)]
    Resolution(#[from] ResolutionError),

    /// The resolved request was rejected by the back stack
    #[error(transparent)]
    Stack(#[from] StackError),
}

/// Result type for controller operations
pub type NavResult<T> = std::result::Result<T, NavError>;
