//! Error types for schema construction and route resolution
//!
//! Two families with different severities: [`SchemaError`] is fatal and
//! aborts session construction, [`ResolutionError`] is recoverable and
//! the caller decides the fallback (typically the start destination).

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::args::ArgType;

/// Fatal errors raised while building a route schema
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SchemaError {
    /// A destination id was registered twice
    #[error("Duplicate destination id: {0}")]
    DuplicateId(String),

    /// A route pattern or its argument specs are inconsistent
    #[error("Malformed pattern `{pattern}`: {reason}")]
    MalformedPattern {
        /// The offending pattern text
        pattern: String,
        /// What was wrong with it
        reason: String,
    },
}

/// Recoverable errors raised while resolving a navigation request
#[derive(Debug, Clone, PartialEq, Error, Serialize, Deserialize)]
pub enum ResolutionError {
    /// No destination registered under the requested id
    #[error("Unknown destination: {0}")]
    UnknownDestination(String),

    /// No registered pattern matches the route string
    #[error("No matching route for `{0}`")]
    NoMatchingRoute(String),

    /// An argument value could not be coerced to its declared type
    #[error("Argument `{name}` expected {expected}, got `{got}`")]
    ArgumentTypeMismatch {
        /// Argument name
        name: String,
        /// Declared type
        expected: ArgType,
        /// The raw value that failed to coerce
        got: String,
    },

    /// A required argument has neither a value nor a default
    #[error("Missing required argument `{name}` for destination `{destination}`")]
    MissingRequiredArgument {
        /// Destination id
        destination: String,
        /// Argument name
        name: String,
    },

    /// An external URI could not be mapped onto any destination
    #[error("Unresolved deep link `{uri}`: {reason}")]
    UnresolvedDeepLink {
        /// The URI as received
        uri: String,
        /// Why it was rejected
        reason: String,
    },
}

/// Result type for schema construction
pub type SchemaResult<T> = std::result::Result<T, SchemaError>;

/// Result type for resolution operations
pub type ResolveResult<T> = std::result::Result<T, ResolutionError>;
