//! Typed navigation arguments
//!
//! Route segments arrive as text; destinations declare the type each
//! placeholder must carry. Coercion is strict: a non-numeric string
//! offered to an integer placeholder is a typed failure, never a
//! silent default.

use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::ResolutionError;

/// Declared type of a destination argument
///
/// A closed set of decoders; extending it means adding a variant here
/// and a branch in [`ArgType::coerce`], not reflection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ArgType {
    /// Signed 64-bit integer
    Integer,
    /// UTF-8 string
    String,
    /// Boolean, spelled exactly `true` or `false`
    Boolean,
}

impl ArgType {
    /// Coerce a raw (already percent-decoded) string to this type
    pub fn coerce(&self, name: &str, raw: &str) -> Result<ArgValue, ResolutionError> {
        match self {
            ArgType::Integer => raw
                .parse::<i64>()
                .map(ArgValue::Integer)
                .map_err(|_| ResolutionError::ArgumentTypeMismatch {
                    name: name.to_string(),
                    expected: *self,
                    got: raw.to_string(),
                }),
            ArgType::String => Ok(ArgValue::String(raw.to_string())),
            ArgType::Boolean => match raw {
                "true" => Ok(ArgValue::Boolean(true)),
                "false" => Ok(ArgValue::Boolean(false)),
                _ => Err(ResolutionError::ArgumentTypeMismatch {
                    name: name.to_string(),
                    expected: *self,
                    got: raw.to_string(),
                }),
            },
        }
    }
}

impl fmt::Display for ArgType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArgType::Integer => write!(f, "integer"),
            ArgType::String => write!(f, "string"),
            ArgType::Boolean => write!(f, "boolean"),
        }
    }
}

/// A concrete, decoded argument value
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ArgValue {
    /// Integer value
    Integer(i64),
    /// String value
    String(String),
    /// Boolean value
    Boolean(bool),
}

impl ArgValue {
    /// The type this value carries
    pub fn type_of(&self) -> ArgType {
        match self {
            ArgValue::Integer(_) => ArgType::Integer,
            ArgValue::String(_) => ArgType::String,
            ArgValue::Boolean(_) => ArgType::Boolean,
        }
    }

    /// Integer payload, if this is an integer
    pub fn as_integer(&self) -> Option<i64> {
        match self {
            ArgValue::Integer(v) => Some(*v),
            _ => None,
        }
    }

    /// String payload, if this is a string
    pub fn as_str(&self) -> Option<&str> {
        match self {
            ArgValue::String(v) => Some(v),
            _ => None,
        }
    }

    /// Boolean payload, if this is a boolean
    pub fn as_boolean(&self) -> Option<bool> {
        match self {
            ArgValue::Boolean(v) => Some(*v),
            _ => None,
        }
    }
}

impl fmt::Display for ArgValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArgValue::Integer(v) => write!(f, "{}", v),
            ArgValue::String(v) => write!(f, "{}", v),
            ArgValue::Boolean(v) => write!(f, "{}", v),
        }
    }
}

impl From<i64> for ArgValue {
    fn from(v: i64) -> Self {
        ArgValue::Integer(v)
    }
}

impl From<&str> for ArgValue {
    fn from(v: &str) -> Self {
        ArgValue::String(v.to_string())
    }
}

impl From<String> for ArgValue {
    fn from(v: String) -> Self {
        ArgValue::String(v)
    }
}

impl From<bool> for ArgValue {
    fn from(v: bool) -> Self {
        ArgValue::Boolean(v)
    }
}

/// Declared spec for one destination argument
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArgSpec {
    /// Declared type
    pub ty: ArgType,
    /// Default used when no value is supplied
    pub default: Option<ArgValue>,
}

impl ArgSpec {
    /// A required argument of the given type
    pub fn required(ty: ArgType) -> Self {
        Self { ty, default: None }
    }

    /// An argument whose type is inferred from its default value
    pub fn with_default(default: impl Into<ArgValue>) -> Self {
        let default = default.into();
        Self {
            ty: default.type_of(),
            default: Some(default),
        }
    }
}

/// Out-of-band arguments supplied alongside a route string
pub type SuppliedArgs = HashMap<String, ArgValue>;

/// Arguments resolved onto a destination instance
pub type ResolvedArgs = HashMap<String, ArgValue>;
