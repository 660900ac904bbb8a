//! Route schema and graph resolution for Wayfinder
//!
//! This crate holds the static half of the navigation core: the
//! declarative catalog of destinations and the pure resolver that
//! turns route strings and deep-link URIs into typed destination
//! instances.
//!
//! # Modules
//!
//! - [`args`] - Typed argument model with strict coercion
//! - [`pattern`] - Route templates, matching, and specificity
//! - [`schema`] - Destination definitions and the immutable schema
//! - [`resolver`] - Route and deep-link resolution
//! - [`error`] - Schema and resolution error taxonomy
//!
//! # Example
//!
//! ```rust
//! use nav_graph::{ArgType, DestinationDef, GraphResolver, RouteSchema, SuppliedArgs};
//! use std::sync::Arc;
//!
//! let mut builder = RouteSchema::builder();
//! builder.register(DestinationDef::new("home", "home").unwrap()).unwrap();
//! builder
//!     .register(
//!         DestinationDef::new("details", "details/{itemId}")
//!             .unwrap()
//!             .arg("itemId", ArgType::Integer),
//!     )
//!     .unwrap();
//!
//! let resolver = GraphResolver::new(Arc::new(builder.build()));
//! let instance = resolver.resolve("details/42", &SuppliedArgs::new()).unwrap();
//! assert_eq!(instance.arg("itemId").unwrap().as_integer(), Some(42));
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod args;
pub mod error;
pub mod pattern;
pub mod resolver;
pub mod schema;

// Re-export commonly used types
pub use args::{ArgSpec, ArgType, ArgValue, ResolvedArgs, SuppliedArgs};
pub use error::{ResolutionError, ResolveResult, SchemaError, SchemaResult};
pub use pattern::{PatternSegment, RoutePattern};
pub use resolver::{DeepLinkConfig, DestinationInstance, GraphResolver, NavTarget};
pub use schema::{DestinationDef, RouteSchema, SchemaBuilder};
