//! Navigation runtime for Wayfinder
//!
//! The dynamic half of the navigation core: the back stack that is
//! the single source of truth for the visible screen, the controller
//! façade that serializes mutations, and the observer bridge through
//! which a host UI layer rebuilds itself.
//!
//! # Modules
//!
//! - [`stack`] - Ordered, never-empty back stack
//! - [`request`] - Declarative navigation requests and pop policies
//! - [`controller`] - Session-scoped navigation controller
//! - [`observer`] - Stack-change subscription contract
//! - [`error`] - Stack and controller error taxonomy
//!
//! # Example
//!
//! ```rust
//! use nav_graph::{ArgType, DestinationDef, GraphResolver, RouteSchema};
//! use nav_runtime::{NavRequest, NavigationController};
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
//! let resolver = GraphResolver::new(Arc::new(builder.build()));
//!
//! let controller =
//!     NavigationController::new(resolver, &NavRequest::route("home")).unwrap();
//! controller.navigate(&NavRequest::route("details/42")).unwrap();
//! assert_eq!(
//!     controller.current_destination().unwrap().definition_id,
//!     "details"
//! );
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod controller;
pub mod error;
pub mod observer;
pub mod request;
pub mod stack;

// Re-export commonly used types
pub use controller::{BackDisposition, NavigationController};
pub use error::{NavError, NavResult, StackError};
pub use observer::{NavigationObserver, NavigationUpdate, ObserverRegistry, SubscriptionId};
pub use request::{NavRequest, PopUpTo};
pub use stack::BackStack;
