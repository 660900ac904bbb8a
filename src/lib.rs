//! Wayfinder: a declarative, graph-based navigation core
//!
//! Wayfinder manages the back stack of a screen-oriented application:
//! a declarative catalog of named destinations, a pure resolver that
//! turns route strings and deep links into typed destination
//! instances, and a session-scoped controller whose back stack is the
//! single source of truth for what is showing and what back does.
//!
//! Rendering, theming, persistence, and network I/O are the host's
//! responsibility; this crate only tells the host which destination to
//! show and which torn-down entries to clean up after.
//!
//! The [`nav_graph`] crate holds the static half (schema, patterns,
//! resolution); [`nav_runtime`] holds the dynamic half (back stack,
//! controller, observers). This façade re-exports both.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub use nav_graph::{
    ArgSpec, ArgType, ArgValue, DeepLinkConfig, DestinationDef, DestinationInstance,
    GraphResolver, NavTarget, PatternSegment, ResolutionError, ResolveResult, ResolvedArgs,
    RoutePattern, RouteSchema, SchemaBuilder, SchemaError, SchemaResult, SuppliedArgs,
};
pub use nav_runtime::{
    BackDisposition, BackStack, NavError, NavRequest, NavResult, NavigationController,
    NavigationObserver, NavigationUpdate, ObserverRegistry, PopUpTo, StackError, SubscriptionId,
};
