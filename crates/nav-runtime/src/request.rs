//! Navigation requests
//!
//! A request is a transient value: the target, argument overrides,
//! and an optional pop policy applied before the push.

use serde::{Deserialize, Serialize};

use nav_graph::{ArgValue, NavTarget, SuppliedArgs};

/// Pop policy: clear entries up to (and optionally including) a
/// destination before pushing the target
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PopUpTo {
    /// Destination id to pop up to
    pub destination: String,
    /// Whether the matched entry is removed too
    pub inclusive: bool,
}

/// A declarative navigation request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NavRequest {
    /// Where to navigate
    pub target: NavTarget,
    /// Out-of-band argument overrides
    pub args: SuppliedArgs,
    /// Entries to clear before pushing
    pub pop_up_to: Option<PopUpTo>,
    /// Replace the top instead of pushing a consecutive duplicate of
    /// the same definition
    pub single_top: bool,
}

impl NavRequest {
    /// Request navigation to a route string
    pub fn route(route: impl Into<String>) -> Self {
        Self {
            target: NavTarget::Route(route.into()),
            args: SuppliedArgs::new(),
            pop_up_to: None,
            single_top: false,
        }
    }

    /// Request navigation to a destination by id
    pub fn definition(id: impl Into<String>) -> Self {
        Self {
            target: NavTarget::Definition(id.into()),
            args: SuppliedArgs::new(),
            pop_up_to: None,
            single_top: false,
        }
    }

    /// Supply an out-of-band argument
    pub fn arg(mut self, name: impl Into<String>, value: impl Into<ArgValue>) -> Self {
        self.args.insert(name.into(), value.into());
        self
    }

    /// Clear entries up to `destination` before pushing
    pub fn pop_up_to(mut self, destination: impl Into<String>, inclusive: bool) -> Self {
        self.pop_up_to = Some(PopUpTo {
            destination: destination.into(),
            inclusive,
        });
        self
    }

    /// Launch single-top: replace the top entry when it already shows
    /// the same definition
    pub fn single_top(mut self) -> Self {
        self.single_top = true;
        self
    }
}
