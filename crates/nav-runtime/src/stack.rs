//! The back stack: ordered history of destination instances
//!
//! Bottom entry is the start destination, top is the visible screen.
//! The stack is the single source of truth for "what is showing"; it
//! is mutated only by the navigation controller and never observed
//! empty while the session is alive. Every transition checks its
//! preconditions before mutating, so a rejected transition leaves the
//! stack unchanged.

use serde::{Deserialize, Serialize};

use nav_graph::DestinationInstance;

use crate::error::StackError;

/// Ordered, never-empty sequence of destination instances
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BackStack {
    entries: Vec<DestinationInstance>,
}

impl BackStack {
    /// Create a stack holding the start destination
    pub fn new(start: DestinationInstance) -> Self {
        Self {
            entries: vec![start],
        }
    }

    /// The currently visible destination (top of stack)
    pub fn current(&self) -> &DestinationInstance {
        self.entries.last().expect("back stack is never empty")
    }

    /// All entries, bottom to top
    pub fn entries(&self) -> &[DestinationInstance] {
        &self.entries
    }

    /// Number of entries
    pub fn depth(&self) -> usize {
        self.entries.len()
    }

    /// Whether a pop would succeed
    pub fn can_pop(&self) -> bool {
        self.entries.len() > 1
    }

    /// Whether any entry references the given definition
    pub fn contains(&self, definition_id: &str) -> bool {
        self.entries
            .iter()
            .any(|e| e.definition_id == definition_id)
    }

    /// Append an instance on top
    pub fn push(&mut self, instance: DestinationInstance) {
        debug_assert!(
            !self
                .entries
                .iter()
                .any(|e| e.entry_key == instance.entry_key),
            "entry keys must be unique across the stack"
        );
        self.entries.push(instance);
    }

    /// Remove and return the top entry
    ///
    /// Popping the last entry is not a pop, it is session termination,
    /// which the host must request explicitly.
    pub fn pop(&mut self) -> Result<DestinationInstance, StackError> {
        if self.entries.len() <= 1 {
            return Err(StackError::CannotPopRoot);
        }
        Ok(self.entries.pop().expect("length checked above"))
    }

    /// Remove entries above (and optionally including) the first
    /// occurrence of `definition_id`, counted from the bottom
    ///
    /// Returns removed entries top-first, for teardown notification.
    /// Refuses to empty the stack: an inclusive pop of the root is
    /// [`StackError::CannotPopRoot`].
    pub fn pop_up_to(
        &mut self,
        definition_id: &str,
        inclusive: bool,
    ) -> Result<Vec<DestinationInstance>, StackError> {
        self.pop_up_to_inner(definition_id, inclusive, false)
    }

    /// `pop_up_to` variant used when a push follows in the same atomic
    /// operation, so transiently emptying the stack is never observed
    pub(crate) fn pop_up_to_allowing_empty(
        &mut self,
        definition_id: &str,
        inclusive: bool,
    ) -> Result<Vec<DestinationInstance>, StackError> {
        self.pop_up_to_inner(definition_id, inclusive, true)
    }

    fn pop_up_to_inner(
        &mut self,
        definition_id: &str,
        inclusive: bool,
        allow_empty: bool,
    ) -> Result<Vec<DestinationInstance>, StackError> {
        let position = self
            .entries
            .iter()
            .position(|e| e.definition_id == definition_id)
            .ok_or_else(|| StackError::TargetNotInStack(definition_id.to_string()))?;

        let keep = if inclusive { position } else { position + 1 };
        if keep == 0 && !allow_empty {
            return Err(StackError::CannotPopRoot);
        }

        let removed = self.entries.split_off(keep);
        Ok(removed.into_iter().rev().collect())
    }

    /// Atomically swap the top entry, returning the old one
    pub fn replace_top(&mut self, instance: DestinationInstance) -> DestinationInstance {
        let old = self.entries.pop().expect("back stack is never empty");
        self.entries.push(instance);
        old
    }

    /// Tear down every entry, top-first; only valid at session end
    pub(crate) fn drain_for_termination(&mut self) -> Vec<DestinationInstance> {
        let mut removed = std::mem::take(&mut self.entries);
        removed.reverse();
        removed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nav_graph::ResolvedArgs;

    fn instance(id: &str) -> DestinationInstance {
        DestinationInstance::new(id, ResolvedArgs::new())
    }

    #[test]
    fn test_push_pop() {
        let mut stack = BackStack::new(instance("home"));
        assert_eq!(stack.depth(), 1);
        assert!(!stack.can_pop());

        stack.push(instance("details"));
        assert_eq!(stack.depth(), 2);
        assert_eq!(stack.current().definition_id, "details");

        let popped = stack.pop().unwrap();
        assert_eq!(popped.definition_id, "details");
        assert_eq!(stack.current().definition_id, "home");
    }

    #[test]
    fn test_pop_root_rejected() {
        let mut stack = BackStack::new(instance("home"));
        assert_eq!(stack.pop().unwrap_err(), StackError::CannotPopRoot);
        assert_eq!(stack.depth(), 1);
    }

    #[test]
    fn test_pop_up_to_exclusive_keeps_first_occurrence() {
        let mut stack = BackStack::new(instance("home"));
        stack.push(instance("details"));
        stack.push(instance("details"));

        let removed = stack.pop_up_to("details", false).unwrap();
        assert_eq!(removed.len(), 1);
        assert_eq!(stack.depth(), 2);
        assert_eq!(stack.current().definition_id, "details");
    }

    #[test]
    fn test_pop_up_to_inclusive_removes_occurrence() {
        let mut stack = BackStack::new(instance("home"));
        stack.push(instance("details"));
        stack.push(instance("settings"));

        let removed = stack.pop_up_to("details", true).unwrap();
        assert_eq!(removed.len(), 2);
        assert_eq!(removed[0].definition_id, "settings");
        assert_eq!(removed[1].definition_id, "details");
        assert_eq!(stack.current().definition_id, "home");
    }

    #[test]
    fn test_pop_up_to_missing_target_leaves_stack_unchanged() {
        let mut stack = BackStack::new(instance("home"));
        stack.push(instance("details"));
        let before = stack.clone();

        assert_eq!(
            stack.pop_up_to("settings", false).unwrap_err(),
            StackError::TargetNotInStack("settings".to_string())
        );
        assert_eq!(stack, before);
    }

    #[test]
    fn test_pop_up_to_inclusive_root_rejected() {
        let mut stack = BackStack::new(instance("home"));
        stack.push(instance("details"));
        let before = stack.clone();

        assert_eq!(
            stack.pop_up_to("home", true).unwrap_err(),
            StackError::CannotPopRoot
        );
        assert_eq!(stack, before);
    }

    #[test]
    fn test_replace_top() {
        let mut stack = BackStack::new(instance("home"));
        stack.push(instance("details"));

        let old = stack.replace_top(instance("details"));
        assert_eq!(old.definition_id, "details");
        assert_eq!(stack.depth(), 2);
        assert_ne!(stack.current().entry_key, old.entry_key);
    }

    #[test]
    fn test_entry_keys_stay_unique() {
        let mut stack = BackStack::new(instance("home"));
        stack.push(instance("details"));
        stack.push(instance("details"));

        let mut keys: Vec<&str> = stack
            .entries()
            .iter()
            .map(|e| e.entry_key.as_str())
            .collect();
        keys.sort_unstable();
        keys.dedup();
        assert_eq!(keys.len(), stack.depth());
    }
}
