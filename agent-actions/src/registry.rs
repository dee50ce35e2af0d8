//! Runtime registry for named actions and their priorities.

use std::collections::HashMap;
use std::fmt;

use thiserror::Error;
use tracing::debug;

/// Priority assigned to a name the first time an action is registered under it.
pub const DEFAULT_PRIORITY: f64 = 1.0;

/// Result alias for action operations.
pub type ActionResult<T> = Result<T, ActionError>;

/// Zero-argument behaviour an agent can perform.
pub trait Action: Send + Sync {
    /// Performs the action.
    fn run(&self);
}

impl<F> Action for F
where
    F: Fn() + Send + Sync,
{
    fn run(&self) {
        (self)();
    }
}

// A slot may carry a priority before any action is registered for its name.
struct ActionSlot {
    action: Option<Box<dyn Action>>,
    priority: f64,
}

/// Registry that stores actions and priority weights keyed by name.
#[derive(Default)]
pub struct ActionRegistry {
    slots: HashMap<String, ActionSlot>,
}

impl fmt::Debug for ActionRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ActionRegistry")
            .field("registered", &self.names())
            .field("slots", &self.slots.len())
            .finish()
    }
}

impl ActionRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `action` under `name`, replacing any previous action.
    ///
    /// A name seen for the first time gets [`DEFAULT_PRIORITY`]; an existing
    /// priority is left untouched. Returns `true` when an action was replaced.
    pub fn register<A>(&mut self, name: impl Into<String>, action: A) -> bool
    where
        A: Action + 'static,
    {
        let name = name.into();
        let slot = self.slots.entry(name.clone()).or_insert_with(|| ActionSlot {
            action: None,
            priority: DEFAULT_PRIORITY,
        });
        let replaced = slot.action.replace(Box::new(action)).is_some();
        debug!(action = %name, replaced, priority = slot.priority, "action registered");
        replaced
    }

    /// Sets the priority for `name`, whether or not an action is registered.
    pub fn set_priority(&mut self, name: impl Into<String>, priority: f64) {
        self.slots
            .entry(name.into())
            .and_modify(|slot| slot.priority = priority)
            .or_insert(ActionSlot {
                action: None,
                priority,
            });
    }

    /// Returns the priority recorded for `name`, if any.
    #[must_use]
    pub fn priority(&self, name: &str) -> Option<f64> {
        self.slots.get(name).map(|slot| slot.priority)
    }

    /// Returns `true` when an action is registered under `name`.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.slots
            .get(name)
            .is_some_and(|slot| slot.action.is_some())
    }

    /// Returns the number of registered actions.
    #[must_use]
    pub fn len(&self) -> usize {
        self.slots
            .values()
            .filter(|slot| slot.action.is_some())
            .count()
    }

    /// Returns `true` when no action is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Lists registered action names in lexical order.
    #[must_use]
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self
            .slots
            .iter()
            .filter(|(_, slot)| slot.action.is_some())
            .map(|(name, _)| name.as_str())
            .collect();
        names.sort_unstable();
        names
    }

    /// Lists registered actions with their priority, highest first.
    ///
    /// Equal priorities are ordered by name.
    #[must_use]
    pub fn ranked(&self) -> Vec<(&str, f64)> {
        let mut ranked: Vec<(&str, f64)> = self
            .slots
            .iter()
            .filter(|(_, slot)| slot.action.is_some())
            .map(|(name, slot)| (name.as_str(), slot.priority))
            .collect();
        ranked.sort_by(|a, b| b.1.total_cmp(&a.1).then_with(|| a.0.cmp(b.0)));
        ranked
    }

    /// Invokes the action registered under `name` exactly once.
    ///
    /// # Errors
    ///
    /// Returns [`ActionError::NotFound`] when no action is registered under
    /// `name`; nothing is invoked in that case.
    pub fn execute(&self, name: &str) -> ActionResult<()> {
        let action = self
            .slots
            .get(name)
            .and_then(|slot| slot.action.as_deref())
            .ok_or_else(|| ActionError::NotFound {
                name: name.to_owned(),
            })?;
        action.run();
        Ok(())
    }
}

/// Errors produced by the action registry.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ActionError {
    /// Requested action does not exist.
    #[error("action `{name}` not found")]
    NotFound {
        /// Name of the missing action.
        name: String,
    },
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;

    fn counter() -> (Arc<AtomicUsize>, impl Fn() + Send + Sync + 'static) {
        let count = Arc::new(AtomicUsize::new(0));
        let handle = Arc::clone(&count);
        (count, move || {
            handle.fetch_add(1, Ordering::SeqCst);
        })
    }

    #[test]
    fn executes_registered_action_once() {
        let mut registry = ActionRegistry::new();
        let (count, action) = counter();
        registry.register("explore", action);

        registry.execute("explore").unwrap();
        assert_eq!(count.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn unknown_action_is_not_found() {
        let registry = ActionRegistry::new();
        let err = registry.execute("missing").expect_err("unknown action");
        assert_eq!(
            err,
            ActionError::NotFound {
                name: "missing".to_owned()
            }
        );
    }

    #[test]
    fn first_registration_defaults_priority() {
        let mut registry = ActionRegistry::new();
        registry.register("analyze", || {});
        assert_eq!(registry.priority("analyze"), Some(DEFAULT_PRIORITY));
    }

    #[test]
    fn reregistration_replaces_action_but_keeps_priority() {
        let mut registry = ActionRegistry::new();
        let (first, first_action) = counter();
        let (second, second_action) = counter();

        assert!(!registry.register("collect_data", first_action));
        registry.set_priority("collect_data", 0.3);
        assert!(registry.register("collect_data", second_action));

        registry.execute("collect_data").unwrap();
        assert_eq!(first.load(Ordering::SeqCst), 0);
        assert_eq!(second.load(Ordering::SeqCst), 1);
        assert_eq!(registry.priority("collect_data"), Some(0.3));
    }

    #[test]
    fn reregistration_without_update_keeps_default() {
        let mut registry = ActionRegistry::new();
        registry.register("explore", || {});
        registry.register("explore", || {});
        assert_eq!(registry.priority("explore"), Some(DEFAULT_PRIORITY));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn priority_can_precede_registration() {
        let mut registry = ActionRegistry::new();
        registry.set_priority("later", 4.0);

        assert!(!registry.contains("later"));
        assert!(registry.is_empty());
        assert!(registry.execute("later").is_err());

        registry.register("later", || {});
        assert!(registry.contains("later"));
        assert_eq!(registry.priority("later"), Some(4.0));
    }

    #[test]
    fn ranked_orders_by_priority_then_name() {
        let mut registry = ActionRegistry::new();
        registry.register("b", || {});
        registry.register("a", || {});
        registry.register("c", || {});
        registry.set_priority("c", 2.0);
        registry.set_priority("orphan", 9.0);

        assert_eq!(registry.ranked(), vec![("c", 2.0), ("a", 1.0), ("b", 1.0)]);
        assert_eq!(registry.names(), vec!["a", "b", "c"]);
    }
}
