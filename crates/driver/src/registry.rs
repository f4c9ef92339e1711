//! Named command registry
//!
//! Maps command names to typed handlers so a test suite can extend the
//! session with reusable operations. Handlers take the session as an
//! explicit chain context plus JSON arguments, and may invoke other
//! registered commands through the same session.

use std::collections::HashMap;
use std::sync::Arc;

use futures::future::BoxFuture;
use parking_lot::RwLock;
use serde_json::Value;
use tracing::debug;

use crate::error::Result;
use crate::session::Session;

/// Arguments passed to a registered command.
pub type CommandArgs = Vec<Value>;

/// Deferred result of a registered command.
pub type CommandFuture<'a> = BoxFuture<'a, Result<Value>>;

/// A registered command body.
pub type CommandHandler = Arc<dyn for<'a> Fn(&'a Session, CommandArgs) -> CommandFuture<'a> + Send + Sync>;

struct CommandSpec {
    arity: usize,
    handler: CommandHandler,
}

/// Registry of named commands attached to a session.
///
/// Registered once at suite setup and read for the session's lifetime.
/// Registering a name again replaces the previous definition (last
/// registration wins); built-in names are not protected, so shadowing is
/// the caller's deliberate choice.
#[derive(Default)]
pub struct CommandRegistry {
    commands: RwLock<HashMap<String, CommandSpec>>,
}

impl CommandRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Attach `handler` under `name`. `arity` is the minimum argument
    /// count, enforced at invocation.
    pub fn register<F>(&self, name: &str, arity: usize, handler: F)
    where
        F: for<'a> Fn(&'a Session, CommandArgs) -> CommandFuture<'a> + Send + Sync + 'static,
    {
        let spec = CommandSpec {
            arity,
            handler: Arc::new(handler),
        };
        if self.commands.write().insert(name.to_string(), spec).is_some() {
            debug!(command = name, "replaced existing command definition");
        }
    }

    pub fn contains(&self, name: &str) -> bool {
        self.commands.read().contains_key(name)
    }

    /// Registered names, sorted.
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.commands.read().keys().cloned().collect();
        names.sort();
        names
    }

    pub(crate) fn get(&self, name: &str) -> Option<(usize, CommandHandler)> {
        self.commands
            .read()
            .get(name)
            .map(|spec| (spec.arity, spec.handler.clone()))
    }
}

impl std::fmt::Debug for CommandRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CommandRegistry")
            .field("commands", &self.names())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn noop(_session: &Session, _args: CommandArgs) -> CommandFuture<'_> {
        Box::pin(async { Ok(Value::Null) })
    }

    #[test]
    fn names_are_sorted_and_membership_works() {
        let registry = CommandRegistry::new();
        registry.register("connect", 1, noop);
        registry.register("apply_filter", 1, noop);

        assert!(registry.contains("connect"));
        assert!(!registry.contains("disconnect"));
        assert_eq!(registry.names(), vec!["apply_filter", "connect"]);
    }

    #[test]
    fn re_registration_replaces_the_spec() {
        let registry = CommandRegistry::new();
        registry.register("connect", 2, noop);
        registry.register("connect", 0, noop);

        let (arity, _) = registry.get("connect").unwrap();
        assert_eq!(arity, 0);
        assert_eq!(registry.names().len(), 1);
    }
}
