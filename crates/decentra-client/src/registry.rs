//! The slash-command registry.
//!
//! A process-wide table (per client instance) mapping command names to their
//! handler and externally-advertised definition. Populated at setup time,
//! consulted by the dispatcher, pushed to the server once per successful
//! connection.

use std::sync::Arc;

use futures::future::BoxFuture;

use decentra_core::CommandDefinition;

use crate::context::CommandContext;

/// A slash-command callback. At most one handler exists per command name.
pub type CommandHandler =
    Arc<dyn Fn(CommandContext) -> BoxFuture<'static, anyhow::Result<()>> + Send + Sync>;

struct CommandEntry {
    definition: CommandDefinition,
    handler: CommandHandler,
}

/// Ordered table of registered slash commands.
#[derive(Default)]
pub struct CommandRegistry {
    entries: Vec<CommandEntry>,
}

impl CommandRegistry {
    /// Registers a command, silently overwriting any prior registration for
    /// the same name. An overwritten command keeps its position in the
    /// advertised definitions list.
    pub fn register(&mut self, definition: CommandDefinition, handler: CommandHandler) {
        if let Some(entry) = self
            .entries
            .iter_mut()
            .find(|e| e.definition.name == definition.name)
        {
            entry.definition = definition;
            entry.handler = handler;
        } else {
            self.entries.push(CommandEntry {
                definition,
                handler,
            });
        }
    }

    /// The definitions in registration order, for transmission.
    pub fn definitions(&self) -> Vec<CommandDefinition> {
        self.entries.iter().map(|e| e.definition.clone()).collect()
    }

    /// Looks up the handler for a command name.
    pub fn handler_for(&self, name: &str) -> Option<CommandHandler> {
        self.entries
            .iter()
            .find(|e| e.definition.name == name)
            .map(|e| Arc::clone(&e.handler))
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn noop() -> CommandHandler {
        Arc::new(|_ctx| Box::pin(async { Ok(()) }))
    }

    #[test]
    fn keeps_registration_order() {
        let mut registry = CommandRegistry::default();
        registry.register(CommandDefinition::new("ping", "Pong"), noop());
        registry.register(CommandDefinition::new("roll", "Dice"), noop());

        let names: Vec<_> = registry
            .definitions()
            .into_iter()
            .map(|d| d.name)
            .collect();
        assert_eq!(names, ["ping", "roll"]);
    }

    #[test]
    fn last_registration_wins_in_place() {
        let mut registry = CommandRegistry::default();
        registry.register(CommandDefinition::new("ping", "first"), noop());
        registry.register(CommandDefinition::new("roll", "Dice"), noop());
        registry.register(CommandDefinition::new("ping", "second"), noop());

        let defs = registry.definitions();
        assert_eq!(defs.len(), 2);
        assert_eq!(defs[0].name, "ping");
        assert_eq!(defs[0].description, "second");
    }

    #[test]
    fn handler_lookup() {
        let mut registry = CommandRegistry::default();
        registry.register(CommandDefinition::new("ping", "Pong"), noop());
        assert!(registry.handler_for("ping").is_some());
        assert!(registry.handler_for("unknown").is_none());
    }
}
