use crate::commands::context::CommandContext;
use crate::commands::controller::BotController;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;

/// An executable bot command.
///
/// Handlers never return errors; anything user-relevant is reported through
/// the controller's notifier.
#[async_trait]
pub trait Command: Send + Sync {
    async fn execute(&self, bot: Arc<BotController>, ctx: CommandContext);
    fn help(&self) -> &str;
}

/// Name to handler map. Populated once at startup, read-only afterwards.
#[derive(Default)]
pub struct CommandRegistry {
    commands: HashMap<String, Arc<dyn Command>>,
}

impl CommandRegistry {
    pub fn new() -> Self {
        CommandRegistry {
            commands: HashMap::new(),
        }
    }

    pub fn register(&mut self, name: &str, command: Arc<dyn Command>) {
        self.commands.insert(name.to_string(), command);
    }

    pub fn get(&self, name: &str) -> Option<Arc<dyn Command>> {
        self.commands.get(name).cloned()
    }

    /// Command names in sorted order, for the help listing.
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.commands.keys().cloned().collect();
        names.sort();
        names
    }
}
