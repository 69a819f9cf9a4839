//! Command registry for REPL commands
//!
//! Each control of the warm-up player is a command with a handler function.

pub mod general;
pub mod playback;
pub mod selection;

use crate::audio::PlaybackEngine;
use std::sync::Arc;
use warmup_core::PlaybackSnapshot;

/// Result of executing a command
#[derive(Debug)]
pub enum CommandResult {
    /// Command executed successfully, continue REPL
    Success,
    /// Command executed, show this message
    Message(String),
    /// Exit the REPL
    Exit,
    /// No command matched the input
    NotACommand,
    /// Error occurred
    Error(String),
}

/// Context passed to command handlers
pub struct CommandContext {
    pub engine: Arc<PlaybackEngine>,
}

impl CommandContext {
    pub fn new(engine: Arc<PlaybackEngine>) -> Self {
        Self { engine }
    }

    /// Fetch the engine state, turning failures into a command error
    pub fn snapshot(&self) -> Result<PlaybackSnapshot, CommandResult> {
        self.engine
            .snapshot()
            .map_err(|e| CommandResult::Error(e.to_string()))
    }
}

/// A command handler function
pub type CommandHandler = fn(&str, &mut CommandContext) -> CommandResult;

/// Registry of available commands
pub struct CommandRegistry {
    /// Sorted by prefix length descending for longest-match-first lookup
    commands: Vec<(String, CommandHandler)>,
}

impl CommandRegistry {
    pub fn new() -> Self {
        Self {
            commands: Vec::new(),
        }
    }

    /// Register a command with its prefix
    pub fn register(&mut self, prefix: &str, handler: CommandHandler) {
        self.commands.push((prefix.to_string(), handler));
        self.commands.sort_by(|a, b| b.0.len().cmp(&a.0.len()));
    }

    /// Execute a command, returning NotACommand if no match found
    pub fn execute(&self, input: &str, ctx: &mut CommandContext) -> CommandResult {
        for (prefix, handler) in &self.commands {
            if input == prefix || input.starts_with(&format!("{} ", prefix)) {
                let args = if input.len() > prefix.len() {
                    input[prefix.len()..].trim()
                } else {
                    ""
                };
                return handler(args, ctx);
            }
        }
        CommandResult::NotACommand
    }

    /// Get all registered command prefixes
    pub fn list_commands(&self) -> Vec<&str> {
        self.commands.iter().map(|(p, _)| p.as_str()).collect()
    }
}

impl Default for CommandRegistry {
    fn default() -> Self {
        Self::new()
    }
}

/// Create a fully populated command registry with all built-in commands
pub fn create_registry() -> CommandRegistry {
    let mut registry = CommandRegistry::new();

    // Playback
    registry.register("play", playback::cmd_play);
    registry.register("pause", playback::cmd_pause);
    registry.register("stop", playback::cmd_pause);
    registry.register("toggle", playback::cmd_toggle);
    registry.register("p", playback::cmd_toggle);
    registry.register("up", playback::cmd_transpose_up);
    registry.register("down", playback::cmd_transpose_down);

    // Selection
    registry.register("scale", selection::cmd_scale);
    registry.register("pattern", selection::cmd_pattern);
    registry.register("root", selection::cmd_root);
    registry.register("sequence", selection::cmd_sequence);

    // General commands
    registry.register("status", general::cmd_status);
    registry.register("help", general::cmd_help);
    registry.register("quit", general::cmd_quit);
    registry.register("exit", general::cmd_quit);

    registry
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::*;
    use crate::audio::testing::RecordingSink;
    use warmup_core::{PlaybackSettings, Selection};

    /// Context over an engine that records tones and steps slowly
    pub fn context() -> (CommandContext, Arc<RecordingSink>) {
        let sink = Arc::new(RecordingSink::default());
        let settings = PlaybackSettings {
            step_interval_ms: 10_000,
            ..PlaybackSettings::default()
        };
        let engine = PlaybackEngine::new(sink.clone(), Selection::default(), settings).unwrap();
        (CommandContext::new(Arc::new(engine)), sink)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_registry_dispatch() {
        let registry = create_registry();
        let (mut ctx, _sink) = test_support::context();

        assert!(matches!(
            registry.execute("quit", &mut ctx),
            CommandResult::Exit
        ));
        assert!(matches!(
            registry.execute("exit", &mut ctx),
            CommandResult::Exit
        ));
        assert!(matches!(
            registry.execute("frobnicate", &mut ctx),
            CommandResult::NotACommand
        ));
    }

    #[test]
    fn test_prefix_requires_word_boundary() {
        let registry = create_registry();
        let (mut ctx, _sink) = test_support::context();

        // "p" must not swallow "pattern" or "playful"
        assert!(matches!(
            registry.execute("playful", &mut ctx),
            CommandResult::NotACommand
        ));
        registry.execute("pattern broken", &mut ctx);
        let snapshot = ctx.engine.snapshot().unwrap();
        assert_eq!(snapshot.pattern, Some(warmup_core::Pattern::Broken));
    }

    #[test]
    fn test_list_commands() {
        let registry = create_registry();
        let commands = registry.list_commands();
        for name in ["play", "pause", "up", "down", "scale", "pattern", "root", "status"] {
            assert!(commands.contains(&name), "missing {}", name);
        }
        // longest prefixes first
        assert_eq!(commands[0].len(), commands.iter().map(|c| c.len()).max().unwrap());
    }
}
