//! REPL (Read-Eval-Print Loop) driving the warm-up player

use crate::audio::{AudioPlayerHandle, PlaybackEngine};
use crate::commands::{CommandContext, CommandRegistry, CommandResult, create_registry};
use crate::config::Config;
use anyhow::{Context, Result, anyhow};
use colored::*;
use crossbeam_channel::{Receiver, Sender, unbounded};
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;
use std::sync::Arc;
use std::thread;

/// Interactive warm-up session
pub struct Repl {
    editor: Option<DefaultEditor>,
    engine: Arc<PlaybackEngine>,
    tx_input: Sender<Result<String, ReadlineError>>,
    rx_input: Receiver<Result<String, ReadlineError>>,
}

impl Repl {
    /// Create a new REPL with audio output and a playback engine built from `config`
    pub fn new(config: &Config) -> Result<Self> {
        let editor = DefaultEditor::new().context("Failed to initialize line editor")?;
        let settings = config.playback_settings();
        let audio_handle = Arc::new(AudioPlayerHandle::new(settings.tone));
        let engine = Arc::new(PlaybackEngine::new(
            audio_handle,
            config.selection(),
            settings,
        )?);

        let (tx_input, rx_input) = unbounded();

        Ok(Repl {
            editor: Some(editor),
            engine,
            tx_input,
            rx_input,
        })
    }

    /// Run the REPL until `quit`, Ctrl+C or Ctrl+D
    pub fn run(&mut self) -> Result<()> {
        println!(
            "{} {}",
            "🎵".bright_yellow(),
            "Vocal Warm-up".bright_cyan().bold()
        );
        println!(
            "Try {}, {}, {} or {}",
            "play".cyan(),
            "scale minor".cyan(),
            "pattern broken".cyan(),
            "root A".cyan()
        );
        println!(
            "Type '{}' for more information, '{}' or {} to exit.\n",
            "help".bright_green(),
            "quit".bright_red(),
            "Ctrl+C".bright_red()
        );

        let mut editor = self
            .editor
            .take()
            .ok_or_else(|| anyhow!("REPL is already running"))?;
        let tx_input = self.tx_input.clone();

        thread::Builder::new()
            .name("warmup-input".into())
            .spawn(move || loop {
                let prompt = format!("{} ", "warmup>".bright_magenta().bold());
                match editor.readline(&prompt) {
                    Ok(line) => {
                        let line = line.trim().to_string();
                        if !line.is_empty() {
                            let _ = editor.add_history_entry(&line);
                        }
                        if tx_input.send(Ok(line)).is_err() {
                            break;
                        }
                    }
                    Err(err) => {
                        let _ = tx_input.send(Err(err));
                        break;
                    }
                }
            })
            .context("Failed to spawn input thread")?;

        let registry = create_registry();
        let mut ctx = CommandContext::new(self.engine.clone());

        while let Ok(res) = self.rx_input.recv() {
            match res {
                Ok(line) => {
                    if line.is_empty() {
                        continue;
                    }
                    if !handle_line(&registry, &line, &mut ctx) {
                        break;
                    }
                }
                Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => {
                    println!("{} 🎵", "Goodbye!".bright_cyan());
                    break;
                }
                Err(err) => {
                    println!("{} {:?}", "Error:".bright_red().bold(), err);
                    break;
                }
            }
        }

        self.engine.pause()?;
        Ok(())
    }
}

/// Execute one input line and print its result. Returns false when the
/// session should end.
fn handle_line(registry: &CommandRegistry, line: &str, ctx: &mut CommandContext) -> bool {
    match registry.execute(line, ctx) {
        CommandResult::Success => {}
        CommandResult::Message(msg) => println!("{}", msg),
        CommandResult::Exit => {
            println!("{} 🎵", "Goodbye!".bright_cyan());
            return false;
        }
        CommandResult::Error(e) => {
            println!("{} {}", "Error:".bright_red().bold(), e.red());
        }
        CommandResult::NotACommand => {
            println!(
                "{} unknown command '{}'. Available: {}",
                "Error:".bright_red().bold(),
                line,
                registry.list_commands().join(", ")
            );
        }
    }
    true
}

/// Start a REPL session with the given configuration
pub fn start(config: &Config) -> Result<()> {
    let mut repl = Repl::new(config)?;
    repl.run()
}
