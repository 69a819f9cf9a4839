//! General REPL commands (help, quit, status)

use crate::commands::{CommandContext, CommandResult};
use colored::*;

/// Handle `help` command
pub fn cmd_help(_args: &str, _ctx: &mut CommandContext) -> CommandResult {
    CommandResult::Message(help_text())
}

/// Handle `quit` or `exit` command
pub fn cmd_quit(_args: &str, _ctx: &mut CommandContext) -> CommandResult {
    CommandResult::Exit
}

/// Handle `status` command
pub fn cmd_status(_args: &str, ctx: &mut CommandContext) -> CommandResult {
    match ctx.snapshot() {
        Ok(snapshot) => CommandResult::Message(snapshot.to_string()),
        Err(result) => result,
    }
}

fn help_text() -> String {
    let mut out = String::new();
    out.push_str(&format!("{}\n", "🎵 Vocal Warm-up Help".bold()));
    out.push_str(&format!("{}\n\n", "====================".bold()));

    out.push_str(&format!("{}\n", "Playback:".green()));
    for (cmd, text) in [
        ("play", "Start looping the sequence from the first note"),
        ("pause", "Stop playback (next play starts over)"),
        ("toggle, p", "Play if paused, pause if playing"),
    ] {
        out.push_str(&format!("  {:<18} - {}\n", cmd.cyan(), text));
    }
    out.push('\n');

    out.push_str(&format!("{}\n", "Transpose:".green()));
    for (cmd, text) in [
        ("up [n]", "Raise transpose by n semitones (default 1)"),
        ("down [n]", "Lower transpose by n semitones (default 1)"),
    ] {
        out.push_str(&format!("  {:<18} - {}\n", cmd.cyan(), text));
    }
    out.push('\n');

    out.push_str(&format!("{}\n", "Selection (restarts playback):".green()));
    for (cmd, text) in [
        ("scale [name]", "major, minor, chromatic"),
        ("pattern [name]", "ascending, descending, ascendingDescending, broken"),
        ("root [note]", "C, C#, D ... B (flats like Bb also work)"),
    ] {
        out.push_str(&format!("  {:<18} - {}\n", cmd.cyan(), text));
    }
    out.push_str("  Without an argument each lists its choices.\n\n");

    out.push_str(&format!("{}\n", "Info:".green()));
    for (cmd, text) in [
        ("status", "Show what is playing"),
        ("sequence", "Show the semitone offsets being played"),
        ("help", "Show this help"),
        ("quit, exit", "Leave the session"),
    ] {
        out.push_str(&format!("  {:<18} - {}\n", cmd.cyan(), text));
    }

    out.trim_end().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::test_support;

    #[test]
    fn test_status_reports_snapshot() {
        let (mut ctx, _sink) = test_support::context();
        match cmd_status("", &mut ctx) {
            CommandResult::Message(msg) => {
                assert!(msg.contains("major"));
                assert!(msg.contains("root C"));
                assert!(msg.contains("transpose +0"));
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_help_mentions_every_command() {
        let text = help_text();
        for name in ["play", "pause", "toggle", "up", "down", "scale", "pattern", "root", "status", "sequence", "quit"] {
            assert!(text.contains(name), "help is missing {}", name);
        }
    }

    #[test]
    fn test_quit() {
        let (mut ctx, _sink) = test_support::context();
        assert!(matches!(cmd_quit("", &mut ctx), CommandResult::Exit));
    }
}
