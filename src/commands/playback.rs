//! Play/pause and transpose commands

use crate::commands::{CommandContext, CommandResult};
use colored::*;
use warmup_core::{PlaybackSnapshot, PlaybackStatus};

/// Handle `play`
pub fn cmd_play(_args: &str, ctx: &mut CommandContext) -> CommandResult {
    if let Err(e) = ctx.engine.play() {
        return CommandResult::Error(format!("Failed to start playback: {}", e));
    }
    report_status(ctx)
}

/// Handle `pause` / `stop`
pub fn cmd_pause(_args: &str, ctx: &mut CommandContext) -> CommandResult {
    if let Err(e) = ctx.engine.pause() {
        return CommandResult::Error(format!("Failed to stop playback: {}", e));
    }
    report_status(ctx)
}

/// Handle `toggle` / `p`
pub fn cmd_toggle(_args: &str, ctx: &mut CommandContext) -> CommandResult {
    if let Err(e) = ctx.engine.toggle() {
        return CommandResult::Error(format!("Failed to toggle playback: {}", e));
    }
    report_status(ctx)
}

/// Handle `up [n]`
pub fn cmd_transpose_up(args: &str, ctx: &mut CommandContext) -> CommandResult {
    transpose(args, 1, ctx)
}

/// Handle `down [n]`
pub fn cmd_transpose_down(args: &str, ctx: &mut CommandContext) -> CommandResult {
    transpose(args, -1, ctx)
}

fn transpose(args: &str, direction: i32, ctx: &mut CommandContext) -> CommandResult {
    let steps = if args.is_empty() {
        1
    } else {
        match args.parse::<u8>() {
            Ok(n) if n > 0 => n as i32,
            _ => {
                return CommandResult::Error(
                    "Invalid step count. Use a whole number between 1 and 255".to_string(),
                );
            }
        }
    };

    if let Err(e) = ctx.engine.transpose(direction * steps) {
        return CommandResult::Error(format!("Failed to transpose: {}", e));
    }

    match ctx.snapshot() {
        Ok(snapshot) => CommandResult::Message(describe_transpose(&snapshot)),
        Err(result) => result,
    }
}

fn describe_transpose(snapshot: &PlaybackSnapshot) -> String {
    let line = format!("🎚  Transpose: {:+} semitones", snapshot.transpose)
        .bright_green()
        .to_string();
    if snapshot.transpose_applied {
        line
    } else {
        format!("{} {}", line, "(tracked only, pitch unchanged)".dimmed())
    }
}

fn report_status(ctx: &CommandContext) -> CommandResult {
    match ctx.snapshot() {
        Ok(snapshot) => CommandResult::Message(describe_status(&snapshot)),
        Err(result) => result,
    }
}

fn describe_status(snapshot: &PlaybackSnapshot) -> String {
    match snapshot.status {
        PlaybackStatus::Playing => format!(
            "🔊 Playing {} {} from {} (type '{}' to stop)",
            snapshot.scale,
            snapshot.pattern.map(|p| p.name()).unwrap_or("(none)"),
            snapshot.root,
            snapshot.status.control_label().to_lowercase()
        )
        .bright_green()
        .to_string(),
        PlaybackStatus::Stopped => format!(
            "⏹  Stopped (type '{}' to start)",
            snapshot.status.control_label().to_lowercase()
        )
        .yellow()
        .to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::test_support;
    use std::thread;
    use std::time::Duration;

    #[test]
    fn test_play_and_pause() {
        let (mut ctx, sink) = test_support::context();

        assert!(matches!(cmd_play("", &mut ctx), CommandResult::Message(_)));
        assert_eq!(ctx.engine.snapshot().unwrap().status, PlaybackStatus::Playing);

        thread::sleep(Duration::from_millis(50));

        // playing again is a no-op, not a restart
        cmd_play("", &mut ctx);
        thread::sleep(Duration::from_millis(50));
        assert_eq!(sink.count(), 1);

        assert!(matches!(cmd_pause("", &mut ctx), CommandResult::Message(_)));
        assert_eq!(ctx.engine.snapshot().unwrap().status, PlaybackStatus::Stopped);
    }

    #[test]
    fn test_toggle() {
        let (mut ctx, _sink) = test_support::context();

        cmd_toggle("", &mut ctx);
        assert_eq!(ctx.engine.snapshot().unwrap().status, PlaybackStatus::Playing);
        cmd_toggle("", &mut ctx);
        assert_eq!(ctx.engine.snapshot().unwrap().status, PlaybackStatus::Stopped);
    }

    #[test]
    fn test_transpose_commands() {
        let (mut ctx, _sink) = test_support::context();

        cmd_transpose_up("", &mut ctx);
        cmd_transpose_up("3", &mut ctx);
        cmd_transpose_down("", &mut ctx);
        assert_eq!(ctx.engine.snapshot().unwrap().transpose, 3);

        match cmd_transpose_down("5", &mut ctx) {
            CommandResult::Message(msg) => assert!(msg.contains("-2")),
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_transpose_rejects_bad_counts() {
        let (mut ctx, _sink) = test_support::context();

        assert!(matches!(
            cmd_transpose_up("0", &mut ctx),
            CommandResult::Error(_)
        ));
        assert!(matches!(
            cmd_transpose_down("lots", &mut ctx),
            CommandResult::Error(_)
        ));
        assert_eq!(ctx.engine.snapshot().unwrap().transpose, 0);
    }
}
