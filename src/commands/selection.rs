//! Scale, pattern and root-note selection commands

use crate::commands::{CommandContext, CommandResult};
use colored::*;
use std::fmt::Display;
use std::str::FromStr;
use warmup_core::types::semitone_frequency;
use warmup_core::{Catalog, Pattern, RootNote, Scale};

/// Handle `scale [name]`
pub fn cmd_scale(args: &str, ctx: &mut CommandContext) -> CommandResult {
    if args.is_empty() {
        return list_choices(ctx, "Scales", &Catalog::new().scales, |s| s.scale.to_string());
    }
    select(args, |scale: Scale| ctx.engine.select_scale(scale), "Scale")
}

/// Handle `pattern [name]`
pub fn cmd_pattern(args: &str, ctx: &mut CommandContext) -> CommandResult {
    if args.is_empty() {
        return list_choices(ctx, "Patterns", &Catalog::new().patterns, |s| {
            s.pattern.map(|p| p.to_string()).unwrap_or_default()
        });
    }
    select(args, |pattern: Pattern| ctx.engine.select_pattern(pattern), "Pattern")
}

/// Handle `root [note]`
pub fn cmd_root(args: &str, ctx: &mut CommandContext) -> CommandResult {
    if args.is_empty() {
        return list_choices(ctx, "Root notes", &Catalog::new().roots, |s| s.root.to_string());
    }
    match args.parse::<RootNote>() {
        Ok(root) => match ctx.engine.select_root(root) {
            Ok(()) => CommandResult::Message(
                format!("🎵 Root set to {} ({:.2} Hz)", root, root.frequency())
                    .bright_green()
                    .to_string(),
            ),
            Err(e) => CommandResult::Error(format!("Failed to change root: {}", e)),
        },
        Err(e) => CommandResult::Error(e.to_string()),
    }
}

/// Handle `sequence` - show what the current selection plays
pub fn cmd_sequence(_args: &str, ctx: &mut CommandContext) -> CommandResult {
    let snapshot = match ctx.snapshot() {
        Ok(snapshot) => snapshot,
        Err(result) => return result,
    };
    let offsets = match ctx.engine.sequence() {
        Ok(offsets) => offsets,
        Err(e) => return CommandResult::Error(e.to_string()),
    };
    if offsets.is_empty() {
        return CommandResult::Message("Nothing to play".yellow().to_string());
    }

    let steps: Vec<String> = offsets
        .iter()
        .map(|&offset| {
            format!(
                "{:+} ({:.2} Hz)",
                offset,
                semitone_frequency(snapshot.base_frequency, offset)
            )
        })
        .collect();
    CommandResult::Message(format!(
        "{} {} from {}: {}",
        snapshot.scale,
        snapshot.pattern.map(|p| p.name()).unwrap_or("(none)"),
        snapshot.root,
        steps.join(", ")
    ))
}

fn select<T, F>(args: &str, apply: F, label: &str) -> CommandResult
where
    T: FromStr<Err = anyhow::Error> + Display + Copy,
    F: FnOnce(T) -> anyhow::Result<()>,
{
    match args.parse::<T>() {
        Ok(choice) => match apply(choice) {
            Ok(()) => CommandResult::Message(
                format!("🎵 {} set to {}", label, choice)
                    .bright_green()
                    .to_string(),
            ),
            Err(e) => CommandResult::Error(format!("Failed to change {}: {}", label, e)),
        },
        Err(e) => CommandResult::Error(e.to_string()),
    }
}

fn list_choices<F>(ctx: &CommandContext, title: &str, names: &[String], current: F) -> CommandResult
where
    F: FnOnce(&warmup_core::PlaybackSnapshot) -> String,
{
    let current = match ctx.snapshot() {
        Ok(snapshot) => current(&snapshot),
        Err(result) => return result,
    };

    let mut output = format!("{}:\n", title.bold());
    for name in names {
        if *name == current {
            output.push_str(&format!("  {} {}\n", "▶".bright_green(), name.bright_green()));
        } else {
            output.push_str(&format!("    {}\n", name));
        }
    }
    CommandResult::Message(output.trim_end().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::test_support;

    #[test]
    fn test_select_scale() {
        let (mut ctx, _sink) = test_support::context();

        assert!(matches!(
            cmd_scale("minor", &mut ctx),
            CommandResult::Message(_)
        ));
        assert_eq!(ctx.engine.snapshot().unwrap().scale, Scale::Minor);

        assert!(matches!(
            cmd_scale("dorian", &mut ctx),
            CommandResult::Error(_)
        ));
        assert_eq!(ctx.engine.snapshot().unwrap().scale, Scale::Minor);
    }

    #[test]
    fn test_select_pattern_and_root() {
        let (mut ctx, _sink) = test_support::context();

        cmd_pattern("ascending-descending", &mut ctx);
        match cmd_root("F#", &mut ctx) {
            CommandResult::Message(msg) => assert!(msg.contains("369.99")),
            other => panic!("unexpected {:?}", other),
        }

        let snapshot = ctx.engine.snapshot().unwrap();
        assert_eq!(snapshot.pattern, Some(Pattern::AscendingDescending));
        assert_eq!(snapshot.root, RootNote::FSharp);
        assert_eq!(snapshot.sequence_len, 15);
    }

    #[test]
    fn test_listing_marks_current() {
        let (mut ctx, _sink) = test_support::context();
        cmd_scale("chromatic", &mut ctx);

        match cmd_scale("", &mut ctx) {
            CommandResult::Message(msg) => {
                assert!(msg.contains("major"));
                assert!(msg.contains("minor"));
                let marked = msg.lines().find(|l| l.contains('▶')).unwrap();
                assert!(marked.contains("chromatic"));
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_sequence_listing() {
        let (mut ctx, _sink) = test_support::context();
        cmd_root("A", &mut ctx);
        cmd_pattern("broken", &mut ctx);

        match cmd_sequence("", &mut ctx) {
            CommandResult::Message(msg) => {
                assert!(msg.starts_with("major broken from A"));
                assert!(msg.contains("+0 (440.00 Hz), +2 (493.88 Hz)"));
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_selection_while_playing_restarts() {
        let (mut ctx, sink) = test_support::context();
        ctx.engine.play().unwrap();
        ctx.engine.snapshot().unwrap();
        std::thread::sleep(std::time::Duration::from_millis(50));

        cmd_root("A", &mut ctx);
        std::thread::sleep(std::time::Duration::from_millis(50));

        assert_eq!(sink.frequencies(), vec![261.63, 440.0]);
    }
}
