//! # Warm-up
//!
//! An interactive vocal warm-up player. It loops a sequence of tones built
//! from a scale, a traversal pattern and a root note, and lets the singer
//! pause, transpose and change the selection while it plays.
//!
//! ## Modules
//!
//! - `audio`: the playback engine thread, its step scheduler, and the cpal
//!   output that synthesizes decaying sine tones.
//! - `commands`: REPL command handlers and the prefix-matching registry.
//! - `config`: TOML configuration for the default selection, step timing and
//!   tone shape.
//! - `repl`: the interactive terminal session.
//!
//! Scale generation and the sequencer state machine live in `warmup-core`.

pub mod audio;
pub mod commands;
pub mod config;
pub mod repl;

pub use crate::audio::{AudioPlayerHandle, PlaybackEngine, ToneSink};
pub use crate::config::Config;
