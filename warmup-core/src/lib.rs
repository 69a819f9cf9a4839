//! # Warmup Core
//!
//! Audio-free core of the vocal warm-up player. Provides the scale, pattern and
//! root-note catalogs, the note-sequence generator, and the playback sequencer
//! state machine. Nothing in here touches an audio device or a clock, so the
//! same logic drives the native player and the browser build.
//!
//! ## Features
//!
//! - **serde**: Enable serialization of catalog and snapshot types
//! - **wasm**: Enable WASM bindings via wasm-bindgen
//!
//! ## Example
//!
//! ```
//! use warmup_core::types::{generate, Pattern, Scale};
//!
//! let offsets = generate(Scale::Major.offsets(), Pattern::Broken);
//! assert_eq!(&offsets[..4], &[0, 2, 0, 4]);
//! ```

pub mod sequencer;
pub mod types;
pub mod wasm;

// Re-export commonly used types
pub use sequencer::{
    PlaybackSettings, PlaybackSnapshot, PlaybackStatus, Sequencer, Step, StepOutcome, StepToken,
};
pub use types::{Pattern, RootNote, Scale, Selection, ToneShape, generate, generate_by_name};
pub use wasm::Catalog;
