//! Playback sequencer state machine
//!
//! The sequencer owns the playback state: the generated sequence, the current
//! position, the Playing/Stopped flag and the cumulative transpose. It has no
//! clock of its own. A driver (the native playback engine, or JavaScript timers
//! in the browser) calls [`Sequencer::fire`] once per step with the
//! [`StepToken`] it was handed when playback started. Every `start` and `stop`
//! moves to a new token generation, so a step that was scheduled before a stop
//! or restart observes a stale token and does nothing.

use crate::types::{
    Pattern, RootNote, Scale, Selection, ToneShape, generate, semitone_frequency,
};
use std::fmt;
use std::time::Duration;

/// Default gap between two consecutive steps
pub const DEFAULT_STEP_INTERVAL_MS: u64 = 600;

/// Timing and pitch options for a playback session
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PlaybackSettings {
    pub step_interval_ms: u64,
    /// Add the cumulative transpose to every played offset.
    /// Off by default: transpose is tracked but does not change pitch.
    pub apply_transpose: bool,
    pub tone: ToneShape,
}

impl PlaybackSettings {
    pub fn step_interval(&self) -> Duration {
        Duration::from_millis(self.step_interval_ms)
    }
}

impl Default for PlaybackSettings {
    fn default() -> Self {
        Self {
            step_interval_ms: DEFAULT_STEP_INTERVAL_MS,
            apply_transpose: false,
            tone: ToneShape::default(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum PlaybackStatus {
    #[default]
    Stopped,
    Playing,
}

impl PlaybackStatus {
    /// Label of the play/pause control in this state
    pub fn control_label(&self) -> &'static str {
        match self {
            PlaybackStatus::Stopped => "Play",
            PlaybackStatus::Playing => "Pause",
        }
    }
}

/// Cancellation token for one run of the playback loop
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct StepToken(u32);

impl StepToken {
    /// Rebuild a token handed across an FFI boundary
    pub fn from_raw(raw: u32) -> Self {
        StepToken(raw)
    }

    pub fn raw(&self) -> u32 {
        self.0
    }
}

/// One emitted note
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Step {
    /// Semitone offset from the root, as generated
    pub offset: i32,
    /// Index of `offset` in the sequence
    pub position: usize,
    /// Frequency in Hz to sound
    pub frequency: f32,
}

/// Result of firing a scheduled step
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum StepOutcome {
    /// Sound this step and schedule the next one
    Emit(Step),
    /// Nothing to play (empty sequence); keep the loop alive
    Skipped,
    /// The token is stale or playback stopped; drop the loop
    Cancelled,
}

pub struct Sequencer {
    scale: Scale,
    /// `None` when the pattern was chosen by an unrecognized name
    pattern: Option<Pattern>,
    root: RootNote,
    sequence: Vec<i32>,
    position: usize,
    status: PlaybackStatus,
    transpose: i32,
    generation: u32,
    apply_transpose: bool,
}

impl Sequencer {
    pub fn new(selection: Selection, settings: &PlaybackSettings) -> Self {
        Self {
            scale: selection.scale,
            pattern: Some(selection.pattern),
            root: selection.root,
            sequence: selection.sequence(),
            position: 0,
            status: PlaybackStatus::Stopped,
            transpose: 0,
            generation: 0,
            apply_transpose: settings.apply_transpose,
        }
    }

    pub fn scale(&self) -> Scale {
        self.scale
    }

    pub fn pattern(&self) -> Option<Pattern> {
        self.pattern
    }

    pub fn root(&self) -> RootNote {
        self.root
    }

    pub fn sequence(&self) -> &[i32] {
        &self.sequence
    }

    pub fn position(&self) -> usize {
        self.position
    }

    pub fn status(&self) -> PlaybackStatus {
        self.status
    }

    pub fn is_playing(&self) -> bool {
        self.status == PlaybackStatus::Playing
    }

    pub fn transpose(&self) -> i32 {
        self.transpose
    }

    pub fn base_frequency(&self) -> f32 {
        self.root.frequency()
    }

    /// Begin playback from the first step
    ///
    /// Calling this while already playing restarts from position 0 and
    /// invalidates the previous token.
    pub fn start(&mut self) -> StepToken {
        self.status = PlaybackStatus::Playing;
        self.position = 0;
        self.next_generation()
    }

    pub fn stop(&mut self) {
        self.status = PlaybackStatus::Stopped;
        self.position = 0;
        self.next_generation();
    }

    /// Stop when playing, start when stopped
    pub fn toggle(&mut self) -> Option<StepToken> {
        if self.is_playing() {
            self.stop();
            None
        } else {
            Some(self.start())
        }
    }

    pub fn select_scale(&mut self, scale: Scale) -> Option<StepToken> {
        self.scale = scale;
        self.regenerate()
    }

    pub fn select_pattern(&mut self, pattern: Pattern) -> Option<StepToken> {
        self.pattern = Some(pattern);
        self.regenerate()
    }

    /// Select a pattern by name; an unknown name leaves nothing to play
    pub fn select_pattern_name(&mut self, name: &str) -> Option<StepToken> {
        self.pattern = name.parse().ok();
        self.regenerate()
    }

    pub fn select_root(&mut self, root: RootNote) -> Option<StepToken> {
        self.root = root;
        self.regenerate()
    }

    /// Shift the cumulative transpose by `delta` semitones, returning the new total
    ///
    /// Playback is never restarted by a transpose.
    pub fn transpose_by(&mut self, delta: i32) -> i32 {
        self.transpose = self.transpose.saturating_add(delta);
        self.transpose
    }

    /// Frequency in Hz for a generated offset
    pub fn frequency_of(&self, offset: i32) -> f32 {
        let semitones = if self.apply_transpose {
            offset.saturating_add(self.transpose)
        } else {
            offset
        };
        semitone_frequency(self.base_frequency(), semitones)
    }

    /// Whether `token` still belongs to the running loop
    pub fn is_current(&self, token: StepToken) -> bool {
        self.is_playing() && token.0 == self.generation
    }

    /// Run one iteration of the playback loop
    pub fn fire(&mut self, token: StepToken) -> StepOutcome {
        if !self.is_current(token) {
            return StepOutcome::Cancelled;
        }
        if self.sequence.is_empty() {
            return StepOutcome::Skipped;
        }

        let position = self.position;
        let offset = self.sequence[position];
        self.position = (position + 1) % self.sequence.len();

        StepOutcome::Emit(Step {
            offset,
            position,
            frequency: self.frequency_of(offset),
        })
    }

    pub fn snapshot(&self) -> PlaybackSnapshot {
        PlaybackSnapshot {
            status: self.status,
            scale: self.scale,
            pattern: self.pattern,
            root: self.root,
            position: self.position,
            sequence_len: self.sequence.len(),
            transpose: self.transpose,
            transpose_applied: self.apply_transpose,
            base_frequency: self.base_frequency(),
        }
    }

    fn regenerate(&mut self) -> Option<StepToken> {
        self.sequence = match self.pattern {
            Some(pattern) => generate(self.scale.offsets(), pattern),
            None => Vec::new(),
        };
        self.position = 0;

        if self.is_playing() {
            self.stop();
            Some(self.start())
        } else {
            None
        }
    }

    fn next_generation(&mut self) -> StepToken {
        self.generation = self.generation.wrapping_add(1);
        StepToken(self.generation)
    }
}

impl Default for Sequencer {
    fn default() -> Self {
        Self::new(Selection::default(), &PlaybackSettings::default())
    }
}

/// Read-only view of the playback state for display
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct PlaybackSnapshot {
    pub status: PlaybackStatus,
    pub scale: Scale,
    pub pattern: Option<Pattern>,
    pub root: RootNote,
    pub position: usize,
    pub sequence_len: usize,
    pub transpose: i32,
    pub transpose_applied: bool,
    pub base_frequency: f32,
}

impl fmt::Display for PlaybackSnapshot {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let state = match self.status {
            PlaybackStatus::Playing => "▶ playing",
            PlaybackStatus::Stopped => "■ stopped",
        };
        let pattern = self.pattern.map(|p| p.name()).unwrap_or("(none)");
        write!(
            f,
            "{} | {} · {} · root {} ({:.2} Hz) | step {}/{} | transpose {:+}",
            state,
            self.scale,
            pattern,
            self.root,
            self.base_frequency,
            self.position,
            self.sequence_len,
            self.transpose
        )?;
        if !self.transpose_applied && self.transpose != 0 {
            write!(f, " (not applied to pitch)")?;
        }
        Ok(())
    }
}
