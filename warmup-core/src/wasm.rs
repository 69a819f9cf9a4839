//! WASM bindings for warmup-core
//!
//! The browser page keeps its own `setTimeout` loop and Web Audio nodes. These
//! bindings give it the generated sequences and the sequencer state machine:
//! `play()` hands back a token, the page calls `step(token)` every
//! `stepIntervalMs` and sounds the returned frequency, and stops rescheduling
//! once `isCurrent(token)` turns false.

use crate::types::{Pattern, RootNote, Scale};

#[cfg(feature = "wasm")]
use crate::sequencer::{PlaybackSettings, Sequencer, StepOutcome, StepToken};
#[cfg(feature = "wasm")]
use crate::types::{Selection, generate_by_name};
#[cfg(feature = "wasm")]
use wasm_bindgen::prelude::*;

/// Names of every selectable scale, pattern and root note, in display order
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Catalog {
    pub scales: Vec<String>,
    pub patterns: Vec<String>,
    pub roots: Vec<String>,
}

impl Catalog {
    pub fn new() -> Self {
        Self {
            scales: Scale::ALL.iter().map(|s| s.name().to_string()).collect(),
            patterns: Pattern::ALL.iter().map(|p| p.name().to_string()).collect(),
            roots: RootNote::ALL.iter().map(|r| r.name().to_string()).collect(),
        }
    }
}

impl Default for Catalog {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(feature = "wasm")]
fn js_error(e: impl std::fmt::Display) -> JsError {
    JsError::new(&e.to_string())
}

/// Offsets for a scale and pattern given by name
///
/// An unknown pattern yields an empty array; an unknown scale is an error.
#[cfg(feature = "wasm")]
#[wasm_bindgen(js_name = generate)]
pub fn generate_sequence(scale: &str, pattern: &str) -> Result<Vec<i32>, JsError> {
    let scale: Scale = scale.parse().map_err(js_error)?;
    Ok(generate_by_name(scale.offsets(), pattern))
}

#[cfg(feature = "wasm")]
#[wasm_bindgen]
pub fn catalog() -> Result<JsValue, JsError> {
    serde_wasm_bindgen::to_value(&Catalog::new()).map_err(js_error)
}

/// One warm-up session, owned by the page
#[cfg(feature = "wasm")]
#[wasm_bindgen]
pub struct WarmupSession {
    sequencer: Sequencer,
    settings: PlaybackSettings,
}

#[cfg(feature = "wasm")]
#[wasm_bindgen]
impl WarmupSession {
    #[wasm_bindgen(constructor)]
    pub fn new() -> Self {
        let settings = PlaybackSettings::default();
        Self {
            sequencer: Sequencer::new(Selection::default(), &settings),
            settings,
        }
    }

    #[wasm_bindgen(getter, js_name = stepIntervalMs)]
    pub fn step_interval_ms(&self) -> u32 {
        self.settings.step_interval_ms as u32
    }

    #[wasm_bindgen(getter, js_name = isPlaying)]
    pub fn is_playing(&self) -> bool {
        self.sequencer.is_playing()
    }

    /// Text for the play/pause button
    #[wasm_bindgen(getter, js_name = controlLabel)]
    pub fn control_label(&self) -> String {
        self.sequencer.status().control_label().to_string()
    }

    pub fn play(&mut self) -> u32 {
        self.sequencer.start().raw()
    }

    pub fn pause(&mut self) {
        self.sequencer.stop();
    }

    /// Returns the new token when playback started
    pub fn toggle(&mut self) -> Option<u32> {
        self.sequencer.toggle().map(|t| t.raw())
    }

    /// Advance one step; returns the frequency to sound, if any
    pub fn step(&mut self, token: u32) -> Option<f32> {
        match self.sequencer.fire(StepToken::from_raw(token)) {
            StepOutcome::Emit(step) => Some(step.frequency),
            StepOutcome::Skipped | StepOutcome::Cancelled => None,
        }
    }

    #[wasm_bindgen(js_name = isCurrent)]
    pub fn is_current(&self, token: u32) -> bool {
        self.sequencer.is_current(StepToken::from_raw(token))
    }

    /// Returns the cumulative transpose
    pub fn transpose(&mut self, delta: i32) -> i32 {
        self.sequencer.transpose_by(delta)
    }

    /// Returns a new token when the change restarted playback
    #[wasm_bindgen(js_name = selectScale)]
    pub fn select_scale(&mut self, name: &str) -> Result<Option<u32>, JsError> {
        let scale: Scale = name.parse().map_err(js_error)?;
        Ok(self.sequencer.select_scale(scale).map(|t| t.raw()))
    }

    /// Unknown names leave the session silent instead of failing
    #[wasm_bindgen(js_name = selectPattern)]
    pub fn select_pattern(&mut self, name: &str) -> Option<u32> {
        self.sequencer.select_pattern_name(name).map(|t| t.raw())
    }

    #[wasm_bindgen(js_name = selectRoot)]
    pub fn select_root(&mut self, name: &str) -> Result<Option<u32>, JsError> {
        let root: RootNote = name.parse().map_err(js_error)?;
        Ok(self.sequencer.select_root(root).map(|t| t.raw()))
    }

    pub fn snapshot(&self) -> Result<JsValue, JsError> {
        serde_wasm_bindgen::to_value(&self.sequencer.snapshot()).map_err(js_error)
    }

    /// Envelope numbers for the page's gain ramp
    #[wasm_bindgen(js_name = toneShape)]
    pub fn tone_shape(&self) -> Result<JsValue, JsError> {
        serde_wasm_bindgen::to_value(&self.settings.tone).map_err(js_error)
    }
}

#[cfg(feature = "wasm")]
impl Default for WarmupSession {
    fn default() -> Self {
        Self::new()
    }
}
