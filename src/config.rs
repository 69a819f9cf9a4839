//! User configuration
//!
//! Built-in defaults come from the embedded `config.toml`. A user file at
//! `<config dir>/vocal-warmup/config.toml` (or the path in `WARMUP_CONFIG`)
//! overrides individual keys. Invalid values are logged and ignored.

use anyhow::Result;
use serde::Deserialize;
use std::path::PathBuf;
use warmup_core::types::tone::MAX_DURATION;
use warmup_core::{Pattern, PlaybackSettings, RootNote, Scale, Selection, ToneShape};

const DEFAULT_CONFIG: &str = include_str!("../config.toml");

/// Bounds for the step interval, in milliseconds
const MIN_STEP_INTERVAL_MS: u64 = 50;
const MAX_STEP_INTERVAL_MS: u64 = 10_000;

#[derive(Deserialize, Default)]
struct ConfigFile {
    #[serde(default)]
    defaults: DefaultsConfig,
    #[serde(default)]
    playback: PlaybackConfig,
    #[serde(default)]
    tone: ToneConfig,
}

#[derive(Deserialize, Default)]
struct DefaultsConfig {
    scale: Option<String>,
    pattern: Option<String>,
    root: Option<String>,
}

#[derive(Deserialize, Default)]
struct PlaybackConfig {
    step_interval_ms: Option<i64>,
    apply_transpose: Option<bool>,
}

#[derive(Deserialize, Default)]
struct ToneConfig {
    peak: Option<f32>,
    floor: Option<f32>,
    attack_ms: Option<f32>,
    duration_ms: Option<f32>,
}

pub struct Config {
    defaults: DefaultsConfig,
    playback: PlaybackConfig,
    tone: ToneConfig,
}

impl Config {
    /// Built-in defaults merged with the user's file, if there is one
    pub fn load() -> Self {
        let mut config = Self::builtin();

        if let Some(path) = user_config_path() {
            if path.exists() {
                match std::fs::read_to_string(&path) {
                    Ok(contents) => match toml::from_str::<ConfigFile>(&contents) {
                        Ok(user) => {
                            log::debug!(target: "config", "loaded {}", path.display());
                            config.merge(user);
                        }
                        Err(e) => {
                            log::warn!(target: "config", "ignoring malformed config {}: {}", path.display(), e)
                        }
                    },
                    Err(e) => {
                        log::warn!(target: "config", "could not read config {}: {}", path.display(), e)
                    }
                }
            }
        }

        config
    }

    /// Built-in defaults overridden by `contents`
    pub fn from_toml(contents: &str) -> Result<Self> {
        let user: ConfigFile = toml::from_str(contents)?;
        let mut config = Self::builtin();
        config.merge(user);
        Ok(config)
    }

    fn builtin() -> Self {
        let base: ConfigFile = toml::from_str(DEFAULT_CONFIG).unwrap_or_else(|e| {
            log::error!(target: "config", "embedded config.toml is invalid: {}", e);
            ConfigFile::default()
        });
        Config {
            defaults: base.defaults,
            playback: base.playback,
            tone: base.tone,
        }
    }

    fn merge(&mut self, user: ConfigFile) {
        merge_defaults(&mut self.defaults, user.defaults);
        merge_playback(&mut self.playback, user.playback);
        merge_tone(&mut self.tone, user.tone);
    }

    /// Scale, pattern and root selected at startup
    pub fn selection(&self) -> Selection {
        let fallback = Selection::default();
        Selection {
            scale: parse_or(self.defaults.scale.as_deref(), fallback.scale),
            pattern: parse_or(self.defaults.pattern.as_deref(), fallback.pattern),
            root: parse_or(self.defaults.root.as_deref(), fallback.root),
        }
    }

    pub fn playback_settings(&self) -> PlaybackSettings {
        let fallback = PlaybackSettings::default();
        let step_interval_ms = match self.playback.step_interval_ms {
            Some(ms) if ms > 0 => (ms as u64).clamp(MIN_STEP_INTERVAL_MS, MAX_STEP_INTERVAL_MS),
            Some(ms) => {
                log::warn!(target: "config", "step_interval_ms = {} is not positive; using the default", ms);
                fallback.step_interval_ms
            }
            None => fallback.step_interval_ms,
        };
        PlaybackSettings {
            step_interval_ms,
            apply_transpose: self
                .playback
                .apply_transpose
                .unwrap_or(fallback.apply_transpose),
            tone: self.tone_shape(),
        }
    }

    pub fn tone_shape(&self) -> ToneShape {
        let fallback = ToneShape::default();
        let max_ms = MAX_DURATION * 1000.0;

        let peak = valid_or("peak", self.tone.peak, fallback.peak, |v| v > 0.0 && v <= 1.0);
        let floor = valid_or("floor", self.tone.floor, fallback.floor.min(peak / 2.0), |v| {
            v > 0.0 && v < peak
        });
        let duration_ms = valid_or(
            "duration_ms",
            self.tone.duration_ms,
            fallback.duration * 1000.0,
            |v| v > 0.0 && v <= max_ms,
        );
        let attack_ms = valid_or(
            "attack_ms",
            self.tone.attack_ms,
            fallback.attack * 1000.0,
            |v| v >= 0.0 && v <= duration_ms,
        );

        ToneShape::new(peak, floor, attack_ms / 1000.0, duration_ms / 1000.0)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::builtin()
    }
}

fn user_config_path() -> Option<PathBuf> {
    if let Some(path) = std::env::var_os("WARMUP_CONFIG") {
        return Some(PathBuf::from(path));
    }
    dirs::config_dir().map(|d| d.join("vocal-warmup").join("config.toml"))
}

fn parse_or<T>(value: Option<&str>, fallback: T) -> T
where
    T: std::str::FromStr<Err = anyhow::Error>,
{
    match value {
        Some(s) => s.parse().unwrap_or_else(|e| {
            log::warn!(target: "config", "{}; using the default", e);
            fallback
        }),
        None => fallback,
    }
}

/// The configured value if it is finite and passes `accept`, else `fallback`
fn valid_or<F>(key: &str, value: Option<f32>, fallback: f32, accept: F) -> f32
where
    F: Fn(f32) -> bool,
{
    match value {
        Some(v) if v.is_finite() && accept(v) => v,
        Some(v) => {
            log::warn!(target: "config", "[tone] {} = {} is out of range; using the default", key, v);
            fallback
        }
        None => fallback,
    }
}

fn merge_defaults(base: &mut DefaultsConfig, user: DefaultsConfig) {
    if user.scale.is_some() {
        base.scale = user.scale;
    }
    if user.pattern.is_some() {
        base.pattern = user.pattern;
    }
    if user.root.is_some() {
        base.root = user.root;
    }
}

fn merge_playback(base: &mut PlaybackConfig, user: PlaybackConfig) {
    if user.step_interval_ms.is_some() {
        base.step_interval_ms = user.step_interval_ms;
    }
    if user.apply_transpose.is_some() {
        base.apply_transpose = user.apply_transpose;
    }
}

fn merge_tone(base: &mut ToneConfig, user: ToneConfig) {
    if user.peak.is_some() {
        base.peak = user.peak;
    }
    if user.floor.is_some() {
        base.floor = user.floor;
    }
    if user.attack_ms.is_some() {
        base.attack_ms = user.attack_ms;
    }
    if user.duration_ms.is_some() {
        base.duration_ms = user.duration_ms;
    }
}
