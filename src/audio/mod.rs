pub mod audio;
pub mod envelope;
pub mod oscillator;
pub mod playback_engine;
pub mod scheduler;

use anyhow::Result;

pub use audio::AudioPlayerHandle;
pub use playback_engine::PlaybackEngine;

/// Something that can sound a tone
///
/// Emission is fire-and-forget: the tone decays and stops on its own.
pub trait ToneSink: Send + Sync {
    fn emit(&self, frequency: f32) -> Result<()>;
}
