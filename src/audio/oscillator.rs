//! Sine voice for a single warm-up tone
//!
//! Provides `ToneVoice`, a sine oscillator shaped by a [`DecayEnvelope`].

use super::envelope::DecayEnvelope;
use std::f32::consts::PI;
use warmup_core::types::ToneShape;

/// One sounding tone
pub struct ToneVoice {
    frequency: f32,
    phase: f32,
    sample_rate: f32,
    envelope: DecayEnvelope,
}

impl ToneVoice {
    /// Create a voice that starts sounding immediately
    pub fn new(frequency: f32, sample_rate: f32, shape: ToneShape) -> Self {
        let mut envelope = DecayEnvelope::new(shape, sample_rate);
        envelope.trigger();

        Self {
            frequency,
            phase: 0.0,
            sample_rate,
            envelope,
        }
    }

    pub fn frequency(&self) -> f32 {
        self.frequency
    }

    pub fn is_finished(&self) -> bool {
        self.envelope.is_finished()
    }

    /// Generate the next sample
    pub fn next_sample(&mut self) -> f32 {
        let value = (2.0 * PI * self.phase).sin();

        self.phase += self.frequency / self.sample_rate;
        if self.phase >= 1.0 {
            self.phase -= 1.0;
        }

        value * self.envelope.next_sample()
    }
}

/// Mix one sample from every voice, dropping voices that have finished
pub fn mix_voices(voices: &mut Vec<ToneVoice>) -> f32 {
    let sum: f32 = voices.iter_mut().map(|v| v.next_sample()).sum();
    voices.retain(|v| !v.is_finished());
    sum.clamp(-1.0, 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE_RATE: f32 = 44100.0;

    #[test]
    fn test_voice_range() {
        let mut voice = ToneVoice::new(440.0, SAMPLE_RATE, ToneShape::default());
        for _ in 0..5000 {
            let sample = voice.next_sample();
            assert!(
                (-0.5..=0.5).contains(&sample),
                "Sample out of range: {}",
                sample
            );
        }
    }

    #[test]
    fn test_voice_stops_after_duration() {
        let mut voice = ToneVoice::new(440.0, SAMPLE_RATE, ToneShape::default());
        for _ in 0..22050 {
            voice.next_sample();
        }
        assert!(voice.is_finished());
        assert_eq!(voice.next_sample(), 0.0);
    }

    #[test]
    fn test_voice_is_audible() {
        let mut voice = ToneVoice::new(261.63, SAMPLE_RATE, ToneShape::default());
        let peak = (0..2000)
            .map(|_| voice.next_sample().abs())
            .fold(0.0f32, f32::max);
        assert!(peak > 0.4, "peak was {}", peak);
    }

    #[test]
    fn test_mix_removes_finished_voices() {
        let short = ToneShape::new(0.5, 0.01, 0.0, 0.01);
        let mut voices = vec![
            ToneVoice::new(440.0, SAMPLE_RATE, short),
            ToneVoice::new(440.0, SAMPLE_RATE, ToneShape::default()),
        ];

        for _ in 0..1000 {
            let sample = mix_voices(&mut voices);
            assert!((-1.0..=1.0).contains(&sample));
        }
        assert_eq!(voices.len(), 1);
        assert_eq!(voices[0].frequency(), 440.0);
    }
}
