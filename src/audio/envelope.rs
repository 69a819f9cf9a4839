//! Attack/decay amplitude envelope for warm-up tones
//!
//! A short linear attack up to the peak, then an exponential decay that lands
//! on the floor level exactly when the tone's duration runs out. The envelope
//! finishes on its own; there is no note-off.
//!
//! # Example
//! ```ignore
//! let mut env = DecayEnvelope::new(ToneShape::default(), 44100.0);
//! env.trigger();
//!
//! // In audio callback:
//! let amplitude = env.next_sample();
//! ```

use warmup_core::types::ToneShape;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnvelopeStage {
    /// Not sounding, output is 0
    Idle,
    /// Rising from 0 to peak
    Attack,
    /// Falling exponentially from peak toward floor
    Decay,
}

/// Per-sample envelope generator
#[derive(Clone)]
pub struct DecayEnvelope {
    shape: ToneShape,
    stage: EnvelopeStage,
    level: f32,
    elapsed: u32,

    // Pre-computed from shape and sample rate
    attack_samples: u32,
    total_samples: u32,
    attack_step: f32,
    decay_coeff: f32,
}

impl DecayEnvelope {
    pub fn new(shape: ToneShape, sample_rate: f32) -> Self {
        let attack_samples = (shape.attack * sample_rate).round() as u32;
        let total_samples =
            ((shape.duration * sample_rate).round() as u32).max(attack_samples.saturating_add(1));
        let decay_samples = total_samples.saturating_sub(attack_samples).max(1) as f32;

        // level_n = peak * coeff^n reaches floor after decay_samples samples
        let decay_coeff = (shape.floor / shape.peak).powf(1.0 / decay_samples);

        Self {
            shape,
            stage: EnvelopeStage::Idle,
            level: 0.0,
            elapsed: 0,
            attack_samples,
            total_samples,
            attack_step: shape.peak / attack_samples.max(1) as f32,
            decay_coeff,
        }
    }

    /// Start the envelope from silence
    pub fn trigger(&mut self) {
        self.elapsed = 0;
        if self.attack_samples == 0 {
            self.level = self.shape.peak;
            self.stage = EnvelopeStage::Decay;
        } else {
            self.level = 0.0;
            self.stage = EnvelopeStage::Attack;
        }
    }

    pub fn force_stop(&mut self) {
        self.stage = EnvelopeStage::Idle;
        self.level = 0.0;
    }

    pub fn stage(&self) -> EnvelopeStage {
        self.stage
    }

    pub fn level(&self) -> f32 {
        self.level
    }

    pub fn is_finished(&self) -> bool {
        self.stage == EnvelopeStage::Idle
    }

    /// Number of samples the tone lasts
    pub fn total_samples(&self) -> u32 {
        self.total_samples
    }

    /// Generate the next amplitude value
    pub fn next_sample(&mut self) -> f32 {
        let out = match self.stage {
            EnvelopeStage::Idle => return 0.0,
            EnvelopeStage::Attack => {
                self.level = (self.level + self.attack_step).min(self.shape.peak);
                if self.elapsed.saturating_add(1) >= self.attack_samples {
                    self.level = self.shape.peak;
                    self.stage = EnvelopeStage::Decay;
                }
                self.level
            }
            EnvelopeStage::Decay => {
                self.level *= self.decay_coeff;
                self.level
            }
        };

        self.elapsed = self.elapsed.saturating_add(1);
        if self.elapsed >= self.total_samples {
            self.force_stop();
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE_RATE: f32 = 44100.0;

    #[test]
    fn test_envelope_idle_start() {
        let env = DecayEnvelope::new(ToneShape::default(), SAMPLE_RATE);
        assert_eq!(env.stage(), EnvelopeStage::Idle);
        assert_eq!(env.level(), 0.0);
        assert!(env.is_finished());
    }

    #[test]
    fn test_envelope_reaches_peak_after_attack() {
        let shape = ToneShape::default();
        let mut env = DecayEnvelope::new(shape, SAMPLE_RATE);
        env.trigger();
        assert_eq!(env.stage(), EnvelopeStage::Attack);

        let attack_samples = (shape.attack * SAMPLE_RATE).round() as usize;
        let mut max = 0.0f32;
        for _ in 0..attack_samples {
            max = max.max(env.next_sample());
        }
        assert_eq!(env.stage(), EnvelopeStage::Decay);
        assert!((max - 0.5).abs() < 1e-6, "peak was {}", max);
    }

    #[test]
    fn test_envelope_never_exceeds_peak() {
        let mut env = DecayEnvelope::new(ToneShape::default(), SAMPLE_RATE);
        env.trigger();
        while !env.is_finished() {
            assert!(env.next_sample() <= 0.5 + 1e-6);
        }
    }

    #[test]
    fn test_envelope_decays_to_floor_and_finishes() {
        let mut env = DecayEnvelope::new(ToneShape::default(), SAMPLE_RATE);
        env.trigger();

        let total = env.total_samples();
        assert_eq!(total, 22050);

        let mut last = 0.0;
        for _ in 0..total {
            last = env.next_sample();
        }
        assert!(last < 0.011, "last audible level was {}", last);
        assert!(last > 0.009, "last audible level was {}", last);
        assert!(env.is_finished());
        assert_eq!(env.next_sample(), 0.0);
    }

    #[test]
    fn test_instant_attack_starts_at_peak() {
        let shape = ToneShape::new(0.5, 0.01, 0.0, 0.5);
        let mut env = DecayEnvelope::new(shape, SAMPLE_RATE);
        env.trigger();
        assert_eq!(env.stage(), EnvelopeStage::Decay);
        let first = env.next_sample();
        assert!(first < 0.5 && first > 0.49);
    }

    #[test]
    fn test_retrigger_restarts() {
        let mut env = DecayEnvelope::new(ToneShape::default(), SAMPLE_RATE);
        env.trigger();
        for _ in 0..30000 {
            env.next_sample();
        }
        assert!(env.is_finished());

        env.trigger();
        assert!(!env.is_finished());
        assert!(env.next_sample() > 0.0);
    }

    #[test]
    fn test_unbounded_shape_does_not_overflow() {
        let shape = ToneShape {
            peak: 0.5,
            floor: 0.01,
            attack: f32::INFINITY,
            duration: f32::INFINITY,
        };
        let mut env = DecayEnvelope::new(shape, SAMPLE_RATE);
        env.trigger();
        assert!(env.next_sample().is_finite());
    }
}
