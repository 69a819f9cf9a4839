//! Amplitude shape of a single warm-up tone
//!
//! Pure data shared by the native synthesizer and the browser build, which
//! feeds the same numbers to Web Audio gain ramps.

/// Envelope of an emitted tone
///
/// - `peak`: amplitude reached at the end of the attack
/// - `floor`: amplitude the exponential decay reaches at `duration`
/// - `attack`: seconds from silence to `peak`
/// - `duration`: total seconds the tone sounds, attack included
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ToneShape {
    pub peak: f32,
    pub floor: f32,
    pub attack: f32,
    pub duration: f32,
}

const DEFAULT_PEAK: f32 = 0.5;
const DEFAULT_FLOOR: f32 = 0.01;
const DEFAULT_ATTACK: f32 = 0.005;
const DEFAULT_DURATION: f32 = 0.5;

/// Longest tone, in seconds
pub const MAX_DURATION: f32 = 10.0;

impl ToneShape {
    /// Build a shape, clamping every field into a playable range. Non-finite
    /// inputs are replaced by the default for that field.
    pub fn new(peak: f32, floor: f32, attack: f32, duration: f32) -> Self {
        let peak = finite_or(peak, DEFAULT_PEAK).clamp(0.001, 1.0);
        let duration = finite_or(duration, DEFAULT_DURATION).clamp(0.01, MAX_DURATION);
        Self {
            peak,
            // Exponential decay needs a strictly positive target below the peak
            floor: finite_or(floor, DEFAULT_FLOOR).clamp(0.0001, peak),
            attack: finite_or(attack, DEFAULT_ATTACK).clamp(0.0, duration / 2.0),
            duration,
        }
    }

    /// Seconds spent decaying from `peak` to `floor`
    pub fn decay_time(&self) -> f32 {
        self.duration - self.attack
    }
}

impl Default for ToneShape {
    /// Half-amplitude sine blip that fades out over half a second
    fn default() -> Self {
        Self::new(DEFAULT_PEAK, DEFAULT_FLOOR, DEFAULT_ATTACK, DEFAULT_DURATION)
    }
}

fn finite_or(value: f32, fallback: f32) -> f32 {
    if value.is_finite() {
        value
    } else {
        fallback
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_shape() {
        let shape = ToneShape::default();
        assert_eq!(shape.peak, 0.5);
        assert_eq!(shape.floor, 0.01);
        assert_eq!(shape.duration, 0.5);
        assert!((shape.decay_time() - 0.495).abs() < 1e-6);
    }

    #[test]
    fn test_shape_clamping() {
        let shape = ToneShape::new(3.0, 0.0, 10.0, 0.0);
        assert_eq!(shape.peak, 1.0);
        assert!(shape.floor > 0.0);
        assert_eq!(shape.duration, 0.01);
        assert!(shape.attack <= shape.duration / 2.0);
    }

    #[test]
    fn test_floor_never_exceeds_peak() {
        let shape = ToneShape::new(0.2, 0.9, 0.0, 0.5);
        assert!(shape.floor <= shape.peak);
    }

    #[test]
    fn test_non_finite_values_use_defaults() {
        let shape = ToneShape::new(f32::NAN, f32::NAN, f32::INFINITY, f32::NEG_INFINITY);
        assert_eq!(shape, ToneShape::default());

        let shape = ToneShape::new(0.8, 0.02, f32::INFINITY, f32::INFINITY);
        assert_eq!(shape.peak, 0.8);
        assert_eq!(shape.duration, 0.5);
        assert_eq!(shape.attack, 0.005);
    }

    #[test]
    fn test_duration_is_capped() {
        let shape = ToneShape::new(0.5, 0.01, 1.0e9, 1.0e9);
        assert_eq!(shape.duration, MAX_DURATION);
        assert_eq!(shape.attack, MAX_DURATION / 2.0);
    }
}
