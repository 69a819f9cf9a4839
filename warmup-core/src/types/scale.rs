//! Built-in scale catalog
//!
//! Every scale spans exactly one octave: it starts on the root (offset 0) and
//! ends on the octave above (offset 12).

use anyhow::{Result, anyhow};
use std::fmt;
use std::str::FromStr;

const MAJOR: [i32; 8] = [0, 2, 4, 5, 7, 9, 11, 12];
const MINOR: [i32; 8] = [0, 2, 3, 5, 7, 8, 10, 12];
const CHROMATIC: [i32; 13] = [0, 1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11, 12];

/// A named scale, stored as semitone offsets from the root
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum Scale {
    #[default]
    Major,
    Minor,
    Chromatic,
}

impl Scale {
    pub const ALL: [Scale; 3] = [Scale::Major, Scale::Minor, Scale::Chromatic];

    /// Semitone offsets from the root, 0 through 12 inclusive
    pub fn offsets(&self) -> &'static [i32] {
        match self {
            Scale::Major => &MAJOR,
            Scale::Minor => &MINOR,
            Scale::Chromatic => &CHROMATIC,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Scale::Major => "major",
            Scale::Minor => "minor",
            Scale::Chromatic => "chromatic",
        }
    }

    /// Number of degrees including the octave
    pub fn len(&self) -> usize {
        self.offsets().len()
    }

    pub fn is_empty(&self) -> bool {
        self.offsets().is_empty()
    }
}

impl fmt::Display for Scale {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl FromStr for Scale {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim().to_lowercase();
        Scale::ALL
            .iter()
            .copied()
            .find(|scale| scale.name() == s)
            .ok_or_else(|| anyhow!("Unknown scale '{}' (expected major, minor or chromatic)", s))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scales_span_one_octave() {
        for scale in Scale::ALL {
            let offsets = scale.offsets();
            assert_eq!(offsets.first(), Some(&0), "{} must start on the root", scale);
            assert_eq!(offsets.last(), Some(&12), "{} must end on the octave", scale);
            assert!(
                offsets.windows(2).all(|w| w[0] < w[1]),
                "{} must be strictly ascending",
                scale
            );
        }
    }

    #[test]
    fn test_scale_lengths() {
        assert_eq!(Scale::Major.len(), 8);
        assert_eq!(Scale::Minor.len(), 8);
        assert_eq!(Scale::Chromatic.len(), 13);
    }

    #[test]
    fn test_scale_parsing() {
        assert_eq!("major".parse::<Scale>().unwrap(), Scale::Major);
        assert_eq!(" Minor ".parse::<Scale>().unwrap(), Scale::Minor);
        assert_eq!("CHROMATIC".parse::<Scale>().unwrap(), Scale::Chromatic);
        assert!("dorian".parse::<Scale>().is_err());
    }
}
