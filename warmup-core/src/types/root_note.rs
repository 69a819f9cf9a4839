//! Root notes and pitch computation

use anyhow::{Result, anyhow};
use std::fmt;
use std::str::FromStr;

/// 12-tone equal temperament frequencies for the 4th octave (C4-B4), A4 = 440Hz
const BASE_OCTAVE_FREQUENCIES: [f32; 12] = [
    261.63, // C4
    277.18, // C#4
    293.66, // D4
    311.13, // D#4
    329.63, // E4
    349.23, // F4
    369.99, // F#4
    392.00, // G4
    415.30, // G#4
    440.00, // A4
    466.16, // A#4
    493.88, // B4
];

/// The pitch that offset 0 maps to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum RootNote {
    #[default]
    C,
    #[cfg_attr(feature = "serde", serde(rename = "C#"))]
    CSharp,
    D,
    #[cfg_attr(feature = "serde", serde(rename = "D#"))]
    DSharp,
    E,
    F,
    #[cfg_attr(feature = "serde", serde(rename = "F#"))]
    FSharp,
    G,
    #[cfg_attr(feature = "serde", serde(rename = "G#"))]
    GSharp,
    A,
    #[cfg_attr(feature = "serde", serde(rename = "A#"))]
    ASharp,
    B,
}

impl RootNote {
    pub const ALL: [RootNote; 12] = [
        RootNote::C,
        RootNote::CSharp,
        RootNote::D,
        RootNote::DSharp,
        RootNote::E,
        RootNote::F,
        RootNote::FSharp,
        RootNote::G,
        RootNote::GSharp,
        RootNote::A,
        RootNote::ASharp,
        RootNote::B,
    ];

    /// Chromatic pitch class, 0 = C through 11 = B
    pub fn pitch_class(&self) -> u8 {
        *self as u8
    }

    pub fn from_pitch_class(pitch_class: u8) -> Result<Self> {
        RootNote::ALL
            .get(pitch_class as usize)
            .copied()
            .ok_or_else(|| anyhow!("Pitch class must be 0-11, got {}", pitch_class))
    }

    pub fn name(&self) -> &'static str {
        match self {
            RootNote::C => "C",
            RootNote::CSharp => "C#",
            RootNote::D => "D",
            RootNote::DSharp => "D#",
            RootNote::E => "E",
            RootNote::F => "F",
            RootNote::FSharp => "F#",
            RootNote::G => "G",
            RootNote::GSharp => "G#",
            RootNote::A => "A",
            RootNote::ASharp => "A#",
            RootNote::B => "B",
        }
    }

    /// Base frequency in Hz
    pub fn frequency(&self) -> f32 {
        BASE_OCTAVE_FREQUENCIES[self.pitch_class() as usize]
    }
}

/// Frequency of the pitch `semitones` above (or below) `base`
pub fn semitone_frequency(base: f32, semitones: i32) -> f32 {
    base * 2.0_f32.powf(semitones as f32 / 12.0)
}

impl fmt::Display for RootNote {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl FromStr for RootNote {
    type Err = anyhow::Error;

    /// Accepts sharp names (`C#`) and the enharmonic flats (`Db`)
    fn from_str(s: &str) -> Result<Self> {
        let trimmed = s.trim();
        let mut chars = trimmed.chars();
        let letter = chars
            .next()
            .ok_or_else(|| anyhow!("Empty root note"))?
            .to_ascii_uppercase();

        let natural: i8 = match letter {
            'C' => 0,
            'D' => 2,
            'E' => 4,
            'F' => 5,
            'G' => 7,
            'A' => 9,
            'B' => 11,
            _ => return Err(anyhow!("Invalid root note '{}'", trimmed)),
        };

        let accidental: i8 = match chars.as_str() {
            "" => 0,
            "#" | "s" | "S" => 1,
            "b" => -1,
            _ => return Err(anyhow!("Invalid root note '{}'", trimmed)),
        };

        // Cb and B# would leave the octave; the catalog has no such roots
        let pitch_class = natural + accidental;
        if !(0..12).contains(&pitch_class) {
            return Err(anyhow!("Root note '{}' is not in the catalog", trimmed));
        }
        RootNote::from_pitch_class(pitch_class as u8)
    }
}
