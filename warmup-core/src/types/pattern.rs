//! Traversal patterns and the note-sequence generator
//!
//! A pattern turns a scale's offsets into the order in which they are sung.

use anyhow::{Result, anyhow};
use std::fmt;
use std::str::FromStr;

/// Playback order applied to a scale
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub enum Pattern {
    /// The scale as written
    #[default]
    Ascending,
    /// The scale reversed
    Descending,
    /// Up to the octave, then back down without repeating the octave
    AscendingDescending,
    /// Root interleaved with every other degree: 0 d1 0 d2 ...
    Broken,
}

impl Pattern {
    pub const ALL: [Pattern; 4] = [
        Pattern::Ascending,
        Pattern::Descending,
        Pattern::AscendingDescending,
        Pattern::Broken,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Pattern::Ascending => "ascending",
            Pattern::Descending => "descending",
            Pattern::AscendingDescending => "ascendingDescending",
            Pattern::Broken => "broken",
        }
    }

    /// Length of the generated sequence for a scale of `n` degrees
    pub fn sequence_len(&self, n: usize) -> usize {
        match self {
            Pattern::Ascending | Pattern::Descending => n,
            Pattern::AscendingDescending => (2 * n).saturating_sub(1),
            Pattern::Broken => 2 * n.saturating_sub(1),
        }
    }
}

impl fmt::Display for Pattern {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl FromStr for Pattern {
    type Err = anyhow::Error;

    /// Case-insensitive; `-`, `_` and spaces are ignored so that
    /// `ascending-descending` parses like `ascendingDescending`.
    fn from_str(s: &str) -> Result<Self> {
        let key: String = s
            .trim()
            .chars()
            .filter(|c| !matches!(c, '-' | '_' | ' '))
            .collect::<String>()
            .to_lowercase();

        match key.as_str() {
            "ascending" | "up" => Ok(Pattern::Ascending),
            "descending" | "down" => Ok(Pattern::Descending),
            "ascendingdescending" | "updown" => Ok(Pattern::AscendingDescending),
            "broken" => Ok(Pattern::Broken),
            _ => Err(anyhow!(
                "Unknown pattern '{}' (expected ascending, descending, ascendingDescending or broken)",
                s.trim()
            )),
        }
    }
}

/// Produce the ordered semitone offsets to play for `scale` traversed by `pattern`
pub fn generate(scale: &[i32], pattern: Pattern) -> Vec<i32> {
    match pattern {
        Pattern::Ascending => scale.to_vec(),
        Pattern::Descending => scale.iter().rev().copied().collect(),
        Pattern::AscendingDescending => match scale.split_last() {
            Some((_, without_octave)) => scale
                .iter()
                .copied()
                .chain(without_octave.iter().rev().copied())
                .collect(),
            None => Vec::new(),
        },
        Pattern::Broken => match scale.split_first() {
            Some((&root, degrees)) => degrees.iter().flat_map(|&d| [root, d]).collect(),
            None => Vec::new(),
        },
    }
}

/// String-keyed variant of [`generate`]
///
/// An unrecognized pattern name produces no notes rather than an error.
pub fn generate_by_name(scale: &[i32], pattern: &str) -> Vec<i32> {
    match pattern.parse::<Pattern>() {
        Ok(pattern) => generate(scale, pattern),
        Err(_) => Vec::new(),
    }
}
