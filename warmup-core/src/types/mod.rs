// warmup-core/src/types/mod.rs

pub mod pattern;
pub mod root_note;
pub mod scale;
pub mod tone;

pub use pattern::{Pattern, generate, generate_by_name};
pub use root_note::{RootNote, semitone_frequency};
pub use scale::Scale;
pub use tone::ToneShape;

/// The scale, pattern and root note currently chosen by the user
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Selection {
    pub scale: Scale,
    pub pattern: Pattern,
    pub root: RootNote,
}

impl Selection {
    pub fn new(scale: Scale, pattern: Pattern, root: RootNote) -> Self {
        Self {
            scale,
            pattern,
            root,
        }
    }

    /// Generate the offsets this selection plays
    pub fn sequence(&self) -> Vec<i32> {
        generate(self.scale.offsets(), self.pattern)
    }
}
