use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Inclusive MIDI pitch range. `(0, 0)` is the sentinel for "no notes".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PitchRange {
    pub min: u8,
    pub max: u8,
}

impl PitchRange {
    pub fn from_pitches(pitches: impl IntoIterator<Item = u8>) -> Self {
        let mut iter = pitches.into_iter();
        let Some(first) = iter.next() else {
            return Self::default();
        };
        let (min, max) = iter.fold((first, first), |(lo, hi), p| (lo.min(p), hi.max(p)));
        Self { min, max }
    }

    /// Number of semitones covered, counting both endpoints.
    pub fn span(&self) -> u32 {
        self.max.saturating_sub(self.min) as u32 + 1
    }
}

/// Rhythmic value of a note, by its length in quarter-note units.
///
/// `Triplet` is the catch-all for anything shorter than a sixteenth,
/// not a rhythmic-triplet detector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RhythmValue {
    Whole,
    Half,
    Quarter,
    Eighth,
    Sixteenth,
    Triplet,
}

impl RhythmValue {
    pub const ALL: [RhythmValue; 6] = [
        RhythmValue::Whole,
        RhythmValue::Half,
        RhythmValue::Quarter,
        RhythmValue::Eighth,
        RhythmValue::Sixteenth,
        RhythmValue::Triplet,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Whole => "whole",
            Self::Half => "half",
            Self::Quarter => "quarter",
            Self::Eighth => "eighth",
            Self::Sixteenth => "sixteenth",
            Self::Triplet => "triplet",
        }
    }
}

impl std::fmt::Display for RhythmValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Share of total note duration per rhythmic value, in percent.
///
/// Values sum to ~100 when notes exist, all zero otherwise.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct RhythmDistribution {
    shares: [f32; 6],
}

impl RhythmDistribution {
    pub fn new(shares: [f32; 6]) -> Self {
        Self { shares }
    }

    pub fn share(&self, value: RhythmValue) -> f32 {
        self.shares[value as usize]
    }

    pub fn total(&self) -> f32 {
        self.shares.iter().sum()
    }

    pub fn iter(&self) -> impl Iterator<Item = (RhythmValue, f32)> + '_ {
        RhythmValue::ALL.iter().map(|&v| (v, self.shares[v as usize]))
    }
}

/// Melodic interval class between two consecutive notes, in semitones.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IntervalClass {
    Unison,
    Step,
    SmallLeap,
    LargeLeap,
}

impl IntervalClass {
    pub const ALL: [IntervalClass; 4] = [
        IntervalClass::Unison,
        IntervalClass::Step,
        IntervalClass::SmallLeap,
        IntervalClass::LargeLeap,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Unison => "unison",
            Self::Step => "step",
            Self::SmallLeap => "small_leap",
            Self::LargeLeap => "large_leap",
        }
    }
}

impl std::fmt::Display for IntervalClass {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Share of consecutive-note intervals per class, in percent.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct IntervalDistribution {
    shares: [f32; 4],
}

impl IntervalDistribution {
    pub fn new(shares: [f32; 4]) -> Self {
        Self { shares }
    }

    pub fn share(&self, class: IntervalClass) -> f32 {
        self.shares[class as usize]
    }

    pub fn total(&self) -> f32 {
        self.shares.iter().sum()
    }

    pub fn iter(&self) -> impl Iterator<Item = (IntervalClass, f32)> + '_ {
        IntervalClass::ALL.iter().map(|&c| (c, self.shares[c as usize]))
    }
}

/// Detected tonal center and scale.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModeAnalysis {
    /// e.g. "C Major", "A Minor", "G Pentatonic", "D (Unknown Mode)"
    pub detected_mode: String,
    /// Fraction of notes inside the detected scale, 0.0–1.0
    pub confidence: f32,
    /// Scale degrees as note names, tonic first (or observed pitch
    /// classes ascending when no template matched)
    pub scale_notes: Vec<String>,
}

/// A track considered for vocal melody selection, with its score.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrackCandidate {
    pub track_index: usize,
    pub track_name: String,
    pub note_count: usize,
    pub pitch_range: PitchRange,
    pub score: f32,
}

/// Full melodic analysis of the selected vocal track.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisResult {
    pub file_path: PathBuf,
    pub total_notes: usize,
    pub note_range: PitchRange,
    pub rhythm: RhythmDistribution,
    pub intervals: IntervalDistribution,
    pub mode: ModeAnalysis,
}

/// File-level facts, independent of vocal track selection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FileInfo {
    pub file_path: PathBuf,
    pub track_count: usize,
    pub duration: Duration,
    pub ticks_per_quarter_note: u16,
    pub tempo_bpm: u32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pitch_range_from_pitches() {
        assert_eq!(
            PitchRange::from_pitches([64, 60, 72]),
            PitchRange { min: 60, max: 72 }
        );
        assert_eq!(PitchRange::from_pitches([]), PitchRange { min: 0, max: 0 });
    }

    #[test]
    fn pitch_range_span_is_inclusive() {
        assert_eq!(PitchRange { min: 48, max: 84 }.span(), 37);
        assert_eq!(PitchRange { min: 60, max: 60 }.span(), 1);
    }

    #[test]
    fn category_labels() {
        assert_eq!(RhythmValue::Sixteenth.as_str(), "sixteenth");
        assert_eq!(IntervalClass::SmallLeap.as_str(), "small_leap");
    }

    #[test]
    fn empty_distributions_sum_to_zero() {
        assert_eq!(RhythmDistribution::default().total(), 0.0);
        assert_eq!(IntervalDistribution::default().total(), 0.0);
    }
}
