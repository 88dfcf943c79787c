use crate::types::{RhythmDistribution, RhythmValue};
use midi_score::TimedNote;

/// Classify a note length by its ratio to a quarter note.
///
/// Thresholds are checked in descending order; anything shorter than a
/// sixteenth falls into the `Triplet` catch-all.
pub fn classify_duration(duration_ticks: u64, ticks_per_quarter: u16) -> RhythmValue {
    let ratio = duration_ticks as f64 / ticks_per_quarter.max(1) as f64;

    if ratio >= 4.0 {
        RhythmValue::Whole
    } else if ratio >= 2.0 {
        RhythmValue::Half
    } else if ratio >= 1.0 {
        RhythmValue::Quarter
    } else if ratio >= 0.5 {
        RhythmValue::Eighth
    } else if ratio >= 0.25 {
        RhythmValue::Sixteenth
    } else {
        RhythmValue::Triplet
    }
}

/// Share of total sounding ticks per rhythmic value, in percent.
///
/// Each note's raw tick duration accumulates into its bucket; buckets are
/// then normalized by the total. All zero when there are no notes.
pub fn rhythm_distribution(notes: &[TimedNote], ticks_per_quarter: u16) -> RhythmDistribution {
    let mut buckets = [0.0_f64; 6];
    let mut total = 0.0_f64;

    for note in notes {
        let ticks = note.duration_ticks();
        let value = classify_duration(ticks, ticks_per_quarter);
        buckets[value as usize] += ticks as f64;
        total += ticks as f64;
    }

    if total == 0.0 {
        return RhythmDistribution::default();
    }

    let mut shares = [0.0_f32; 6];
    for (i, bucket) in buckets.iter().enumerate() {
        shares[i] = (bucket / total * 100.0) as f32;
    }
    RhythmDistribution::new(shares)
}
