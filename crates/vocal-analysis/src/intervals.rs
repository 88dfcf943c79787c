use crate::types::{IntervalClass, IntervalDistribution};
use midi_score::TimedNote;

/// Classify an absolute semitone distance between consecutive notes.
pub fn classify_interval(semitones: u32) -> IntervalClass {
    match semitones {
        0 => IntervalClass::Unison,
        1..=2 => IntervalClass::Step,
        3..=4 => IntervalClass::SmallLeap,
        _ => IntervalClass::LargeLeap,
    }
}

/// Share of consecutive-note intervals per class, in percent.
///
/// Notes are sorted by onset before pairing. Fewer than 2 notes yields
/// an all-zero distribution.
pub fn interval_distribution(notes: &[TimedNote]) -> IntervalDistribution {
    if notes.len() < 2 {
        return IntervalDistribution::default();
    }

    let mut sorted: Vec<&TimedNote> = notes.iter().collect();
    sorted.sort_by_key(|n| n.onset_tick);

    let mut counts = [0usize; 4];
    for pair in sorted.windows(2) {
        let semitones = (pair[1].pitch as i32 - pair[0].pitch as i32).unsigned_abs();
        counts[classify_interval(semitones) as usize] += 1;
    }

    let total = (sorted.len() - 1) as f32;
    let mut shares = [0.0_f32; 4];
    for (i, count) in counts.iter().enumerate() {
        shares[i] = *count as f32 / total * 100.0;
    }
    IntervalDistribution::new(shares)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_note(pitch: u8, onset: u64) -> TimedNote {
        TimedNote {
            onset_tick: onset,
            offset_tick: onset + 240,
            pitch,
            velocity: 100,
            channel: 0,
        }
    }

    fn notes_from(pitches: &[u8]) -> Vec<TimedNote> {
        pitches
            .iter()
            .enumerate()
            .map(|(i, &p)| make_note(p, i as u64 * 480))
            .collect()
    }

    #[test]
    fn classification_boundaries() {
        assert_eq!(classify_interval(0), IntervalClass::Unison);
        assert_eq!(classify_interval(1), IntervalClass::Step);
        assert_eq!(classify_interval(2), IntervalClass::Step);
        assert_eq!(classify_interval(3), IntervalClass::SmallLeap);
        assert_eq!(classify_interval(4), IntervalClass::SmallLeap);
        assert_eq!(classify_interval(5), IntervalClass::LargeLeap);
        assert_eq!(classify_interval(12), IntervalClass::LargeLeap);
    }

    #[test]
    fn repeated_pitch_is_all_unison() {
        let dist = interval_distribution(&notes_from(&[60, 60, 60, 60]));
        assert_eq!(dist.share(IntervalClass::Unison), 100.0);
        assert_eq!(dist.share(IntervalClass::Step), 0.0);
        assert_eq!(dist.share(IntervalClass::SmallLeap), 0.0);
        assert_eq!(dist.share(IntervalClass::LargeLeap), 0.0);
    }

    #[test]
    fn mixed_intervals() {
        // 60→62 step, 62→65 small leap, 65→72 large leap, 72→72 unison
        let dist = interval_distribution(&notes_from(&[60, 62, 65, 72, 72]));
        assert_eq!(dist.share(IntervalClass::Unison), 25.0);
        assert_eq!(dist.share(IntervalClass::Step), 25.0);
        assert_eq!(dist.share(IntervalClass::SmallLeap), 25.0);
        assert_eq!(dist.share(IntervalClass::LargeLeap), 25.0);
    }

    #[test]
    fn descending_motion_uses_absolute_distance() {
        let dist = interval_distribution(&notes_from(&[72, 70, 67]));
        assert_eq!(dist.share(IntervalClass::Step), 50.0);
        assert_eq!(dist.share(IntervalClass::SmallLeap), 50.0);
    }

    #[test]
    fn unsorted_input_is_sorted_by_onset() {
        // Same pitches as `mixed_intervals` but supplied out of order
        let mut notes = notes_from(&[60, 62, 65, 72, 72]);
        notes.reverse();
        let dist = interval_distribution(&notes);
        assert_eq!(dist.share(IntervalClass::Unison), 25.0);
        assert_eq!(dist.share(IntervalClass::LargeLeap), 25.0);
    }

    #[test]
    fn fewer_than_two_notes_all_zero() {
        assert_eq!(interval_distribution(&[]).total(), 0.0);
        assert_eq!(interval_distribution(&notes_from(&[60])).total(), 0.0);
    }

    #[test]
    fn shares_sum_to_100() {
        let dist = interval_distribution(&notes_from(&[60, 61, 64, 70, 70, 58]));
        assert!((dist.total() - 100.0).abs() < 0.001);
    }
}
