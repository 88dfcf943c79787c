use crate::types::{PitchRange, TrackCandidate};
use midi_score::{Score, TimedNote};
use std::collections::HashSet;
use tracing::debug;

/// Reference vocal range: C3–C6 in MIDI note numbers.
const VOCAL_RANGE: PitchRange = PitchRange { min: 48, max: 84 };

/// Track-name keywords that mark a lead vocal part, English and Chinese.
const VOCAL_KEYWORDS: [&str; 9] = [
    "vocal", "voice", "sing", "melody", "lead", "人声", "主旋律", "主唱", "vocalist",
];

/// Score one track's plausibility as the lead vocal melody, 0–100.
///
/// Five additive criteria: name keyword (+30), vocal range overlap
/// (+25/+15), note-count band (+20/+10), note density (+15), and
/// interval variety (+10). Pure function of the track name and notes.
pub fn score_track(name: &str, notes: &[TimedNote]) -> f32 {
    let mut score = 0.0_f32;
    let lowered = name.to_lowercase();

    // 1. Name match
    if VOCAL_KEYWORDS.iter().any(|kw| lowered.contains(kw)) {
        score += 30.0;
    }

    // 2. Range overlap with the reference vocal range
    let range = PitchRange::from_pitches(notes.iter().map(|n| n.pitch));
    let overlap = range_overlap(range, VOCAL_RANGE);
    if overlap > 0.7 {
        score += 25.0;
    } else if overlap > 0.5 {
        score += 15.0;
    }

    // 3. Note-count plausibility
    if (20..=200).contains(&notes.len()) {
        score += 20.0;
    } else if notes.len() > 10 {
        score += 10.0;
    }

    // 4. Note density (notes per tick over the sounding span)
    let density = note_density(notes);
    if density > 0.3 && density < 0.8 {
        score += 15.0;
    }

    // 5. Interval variety
    if interval_variety(notes) > 0.3 {
        score += 10.0;
    }

    score
}

/// Score every track that has notes; zero-note tracks are never candidates.
pub fn score_tracks(score: &Score) -> Vec<TrackCandidate> {
    let mut candidates = Vec::new();

    for track in &score.tracks {
        if track.notes.is_empty() {
            continue;
        }

        let name = track
            .name
            .clone()
            .unwrap_or_else(|| format!("Track {}", track.index + 1));
        let track_score = score_track(&name, &track.notes);
        debug!(
            track = track.index,
            name = %name,
            notes = track.notes.len(),
            score = track_score,
            "scored vocal candidate"
        );

        candidates.push(TrackCandidate {
            track_index: track.index,
            track_name: name,
            note_count: track.notes.len(),
            pitch_range: PitchRange::from_pitches(track.notes.iter().map(|n| n.pitch)),
            score: track_score,
        });
    }

    candidates
}

/// Pick the best candidate. Updates only on strictly greater score, so
/// ties resolve to the lowest track index.
pub fn select_vocal_track(candidates: &[TrackCandidate]) -> Option<&TrackCandidate> {
    let mut best: Option<&TrackCandidate> = None;
    for candidate in candidates {
        match best {
            Some(b) if candidate.score <= b.score => {}
            _ => best = Some(candidate),
        }
    }
    best
}

/// Overlap of `range` with `reference`, as a fraction of `range`'s
/// inclusive span. 0.0 when the ranges are disjoint.
fn range_overlap(range: PitchRange, reference: PitchRange) -> f32 {
    let lo = range.min.max(reference.min);
    let hi = range.max.min(reference.max);
    if lo > hi {
        return 0.0;
    }
    let overlap = (hi - lo) as u32 + 1;
    overlap as f32 / range.span() as f32
}

/// Notes per tick over the span from first onset to last note end.
fn note_density(notes: &[TimedNote]) -> f32 {
    if notes.is_empty() {
        return 0.0;
    }

    let mut sorted: Vec<&TimedNote> = notes.iter().collect();
    sorted.sort_by_key(|n| n.onset_tick);

    let first = sorted[0];
    let last = sorted[sorted.len() - 1];
    let span = (last.onset_tick + last.duration_ticks()).saturating_sub(first.onset_tick);
    if span == 0 {
        return 0.0;
    }

    notes.len() as f32 / span as f32
}

/// Distinct absolute consecutive intervals over `min(12, note_count - 1)`.
fn interval_variety(notes: &[TimedNote]) -> f32 {
    if notes.len() < 2 {
        return 0.0;
    }

    let mut sorted: Vec<&TimedNote> = notes.iter().collect();
    sorted.sort_by_key(|n| n.onset_tick);

    let intervals: HashSet<i32> = sorted
        .windows(2)
        .map(|w| (w[1].pitch as i32 - w[0].pitch as i32).abs())
        .collect();

    intervals.len() as f32 / 12.min(notes.len() - 1) as f32
}
