use crate::types::ModeAnalysis;
use midi_score::TimedNote;

/// Pitch-class names, sharp spellings only.
const NOTE_NAMES: [&str; 12] = [
    "C", "C#", "D", "D#", "E", "F", "F#", "G", "G#", "A", "A#", "B",
];

/// Scale templates as degree offsets from the tonic, mod 12.
const MAJOR_STEPS: [usize; 7] = [0, 2, 4, 5, 7, 9, 11];
const MINOR_STEPS: [usize; 7] = [0, 2, 3, 5, 7, 8, 10];
const PENTATONIC_STEPS: [usize; 5] = [0, 2, 4, 7, 9];

/// Detect the tonal center and scale of a melody.
///
/// Builds a pitch-class histogram, takes the most frequent class as the
/// tonic, matches the histogram against major, natural-minor, and
/// pentatonic templates, then labels the result. The labeling pass
/// re-checks template membership against the chosen scale with slightly
/// different completeness rules than the template match itself (exact
/// for major, prefix for minor); that asymmetry is part of the
/// established output and is kept as-is.
pub fn detect_mode(notes: &[TimedNote]) -> ModeAnalysis {
    if notes.is_empty() {
        return ModeAnalysis {
            detected_mode: "Unknown".to_string(),
            confidence: 0.0,
            scale_notes: Vec::new(),
        };
    }

    let mut histogram = [0usize; 12];
    for note in notes {
        histogram[(note.pitch % 12) as usize] += 1;
    }

    // Most frequent pitch class; ties resolve to the lowest class index.
    let mut tonic = 0;
    let mut best_count = 0;
    for (pc, &count) in histogram.iter().enumerate() {
        if count > best_count {
            best_count = count;
            tonic = pc;
        }
    }

    let scale_notes = select_scale(&histogram, tonic);
    let detected_mode = mode_label(&scale_notes, tonic);
    let confidence = scale_confidence(&histogram, &scale_notes);

    ModeAnalysis {
        detected_mode,
        confidence,
        scale_notes,
    }
}

/// How many of a template's degrees have at least one occurrence.
fn template_matches(histogram: &[usize; 12], tonic: usize, steps: &[usize]) -> usize {
    steps
        .iter()
        .filter(|&&step| histogram[(tonic + step) % 12] > 0)
        .count()
}

fn spell(tonic: usize, steps: &[usize]) -> Vec<String> {
    steps
        .iter()
        .map(|&step| NOTE_NAMES[(tonic + step) % 12].to_string())
        .collect()
}

/// Pick the best-matching scale: major (≥5 of 7), then minor (≥5 of 7),
/// then pentatonic (≥4 of 5), else the observed pitch classes ascending.
fn select_scale(histogram: &[usize; 12], tonic: usize) -> Vec<String> {
    if template_matches(histogram, tonic, &MAJOR_STEPS) >= 5 {
        spell(tonic, &MAJOR_STEPS)
    } else if template_matches(histogram, tonic, &MINOR_STEPS) >= 5 {
        spell(tonic, &MINOR_STEPS)
    } else if template_matches(histogram, tonic, &PENTATONIC_STEPS) >= 4 {
        spell(tonic, &PENTATONIC_STEPS)
    } else {
        (0..12)
            .filter(|&pc| histogram[pc] > 0)
            .map(|pc| NOTE_NAMES[pc].to_string())
            .collect()
    }
}

fn mode_label(scale_notes: &[String], tonic: usize) -> String {
    let tonic_name = NOTE_NAMES[tonic];
    let has_degree = |step: usize| {
        let name = NOTE_NAMES[(tonic + step) % 12];
        scale_notes.iter().any(|n| n == name)
    };

    if scale_notes.len() == 7 && MAJOR_STEPS.iter().all(|&s| has_degree(s)) {
        return format!("{} Major", tonic_name);
    }

    if scale_notes.len() >= 5
        && MINOR_STEPS
            .iter()
            .take(scale_notes.len())
            .all(|&s| has_degree(s))
    {
        return format!("{} Minor", tonic_name);
    }

    if scale_notes.len() == 5 {
        return format!("{} Pentatonic", tonic_name);
    }

    format!("{} (Unknown Mode)", tonic_name)
}

/// Fraction of all notes whose pitch class lies inside the scale.
fn scale_confidence(histogram: &[usize; 12], scale_notes: &[String]) -> f32 {
    let total: usize = histogram.iter().sum();
    if scale_notes.is_empty() || total == 0 {
        return 0.0;
    }

    let in_scale: usize = (0..12)
        .filter(|&pc| scale_notes.iter().any(|n| n == NOTE_NAMES[pc]))
        .map(|pc| histogram[pc])
        .sum();

    (in_scale as f32 / total as f32).min(1.0)
}
