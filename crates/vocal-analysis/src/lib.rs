pub mod intervals;
pub mod mode;
pub mod rhythm;
pub mod types;
pub mod vocal;

pub use intervals::{classify_interval, interval_distribution};
pub use mode::detect_mode;
pub use rhythm::{classify_duration, rhythm_distribution};
pub use types::{
    AnalysisResult, FileInfo, IntervalClass, IntervalDistribution, ModeAnalysis, PitchRange,
    RhythmDistribution, RhythmValue, TrackCandidate,
};
pub use vocal::{score_track, select_vocal_track};

use midi_score::Score;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Errors from the analysis operations.
///
/// All variants are terminal for a single call; the input is a static
/// file, so nothing is retried internally.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Path missing, unreadable, or not a parseable MIDI file.
    #[error("MIDI file missing or invalid: {}", .0.display())]
    NotFound(PathBuf),
    /// The file parsed but no track qualifies as a vocal melody.
    #[error("no suitable vocal track found")]
    NoVocalTrack,
    /// The selected track yielded no notes on re-extraction.
    #[error("no notes found in the selected vocal track")]
    EmptySelection,
    /// The background analysis task panicked or was cancelled.
    #[error("analysis task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

pub type Result<T> = std::result::Result<T, Error>;

/// True iff the file exists and parses as a MIDI container.
pub fn validate(path: impl AsRef<Path>) -> bool {
    let path = path.as_ref();
    path.is_file() && Score::read(path).is_ok()
}

/// File-level facts: track count, duration, resolution, starting BPM.
///
/// Independent of vocal track selection; succeeds for any valid file.
pub fn file_info(path: impl AsRef<Path>) -> Result<FileInfo> {
    let path = path.as_ref();
    let score = load(path)?;

    Ok(FileInfo {
        file_path: path.to_path_buf(),
        track_count: score.context.track_count,
        duration: score.duration(),
        ticks_per_quarter_note: score.context.ppq,
        tempo_bpm: score.bpm_at_start() as u32,
    })
}

/// Score every note-bearing track as a vocal melody candidate.
pub fn score_tracks(path: impl AsRef<Path>) -> Result<Vec<TrackCandidate>> {
    let score = load(path.as_ref())?;
    Ok(vocal::score_tracks(&score))
}

/// Full melodic analysis: pick the most plausible vocal track, then
/// compute its pitch range, rhythm-value distribution, interval
/// distribution, and mode.
pub fn analyze(path: impl AsRef<Path>) -> Result<AnalysisResult> {
    let path = path.as_ref();
    let score = load(path)?;

    let candidates = vocal::score_tracks(&score);
    let winner = vocal::select_vocal_track(&candidates)
        .ok_or(Error::NoVocalTrack)?
        .clone();
    info!(
        track = winner.track_index,
        name = %winner.track_name,
        score = winner.score,
        candidates = candidates.len(),
        "selected vocal track"
    );

    let notes = score.track_notes(winner.track_index);
    if notes.is_empty() {
        return Err(Error::EmptySelection);
    }

    let mode = mode::detect_mode(notes);
    info!(
        mode = %mode.detected_mode,
        confidence = mode.confidence,
        "melody analysis complete"
    );

    Ok(AnalysisResult {
        file_path: path.to_path_buf(),
        total_notes: notes.len(),
        note_range: PitchRange::from_pitches(notes.iter().map(|n| n.pitch)),
        rhythm: rhythm::rhythm_distribution(notes, score.context.ppq),
        intervals: intervals::interval_distribution(notes),
        mode,
    })
}

/// `analyze` on the blocking thread pool, for callers on an async runtime.
pub async fn analyze_async(path: impl Into<PathBuf>) -> Result<AnalysisResult> {
    let path = path.into();
    tokio::task::spawn_blocking(move || analyze(&path)).await?
}

/// `file_info` on the blocking thread pool.
pub async fn file_info_async(path: impl Into<PathBuf>) -> Result<FileInfo> {
    let path = path.into();
    tokio::task::spawn_blocking(move || file_info(&path)).await?
}

fn load(path: &Path) -> Result<Score> {
    Score::read(path).map_err(|e| {
        debug!(path = %path.display(), error = %e, "failed to load MIDI file");
        Error::NotFound(path.to_path_buf())
    })
}
