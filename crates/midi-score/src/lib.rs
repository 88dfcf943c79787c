pub mod note;
pub mod score;

pub use note::TimedNote;
pub use score::{Score, ScoreContext, ScoreTrack, TempoChange};

/// Errors from reading or parsing a MIDI score.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("I/O error reading MIDI file: {0}")]
    Io(#[from] std::io::Error),
    #[error("MIDI parse error: {0}")]
    MidiParse(String),
}

pub type Result<T> = std::result::Result<T, Error>;
