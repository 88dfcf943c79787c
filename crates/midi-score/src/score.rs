use crate::note::TimedNote;
use midly::{MetaMessage, MidiMessage, Smf, TrackEventKind};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;
use std::time::Duration;

/// MIDI default tempo: 500,000 microseconds per quarter note (120 BPM).
const DEFAULT_USEC_PER_BEAT: u32 = 500_000;

/// PPQ to assume when the file uses SMPTE timecode division.
const DEFAULT_PPQ: u16 = 480;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TempoChange {
    pub tick: u64,
    pub microseconds_per_beat: u32,
    pub bpm: f64,
}

/// Parsed file context: timing resolution, format, and tempo map.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoreContext {
    pub ppq: u16,
    pub format: u8,
    pub track_count: usize,
    pub tempo_changes: Vec<TempoChange>,
    pub total_ticks: u64,
}

/// One track's name and note events.
///
/// Note order is by appearance in the track chunk, not guaranteed to be
/// time-sorted. Callers that need time order must sort by `onset_tick`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoreTrack {
    pub index: usize,
    pub name: Option<String>,
    pub notes: Vec<TimedNote>,
}

/// A parsed MIDI score: per-track notes plus file-level timing context.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Score {
    pub tracks: Vec<ScoreTrack>,
    pub context: ScoreContext,
}

impl Score {
    /// Read and parse a MIDI file from disk.
    pub fn read(path: impl AsRef<Path>) -> crate::Result<Self> {
        let bytes = std::fs::read(path)?;
        Self::parse(&bytes)
    }

    /// Parse MIDI bytes, pairing note-on/note-off events per track.
    ///
    /// A note-on with velocity 0 counts as a note-off. Stacked note-ons on
    /// the same (channel, pitch) are paired last-on/first-off. Notes still
    /// open at end of track are closed at the track's final tick.
    pub fn parse(bytes: &[u8]) -> crate::Result<Self> {
        let smf = Smf::parse(bytes).map_err(|e| crate::Error::MidiParse(e.to_string()))?;

        let ppq = match smf.header.timing {
            midly::Timing::Metrical(ticks) => ticks.as_int(),
            midly::Timing::Timecode(_, _) => DEFAULT_PPQ,
        };

        let format = match smf.header.format {
            midly::Format::SingleTrack => 0,
            midly::Format::Parallel => 1,
            midly::Format::Sequential => 2,
        };

        let mut tracks = Vec::with_capacity(smf.tracks.len());
        let mut tempo_changes = Vec::new();
        let mut total_ticks: u64 = 0;

        for (index, track) in smf.tracks.iter().enumerate() {
            let mut current_tick: u64 = 0;
            let mut name = None;
            let mut notes = Vec::new();
            // Map (channel, pitch) → Vec<(onset_tick, velocity)> for stacking
            let mut pending: HashMap<(u8, u8), Vec<(u64, u8)>> = HashMap::new();

            for event in track {
                current_tick += event.delta.as_int() as u64;

                match event.kind {
                    TrackEventKind::Meta(MetaMessage::TrackName(raw)) => {
                        name = String::from_utf8(raw.to_vec()).ok();
                    }
                    TrackEventKind::Meta(MetaMessage::Tempo(tempo)) => {
                        let usec = tempo.as_int();
                        tempo_changes.push(TempoChange {
                            tick: current_tick,
                            microseconds_per_beat: usec,
                            bpm: 60_000_000.0 / usec as f64,
                        });
                    }
                    TrackEventKind::Midi { channel, message } => {
                        let ch = channel.as_int();
                        match message {
                            MidiMessage::NoteOn { key, vel } if vel.as_int() > 0 => {
                                pending
                                    .entry((ch, key.as_int()))
                                    .or_default()
                                    .push((current_tick, vel.as_int()));
                            }
                            MidiMessage::NoteOff { key, .. }
                            | MidiMessage::NoteOn { key, .. } => {
                                // vel=0 NoteOn is NoteOff
                                if let Some(stack) = pending.get_mut(&(ch, key.as_int())) {
                                    if let Some((onset, velocity)) = stack.pop() {
                                        notes.push(TimedNote {
                                            onset_tick: onset,
                                            offset_tick: current_tick,
                                            pitch: key.as_int(),
                                            velocity,
                                            channel: ch,
                                        });
                                    }
                                }
                            }
                            _ => {}
                        }
                    }
                    _ => {}
                }

                total_ticks = total_ticks.max(current_tick);
            }

            // Close any unclosed notes at the track's final tick. The map's
            // iteration order is not deterministic, so sort before appending.
            let mut unclosed: Vec<TimedNote> = pending
                .into_iter()
                .flat_map(|((ch, pitch), stack)| {
                    stack.into_iter().map(move |(onset, velocity)| TimedNote {
                        onset_tick: onset,
                        offset_tick: current_tick,
                        pitch,
                        velocity,
                        channel: ch,
                    })
                })
                .collect();
            unclosed.sort_by_key(|n| (n.onset_tick, n.pitch, n.channel));
            notes.extend(unclosed);

            tracks.push(ScoreTrack { index, name, notes });
        }

        // Deduplicate tempo changes (multiple tracks may repeat them in format 1)
        tempo_changes.sort_by_key(|t| t.tick);
        tempo_changes
            .dedup_by(|a, b| a.tick == b.tick && a.microseconds_per_beat == b.microseconds_per_beat);

        let context = ScoreContext {
            ppq,
            format,
            track_count: smf.tracks.len(),
            tempo_changes,
            total_ticks,
        };

        Ok(Score { tracks, context })
    }

    /// The notes of a track, or an empty slice for an out-of-range index.
    pub fn track_notes(&self, index: usize) -> &[TimedNote] {
        self.tracks.get(index).map(|t| t.notes.as_slice()).unwrap_or(&[])
    }

    /// Convert an absolute tick to wall-clock seconds via the tempo map.
    pub fn tick_to_seconds(&self, tick: u64) -> f64 {
        let ppq = self.context.ppq.max(1) as f64;
        let mut seconds = 0.0;
        let mut cursor: u64 = 0;
        let mut usec_per_beat = DEFAULT_USEC_PER_BEAT as f64;

        for change in &self.context.tempo_changes {
            if change.tick >= tick {
                break;
            }
            seconds += (change.tick - cursor) as f64 * usec_per_beat / (ppq * 1_000_000.0);
            cursor = change.tick;
            usec_per_beat = change.microseconds_per_beat as f64;
        }

        seconds + (tick - cursor) as f64 * usec_per_beat / (ppq * 1_000_000.0)
    }

    /// Wall-clock time of the last event in the file.
    pub fn duration(&self) -> Duration {
        Duration::from_secs_f64(self.tick_to_seconds(self.context.total_ticks))
    }

    /// BPM of the tempo active at tick 0 (MIDI default 120 when none is set).
    pub fn bpm_at_start(&self) -> f64 {
        self.context
            .tempo_changes
            .iter()
            .find(|t| t.tick == 0)
            .map(|t| t.bpm)
            .unwrap_or(60_000_000.0 / DEFAULT_USEC_PER_BEAT as f64)
    }
}
