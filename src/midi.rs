// MIDI output from generated token sequences.
//
// Converts a token sequence into a Standard MIDI File (SMF Format 1): a
// tempo track plus one note track carrying the chosen instrument's program
// change. Every token sounds for a fixed eighth note, uniform across the
// piece. A token containing the chord separator is split into sub-tokens
// played together; each sub-token (and each plain note token) is either a
// bare numeric MIDI key or a symbolic pitch name.
//
// Uses the `midly` crate for MIDI writing.

use crate::model::Token;
use crate::pitch::parse_pitch_name;
use crate::tokenize::CHORD_SEPARATOR;
use midly::{
    Format, Header, MidiMessage, Smf, Timing, Track, TrackEvent, TrackEventKind,
    num::{u4, u7, u15, u24, u28},
};
use std::path::Path;
use thiserror::Error;

/// Ticks per quarter note in MIDI output.
const TICKS_PER_QUARTER: u16 = 480;

/// Every token sounds for one eighth note.
const TICKS_PER_TOKEN: u32 = TICKS_PER_QUARTER as u32 / 2;

/// Fixed playback tempo.
const TEMPO_BPM: u32 = 120;

/// Note-on velocity for all notes.
const VELOCITY: u8 = 80;

#[derive(Debug, Error)]
pub enum MidiError {
    /// A token that is neither a numeric key, a pitch name, nor a chord of
    /// such sub-tokens.
    #[error("cannot interpret token {0:?} as a note or chord")]
    BadToken(String),
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),
}

/// General MIDI instrument selection for the writer.
///
/// A closed enumeration instead of one type per instrument: each variant
/// knows its program number and display name, and unrecognized program
/// numbers fall back to piano.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Instrument {
    Harpsichord,
    Piano,
    PipeOrgan,
    StringEnsemble,
    Violin,
    Cello,
}

impl Instrument {
    /// All instruments, in the order the generation batch renders them.
    pub const ALL: [Instrument; 6] = [
        Instrument::Harpsichord,
        Instrument::Piano,
        Instrument::PipeOrgan,
        Instrument::StringEnsemble,
        Instrument::Violin,
        Instrument::Cello,
    ];

    /// General MIDI program number.
    pub fn program(self) -> u8 {
        match self {
            Instrument::Harpsichord => 6,
            Instrument::Piano => 0,
            Instrument::PipeOrgan => 19,
            Instrument::StringEnsemble => 48,
            Instrument::Violin => 40,
            Instrument::Cello => 42,
        }
    }

    /// Display name, used in output filenames.
    pub fn name(self) -> &'static str {
        match self {
            Instrument::Harpsichord => "harpsichord",
            Instrument::Piano => "piano",
            Instrument::PipeOrgan => "pipe_organ",
            Instrument::StringEnsemble => "string_ensemble",
            Instrument::Violin => "violin",
            Instrument::Cello => "cello",
        }
    }

    /// Map a program number back to an instrument; piano for anything
    /// unrecognized.
    pub fn from_program(program: u8) -> Instrument {
        match program {
            6 => Instrument::Harpsichord,
            19 => Instrument::PipeOrgan,
            48 => Instrument::StringEnsemble,
            40 => Instrument::Violin,
            42 => Instrument::Cello,
            _ => Instrument::Piano,
        }
    }
}

/// Write a token sequence to a MIDI file under the given instrument.
pub fn write_midi(tokens: &[Token], path: &Path, instrument: Instrument) -> Result<(), MidiError> {
    let smf = tokens_to_smf(tokens, instrument)?;
    let mut buf = Vec::new();
    smf.write_std(&mut buf)?;
    std::fs::write(path, &buf)?;
    Ok(())
}

/// Convert a token sequence to an in-memory SMF.
pub fn tokens_to_smf(
    tokens: &[Token],
    instrument: Instrument,
) -> Result<Smf<'static>, MidiError> {
    let mut smf = Smf::new(Header::new(
        Format::Parallel,
        Timing::Metrical(u15::new(TICKS_PER_QUARTER)),
    ));

    // Track 0: tempo track
    let mut tempo_track: Track<'static> = Vec::new();
    tempo_track.push(TrackEvent {
        delta: u28::new(0),
        kind: TrackEventKind::Meta(midly::MetaMessage::Tempo(u24::new(60_000_000 / TEMPO_BPM))),
    });
    tempo_track.push(TrackEvent {
        delta: u28::new(0),
        kind: TrackEventKind::Meta(midly::MetaMessage::EndOfTrack),
    });
    smf.tracks.push(tempo_track);

    // Track 1: the notes
    let channel = u4::new(0);
    let mut track: Track<'static> = Vec::new();
    track.push(TrackEvent {
        delta: u28::new(0),
        kind: TrackEventKind::Meta(midly::MetaMessage::TrackName(
            instrument.name().as_bytes(),
        )),
    });
    track.push(TrackEvent {
        delta: u28::new(0),
        kind: TrackEventKind::Midi {
            channel,
            message: MidiMessage::ProgramChange {
                program: u7::new(instrument.program()),
            },
        },
    });

    for token in tokens {
        let keys = token_keys(token)?;
        for &key in &keys {
            track.push(TrackEvent {
                delta: u28::new(0),
                kind: TrackEventKind::Midi {
                    channel,
                    message: MidiMessage::NoteOn {
                        key: u7::new(key),
                        vel: u7::new(VELOCITY),
                    },
                },
            });
        }
        for (i, &key) in keys.iter().enumerate() {
            track.push(TrackEvent {
                delta: u28::new(if i == 0 { TICKS_PER_TOKEN } else { 0 }),
                kind: TrackEventKind::Midi {
                    channel,
                    message: MidiMessage::NoteOff {
                        key: u7::new(key),
                        vel: u7::new(0),
                    },
                },
            });
        }
    }

    track.push(TrackEvent {
        delta: u28::new(0),
        kind: TrackEventKind::Meta(midly::MetaMessage::EndOfTrack),
    });
    smf.tracks.push(track);

    Ok(smf)
}

/// MIDI key numbers a token sounds: one for a note, several for a chord.
fn token_keys(token: &Token) -> Result<Vec<u8>, MidiError> {
    if token.contains(CHORD_SEPARATOR) {
        token
            .split(CHORD_SEPARATOR)
            .map(|sub| sub_token_key(sub).ok_or_else(|| MidiError::BadToken(token.clone())))
            .collect()
    } else {
        Ok(vec![
            sub_token_key(token).ok_or_else(|| MidiError::BadToken(token.clone()))?,
        ])
    }
}

/// A sub-token is either a bare numeric MIDI key or a symbolic pitch name.
fn sub_token_key(sub: &str) -> Option<u8> {
    if !sub.is_empty() && sub.bytes().all(|b| b.is_ascii_digit()) {
        sub.parse::<u8>().ok().filter(|&k| k <= 127)
    } else {
        parse_pitch_name(sub)
    }
}
