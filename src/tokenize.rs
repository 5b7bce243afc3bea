// MIDI file -> token stream.
//
// Walks every track's note-on events on an absolute-tick timeline, merged
// across tracks in tick order. Events sharing a tick form one token: a lone
// note becomes a pitch name ("C4"), two or more simultaneous notes become a
// chord token of distinct pitch classes, ascending and `.`-joined ("0.4.7").
//
// Per-file failures are non-fatal by contract: an unreadable or unparsable
// file is logged and contributes an empty token list, never an error.

use crate::model::Token;
use crate::pitch::pitch_name;
use midly::{MidiMessage, Smf, TrackEventKind};
use std::collections::BTreeSet;
use std::error::Error;
use std::fs;
use std::path::Path;

/// Separator between pitch classes inside a chord token.
pub const CHORD_SEPARATOR: char = '.';

/// Tokenize one MIDI file. Failures are logged and yield an empty list.
pub fn extract_tokens(path: &Path) -> Vec<Token> {
    match read_tokens(path) {
        Ok(tokens) => tokens,
        Err(e) => {
            eprintln!("Error processing {}: {}", path.display(), e);
            Vec::new()
        }
    }
}

fn read_tokens(path: &Path) -> Result<Vec<Token>, Box<dyn Error>> {
    let bytes = fs::read(path)?;
    let smf = Smf::parse(&bytes)?;
    Ok(smf_tokens(&smf))
}

/// Tokenize an in-memory SMF.
pub fn smf_tokens(smf: &Smf) -> Vec<Token> {
    // (absolute tick, key) for every note-on, across all tracks.
    let mut onsets: Vec<(u64, u8)> = Vec::new();
    for track in &smf.tracks {
        let mut tick: u64 = 0;
        for event in track {
            tick += u64::from(event.delta.as_int());
            if let TrackEventKind::Midi {
                message: MidiMessage::NoteOn { key, vel },
                ..
            } = event.kind
            {
                // Velocity 0 is a note-off in disguise, not an onset.
                if vel.as_int() > 0 {
                    onsets.push((tick, key.as_int()));
                }
            }
        }
    }
    onsets.sort_unstable();

    let mut tokens = Vec::new();
    let mut i = 0;
    while i < onsets.len() {
        let tick = onsets[i].0;
        let mut keys = BTreeSet::new();
        while i < onsets.len() && onsets[i].0 == tick {
            keys.insert(onsets[i].1);
            i += 1;
        }
        tokens.push(group_token(&keys));
    }
    tokens
}

/// One token for a set of keys struck on the same tick.
fn group_token(keys: &BTreeSet<u8>) -> Token {
    if keys.len() == 1 {
        let key = *keys.iter().next().unwrap_or(&0);
        pitch_name(key)
    } else {
        let pitch_classes: BTreeSet<u8> = keys.iter().map(|k| k % 12).collect();
        pitch_classes
            .iter()
            .map(|pc| pc.to_string())
            .collect::<Vec<_>>()
            .join(&CHORD_SEPARATOR.to_string())
    }
}
