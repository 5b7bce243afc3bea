// Bach Markov Generator
//
// Learns an order-L Markov model of note/chord transitions from a corpus of
// MIDI files, then generates new, stylistically similar sequences and writes
// them back out as MIDI under a selection of General MIDI instruments.
//
// The model maps fixed-length context windows (default 4 tokens) to a
// probability distribution over the next token. Tokens are opaque strings:
// either a single pitch name ("C4", "F#3") or a chord written as `.`-joined
// pitch-class integers ("0.4.7"). Generation is fully deterministic given a
// seed: the starting context is always the lexicographically smallest context
// in the model, candidate tokens are drawn in sorted order, and an unseen
// context restarts generation from that same starting context.
//
// Architecture:
// - tokenize.rs: MIDI file -> ordered token list (per-file failures swallowed)
// - corpus.rs: corpus enumeration, seeded shuffle, train/test split
// - model.rs: transition model build (count + normalize) and JSON persistence
// - generate.rs: seeded sequence generation with unseen-context recovery
// - pitch.rs: pitch name <-> MIDI key conversions shared by both directions
// - midi.rs: instrument selection + token sequence -> Standard MIDI File
// - render.rs: MIDI -> WAV rendering and playback via the fluidsynth binary
// - cli.rs: tiny flag parsing shared by the train/generate/play binaries

pub mod cli;
pub mod corpus;
pub mod generate;
pub mod midi;
pub mod model;
pub mod pitch;
pub mod render;
pub mod tokenize;
