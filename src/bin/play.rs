// Convert-and-play entry point.
//
// Converts one MIDI file to WAV with the soundfont, then plays it. Useful
// for auditioning corpus pieces next to generated output.
//
// Usage:
//   cargo run --bin play -- [midi] [--soundfont PATH] [--wav PATH]

use bach_markov::cli::{parse_flag, positional};
use bach_markov::render::{play, render_to_wav};
use std::path::Path;

fn main() {
    let args: Vec<String> = std::env::args().collect();

    let midi = positional(&args).unwrap_or("data/Human/brand43s.mid").to_string();
    let soundfont: String =
        parse_flag(&args, "--soundfont").unwrap_or_else(|| "data/FluidR3_GM.sf2".to_string());
    let wav: String = parse_flag(&args, "--wav").unwrap_or_else(|| "bach.wav".to_string());

    if !Path::new(&midi).is_file() {
        eprintln!("Error: MIDI file '{midi}' not found");
        std::process::exit(1);
    }
    if !Path::new(&soundfont).is_file() {
        eprintln!("Error: soundfont file '{soundfont}' not found");
        std::process::exit(1);
    }

    println!("Converting {midi} to {wav} using soundfont {soundfont}");
    match render_to_wav(Path::new(&midi), Path::new(&wav), Path::new(&soundfont)) {
        Ok(()) => println!("Successfully converted MIDI to WAV: {wav}"),
        Err(e) => eprintln!("Error converting MIDI to WAV: {e}"),
    }

    println!("Playing {midi}");
    if let Err(e) = play(Path::new(&midi), Path::new(&soundfont)) {
        eprintln!("Error playing MIDI file: {e}");
        std::process::exit(1);
    }
}
