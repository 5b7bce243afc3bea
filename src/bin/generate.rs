// Generation entry point.
//
// Loads a trained model, generates one base sequence with a fixed seed, then
// writes that same sequence under every instrument selection, optionally
// rendering each MIDI to WAV. Per-instrument failures are reported and the
// batch continues; the run only fails outright when the model is unusable or
// no instrument produced output.
//
// Usage:
//   cargo run --bin generate -- [output_dir] [--model PATH] [--length N]
//     [--seed N] [--soundfont PATH] [--no-render]

use bach_markov::cli::{has_flag, parse_flag, positional};
use bach_markov::generate::generate;
use bach_markov::midi::{Instrument, write_midi};
use bach_markov::model::TransitionModel;
use bach_markov::render::render_to_wav;
use rand::SeedableRng;
use rand::rngs::StdRng;
use std::path::Path;

fn main() {
    let args: Vec<String> = std::env::args().collect();

    let output_dir = positional(&args).unwrap_or("generated_pieces").to_string();
    let model_path: String =
        parse_flag(&args, "--model").unwrap_or_else(|| "bach_model.json".to_string());
    let length: usize = parse_flag(&args, "--length").unwrap_or(200);
    let seed: u64 = parse_flag(&args, "--seed").unwrap_or(5);
    let soundfont: String =
        parse_flag(&args, "--soundfont").unwrap_or_else(|| "data/FluidR3_GM.sf2".to_string());
    let render = !has_flag(&args, "--no-render");

    if !Path::new(&model_path).is_file() {
        eprintln!("Error: model file '{model_path}' not found (run the trainer first)");
        std::process::exit(1);
    }

    println!("=== Bach Markov Generator ===");
    println!("Model: {model_path}");
    println!("Output: {output_dir}");
    println!("Length: {length}");
    println!("Seed: {seed}");
    println!();

    println!("[1/3] Loading model...");
    let model = match TransitionModel::load(Path::new(&model_path)) {
        Ok(m) => m,
        Err(e) => {
            eprintln!("Error loading model from '{model_path}': {e}");
            std::process::exit(1);
        }
    };
    println!("  {} contexts.", model.len());

    println!("[2/3] Generating base sequence...");
    let mut rng = StdRng::seed_from_u64(seed);
    let sequence = match generate(&model, length, &mut rng) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("Error: {e}");
            std::process::exit(1);
        }
    };
    println!("  {} tokens.", sequence.len());

    if let Err(e) = std::fs::create_dir_all(&output_dir) {
        eprintln!("Error creating output directory '{output_dir}': {e}");
        std::process::exit(1);
    }

    println!("[3/3] Writing pieces...");
    let mut written = 0;
    for instrument in Instrument::ALL {
        let midi_path = Path::new(&output_dir).join(format!("generated_bach_{}.mid", instrument.name()));
        let wav_path = Path::new(&output_dir).join(format!("generated_bach_{}.wav", instrument.name()));

        println!("  {} (program {})...", instrument.name(), instrument.program());
        if let Err(e) = write_midi(&sequence, &midi_path, instrument) {
            eprintln!("    Error writing {}: {}", midi_path.display(), e);
            continue;
        }
        written += 1;
        println!("    Wrote {}", midi_path.display());

        if render {
            // One failed render must not stop the rest of the batch.
            match render_to_wav(&midi_path, &wav_path, Path::new(&soundfont)) {
                Ok(()) => println!("    Wrote {}", wav_path.display()),
                Err(e) => eprintln!("    Error rendering {}: {}", wav_path.display(), e),
            }
        }
    }

    if written == 0 {
        eprintln!("Error: no pieces were written");
        std::process::exit(1);
    }
    println!();
    println!("Done! {written} pieces in '{output_dir}'.");
}
