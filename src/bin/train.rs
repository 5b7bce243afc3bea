// Training entry point.
//
// Loads the MIDI corpus, splits it into train/test sets with a seeded
// shuffle, builds the transition model over the concatenated training
// tokens, and saves it as JSON.
//
// Usage:
//   cargo run --bin train -- [data_dir] [--model PATH] [--ratio R]
//     [--seed N] [--sequence-length L] [--ext EXT]

use bach_markov::cli::{parse_flag, positional};
use bach_markov::corpus::Corpus;
use bach_markov::model::{DEFAULT_SEQUENCE_LENGTH, TransitionModel};
use rand::SeedableRng;
use rand::rngs::StdRng;
use std::path::Path;

fn main() {
    let args: Vec<String> = std::env::args().collect();

    let data_dir = positional(&args).unwrap_or("data/Human").to_string();
    let model_path: String =
        parse_flag(&args, "--model").unwrap_or_else(|| "bach_model.json".to_string());
    let ratio: f64 = parse_flag(&args, "--ratio").unwrap_or(0.9);
    let seed: u64 = parse_flag(&args, "--seed").unwrap_or(42);
    let sequence_length: usize =
        parse_flag(&args, "--sequence-length").unwrap_or(DEFAULT_SEQUENCE_LENGTH);
    let extension: String = parse_flag(&args, "--ext").unwrap_or_else(|| ".mid".to_string());

    if !Path::new(&data_dir).is_dir() {
        eprintln!("Error: data directory '{data_dir}' not found");
        std::process::exit(1);
    }

    println!("=== Bach Markov Trainer ===");
    println!("Corpus: {data_dir} (*{extension})");
    println!("Model: {model_path}");
    println!("Train ratio: {ratio}");
    println!("Sequence length: {sequence_length}");
    println!("Seed: {seed}");
    println!();

    println!("[1/3] Loading corpus...");
    let mut corpus = match Corpus::load(Path::new(&data_dir), &extension) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Error reading '{data_dir}': {e}");
            std::process::exit(1);
        }
    };
    let mut rng = StdRng::seed_from_u64(seed);
    corpus.split(ratio, &mut rng);
    println!("  Training files: {}", corpus.train_files.len());
    println!("  Testing files: {}", corpus.test_files.len());

    println!("[2/3] Extracting tokens...");
    let tokens = corpus.training_tokens();
    println!("  {} tokens from {} files.", tokens.len(), corpus.train_files.len());

    println!("[3/3] Building model...");
    let model = TransitionModel::build(&tokens, sequence_length);
    println!("  {} contexts.", model.len());
    if model.is_empty() {
        println!("  Warning: model is empty; generation from it will fail.");
    }

    match model.save(Path::new(&model_path)) {
        Ok(()) => println!("  Saved to {model_path}."),
        Err(e) => {
            eprintln!("Error saving model to '{model_path}': {e}");
            std::process::exit(1);
        }
    }
}
