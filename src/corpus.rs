// Corpus enumeration and train/test splitting.
//
// Files are listed non-recursively by extension and sorted by name so the
// pre-shuffle order is stable across filesystems. The split shuffles with a
// caller-seeded RNG and cuts at floor(len * ratio): train gets the first
// part, test the remainder. Training tokens are the concatenation of every
// train file's tokens in list order; file boundaries are not marked, so a
// context window can straddle two pieces.

use crate::model::Token;
use crate::tokenize::extract_tokens;
use rand::Rng;
use rand::seq::SliceRandom;
use std::io;
use std::path::{Path, PathBuf};

/// A corpus of source files and its train/test partition.
#[derive(Debug, Clone)]
pub struct Corpus {
    dir: PathBuf,
    pub all_files: Vec<String>,
    pub train_files: Vec<String>,
    pub test_files: Vec<String>,
}

impl Corpus {
    /// List files in `dir` whose names end with `extension` (e.g. ".mid").
    /// Zero matching files is not an error; the model downstream is simply
    /// empty.
    pub fn load(dir: &Path, extension: &str) -> io::Result<Self> {
        let mut all_files = Vec::new();
        for entry in std::fs::read_dir(dir)? {
            let entry = entry?;
            let name = entry.file_name().to_string_lossy().into_owned();
            if name.ends_with(extension) && entry.file_type()?.is_file() {
                all_files.push(name);
            }
        }
        all_files.sort();

        Ok(Corpus {
            dir: dir.to_path_buf(),
            all_files,
            train_files: Vec::new(),
            test_files: Vec::new(),
        })
    }

    /// Shuffle the file list with `rng` and split at floor(len * ratio).
    pub fn split(&mut self, train_ratio: f64, rng: &mut impl Rng) {
        let mut files = self.all_files.clone();
        files.shuffle(rng);
        let (train, test) = split_at_ratio(files, train_ratio);
        self.train_files = train;
        self.test_files = test;
    }

    /// Concatenated token stream over the training files, in list order.
    pub fn training_tokens(&self) -> Vec<Token> {
        let mut tokens = Vec::new();
        for file in &self.train_files {
            tokens.extend(extract_tokens(&self.dir.join(file)));
        }
        tokens
    }
}

/// Cut a file list at floor(len * ratio).
fn split_at_ratio(files: Vec<String>, ratio: f64) -> (Vec<String>, Vec<String>) {
    let split_idx = (files.len() as f64 * ratio).floor() as usize;
    let mut train = files;
    let test = train.split_off(split_idx.min(train.len()));
    (train, test)
}
