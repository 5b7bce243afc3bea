// Markov transition model over note/chord tokens.
//
// Contexts are fixed-length windows of consecutive tokens; each context maps
// to a probability distribution over the next token. Counts are collected
// over every sliding window of the training stream, then normalized to a
// maximum-likelihood estimate of P(next | context). No smoothing: a token
// never observed after a context is simply absent (probability zero), which
// is what drives the recovery path in generate.rs.
//
// BTreeMap keying does double duty here. Contexts sort tuple-wise
// lexicographically, so the first key is the canonical starting context for
// generation, and each distribution iterates its tokens in sorted order, so
// weighted sampling sees a stable (token, probability) pairing regardless of
// insertion order.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use thiserror::Error;

/// A single note or chord, as produced by tokenization.
pub type Token = String;
/// An ordered window of exactly `sequence_length` consecutive tokens.
pub type Context = Vec<Token>;
/// Next-token probabilities for one context. Values sum to 1.0.
pub type Distribution = BTreeMap<Token, f64>;

/// Default context length: four tokens of lookbehind.
pub const DEFAULT_SEQUENCE_LENGTH: usize = 4;

/// Errors from model persistence.
#[derive(Debug, Error)]
pub enum ModelError {
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),
    #[error("model file is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// An order-L Markov model: context window -> next-token distribution.
///
/// Built once from a training stream, then read-only for any number of
/// generation calls.
#[derive(Debug, Clone, PartialEq)]
pub struct TransitionModel {
    sequence_length: usize,
    transitions: BTreeMap<Context, Distribution>,
}

/// On-disk form. JSON objects cannot key on token tuples, so the map is
/// flattened to a list of entries; order is irrelevant because loading
/// rebuilds the BTreeMap.
#[derive(Serialize, Deserialize)]
struct ModelFile {
    sequence_length: usize,
    entries: Vec<ModelEntry>,
}

#[derive(Serialize, Deserialize)]
struct ModelEntry {
    context: Context,
    probabilities: Distribution,
}

impl TransitionModel {
    /// Build a model from a training token stream.
    ///
    /// Every index i in 0..len-L contributes one observation
    /// (stream[i..i+L] -> stream[i+L]). A stream shorter than L+1 tokens
    /// yields an empty model.
    pub fn build(tokens: &[Token], sequence_length: usize) -> Self {
        let counts = count_transitions(tokens, sequence_length);

        let transitions = counts
            .into_iter()
            .map(|(context, next_counts)| {
                let total: u64 = next_counts.values().sum();
                let probabilities = next_counts
                    .into_iter()
                    .map(|(token, count)| (token, count as f64 / total as f64))
                    .collect();
                (context, probabilities)
            })
            .collect();

        TransitionModel {
            sequence_length,
            transitions,
        }
    }

    pub fn sequence_length(&self) -> usize {
        self.sequence_length
    }

    /// Number of distinct contexts.
    pub fn len(&self) -> usize {
        self.transitions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.transitions.is_empty()
    }

    /// The canonical starting context: lexicographically smallest.
    pub fn first_context(&self) -> Option<&Context> {
        self.transitions.keys().next()
    }

    /// Next-token distribution for a context, if it was ever observed.
    pub fn distribution(&self, context: &[Token]) -> Option<&Distribution> {
        self.transitions.get(context)
    }

    pub fn contexts(&self) -> impl Iterator<Item = (&Context, &Distribution)> {
        self.transitions.iter()
    }

    /// Serialize to a JSON file.
    pub fn save(&self, path: &Path) -> Result<(), ModelError> {
        let file = ModelFile {
            sequence_length: self.sequence_length,
            entries: self
                .transitions
                .iter()
                .map(|(context, probabilities)| ModelEntry {
                    context: context.clone(),
                    probabilities: probabilities.clone(),
                })
                .collect(),
        };
        fs::write(path, serde_json::to_string(&file)?)?;
        Ok(())
    }

    /// Load a model previously written by `save`. Round-trip is exact.
    pub fn load(path: &Path) -> Result<Self, ModelError> {
        let data = fs::read_to_string(path)?;
        let file: ModelFile = serde_json::from_str(&data)?;
        Ok(TransitionModel {
            sequence_length: file.sequence_length,
            transitions: file
                .entries
                .into_iter()
                .map(|e| (e.context, e.probabilities))
                .collect(),
        })
    }
}

/// Raw sliding-window counts: context -> (next token -> occurrences).
fn count_transitions(
    tokens: &[Token],
    sequence_length: usize,
) -> BTreeMap<Context, BTreeMap<Token, u64>> {
    let mut counts: BTreeMap<Context, BTreeMap<Token, u64>> = BTreeMap::new();

    if tokens.len() <= sequence_length {
        return counts;
    }

    for i in 0..tokens.len() - sequence_length {
        let context = tokens[i..i + sequence_length].to_vec();
        let next = tokens[i + sequence_length].clone();
        *counts.entry(context).or_default().entry(next).or_insert(0) += 1;
    }

    counts
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stream(tokens: &[&str]) -> Vec<Token> {
        tokens.iter().map(|t| t.to_string()).collect()
    }

    #[test]
    fn test_two_context_scenario() {
        // Stream: A B C D E A B C D F with L=4. (A,B,C,D) is observed twice
        // with different successors, so it must split 0.5/0.5; (B,C,D,E) is
        // observed once.
        let tokens = stream(&["A", "B", "C", "D", "E", "A", "B", "C", "D", "F"]);
        let model = TransitionModel::build(&tokens, 4);
        assert_eq!(model.len(), 5);

        let abcd = model.distribution(&stream(&["A", "B", "C", "D"])).unwrap();
        assert_eq!(abcd.len(), 2);
        assert!((abcd["E"] - 0.5).abs() < 1e-9);
        assert!((abcd["F"] - 0.5).abs() < 1e-9);

        let bcde = model.distribution(&stream(&["B", "C", "D", "E"])).unwrap();
        assert_eq!(bcde.len(), 1);
        assert!((bcde["A"] - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_probabilities_sum_to_one() {
        let tokens = stream(&[
            "C4", "D4", "E4", "F4", "G4", "C4", "D4", "E4", "F4", "A4", "C4", "D4", "E4", "F4",
            "G4", "B4",
        ]);
        let model = TransitionModel::build(&tokens, 4);
        assert!(!model.is_empty());
        for (_, distribution) in model.contexts() {
            let total: f64 = distribution.values().sum();
            assert!((total - 1.0).abs() < 1e-9, "sum was {total}");
            assert!(distribution.values().all(|&p| p > 0.0));
        }
    }

    #[test]
    fn test_sliding_window_coverage() {
        // M tokens, context length L: exactly M - L observations.
        let tokens = stream(&["A", "B", "A", "B", "A", "C", "A", "B", "A", "B"]);
        let counts = count_transitions(&tokens, 4);
        let observations: u64 = counts.values().flat_map(|m| m.values()).sum();
        assert_eq!(observations, (tokens.len() - 4) as u64);
    }

    #[test]
    fn test_empty_and_short_streams() {
        assert!(TransitionModel::build(&[], 4).is_empty());
        assert!(TransitionModel::build(&stream(&["A", "B", "C"]), 4).is_empty());
        // Exactly L tokens: no window has a successor.
        assert!(TransitionModel::build(&stream(&["A", "B", "C", "D"]), 4).is_empty());
        // L+1 tokens: one observation.
        let model = TransitionModel::build(&stream(&["A", "B", "C", "D", "E"]), 4);
        assert_eq!(model.len(), 1);
    }

    #[test]
    fn test_first_context_is_smallest() {
        let tokens = stream(&["Z", "Y", "X", "W", "V", "A", "B", "C", "D", "E"]);
        let model = TransitionModel::build(&tokens, 4);
        // Tuple-wise lexicographic: (A,B,C,D) sorts before every context
        // starting with a later token.
        assert_eq!(
            model.first_context().unwrap(),
            &stream(&["A", "B", "C", "D"])
        );
    }

    #[test]
    fn test_save_load_roundtrip() {
        let tokens = stream(&[
            "C4", "0.4.7", "E4", "F#4", "G4", "C4", "0.4.7", "E4", "F#4", "A4",
        ]);
        let model = TransitionModel::build(&tokens, 4);

        let path = std::env::temp_dir().join("bach_markov_roundtrip_test.json");
        model.save(&path).unwrap();
        let loaded = TransitionModel::load(&path).unwrap();
        std::fs::remove_file(&path).unwrap();

        assert_eq!(model, loaded);
    }

    #[test]
    fn test_load_missing_file_is_io_error() {
        let err = TransitionModel::load(Path::new("/nonexistent/bach_model.json")).unwrap_err();
        assert!(matches!(err, ModelError::Io(_)));
    }
}
