// Sequence generation from a trained transition model.
//
// Generation is deterministic given a seed. The starting context is always
// the lexicographically smallest context in the model (not randomized), so a
// given model always begins from the same point. Each step looks up the
// trailing window of the output: a known context gets one token drawn by
// weighted sampling over its sorted (token, probability) pairs; an unknown
// context triggers the recovery rule, which appends the entire starting
// context and continues from there. A recovery step therefore grows the
// output by L tokens instead of one, so callers must not assume the result
// is exactly L + length tokens.

use crate::model::{Distribution, Token, TransitionModel};
use rand::Rng;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum GenerateError {
    /// The model has no contexts, so no starting context can be selected.
    #[error("transition model is empty: no starting context available")]
    EmptyModel,
}

/// Generate a token sequence: the starting context followed by `length`
/// sampling steps (each appending one token, or L tokens on recovery).
pub fn generate(
    model: &TransitionModel,
    length: usize,
    rng: &mut impl Rng,
) -> Result<Vec<Token>, GenerateError> {
    let start = model.first_context().ok_or(GenerateError::EmptyModel)?;
    let window = model.sequence_length();
    let mut output: Vec<Token> = start.clone();

    for _ in 0..length {
        let picked = model
            .distribution(&output[output.len() - window..])
            .map(|distribution| weighted_pick(distribution, rng.random::<f64>()));

        match picked {
            Some(token) => output.push(token),
            // Unseen context: restart from the canonical starting context,
            // appending all of its tokens.
            None => output.extend_from_slice(start),
        }
    }

    Ok(output)
}

/// Draw one token from a distribution using a uniform value in [0, 1).
///
/// Walks the cumulative probability over the distribution's entries, which a
/// BTreeMap yields in ascending token order, so the pairing of token and
/// probability is stable no matter how the map was populated. The final
/// entry backstops floating-point shortfall in the cumulative sum.
fn weighted_pick(distribution: &Distribution, rng_val: f64) -> Token {
    let total: f64 = distribution.values().sum();
    let target = rng_val * total;

    let mut cumulative = 0.0;
    for (token, probability) in distribution {
        cumulative += probability;
        if cumulative > target {
            return token.clone();
        }
    }
    distribution
        .keys()
        .next_back()
        .cloned()
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn stream(tokens: &[&str]) -> Vec<Token> {
        tokens.iter().map(|t| t.to_string()).collect()
    }

    #[test]
    fn test_empty_model_is_an_error() {
        let model = TransitionModel::build(&[], 4);
        let mut rng = StdRng::seed_from_u64(1);
        assert!(matches!(
            generate(&model, 10, &mut rng),
            Err(GenerateError::EmptyModel)
        ));
    }

    #[test]
    fn test_recovery_appends_whole_starting_context() {
        // Single context (A,B,C,D) -> {E: 1.0}. Step 1 appends E (the only
        // candidate). Step 2 sees (B,C,D,E), which is unseen, so the full
        // starting context comes back.
        let model = TransitionModel::build(&stream(&["A", "B", "C", "D", "E"]), 4);
        let mut rng = StdRng::seed_from_u64(1);
        let output = generate(&model, 2, &mut rng).unwrap();
        assert_eq!(
            output,
            stream(&["A", "B", "C", "D", "E", "A", "B", "C", "D"])
        );

        // A third step lands back on the known context and appends E again.
        let mut rng = StdRng::seed_from_u64(1);
        let output = generate(&model, 3, &mut rng).unwrap();
        assert_eq!(
            output,
            stream(&["A", "B", "C", "D", "E", "A", "B", "C", "D", "E"])
        );
    }

    #[test]
    fn test_same_seed_same_sequence() {
        let tokens = stream(&[
            "C4", "D4", "E4", "C4", "D4", "F4", "C4", "D4", "E4", "G4", "C4", "D4", "E4", "C4",
            "D4", "F4", "A4", "C4", "D4", "E4",
        ]);
        let model = TransitionModel::build(&tokens, 4);

        let a = generate(&model, 50, &mut StdRng::seed_from_u64(42)).unwrap();
        let b = generate(&model, 50, &mut StdRng::seed_from_u64(42)).unwrap();
        assert_eq!(a, b);

        // Output always begins with the canonical starting context.
        assert_eq!(&a[..4], model.first_context().unwrap().as_slice());
    }

    #[test]
    fn test_output_length_accounts_for_recoveries() {
        let tokens = stream(&["A", "B", "C", "D", "E", "A", "B", "C", "D", "F"]);
        let model = TransitionModel::build(&tokens, 4);
        let window = model.sequence_length();

        let output = generate(&model, 30, &mut StdRng::seed_from_u64(7)).unwrap();
        // Each step appends either 1 token or `window` tokens, never zero.
        assert!(output.len() >= window + 30);
        assert_eq!((output.len() - window - 30) % (window - 1), 0);
    }

    #[test]
    fn test_weighted_pick_respects_sorted_order() {
        let mut distribution = Distribution::new();
        distribution.insert("E".to_string(), 0.5);
        distribution.insert("F".to_string(), 0.5);

        // Below the first cumulative boundary picks the smaller token,
        // above it the larger one.
        assert_eq!(weighted_pick(&distribution, 0.25), "E");
        assert_eq!(weighted_pick(&distribution, 0.75), "F");
        // rng_val is in [0, 1), but even 1.0 falls back to the last entry.
        assert_eq!(weighted_pick(&distribution, 1.0), "F");
    }
}
