use rand::distr::weighted::WeightedIndex;
use rand::distr::Distribution;
use rand::seq::IndexedRandom;
use rand_chacha::ChaCha8Rng;
use serde_json::{Map, Value as JsonValue};

use rowforge_core::Value;

use super::StrategyOutcome;

/// Distribution executor: single draw with replacement from
/// `params.options`, optionally weighted by `params.weights`.
///
/// Weights need not sum to 1; relative magnitude determines probability.
pub(crate) fn execute(params: &Map<String, JsonValue>, rng: &mut ChaCha8Rng) -> StrategyOutcome {
    let options = match params.get("options") {
        Some(JsonValue::Array(items)) if !items.is_empty() => items,
        _ => return StrategyOutcome::Error("Error: options required".to_string()),
    };

    let weights = match params.get("weights") {
        None | Some(JsonValue::Null) => None,
        Some(JsonValue::Array(items)) if items.is_empty() => None,
        Some(JsonValue::Array(items)) => {
            if items.len() != options.len() {
                return StrategyOutcome::Error("Error: options/weights mismatch".to_string());
            }
            let mut parsed = Vec::with_capacity(items.len());
            for item in items {
                match item.as_f64() {
                    Some(weight) if weight >= 0.0 && weight.is_finite() => parsed.push(weight),
                    _ => {
                        return StrategyOutcome::Error(
                            "Error: weights must be non-negative numbers".to_string(),
                        );
                    }
                }
            }
            Some(parsed)
        }
        Some(_) => return StrategyOutcome::Error("Error: weights must be a list".to_string()),
    };

    let chosen = match weights {
        None => options.choose(rng),
        Some(weights) => match WeightedIndex::new(&weights) {
            Ok(dist) => options.get(dist.sample(rng)),
            Err(err) => return StrategyOutcome::Error(format!("Error: invalid weights: {err}")),
        },
    };

    match chosen.and_then(Value::from_json) {
        Some(value) => StrategyOutcome::Value(value),
        None => StrategyOutcome::Error("Error: options must contain scalar values".to_string()),
    }
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;

    use super::*;

    fn rng() -> ChaCha8Rng {
        ChaCha8Rng::seed_from_u64(3)
    }

    fn params(json: serde_json::Value) -> Map<String, JsonValue> {
        json.as_object().expect("object params").clone()
    }

    #[test]
    fn missing_options_is_an_error() {
        let outcome = execute(&Map::new(), &mut rng());
        assert_eq!(
            outcome,
            StrategyOutcome::Error("Error: options required".to_string())
        );
    }

    #[test]
    fn non_list_options_is_an_error() {
        let params = params(serde_json::json!({"options": "abc"}));
        assert_eq!(
            execute(&params, &mut rng()),
            StrategyOutcome::Error("Error: options required".to_string())
        );
    }

    #[test]
    fn length_mismatch_is_an_error() {
        let params = params(serde_json::json!({"options": ["a", "b"], "weights": [1]}));
        assert_eq!(
            execute(&params, &mut rng()),
            StrategyOutcome::Error("Error: options/weights mismatch".to_string())
        );
    }

    #[test]
    fn negative_weight_is_an_error() {
        let params = params(serde_json::json!({"options": ["a", "b"], "weights": [1, -1]}));
        match execute(&params, &mut rng()) {
            StrategyOutcome::Error(message) => assert!(message.contains("non-negative")),
            other => panic!("expected error, got {other:?}"),
        }
    }

    #[test]
    fn all_zero_weights_is_an_error() {
        let params = params(serde_json::json!({"options": ["a", "b"], "weights": [0, 0]}));
        match execute(&params, &mut rng()) {
            StrategyOutcome::Error(message) => assert!(message.starts_with("Error:")),
            other => panic!("expected error, got {other:?}"),
        }
    }

    #[test]
    fn zero_weight_option_is_never_drawn() {
        let params = params(serde_json::json!({"options": ["a", "b"], "weights": [0, 1]}));
        let mut rng = rng();
        for _ in 0..50 {
            assert_eq!(
                execute(&params, &mut rng),
                StrategyOutcome::Value(Value::Text("b".to_string()))
            );
        }
    }

    #[test]
    fn uniform_draw_stays_within_options() {
        let params = params(serde_json::json!({"options": [1, 2, 3]}));
        let mut rng = rng();
        for _ in 0..50 {
            match execute(&params, &mut rng) {
                StrategyOutcome::Value(Value::Int(n)) => assert!((1..=3).contains(&n)),
                other => panic!("expected int, got {other:?}"),
            }
        }
    }

    #[test]
    fn empty_weights_fall_back_to_uniform() {
        let params = params(serde_json::json!({"options": ["x"], "weights": []}));
        assert_eq!(
            execute(&params, &mut rng()),
            StrategyOutcome::Value(Value::Text("x".to_string()))
        );
    }
}
