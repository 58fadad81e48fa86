use rand_chacha::ChaCha8Rng;
use serde_json::{Map, Value as JsonValue};

use rowforge_core::Value;

use super::catalog;
use super::locale::LocaleKey;
use super::StrategyOutcome;

/// Procedural executor: `params.method` selects a catalog operation,
/// `params.kwargs` carries operation-specific arguments.
///
/// A missing or empty `method` is an absent value, not an error.
pub(crate) fn execute(
    params: &Map<String, JsonValue>,
    locale: LocaleKey,
    rng: &mut ChaCha8Rng,
) -> StrategyOutcome {
    let method = match params.get("method") {
        None | Some(JsonValue::Null) => return StrategyOutcome::Value(Value::Null),
        Some(value) => match value.as_str() {
            Some("") => return StrategyOutcome::Value(Value::Null),
            Some(method) => method,
            None => return StrategyOutcome::Error("Error: method must be a string".to_string()),
        },
    };

    let kwargs = match params.get("kwargs") {
        None | Some(JsonValue::Null) => None,
        Some(JsonValue::Object(map)) => Some(map),
        Some(_) => return StrategyOutcome::Error("Error: kwargs must be an object".to_string()),
    };

    match catalog::invoke(method, locale, kwargs, rng) {
        Ok(value) => StrategyOutcome::Value(value),
        Err(message) => StrategyOutcome::Error(message),
    }
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;

    use super::*;

    fn rng() -> ChaCha8Rng {
        ChaCha8Rng::seed_from_u64(11)
    }

    fn params(json: serde_json::Value) -> Map<String, JsonValue> {
        json.as_object().expect("object params").clone()
    }

    #[test]
    fn missing_method_is_null() {
        let outcome = execute(&Map::new(), LocaleKey::EnUs, &mut rng());
        assert_eq!(outcome, StrategyOutcome::Value(Value::Null));
    }

    #[test]
    fn empty_method_is_null() {
        let params = params(serde_json::json!({"method": ""}));
        let outcome = execute(&params, LocaleKey::EnUs, &mut rng());
        assert_eq!(outcome, StrategyOutcome::Value(Value::Null));
    }

    #[test]
    fn unknown_method_is_an_error_naming_it() {
        let params = params(serde_json::json!({"method": "flux_capacitor"}));
        match execute(&params, LocaleKey::EnUs, &mut rng()) {
            StrategyOutcome::Error(message) => assert!(message.contains("flux_capacitor")),
            other => panic!("expected error, got {other:?}"),
        }
    }

    #[test]
    fn kwargs_must_be_an_object() {
        let params = params(serde_json::json!({"method": "random_int", "kwargs": [1, 2]}));
        match execute(&params, LocaleKey::EnUs, &mut rng()) {
            StrategyOutcome::Error(message) => assert!(message.contains("kwargs")),
            other => panic!("expected error, got {other:?}"),
        }
    }

    #[test]
    fn known_method_produces_a_value() {
        let params = params(serde_json::json!({"method": "first_name"}));
        match execute(&params, LocaleKey::EnUs, &mut rng()) {
            StrategyOutcome::Value(Value::Text(name)) => assert!(!name.is_empty()),
            other => panic!("expected text, got {other:?}"),
        }
    }
}
