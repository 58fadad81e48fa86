use chrono::{Duration, NaiveDate, NaiveDateTime, NaiveTime};
use rand::distr::Distribution;
use rand::Rng;
use rand_chacha::ChaCha8Rng;
use serde_json::{Map, Value as JsonValue};

use rowforge_core::Value;

use super::StrategyOutcome;

const DEFAULT_INT_MIN: i64 = 0;
const DEFAULT_INT_MAX: i64 = 10_000;
const DEFAULT_PROBABILITY: f64 = 50.0;
/// Upper bound for bounded repetitions in sampled patterns.
const REGEX_MAX_REPEAT: u32 = 100;

/// Uniform integer in `min..=max`.
pub(crate) fn integer(params: &Map<String, JsonValue>, rng: &mut ChaCha8Rng) -> StrategyOutcome {
    let min = params
        .get("min")
        .and_then(|value| value.as_i64())
        .unwrap_or(DEFAULT_INT_MIN);
    let max = params
        .get("max")
        .and_then(|value| value.as_i64())
        .unwrap_or(DEFAULT_INT_MAX);
    if min > max {
        return StrategyOutcome::Error(format!("Error: integer min {min} exceeds max {max}"));
    }
    StrategyOutcome::Value(Value::Int(rng.random_range(min..=max)))
}

/// Bernoulli draw with `probability` percent of `true`.
pub(crate) fn boolean(params: &Map<String, JsonValue>, rng: &mut ChaCha8Rng) -> StrategyOutcome {
    let probability = params
        .get("probability")
        .and_then(|value| value.as_f64())
        .unwrap_or(DEFAULT_PROBABILITY);
    if !(0.0..=100.0).contains(&probability) {
        return StrategyOutcome::Error(format!(
            "Error: probability {probability} must be between 0 and 100"
        ));
    }
    StrategyOutcome::Value(Value::Bool(rng.random_bool(probability / 100.0)))
}

/// Uniform date-time between `min` and `max` (ISO dates, inclusive).
pub(crate) fn timestamp(params: &Map<String, JsonValue>, rng: &mut ChaCha8Rng) -> StrategyOutcome {
    let base_date = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap_or_default();
    let min = match bound_date(params, "min", base_date) {
        Ok(date) => date,
        Err(message) => return StrategyOutcome::Error(message),
    };
    let max = match bound_date(params, "max", base_date + Duration::days(365)) {
        Ok(date) => date,
        Err(message) => return StrategyOutcome::Error(message),
    };
    if min > max {
        return StrategyOutcome::Error(format!("Error: timestamp min {min} exceeds max {max}"));
    }

    let span_days = (max - min).num_days();
    let date = min + Duration::days(rng.random_range(0..=span_days));
    let seconds = rng.random_range(0..86_400_u32);
    let time = NaiveTime::from_num_seconds_from_midnight_opt(seconds, 0).unwrap_or_default();

    StrategyOutcome::Value(Value::Text(
        NaiveDateTime::new(date, time)
            .format("%Y-%m-%dT%H:%M:%S")
            .to_string(),
    ))
}

/// String sampled from `params.pattern`.
pub(crate) fn regex(params: &Map<String, JsonValue>, rng: &mut ChaCha8Rng) -> StrategyOutcome {
    let pattern = match params.get("pattern").and_then(|value| value.as_str()) {
        Some(pattern) if !pattern.is_empty() => pattern,
        _ => return StrategyOutcome::Error("Error: pattern required".to_string()),
    };
    match rand_regex::Regex::compile(pattern, REGEX_MAX_REPEAT) {
        Ok(generator) => {
            let value: String = generator.sample(rng);
            StrategyOutcome::Value(Value::Text(value))
        }
        Err(err) => StrategyOutcome::Error(format!("Error: invalid pattern '{pattern}': {err}")),
    }
}

fn bound_date(
    params: &Map<String, JsonValue>,
    key: &str,
    default: NaiveDate,
) -> Result<NaiveDate, String> {
    match params.get(key) {
        None | Some(JsonValue::Null) => Ok(default),
        Some(value) => {
            let raw = value
                .as_str()
                .ok_or_else(|| format!("Error: timestamp {key} must be a YYYY-MM-DD string"))?;
            NaiveDate::parse_from_str(raw, "%Y-%m-%d")
                .map_err(|err| format!("Error: timestamp {key} '{raw}' is invalid: {err}"))
        }
    }
}
