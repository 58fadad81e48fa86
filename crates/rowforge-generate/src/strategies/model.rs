use serde_json::{Map, Value as JsonValue};

use rowforge_core::Value;

use crate::client::{ChatMessage, CompletionRequest};
use crate::template;

use super::{StrategyContext, StrategyOutcome};

pub(crate) const DEFAULT_MODEL: &str = "gpt-4o-mini";

const DEFAULT_TEMPERATURE: f32 = 0.7;
const TEMPERATURE_STEP: f32 = 0.1;
const TEMPERATURE_CAP: f32 = 1.2;
/// Output-token ceiling: one scalar value, nothing more.
const COMPLETION_TOKEN_CEILING: u32 = 60;
/// At most this many recently avoided values are named in the prompt.
const AVOID_WINDOW: usize = 20;
/// Past this retry count the prompt permits invented values.
const INVENTION_THRESHOLD: u32 = 3;

const SYSTEM_PROMPT: &str =
    "You are a raw data generator. Output ONE single value. No quotes, no markdown.";

/// Model executor: resolve the prompt template against the row context,
/// augment it with uniqueness constraints, and run one completion.
///
/// Template problems abort before any external call; call failures come
/// back as error strings.
pub(crate) fn execute(
    params: &Map<String, JsonValue>,
    ctx: &mut StrategyContext<'_>,
) -> StrategyOutcome {
    let model = params
        .get("model")
        .and_then(|value| value.as_str())
        .unwrap_or(DEFAULT_MODEL);
    let base_temperature = params
        .get("temperature")
        .and_then(|value| value.as_f64())
        .map(|value| value as f32)
        .unwrap_or(DEFAULT_TEMPERATURE);

    let template = match params.get("prompt_template").and_then(|value| value.as_str()) {
        Some(template) if !template.is_empty() => template,
        _ => return StrategyOutcome::Error("Error: missing prompt_template".to_string()),
    };

    let mut prompt = match template::render(template, ctx.row) {
        Ok(prompt) => prompt,
        Err(err) => return StrategyOutcome::Error(format!("Error formatting prompt: {err}")),
    };

    if !ctx.avoid.is_empty() {
        let avoided = ctx.avoid.recent(AVOID_WINDOW).join(", ");
        prompt.push_str(&format!(
            "\n\nIMPORTANT constraint: The generated value MUST be unique. \
             DO NOT use any of these values: {avoided}."
        ));
        if ctx.attempt > INVENTION_THRESHOLD {
            prompt.push_str(" Be highly creative, invent a fictional one if needed.");
        }
    }

    let request = CompletionRequest {
        model: model.to_string(),
        messages: vec![ChatMessage::system(SYSTEM_PROMPT), ChatMessage::user(prompt)],
        temperature: effective_temperature(base_temperature, ctx.attempt),
        max_tokens: COMPLETION_TOKEN_CEILING,
    };

    match ctx.model_client.complete(&request) {
        Ok(text) => StrategyOutcome::Value(Value::Text(normalize_completion(&text))),
        Err(err) => StrategyOutcome::Error(format!("Error: model request failed: {err}")),
    }
}

/// Retries sample progressively hotter, capped.
fn effective_temperature(base: f32, attempt: u32) -> f32 {
    (base + TEMPERATURE_STEP * attempt as f32).min(TEMPERATURE_CAP)
}

/// Trim whitespace and a single layer of enclosing quotes.
fn normalize_completion(raw: &str) -> String {
    let trimmed = raw.trim();
    for quote in ['"', '\''] {
        if trimmed.len() >= 2 && trimmed.starts_with(quote) && trimmed.ends_with(quote) {
            return trimmed[1..trimmed.len() - 1].to_string();
        }
    }
    trimmed.to_string()
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    use rowforge_core::Row;

    use crate::client::{ClientError, ModelClient};
    use crate::strategies::LocaleKey;
    use crate::unique::ValueSet;

    use super::*;

    /// Records every prompt and replays canned responses.
    struct ScriptedClient {
        prompts: Mutex<Vec<String>>,
        temperatures: Mutex<Vec<f32>>,
        response: Result<String, ()>,
    }

    impl ScriptedClient {
        fn replying(text: &str) -> Self {
            Self {
                prompts: Mutex::new(Vec::new()),
                temperatures: Mutex::new(Vec::new()),
                response: Ok(text.to_string()),
            }
        }

        fn failing() -> Self {
            Self {
                prompts: Mutex::new(Vec::new()),
                temperatures: Mutex::new(Vec::new()),
                response: Err(()),
            }
        }

        fn last_prompt(&self) -> Option<String> {
            self.prompts.lock().expect("prompts lock").last().cloned()
        }

        fn calls(&self) -> usize {
            self.prompts.lock().expect("prompts lock").len()
        }
    }

    impl ModelClient for ScriptedClient {
        fn complete(&self, request: &CompletionRequest) -> Result<String, ClientError> {
            let prompt = request
                .messages
                .iter()
                .find(|message| message.role == crate::client::MessageRole::User)
                .map(|message| message.content.clone())
                .unwrap_or_default();
            self.prompts.lock().expect("prompts lock").push(prompt);
            self.temperatures
                .lock()
                .expect("temperatures lock")
                .push(request.temperature);
            self.response
                .clone()
                .map_err(|()| ClientError::RequestFailed("scripted failure".to_string()))
        }
    }

    fn params(json: serde_json::Value) -> Map<String, JsonValue> {
        json.as_object().expect("object params").clone()
    }

    fn run(
        params_json: serde_json::Value,
        client: &ScriptedClient,
        row: &Row,
        avoid: &ValueSet,
        attempt: u32,
    ) -> StrategyOutcome {
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let mut ctx = StrategyContext {
            row,
            avoid,
            attempt,
            locale: LocaleKey::EnUs,
            rng: &mut rng,
            model_client: client,
        };
        execute(&params(params_json), &mut ctx)
    }

    #[test]
    fn missing_template_makes_no_call() {
        let client = ScriptedClient::replying("x");
        let outcome = run(
            serde_json::json!({}),
            &client,
            &Row::new(),
            &ValueSet::default(),
            0,
        );
        assert_eq!(
            outcome,
            StrategyOutcome::Error("Error: missing prompt_template".to_string())
        );
        assert_eq!(client.calls(), 0);
    }

    #[test]
    fn unresolved_placeholder_makes_no_call() {
        let client = ScriptedClient::replying("x");
        let outcome = run(
            serde_json::json!({"prompt_template": "hello {missing}"}),
            &client,
            &Row::new(),
            &ValueSet::default(),
            0,
        );
        match outcome {
            StrategyOutcome::Error(message) => {
                assert!(message.starts_with("Error formatting prompt"));
                assert!(message.contains("missing"));
            }
            other => panic!("expected error, got {other:?}"),
        }
        assert_eq!(client.calls(), 0);
    }

    #[test]
    fn row_context_reaches_the_prompt() {
        let client = ScriptedClient::replying("ok");
        let mut row = Row::new();
        row.insert("rating", rowforge_core::Value::Int(2));

        run(
            serde_json::json!({"prompt_template": "Review for {rating} stars"}),
            &client,
            &row,
            &ValueSet::default(),
            0,
        );

        assert_eq!(
            client.last_prompt().as_deref(),
            Some("Review for 2 stars")
        );
    }

    #[test]
    fn avoid_set_augments_the_prompt() {
        let client = ScriptedClient::replying("fresh");
        let mut avoid = ValueSet::default();
        avoid.insert("Acme".to_string());
        avoid.insert("Globex".to_string());

        run(
            serde_json::json!({"prompt_template": "A company name"}),
            &client,
            &Row::new(),
            &avoid,
            1,
        );

        let prompt = client.last_prompt().expect("prompt");
        assert!(prompt.contains("MUST be unique"));
        assert!(prompt.contains("Acme, Globex"));
        assert!(!prompt.contains("invent a fictional one"));
    }

    #[test]
    fn deep_retries_permit_invented_values() {
        let client = ScriptedClient::replying("fresh");
        let mut avoid = ValueSet::default();
        avoid.insert("Acme".to_string());

        run(
            serde_json::json!({"prompt_template": "A company name"}),
            &client,
            &Row::new(),
            &avoid,
            4,
        );

        let prompt = client.last_prompt().expect("prompt");
        assert!(prompt.contains("invent a fictional one"));
    }

    #[test]
    fn avoid_list_names_most_recent_twenty() {
        let client = ScriptedClient::replying("fresh");
        let mut avoid = ValueSet::default();
        for i in 0..25 {
            avoid.insert(format!("v{i}"));
        }

        run(
            serde_json::json!({"prompt_template": "A value"}),
            &client,
            &Row::new(),
            &avoid,
            1,
        );

        let prompt = client.last_prompt().expect("prompt");
        assert!(!prompt.contains("v4,"), "oldest values are windowed out");
        assert!(prompt.contains("v5"));
        assert!(prompt.contains("v24"));
    }

    #[test]
    fn temperature_ramps_and_caps() {
        assert_eq!(effective_temperature(0.7, 0), 0.7);
        assert!((effective_temperature(0.7, 2) - 0.9).abs() < 1e-6);
        assert_eq!(effective_temperature(0.7, 9), 1.2);
        assert_eq!(effective_temperature(1.3, 0), 1.2);
    }

    #[test]
    fn completion_is_trimmed_one_quote_layer() {
        assert_eq!(normalize_completion("  plain  "), "plain");
        assert_eq!(normalize_completion("\"quoted\""), "quoted");
        assert_eq!(normalize_completion("'single'"), "single");
        assert_eq!(normalize_completion("\"\"double\"\""), "\"double\"");
        assert_eq!(normalize_completion("\""), "\"");
    }

    #[test]
    fn call_failure_is_an_error_string() {
        let client = ScriptedClient::failing();
        let outcome = run(
            serde_json::json!({"prompt_template": "A value"}),
            &client,
            &Row::new(),
            &ValueSet::default(),
            0,
        );
        match outcome {
            StrategyOutcome::Error(message) => {
                assert!(message.starts_with("Error: model request failed"));
                assert!(message.contains("scripted failure"));
            }
            other => panic!("expected error, got {other:?}"),
        }
    }
}
