use std::sync::Arc;
use std::time::Instant;

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use tracing::{info, warn};

use rowforge_core::{
    Dataset, Field, GenerationConfig, GenerationRequest, Row, TableRows, TableSpec, Value,
    GLOBAL_CONTEXT_KEY, validate_request,
};

use crate::client::{ClientError, ModelClient, OpenAiClient};
use crate::errors::GenerationError;
use crate::model::{GenerateOptions, GenerationReport, TableReport};
use crate::strategies::{self, LocaleKey, StrategyContext, StrategyOutcome};
use crate::unique::{UniqueTrackers, ValueSet};

/// Retry ceiling for one unique field-row pair.
const MAX_VALUE_ATTEMPTS: u32 = 10;

/// Result of a generation run.
#[derive(Debug, Clone)]
pub struct GenerationRun {
    pub data: Dataset,
    pub report: GenerationReport,
}

/// Entry point for generating datasets from a request.
pub struct GenerationEngine {
    options: GenerateOptions,
    model_client: Arc<dyn ModelClient>,
}

impl GenerationEngine {
    pub fn new(options: GenerateOptions, model_client: Arc<dyn ModelClient>) -> Self {
        Self {
            options,
            model_client,
        }
    }

    /// Engine backed by the environment-configured OpenAI-compatible client.
    pub fn from_env(options: GenerateOptions) -> Result<Self, ClientError> {
        Ok(Self::new(options, Arc::new(OpenAiClient::from_env()?)))
    }

    /// Generate every table in the request.
    ///
    /// Fatal faults (malformed request shape, unknown locale) surface here;
    /// per-value failures never do — they land in the rows as error strings.
    pub fn run(&self, request: &GenerationRequest) -> Result<GenerationRun, GenerationError> {
        validate_request(request)?;
        let locale = LocaleKey::parse(&request.config.locale).ok_or_else(|| {
            GenerationError::InvalidRequest(format!(
                "unsupported locale '{}'",
                request.config.locale
            ))
        })?;

        let start = Instant::now();
        let seed = self.options.seed.unwrap_or_else(|| rand::rng().random());
        let mut report = GenerationReport::new(&request.config.job_name, seed);
        let mut dataset = Dataset::default();

        info!(
            job = %request.config.job_name,
            tables = request.tables.len(),
            seed,
            "generation started"
        );

        for table in &request.tables {
            let rows_count = table.effective_rows(&request.config);
            let table_start = Instant::now();
            let mut rng = ChaCha8Rng::seed_from_u64(hash_seed(seed, &table.name));
            let mut trackers = UniqueTrackers::for_table(&table.fields);
            let mut stats = TableStats::default();

            let mut rows = Vec::with_capacity(rows_count as usize);
            for _ in 0..rows_count {
                rows.push(self.assemble_row(
                    table,
                    &request.config,
                    locale,
                    &mut trackers,
                    &mut rng,
                    &mut stats,
                ));
            }

            info!(
                table = %table.name,
                rows = rows.len(),
                retries = stats.retries,
                exhausted = stats.exhausted,
                duration_ms = table_start.elapsed().as_millis() as u64,
                "table generated"
            );

            report.tables.push(TableReport {
                table: table.name.clone(),
                rows_requested: rows_count as u64,
                rows_generated: rows.len() as u64,
                retries: stats.retries,
                exhausted_values: stats.exhausted,
            });
            report.retries_total += stats.retries;
            report.strategy_errors += stats.strategy_errors;
            report.exhausted_total += stats.exhausted;

            dataset.tables.push(TableRows {
                name: table.name.clone(),
                rows,
            });
        }

        report.duration_ms = start.elapsed().as_millis() as u64;
        info!(
            job = %request.config.job_name,
            total_rows = dataset.total_rows(),
            retries = report.retries_total,
            duration_ms = report.duration_ms,
            "generation completed"
        );

        Ok(GenerationRun {
            data: dataset,
            report,
        })
    }

    /// Build one row in field declaration order. Earlier fields (and
    /// `global_context`) are visible to later fields; the pseudo-field is
    /// stripped before the row is returned.
    fn assemble_row(
        &self,
        table: &TableSpec,
        config: &GenerationConfig,
        locale: LocaleKey,
        trackers: &mut UniqueTrackers,
        rng: &mut ChaCha8Rng,
        stats: &mut TableStats,
    ) -> Row {
        let mut row = Row::new();
        if let Some(context) = &config.global_context {
            row.insert(GLOBAL_CONTEXT_KEY, Value::Text(context.clone()));
        }

        for field in &table.fields {
            let value = if field.is_unique {
                self.resolve_unique(field, &row, trackers, locale, rng, stats)
            } else {
                // Single attempt, accept anything, error strings included.
                let avoid = ValueSet::default();
                self.attempt(field, &row, 0, &avoid, locale, rng, stats)
            };
            row.insert(field.name.clone(), value);
        }

        row.remove(GLOBAL_CONTEXT_KEY);
        row
    }

    fn resolve_unique(
        &self,
        field: &Field,
        row: &Row,
        trackers: &mut UniqueTrackers,
        locale: LocaleKey,
        rng: &mut ChaCha8Rng,
        stats: &mut TableStats,
    ) -> Value {
        let tracker = trackers.field_mut(&field.name);
        let (outcome, retries) = drive_unique_retry(tracker, |attempt, avoid| {
            self.attempt(field, row, attempt, avoid, locale, rng, stats)
        });
        stats.retries += retries as u64;

        match outcome {
            UniqueOutcome::Accepted(value) => value,
            UniqueOutcome::Exhausted => {
                stats.exhausted += 1;
                warn!(
                    field = %field.name,
                    attempts = MAX_VALUE_ATTEMPTS,
                    "unique retry budget exhausted"
                );
                Value::Text(exhaustion_marker(&field.name))
            }
        }
    }

    fn attempt(
        &self,
        field: &Field,
        row: &Row,
        attempt: u32,
        avoid: &ValueSet,
        locale: LocaleKey,
        rng: &mut ChaCha8Rng,
        stats: &mut TableStats,
    ) -> Value {
        let mut ctx = StrategyContext {
            row,
            avoid,
            attempt,
            locale,
            rng,
            model_client: self.model_client.as_ref(),
        };
        match strategies::execute(field, &mut ctx) {
            StrategyOutcome::Value(value) => value,
            StrategyOutcome::Error(message) => {
                stats.strategy_errors += 1;
                warn!(field = %field.name, error = %message, "strategy error");
                Value::Text(message)
            }
        }
    }
}

/// Terminal outcomes of the unique retry loop.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum UniqueOutcome {
    Accepted(Value),
    Exhausted,
}

/// Drive `ATTEMPT -> {ACCEPT | COLLIDE -> ATTEMPT | EXHAUSTED}` for one
/// unique field-row pair. Returns the outcome and the attempt counter.
///
/// Accepted values are committed to the tracker; the exhaustion outcome
/// leaves the tracker untouched. Collided values accumulate only in the
/// local avoid list snapshot.
pub(crate) fn drive_unique_retry<F>(tracker: &mut ValueSet, mut produce: F) -> (UniqueOutcome, u32)
where
    F: FnMut(u32, &ValueSet) -> Value,
{
    let mut avoid = tracker.snapshot();
    let mut attempt = 0;

    loop {
        let value = produce(attempt, &avoid);
        let key = value.unique_key();
        if !avoid.contains(&key) {
            tracker.insert(key);
            return (UniqueOutcome::Accepted(value), attempt);
        }

        attempt += 1;
        if attempt >= MAX_VALUE_ATTEMPTS {
            return (UniqueOutcome::Exhausted, attempt);
        }
        avoid.insert(key);
    }
}

/// Deterministic marker committed when the retry budget runs out.
/// Distinct from per-strategy error strings.
pub fn exhaustion_marker(field_name: &str) -> String {
    format!("ERROR: Could not generate unique value for {field_name}")
}

fn hash_seed(seed: u64, key: &str) -> u64 {
    let mut hash = seed ^ 0xcbf29ce484222325;
    for byte in key.as_bytes() {
        hash ^= *byte as u64;
        hash = hash.wrapping_mul(0x100000001b3);
    }
    hash
}

#[derive(Debug, Default)]
struct TableStats {
    retries: u64,
    strategy_errors: u64,
    exhausted: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_first_fresh_value_without_retries() {
        let mut tracker = ValueSet::default();
        let (outcome, retries) =
            drive_unique_retry(&mut tracker, |_, _| Value::Text("fresh".to_string()));

        assert_eq!(outcome, UniqueOutcome::Accepted(Value::Text("fresh".to_string())));
        assert_eq!(retries, 0);
        assert!(tracker.contains("fresh"));
    }

    #[test]
    fn collisions_retry_with_growing_avoid_list() {
        let mut tracker = ValueSet::default();
        tracker.insert("taken".to_string());

        let mut produced = Vec::new();
        let (outcome, retries) = drive_unique_retry(&mut tracker, |attempt, avoid| {
            produced.push(avoid.len());
            if attempt < 2 {
                Value::Text("taken".to_string())
            } else {
                Value::Text("fresh".to_string())
            }
        });

        assert_eq!(outcome, UniqueOutcome::Accepted(Value::Text("fresh".to_string())));
        assert_eq!(retries, 2);
        // The avoid list only grows with values not already present.
        assert_eq!(produced, vec![1, 1, 1]);
        assert!(tracker.contains("fresh"));
    }

    #[test]
    fn constant_producer_exhausts_after_ten_attempts() {
        let mut tracker = ValueSet::default();
        tracker.insert("same".to_string());

        let mut calls = 0;
        let (outcome, retries) = drive_unique_retry(&mut tracker, |_, _| {
            calls += 1;
            Value::Text("same".to_string())
        });

        assert_eq!(outcome, UniqueOutcome::Exhausted);
        assert_eq!(retries, MAX_VALUE_ATTEMPTS);
        assert_eq!(calls, 10);
        // Exhaustion leaves the tracker untouched.
        assert_eq!(tracker.len(), 1);
    }

    #[test]
    fn distinct_collisions_extend_the_local_avoid_list() {
        let mut tracker = ValueSet::default();
        tracker.insert("a".to_string());
        tracker.insert("b".to_string());

        let values = ["a", "b", "c"];
        let (outcome, retries) = drive_unique_retry(&mut tracker, |attempt, avoid| {
            assert!(avoid.len() >= 2);
            Value::Text(values[attempt as usize].to_string())
        });

        assert_eq!(outcome, UniqueOutcome::Accepted(Value::Text("c".to_string())));
        assert_eq!(retries, 2);
        assert_eq!(tracker.len(), 3);
    }

    #[test]
    fn marker_names_the_field() {
        assert_eq!(
            exhaustion_marker("email"),
            "ERROR: Could not generate unique value for email"
        );
    }

    #[test]
    fn hash_seed_varies_by_table() {
        assert_ne!(hash_seed(1, "users"), hash_seed(1, "orders"));
        assert_eq!(hash_seed(1, "users"), hash_seed(1, "users"));
    }
}
