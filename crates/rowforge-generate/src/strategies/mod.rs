//! Strategy executors: one value producer per [`FieldKind`].
//!
//! Executors never fail the run. Malformed parameters, unknown operations,
//! and external-call failures come back as [`StrategyOutcome::Error`], which
//! the engine commits as in-band error strings.

pub mod catalog;
pub mod locale;

mod distribution;
mod model;
mod primitives;
mod procedural;

use rand_chacha::ChaCha8Rng;

use rowforge_core::{Field, FieldKind, Row, Value};

use crate::client::ModelClient;
use crate::unique::ValueSet;

pub use locale::LocaleKey;

/// Result of one strategy invocation.
#[derive(Debug, Clone, PartialEq)]
pub enum StrategyOutcome {
    Value(Value),
    /// In-band error message; occupies the field's slot in the row.
    Error(String),
}

/// Everything an executor may consult for one attempt.
pub struct StrategyContext<'a> {
    /// Fields already assembled for this row, plus `global_context`.
    pub row: &'a Row,
    /// Values to avoid for a unique field; empty otherwise.
    pub avoid: &'a ValueSet,
    /// 0-indexed retry count for this field-row pair.
    pub attempt: u32,
    pub locale: LocaleKey,
    pub rng: &'a mut ChaCha8Rng,
    pub model_client: &'a dyn ModelClient,
}

/// Dispatch on the field's declared kind.
pub fn execute(field: &Field, ctx: &mut StrategyContext<'_>) -> StrategyOutcome {
    match field.kind {
        FieldKind::Procedural => procedural::execute(&field.params, ctx.locale, ctx.rng),
        FieldKind::Distribution => distribution::execute(&field.params, ctx.rng),
        FieldKind::Model => model::execute(&field.params, ctx),
        FieldKind::Integer => primitives::integer(&field.params, ctx.rng),
        FieldKind::Boolean => primitives::boolean(&field.params, ctx.rng),
        FieldKind::Timestamp => primitives::timestamp(&field.params, ctx.rng),
        FieldKind::Regex => primitives::regex(&field.params, ctx.rng),
    }
}
