use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value as JsonValue};

/// Top-level generation request: one config plus one or more tables.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct GenerationRequest {
    pub config: GenerationConfig,
    pub tables: Vec<TableSpec>,
}

/// Job-wide configuration.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct GenerationConfig {
    /// Default row count for tables that do not declare their own.
    #[serde(default = "default_rows_count")]
    pub rows_count: u32,
    #[serde(default)]
    pub output_format: OutputFormat,
    pub job_name: String,
    /// Free-text context injected into every row's generation context.
    /// Never emitted as a field.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub global_context: Option<String>,
    /// Locale for the procedural backend (e.g. `en_US`).
    #[serde(default = "default_locale")]
    pub locale: String,
}

/// One table to generate: a name, an optional row count, and an ordered
/// field list.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct TableSpec {
    pub name: String,
    /// Overrides `GenerationConfig::rows_count` when present.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rows_count: Option<u32>,
    pub fields: Vec<Field>,
}

impl TableSpec {
    /// Effective row count for this table under the given config.
    pub fn effective_rows(&self, config: &GenerationConfig) -> u32 {
        self.rows_count.unwrap_or(config.rows_count)
    }
}

/// One field definition within a table.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct Field {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: FieldKind,
    /// Strategy-specific parameters; recognized keys depend on `kind`.
    #[serde(default, skip_serializing_if = "Map::is_empty")]
    pub params: Map<String, JsonValue>,
    #[serde(default)]
    pub is_unique: bool,
}

impl Field {
    /// Convenience accessor for a string parameter.
    pub fn param_str(&self, key: &str) -> Option<&str> {
        self.params.get(key).and_then(|value| value.as_str())
    }
}

/// Generation strategy selector for a field.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum FieldKind {
    /// Procedural value library lookup (`params.method` + `params.kwargs`).
    Procedural,
    /// Weighted discrete choice (`params.options` + `params.weights`).
    Distribution,
    /// Generative-model completion (`params.prompt_template`, ...).
    Model,
    /// Uniform integer in `params.min..=params.max`.
    Integer,
    /// Bernoulli draw with `params.probability` percent.
    Boolean,
    /// Uniform date-time between `params.min` and `params.max`.
    Timestamp,
    /// String sampled from `params.pattern`.
    Regex,
}

/// Export format rendered by the output layer.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum OutputFormat {
    #[default]
    Json,
    Csv,
    Sql,
}

fn default_rows_count() -> u32 {
    10
}

fn default_locale() -> String {
    "en_US".to_string()
}
