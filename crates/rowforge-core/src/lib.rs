//! Core contracts for Rowforge.
//!
//! This crate defines the canonical request types, the generated value
//! model, and validation helpers shared between the engine and the CLI.

pub mod error;
pub mod request;
pub mod validation;
pub mod value;

pub use error::{Error, Result};
pub use request::{
    Field, FieldKind, GenerationConfig, GenerationRequest, OutputFormat, TableSpec,
};
pub use validation::validate_request;
pub use value::{Dataset, Row, TableRows, Value};

/// Contract version for `*.request.json` artifacts.
pub const REQUEST_VERSION: &str = "0.1";

/// Reserved pseudo-field injected into row context and never emitted.
pub const GLOBAL_CONTEXT_KEY: &str = "global_context";
