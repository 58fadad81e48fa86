use std::collections::BTreeSet;

use crate::error::{Error, Result};
use crate::request::GenerationRequest;
use crate::GLOBAL_CONTEXT_KEY;

/// Validate structural invariants of a generation request.
///
/// This checks:
/// - at least one table, with at least one field each
/// - positive row counts
/// - unique table names, unique field names per table
/// - the reserved `global_context` name is not declared as a field
pub fn validate_request(request: &GenerationRequest) -> Result<()> {
    if request.config.job_name.trim().is_empty() {
        return Err(Error::InvalidRequest("job_name must not be empty".to_string()));
    }
    if request.config.rows_count == 0 {
        return Err(Error::InvalidRequest(
            "rows_count must be positive".to_string(),
        ));
    }
    if request.tables.is_empty() {
        return Err(Error::InvalidRequest(
            "request must declare at least one table".to_string(),
        ));
    }

    let mut table_names = BTreeSet::new();
    for table in &request.tables {
        if table.name.trim().is_empty() {
            return Err(Error::InvalidRequest("table name must not be empty".to_string()));
        }
        if !table_names.insert(table.name.clone()) {
            return Err(Error::InvalidRequest(format!(
                "duplicate table name: {}",
                table.name
            )));
        }
        if table.rows_count == Some(0) {
            return Err(Error::InvalidRequest(format!(
                "rows_count must be positive for table '{}'",
                table.name
            )));
        }
        if table.fields.is_empty() {
            return Err(Error::InvalidRequest(format!(
                "table '{}' must declare at least one field",
                table.name
            )));
        }

        let mut field_names = BTreeSet::new();
        for field in &table.fields {
            if field.name.trim().is_empty() {
                return Err(Error::InvalidRequest(format!(
                    "field name must not be empty in table '{}'",
                    table.name
                )));
            }
            if field.name == GLOBAL_CONTEXT_KEY {
                return Err(Error::InvalidRequest(format!(
                    "field name '{}' is reserved in table '{}'",
                    GLOBAL_CONTEXT_KEY, table.name
                )));
            }
            if !field_names.insert(field.name.clone()) {
                return Err(Error::InvalidRequest(format!(
                    "duplicate field name: {}.{}",
                    table.name, field.name
                )));
            }
        }
    }

    Ok(())
}
