use serde::Serialize;

use rowforge_core::Dataset;

/// JSON export envelope; `data` is the generation result verbatim.
#[derive(Serialize)]
struct JsonEnvelope<'a> {
    status: &'static str,
    job_name: &'a str,
    tables_count: usize,
    total_rows: u64,
    data: &'a Dataset,
}

pub fn render_json(job_name: &str, data: &Dataset) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(&JsonEnvelope {
        status: "success",
        job_name,
        tables_count: data.tables.len(),
        total_rows: data.total_rows(),
        data,
    })
}
