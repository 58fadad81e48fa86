//! Generate a small dataset and print the JSON export envelope.
//!
//! ```sh
//! cargo run -p rowforge-generate --example generate_json
//! ```

use rowforge_core::GenerationRequest;
use rowforge_generate::output::render_json;
use rowforge_generate::{GenerateOptions, GenerationEngine};

fn main() {
    let request: GenerationRequest = serde_json::from_str(
        r#"{
            "config": {"job_name": "demo", "locale": "en_US"},
            "tables": [
                {
                    "name": "users",
                    "rows_count": 5,
                    "fields": [
                        {"name": "user_id", "type": "procedural", "is_unique": true, "params": {"method": "uuid4"}},
                        {"name": "full_name", "type": "procedural", "params": {"method": "name"}},
                        {"name": "plan", "type": "distribution", "params": {"options": ["free", "pro"], "weights": [3, 1]}},
                        {"name": "signup", "type": "timestamp", "params": {"min": "2024-01-01", "max": "2024-06-30"}}
                    ]
                }
            ]
        }"#,
    )
    .expect("parse request");

    let engine = GenerationEngine::from_env(GenerateOptions { seed: Some(42) })
        .expect("build engine");
    let run = engine.run(&request).expect("run generation");

    let rendered = render_json(&request.config.job_name, &run.data).expect("render json");
    println!("{rendered}");
}
