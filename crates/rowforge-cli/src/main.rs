use std::fs;
use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use thiserror::Error;
use tracing::info;
use tracing_subscriber::EnvFilter;

use rowforge_core::{GenerationRequest, OutputFormat};
use rowforge_generate::output::{render_json, render_sql, write_dataset_csv};
use rowforge_generate::strategies::catalog;
use rowforge_generate::{ClientError, GenerateOptions, GenerationEngine, GenerationError};

#[derive(Debug, Error)]
enum CliError {
    #[error("generation error: {0}")]
    Generation(#[from] GenerationError),
    #[error("model client error: {0}")]
    Client(#[from] ClientError),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Parser, Debug)]
#[command(name = "rowforge", version, about = "Rowforge synthetic data generator")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Generate a dataset from a request file.
    Generate(GenerateArgs),
    /// List the procedural catalog operations.
    Methods,
}

#[derive(Args, Debug)]
struct GenerateArgs {
    /// Path to a *.request.json file.
    #[arg(long, value_name = "PATH")]
    request: PathBuf,
    /// Output directory for runs.
    #[arg(long, default_value = "runs")]
    out: PathBuf,
    /// Seed for reproducible runs.
    #[arg(long)]
    seed: Option<u64>,
}

fn main() {
    init_logging();
    let cli = Cli::parse();
    let result = match cli.command {
        Command::Generate(args) => generate(args),
        Command::Methods => {
            for method in catalog::method_names() {
                println!("{method}");
            }
            Ok(())
        }
    };

    if let Err(err) = result {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}

fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

fn generate(args: GenerateArgs) -> Result<(), CliError> {
    let contents = fs::read_to_string(&args.request)?;
    let request: GenerationRequest = serde_json::from_str(&contents)?;

    let engine = GenerationEngine::from_env(GenerateOptions { seed: args.seed })?;
    let mut run = engine.run(&request)?;

    let slug = slugify(&request.config.job_name);
    let timestamp = chrono::Utc::now().format("%Y-%m-%dT%H-%M-%SZ").to_string();
    let run_dir = args.out.join(format!("{timestamp}__{slug}"));
    fs::create_dir_all(&run_dir)?;

    let bytes_written = match request.config.output_format {
        OutputFormat::Json => {
            let rendered = render_json(&request.config.job_name, &run.data)
                .map_err(GenerationError::from)?;
            let path = run_dir.join(format!("{slug}.json"));
            fs::write(&path, &rendered)?;
            rendered.len() as u64
        }
        OutputFormat::Csv => write_dataset_csv(&run_dir, &run.data)?,
        OutputFormat::Sql => {
            let rendered = render_sql(&run.data);
            let path = run_dir.join(format!("{slug}.sql"));
            fs::write(&path, &rendered)?;
            rendered.len() as u64
        }
    };

    run.report.bytes_written = bytes_written;
    fs::write(
        run_dir.join("generation_report.json"),
        serde_json::to_vec_pretty(&run.report)?,
    )?;

    info!(
        run_dir = %run_dir.display(),
        tables = run.report.tables.len(),
        bytes_written,
        "run written"
    );
    println!("{}", run_dir.display());
    Ok(())
}

fn slugify(name: &str) -> String {
    name.to_lowercase().replace(' ', "_")
}
