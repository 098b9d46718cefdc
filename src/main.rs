use clap::Parser;
use icsr::{GenerationParams, PipelineBuilder, PipelineError, read_records};
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

/// Generate E2B R3 ICSR XML messages from JSON case records.
#[derive(Parser, Debug)]
#[command(name = "icsr", version, about)]
struct Cli {
    /// JSON case record, or an array of records ("-" reads stdin)
    #[arg(short, long)]
    input: PathBuf,

    /// Output XML file (stdout when omitted). Array input writes
    /// `<stem>-<n>.xml` files next to this path instead.
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Mapping table CSV (`tag,source_path`); the built-in table when omitted
    #[arg(short, long, env = "ICSR_MAPPING")]
    mapping: Option<PathBuf>,

    /// Schema configuration JSON; the built-in E2B R3 schema when omitted
    #[arg(short, long, env = "ICSR_SCHEMA")]
    schema: Option<PathBuf>,

    /// Message id (a random UUID per message when omitted). Array input
    /// numbers it per record: `M1-1`, `M1-2`, ...
    #[arg(long)]
    message_id: Option<String>,

    /// Creation time, HL7 TS format (the current UTC time when omitted)
    #[arg(long)]
    creation_time: Option<String>,

    /// Write compact XML without indentation
    #[arg(long)]
    no_pretty: bool,

    /// Number of records generated in parallel (default: all cores)
    #[arg(short = 'j', long)]
    jobs: Option<usize>,

    /// Log debug output (RUST_LOG takes precedence)
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let default_filter = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .init();

    match run(&cli) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::from(2),
        Err(e) => {
            log::error!("{}", e);
            ExitCode::FAILURE
        }
    }
}

/// Returns `Ok(false)` when some records of a batch failed.
fn run(cli: &Cli) -> Result<bool, PipelineError> {
    let mut builder = PipelineBuilder::new().with_compact_output(cli.no_pretty);
    if let Some(path) = &cli.mapping {
        log::info!("Loading mapping table from {}", path.display());
        builder = builder.with_mapping_file(path)?;
    }
    if let Some(path) = &cli.schema {
        log::info!("Loading schema from {}", path.display());
        builder = builder.with_schema_file(path)?;
    }
    if let Some(jobs) = cli.jobs {
        builder = builder.with_worker_count(jobs);
    }
    let pipeline = builder.build()?;

    let text = if cli.input.as_os_str() == "-" {
        io::read_to_string(io::stdin())?
    } else {
        fs::read_to_string(&cli.input)?
    };
    let is_batch = text.trim_start().starts_with('[');
    let records = read_records(text.as_bytes())?;

    let creation_time = cli
        .creation_time
        .clone()
        .unwrap_or_else(|| chrono::Utc::now().format("%Y%m%d%H%M%S").to_string());
    let batch = records
        .into_iter()
        .enumerate()
        .map(|(n, record)| {
            let message_id = message_id_for(cli.message_id.as_deref(), is_batch.then_some(n + 1));
            let params = GenerationParams::new()
                .with("message_id", message_id)
                .with("creation_time", creation_time.clone());
            (record, params)
        })
        .collect();

    let results = pipeline.generate_batch(batch);

    if !is_batch {
        let bytes = results
            .into_iter()
            .next()
            .ok_or_else(|| PipelineError::Config("Input holds no record.".to_string()))??;
        match &cli.output {
            Some(path) => {
                fs::write(path, &bytes)?;
                log::info!("Wrote {}", path.display());
            }
            None => io::stdout().write_all(&bytes)?,
        }
        return Ok(true);
    }

    let output = cli.output.as_deref().ok_or_else(|| {
        PipelineError::Config("Array input needs an output path (-o).".to_string())
    })?;
    let mut all_ok = true;
    for (n, result) in results.into_iter().enumerate() {
        let path = numbered_path(output, n + 1);
        match result {
            Ok(bytes) => {
                fs::write(&path, bytes)?;
                log::info!("Wrote {}", path.display());
            }
            Err(e) => {
                all_ok = false;
                log::error!("Record {} failed: {}", n + 1, e);
            }
        }
    }
    Ok(all_ok)
}

/// A fixed id is suffixed with the record number so batch messages stay unique.
fn message_id_for(fixed: Option<&str>, record: Option<usize>) -> String {
    match (fixed, record) {
        (Some(id), Some(n)) => format!("{id}-{n}"),
        (Some(id), None) => id.to_string(),
        (None, _) => uuid::Uuid::new_v4().to_string(),
    }
}

/// `out/case.xml` -> `out/case-3.xml`.
fn numbered_path(output: &Path, n: usize) -> PathBuf {
    let stem = output
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "icsr".to_string());
    let ext = output
        .extension()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "xml".to_string());
    output.with_file_name(format!("{stem}-{n}.{ext}"))
}
