//! Command-line surface: `docai fields`, `docai status`, `docai extract`.

use crate::config::{self, Config};
use crate::error::WorkflowError;
use crate::export::{write_artifact, ExportFormat};
use crate::extract::{validate_document_file, HttpExtractor};
use crate::fields::{FieldSelection, FIELD_CATALOG};
use crate::progress::BarProgress;
use crate::render::render_results;
use crate::workflow::Workflow;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Debug, Parser)]
#[command(author, version, about = "Extract invoice data from PDFs and images", long_about = None)]
pub struct Cli {
    /// Extraction API base URL (the client posts to <URL>/extract)
    #[arg(long, global = true, env = config::API_URL_VAR)]
    pub api_url: Option<String>,

    /// Request timeout in seconds, 0 to wait indefinitely
    #[arg(long, global = true, env = config::TIMEOUT_VAR)]
    pub timeout: Option<u64>,

    /// Log progress details to stderr
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// List extractable fields
    Fields,
    /// Show whether the extraction API is configured
    Status,
    /// Upload documents, print extracted fields, and export them
    Extract(ExtractArgs),
}

#[derive(Debug, Clone, Args)]
pub struct ExtractArgs {
    /// Documents to process (PDF, JPG, JPEG, PNG; at most 5)
    #[arg(required = true)]
    pub files: Vec<PathBuf>,

    /// Comma-separated field ids (see `docai fields`)
    #[arg(short, long, value_delimiter = ',')]
    pub fields: Vec<String>,

    /// Select every field
    #[arg(long, conflicts_with = "fields")]
    pub all_fields: bool,

    /// Export format; repeat for several
    #[arg(long = "format", value_parser = parse_format)]
    pub formats: Vec<ExportFormat>,

    /// Output base name, defaults to extracted_data_<date>
    #[arg(short, long)]
    pub name: Option<String>,

    /// Directory exports are written to
    #[arg(short, long, env = config::OUTPUT_DIR_VAR)]
    pub out_dir: Option<PathBuf>,

    /// Open each export after writing it
    #[arg(long)]
    pub open: bool,

    /// Hide the progress bar and result cards
    #[arg(short, long)]
    pub quiet: bool,
}

fn parse_format(s: &str) -> Result<ExportFormat, String> {
    s.parse()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitStatus {
    Success,
    Error,
    Selection,
    Extraction,
    Export,
}

impl From<ExitStatus> for ExitCode {
    fn from(status: ExitStatus) -> Self {
        ExitCode::from(match status {
            ExitStatus::Success => 0,
            ExitStatus::Error => 1,
            ExitStatus::Selection => 2,
            ExitStatus::Extraction => 3,
            ExitStatus::Export => 4,
        })
    }
}

pub fn exit_status_for(err: &WorkflowError) -> ExitStatus {
    match err {
        WorkflowError::Selection(_) | WorkflowError::NoFiles | WorkflowError::NoFieldsSelected => {
            ExitStatus::Selection
        }
        WorkflowError::Extraction(_) => ExitStatus::Extraction,
        WorkflowError::Export(_) => ExitStatus::Export,
        _ => ExitStatus::Error,
    }
}

fn load_config(cli: &Cli) -> Result<Config, WorkflowError> {
    let mut config = Config::from_env().map_err(WorkflowError::Config)?;
    if let Some(url) = cli.api_url.as_deref().map(str::trim).filter(|u| !u.is_empty()) {
        config.api_url = url.to_string();
        config.api_url_configured = true;
    }
    if let Some(secs) = cli.timeout {
        config.timeout = config::timeout_from_secs(secs);
    }
    Ok(config)
}

pub fn run_cli(cli: Cli) -> Result<ExitStatus, WorkflowError> {
    match &cli.command {
        Command::Fields => {
            for field in FIELD_CATALOG {
                println!("{:<16} {}", field.id, field.label);
            }
            Ok(ExitStatus::Success)
        }
        Command::Status => {
            let config = load_config(&cli)?;
            println!("{} ({})", config.status(), config.api_url);
            Ok(ExitStatus::Success)
        }
        Command::Extract(args) => {
            let config = load_config(&cli)?;
            run_extract(&config, args)
        }
    }
}

fn run_extract(config: &Config, args: &ExtractArgs) -> Result<ExitStatus, WorkflowError> {
    let selection = if args.all_fields {
        FieldSelection::all()
    } else {
        FieldSelection::from_ids(&args.fields)?
    };

    let extractor = HttpExtractor::from_config(config)
        .map_err(|e| WorkflowError::Config(format!("Could not build HTTP client: {}", e)))?;
    tracing::info!(url = extractor.url(), files = args.files.len(), "starting extraction");

    let mut workflow = Workflow::new(extractor);
    workflow.select_files(args.files.clone())?;
    for path in workflow.files() {
        validate_document_file(path)?;
    }
    workflow.set_selection(selection);

    let mut sink = BarProgress::new(!args.quiet);
    workflow.process(&mut sink)?;

    if !args.quiet {
        println!("{}", render_results(workflow.results(), workflow.selection()));
        println!("Successfully processed {} file(s).", workflow.results().len());
    }

    let out_dir = args.out_dir.clone().unwrap_or_else(|| config.output_dir.clone());
    let today = chrono::Utc::now().date_naive();
    let mut status = ExitStatus::Success;
    for &format in &args.formats {
        let written = workflow
            .export(format, args.name.as_deref(), today)
            .and_then(|artifact| write_artifact(&out_dir, &artifact).map_err(WorkflowError::from));
        match written {
            Ok(path) => {
                println!("File downloaded as {}", path.display());
                if args.open {
                    if let Err(e) = opener::open(&path) {
                        tracing::warn!(path = %path.display(), error = %e, "could not open export");
                    }
                }
            }
            Err(e) => {
                eprintln!("Export failed: {}", e);
                status = ExitStatus::Export;
            }
        }
    }
    Ok(status)
}
