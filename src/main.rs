use anyhow::Context;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing::{error, info};

use ve_session_import::config::Config;
use ve_session_import::export::BatchExporter;
use ve_session_import::logging;
use ve_session_import::pipeline::{Pipeline, SubmissionProcessor};
use ve_session_import::source::{DirectorySource, Submission};

#[derive(Parser)]
#[command(name = "ve_session_import")]
#[command(about = "Convert emailed exam registrations into a Session Manager import file")]
#[command(version = "0.1.0")]
struct Cli {
    /// Configuration file (defaults to $VE_SESSION_IMPORT_CONFIG, then config.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Process every submission in the inbox and export one batch
    Run {
        /// Inbox directory, overriding the configured one
        #[arg(long)]
        inbox: Option<PathBuf>,
        /// Output directory, overriding the configured one
        #[arg(long)]
        output_dir: Option<PathBuf>,
        /// Move exported submissions out of the inbox
        #[arg(long)]
        mark_processed: bool,
    },
    /// Process the given HTML files as one batch without touching them
    Process {
        files: Vec<PathBuf>,
        #[arg(long)]
        output_dir: Option<PathBuf>,
    },
    /// Print the export columns in order
    Schema,
}

fn load_config(path: Option<PathBuf>) -> anyhow::Result<Config> {
    let config = match path {
        Some(path) => Config::load_from(&path),
        None => Config::load(),
    };
    config.context("loading configuration")
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();
    let _guard = logging::init_logging()?;

    let cli = Cli::parse();
    let config = load_config(cli.config)?;

    match cli.command {
        Commands::Run {
            inbox,
            output_dir,
            mark_processed,
        } => {
            let inbox = inbox.unwrap_or_else(|| config.source.inbox.clone());
            let output_dir = output_dir.unwrap_or_else(|| config.export.output_dir.clone());
            let mark = mark_processed || config.source.mark_processed;
            let processed_dir = if inbox == config.source.inbox {
                config.source.processed_dir()
            } else {
                inbox.join("processed")
            };

            println!("🔄 Processing registrations from {}", inbox.display());
            let source = DirectorySource::new(&inbox, processed_dir);
            match Pipeline::run(&config, &source, &output_dir, mark).await {
                Ok(result) => {
                    println!("\n📊 Import Results:");
                    println!("   Submissions: {}", result.total_submissions);
                    println!("   Exported records: {}", result.exported_records);
                    println!("   Skipped rows: {}", result.skipped_rows);
                    println!("   Marked processed: {}", result.marked_processed);
                    if result.mark_failures > 0 {
                        println!("   ⚠️  Failed to mark: {}", result.mark_failures);
                    }
                    println!("   Output file: {}", result.output_file.display());
                }
                Err(e) => {
                    error!("Import failed: {}", e);
                    println!("❌ Import failed: {}", e);
                    return Err(e.into());
                }
            }
        }
        Commands::Process { files, output_dir } => {
            let output_dir = output_dir.unwrap_or_else(|| config.export.output_dir.clone());
            let started = chrono::Local::now();

            let mut submissions = Vec::with_capacity(files.len());
            for file in &files {
                let html = std::fs::read_to_string(file)
                    .with_context(|| format!("reading {}", file.display()))?;
                submissions.push(Submission::new(file.display().to_string(), html));
            }

            let mut processor = SubmissionProcessor::from_config(&config)?;
            let batch = Pipeline::build_batch(&mut processor, &submissions)?;
            let path = BatchExporter::new(processor.schema()).export_to_dir(&batch, &output_dir, started)?;
            info!(records = batch.len(), "Processed files");
            println!("💾 Saved {} records to {}", batch.len(), path.display());
        }
        Commands::Schema => {
            for (idx, column) in config.schema()?.columns().iter().enumerate() {
                println!("{:>3}  {:<24} {}", idx + 1, column.header, column.field);
            }
        }
    }
    Ok(())
}
