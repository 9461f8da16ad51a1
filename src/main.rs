use anyhow::Context;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing::{error, info};

use momo_etl::config::Config;
use momo_etl::logging;
use momo_etl::pipeline::ingestion::JsonFileSource;
use momo_etl::pipeline::output::write_document;
use momo_etl::pipeline::processing::MessageKind;
use momo_etl::{Pipeline, PipelineResult};

#[derive(Parser)]
#[command(name = "momo_etl")]
#[command(about = "Mobile-money SMS export to relational entities transformer")]
#[command(version = "0.1.0")]
struct Cli {
    /// Config file (defaults to ./momo.toml when present)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Transform a message export into the normalized entity document
    Transform {
        /// Message export (JSON), `-` for stdin
        #[arg(long, short)]
        input: PathBuf,
        /// Entity document destination, `-` for stdout
        #[arg(long, short, default_value = "data/processed/formatted_data.json")]
        output: PathBuf,
        /// Write compact JSON instead of pretty-printed
        #[arg(long)]
        compact: bool,
    },
    /// Classify a message export and print counts without writing anything
    Classify {
        /// Message export (JSON), `-` for stdin
        #[arg(long, short)]
        input: PathBuf,
    },
}

fn print_summary(result: &PipelineResult) {
    eprintln!("\n📊 Transform results for {}:", result.source_id);
    eprintln!("   Messages: {}", result.total_messages);
    for kind in MessageKind::ALL {
        eprintln!("   {}: {}", kind, result.classified_count(kind));
    }
    eprintln!("   Skipped: {}", result.skipped_messages);
    eprintln!(
        "   Entities: {} customers, {} agents, {} sender logs, {} receiver logs, {} transactions",
        result.customers,
        result.agents,
        result.sender_logs,
        result.receiver_logs,
        result.transactions
    );
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config = Config::load(cli.config.as_deref()).context("Failed to load configuration")?;
    logging::init_logging(&config.log_dir);

    match cli.command {
        Commands::Transform {
            input,
            output,
            compact,
        } => {
            let source = JsonFileSource::new(&input);
            let (document, result) = Pipeline::run(&source, config.self_party.clone())
                .inspect_err(|e| error!("Transform failed: {}", e))
                .with_context(|| format!("Transform of '{}' aborted", input.display()))?;

            let pretty = config.output.pretty && !compact;
            write_document(&document, &output, pretty)
                .with_context(|| format!("Failed to write '{}'", output.display()))?;

            print_summary(&result);
            info!("Transform complete");
        }
        Commands::Classify { input } => {
            let source = JsonFileSource::new(&input);
            let (_, result) = Pipeline::run(&source, config.self_party.clone())
                .with_context(|| format!("Classification of '{}' aborted", input.display()))?;
            print_summary(&result);
        }
    }
    Ok(())
}
