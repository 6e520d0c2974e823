//! Kiosk Insight entry point

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, Layer};

use kiosk_insight_cli::{accumulate, build_enricher, process_files};
use kiosk_insight_config::{load_settings_from, Settings};

#[derive(Parser, Debug)]
#[command(name = "kiosk-insight", version, about = "Reconstruct and analyse kiosk interaction logs")]
struct Cli {
    /// Directory holding default.{toml,yaml,json} and per-environment files
    #[arg(long, global = true, default_value = "config", env = "KIOSK_INSIGHT_CONFIG_DIR")]
    config_dir: PathBuf,

    /// Environment overlay, e.g. `production`
    #[arg(long, global = true, env = "KIOSK_INSIGHT_ENV")]
    env: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Turn raw log files into daily JSON documents
    Process {
        /// Log files; the date is read from the `YYYYMMDD[-n]` file stem
        #[arg(required = true)]
        logs: Vec<PathBuf>,

        #[arg(long, default_value = "out")]
        out_dir: PathBuf,

        /// Translate and classify through the configured chat service
        #[arg(long)]
        enrich: bool,
    },
    /// Merge a directory of daily documents into one corpus
    Accumulate {
        dir: PathBuf,

        #[arg(long, default_value = "corpus.json")]
        out: PathBuf,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let settings = match load_settings_from(&cli.config_dir, cli.env.as_deref()) {
        Ok(settings) => settings,
        Err(e) => {
            // Tracing not yet initialized
            eprintln!("Warning: Failed to load config: {}. Using defaults.", e);
            Settings::default()
        }
    };

    init_tracing(&settings);
    tracing::debug!(
        config_dir = %cli.config_dir.display(),
        env = cli.env.as_deref().unwrap_or("default"),
        "Configuration loaded"
    );

    match cli.command {
        Command::Process {
            logs,
            out_dir,
            enrich,
        } => {
            let enricher = build_enricher(&settings.enrichment, enrich);
            let written = process_files(&logs, &out_dir, &settings, &enricher).await?;
            tracing::info!(files = written.len(), out_dir = %out_dir.display(), "Processing complete");
        }
        Command::Accumulate { dir, out } => {
            let corpus = accumulate(&dir, &out, chrono::Utc::now())?;
            tracing::info!(
                days = corpus.meta.total_days,
                conversations = corpus.meta.total_conversations,
                out = %out.display(),
                "Corpus written"
            );
        }
    }

    Ok(())
}

fn init_tracing(settings: &Settings) {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        let level = &settings.observability.log_level;
        format!("kiosk_insight={level},kiosk_insight_cli={level},kiosk_insight_pipeline={level},kiosk_insight_analytics={level},kiosk_insight_llm={level},kiosk_insight_config={level},kiosk_insight_text_processing={level}").into()
    });

    let subscriber = tracing_subscriber::registry().with(env_filter);
    let fmt_layer = if settings.observability.log_json {
        tracing_subscriber::fmt::layer()
            .with_writer(std::io::stderr)
            .json()
            .boxed()
    } else {
        tracing_subscriber::fmt::layer()
            .with_writer(std::io::stderr)
            .boxed()
    };
    subscriber.with(fmt_layer).init();
}
