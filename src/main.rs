//! Command-line entry point for subtitle-dl

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;
use subtitle_dl::{Config, ExportSummary, Harvester, export, maintenance, source};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

/// Video count used when neither `--count` nor a config file sets one
const CLI_DEFAULT_COUNT: usize = 15;

#[derive(Debug, Parser)]
#[command(name = "subtitle-dl", version, about = "Batch-download channel subtitles and export them to CSV")]
struct Cli {
    /// TOML configuration file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Channel list, one identifier per line
    #[arg(long, global = true)]
    channels: Option<PathBuf>,

    /// Maximum videos per channel
    #[arg(long, global = true)]
    count: Option<usize>,

    /// CSV export path
    #[arg(long, global = true)]
    output: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Mode>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Subcommand)]
enum Mode {
    /// Remove downloaded subtitles and staged files
    Clear,
    /// Generate the CSV export only
    Csv,
    /// Run the download cycle only
    Download,
}

impl Cli {
    fn load_config(&self) -> subtitle_dl::Result<Config> {
        let mut config = match &self.config {
            Some(path) => Config::from_file(path)?,
            None => {
                let mut config = Config::default();
                config.fetch.video_count = CLI_DEFAULT_COUNT;
                config
            }
        };

        if let Some(channels) = &self.channels {
            config.paths.channels_file = channels.clone();
        }
        if let Some(count) = self.count {
            config.fetch.video_count = count;
        }
        if let Some(output) = &self.output {
            config.paths.export_file = output.clone();
        }

        config.validate()?;
        Ok(config)
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("subtitle_dl=info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

#[tokio::main]
async fn main() -> ExitCode {
    init_tracing();
    let cli = Cli::parse();

    let config = match cli.load_config() {
        Ok(config) => config,
        Err(e) => {
            error!(error = %e, "invalid configuration");
            return ExitCode::FAILURE;
        }
    };

    match cli.command {
        Some(Mode::Clear) => {
            info!("=== Cleaner Mode ===");
            if maintenance::clear_state(&config.paths).await.is_ok() {
                info!("all files and directories cleared successfully");
            }
            ExitCode::SUCCESS
        }
        Some(Mode::Csv) => {
            info!("=== CSV Mode ===");
            let source = source::from_config(&config.fetch);
            report_export(
                export::compile_export(
                    &config.paths.subtitles_dir,
                    &config.paths.export_file,
                    source.as_ref(),
                )
                .await,
            );
            ExitCode::SUCCESS
        }
        Some(Mode::Download) => {
            info!("=== Downloader Mode ===");
            run_cycle(config, false).await
        }
        None => {
            info!("=== Default Mode ===");
            run_cycle(config, true).await
        }
    }
}

/// Download every channel, then optionally export, with one harvester
async fn run_cycle(config: Config, export_after: bool) -> ExitCode {
    let source = source::from_config(&config.fetch);
    let Ok(harvester) = Harvester::new(config, source).await else {
        // already reported by Harvester::new
        return ExitCode::FAILURE;
    };

    run_download(&harvester, export_after).await;

    // close errors are logged inside shutdown
    let _ = harvester.shutdown().await;
    ExitCode::SUCCESS
}

async fn run_download(harvester: &Harvester, export_after: bool) {
    let summary = harvester.download_all().await;
    if !summary.nothing_downloaded {
        info!(
            saved = summary.total_saved(),
            skipped = summary.total_skipped(),
            failed = summary.total_failed(),
            "=== Subtitles downloaded successfully ==="
        );
    }

    if export_after {
        report_export(harvester.export().await);
    }
}

fn report_export(result: subtitle_dl::Result<ExportSummary>) {
    match result {
        Ok(summary) => info!(rows = summary.rows, "=== CSV file generated successfully ==="),
        Err(e) => error!(error = %e, "error generating CSV file"),
    }
}
