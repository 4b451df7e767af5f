use anyhow::{Context, Result};
use clap::Parser;
use cli::Cli;
use progress::StderrProgress;
use skyrank_common::observability::{init_logging, LogConfig};
use skyrank_config::{SkyrankConfig, SkyrankConfigLoader};
use skyrank_social::bluesky::BlueskyApi;
use std::io::Write;
use std::process::ExitCode;
use std::time::Duration;

mod cli;
mod progress;
mod render;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(error = %format!("{e:#}"), "skyrank.failed");
            eprintln!("error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<()> {
    let mut loader = SkyrankConfigLoader::new();
    if let Some(path) = &cli.config {
        loader = loader.with_file(path);
    }
    let mut cfg: SkyrankConfig = loader.load().context("loading configuration")?;
    cli.apply(&mut cfg);

    let log_file = init_logging(LogConfig {
        app_name: "skyrank",
        log_dir: cfg.log.dir.clone(),
        file: cfg.log.file,
        emit_stderr: cfg.log.stderr,
        format: cfg.log.format,
        default_filter: cfg.log.filter.clone(),
    })?;
    tracing::info!(actor = %cli.actor, log_file = ?log_file, "skyrank.start");

    let options = cfg.rank_options();
    options.validate()?;

    let api = BlueskyApi::with_base(&cfg.api.base_url)?
        .with_timeout(Duration::from_secs(cfg.api.timeout_secs))
        .with_retries(cfg.api.retries);

    let rankings = skyrank_graph::run(&api, &cli.actor, &options, &StderrProgress).await?;
    tracing::info!(stats = ?rankings.stats, "skyrank.done");

    let mut out = std::io::stdout().lock();
    render::write_rankings(&mut out, &rankings, cfg.output.format)?;
    out.flush()?;
    Ok(())
}
