//! stashbox CLI entry point.

mod args;
mod config;

use std::path::PathBuf;

use clap::Parser;
use stashbox_client::{
    Client, Credentials, RangeUpload, RedirectMode, TransferEvent, UploadOutcome,
    remote_file_name,
};
use stashbox_transfer::SpeedCalculator;
use tokio::sync::mpsc;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use crate::args::{App, Commands, DownloadArgs, UploadArgs};
use crate::config::CliConfig;

#[tokio::main]
async fn main() {
    // Initialize structured logging.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let app = App::parse();

    let config = match CliConfig::load() {
        Ok(c) => c,
        Err(e) => {
            warn!(error = %e, "failed to load config, using defaults");
            CliConfig::default()
        }
    };

    if let Err(e) = run(app, config).await {
        error!(error = %e, "command failed");
        std::process::exit(1);
    }
}

async fn run(app: App, config: CliConfig) -> anyhow::Result<()> {
    let mut client = Client::new(config.base_url.clone())?;

    let username = app.username.clone().unwrap_or_else(|| config.username.clone());
    let password = app.password.clone().unwrap_or_else(|| config.password.clone());
    if !username.is_empty() {
        client = client.with_credentials(Credentials::new(username, password));
    }

    for header in &app.headers {
        let (name, value) = header
            .split_once(':')
            .ok_or_else(|| anyhow::anyhow!("malformed header (expected `Name: value`): {header}"))?;
        client = client.with_header(name, value)?;
    }

    let redirect = if app.follow {
        RedirectMode::Follow
    } else {
        app.redirect.to_mode()
    };

    match app.cmd {
        Commands::Upload(upload_args) => upload(&client, &config, redirect, upload_args).await,
        Commands::Download(download_args) => download(&client, download_args).await,
    }
}

async fn upload(
    client: &Client,
    config: &CliConfig,
    redirect: RedirectMode,
    args: UploadArgs,
) -> anyhow::Result<()> {
    let meta = tokio::fs::metadata(&args.file).await?;
    anyhow::ensure!(meta.is_file(), "not a file: {}", args.file.display());

    let name = args
        .file
        .file_name()
        .and_then(|n| n.to_str())
        .ok_or_else(|| anyhow::anyhow!("unusable file name: {}", args.file.display()))?
        .to_string();
    let size = meta.len();
    let remote_path = args.path.as_deref().unwrap_or("");

    info!(file = %args.file.display(), size, path = remote_path, "uploading");

    let (events_tx, events_rx) = mpsc::channel(64);
    let logger = tokio::spawn(log_events(events_rx));

    let source = tokio::fs::File::open(&args.file).await?;
    let result = RangeUpload::new(client)
        .with_chunk_size(config.chunk_size)
        .with_redirect(redirect)
        .run(source, &name, remote_path, size, args.secured, &events_tx)
        .await;

    drop(events_tx);
    let _ = logger.await;

    let outcome = result?;
    match &outcome {
        UploadOutcome::Completed { body, .. } => match outcome.file_info() {
            Some(file) => {
                println!("{}  {} ({} bytes)", file.id, file.name, file.size);
                if !file.download_url.is_empty() {
                    println!("{}", file.download_url);
                }
            }
            // The body is opaque to the core; show it as-is.
            None => println!("{}", String::from_utf8_lossy(body)),
        },
        UploadOutcome::Redirect { location } => {
            println!("{location}");
        }
    }

    Ok(())
}

async fn download(client: &Client, args: DownloadArgs) -> anyhow::Result<()> {
    let dest = match (args.output, args.remote_name) {
        (Some(path), _) => path,
        (None, true) => PathBuf::from(remote_file_name(&args.target).ok_or_else(|| {
            anyhow::anyhow!("cannot derive a file name from {}", args.target)
        })?),
        (None, false) => anyhow::bail!("specify --output or --remote-name"),
    };

    let (events_tx, events_rx) = mpsc::channel(64);
    let logger = tokio::spawn(log_events(events_rx));

    let result = client.download_to_file(&args.target, &dest, &events_tx).await;

    drop(events_tx);
    let _ = logger.await;

    let written = result?;
    println!("{} ({} bytes)", dest.display(), written);
    Ok(())
}

/// Logs transfer events with a rolling rate estimate.
async fn log_events(mut events_rx: mpsc::Receiver<TransferEvent>) {
    let speed = SpeedCalculator::new(None, None);

    while let Some(event) = events_rx.recv().await {
        match event {
            TransferEvent::Progress {
                bytes_sent,
                total,
                chunk_len,
            } => {
                speed.add_sample(chunk_len);
                let percent = if total > 0 {
                    bytes_sent as f64 / total as f64 * 100.0
                } else {
                    100.0
                };
                info!(
                    bytes_sent,
                    total,
                    rate = %format_rate(speed.bytes_per_second()),
                    "transferred {percent:.1}%"
                );
            }
            TransferEvent::Completed { bytes_sent } => {
                info!(bytes_sent, "transfer complete");
            }
            TransferEvent::Failed { error } => {
                warn!(error = %error, "transfer failed");
            }
        }
    }
}

fn format_rate(bytes_per_second: f64) -> String {
    const UNITS: [&str; 4] = ["B/s", "KiB/s", "MiB/s", "GiB/s"];
    let mut rate = bytes_per_second;
    let mut unit = 0;
    while rate >= 1024.0 && unit < UNITS.len() - 1 {
        rate /= 1024.0;
        unit += 1;
    }
    format!("{rate:.1} {}", UNITS[unit])
}
