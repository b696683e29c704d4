use anyhow::Result;
use clap::{Parser, Subcommand};
use indicatif::{ProgressBar, ProgressStyle};
use mh_installer::{App, Config};
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "mh-installer")]
#[command(author, version, about = "Install or remove Mega Hack on Geometry Dash")]
struct Cli {
    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Manifest (update.json) URL override for this invocation
    #[arg(long, global = true)]
    manifest_url: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List Geometry Dash versions in the manifest
    Versions,

    /// List Mega Hack builds for a Geometry Dash version
    Addons {
        /// Geometry Dash version (e.g., 2.206)
        base: String,
    },

    /// Check that a folder is a valid Geometry Dash install
    Check {
        /// Geometry Dash folder
        folder: PathBuf,
        /// Geometry Dash version
        #[arg(long)]
        base: String,
    },

    /// Install Mega Hack
    Install {
        /// Geometry Dash folder
        folder: PathBuf,
        /// Geometry Dash version
        #[arg(long)]
        base: String,
        /// Mega Hack version
        #[arg(long)]
        addon: String,
        /// Distribution variant: geode, default
        #[arg(long, default_value = "geode")]
        variant: String,
    },

    /// Uninstall Mega Hack
    Uninstall {
        /// Geometry Dash folder
        folder: PathBuf,
        /// Geometry Dash version
        #[arg(long)]
        base: String,
        /// Mega Hack version
        #[arg(long)]
        addon: String,
        /// Distribution variant: geode, default
        #[arg(long, default_value = "geode")]
        variant: String,
    },

    /// Show resolved configuration
    Config,
}

fn setup_logging(verbosity: u8, log_file: &std::path::Path) {
    let filter = match verbosity {
        0 => "mh_installer=info",
        1 => "mh_installer=debug",
        2 => "mh_installer=trace",
        _ => "trace",
    };

    let env_filter =
        tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into());
    let file = log_file
        .parent()
        .map(std::fs::create_dir_all)
        .transpose()
        .and_then(|_| {
            std::fs::OpenOptions::new()
                .create(true)
                .append(true)
                .open(log_file)
        });

    match file {
        Ok(file) => {
            let file_layer = tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_ansi(false)
                .with_writer(Arc::new(file));
            tracing_subscriber::registry()
                .with(env_filter)
                .with(file_layer)
                .with(
                    tracing_subscriber::fmt::layer()
                        .with_target(false)
                        .with_writer(std::io::stderr),
                )
                .init();
        }
        Err(e) => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(
                    tracing_subscriber::fmt::layer()
                        .with_target(false)
                        .with_writer(std::io::stderr),
                )
                .init();
            tracing::warn!("Logging to stderr only, cannot open {}: {}", log_file.display(), e);
        }
    }
}

fn download_progress() -> mh_installer::net::ProgressCallback {
    let bar = ProgressBar::new(0);
    bar.set_style(
        ProgressStyle::with_template("{bytes}/{total_bytes} {wide_bar} {bytes_per_sec}")
            .unwrap_or_else(|_| ProgressStyle::default_bar()),
    );
    Arc::new(move |downloaded, total| {
        if total > 0 && bar.length() != Some(total) {
            bar.set_length(total);
        }
        bar.set_position(downloaded);
        if total > 0 && downloaded >= total {
            bar.finish_and_clear();
        }
    })
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Load configuration
    let mut config = Config::load().await?;
    setup_logging(cli.verbose, &config.paths.log_file());
    if let Some(url) = cli.manifest_url.as_deref() {
        config.set_manifest_url(url)?;
    }

    let mut app = App::with_progress(config, Some(download_progress()))?;

    match cli.command {
        Commands::Versions => app.cmd_versions().await?,
        Commands::Addons { base } => app.cmd_addons(&base).await?,
        Commands::Check { folder, base } => app.cmd_check(&folder, &base).await?,
        Commands::Install {
            folder,
            base,
            addon,
            variant,
        } => app.cmd_install(&folder, &base, &addon, &variant).await?,
        Commands::Uninstall {
            folder,
            base,
            addon,
            variant,
        } => app.cmd_uninstall(&folder, &base, &addon, &variant).await?,
        Commands::Config => app.cmd_config()?,
    }

    Ok(())
}
