use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

use checkrr_dash::api::{BaseUrl, CheckrrClient};
use checkrr_dash::{cli, config, logging, web};

#[derive(Debug, Parser)]
#[command(name = "checkrr-dash")]
#[command(about = "Terminal and web dashboard for a checkrr instance")]
struct App {
    /// checkrr base URL, e.g. http://localhost:8585/ (overrides config)
    #[arg(long, global = true)]
    url: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Show whether a run is in progress, when the next one is and how long the last took
    Status {
        /// Output format: table (default), json, csv
        #[arg(long, default_value = "table")]
        format: String,
    },
    /// Show the latest counters and the historical series
    Stats {
        /// Output format: table (default), json, csv
        #[arg(long, default_value = "table")]
        format: String,
    },
    /// List the bad files checkrr has recorded
    Files {
        /// Output format: table (default), json, csv
        #[arg(long, default_value = "table")]
        format: String,
    },
    /// Ask checkrr to start a run now
    Run,
    /// Remove bad-file records by their grid id (files on disk are untouched)
    Delete {
        /// Row ids as shown by `checkrr-dash files`
        #[arg(required = true)]
        ids: Vec<usize>,
        /// Skip the confirmation prompt
        #[arg(long, short)]
        yes: bool,
    },
    /// Live terminal dashboard
    Watch {
        /// Draw one frame once every view has loaded, then exit
        #[arg(long)]
        once: bool,
    },
    /// Serve the web dashboard
    Serve {
        /// Listen address (overrides config)
        #[arg(long)]
        addr: Option<String>,
        /// Do not try to open a browser
        #[arg(long)]
        no_browser: bool,
    },
    /// Manage checkrr-dash configuration
    Config {
        #[command(subcommand)]
        action: ConfigCommand,
    },
}

#[derive(Debug, Subcommand)]
enum ConfigCommand {
    /// Show the effective configuration
    Show,
    /// Write a default config to ~/.checkrr-dash/config.toml
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
    /// Set a value, e.g. `polling.interval_secs 30`
    Set { key: String, value: String },
    /// Reset the config file to defaults
    Reset,
}

fn main() -> Result<()> {
    let app = App::parse();

    let mut cfg = config::load();
    if let Some(url) = app.url {
        cfg.server.base_url = url;
    }
    logging::init(cfg.logging.level);

    let base_url = cfg.server.base_url.clone();
    let client = move || -> Result<CheckrrClient> {
        let base = BaseUrl::parse(&base_url)
            .with_context(|| format!("invalid checkrr URL '{base_url}'"))?;
        Ok(CheckrrClient::new(base))
    };
    let interval = cfg.polling.interval();

    match app.command {
        Commands::Status { format } => {
            cli::run_status(client()?, cli::OutputFormat::from_str_opt(Some(&format)))
        }
        Commands::Stats { format } => {
            cli::run_stats(client()?, cli::OutputFormat::from_str_opt(Some(&format)))
        }
        Commands::Files { format } => {
            cli::run_files(client()?, cli::OutputFormat::from_str_opt(Some(&format)))
        }
        Commands::Run => cli::run_trigger(client()?),
        Commands::Delete { ids, yes } => cli::run_delete(client()?, &ids, yes),
        Commands::Watch { once } => cli::run_watch(client()?, interval, once),
        Commands::Serve { addr, no_browser } => {
            let addr = addr.unwrap_or(cfg.web.addr);
            web::serve(&addr, client()?, interval, !no_browser)
        }
        Commands::Config { action } => match action {
            ConfigCommand::Show => cli::run_config_show(),
            ConfigCommand::Init { force } => cli::run_config_init(force),
            ConfigCommand::Set { key, value } => cli::run_config_set(&key, &value),
            ConfigCommand::Reset => cli::run_config_reset(),
        },
    }
}
