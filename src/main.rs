//! SalaryDash - ML and data science salary dashboard
//!
//! A CLI tool that fetches salary records from the salary API,
//! aggregates them per year and renders the dashboard as Markdown,
//! plain text or JSON.
//!
//! Exit codes:
//!   0 - Success (an unreachable API still renders an empty dashboard)
//!   1 - Runtime error (bad arguments, bad config, drill-down failure, etc.)

mod analysis;
mod chat;
mod cli;
mod client;
mod config;
mod dashboard;
mod models;
mod report;

use anyhow::{bail, Context, Result};
use chrono::Utc;
use cli::{Args, Command, OutputFormat};
use client::SalaryClient;
use config::{Config, DEFAULT_CONFIG_FILE};
use dashboard::Dashboard;
use report::DashboardView;
use std::path::Path;
use tracing::{debug, error, info, warn};
use tracing_subscriber::FmtSubscriber;

#[tokio::main]
async fn main() -> Result<()> {
    // Parse command-line arguments
    let args = Args::parse_args();

    // Validate arguments
    if let Err(e) = args.validate() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }

    // Handle init-config early (no logging needed)
    if args.command() == Command::InitConfig {
        return handle_init_config();
    }

    init_logging(&args);

    info!("SalaryDash v{}", env!("CARGO_PKG_VERSION"));
    debug!("Arguments: {:?}", args);

    if let Err(e) = run(args).await {
        error!("{:#}", e);
        eprintln!("\n❌ Error: {:#}", e);
        std::process::exit(1);
    }

    Ok(())
}

/// Handle init-config: generate a default .salarydash.toml.
fn handle_init_config() -> Result<()> {
    let path = Path::new(DEFAULT_CONFIG_FILE);

    if path.exists() {
        eprintln!(
            "⚠️  {} already exists. Remove it first or edit it manually.",
            DEFAULT_CONFIG_FILE
        );
        std::process::exit(1);
    }

    let content = Config::default_toml();
    std::fs::write(path, &content)
        .with_context(|| format!("Failed to write {}", DEFAULT_CONFIG_FILE))?;

    println!("✅ Created {} with default settings.", DEFAULT_CONFIG_FILE);
    println!("   Edit it to point at your salary API and adjust the display.");
    Ok(())
}

/// Initialize logging based on verbosity settings.
///
/// Logs go to stderr so the rendered dashboard on stdout stays clean.
fn init_logging(args: &Args) {
    let subscriber = FmtSubscriber::builder()
        .with_max_level(args.log_level())
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .compact()
        .finish();

    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("Failed to set tracing subscriber: {}", e);
    }
}

/// Run the requested command and write the dashboard.
async fn run(args: Args) -> Result<()> {
    let mut config = load_config(&args)?;
    config.merge_with_args(&args);

    let client = SalaryClient::new(config.client_config())?;
    info!("Salary API: {}", client.base_url());

    let mut dashboard = Dashboard::new(client, !args.quiet);
    let mut page = 1;

    match args.command() {
        Command::Summary => {
            dashboard.load().await;
        }
        Command::Year { year, page: p } => {
            dashboard.load().await;
            if !dashboard.drill_down(year).await {
                bail!("Could not load job titles for {}", year);
            }
            page = p;
        }
        Command::Years { years } => {
            dashboard.load().await;
            let shown = dashboard
                .drill_down_all(&years, config.api.concurrency)
                .await;
            match shown {
                Some(year) => info!("Showing job titles for {}", year),
                None => bail!("Could not load job titles for {:?}", years),
            }
        }
        Command::Chat { message } => {
            let outcome = dashboard.ask(&message.join(" ")).await;
            debug!("Chat outcome: {:?}", outcome);
            return write_output(&args, &render_chat(&dashboard, config.display.format)?);
        }
        Command::InitConfig => return handle_init_config(),
    }

    let view = DashboardView {
        state: dashboard.state(),
        sort: config.display.sort,
        order: config.display.order,
        page,
        page_size: config.display.page_size,
        generated_at: Utc::now(),
    };

    let output = match config.display.format {
        OutputFormat::Markdown => report::generate_markdown_report(&view),
        OutputFormat::Text => report::generate_text_report(&view),
        OutputFormat::Json => report::generate_json_report(&view)?,
    };

    write_output(&args, &output)
}

/// Render only the chat transcript.
fn render_chat(dashboard: &Dashboard, format: OutputFormat) -> Result<String> {
    let chat = &dashboard.state().chat;

    match format {
        OutputFormat::Json => serde_json::to_string_pretty(chat).map_err(Into::into),
        OutputFormat::Markdown | OutputFormat::Text => Ok(chat
            .iter()
            .map(|m| format!("{}: {}\n", m.sender, m.text))
            .collect()),
    }
}

/// Print to stdout or write to --output.
fn write_output(args: &Args, output: &str) -> Result<()> {
    match args.output {
        Some(ref path) => {
            std::fs::write(path, output)
                .with_context(|| format!("Failed to write dashboard to {}", path.display()))?;
            info!("Dashboard saved to: {}", path.display());
        }
        None => print!("{}", output),
    }
    Ok(())
}

/// Load configuration from file or use defaults.
fn load_config(args: &Args) -> Result<Config> {
    // Try explicit config path
    if let Some(ref config_path) = args.config {
        info!("Loading config from: {}", config_path.display());
        return Config::load(config_path);
    }

    // Try default location
    match Config::load_default() {
        Ok(Some(config)) => {
            info!("Loaded default config from {}", DEFAULT_CONFIG_FILE);
            Ok(config)
        }
        Ok(None) => {
            debug!("No config file found, using defaults");
            Ok(Config::default())
        }
        Err(e) => {
            warn!("Failed to load config: {:#}", e);
            Ok(Config::default())
        }
    }
}
