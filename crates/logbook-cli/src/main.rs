//! Logbook CLI - vehicle maintenance reminders and fault codes
//!
//! A command-line interface over the logbook REST backend: service status
//! and timeline, reminders, diagnostic fault import and spending summary.

mod commands;
mod output;

use anyhow::Result;
use clap::{Parser, Subcommand};
use logbook_core::{AppConfig, LogbookApi, LogbookClient};

#[derive(Parser)]
#[command(name = "logbook")]
#[command(author, version, about = "Vehicle maintenance logbook CLI", long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output format: table (default) or json
    #[arg(long, global = true, default_value = "table")]
    format: output::OutputFormat,

    /// Suppress progress messages
    #[arg(long, short, global = true)]
    quiet: bool,

    /// Backend base URL (or set LOGBOOK_API_URL env var)
    #[arg(long, env = "LOGBOOK_API_URL", global = true)]
    api_url: Option<String>,

    /// Vehicle ID (or set LOGBOOK_VEHICLE_ID env var)
    #[arg(long, env = "LOGBOOK_VEHICLE_ID", global = true)]
    vehicle: Option<i64>,

    /// Evaluate as of this date (YYYY-MM-DD) instead of today
    #[arg(long, global = true)]
    today: Option<String>,

    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,
}

#[derive(Subcommand)]
enum Commands {
    /// Service status, timeline and intervals
    Service {
        #[command(subcommand)]
        action: commands::service::ServiceAction,
    },

    /// Manage per-vehicle reminders
    Reminders {
        #[command(subcommand)]
        action: commands::reminders::RemindersAction,
    },

    /// Parse, import and clear diagnostic fault codes
    Faults {
        #[command(subcommand)]
        action: commands::faults::FaultsAction,
    },

    /// Spending and fault summary for a vehicle
    Summary,

    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: commands::config::ConfigAction,
    },
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    if let Err(e) = run(cli).await {
        output::print_error(&format!("Error: {:#}", e));
        std::process::exit(1);
    }
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp(None)
        .init();
}

async fn run(cli: Cli) -> Result<()> {
    // Config file, then env overrides, then flags; validated when the client is built
    let mut config = AppConfig::load()?;
    if let Some(url) = &cli.api_url {
        config.api_url = url.trim_end_matches('/').to_string();
    }

    let today = match &cli.today {
        Some(d) => commands::helpers::parse_date(d)?,
        None => chrono::Local::now().date_naive(),
    };

    let api = LogbookClient::from_config(&config).map(|api| {
        log::debug!("[cli] Using backend {}", api.base_url());
        Box::new(api) as Box<dyn LogbookApi>
    });
    if let Err(e) = &api {
        log::debug!("[cli] Backend client unavailable: {}", e);
    }

    // Create context for commands
    let ctx = commands::Context {
        api,
        vehicle_id: cli.vehicle.or(config.vehicle_id),
        config,
        format: cli.format,
        quiet: cli.quiet,
        today,
    };

    // Execute command
    match cli.command {
        Commands::Service { action } => commands::service::execute(&ctx, action).await,
        Commands::Reminders { action } => commands::reminders::execute(&ctx, action).await,
        Commands::Faults { action } => commands::faults::execute(&ctx, action).await,
        Commands::Summary => commands::summary::execute(&ctx).await,
        Commands::Config { action } => commands::config::execute(&ctx, action).await,
    }
}
