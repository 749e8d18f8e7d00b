//! Config commands
//!
//! Commands for managing CLI configuration.

use anyhow::Result;
use clap::Subcommand;
use logbook_core::config::{
    get_config_path, API_TOKEN_ENV, API_URL_ENV, CONFIG_PATH_ENV, VEHICLE_ID_ENV,
};
use logbook_core::AppConfig;
use serde::Serialize;
use tabled::Tabled;

use super::Context;
use crate::output::{print_info, print_json, print_output, print_success, OutputFormat};

#[derive(Subcommand)]
pub enum ConfigAction {
    /// Show current configuration
    Show,

    /// Set a configuration value
    Set {
        /// Configuration key
        key: String,

        /// Configuration value (empty string unsets optional keys)
        value: String,
    },

    /// Get a configuration value
    Get {
        /// Configuration key
        key: String,
    },

    /// Print the config file location
    Path,
}

/// Config row for table display
#[derive(Debug, Serialize, Tabled)]
pub struct ConfigRow {
    #[tabled(rename = "Key")]
    pub key: String,
    #[tabled(rename = "Value")]
    pub value: String,
    #[tabled(rename = "Source")]
    pub source: String,
}

pub async fn execute(ctx: &Context, action: ConfigAction) -> Result<()> {
    match action {
        ConfigAction::Show => show_config(ctx),
        ConfigAction::Set { key, value } => set_config(ctx, key, value),
        ConfigAction::Get { key } => get_config(ctx, key),
        ConfigAction::Path => show_path(ctx),
    }
}

fn show_config(ctx: &Context) -> Result<()> {
    let file_exists = get_config_path().map(|p| p.exists()).unwrap_or(false);
    let rows: Vec<ConfigRow> = ctx
        .config
        .entries()
        .into_iter()
        .map(|(key, value)| ConfigRow {
            key: key.to_string(),
            value,
            source: value_source(key, file_exists).to_string(),
        })
        .collect();
    print_output(&rows, ctx.format)
}

fn get_config(ctx: &Context, key: String) -> Result<()> {
    let key = key.to_lowercase();
    let value = ctx
        .config
        .get(&key)
        .ok_or_else(|| anyhow::anyhow!("Config key not found: {}", key))?;

    match ctx.format {
        OutputFormat::Json => print_json(&serde_json::json!({ "key": key, "value": value })),
        OutputFormat::Table => {
            println!("{}", value);
            Ok(())
        }
    }
}

fn set_config(ctx: &Context, key: String, value: String) -> Result<()> {
    let key = key.to_lowercase();
    let path = get_config_path()?;

    // Edit the file contents only, so env overrides are not persisted.
    // Read without validating so a bad stored value can be repaired.
    let mut config = AppConfig::read_from(&path)?;
    config.set(&key, &value)?;
    config.save_to(&path)?;

    let shown = config.get(&key).unwrap_or_default();
    print_success(&format!("Set {} = {}", key, shown), ctx.quiet);
    if let Some(env) = overriding_env(&key) {
        if std::env::var(env).is_ok() {
            print_info(
                &format!("Note: {} is set and overrides this value", env),
                ctx.quiet,
            );
        }
    }
    Ok(())
}

fn show_path(ctx: &Context) -> Result<()> {
    let path = get_config_path()?;
    match ctx.format {
        OutputFormat::Json => print_json(&serde_json::json!({
            "path": path,
            "exists": path.exists(),
            "from_env": std::env::var(CONFIG_PATH_ENV).is_ok(),
        })),
        OutputFormat::Table => {
            println!("{}", path.display());
            Ok(())
        }
    }
}

fn overriding_env(key: &str) -> Option<&'static str> {
    match key {
        "api_url" => Some(API_URL_ENV),
        "api_token" => Some(API_TOKEN_ENV),
        "vehicle_id" => Some(VEHICLE_ID_ENV),
        _ => None,
    }
}

fn value_source(key: &str, file_exists: bool) -> &'static str {
    match overriding_env(key) {
        Some(env) if std::env::var(env).is_ok() => "env",
        _ if file_exists => "file",
        _ => "default",
    }
}
