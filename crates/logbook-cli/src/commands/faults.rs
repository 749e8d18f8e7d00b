//! Fault code commands
//!
//! Parse scanner output offline, import it for a vehicle, and track the
//! active/cleared lifecycle of stored faults.

use anyhow::Result;
use clap::Subcommand;
use logbook_core::{parse_fault_log, FaultRecord};
use serde::Serialize;
use tabled::Tabled;

use super::helpers::{or_dash, parse_date, read_input, truncate};
use super::Context;
use crate::output::{print_info, print_output, print_success, print_warning};

#[derive(Subcommand)]
pub enum FaultsAction {
    /// Parse a scan log and preview the fault records (no backend needed)
    Parse {
        /// Scan log file, or - for stdin
        input: String,
    },

    /// Parse a scan log and import the faults for the selected vehicle
    Import {
        /// Scan log file, or - for stdin
        input: String,

        /// Show what would be imported without sending anything
        #[arg(long)]
        dry_run: bool,
    },

    /// List stored faults for the selected vehicle
    List {
        /// Include cleared faults
        #[arg(short, long)]
        all: bool,
    },

    /// Mark a stored fault as cleared
    Clear {
        /// Fault ID
        id: i64,

        /// Clear date (YYYY-MM-DD), defaults to today
        #[arg(short, long)]
        date: Option<String>,
    },
}

#[derive(Debug, Serialize, Tabled)]
pub struct FaultRow {
    #[tabled(rename = "Addr")]
    pub address: String,
    #[tabled(rename = "Component")]
    pub component: String,
    #[tabled(rename = "Code")]
    pub fault_code: String,
    #[tabled(rename = "Description")]
    pub description: String,
    #[tabled(rename = "Status")]
    pub status: String,
}

impl From<&FaultRecord> for FaultRow {
    fn from(fault: &FaultRecord) -> Self {
        Self {
            address: fault.address.clone(),
            component: truncate(&fault.component, 24),
            fault_code: fault.fault_code.clone(),
            description: truncate(&fault.description, 40),
            status: fault.status.as_str().to_string(),
        }
    }
}

#[derive(Debug, Serialize, Tabled)]
pub struct StoredFaultRow {
    #[tabled(rename = "ID")]
    pub id: String,
    #[tabled(rename = "Addr")]
    pub address: String,
    #[tabled(rename = "Component")]
    pub component: String,
    #[tabled(rename = "Code")]
    pub fault_code: String,
    #[tabled(rename = "Description")]
    pub description: String,
    #[tabled(rename = "Status")]
    pub status: String,
    #[tabled(rename = "Detected")]
    pub detected_date: String,
    #[tabled(rename = "Cleared")]
    pub cleared_date: String,
}

impl From<&FaultRecord> for StoredFaultRow {
    fn from(fault: &FaultRecord) -> Self {
        let row = FaultRow::from(fault);
        Self {
            id: or_dash(fault.id),
            address: row.address,
            component: row.component,
            fault_code: row.fault_code,
            description: row.description,
            status: row.status,
            detected_date: or_dash(fault.detected_date),
            cleared_date: or_dash(fault.cleared_date),
        }
    }
}

pub async fn execute(ctx: &Context, action: FaultsAction) -> Result<()> {
    match action {
        FaultsAction::Parse { input } => parse_faults(ctx, input),
        FaultsAction::Import { input, dry_run } => import_faults(ctx, input, dry_run).await,
        FaultsAction::List { all } => list_faults(ctx, all).await,
        FaultsAction::Clear { id, date } => clear_fault(ctx, id, date).await,
    }
}

fn parse_faults(ctx: &Context, input: String) -> Result<()> {
    let faults = parse_fault_log(&read_input(&input)?);
    let rows: Vec<FaultRow> = faults.iter().map(FaultRow::from).collect();
    print_output(&rows, ctx.format)?;
    warn_missing_codes(&faults, ctx.quiet);
    Ok(())
}

async fn import_faults(ctx: &Context, input: String, dry_run: bool) -> Result<()> {
    let vehicle_id = ctx.require_vehicle()?;
    let faults = parse_fault_log(&read_input(&input)?);
    if faults.is_empty() {
        print_info("No faults found in input.", ctx.quiet);
        return Ok(());
    }

    if dry_run {
        let rows: Vec<FaultRow> = faults.iter().map(FaultRow::from).collect();
        print_output(&rows, ctx.format)?;
        print_info(
            &format!("Dry run: {} faults would be imported for vehicle {}", faults.len(), vehicle_id),
            ctx.quiet,
        );
        return Ok(());
    }

    let imported = ctx.api()?.import_faults(vehicle_id, &faults).await?;
    print_success(
        &format!("Imported {} faults for vehicle {}", imported, vehicle_id),
        ctx.quiet,
    );
    warn_missing_codes(&faults, ctx.quiet);
    Ok(())
}

async fn list_faults(ctx: &Context, all: bool) -> Result<()> {
    let vehicle_id = ctx.require_vehicle()?;
    let faults = ctx.api()?.list_faults(vehicle_id).await?;
    let rows: Vec<StoredFaultRow> = faults
        .iter()
        .filter(|f| all || f.is_active())
        .map(StoredFaultRow::from)
        .collect();
    print_output(&rows, ctx.format)
}

async fn clear_fault(ctx: &Context, id: i64, date: Option<String>) -> Result<()> {
    let date = match date {
        Some(d) => parse_date(&d)?,
        None => ctx.today,
    };

    // Cleared faults stay cleared
    if let Some(vehicle_id) = ctx.vehicle_id {
        let faults = ctx.api()?.list_faults(vehicle_id).await?;
        if let Some(mut fault) = faults.into_iter().find(|f| f.id == Some(id)) {
            fault.clear(date)?;
        }
    }

    ctx.api()?.clear_fault(id, date).await?;
    print_success(&format!("Cleared fault #{} on {}", id, date), ctx.quiet);
    Ok(())
}

fn warn_missing_codes(faults: &[FaultRecord], quiet: bool) {
    let missing = faults.iter().filter(|f| f.fault_code.is_empty()).count();
    if missing > 0 {
        print_warning(
            &format!("{} of {} lines had no recognizable fault code", missing, faults.len()),
            quiet,
        );
    }
}
