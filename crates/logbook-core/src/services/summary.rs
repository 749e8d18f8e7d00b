//! Spending and fault summary for a vehicle

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::models::{CostEntry, FaultRecord, MaintenanceRecord, ModRecord};

/// Category used for expenses without one
pub const UNCATEGORIZED: &str = "Uncategorized";

/// Number of recent maintenance records kept in the summary
const RECENT_MAINTENANCE_LIMIT: usize = 5;

/// Brief maintenance entry for the summary
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecentMaintenance {
    pub date: Option<chrono::NaiveDate>,
    pub category: Option<String>,
    pub description: Option<String>,
}

/// Dashboard numbers for one vehicle
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VehicleSummary {
    pub total_spent: f64,
    pub maintenance_cost: f64,
    pub mods_cost: f64,
    pub other_costs: f64,
    pub cost_by_category: BTreeMap<String, f64>,
    pub recent_maintenance: Vec<RecentMaintenance>,
    pub active_faults: usize,
}

/// Sum expense amounts per category
pub fn cost_by_category(costs: &[CostEntry]) -> BTreeMap<String, f64> {
    let mut summary = BTreeMap::new();
    for cost in costs {
        let category = cost
            .category
            .as_deref()
            .filter(|c| !c.trim().is_empty())
            .unwrap_or(UNCATEGORIZED);
        *summary.entry(category.to_string()).or_insert(0.0) += cost.amount.unwrap_or(0.0);
    }
    summary
}

/// Build the summary from already fetched records
pub fn summarize_vehicle(
    maintenance: &[MaintenanceRecord],
    mods: &[ModRecord],
    costs: &[CostEntry],
    faults: &[FaultRecord],
) -> VehicleSummary {
    let maintenance_cost: f64 = maintenance.iter().filter_map(|m| m.cost).sum();
    let mods_cost: f64 = mods.iter().filter_map(|m| m.cost).sum();
    let other_costs: f64 = costs.iter().filter_map(|c| c.amount).sum();

    let mut recent: Vec<&MaintenanceRecord> = maintenance.iter().collect();
    // Newest first; undated records sort last
    recent.sort_by(|a, b| b.date.cmp(&a.date));
    let recent_maintenance = recent
        .into_iter()
        .take(RECENT_MAINTENANCE_LIMIT)
        .map(|m| RecentMaintenance {
            date: m.date,
            category: m.category.clone(),
            description: m.description.clone(),
        })
        .collect();

    VehicleSummary {
        total_spent: maintenance_cost + mods_cost + other_costs,
        maintenance_cost,
        mods_cost,
        other_costs,
        cost_by_category: cost_by_category(costs),
        recent_maintenance,
        active_faults: faults.iter().filter(|f| f.is_active()).count(),
    }
}
