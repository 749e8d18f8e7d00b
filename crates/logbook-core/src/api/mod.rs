//! REST backend access
//!
//! The backend owns all persistent data. [`LogbookApi`] is the seam the CLI
//! talks to; [`LogbookClient`] implements it over HTTP.

mod client;

use async_trait::async_trait;
use chrono::NaiveDate;

use crate::error::Result;
use crate::models::{
    history_from_records, CostEntry, FaultRecord, IntervalTable, MaintenanceRecord, ModRecord,
    Reminder, ServiceHistory, Vehicle,
};

pub use client::{LogbookClient, SERVICE_INTERVALS_KEY};

/// Operations the core consumes from the backend
#[async_trait]
pub trait LogbookApi: Send + Sync {
    async fn list_vehicles(&self) -> Result<Vec<Vehicle>>;

    async fn get_vehicle(&self, id: i64) -> Result<Vehicle>;

    /// Maintenance history for a vehicle, any order
    async fn list_maintenance(&self, vehicle_id: i64) -> Result<Vec<MaintenanceRecord>>;

    async fn list_mods(&self, vehicle_id: i64) -> Result<Vec<ModRecord>>;

    async fn list_costs(&self, vehicle_id: i64) -> Result<Vec<CostEntry>>;

    /// Configured intervals, or the default table when none are stored
    async fn get_service_intervals(&self) -> Result<IntervalTable>;

    async fn put_service_intervals(&self, intervals: &IntervalTable) -> Result<()>;

    async fn list_reminders(&self, vehicle_id: i64) -> Result<Vec<Reminder>>;

    /// Create a reminder, returning its id
    async fn create_reminder(&self, reminder: &Reminder) -> Result<i64>;

    async fn update_reminder(&self, id: i64, reminder: &Reminder) -> Result<()>;

    async fn list_faults(&self, vehicle_id: i64) -> Result<Vec<FaultRecord>>;

    /// Persist reviewed fault drafts, returning how many were stored
    async fn import_faults(&self, vehicle_id: i64, faults: &[FaultRecord]) -> Result<usize>;

    /// Mark a stored fault cleared on `date`
    async fn clear_fault(&self, id: i64, date: NaiveDate) -> Result<()>;
}

/// Everything the reminder engine needs for one vehicle
#[derive(Debug, Clone)]
pub struct VehicleInputs {
    pub vehicle: Vehicle,
    pub intervals: IntervalTable,
    pub history: ServiceHistory,
}

impl VehicleInputs {
    pub fn current_mileage(&self) -> i64 {
        self.vehicle.current_mileage()
    }
}

/// Fetch vehicle, intervals and history, fully materialised for the engine
pub async fn load_vehicle_inputs<A: LogbookApi + ?Sized>(api: &A, vehicle_id: i64) -> Result<VehicleInputs> {
    let vehicle = api.get_vehicle(vehicle_id).await?;
    let intervals = api.get_service_intervals().await?;
    let records = api.list_maintenance(vehicle_id).await?;
    let history = history_from_records(&records);

    log::debug!(
        "[api] Loaded vehicle {} ({} records, {} interval rules)",
        vehicle_id,
        records.len(),
        intervals.len()
    );

    Ok(VehicleInputs {
        vehicle,
        intervals,
        history,
    })
}
