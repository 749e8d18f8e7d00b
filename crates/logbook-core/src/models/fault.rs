//! Diagnostic fault records

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Fault lifecycle: active until the user clears it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FaultStatus {
    #[default]
    Active,
    Cleared,
}

impl FaultStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            FaultStatus::Active => "active",
            FaultStatus::Cleared => "cleared",
        }
    }
}

/// One diagnostic trouble code entry
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct FaultRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vehicle_id: Option<i64>,
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub fault_code: String,
    #[serde(default)]
    pub component: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub status: FaultStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub detected_date: Option<NaiveDate>,
    #[serde(default)]
    pub cleared_date: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl FaultRecord {
    /// A freshly parsed, not yet persisted fault
    pub fn draft(
        address: impl Into<String>,
        component: impl Into<String>,
        fault_code: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            address: address.into(),
            component: component.into(),
            fault_code: fault_code.into(),
            description: description.into(),
            ..Default::default()
        }
    }

    pub fn is_active(&self) -> bool {
        self.status == FaultStatus::Active
    }

    /// Transition active -> cleared. A fault is cleared at most once.
    pub fn clear(&mut self, date: NaiveDate) -> Result<()> {
        if self.status == FaultStatus::Cleared {
            return Err(Error::validation(format!(
                "fault {} is already cleared",
                self.fault_code
            )));
        }
        self.status = FaultStatus::Cleared;
        self.cleared_date = Some(date);
        Ok(())
    }
}

/// Body of a bulk fault import
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImportFaultsRequest {
    pub vehicle_id: i64,
    pub faults: Vec<FaultRecord>,
}

/// Backend reply to a bulk fault import
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportFaultsResponse {
    pub imported: usize,
}

/// Partial update that clears a fault
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClearFaultRequest {
    pub status: FaultStatus,
    pub cleared_date: NaiveDate,
}

impl ClearFaultRequest {
    pub fn on(date: NaiveDate) -> Self {
        Self {
            status: FaultStatus::Cleared,
            cleared_date: date,
        }
    }
}
