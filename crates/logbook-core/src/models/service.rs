//! Service types, interval rules, service history and reminders

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::hash::{Hash, Hasher};

use crate::error::{Error, Result};
use crate::services::calendar::add_months;

use super::MaintenanceRecord;

/// Category of recurring maintenance, keyed by a short identifier
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ServiceType {
    OilChange,
    Brakes,
    TireRotation,
    Inspection,
    Transmission,
    Coolant,
    SparkPlugs,
    AirFilter,
    FuelFilter,
    /// Any user-defined type, carrying its own key
    Custom(String),
}

impl ServiceType {
    /// All built-in service types, in display order
    pub const BUILT_IN: [ServiceType; 9] = [
        ServiceType::OilChange,
        ServiceType::Brakes,
        ServiceType::TireRotation,
        ServiceType::Inspection,
        ServiceType::Transmission,
        ServiceType::Coolant,
        ServiceType::SparkPlugs,
        ServiceType::AirFilter,
        ServiceType::FuelFilter,
    ];

    pub fn key(&self) -> &str {
        match self {
            ServiceType::OilChange => "oil_change",
            ServiceType::Brakes => "brakes",
            ServiceType::TireRotation => "tire_rotation",
            ServiceType::Inspection => "inspection",
            ServiceType::Transmission => "transmission",
            ServiceType::Coolant => "coolant",
            ServiceType::SparkPlugs => "spark_plugs",
            ServiceType::AirFilter => "air_filter",
            ServiceType::FuelFilter => "fuel_filter",
            ServiceType::Custom(key) => key,
        }
    }

    /// Human label: underscores become spaces, upper-cased
    pub fn label(&self) -> String {
        self.key().replace('_', " ").to_uppercase()
    }

    pub fn is_custom(&self) -> bool {
        matches!(self, ServiceType::Custom(_))
    }
}

impl From<&str> for ServiceType {
    fn from(key: &str) -> Self {
        let normalized = key.trim().to_lowercase();
        ServiceType::BUILT_IN
            .iter()
            .find(|t| t.key() == normalized)
            .cloned()
            .unwrap_or_else(|| ServiceType::Custom(normalized))
    }
}

impl From<String> for ServiceType {
    fn from(key: String) -> Self {
        ServiceType::from(key.as_str())
    }
}

impl From<ServiceType> for String {
    fn from(service_type: ServiceType) -> Self {
        service_type.key().to_string()
    }
}

impl fmt::Display for ServiceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

// Identity is the key, so `Custom("brakes")` and `Brakes` are the same type.
impl PartialEq for ServiceType {
    fn eq(&self, other: &Self) -> bool {
        self.key() == other.key()
    }
}

impl Eq for ServiceType {}

impl Hash for ServiceType {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.key().hash(state);
    }
}

impl PartialOrd for ServiceType {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for ServiceType {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.key().cmp(other.key())
    }
}

/// Largest accepted interval mileage
pub const MAX_INTERVAL_MILES: i64 = 10_000_000;

/// Largest accepted interval in months (100 years)
pub const MAX_INTERVAL_MONTHS: i64 = 1200;

/// Recurrence distance for a service type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ServiceIntervalRule {
    #[serde(default)]
    pub miles: i64,
    #[serde(default)]
    pub months: i64,
}

impl ServiceIntervalRule {
    pub fn new(miles: i64, months: i64) -> Self {
        Self { miles, months }
    }

    /// A rule with both values zero is treated as absent
    pub fn is_configured(&self) -> bool {
        self.miles != 0 || self.months != 0
    }

    /// Reject negative values and values past the accepted maximum
    pub fn validate(&self, service_type: &ServiceType) -> Result<()> {
        if !(0..=MAX_INTERVAL_MILES).contains(&self.miles) {
            return Err(Error::invalid_interval(
                service_type.key(),
                "miles",
                self.miles,
                MAX_INTERVAL_MILES,
            ));
        }
        if !(0..=MAX_INTERVAL_MONTHS).contains(&self.months) {
            return Err(Error::invalid_interval(
                service_type.key(),
                "months",
                self.months,
                MAX_INTERVAL_MONTHS,
            ));
        }
        Ok(())
    }

    /// `last` plus the interval months, clamped to the end of the month.
    ///
    /// `None` when months is unset or the date leaves the calendar range.
    pub fn next_due_date(&self, last: NaiveDate) -> Option<NaiveDate> {
        if self.months <= 0 {
            return None;
        }
        let due = u32::try_from(self.months)
            .ok()
            .and_then(|months| add_months(last, months));
        if due.is_none() {
            log::warn!(
                "[service] {} + {} months is out of range, skipping date projection",
                last,
                self.months
            );
        }
        due
    }

    /// `last` plus the interval miles; `None` when miles is unset or the sum overflows
    pub fn next_due_mileage(&self, last: i64) -> Option<i64> {
        if self.miles <= 0 {
            return None;
        }
        let due = last.checked_add(self.miles);
        if due.is_none() {
            log::warn!(
                "[service] {} + {} miles overflows, skipping mileage projection",
                last,
                self.miles
            );
        }
        due
    }
}

/// Interval rules keyed by service type
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct IntervalTable(BTreeMap<ServiceType, ServiceIntervalRule>);

impl IntervalTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Factory intervals used when the backend has no configuration
    pub fn defaults() -> Self {
        let mut table = Self::new();
        for (service_type, miles, months) in [
            (ServiceType::OilChange, 5000, 6),
            (ServiceType::Brakes, 20000, 24),
            (ServiceType::TireRotation, 7500, 6),
            (ServiceType::Inspection, 15000, 12),
            (ServiceType::Transmission, 30000, 24),
            (ServiceType::Coolant, 30000, 24),
            (ServiceType::SparkPlugs, 30000, 36),
            (ServiceType::AirFilter, 15000, 12),
            (ServiceType::FuelFilter, 30000, 24),
        ] {
            table.insert(service_type, ServiceIntervalRule::new(miles, months));
        }
        table
    }

    pub fn insert(&mut self, service_type: ServiceType, rule: ServiceIntervalRule) {
        self.0.insert(service_type, rule);
    }

    pub fn remove(&mut self, service_type: &ServiceType) -> Option<ServiceIntervalRule> {
        self.0.remove(service_type)
    }

    pub fn get(&self, service_type: &ServiceType) -> Option<&ServiceIntervalRule> {
        self.0.get(service_type)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&ServiceType, &ServiceIntervalRule)> {
        self.0.iter()
    }

    pub fn keys(&self) -> impl Iterator<Item = &ServiceType> {
        self.0.keys()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Validate every rule, failing on the first negative value
    pub fn validate(&self) -> Result<()> {
        self.0
            .iter()
            .try_for_each(|(service_type, rule)| rule.validate(service_type))
    }
}

impl FromIterator<(ServiceType, ServiceIntervalRule)> for IntervalTable {
    fn from_iter<I: IntoIterator<Item = (ServiceType, ServiceIntervalRule)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// One historical occurrence of a service
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceEvent {
    pub date: NaiveDate,
    /// Odometer at time of service; `None` disables mileage projections
    pub mileage: Option<i64>,
    #[serde(default)]
    pub description: String,
}

impl ServiceEvent {
    pub fn new(date: NaiveDate, mileage: i64, description: impl Into<String>) -> Self {
        Self {
            date,
            mileage: Some(mileage),
            description: description.into(),
        }
    }
}

/// Service events grouped by type
pub type ServiceHistory = BTreeMap<ServiceType, Vec<ServiceEvent>>;

/// Group maintenance records into service history.
///
/// Records without a date or category carry no projection data and are skipped.
pub fn history_from_records(records: &[MaintenanceRecord]) -> ServiceHistory {
    let mut history = ServiceHistory::new();
    for record in records {
        let (Some(date), Some(category)) = (record.date, record.category.as_deref()) else {
            continue;
        };
        if category.trim().is_empty() {
            continue;
        }
        history
            .entry(ServiceType::from(category))
            .or_default()
            .push(ServiceEvent {
                date,
                mileage: record.mileage,
                description: record.description.clone().unwrap_or_default(),
            });
    }
    history
}

/// A persisted, user-editable due tracker
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Reminder {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vehicle_id: Option<i64>,
    #[serde(rename = "type")]
    pub service_type: ServiceType,
    #[serde(default)]
    pub interval_miles: Option<i64>,
    #[serde(default)]
    pub interval_months: Option<i64>,
    #[serde(default)]
    pub last_service_date: Option<NaiveDate>,
    #[serde(default)]
    pub last_service_mileage: Option<i64>,
    #[serde(default)]
    pub next_due_date: Option<NaiveDate>,
    #[serde(default)]
    pub next_due_mileage: Option<i64>,
    #[serde(default)]
    pub notes: Option<String>,
}

impl Reminder {
    pub fn new(service_type: ServiceType, rule: ServiceIntervalRule) -> Self {
        Self {
            id: None,
            vehicle_id: None,
            service_type,
            interval_miles: Some(rule.miles),
            interval_months: Some(rule.months),
            last_service_date: None,
            last_service_mileage: None,
            next_due_date: None,
            next_due_mileage: None,
            notes: None,
        }
    }

    /// Interval values as a rule, missing values read as zero
    pub fn rule(&self) -> ServiceIntervalRule {
        ServiceIntervalRule::new(
            self.interval_miles.unwrap_or(0),
            self.interval_months.unwrap_or(0),
        )
    }

    /// Explicit due date, or last service date plus interval months
    pub fn effective_next_due_date(&self) -> Option<NaiveDate> {
        if self.next_due_date.is_some() {
            return self.next_due_date;
        }
        self.rule().next_due_date(self.last_service_date?)
    }

    /// Explicit due mileage, or last service mileage plus interval miles
    pub fn effective_next_due_mileage(&self) -> Option<i64> {
        if self.next_due_mileage.is_some() {
            return self.next_due_mileage;
        }
        self.rule().next_due_mileage(self.last_service_mileage?)
    }

    /// Record a completed service, dropping any explicit due overrides
    pub fn record_service(&mut self, date: NaiveDate, mileage: Option<i64>) {
        self.last_service_date = Some(date);
        self.last_service_mileage = mileage;
        self.next_due_date = None;
        self.next_due_mileage = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_service_type_from_key() {
        assert_eq!(ServiceType::from("oil_change"), ServiceType::OilChange);
        assert_eq!(ServiceType::from("Brakes"), ServiceType::Brakes);
        assert_eq!(
            ServiceType::from("timing_belt"),
            ServiceType::Custom("timing_belt".to_string())
        );
    }

    #[test]
    fn test_custom_key_is_case_insensitive() {
        let custom = ServiceType::from("Timing_Belt");
        assert_eq!(custom, ServiceType::from("timing_belt"));
        assert_eq!(custom.key(), "timing_belt");
        assert_eq!(ServiceType::from("  WIPERS "), ServiceType::Custom("wipers".into()));
    }

    #[test]
    fn test_service_type_label() {
        assert_eq!(ServiceType::TireRotation.label(), "TIRE ROTATION");
        assert_eq!(ServiceType::Custom("timing_belt".into()).label(), "TIMING BELT");
    }

    #[test]
    fn test_service_type_identity_is_key() {
        assert_eq!(ServiceType::Custom("brakes".into()), ServiceType::Brakes);
        assert!(ServiceType::AirFilter < ServiceType::Brakes);
    }

    #[test]
    fn test_service_type_serde_as_key() {
        let json = serde_json::to_string(&ServiceType::SparkPlugs).unwrap();
        assert_eq!(json, "\"spark_plugs\"");
        let parsed: ServiceType = serde_json::from_str("\"coolant\"").unwrap();
        assert_eq!(parsed, ServiceType::Coolant);
    }

    #[test]
    fn test_rule_is_configured() {
        assert!(!ServiceIntervalRule::new(0, 0).is_configured());
        assert!(ServiceIntervalRule::new(0, 12).is_configured());
        assert!(ServiceIntervalRule::new(5000, 0).is_configured());
    }

    #[test]
    fn test_rule_validate_rejects_negative() {
        let err = ServiceIntervalRule::new(-1, 6)
            .validate(&ServiceType::OilChange)
            .unwrap_err();
        assert!(matches!(err, Error::InvalidInterval { field: "miles", value: -1, .. }));

        let err = ServiceIntervalRule::new(1000, -6)
            .validate(&ServiceType::Brakes)
            .unwrap_err();
        assert!(matches!(err, Error::InvalidInterval { field: "months", .. }));
    }

    #[test]
    fn test_rule_validate_rejects_oversized() {
        let err = ServiceIntervalRule::new(i64::MAX, 6)
            .validate(&ServiceType::OilChange)
            .unwrap_err();
        assert!(matches!(err, Error::InvalidInterval { field: "miles", value: i64::MAX, .. }));

        let err = ServiceIntervalRule::new(5000, (1 << 32) + 6)
            .validate(&ServiceType::OilChange)
            .unwrap_err();
        assert!(matches!(err, Error::InvalidInterval { field: "months", .. }));

        assert!(ServiceIntervalRule::new(MAX_INTERVAL_MILES, MAX_INTERVAL_MONTHS)
            .validate(&ServiceType::OilChange)
            .is_ok());
    }

    #[test]
    fn test_rule_next_due_out_of_range() {
        let rule = ServiceIntervalRule::new(5000, 6);
        assert_eq!(rule.next_due_mileage(1000), Some(6000));
        assert_eq!(rule.next_due_mileage(i64::MAX - 10), None);
        assert_eq!(rule.next_due_date(date(2024, 1, 15)), Some(date(2024, 7, 15)));
        assert_eq!(rule.next_due_date(NaiveDate::MAX), None);

        // Unvalidated months past u32 must not wrap around
        let rule = ServiceIntervalRule::new(0, (1 << 32) + 6);
        assert_eq!(rule.next_due_date(date(2024, 1, 15)), None);
        assert_eq!(rule.next_due_mileage(1000), None);
    }

    #[test]
    fn test_interval_table_defaults() {
        let table = IntervalTable::defaults();
        assert_eq!(table.len(), 9);
        assert_eq!(
            table.get(&ServiceType::OilChange),
            Some(&ServiceIntervalRule::new(5000, 6))
        );
        assert!(table.validate().is_ok());
    }

    #[test]
    fn test_interval_table_json_shape() {
        let table: IntervalTable =
            serde_json::from_str(r#"{"oil_change": {"miles": 3000, "months": 3}, "timing_belt": {"miles": 60000}}"#)
                .unwrap();
        assert_eq!(
            table.get(&ServiceType::OilChange),
            Some(&ServiceIntervalRule::new(3000, 3))
        );
        assert_eq!(
            table.get(&ServiceType::Custom("timing_belt".into())),
            Some(&ServiceIntervalRule::new(60000, 0))
        );
    }

    #[test]
    fn test_history_from_records_skips_undated() {
        let records = vec![
            MaintenanceRecord {
                date: Some(date(2024, 1, 15)),
                mileage: Some(50000),
                category: Some("oil_change".into()),
                description: Some("Synthetic".into()),
                ..Default::default()
            },
            MaintenanceRecord {
                date: None,
                category: Some("oil_change".into()),
                ..Default::default()
            },
            MaintenanceRecord {
                date: Some(date(2024, 2, 1)),
                category: None,
                ..Default::default()
            },
        ];
        let history = history_from_records(&records);
        assert_eq!(history.len(), 1);
        let events = &history[&ServiceType::OilChange];
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].description, "Synthetic");
    }

    #[test]
    fn test_reminder_effective_due_derived() {
        let mut reminder = Reminder::new(ServiceType::OilChange, ServiceIntervalRule::new(5000, 6));
        reminder.last_service_date = Some(date(2024, 1, 15));
        reminder.last_service_mileage = Some(50000);
        assert_eq!(reminder.effective_next_due_date(), Some(date(2024, 7, 15)));
        assert_eq!(reminder.effective_next_due_mileage(), Some(55000));
    }

    #[test]
    fn test_reminder_effective_due_overflow_is_none() {
        let mut reminder = Reminder::new(ServiceType::OilChange, ServiceIntervalRule::new(5000, 6));
        reminder.last_service_date = Some(date(2024, 1, 15));
        reminder.last_service_mileage = Some(i64::MAX - 1);
        assert_eq!(reminder.effective_next_due_mileage(), None);
        assert_eq!(reminder.effective_next_due_date(), Some(date(2024, 7, 15)));
    }

    #[test]
    fn test_reminder_override_is_authoritative() {
        let mut reminder = Reminder::new(ServiceType::Brakes, ServiceIntervalRule::new(20000, 24));
        reminder.last_service_date = Some(date(2024, 1, 15));
        reminder.last_service_mileage = Some(50000);
        reminder.next_due_date = Some(date(2024, 3, 1));
        reminder.next_due_mileage = Some(51000);
        assert_eq!(reminder.effective_next_due_date(), Some(date(2024, 3, 1)));
        assert_eq!(reminder.effective_next_due_mileage(), Some(51000));

        reminder.record_service(date(2024, 4, 1), Some(52000));
        assert_eq!(reminder.effective_next_due_date(), Some(date(2026, 4, 1)));
        assert_eq!(reminder.effective_next_due_mileage(), Some(72000));
    }

    #[test]
    fn test_reminder_json_uses_type_field() {
        let reminder: Reminder = serde_json::from_str(
            r#"{"id": 4, "vehicle_id": 1, "type": "oil_change", "interval_miles": 5000,
                "interval_months": 6, "last_service_date": "2024-01-15",
                "last_service_mileage": 50000, "next_due_date": null, "notes": null}"#,
        )
        .unwrap();
        assert_eq!(reminder.service_type, ServiceType::OilChange);
        assert_eq!(reminder.last_service_date, Some(date(2024, 1, 15)));
        assert_eq!(reminder.next_due_mileage, None);
    }
}
