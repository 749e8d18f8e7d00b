//! Service reminder engine
//!
//! Classifies each configured service type as overdue, upcoming or on track
//! from the vehicle's odometer, today's date, the interval rules and the
//! service history. Date and mileage signals are evaluated independently;
//! whichever is more urgent wins.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use crate::error::{Error, Result};
use crate::models::{
    IntervalTable, Reminder, ServiceEvent, ServiceHistory, ServiceIntervalRule, ServiceType,
};

use super::calendar::days_between;

/// Limits under which a not-yet-overdue service counts as due soon
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DueSoonThresholds {
    /// Due date closer than this many days
    pub days: i64,
    /// Due mileage closer than this many miles
    pub miles: i64,
    /// Share of the interval consumed before an upcoming service raises a warning
    pub warning_percent: f64,
}

impl Default for DueSoonThresholds {
    fn default() -> Self {
        Self {
            days: 30,
            miles: 1000,
            warning_percent: 80.0,
        }
    }
}

/// Status of one service type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ServiceStatus {
    /// No rule, or a rule with zero miles and zero months
    Unconfigured,
    /// Configured but no service on record
    NeverRecorded,
    /// On track, not yet due
    Completed,
    /// Due within the due-soon thresholds
    Upcoming,
    Overdue,
}

impl ServiceStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ServiceStatus::Unconfigured => "unconfigured",
            ServiceStatus::NeverRecorded => "never_recorded",
            ServiceStatus::Completed => "completed",
            ServiceStatus::Upcoming => "upcoming",
            ServiceStatus::Overdue => "overdue",
        }
    }

    /// Whether the status carries a due projection
    pub fn has_projection(&self) -> bool {
        matches!(
            self,
            ServiceStatus::Completed | ServiceStatus::Upcoming | ServiceStatus::Overdue
        )
    }
}

/// Evaluation result for one service type
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServiceReport {
    pub service_type: ServiceType,
    pub status: ServiceStatus,
    pub rule: Option<ServiceIntervalRule>,
    pub last_service: Option<ServiceEvent>,
    /// Raw `current - last` mileage, negative when odometer data is inconsistent
    pub miles_since: Option<i64>,
    pub next_due_date: Option<NaiveDate>,
    pub next_due_mileage: Option<i64>,
    /// Share of the interval consumed, 0-100
    pub percent_due: f64,
    /// Overdue because the odometer passed the due mileage
    #[serde(default)]
    pub overdue_by_mileage: bool,
}

impl ServiceReport {
    fn without_projection(
        service_type: ServiceType,
        status: ServiceStatus,
        rule: Option<ServiceIntervalRule>,
    ) -> Self {
        Self {
            service_type,
            status,
            rule,
            last_service: None,
            miles_since: None,
            next_due_date: None,
            next_due_mileage: None,
            percent_due: 0.0,
            overdue_by_mileage: false,
        }
    }
}

/// Alert severity; variants are declared most urgent first
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AlertSeverity {
    Danger,
    Warning,
    Info,
}

impl AlertSeverity {
    pub fn as_str(&self) -> &'static str {
        match self {
            AlertSeverity::Danger => "danger",
            AlertSeverity::Warning => "warning",
            AlertSeverity::Info => "info",
        }
    }
}

/// A textual maintenance alert
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Alert {
    pub severity: AlertSeverity,
    pub service_type: ServiceType,
    pub message: String,
}

/// Full evaluation of a vehicle
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReminderReport {
    pub today: NaiveDate,
    pub current_mileage: i64,
    /// One entry per service type, ordered by type key
    pub services: Vec<ServiceReport>,
    /// Danger before warning before info, then by type key
    pub alerts: Vec<Alert>,
}

impl ReminderReport {
    pub fn get(&self, service_type: &ServiceType) -> Option<&ServiceReport> {
        self.services.iter().find(|s| &s.service_type == service_type)
    }

    /// Services that have an interval rule
    pub fn configured(&self) -> impl Iterator<Item = &ServiceReport> {
        self.services
            .iter()
            .filter(|s| s.status != ServiceStatus::Unconfigured)
    }

    pub fn count(&self, status: ServiceStatus) -> usize {
        self.services.iter().filter(|s| s.status == status).count()
    }
}

/// Pure due-date calculator, bound to an evaluation date and odometer reading
#[derive(Debug, Clone)]
pub struct ReminderEngine {
    today: NaiveDate,
    current_mileage: i64,
    thresholds: DueSoonThresholds,
}

impl ReminderEngine {
    pub fn new(today: NaiveDate, current_mileage: i64) -> Self {
        Self {
            today,
            current_mileage,
            thresholds: DueSoonThresholds::default(),
        }
    }

    pub fn with_thresholds(mut self, thresholds: DueSoonThresholds) -> Self {
        self.thresholds = thresholds;
        self
    }

    pub fn today(&self) -> NaiveDate {
        self.today
    }

    pub fn current_mileage(&self) -> i64 {
        self.current_mileage
    }

    /// Evaluate every service type named by the intervals or the history.
    ///
    /// Out-of-range interval values fail with `InvalidInterval`; missing history
    /// never fails and degrades to `NeverRecorded`.
    pub fn evaluate(&self, intervals: &IntervalTable, history: &ServiceHistory) -> Result<ReminderReport> {
        self.check_mileage()?;
        intervals.validate()?;

        let types: BTreeSet<&ServiceType> = intervals.keys().chain(history.keys()).collect();
        let services: Vec<ServiceReport> = types
            .into_iter()
            .map(|service_type| {
                let events = history.get(service_type).map(Vec::as_slice).unwrap_or(&[]);
                self.evaluate_service(service_type, intervals.get(service_type), events)
            })
            .collect();

        let alerts = self.alerts_for(&services);
        log::debug!(
            "[reminder] Evaluated {} service types at {} miles on {}: {} alerts",
            services.len(),
            self.current_mileage,
            self.today,
            alerts.len()
        );

        Ok(ReminderReport {
            today: self.today,
            current_mileage: self.current_mileage,
            services,
            alerts,
        })
    }

    /// Evaluate a single service type. The rule is assumed validated.
    pub fn evaluate_service(
        &self,
        service_type: &ServiceType,
        rule: Option<&ServiceIntervalRule>,
        events: &[ServiceEvent],
    ) -> ServiceReport {
        let rule = match rule {
            Some(rule) if rule.is_configured() => *rule,
            other => {
                return ServiceReport::without_projection(
                    service_type.clone(),
                    ServiceStatus::Unconfigured,
                    other.copied(),
                )
            }
        };

        let Some(last) = latest_event(events) else {
            return ServiceReport::without_projection(
                service_type.clone(),
                ServiceStatus::NeverRecorded,
                Some(rule),
            );
        };

        let next_due_date = rule.next_due_date(last.date);
        let next_due_mileage = last.mileage.and_then(|mileage| rule.next_due_mileage(mileage));

        self.project(
            service_type.clone(),
            Some(rule),
            Some(last.clone()),
            next_due_date,
            next_due_mileage,
        )
    }

    /// Evaluate a persisted reminder; explicit due values win over interval math
    pub fn evaluate_reminder(&self, reminder: &Reminder) -> Result<ServiceReport> {
        self.check_mileage()?;
        let rule = reminder.rule();
        rule.validate(&reminder.service_type)?;

        let has_override = reminder.next_due_date.is_some() || reminder.next_due_mileage.is_some();
        if !rule.is_configured() && !has_override {
            return Ok(ServiceReport::without_projection(
                reminder.service_type.clone(),
                ServiceStatus::Unconfigured,
                Some(rule),
            ));
        }

        let next_due_date = reminder.effective_next_due_date();
        let next_due_mileage = reminder.effective_next_due_mileage();
        if next_due_date.is_none() && next_due_mileage.is_none() {
            return Ok(ServiceReport::without_projection(
                reminder.service_type.clone(),
                ServiceStatus::NeverRecorded,
                Some(rule),
            ));
        }

        let last = reminder.last_service_date.map(|date| ServiceEvent {
            date,
            mileage: reminder.last_service_mileage,
            description: reminder.notes.clone().unwrap_or_default(),
        });

        let mut report = self.project(
            reminder.service_type.clone(),
            Some(rule),
            last,
            next_due_date,
            next_due_mileage,
        );
        // Mileage known without a dated service still counts toward progress
        if report.miles_since.is_none() {
            report.miles_since = reminder.last_service_mileage.map(|m| self.current_mileage - m);
        }
        Ok(report)
    }

    /// Build alerts for a set of reports, most urgent first
    pub fn alerts_for(&self, services: &[ServiceReport]) -> Vec<Alert> {
        let mut alerts: Vec<Alert> = services.iter().filter_map(|s| self.alert_for(s)).collect();
        alerts.sort_by(|a, b| {
            a.severity
                .cmp(&b.severity)
                .then_with(|| a.service_type.cmp(&b.service_type))
        });
        alerts
    }

    fn alert_for(&self, report: &ServiceReport) -> Option<Alert> {
        let label = report.service_type.label();
        let (severity, message) = match report.status {
            ServiceStatus::Unconfigured | ServiceStatus::Completed => return None,
            ServiceStatus::NeverRecorded => (AlertSeverity::Info, format!("{}: never recorded", label)),
            ServiceStatus::Overdue => {
                let message = match (report.overdue_by_mileage, report.next_due_mileage) {
                    (true, Some(due)) => {
                        format!("{}: overdue by {} miles", label, self.current_mileage - due)
                    }
                    _ => match report.next_due_date {
                        Some(due) => format!("{}: overdue since {}", label, due),
                        None => format!("{}: overdue", label),
                    },
                };
                (AlertSeverity::Danger, message)
            }
            ServiceStatus::Upcoming => {
                if report.percent_due < self.thresholds.warning_percent {
                    return None;
                }
                let message = match (report.next_due_mileage, report.miles_since) {
                    (Some(due), Some(_)) => {
                        format!("{}: due in {} miles", label, due - self.current_mileage)
                    }
                    _ => match report.next_due_date {
                        Some(due) => format!("{}: due by {}", label, due),
                        None => format!("{}: due soon", label),
                    },
                };
                (AlertSeverity::Warning, message)
            }
        };
        Some(Alert {
            severity,
            service_type: report.service_type.clone(),
            message,
        })
    }

    fn project(
        &self,
        service_type: ServiceType,
        rule: Option<ServiceIntervalRule>,
        last: Option<ServiceEvent>,
        next_due_date: Option<NaiveDate>,
        next_due_mileage: Option<i64>,
    ) -> ServiceReport {
        let last_date = last.as_ref().map(|e| e.date);
        let last_mileage = last.as_ref().and_then(|e| e.mileage);

        let date_overdue = next_due_date.is_some_and(|due| self.today > due);
        let mileage_overdue = next_due_mileage.is_some_and(|due| self.current_mileage > due);
        let date_soon =
            next_due_date.is_some_and(|due| days_between(self.today, due) < self.thresholds.days);
        let mileage_soon =
            next_due_mileage.is_some_and(|due| due - self.current_mileage < self.thresholds.miles);

        let status = if date_overdue || mileage_overdue {
            ServiceStatus::Overdue
        } else if date_soon || mileage_soon {
            ServiceStatus::Upcoming
        } else {
            ServiceStatus::Completed
        };

        let percent_due = self.percent_due(last_date, last_mileage, next_due_date, next_due_mileage);

        ServiceReport {
            service_type,
            status,
            rule,
            miles_since: last_mileage.map(|m| self.current_mileage - m),
            last_service: last,
            next_due_date,
            next_due_mileage,
            percent_due,
            overdue_by_mileage: mileage_overdue,
        }
    }

    /// Consumed share of the mileage span, or of the date span when no
    /// mileage span exists
    fn percent_due(
        &self,
        last_date: Option<NaiveDate>,
        last_mileage: Option<i64>,
        next_due_date: Option<NaiveDate>,
        next_due_mileage: Option<i64>,
    ) -> f64 {
        if let (Some(last), Some(due)) = (last_mileage, next_due_mileage) {
            if due > last {
                let used = (self.current_mileage - last).max(0) as f64;
                return clamp_percent(used / (due - last) as f64 * 100.0);
            }
        }
        if let (Some(last), Some(due)) = (last_date, next_due_date) {
            let span = days_between(last, due);
            if span > 0 {
                let elapsed = days_between(last, self.today).max(0) as f64;
                return clamp_percent(elapsed / span as f64 * 100.0);
            }
        }
        0.0
    }

    fn check_mileage(&self) -> Result<()> {
        if self.current_mileage < 0 {
            return Err(Error::validation(format!(
                "current mileage must be non-negative (got {})",
                self.current_mileage
            )));
        }
        Ok(())
    }
}

/// Most recent event by date; ties go to the higher odometer reading
fn latest_event(events: &[ServiceEvent]) -> Option<&ServiceEvent> {
    events
        .iter()
        .max_by(|a, b| a.date.cmp(&b.date).then_with(|| a.mileage.cmp(&b.mileage)))
}

fn clamp_percent(value: f64) -> f64 {
    value.clamp(0.0, 100.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn oil_only() -> IntervalTable {
        [(ServiceType::OilChange, ServiceIntervalRule::new(5000, 6))]
            .into_iter()
            .collect()
    }

    fn history(events: Vec<ServiceEvent>) -> ServiceHistory {
        let mut history = ServiceHistory::new();
        history.insert(ServiceType::OilChange, events);
        history
    }

    #[test]
    fn test_latest_event_ignores_input_order() {
        let events = vec![
            ServiceEvent::new(date(2024, 6, 1), 55000, "second"),
            ServiceEvent::new(date(2023, 12, 1), 50000, "first"),
            ServiceEvent::new(date(2024, 6, 1), 55100, "same day, later"),
        ];
        assert_eq!(latest_event(&events).unwrap().description, "same day, later");
        assert!(latest_event(&[]).is_none());
    }

    #[test]
    fn test_projection_values() {
        let engine = ReminderEngine::new(date(2024, 3, 1), 51000);
        let report = engine
            .evaluate(&oil_only(), &history(vec![ServiceEvent::new(date(2024, 1, 15), 50000, "")]))
            .unwrap();
        let oil = report.get(&ServiceType::OilChange).unwrap();
        assert_eq!(oil.status, ServiceStatus::Completed);
        assert_eq!(oil.miles_since, Some(1000));
        assert_eq!(oil.next_due_date, Some(date(2024, 7, 15)));
        assert_eq!(oil.next_due_mileage, Some(55000));
        assert!((oil.percent_due - 20.0).abs() < 1e-9);
        assert!(report.alerts.is_empty());
    }

    #[test]
    fn test_date_triggered_overdue_alert() {
        let engine = ReminderEngine::new(date(2024, 8, 1), 50500);
        let report = engine
            .evaluate(&oil_only(), &history(vec![ServiceEvent::new(date(2024, 1, 15), 50000, "")]))
            .unwrap();
        let oil = report.get(&ServiceType::OilChange).unwrap();
        assert_eq!(oil.status, ServiceStatus::Overdue);
        assert!(!oil.overdue_by_mileage);
        assert_eq!(report.alerts[0].message, "OIL CHANGE: overdue since 2024-07-15");
    }

    #[test]
    fn test_mileage_triggered_overdue_alert() {
        let engine = ReminderEngine::new(date(2024, 2, 1), 56200);
        let report = engine
            .evaluate(&oil_only(), &history(vec![ServiceEvent::new(date(2024, 1, 15), 50000, "")]))
            .unwrap();
        assert_eq!(report.alerts.len(), 1);
        assert_eq!(report.alerts[0].severity, AlertSeverity::Danger);
        assert_eq!(report.alerts[0].message, "OIL CHANGE: overdue by 1200 miles");
    }

    #[test]
    fn test_negative_miles_since_is_kept_raw() {
        let engine = ReminderEngine::new(date(2024, 2, 1), 49000);
        let report = engine
            .evaluate(&oil_only(), &history(vec![ServiceEvent::new(date(2024, 1, 15), 50000, "")]))
            .unwrap();
        let oil = report.get(&ServiceType::OilChange).unwrap();
        assert_eq!(oil.miles_since, Some(-1000));
        assert_eq!(oil.percent_due, 0.0);
        assert_eq!(oil.status, ServiceStatus::Completed);
    }

    #[test]
    fn test_date_only_rule_uses_elapsed_time() {
        let intervals: IntervalTable = [(ServiceType::Inspection, ServiceIntervalRule::new(0, 12))]
            .into_iter()
            .collect();
        let mut hist = ServiceHistory::new();
        hist.insert(
            ServiceType::Inspection,
            vec![ServiceEvent::new(date(2024, 1, 1), 40000, "")],
        );
        // 2024 is a leap year: 366 days in the interval, 183 elapsed
        let engine = ReminderEngine::new(date(2024, 7, 2), 90000);
        let report = engine.evaluate(&intervals, &hist).unwrap();
        let inspection = report.get(&ServiceType::Inspection).unwrap();
        assert_eq!(inspection.status, ServiceStatus::Completed);
        assert_eq!(inspection.next_due_mileage, None);
        assert!((inspection.percent_due - 50.0).abs() < 1e-9);
    }

    #[test]
    fn test_date_only_upcoming_warning() {
        let intervals: IntervalTable = [(ServiceType::Inspection, ServiceIntervalRule::new(0, 12))]
            .into_iter()
            .collect();
        let mut hist = ServiceHistory::new();
        hist.insert(
            ServiceType::Inspection,
            vec![ServiceEvent::new(date(2024, 1, 1), 40000, "")],
        );
        let engine = ReminderEngine::new(date(2024, 12, 20), 41000);
        let report = engine.evaluate(&intervals, &hist).unwrap();
        assert_eq!(report.services[0].status, ServiceStatus::Upcoming);
        assert_eq!(report.alerts[0].message, "INSPECTION: due by 2025-01-01");
    }

    #[test]
    fn test_unknown_event_mileage_disables_mileage_signal() {
        let engine = ReminderEngine::new(date(2024, 3, 1), 99000);
        let event = ServiceEvent {
            date: date(2024, 1, 15),
            mileage: None,
            description: String::new(),
        };
        let report = engine.evaluate(&oil_only(), &history(vec![event])).unwrap();
        let oil = report.get(&ServiceType::OilChange).unwrap();
        assert_eq!(oil.status, ServiceStatus::Completed);
        assert_eq!(oil.miles_since, None);
        assert_eq!(oil.next_due_mileage, None);
    }

    #[test]
    fn test_history_without_rule_is_unconfigured() {
        let engine = ReminderEngine::new(date(2024, 3, 1), 51000);
        let mut hist = history(vec![]);
        hist.insert(
            ServiceType::Custom("wipers".into()),
            vec![ServiceEvent::new(date(2020, 1, 1), 1000, "")],
        );
        let report = engine.evaluate(&oil_only(), &hist).unwrap();
        let wipers = report.get(&ServiceType::Custom("wipers".into())).unwrap();
        assert_eq!(wipers.status, ServiceStatus::Unconfigured);
        assert_eq!(report.configured().count(), 1);
        assert_eq!(report.count(ServiceStatus::NeverRecorded), 1);
    }

    #[test]
    fn test_negative_current_mileage_is_rejected() {
        let engine = ReminderEngine::new(date(2024, 3, 1), -1);
        let err = engine.evaluate(&oil_only(), &ServiceHistory::new()).unwrap_err();
        assert!(err.is_invalid_input());
    }

    #[test]
    fn test_custom_thresholds() {
        let engine = ReminderEngine::new(date(2024, 3, 1), 52500).with_thresholds(DueSoonThresholds {
            days: 30,
            miles: 3000,
            warning_percent: 50.0,
        });
        let report = engine
            .evaluate(&oil_only(), &history(vec![ServiceEvent::new(date(2024, 1, 15), 50000, "")]))
            .unwrap();
        assert_eq!(report.services[0].status, ServiceStatus::Upcoming);
        assert_eq!(report.alerts[0].message, "OIL CHANGE: due in 2500 miles");
    }

    #[test]
    fn test_reminder_override_wins() {
        let engine = ReminderEngine::new(date(2024, 3, 1), 51000);
        let mut reminder = Reminder::new(ServiceType::OilChange, ServiceIntervalRule::new(5000, 6));
        reminder.last_service_date = Some(date(2024, 1, 15));
        reminder.last_service_mileage = Some(50000);
        assert_eq!(
            engine.evaluate_reminder(&reminder).unwrap().status,
            ServiceStatus::Completed
        );

        reminder.next_due_date = Some(date(2024, 2, 20));
        let report = engine.evaluate_reminder(&reminder).unwrap();
        assert_eq!(report.status, ServiceStatus::Overdue);
        assert_eq!(report.next_due_date, Some(date(2024, 2, 20)));
        assert_eq!(report.next_due_mileage, Some(55000));
    }

    #[test]
    fn test_reminder_without_history() {
        let engine = ReminderEngine::new(date(2024, 3, 1), 51000);
        let reminder = Reminder::new(ServiceType::Coolant, ServiceIntervalRule::new(30000, 24));
        assert_eq!(
            engine.evaluate_reminder(&reminder).unwrap().status,
            ServiceStatus::NeverRecorded
        );

        let unconfigured = Reminder::new(ServiceType::Coolant, ServiceIntervalRule::new(0, 0));
        assert_eq!(
            engine.evaluate_reminder(&unconfigured).unwrap().status,
            ServiceStatus::Unconfigured
        );
    }

    #[test]
    fn test_reminder_negative_interval_rejected() {
        let engine = ReminderEngine::new(date(2024, 3, 1), 51000);
        let reminder = Reminder::new(ServiceType::Brakes, ServiceIntervalRule::new(-100, 6));
        assert!(matches!(
            engine.evaluate_reminder(&reminder),
            Err(Error::InvalidInterval { .. })
        ));
    }
}
