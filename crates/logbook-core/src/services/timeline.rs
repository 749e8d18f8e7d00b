//! Maintenance timeline layout
//!
//! Lays out a Gantt-style view over a twelve-month window centred on the
//! evaluation date. The output is a declarative description (rows of
//! percentage segments); rendering belongs to the caller.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::models::ServiceType;

use super::calendar::{add_months, first_of_month, month_index, sub_months};
use super::reminder::{ReminderReport, ServiceReport, ServiceStatus};

/// Months shown on each side of the evaluation date
pub const WINDOW_HALF_MONTHS: u32 = 6;

/// Share of the last-service-to-due span drawn as completed for services
/// that are upcoming or overdue
const COMPLETED_SHARE_WHEN_DUE: f64 = 0.7;

/// The visible month range
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimelineWindow {
    /// First day of the first visible month
    pub start: NaiveDate,
    pub total_months: u32,
}

impl TimelineWindow {
    /// Window spanning six months before `today` to six months after
    pub fn around(today: NaiveDate) -> Self {
        let start = sub_months(first_of_month(today), WINDOW_HALF_MONTHS)
            .unwrap_or_else(|| first_of_month(today));
        Self {
            start,
            total_months: WINDOW_HALF_MONTHS * 2,
        }
    }

    /// Horizontal position of a date as a percentage of the window width
    pub fn position(&self, date: NaiveDate) -> f64 {
        let offset = (month_index(date) - month_index(self.start)) as f64;
        (offset / self.total_months as f64 * 100.0).clamp(0.0, 100.0)
    }

    /// First day of each visible month, one per column
    pub fn columns(&self) -> Vec<NaiveDate> {
        (0..self.total_months)
            .filter_map(|offset| add_months(self.start, offset))
            .collect()
    }
}

/// Segment meaning, which selects its colour
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SegmentKind {
    /// Time already covered since the last service
    Completed,
    /// Remaining time for an on-track service
    Scheduled,
    Upcoming,
    Overdue,
}

/// A horizontal bar piece, in window percentages
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TimelineSegment {
    pub kind: SegmentKind,
    pub start: f64,
    pub end: f64,
}

impl TimelineSegment {
    pub fn width(&self) -> f64 {
        self.end - self.start
    }
}

/// One service type's row
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimelineRow {
    pub service_type: ServiceType,
    pub label: String,
    pub status: ServiceStatus,
    pub last_service_date: Option<NaiveDate>,
    pub next_due_date: Option<NaiveDate>,
    /// Empty when there is nothing to draw (never recorded, or no date projection)
    pub segments: Vec<TimelineSegment>,
}

/// Complete timeline description
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Timeline {
    pub window: TimelineWindow,
    pub today_position: f64,
    pub rows: Vec<TimelineRow>,
}

/// Lay out the timeline for an evaluated report. Unconfigured types get no row.
pub fn build_timeline(report: &ReminderReport) -> Timeline {
    let window = TimelineWindow::around(report.today);
    let today_position = window.position(report.today);
    let rows = report
        .configured()
        .map(|service| TimelineRow {
            service_type: service.service_type.clone(),
            label: service.service_type.label(),
            status: service.status,
            last_service_date: service.last_service.as_ref().map(|e| e.date),
            next_due_date: service.next_due_date,
            segments: layout_segments(&window, today_position, service),
        })
        .collect();

    Timeline {
        window,
        today_position,
        rows,
    }
}

fn layout_segments(window: &TimelineWindow, today: f64, service: &ServiceReport) -> Vec<TimelineSegment> {
    let (Some(last), Some(due)) = (service.last_service.as_ref(), service.next_due_date) else {
        return Vec::new();
    };

    let start = window.position(last.date);
    let due = window.position(due).max(start);

    let (split, due_kind) = match service.status {
        ServiceStatus::Completed => (today.clamp(start, due), SegmentKind::Scheduled),
        ServiceStatus::Upcoming => (start + (due - start) * COMPLETED_SHARE_WHEN_DUE, SegmentKind::Upcoming),
        ServiceStatus::Overdue => (start + (due - start) * COMPLETED_SHARE_WHEN_DUE, SegmentKind::Overdue),
        ServiceStatus::Unconfigured | ServiceStatus::NeverRecorded => return Vec::new(),
    };

    vec![
        TimelineSegment {
            kind: SegmentKind::Completed,
            start,
            end: split,
        },
        TimelineSegment {
            kind: due_kind,
            start: split,
            end: due,
        },
    ]
}
