//! Services module

pub mod calendar;
pub mod fault_parser;
pub mod reminder;
pub mod summary;
pub mod timeline;

pub use calendar::add_months;
pub use fault_parser::{is_fault_code, parse_fault_line, parse_fault_log};
pub use reminder::{
    Alert, AlertSeverity, DueSoonThresholds, ReminderEngine, ReminderReport, ServiceReport,
    ServiceStatus,
};
pub use summary::{cost_by_category, summarize_vehicle, RecentMaintenance, VehicleSummary};
pub use timeline::{
    build_timeline, SegmentKind, Timeline, TimelineRow, TimelineSegment, TimelineWindow,
};
