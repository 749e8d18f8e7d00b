//! Service commands
//!
//! Reminder status, timeline and interval configuration.

mod intervals;
mod status;
mod timeline;
mod types;

use anyhow::Result;

use crate::commands::Context;

pub use types::{status_label, IntervalsAction, ServiceAction};

pub async fn execute(ctx: &Context, action: ServiceAction) -> Result<()> {
    match action {
        ServiceAction::Status { all } => status::show_status(ctx, all).await,
        ServiceAction::Timeline { width } => timeline::show_timeline(ctx, width).await,
        ServiceAction::Intervals { action } => match action {
            IntervalsAction::Show => intervals::show_intervals(ctx).await,
            IntervalsAction::Set {
                service_type,
                miles,
                months,
            } => intervals::set_interval(ctx, service_type, miles, months).await,
            IntervalsAction::Remove { service_type } => {
                intervals::remove_interval(ctx, service_type).await
            }
            IntervalsAction::Reset => intervals::reset_intervals(ctx).await,
        },
    }
}
