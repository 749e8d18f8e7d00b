//! Service timeline command
//!
//! ASCII Gantt chart of the timeline layout, one row per tracked service.

use anyhow::Result;
use chrono::NaiveDate;
use colored::Colorize;
use logbook_core::{build_timeline, load_vehicle_inputs, SegmentKind, Timeline, TimelineSegment};

use crate::commands::helpers::truncate;
use crate::commands::Context;
use crate::output::{print_info, print_json, OutputFormat};
use super::types::status_label;

const LABEL_WIDTH: usize = 16;
const MIN_WIDTH: usize = 12;

pub async fn show_timeline(ctx: &Context, width: usize) -> Result<()> {
    let vehicle_id = ctx.require_vehicle()?;
    let inputs = load_vehicle_inputs(ctx.api()?, vehicle_id).await?;
    let report = ctx
        .engine(inputs.current_mileage())
        .evaluate(&inputs.intervals, &inputs.history)?;
    let timeline = build_timeline(&report);

    if ctx.format == OutputFormat::Json {
        return print_json(&timeline);
    }

    if timeline.rows.is_empty() {
        print_info("No service intervals configured.", ctx.quiet);
        return Ok(());
    }

    for line in render_timeline(&timeline, width.max(MIN_WIDTH)) {
        println!("{}", line);
    }
    println!();
    println!(
        "{} completed  {} scheduled  {} due soon  {} overdue  {} today",
        glyph(SegmentKind::Completed),
        glyph(SegmentKind::Scheduled),
        glyph(SegmentKind::Upcoming).to_string().yellow(),
        glyph(SegmentKind::Overdue).to_string().red(),
        '|'
    );
    Ok(())
}

fn glyph(kind: SegmentKind) -> char {
    match kind {
        SegmentKind::Completed => '█',
        SegmentKind::Scheduled => '░',
        SegmentKind::Upcoming => '▒',
        SegmentKind::Overdue => '▓',
    }
}

/// Render header, month axis and one bar per row
pub fn render_timeline(timeline: &Timeline, width: usize) -> Vec<String> {
    let mut lines = Vec::with_capacity(timeline.rows.len() + 2);
    lines.push(format!("{:<LABEL_WIDTH$} {}", "", month_axis(&timeline.window.columns(), width)));

    let today_col = column_of(timeline.today_position, width);
    let mut ruler: String = "─".repeat(width);
    ruler.replace_range(char_range(&ruler, today_col), "┼");
    lines.push(format!("{:<LABEL_WIDTH$} {}", "", ruler));

    for row in &timeline.rows {
        let label = truncate(&row.label, LABEL_WIDTH);
        lines.push(format!(
            "{:<LABEL_WIDTH$} {} {}",
            label,
            render_bar(&row.segments, timeline.today_position, width),
            status_label(row.status)
        ));
    }
    lines
}

/// Bar of `width` cells; each cell takes the segment covering its centre
pub fn render_bar(segments: &[TimelineSegment], today_position: f64, width: usize) -> String {
    let today_col = column_of(today_position, width);
    (0..width)
        .map(|col| {
            let centre = (col as f64 + 0.5) * 100.0 / width as f64;
            let cell = segments
                .iter()
                .find(|s| s.start <= centre && centre < s.end)
                .map(|s| glyph(s.kind));
            match cell {
                Some(c) => c,
                None if col == today_col => '|',
                None => ' ',
            }
        })
        .collect()
}

/// Month abbreviations spread across the bar width
fn month_axis(columns: &[NaiveDate], width: usize) -> String {
    let mut axis = vec![' '; width];
    let step = width as f64 / columns.len().max(1) as f64;
    for (i, month) in columns.iter().enumerate() {
        let name = month.format("%b").to_string();
        let start = (i as f64 * step).round() as usize;
        if step < name.len() as f64 + 1.0 && i % 2 == 1 {
            continue;
        }
        for (offset, c) in name.chars().enumerate() {
            if let Some(cell) = axis.get_mut(start + offset) {
                *cell = c;
            }
        }
    }
    axis.into_iter().collect()
}

fn column_of(position: f64, width: usize) -> usize {
    ((position / 100.0 * width as f64) as usize).min(width.saturating_sub(1))
}

fn char_range(s: &str, index: usize) -> std::ops::Range<usize> {
    let mut chars = s.char_indices().skip(index);
    match chars.next() {
        Some((start, c)) => start..start + c.len_utf8(),
        None => s.len()..s.len(),
    }
}
