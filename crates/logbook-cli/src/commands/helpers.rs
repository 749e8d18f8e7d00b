//! Shared helpers for CLI commands

use anyhow::{Context as _, Result};
use chrono::{Duration, NaiveDate};
use std::io::Read;

/// Parse a date string into NaiveDate
pub fn parse_date(s: &str) -> Result<NaiveDate> {
    if s == "today" {
        return Ok(chrono::Local::now().date_naive());
    }
    if s == "yesterday" {
        return Ok(chrono::Local::now().date_naive() - Duration::days(1));
    }
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .map_err(|_| anyhow::anyhow!("Invalid date format: {}. Use YYYY-MM-DD", s))
}

/// Truncate string to max characters with ellipsis
pub fn truncate(s: &str, max_chars: usize) -> String {
    let chars: Vec<char> = s.chars().collect();
    if chars.len() <= max_chars {
        s.to_string()
    } else {
        let truncated: String = chars[..max_chars.saturating_sub(3)].iter().collect();
        format!("{}...", truncated)
    }
}

/// Mileage with thousands separators, e.g. `48,250`
pub fn format_miles(miles: i64) -> String {
    let digits = miles.unsigned_abs().to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    if miles < 0 {
        format!("-{}", out)
    } else {
        out
    }
}

/// Display an optional value, `-` when missing
pub fn or_dash<T: ToString>(value: Option<T>) -> String {
    value.map(|v| v.to_string()).unwrap_or_else(|| "-".to_string())
}

/// Money with two decimals
pub fn format_money(amount: f64) -> String {
    format!("${:.2}", amount)
}

/// Read a file path, or stdin when the path is `-`
pub fn read_input(input: &str) -> Result<String> {
    if input == "-" {
        let mut text = String::new();
        std::io::stdin()
            .read_to_string(&mut text)
            .context("Failed to read from stdin")?;
        return Ok(text);
    }

    let path = shellexpand::tilde(input).to_string();
    std::fs::read_to_string(&path).with_context(|| format!("Failed to read {}", path))
}
