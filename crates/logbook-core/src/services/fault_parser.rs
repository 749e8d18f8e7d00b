//! Diagnostic scan log parser
//!
//! Turns pasted scanner output, one fault per line, into fault drafts:
//!
//! ```text
//! 08 Auto HVAC 00819 High Pressure Sensor
//! ^^ ^^^^^^^^^ ^^^^^ ^^^^^^^^^^^^^^^^^^^^
//! |  component  code  description
//! address
//! ```
//!
//! Extraction is heuristic and never fails: a line without a recognisable
//! code still yields a record with the remainder as component.

use regex::Regex;
use std::sync::LazyLock;

use crate::models::FaultRecord;

/// Fault code token: at least four ASCII letters or digits
/// (`00819`, `P0300`, `P0A80`).
static FAULT_CODE_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9]{4,}$").expect("Invalid fault code regex"));

/// Minimum digits anywhere in a code token
const MIN_CODE_DIGITS: usize = 3;

/// Lone tokens dropped between the code and the description: hyphen,
/// en dash or colon
const DESCRIPTION_SEPARATORS: [&str; 3] = ["-", "–", ":"];

/// True if the token looks like a fault code
pub fn is_fault_code(token: &str) -> bool {
    FAULT_CODE_REGEX.is_match(token)
        && token.chars().filter(char::is_ascii_digit).count() >= MIN_CODE_DIGITS
}

/// Parse a scan log into one draft per non-blank line, in input order
pub fn parse_fault_log(text: &str) -> Vec<FaultRecord> {
    let faults: Vec<FaultRecord> = text
        .lines()
        .filter(|line| !line.trim().is_empty())
        .map(parse_fault_line)
        .collect();
    log::debug!("[fault_parser] Parsed {} fault lines", faults.len());
    faults
}

/// Parse a single non-blank line
pub fn parse_fault_line(line: &str) -> FaultRecord {
    let tokens: Vec<&str> = line.split_whitespace().collect();
    let Some((address, rest)) = tokens.split_first() else {
        return FaultRecord::draft("", "", "", "");
    };

    match rest.iter().position(|token| is_fault_code(token)) {
        Some(code_at) => {
            let mut description = &rest[code_at + 1..];
            if let Some((first, tail)) = description.split_first() {
                if DESCRIPTION_SEPARATORS.contains(first) {
                    description = tail;
                }
            }
            FaultRecord::draft(
                *address,
                rest[..code_at].join(" "),
                rest[code_at],
                description.join(" "),
            )
        }
        None => {
            log::debug!("[fault_parser] No fault code found in line: {}", line.trim());
            FaultRecord::draft(*address, rest.join(" "), "", "")
        }
    }
}
