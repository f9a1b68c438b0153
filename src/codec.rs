use std::collections::HashMap;

use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::calendar::dates::{format_date, parse_date};
use crate::calendar::event::{generate_id, Event};
use crate::calendar::event_type::AliasTable;

pub const CSV_HEADERS: [&str; 6] = ["date", "start_date", "end_date", "type", "label", "notes"];

const SEPARATOR: char = ',';
const QUOTE: char = '"';

#[derive(Debug, Error)]
pub enum CsvError {
    #[error("CSV must have at least a header row and one data row")]
    MissingData,
    #[error("CSV must have \"type\" and \"label\" columns")]
    MissingColumns,
}

#[derive(Debug, Clone, PartialEq)]
pub enum SkipReason {
    MissingLabel,
    UnknownType(String),
    MissingDates,
}

impl std::fmt::Display for SkipReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SkipReason::MissingLabel => write!(f, "no label"),
            SkipReason::UnknownType(raw) => write!(f, "unknown type \"{raw}\""),
            SkipReason::MissingDates => write!(f, "no date or date range specified"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SkippedRow {
    pub line: usize,
    pub reason: SkipReason,
}

#[derive(Debug)]
pub struct CsvImport {
    pub events: Vec<Event>,
    pub skipped: Vec<SkippedRow>,
}

pub fn decode_events(
    input: &str,
    aliases: &AliasTable,
    now: DateTime<Utc>,
) -> Result<CsvImport, CsvError> {
    let lines: Vec<&str> = input.trim().split('\n').collect();
    if lines.len() < 2 {
        return Err(CsvError::MissingData);
    }

    // Columns are resolved by name; their order in the source is irrelevant.
    let header_map: HashMap<String, usize> = parse_line(lines[0].trim())
        .into_iter()
        .enumerate()
        .map(|(index, header)| (header.trim().to_lowercase(), index))
        .collect();

    if !header_map.contains_key("type") || !header_map.contains_key("label") {
        return Err(CsvError::MissingColumns);
    }

    let field = |values: &[String], name: &str| -> String {
        header_map
            .get(name)
            .and_then(|&index| values.get(index))
            .map(|value| value.trim().to_string())
            .unwrap_or_default()
    };

    let mut events = Vec::new();
    let mut skipped = Vec::new();

    for (index, raw_line) in lines.iter().enumerate().skip(1) {
        let line = raw_line.trim();
        if line.is_empty() {
            continue;
        }

        let values = parse_line(line);

        let label = field(&values, "label");
        if label.is_empty() {
            skipped.push(SkippedRow {
                line: index,
                reason: SkipReason::MissingLabel,
            });
            continue;
        }

        let raw_type = field(&values, "type");
        let Some(event_type) = aliases.normalize(&raw_type) else {
            tracing::warn!("Skipping row {}: unknown type \"{}\"", index + 1, raw_type);
            skipped.push(SkippedRow {
                line: index,
                reason: SkipReason::UnknownType(raw_type),
            });
            continue;
        };

        let date = parse_date(&field(&values, "date"));
        let start_date = parse_date(&field(&values, "start_date"));
        let end_date = parse_date(&field(&values, "end_date"));

        let (date, start_date, end_date) = if date.is_some() {
            (date, None, None)
        } else if start_date.is_some() && end_date.is_some() {
            (None, start_date, end_date)
        } else {
            tracing::warn!("Skipping row {}: no date or date range specified", index + 1);
            skipped.push(SkippedRow {
                line: index,
                reason: SkipReason::MissingDates,
            });
            continue;
        };

        let notes = field(&values, "notes");

        events.push(Event {
            id: generate_id(),
            date,
            start_date,
            end_date,
            event_type,
            label,
            notes: (!notes.is_empty()).then_some(notes),
            created_at: now,
            updated_at: now,
        });
    }

    Ok(CsvImport { events, skipped })
}

pub fn encode_events(events: &[Event]) -> String {
    let mut lines = Vec::with_capacity(events.len() + 1);
    lines.push(CSV_HEADERS.join(","));

    for event in events {
        let row = [
            event.date.map(format_date).unwrap_or_default(),
            event.start_date.map(format_date).unwrap_or_default(),
            event.end_date.map(format_date).unwrap_or_default(),
            event.event_type.as_str().to_string(),
            escape_field(&event.label),
            escape_field(event.notes.as_deref().unwrap_or_default()),
        ];
        lines.push(row.join(","));
    }

    lines.join("\n")
}

// Quote-aware field split; a doubled quote inside a quoted field is a literal quote.
fn parse_line(line: &str) -> Vec<String> {
    let mut values = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;
    let mut chars = line.chars().peekable();

    while let Some(ch) = chars.next() {
        if in_quotes {
            if ch == QUOTE && chars.peek() == Some(&QUOTE) {
                current.push(QUOTE);
                chars.next();
            } else if ch == QUOTE {
                in_quotes = false;
            } else {
                current.push(ch);
            }
        } else if ch == QUOTE {
            in_quotes = true;
        } else if ch == SEPARATOR {
            values.push(std::mem::take(&mut current));
        } else {
            current.push(ch);
        }
    }

    values.push(current);
    values
}

fn escape_field(value: &str) -> String {
    if value.contains(SEPARATOR) || value.contains(QUOTE) || value.contains('\n') {
        format!("{QUOTE}{}{QUOTE}", value.replace(QUOTE, "\"\""))
    } else {
        value.to_string()
    }
}
