//! Deadline normalization and prediction.
//!
//! Turns free-text due dates ("tomorrow", "next Friday", "Dec 15") into a
//! display string plus a predicted ISO calendar date. Resolution order:
//! relative-phrase table, explicit date parse, weekday name, verbatim
//! fallback. Phrase-table and weekday matching are substring checks over
//! the lowercased text, and table order breaks ties.

use chrono::{DateTime, Datelike, Duration, NaiveDate, NaiveDateTime, Utc};
use tracing::debug;

use super::text::title_case;

/// Outcome of one deadline prediction.
#[derive(Debug, Clone, PartialEq)]
pub struct DeadlinePrediction {
    /// Normalized display string ("Next Friday", "Dec 15, 2026", ...).
    pub display: String,
    /// Predicted ISO calendar date, absent when no date could be derived.
    pub predicted: Option<String>,
    /// True when the prediction is a guess rather than a stated date.
    pub uncertain: bool,
}

impl DeadlinePrediction {
    fn certain(display: String, date: NaiveDate) -> Self {
        Self {
            display,
            predicted: Some(date.format("%Y-%m-%d").to_string()),
            uncertain: false,
        }
    }
}

const WEEKDAYS: &[&str] = &[
    "monday", "tuesday", "wednesday", "thursday", "friday", "saturday", "sunday",
];

/// Accepted reference-timestamp formats, tried after RFC 3339.
const REFERENCE_FORMATS: &[&str] = &["%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M:%S"];

/// Explicit date forms carrying a year.
const DATE_FORMATS: &[&str] = &[
    "%Y-%m-%d",
    "%Y/%m/%d",
    "%m/%d/%Y",
    "%m/%d/%y",
    "%B %d, %Y",
    "%B %d %Y",
    "%b %d, %Y",
    "%b %d %Y",
    "%d %B %Y",
    "%d %b %Y",
];

/// Date forms without a year; the reference year is assumed.
const YEARLESS_FORMATS: &[&str] = &["%B %d", "%b %d", "%d %B", "%d %b", "%m/%d"];

// ─── Reference timestamp ──────────────────────────────────────────────────────

/// Parse the note's reference timestamp permissively.
///
/// Falls back to the current process date when the string is missing or
/// unparsable — a bad client timestamp must not fail the note.
pub fn parse_reference(timestamp: &str) -> NaiveDate {
    let trimmed = timestamp.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(trimmed) {
        return dt.date_naive();
    }
    for fmt in REFERENCE_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(trimmed, fmt) {
            return dt.date();
        }
    }
    if let Ok(d) = NaiveDate::parse_from_str(trimmed, "%Y-%m-%d") {
        return d;
    }

    Utc::now().date_naive()
}

// ─── Prediction ───────────────────────────────────────────────────────────────

/// Predict and normalize a due date relative to `today`.
pub fn predict_deadline(due_date_text: &str, today: NaiveDate) -> DeadlinePrediction {
    if due_date_text.trim().is_empty() {
        return DeadlinePrediction {
            display: "Needs Review".to_string(),
            predicted: None,
            uncertain: true,
        };
    }

    let text = due_date_text.trim();
    let text_lower = text.to_lowercase();

    // Relative phrases, in table order. A hit is always treated as certain.
    if let Some(date) = match_relative_phrase(&text_lower, today) {
        debug!(text, predicted = %date, "deadline phrase match");
        return DeadlinePrediction::certain(title_case(text), date);
    }

    // Explicit dates ("Dec 15", "2026-09-03", "12/15/2026").
    if let Some(date) = parse_loose_date(text, today) {
        debug!(text, predicted = %date, "deadline parsed as explicit date");
        return DeadlinePrediction::certain(date.format("%b %d, %Y").to_string(), date);
    }

    // Bare weekday names resolve to the next occurrence; a same-day hit
    // rolls a full week ahead. Uncertain unless the text says "next".
    for (idx, day) in WEEKDAYS.iter().enumerate() {
        if text_lower.contains(day) {
            let offset = today.weekday().num_days_from_monday() as i64;
            let mut days_ahead = (idx as i64 - offset).rem_euclid(7);
            if days_ahead == 0 {
                days_ahead = 7;
            }
            let date = today + Duration::days(days_ahead);
            let uncertain = !text_lower.contains("next");
            debug!(text, predicted = %date, uncertain, "deadline weekday match");
            return DeadlinePrediction {
                display: date.format("%A, %b %d").to_string(),
                predicted: Some(date.format("%Y-%m-%d").to_string()),
                uncertain,
            };
        }
    }

    debug!(text, "deadline uncertain");
    DeadlinePrediction {
        display: due_date_text.to_string(),
        predicted: None,
        uncertain: true,
    }
}

fn match_relative_phrase(text_lower: &str, today: NaiveDate) -> Option<NaiveDate> {
    let week_offset = 7 - today.weekday().num_days_from_monday() as i64;
    let day_28 = today.with_day(28).expect("every month has a day 28");

    let table: &[(&str, NaiveDate)] = &[
        ("today", today),
        ("asap", today),
        ("immediately", today),
        ("tomorrow", today + Duration::days(1)),
        ("this week", today + Duration::days(week_offset)),
        ("next week", today + Duration::days(week_offset + 7)),
        ("this month", day_28),
        (
            "next month",
            (day_28 + Duration::days(4))
                .with_day(1)
                .expect("first of month")
                + Duration::days(27),
        ),
    ];

    table
        .iter()
        .find(|(phrase, _)| text_lower.contains(phrase))
        .map(|(_, date)| *date)
}

/// Parse explicit date text, with and without a year.
///
/// Deliberately does not accept bare weekday names — those go through the
/// weekday branch with its own uncertainty rule.
fn parse_loose_date(text: &str, today: NaiveDate) -> Option<NaiveDate> {
    let trimmed = text.trim();

    for fmt in DATE_FORMATS {
        if let Ok(d) = NaiveDate::parse_from_str(trimmed, fmt) {
            return Some(d);
        }
    }

    let with_year = format!("{} {}", trimmed, today.format("%Y"));
    for fmt in YEARLESS_FORMATS {
        let fmt_with_year = format!("{} %Y", fmt);
        if let Ok(d) = NaiveDate::parse_from_str(&with_year, &fmt_with_year) {
            return Some(d);
        }
    }

    None
}

// ─── Fallback extraction ──────────────────────────────────────────────────────

/// Pick the first alternative out of a multi-option deadline like
/// "Wednesday or Thursday latest". Not on the main prediction path.
pub fn extract_fallback_deadline(due_date_text: &str) -> String {
    let lower = due_date_text.to_lowercase();
    if lower.contains(" or ") {
        if let Some(first) = lower.split(" or ").next() {
            return title_case(first.trim());
        }
    }
    due_date_text.to_string()
}

// ─── Tests ────────────────────────────────────────────────────────────────────
