//! Validation and cleanup for model-extracted tasks.
//!
//! Every raw task passes through here before any enrichment: validity
//! screening, filler-word removal, owner/due-date/priority normalization,
//! and in-batch duplicate suppression. All checks are deterministic.

use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashSet;
use tracing::debug;

use super::text::title_case;
use crate::tasks::RawTask;

const VALID_PRIORITIES: &[&str] = &["High", "Medium", "Low"];

const FILLER_WORDS: &[&str] = &[
    "um", "uh", "like", "so", "basically", "actually", "you know", "kind of", "sort of",
];

/// Task names that carry no actionable content, matched exactly after
/// trimming and lowercasing.
const MEANINGLESS_NAMES: &[&str] = &[
    "todo", "task", "item", "thing", "do something", "work on it", "handle this",
];

/// Common owner-name misspellings seen in dictated notes.
const NAME_CORRECTIONS: &[(&str, &str)] = &[
    ("aarjun", "arjun"),
    ("rhiya", "riya"),
    ("sara", "sarah"),
    ("jhon", "john"),
    ("mic", "mike"),
];

/// Matches names made of nothing but digits, whitespace, and symbols.
static RE_NO_LETTERS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[\d\s\W]+$").expect("no-letters regex"));

/// Jaccard similarity above which two task names count as duplicates.
const DUPLICATE_SIMILARITY: f64 = 0.8;

// ─── Cleanup ──────────────────────────────────────────────────────────────────

/// Drop filler words and collapse whitespace.
///
/// If stripping empties the string the original text is returned instead —
/// a previously non-empty name never becomes empty.
pub fn clean_text(text: &str) -> String {
    if text.is_empty() {
        return String::new();
    }

    let cleaned: Vec<&str> = text
        .split_whitespace()
        .filter(|word| !FILLER_WORDS.contains(&word.to_lowercase().as_str()))
        .collect();

    let result = cleaned.join(" ");
    if result.is_empty() {
        text.to_string()
    } else {
        result
    }
}

/// Capitalize and validate a priority label; anything outside the valid
/// set collapses to "Medium".
pub fn normalize_priority(priority: &str) -> String {
    let p = capitalize(priority.trim());
    if VALID_PRIORITIES.contains(&p.as_str()) {
        p
    } else {
        "Medium".to_string()
    }
}

/// Lowercase, auto-correct misspellings, collapse self-references.
pub fn normalize_owner(owner: &str) -> String {
    let mut owner = owner.trim().to_lowercase();

    if let Some((_, corrected)) = NAME_CORRECTIONS.iter().find(|(wrong, _)| *wrong == owner) {
        debug!(from = %owner, to = %corrected, "auto-corrected owner spelling");
        owner = corrected.to_string();
    }

    if matches!(owner.as_str(), "me" | "myself" | "i" | "") {
        return "Self".to_string();
    }

    title_case(&owner)
}

/// Clean a due-date string.
///
/// The "saturday morning on friday" collision is a dictation artifact the
/// upstream voice flow produces; it resolves to the day the speaker named
/// last.
pub fn normalize_due_date(due_date: &str) -> String {
    let due_date = due_date.trim();

    if due_date.to_lowercase().contains("saturday morning on friday") {
        debug!("auto-corrected conflicting date to 'Friday'");
        return "Friday".to_string();
    }

    if due_date.is_empty() {
        "Needs Review".to_string()
    } else {
        title_case(due_date)
    }
}

/// Apply every cleanup rule to one task.
pub fn validate_task(task: &RawTask) -> RawTask {
    RawTask {
        task_name: clean_text(&task.task_name),
        owner: normalize_owner(&task.owner),
        due_date: normalize_due_date(&task.due_date),
        priority: normalize_priority(&task.priority),
    }
}

// ─── Validity screening ───────────────────────────────────────────────────────

/// Whether a raw task is meaningful enough to keep.
pub fn is_valid_task(task: &RawTask) -> bool {
    let name = task.task_name.trim();

    if name.chars().count() < 5 {
        return false;
    }

    if MEANINGLESS_NAMES.contains(&name.to_lowercase().as_str()) {
        return false;
    }

    // Names with no letters at all (numbers, bullets, stray punctuation).
    if RE_NO_LETTERS.is_match(&task.task_name) {
        return false;
    }

    true
}

// ─── Duplicate detection ──────────────────────────────────────────────────────

/// Word-set Jaccard similarity between two lowercased names.
fn similarity_ratio(s1: &str, s2: &str) -> f64 {
    let w1: HashSet<&str> = s1.split_whitespace().collect();
    let w2: HashSet<&str> = s2.split_whitespace().collect();

    if w1.is_empty() || w2.is_empty() {
        return 0.0;
    }

    let intersection = w1.intersection(&w2).count() as f64;
    let union = w1.union(&w2).count() as f64;
    intersection / union
}

/// Whether `task` duplicates any already-accepted task in this batch.
pub fn is_duplicate(task: &RawTask, accepted: &[RawTask]) -> bool {
    let name = task.task_name.trim().to_lowercase();

    for existing in accepted {
        let existing_name = existing.task_name.trim().to_lowercase();

        if name == existing_name {
            return true;
        }

        if similarity_ratio(&name, &existing_name) > DUPLICATE_SIMILARITY {
            return true;
        }
    }

    false
}

// ─── Batch entry point ────────────────────────────────────────────────────────

/// Validate, clean, and dedupe a batch of extracted tasks.
///
/// Output order equals input order minus rejected and duplicate entries;
/// the first occurrence of a duplicate wins.
pub fn validate_and_filter(tasks: Vec<RawTask>) -> Vec<RawTask> {
    let mut validated: Vec<RawTask> = Vec::with_capacity(tasks.len());

    for task in tasks {
        if !is_valid_task(&task) {
            debug!(name = %task.task_name, "skipping invalid task");
            continue;
        }

        let clean = validate_task(&task);

        if is_duplicate(&clean, &validated) {
            debug!(name = %clean.task_name, "skipping duplicate task");
            continue;
        }

        debug!(name = %clean.task_name, "validated task");
        validated.push(clean);
    }

    validated
}

/// First char uppercased, the rest lowercased.
fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
        None => String::new(),
    }
}

// ─── Tests ────────────────────────────────────────────────────────────────────
