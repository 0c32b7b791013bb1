//! Priority scoring — weighted keyword, deadline, and context signals.
//!
//! Additive score over a 0.7 base; each fired signal contributes and is
//! recorded in the reason list. The High label can be reached three
//! independent ways: score threshold, urgency keyword, urgent deadline.

use tracing::debug;

// ─── Signal tables ────────────────────────────────────────────────────────────

const HIGH_PRIORITY_KEYWORDS: &[&str] = &[
    "urgent", "asap", "critical", "blocker", "emergency", "immediately",
    "right now", "top priority", "must", "crucial", "vital",
];

const LOW_PRIORITY_KEYWORDS: &[&str] = &[
    "when you get a chance", "eventually", "someday", "nice to have",
    "future", "later", "optional", "if possible",
];

const CLIENT_KEYWORDS: &[&str] = &["client", "customer", "user", "demo", "presentation"];
const PRODUCT_KEYWORDS: &[&str] = &["launch", "release", "deploy", "production", "go-live"];

const URGENT_DEADLINES: &[&str] = &["today", "asap", "immediately"];
const NEAR_DEADLINES: &[&str] = &["tomorrow", "this week"];

const BASE_SCORE: f64 = 0.7;

/// Result of one priority analysis.
#[derive(Debug, Clone)]
pub struct PriorityAnalysis {
    /// Final label: High | Medium | Low.
    pub priority: String,
    /// Human-readable list of fired signals, or the model's own label when
    /// nothing fired.
    pub reason: String,
    /// Score clamped to 0.5–1.0.
    pub confidence: f64,
}

/// Score a task's priority from its name, due date, and the model-supplied
/// label (used only as the fallback reason).
pub fn analyze_priority(
    task_name: &str,
    due_date: &str,
    _owner: &str,
    original_priority: &str,
) -> PriorityAnalysis {
    let task_lower = task_name.to_lowercase();
    let due_lower = due_date.to_lowercase();

    let mut reasons: Vec<&str> = Vec::new();
    let mut score = BASE_SCORE;

    let has_high_keyword = HIGH_PRIORITY_KEYWORDS.iter().any(|kw| task_lower.contains(kw));
    let has_low_keyword = LOW_PRIORITY_KEYWORDS.iter().any(|kw| task_lower.contains(kw));

    let is_urgent_deadline = URGENT_DEADLINES.iter().any(|dl| due_lower.contains(dl));
    let is_near_deadline = NEAR_DEADLINES.iter().any(|dl| due_lower.contains(dl));

    let has_client_context = CLIENT_KEYWORDS.iter().any(|kw| task_lower.contains(kw));
    let has_product_context = PRODUCT_KEYWORDS.iter().any(|kw| task_lower.contains(kw));

    if has_high_keyword {
        score += 0.2;
        reasons.push("contains urgency keywords");
    }

    if is_urgent_deadline {
        score += 0.3;
        reasons.push("urgent deadline");
    } else if is_near_deadline {
        score += 0.1;
        reasons.push("near-term deadline");
    }

    if has_client_context {
        score += 0.15;
        reasons.push("client-facing");
    }

    if has_product_context {
        score += 0.15;
        reasons.push("product launch related");
    }

    if has_low_keyword {
        score -= 0.3;
        reasons.push("marked as low priority");
    }

    if due_date == "Needs Review" {
        score -= 0.1;
        reasons.push("no clear deadline");
    }

    let priority = if score >= 0.85 || has_high_keyword || is_urgent_deadline {
        "High"
    } else if score <= 0.5 || has_low_keyword {
        "Low"
    } else {
        "Medium"
    };

    let reason = if reasons.is_empty() {
        format!("Based on LLM classification: {original_priority}")
    } else {
        format!("Auto-detected: {}", reasons.join(", "))
    };

    let confidence = score.clamp(0.5, 1.0);

    debug!(
        task = task_name,
        priority,
        confidence = format!("{confidence:.2}").as_str(),
        reason = %reason,
        "priority analyzed"
    );

    PriorityAnalysis {
        priority: priority.to_string(),
        reason,
        confidence,
    }
}

// ─── Tests ────────────────────────────────────────────────────────────────────
