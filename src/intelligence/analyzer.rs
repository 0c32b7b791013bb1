//! Task analysis — difficulty, category, dependency, risk, and progress
//! classifiers. Pure keyword heuristics, < 1ms, no model calls.
//!
//! Each classifier is an independent function over the cleaned task name
//! (risk also sees the due date and owner). Keyword tables are checked in
//! declaration order; for the first-match classifiers that order is the
//! tie-break.

use tracing::debug;

use super::text::title_case;

// ─── Keyword tables ───────────────────────────────────────────────────────────

const HARD_KEYWORDS: &[&str] = &[
    "integrate", "architecture", "refactor", "migrate", "scale",
    "optimize", "complex", "full module", "system", "infrastructure",
];

const EASY_KEYWORDS: &[&str] = &[
    "update", "fix typo", "change text", "minor", "small", "quick",
    "simple", "basic", "easy",
];

/// Category → keyword list, scored by hit count; earlier entries win ties.
const CATEGORIES: &[(&str, &[&str])] = &[
    ("Development", &["code", "develop", "build", "implement", "api", "backend", "frontend", "bug", "fix"]),
    ("Design", &["design", "ui", "ux", "mockup", "wireframe", "prototype", "interface"]),
    ("Testing", &["test", "qa", "quality", "verify", "validate", "check"]),
    ("Client", &["client", "customer", "demo", "presentation", "meeting", "call"]),
    ("Documentation", &["document", "write", "documentation", "readme", "guide", "wiki"]),
    ("Deployment", &["deploy", "release", "launch", "production", "publish"]),
    ("Personal", &["personal", "learn", "research", "study", "training"]),
];

const DEPENDENCY_PHRASES: &[&str] = &[
    "after", "once", "when", "depends on", "requires", "needs", "then", "following",
];

const HIGH_RISK_KEYWORDS: &[&str] = &[
    "blocked", "dependency", "waiting for", "uncertain", "unclear", "tight deadline", "critical path",
];

const MEDIUM_RISK_KEYWORDS: &[&str] = &["needs approval", "requires review", "pending", "complex"];

/// Progress bucket → keyword list, first matching bucket wins.
const PROGRESS_BUCKETS: &[(&str, &[&str])] = &[
    ("Completed", &["done", "completed", "finished", "shipped"]),
    ("In Progress", &["working on", "in progress", "started", "almost done"]),
    ("Blocked", &["blocked", "stuck", "waiting", "dependency"]),
    ("50%", &["halfway", "50%", "partially", "needs revision"]),
];

/// Word count above which a task is considered hard outright.
const HARD_WORD_COUNT: usize = 15;
/// Word count below which a task is considered easy.
const EASY_WORD_COUNT: usize = 5;
/// Dependency detail is clipped to this many chars.
const DEPENDENCY_INFO_LEN: usize = 50;

// ─── Difficulty ───────────────────────────────────────────────────────────────

/// Estimate difficulty from keywords and structural complexity.
///
/// The hard check wins over the easy check.
pub fn estimate_difficulty(task_name: &str) -> String {
    let task_lower = task_name.to_lowercase();

    let word_count = task_name.split_whitespace().count();
    let has_multiple_steps = task_lower.contains(" and ") || task_name.contains(',');

    let is_hard = HARD_KEYWORDS.iter().any(|kw| task_lower.contains(kw));
    let is_easy = EASY_KEYWORDS.iter().any(|kw| task_lower.contains(kw));

    let difficulty = if is_hard || word_count > HARD_WORD_COUNT || has_multiple_steps {
        "Hard"
    } else if is_easy || word_count < EASY_WORD_COUNT {
        "Easy"
    } else {
        "Medium"
    };

    debug!(task = task_name, difficulty, "estimated difficulty");
    difficulty.to_string()
}

// ─── Category ─────────────────────────────────────────────────────────────────

/// Classify the task into the category with the most keyword hits.
/// Zero hits falls through to "General".
pub fn classify_category(task_name: &str) -> String {
    let task_lower = task_name.to_lowercase();

    let mut best: Option<(&str, usize)> = None;
    for (category, keywords) in CATEGORIES {
        let score = keywords.iter().filter(|kw| task_lower.contains(*kw)).count();
        if score > 0 && best.map_or(true, |(_, s)| score > s) {
            best = Some((*category, score));
        }
    }

    match best {
        Some((category, _)) => {
            debug!(task = task_name, category, "classified category");
            category.to_string()
        }
        None => "General".to_string(),
    }
}

// ─── Dependency detection ─────────────────────────────────────────────────────

/// Flag dependency phrasing and pull out what the task depends on.
///
/// Detection is purely local to this task's text; the extract is the
/// segment following the first occurrence of the first matching phrase.
pub fn detect_dependency(task_name: &str) -> (bool, Option<String>) {
    let task_lower = task_name.to_lowercase();

    if !DEPENDENCY_PHRASES.iter().any(|p| task_lower.contains(p)) {
        return (false, None);
    }

    for phrase in DEPENDENCY_PHRASES {
        if task_lower.contains(phrase) {
            if let Some(rest) = task_lower.split(phrase).nth(1) {
                let detail: String = rest.trim().chars().take(DEPENDENCY_INFO_LEN).collect();
                let info = format!("Depends on: {detail}");
                debug!(task = task_name, info = %info, "dependency detected");
                return (true, Some(info));
            }
        }
    }

    (true, Some("Has dependencies (details unclear)".to_string()))
}

// ─── Risk ─────────────────────────────────────────────────────────────────────

/// Assess risk from the task name and due date, with two special cases
/// for unclear deadlines and unclear ownership.
pub fn assess_risk(task_name: &str, due_date: &str, owner: &str) -> (String, Option<String>) {
    let combined = format!("{task_name} {due_date}").to_lowercase();

    for keyword in HIGH_RISK_KEYWORDS {
        if combined.contains(keyword) {
            let desc = format!("Risk: {}", title_case(keyword));
            debug!(task = task_name, desc = %desc, "high risk");
            return ("High".to_string(), Some(desc));
        }
    }

    for keyword in MEDIUM_RISK_KEYWORDS {
        if combined.contains(keyword) {
            let desc = format!("Risk: {}", title_case(keyword));
            debug!(task = task_name, desc = %desc, "medium risk");
            return ("Medium".to_string(), Some(desc));
        }
    }

    if due_date == "Needs Review" || combined.contains("uncertain") {
        return ("Medium".to_string(), Some("Risk: Unclear deadline".to_string()));
    }

    if owner == "Self" && combined.contains("team") {
        return ("Medium".to_string(), Some("Risk: Unclear ownership".to_string()));
    }

    ("Low".to_string(), None)
}

// ─── Progress ─────────────────────────────────────────────────────────────────

/// Estimate progress from completion phrasing in the task text.
pub fn estimate_progress(task_name: &str) -> String {
    let task_lower = task_name.to_lowercase();

    for (progress, keywords) in PROGRESS_BUCKETS {
        if keywords.iter().any(|kw| task_lower.contains(kw)) {
            debug!(task = task_name, progress, "estimated progress");
            return progress.to_string();
        }
    }

    "Not Started".to_string()
}

// ─── Tests ────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hard_keyword_wins() {
        assert_eq!(estimate_difficulty("Refactor the session layer"), "Hard");
    }

    #[test]
    fn hard_beats_easy_when_both_present() {
        assert_eq!(estimate_difficulty("Quick refactor of the parser"), "Hard");
    }

    #[test]
    fn long_tasks_are_hard() {
        let name = "one two three four five six seven eight nine ten eleven twelve thirteen fourteen fifteen sixteen";
        assert_eq!(estimate_difficulty(name), "Hard");
    }

    #[test]
    fn multi_step_tasks_are_hard() {
        assert_eq!(estimate_difficulty("Review the draft and publish it"), "Hard");
        assert_eq!(estimate_difficulty("Review draft, publish, announce"), "Hard");
    }

    #[test]
    fn short_tasks_are_easy() {
        assert_eq!(estimate_difficulty("Email the vendor"), "Easy");
    }

    #[test]
    fn easy_keyword_is_easy() {
        assert_eq!(estimate_difficulty("Make a small wording change here"), "Easy");
    }

    #[test]
    fn middling_tasks_are_medium() {
        assert_eq!(estimate_difficulty("Review the onboarding survey responses"), "Medium");
    }

    #[test]
    fn deployment_category_detected() {
        assert_eq!(classify_category("Deploy to production"), "Deployment");
    }

    #[test]
    fn highest_scoring_category_wins() {
        // Two Development hits ("build", "api") vs one Testing hit ("test").
        assert_eq!(classify_category("build the api test harness"), "Development");
    }

    #[test]
    fn ties_resolve_to_earlier_table_entry() {
        // "design" (Design) and "call" (Client) score one each.
        assert_eq!(classify_category("design review call"), "Design");
    }

    #[test]
    fn no_keywords_is_general() {
        assert_eq!(classify_category("Organize the offsite"), "General");
    }

    #[test]
    fn dependency_phrase_flags_task() {
        let (has, info) = detect_dependency("Start the rollout after the security signoff");
        assert!(has);
        assert_eq!(info.as_deref(), Some("Depends on: the security signoff"));
    }

    #[test]
    fn dependency_extract_is_clipped() {
        let tail = "x".repeat(80);
        let (has, info) = detect_dependency(&format!("Begin once {tail}"));
        assert!(has);
        let info = info.unwrap();
        assert_eq!(info, format!("Depends on: {}", "x".repeat(50)));
    }

    #[test]
    fn first_phrase_in_table_order_wins() {
        // Contains both "after" and "needs"; "after" sits earlier.
        let (_, info) = detect_dependency("Ship after QA needs to approve");
        assert!(info.unwrap().starts_with("Depends on: qa needs to approve"));
    }

    #[test]
    fn no_dependency_phrase_no_flag() {
        let (has, info) = detect_dependency("Write the launch announcement");
        assert!(!has);
        assert!(info.is_none());
    }

    #[test]
    fn high_risk_keyword_first_match_wins() {
        let (level, desc) = assess_risk("blocked on vendor response", "Friday", "Self");
        assert_eq!(level, "High");
        assert_eq!(desc.as_deref(), Some("Risk: Blocked"));
    }

    #[test]
    fn risk_sees_the_due_date_text() {
        let (level, _) = assess_risk("Prepare the budget", "tight deadline friday", "Self");
        assert_eq!(level, "High");
    }

    #[test]
    fn medium_risk_keywords() {
        let (level, desc) = assess_risk("Waiting room redesign needs approval", "Friday", "Self");
        // "waiting for" does not match, but "needs approval" does.
        assert_eq!(level, "Medium");
        assert_eq!(desc.as_deref(), Some("Risk: Needs Approval"));
    }

    #[test]
    fn needs_review_deadline_is_never_low_risk() {
        let (level, desc) = assess_risk("Summarize the retro", "Needs Review", "Sarah Johnson");
        assert_eq!(level, "Medium");
        assert_eq!(desc.as_deref(), Some("Risk: Unclear deadline"));
    }

    #[test]
    fn self_owner_with_team_mention_is_unclear_ownership() {
        let (level, desc) = assess_risk("Sync with the team on scope", "Friday", "Self");
        assert_eq!(level, "Medium");
        assert_eq!(desc.as_deref(), Some("Risk: Unclear ownership"));
    }

    #[test]
    fn calm_task_is_low_risk() {
        let (level, desc) = assess_risk("Prepare the agenda", "Friday", "Sarah Johnson");
        assert_eq!(level, "Low");
        assert!(desc.is_none());
    }

    #[test]
    fn completed_bucket_wins_first() {
        assert_eq!(estimate_progress("Shipped the billing fix"), "Completed");
    }

    #[test]
    fn in_progress_detected() {
        assert_eq!(estimate_progress("working on the importer"), "In Progress");
    }

    #[test]
    fn blocked_detected() {
        assert_eq!(estimate_progress("stuck on credentials"), "Blocked");
    }

    #[test]
    fn halfway_detected() {
        assert_eq!(estimate_progress("halfway through the migration guide"), "50%");
    }

    #[test]
    fn default_is_not_started() {
        assert_eq!(estimate_progress("Draft the proposal"), "Not Started");
    }
}
