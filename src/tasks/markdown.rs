//! Markdown rendering for task previews.
//!
//! Produces the short human-readable digest returned from the note
//! processing endpoint. Pure string building — no storage access.

use super::EnhancedTask;

/// Map a priority label to its status dot.
pub fn priority_symbol(priority: &str) -> &'static str {
    match priority {
        "High" => "🔴",
        "Medium" => "🟡",
        "Low" => "🟢",
        _ => "⚪",
    }
}

/// Render a numbered markdown digest of freshly enriched tasks.
///
/// One entry per task: priority dot, bold name, then owner / due date /
/// difficulty on the detail line.
pub fn tasks_preview(tasks: &[EnhancedTask]) -> String {
    if tasks.is_empty() {
        return "No tasks to preview".to_string();
    }

    let mut lines = vec!["📋 **Tasks Preview:**\n".to_string()];
    for (idx, task) in tasks.iter().enumerate() {
        lines.push(format!(
            "{}. {} **{}**\n   👤 {} | 📅 {} | 📊 {}",
            idx + 1,
            priority_symbol(&task.priority),
            task.task_name,
            task.owner,
            task.due_date,
            task.difficulty,
        ));
    }

    lines.join("\n")
}

// ─── Tests ────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn task(name: &str, priority: &str) -> EnhancedTask {
        EnhancedTask {
            task_name: name.to_string(),
            owner: "Self (You)".to_string(),
            due_date: "Needs Review".to_string(),
            priority: priority.to_string(),
            confidence_score: 0.7,
            difficulty: "Medium".to_string(),
            category: "General".to_string(),
            predicted_deadline: None,
            has_dependency: false,
            dependency_info: None,
            risk_level: "Low".to_string(),
            risk_description: None,
            progress_estimate: "Not Started".to_string(),
        }
    }

    #[test]
    fn empty_slice_yields_placeholder() {
        assert_eq!(tasks_preview(&[]), "No tasks to preview");
    }

    #[test]
    fn entries_are_numbered_from_one() {
        let out = tasks_preview(&[task("Fix the login bug", "High"), task("Update the docs", "Low")]);
        assert!(out.contains("1. 🔴 **Fix the login bug**"));
        assert!(out.contains("2. 🟢 **Update the docs**"));
    }

    #[test]
    fn unknown_priority_gets_neutral_dot() {
        assert_eq!(priority_symbol("Urgent"), "⚪");
        assert_eq!(priority_symbol("Medium"), "🟡");
    }

    #[test]
    fn detail_line_carries_owner_due_and_difficulty() {
        let out = tasks_preview(&[task("Prepare the demo", "Medium")]);
        assert!(out.contains("👤 Self (You) | 📅 Needs Review | 📊 Medium"));
    }
}
