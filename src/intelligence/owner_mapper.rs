//! Owner identity mapping.
//!
//! Resolves free-text owner strings ("arjun", "ARJUN please", "me") to
//! canonical identities from a fixed alias table. Table order is
//! significant: partial matching returns the first satisfying entry, not
//! the best one.

use tracing::debug;

use super::text::title_case;

/// Alias → canonical identity, checked in order.
const OWNER_MAPPINGS: &[(&str, &str)] = &[
    ("riya", "Riya Kumar"),
    ("arjun", "Arjun Patel"),
    ("sarah", "Sarah Johnson"),
    ("mike", "Mike Chen"),
    ("john", "John Doe"),
    ("self", "Self (You)"),
    ("me", "Self (You)"),
    ("i", "Self (You)"),
    ("team", "Team"),
];

/// Map an owner string to `(original, canonical)`.
///
/// Empty input maps to the self identity. An exact (case-insensitive) hit
/// returns the table value; otherwise substring containment in either
/// direction wins, first table entry first; otherwise the input is
/// title-cased as-is.
pub fn map_owner(owner: &str) -> (String, String) {
    if owner.trim().is_empty() {
        return ("Self".to_string(), "Self (You)".to_string());
    }

    let owner_lower = owner.trim().to_lowercase();

    if let Some((_, mapped)) = OWNER_MAPPINGS.iter().find(|(alias, _)| *alias == owner_lower) {
        debug!(owner, mapped, "mapped owner");
        return (owner.to_string(), mapped.to_string());
    }

    for (alias, mapped) in OWNER_MAPPINGS {
        if owner_lower.contains(alias) || alias.contains(owner_lower.as_str()) {
            debug!(owner, mapped, "partial owner match");
            return (owner.to_string(), mapped.to_string());
        }
    }

    let mapped = title_case(owner);
    debug!(owner, mapped = %mapped, "no owner mapping, using title case");
    (owner.to_string(), mapped)
}

// ─── Tests ────────────────────────────────────────────────────────────────────
