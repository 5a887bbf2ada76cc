//! Tag matching between profile strings and catalog tags.

use crate::config::MatchPolicy;

/// Whether two free-text tags refer to the same thing under `policy`.
///
/// Blank strings never match. Under [`MatchPolicy::Substring`] either side
/// may contain the other, so "shellfish" matches "shellfish allergy" and
/// vice versa.
pub fn tags_match(a: &str, b: &str, policy: MatchPolicy) -> bool {
    let a = a.trim().to_lowercase();
    let b = b.trim().to_lowercase();
    if a.is_empty() || b.is_empty() {
        return false;
    }
    match policy {
        MatchPolicy::Substring => a.contains(&b) || b.contains(&a),
        MatchPolicy::Exact => a == b,
    }
}

/// Whether any of `needles` matches `tag`.
pub fn matches_any(tag: &str, needles: &[String], policy: MatchPolicy) -> bool {
    needles.iter().any(|n| tags_match(tag, n, policy))
}
