use std::collections::HashMap;

use crate::models::{ComplianceResult, LeaderboardEntry};

/// Builds leaderboard entries for everyone who posted, in roster order so
/// that ties keep a deterministic relative order, then sorts descending by
/// count. `sort_by` is stable, which the tie order depends on.
pub fn eod_entries(
    result: &ComplianceResult,
    roster: &[String],
    display_names: &HashMap<String, String>,
) -> Vec<LeaderboardEntry> {
    let mut entries: Vec<LeaderboardEntry> = roster
        .iter()
        .filter(|id| result.posted_user_ids.contains(id.as_str()))
        .map(|id| LeaderboardEntry {
            name: display_names.get(id).cloned().unwrap_or_else(|| id.clone()),
            count: result.pr_counts_by_user.get(id).copied().unwrap_or(0),
        })
        .collect();

    entries.sort_by(|a, b| b.count.cmp(&a.count));
    entries
}

/// Top-of-leaderboard selection over an already descending-sorted list.
///
/// Entries with the same count form a rank group, and groups are taken
/// whole: append groups until at least three entries are included, never
/// splitting the group that crosses the threshold. The first group is
/// always included even when it alone exceeds three.
pub fn top_leaderboard(sorted: &[LeaderboardEntry]) -> Vec<LeaderboardEntry> {
    let mut top: Vec<LeaderboardEntry> = Vec::new();
    let mut start = 0;

    while start < sorted.len() && top.len() < 3 {
        let count = sorted[start].count;
        let mut end = start;
        while end < sorted.len() && sorted[end].count == count {
            end += 1;
        }
        top.extend_from_slice(&sorted[start..end]);
        start = end;
    }

    top
}
