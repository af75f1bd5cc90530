use std::collections::HashMap;
use std::fmt::Write;

use chrono::NaiveDate;

use crate::models::{Assignment, ChannelKind, ComplianceResult, LeaderboardEntry};

fn display<'a>(id: &'a str, names: &'a HashMap<String, String>) -> &'a str {
    names.get(id).map(String::as_str).unwrap_or(id)
}

pub fn build_compliance_report(
    channel: ChannelKind,
    cohort_name: &str,
    window_label: &str,
    result: &ComplianceResult,
    display_names: &HashMap<String, String>,
    late_user_ids: Option<&[String]>,
    leaderboard: Option<&[LeaderboardEntry]>,
) -> String {
    let mut output = String::new();

    let heading = match channel {
        ChannelKind::Attendance => "Attendance Check",
        ChannelKind::Eod => "EOD Check",
    };
    let _ = writeln!(output, "# {heading} — {cohort_name}");
    let _ = writeln!(output, "Window: {window_label}");
    let _ = writeln!(output);
    let _ = writeln!(output, "## Missing Updates");

    if result.missing_user_ids.is_empty() {
        let _ = writeln!(output, "Everyone posted in this window.");
    } else {
        for id in result.missing_user_ids.iter() {
            let _ = writeln!(output, "- {} ({})", display(id, display_names), id);
        }
    }

    if let Some(late) = late_user_ids {
        let _ = writeln!(output);
        let _ = writeln!(output, "## Posted After Cutoff");
        if late.is_empty() {
            let _ = writeln!(output, "No late posts.");
        } else {
            for id in late.iter() {
                let _ = writeln!(output, "- {} ({})", display(id, display_names), id);
            }
        }
    }

    if let Some(entries) = leaderboard {
        let _ = writeln!(output);
        let _ = writeln!(output, "## PR Leaderboard");
        if entries.is_empty() {
            let _ = writeln!(output, "No PRs posted in this window.");
        } else {
            for entry in entries.iter() {
                let plural = if entry.count == 1 { "PR" } else { "PRs" };
                let _ = writeln!(output, "- {}: {} {}", entry.name, entry.count, plural);
            }
        }
    }

    output
}

pub fn build_briefing(
    cohort_name: &str,
    date: NaiveDate,
    assignment: Option<&Assignment>,
) -> String {
    let mut output = String::new();

    let _ = writeln!(output, "# Daily Briefing — {cohort_name}");
    let _ = writeln!(output, "Prepared for {date}");
    let _ = writeln!(output);

    match assignment {
        Some(assignment) => {
            let _ = writeln!(
                output,
                "## Next Up: {} (week {}, day {})",
                assignment.title, assignment.week, assignment.day_of_week
            );
            let _ = writeln!(output, "{}", assignment.description);
            let _ = writeln!(output);
            let _ = writeln!(output, "Materials: {}", assignment.github_path);
        }
        None => {
            let _ = writeln!(
                output,
                "No assignment tomorrow. Either the cohort is off schedule or it is a break week."
            );
        }
    }

    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::{HashMap, HashSet};

    #[test]
    fn leaderboard_section_appears_only_when_provided() {
        let result = ComplianceResult {
            posted_user_ids: HashSet::new(),
            missing_user_ids: vec!["u2".to_string()],
            pr_counts_by_user: HashMap::new(),
        };
        let mut names = HashMap::new();
        names.insert("u2".to_string(), "Grace".to_string());

        let plain = build_compliance_report(
            ChannelKind::Attendance,
            "2026-spring",
            "last 12 hours",
            &result,
            &names,
            None,
            None,
        );
        assert!(plain.contains("- Grace (u2)"));
        assert!(!plain.contains("PR Leaderboard"));

        let entries = vec![LeaderboardEntry {
            name: "Grace".to_string(),
            count: 1,
        }];
        let with_board = build_compliance_report(
            ChannelKind::Eod,
            "2026-spring",
            "last 12 hours",
            &result,
            &names,
            None,
            Some(&entries),
        );
        assert!(with_board.contains("## PR Leaderboard"));
        assert!(with_board.contains("- Grace: 1 PR"));
    }

    #[test]
    fn briefing_reports_break_days_as_off_schedule() {
        let briefing = build_briefing(
            "2026-spring",
            chrono::NaiveDate::from_ymd_opt(2026, 1, 10).unwrap(),
            None,
        );
        assert!(briefing.contains("No assignment tomorrow"));
    }
}
