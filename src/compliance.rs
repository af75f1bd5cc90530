use std::collections::{HashMap, HashSet};
use std::sync::LazyLock;

use chrono::{DateTime, Utc};
use regex::Regex;

use crate::models::{ComplianceResult, MessageRecord};

/// Matches GitHub pull-request URLs. No trailing boundary, so two URLs
/// concatenated back to back each match.
static PR_LINK: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"https://github\.com/[\w.-]+/[\w.-]+/pull/\d+").expect("pattern is valid")
});

/// Counts PR links in a message body. Duplicates count individually.
pub fn count_prs(content: &str) -> usize {
    PR_LINK.find_iter(content).count()
}

/// Reduces a pre-filtered message list (one channel, one lookback window)
/// against the expected roster. Authors outside the roster are ignored.
pub fn verify_compliance(
    messages: &[MessageRecord],
    expected_user_ids: &[String],
) -> ComplianceResult {
    let roster: HashSet<&str> = expected_user_ids.iter().map(String::as_str).collect();
    let mut posted: HashSet<String> = HashSet::new();
    let mut pr_counts: HashMap<String, usize> = HashMap::new();

    for message in messages.iter() {
        if !roster.contains(message.author_id.as_str()) {
            continue;
        }

        posted.insert(message.author_id.clone());
        let prs = count_prs(message.content.as_deref().unwrap_or(""));
        *pr_counts.entry(message.author_id.clone()).or_insert(0) += prs;
    }

    let missing = expected_user_ids
        .iter()
        .filter(|id| !posted.contains(id.as_str()))
        .cloned()
        .collect();

    ComplianceResult {
        posted_user_ids: posted,
        missing_user_ids: missing,
        pr_counts_by_user: pr_counts,
    }
}

/// Expected users whose earliest post in the window landed after the
/// cutoff instant, in roster order. Users who never posted are not late;
/// they show up in `missing_user_ids` instead.
pub fn late_posters(
    messages: &[MessageRecord],
    expected_user_ids: &[String],
    cutoff: DateTime<Utc>,
) -> Vec<String> {
    let mut first_post: HashMap<&str, DateTime<Utc>> = HashMap::new();

    for message in messages.iter() {
        first_post
            .entry(message.author_id.as_str())
            .and_modify(|at| {
                if message.created_at < *at {
                    *at = message.created_at;
                }
            })
            .or_insert(message.created_at);
    }

    expected_user_ids
        .iter()
        .filter(|id| matches!(first_post.get(id.as_str()), Some(at) if *at > cutoff))
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn message(author: &str, content: Option<&str>) -> MessageRecord {
        MessageRecord {
            author_id: author.to_string(),
            content: content.map(str::to_string),
            created_at: Utc::now(),
        }
    }

    fn ids(raw: &[&str]) -> Vec<String> {
        raw.iter().map(|id| id.to_string()).collect()
    }

    #[test]
    fn counts_each_pr_link() {
        assert_eq!(count_prs("https://github.com/a/b/pull/1"), 1);
        assert_eq!(
            count_prs("done: https://github.com/team-x/repo.name/pull/42 and https://github.com/a/b/pull/7"),
            2
        );
    }

    #[test]
    fn empty_and_linkless_content_count_zero() {
        assert_eq!(count_prs(""), 0);
        assert_eq!(count_prs("worked on auth refactor, no PR yet"), 0);
    }

    #[test]
    fn issue_links_are_not_prs() {
        assert_eq!(count_prs("https://github.com/a/b/issues/9"), 0);
        assert_eq!(count_prs("https://github.com/a/b/pulls"), 0);
    }

    #[test]
    fn back_to_back_links_both_count() {
        let content = "https://github.com/a/b/pull/2https://github.com/a/b/pull/3";
        assert_eq!(count_prs(content), 2);
    }

    #[test]
    fn duplicate_links_count_individually() {
        let content = "https://github.com/a/b/pull/5 https://github.com/a/b/pull/5";
        assert_eq!(count_prs(content), 2);
    }

    #[test]
    fn pr_totals_accumulate_across_messages() {
        let messages = vec![
            message("u1", Some("https://github.com/a/b/pull/1")),
            message("u1", Some("no links here")),
            message(
                "u1",
                Some("https://github.com/a/b/pull/2https://github.com/a/b/pull/3"),
            ),
        ];

        let result = verify_compliance(&messages, &ids(&["u1"]));
        assert_eq!(result.pr_counts_by_user.get("u1"), Some(&3));
        assert!(result.missing_user_ids.is_empty());
    }

    #[test]
    fn missing_users_preserve_roster_order() {
        let messages = vec![
            message("u3", Some("standup done")),
            message("u1", Some("here")),
        ];

        let result = verify_compliance(&messages, &ids(&["u1", "u2", "u3"]));
        assert_eq!(result.missing_user_ids, vec!["u2".to_string()]);
        assert!(result.posted_user_ids.contains("u1"));
        assert!(result.posted_user_ids.contains("u3"));
    }

    #[test]
    fn authors_outside_roster_are_ignored() {
        let messages = vec![message("lurker", Some("https://github.com/a/b/pull/1"))];

        let result = verify_compliance(&messages, &ids(&["u1"]));
        assert_eq!(result.missing_user_ids, vec!["u1".to_string()]);
        assert!(result.pr_counts_by_user.is_empty());
    }

    #[test]
    fn null_content_counts_as_posted_with_zero_prs() {
        let messages = vec![message("u1", None)];

        let result = verify_compliance(&messages, &ids(&["u1"]));
        assert!(result.posted_user_ids.contains("u1"));
        assert_eq!(result.pr_counts_by_user.get("u1"), Some(&0));
    }

    #[test]
    fn late_posters_use_the_earliest_post_per_user() {
        use chrono::TimeZone;

        let cutoff = Utc.with_ymd_and_hms(2026, 2, 3, 15, 0, 0).unwrap();
        let at = |hour, minute| MessageRecord {
            author_id: String::new(),
            content: None,
            created_at: Utc.with_ymd_and_hms(2026, 2, 3, hour, minute, 0).unwrap(),
        };

        let messages = vec![
            // u1 posts late, then again later: still late.
            MessageRecord {
                author_id: "u1".to_string(),
                ..at(15, 30)
            },
            MessageRecord {
                author_id: "u1".to_string(),
                ..at(16, 0)
            },
            // u2 posts before the cutoff and again after: on time.
            MessageRecord {
                author_id: "u2".to_string(),
                ..at(14, 50)
            },
            MessageRecord {
                author_id: "u2".to_string(),
                ..at(15, 10)
            },
        ];

        let late = late_posters(&messages, &ids(&["u1", "u2", "u3"]), cutoff);
        assert_eq!(late, vec!["u1".to_string()]);
    }
}
