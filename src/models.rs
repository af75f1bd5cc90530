use std::collections::{HashMap, HashSet};

use chrono::{DateTime, NaiveDate, Utc};
use clap::ValueEnum;
use serde::Deserialize;

/// Channel a message was posted in. Only these two carry compliance rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ChannelKind {
    Attendance,
    Eod,
}

impl ChannelKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ChannelKind::Attendance => "attendance",
            ChannelKind::Eod => "eod",
        }
    }
}

#[derive(Debug, Clone)]
pub struct MessageRecord {
    pub author_id: String,
    /// Nullable in storage; a missing body counts as zero PR links.
    pub content: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct Member {
    pub discord_user_id: String,
    pub display_name: String,
}

#[derive(Debug, Clone)]
pub struct CohortConfig {
    pub name: String,
    pub start_date: NaiveDate,
    pub break_week: Option<u32>,
    pub total_weeks: u32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LeaderboardEntry {
    pub name: String,
    pub count: usize,
}

#[derive(Debug, Clone)]
pub struct ComplianceResult {
    pub posted_user_ids: HashSet<String>,
    /// Expected users who never posted, in the expected list's order.
    pub missing_user_ids: Vec<String>,
    pub pr_counts_by_user: HashMap<String, usize>,
}

/// Week/day slot in a cohort's schedule. Mon=1 .. Sat=6; Sundays have none.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CurriculumPosition {
    pub week: u32,
    pub day_of_week: u32,
}

#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct AssignmentInfo {
    pub title: String,
    pub description: String,
    pub github_path: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Assignment {
    pub week: u32,
    pub day_of_week: u32,
    pub title: String,
    pub description: String,
    pub github_path: String,
}
