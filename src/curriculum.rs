use std::collections::HashMap;
use std::path::Path;

use anyhow::Context;
use chrono::{Datelike, Duration, NaiveDate, Weekday};

use crate::models::{Assignment, AssignmentInfo, CohortConfig, CurriculumPosition};

/// Curriculum table keyed by week, then day-of-week (Mon=1 .. Sat=6).
pub type CurriculumData = HashMap<u32, HashMap<u32, AssignmentInfo>>;

pub fn load_curriculum(path: &Path) -> anyhow::Result<CurriculumData> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read curriculum file {}", path.display()))?;
    let data = serde_json::from_str(&raw)
        .with_context(|| format!("invalid curriculum JSON in {}", path.display()))?;
    Ok(data)
}

/// Maps a calendar date to its slot in the cohort schedule.
///
/// Returns `None` before the start date, past the final week, and on
/// Sundays. Break weeks still map to a position; suppressing them is the
/// caller's concern (see `next_assignment`).
pub fn curriculum_position(date: NaiveDate, cohort: &CohortConfig) -> Option<CurriculumPosition> {
    let diff_days = (date - cohort.start_date).num_days();
    if diff_days < 0 {
        return None;
    }

    let week = (diff_days / 7 + 1) as u32;
    if week > cohort.total_weeks {
        return None;
    }

    if date.weekday() == Weekday::Sun {
        return None;
    }

    Some(CurriculumPosition {
        week,
        day_of_week: date.weekday().number_from_monday(),
    })
}

/// The next calendar day, skipping Sunday straight to Monday.
pub fn next_working_day(date: NaiveDate) -> NaiveDate {
    let next = date + Duration::days(1);
    if next.weekday() == Weekday::Sun {
        next + Duration::days(1)
    } else {
        next
    }
}

/// The assignment due on the next working day, or `None` when that day is
/// outside the schedule, falls in the break week, or has no curriculum
/// entry.
pub fn next_assignment(
    date: NaiveDate,
    cohort: &CohortConfig,
    curriculum: &CurriculumData,
) -> Option<Assignment> {
    let tomorrow = next_working_day(date);
    let position = curriculum_position(tomorrow, cohort)?;

    if cohort.break_week == Some(position.week) {
        return None;
    }

    let info = curriculum
        .get(&position.week)
        .and_then(|days| days.get(&position.day_of_week))?;

    Some(Assignment {
        week: position.week,
        day_of_week: position.day_of_week,
        title: info.title.clone(),
        description: info.description.clone(),
        github_path: info.github_path.clone(),
    })
}
