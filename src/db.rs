use anyhow::Context;
use chrono::{DateTime, NaiveDate, Utc};
use sqlx::{Row, SqlitePool};
use uuid::Uuid;

use crate::models::{ChannelKind, CohortConfig, Member, MessageRecord};

pub async fn init_db(pool: &SqlitePool) -> anyhow::Result<()> {
    log::info!("applying migrations");
    sqlx::migrate!("./migrations").run(pool).await?;
    Ok(())
}

pub async fn seed(pool: &SqlitePool) -> anyhow::Result<()> {
    let cohort_id = upsert_cohort(
        pool,
        "2026-spring",
        NaiveDate::from_ymd_opt(2026, 1, 5).context("invalid date")?,
        Some(7),
        12,
    )
    .await?;

    let members = vec![
        ("1089431180123456789", "Ada Lovelace", 1i64),
        ("1089431180123456790", "Grace Hopper", 2),
        ("1089431180123456791", "Edsger Dijkstra", 3),
    ];

    for (discord_user_id, display_name, position) in members {
        upsert_member(pool, &cohort_id, discord_user_id, display_name, position).await?;
    }

    // A Tuesday of the seed cohort: two on-time attendance posts (before
    // 10:00 Eastern), one late, and EOD updates with PR links.
    let messages = vec![
        (
            "seed-001",
            "attendance",
            "1089431180123456789",
            Some("here"),
            "2026-02-03T13:45:00Z",
        ),
        (
            "seed-002",
            "attendance",
            "1089431180123456790",
            Some("good morning"),
            "2026-02-03T14:10:00Z",
        ),
        (
            "seed-003",
            "attendance",
            "1089431180123456791",
            Some("overslept, here now"),
            "2026-02-03T16:30:00Z",
        ),
        (
            "seed-004",
            "eod",
            "1089431180123456789",
            Some("shipped the parser https://github.com/cohort/parser/pull/12"),
            "2026-02-03T23:05:00Z",
        ),
        (
            "seed-005",
            "eod",
            "1089431180123456790",
            Some(
                "two merged today https://github.com/cohort/api/pull/31 \
                 https://github.com/cohort/api/pull/33",
            ),
            "2026-02-03T23:40:00Z",
        ),
    ];

    for (source_key, channel, author_id, content, created_at) in messages {
        let created_at = created_at
            .parse::<DateTime<Utc>>()
            .context("invalid timestamp")?;
        insert_message(pool, channel, author_id, content, created_at, source_key).await?;
    }

    Ok(())
}

async fn upsert_cohort(
    pool: &SqlitePool,
    name: &str,
    start_date: NaiveDate,
    break_week: Option<i64>,
    total_weeks: i64,
) -> anyhow::Result<String> {
    let id: String = sqlx::query(
        r#"
        INSERT INTO cohorts (id, name, start_date, break_week, total_weeks)
        VALUES (?, ?, ?, ?, ?)
        ON CONFLICT (name) DO UPDATE
        SET start_date = excluded.start_date,
            break_week = excluded.break_week,
            total_weeks = excluded.total_weeks
        RETURNING id
        "#,
    )
    .bind(Uuid::new_v4().to_string())
    .bind(name)
    .bind(start_date)
    .bind(break_week)
    .bind(total_weeks)
    .fetch_one(pool)
    .await?
    .get("id");

    Ok(id)
}

async fn upsert_member(
    pool: &SqlitePool,
    cohort_id: &str,
    discord_user_id: &str,
    display_name: &str,
    position: i64,
) -> anyhow::Result<()> {
    sqlx::query(
        r#"
        INSERT INTO members (id, cohort_id, discord_user_id, display_name, position)
        VALUES (?, ?, ?, ?, ?)
        ON CONFLICT (discord_user_id) DO UPDATE
        SET cohort_id = excluded.cohort_id,
            display_name = excluded.display_name,
            position = excluded.position
        "#,
    )
    .bind(Uuid::new_v4().to_string())
    .bind(cohort_id)
    .bind(discord_user_id)
    .bind(display_name)
    .bind(position)
    .execute(pool)
    .await?;

    Ok(())
}

async fn insert_message(
    pool: &SqlitePool,
    channel: &str,
    author_id: &str,
    content: Option<&str>,
    created_at: DateTime<Utc>,
    source_key: &str,
) -> anyhow::Result<bool> {
    let result = sqlx::query(
        r#"
        INSERT INTO messages (id, channel, author_id, content, created_at, source_key)
        VALUES (?, ?, ?, ?, ?, ?)
        ON CONFLICT (source_key) DO NOTHING
        "#,
    )
    .bind(Uuid::new_v4().to_string())
    .bind(channel)
    .bind(author_id)
    .bind(content)
    .bind(created_at)
    .bind(source_key)
    .execute(pool)
    .await?;

    Ok(result.rows_affected() > 0)
}

pub async fn fetch_cohort(pool: &SqlitePool, name: &str) -> anyhow::Result<CohortConfig> {
    let row = sqlx::query(
        "SELECT name, start_date, break_week, total_weeks FROM cohorts WHERE name = ?",
    )
    .bind(name)
    .fetch_optional(pool)
    .await?
    .with_context(|| format!("cohort '{name}' is not configured"))?;

    let break_week: Option<i64> = row.get("break_week");
    let total_weeks: i64 = row.get("total_weeks");

    Ok(CohortConfig {
        name: row.get("name"),
        start_date: row.get("start_date"),
        break_week: break_week.map(|week| week as u32),
        total_weeks: total_weeks as u32,
    })
}

/// Roster in position order; that order is what missing-user output and
/// leaderboard tie-breaks preserve.
pub async fn fetch_roster(pool: &SqlitePool, cohort_name: &str) -> anyhow::Result<Vec<Member>> {
    let rows = sqlx::query(
        r#"
        SELECT m.discord_user_id, m.display_name
        FROM members m
        JOIN cohorts c ON c.id = m.cohort_id
        WHERE c.name = ?
        ORDER BY m.position
        "#,
    )
    .bind(cohort_name)
    .fetch_all(pool)
    .await?;

    let mut members = Vec::new();
    for row in rows {
        members.push(Member {
            discord_user_id: row.get("discord_user_id"),
            display_name: row.get("display_name"),
        });
    }

    Ok(members)
}

pub async fn fetch_messages(
    pool: &SqlitePool,
    channel: ChannelKind,
    from: DateTime<Utc>,
    until: DateTime<Utc>,
) -> anyhow::Result<Vec<MessageRecord>> {
    let rows = sqlx::query(
        r#"
        SELECT author_id, content, created_at
        FROM messages
        WHERE channel = ? AND created_at >= ? AND created_at <= ?
        ORDER BY created_at
        "#,
    )
    .bind(channel.as_str())
    .bind(from)
    .bind(until)
    .fetch_all(pool)
    .await?;

    let mut messages = Vec::new();
    for row in rows {
        messages.push(MessageRecord {
            author_id: row.get("author_id"),
            content: row.get("content"),
            created_at: row.get("created_at"),
        });
    }

    log::debug!(
        "fetched {} {} messages between {from} and {until}",
        messages.len(),
        channel.as_str()
    );

    Ok(messages)
}

pub async fn import_roster_csv(
    pool: &SqlitePool,
    csv_path: &std::path::Path,
) -> anyhow::Result<usize> {
    #[derive(serde::Deserialize)]
    struct CsvRow {
        cohort: String,
        start_date: NaiveDate,
        break_week: Option<i64>,
        total_weeks: i64,
        discord_user_id: String,
        display_name: String,
        position: i64,
    }

    let mut reader = csv::Reader::from_path(csv_path)?;
    let mut imported = 0usize;

    for result in reader.deserialize::<CsvRow>() {
        let row = result?;
        let cohort_id = upsert_cohort(
            pool,
            &row.cohort,
            row.start_date,
            row.break_week,
            row.total_weeks,
        )
        .await?;
        upsert_member(
            pool,
            &cohort_id,
            &row.discord_user_id,
            &row.display_name,
            row.position,
        )
        .await?;
        imported += 1;
    }

    Ok(imported)
}

pub async fn import_messages_csv(
    pool: &SqlitePool,
    csv_path: &std::path::Path,
) -> anyhow::Result<usize> {
    #[derive(serde::Deserialize)]
    struct CsvRow {
        channel: String,
        author_id: String,
        content: Option<String>,
        created_at: DateTime<Utc>,
        source_key: Option<String>,
    }

    let mut reader = csv::Reader::from_path(csv_path)?;
    let mut inserted = 0usize;

    for result in reader.deserialize::<CsvRow>() {
        let row = result?;
        let source_key = row
            .source_key
            .unwrap_or_else(|| format!("import-{}", Uuid::new_v4()));

        let fresh = insert_message(
            pool,
            &row.channel,
            &row.author_id,
            row.content.as_deref(),
            row.created_at,
            &source_key,
        )
        .await?;

        if fresh {
            inserted += 1;
        }
    }

    Ok(inserted)
}
