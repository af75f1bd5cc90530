use std::collections::HashMap;
use std::path::PathBuf;
use std::str::FromStr;

use anyhow::Context;
use chrono::{Duration, NaiveDate, Utc};
use clap::{Parser, Subcommand};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};

mod boundaries;
mod compliance;
mod curriculum;
mod db;
mod leaderboard;
mod models;
mod report;

use models::ChannelKind;

#[derive(Parser)]
#[command(name = "attendabot")]
#[command(about = "Attendance and EOD compliance checks for cohort channels", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create or upgrade the database schema
    InitDb,
    /// Load realistic seed data
    Seed,
    /// Import cohort roster rows from a CSV file
    ImportRoster {
        #[arg(long)]
        csv: PathBuf,
    },
    /// Import archived channel messages from a CSV file
    ImportMessages {
        #[arg(long)]
        csv: PathBuf,
    },
    /// Run a compliance pass over one channel
    Verify {
        #[arg(long, value_enum)]
        channel: ChannelKind,
        #[arg(long)]
        cohort: String,
        #[arg(long, default_value_t = 12)]
        since_hours: i64,
        /// Check one local day (Eastern) instead of a trailing window
        #[arg(long)]
        date: Option<NaiveDate>,
        /// With --date, stop the window at the 13:00 midday PR boundary
        #[arg(long)]
        midday: bool,
        /// Use the -04:00 daylight offset instead of -05:00
        #[arg(long)]
        daylight: bool,
    },
    /// Generate the daily briefing for a cohort
    Briefing {
        #[arg(long)]
        cohort: String,
        #[arg(long)]
        curriculum: PathBuf,
        /// Simulate a different current date
        #[arg(long)]
        date: Option<NaiveDate>,
        #[arg(long)]
        out: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::init();
    let cli = Cli::parse();
    let database_url = std::env::var("DATABASE_URL")
        .context("DATABASE_URL must be set, e.g. sqlite://attendabot.db")?;

    let options = SqliteConnectOptions::from_str(&database_url)
        .context("DATABASE_URL is not a valid SQLite URL")?
        .create_if_missing(true);
    let pool = SqlitePoolOptions::new()
        .max_connections(5)
        .connect_with(options)
        .await
        .context("failed to open the SQLite database")?;

    match cli.command {
        Commands::InitDb => {
            db::init_db(&pool).await?;
            println!("Schema ready.");
        }
        Commands::Seed => {
            db::seed(&pool).await?;
            println!("Seed data inserted.");
        }
        Commands::ImportRoster { csv } => {
            let imported = db::import_roster_csv(&pool, &csv).await?;
            println!("Imported {imported} roster rows from {}.", csv.display());
        }
        Commands::ImportMessages { csv } => {
            let inserted = db::import_messages_csv(&pool, &csv).await?;
            println!("Inserted {inserted} messages from {}.", csv.display());
        }
        Commands::Verify {
            channel,
            cohort,
            since_hours,
            date,
            midday,
            daylight,
        } => {
            let roster = db::fetch_roster(&pool, &cohort).await?;
            if roster.is_empty() {
                anyhow::bail!("cohort '{cohort}' has no roster members");
            }

            let expected: Vec<String> = roster
                .iter()
                .map(|member| member.discord_user_id.clone())
                .collect();
            let display_names: HashMap<String, String> = roster
                .iter()
                .map(|member| (member.discord_user_id.clone(), member.display_name.clone()))
                .collect();

            if midday && date.is_none() {
                log::warn!("--midday has no effect without --date");
            }

            let bounds =
                date.map(|day| boundaries::day_bounds(day, boundaries::eastern_offset(daylight)));
            let (from, until, window_label) = match (date, bounds) {
                (Some(day), Some(bounds)) => {
                    let until = if midday { bounds.midday_cutoff } else { bounds.end };
                    let label = if midday {
                        format!("{day} until 13:00 Eastern (channel: {})", channel.as_str())
                    } else {
                        format!("{day} Eastern (channel: {})", channel.as_str())
                    };
                    (
                        bounds.start.with_timezone(&Utc),
                        until.with_timezone(&Utc),
                        label,
                    )
                }
                _ => {
                    let hours = since_hours.max(1);
                    let now = Utc::now();
                    (
                        now - Duration::hours(hours),
                        now,
                        format!("last {hours} hours (channel: {})", channel.as_str()),
                    )
                }
            };

            let messages = db::fetch_messages(&pool, channel, from, until).await?;
            let result = compliance::verify_compliance(&messages, &expected);

            let late = match (channel, bounds) {
                (ChannelKind::Attendance, Some(bounds)) => Some(compliance::late_posters(
                    &messages,
                    &expected,
                    bounds.attendance_cutoff.with_timezone(&Utc),
                )),
                _ => None,
            };

            // Leaderboard announcements are an EOD-channel thing only.
            let top = match channel {
                ChannelKind::Eod => {
                    let entries = leaderboard::eod_entries(&result, &expected, &display_names);
                    Some(leaderboard::top_leaderboard(&entries))
                }
                ChannelKind::Attendance => None,
            };

            let rendered = report::build_compliance_report(
                channel,
                &cohort,
                &window_label,
                &result,
                &display_names,
                late.as_deref(),
                top.as_deref(),
            );
            print!("{rendered}");
        }
        Commands::Briefing {
            cohort,
            curriculum,
            date,
            out,
        } => {
            let cohort_config = db::fetch_cohort(&pool, &cohort).await?;
            let data = curriculum::load_curriculum(&curriculum)?;
            let today = date.unwrap_or_else(|| Utc::now().date_naive());
            let assignment = curriculum::next_assignment(today, &cohort_config, &data);
            let briefing = report::build_briefing(&cohort_config.name, today, assignment.as_ref());

            match out {
                Some(path) => {
                    std::fs::write(&path, briefing)?;
                    println!("Briefing written to {}.", path.display());
                }
                None => print!("{briefing}"),
            }
        }
    }

    Ok(())
}
