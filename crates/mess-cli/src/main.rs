//! `mess` CLI -- resolve mess subscription meal calendars from the command
//! line.
//!
//! ## Usage
//!
//! ```sh
//! # Resolve a single day against a pattern file
//! mess --patterns patterns.json day --date 2025-10-14
//!
//! # Resolve the week starting today, clocked in Asia/Kolkata
//! mess --patterns patterns.json --timezone Asia/Kolkata week
//!
//! # Render the October 2025 grid (month is 0-based), weeks starting Monday
//! mess --patterns patterns.json month --year 2025 --month 9 --week-starts-on monday
//!
//! # Skip lunch on a day; the override is persisted to the store file
//! mess --patterns patterns.json --overrides overrides.json \
//!     toggle --date 2025-10-14 --meal lunch --opted-in false
//!
//! # Validate a pattern file
//! mess --patterns patterns.json check
//! ```

use anyhow::{Context, Result};
use chrono::{NaiveDate, NaiveDateTime, Weekday};
use clap::{Parser, Subcommand};
use mess_engine::{
    now_in_zone, resolve_day, resolve_month, resolve_week, toggle_meal, validate_pattern,
    DayOverrideStore, MealType, PatternDefinition,
};
use std::fs;
use std::path::Path;

#[derive(Parser)]
#[command(
    name = "mess",
    version,
    about = "Meal-calendar resolution for mess subscriptions"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Pattern definitions file, a JSON array (empty set if omitted)
    #[arg(long, global = true)]
    patterns: Option<String>,

    /// Day override store, a JSON object keyed by date (empty if omitted)
    #[arg(long, global = true)]
    overrides: Option<String>,

    /// Resolution clock, e.g. 2025-10-14T09:30:00 (default: current time in --timezone)
    #[arg(long, global = true)]
    now: Option<String>,

    /// IANA timezone used when --now is omitted
    #[arg(long, global = true, default_value = "UTC")]
    timezone: String,
}

#[derive(Subcommand)]
enum Commands {
    /// Resolve a single day
    Day {
        /// Date to resolve, YYYY-MM-DD (default: today)
        #[arg(long)]
        date: Option<String>,
        /// Output file (writes to stdout if omitted)
        #[arg(short, long)]
        output: Option<String>,
    },
    /// Resolve seven days starting from a date
    Week {
        /// First day of the week, YYYY-MM-DD (default: today)
        #[arg(long)]
        start: Option<String>,
        /// Output file (writes to stdout if omitted)
        #[arg(short, long)]
        output: Option<String>,
    },
    /// Resolve a whole month as a rectangular calendar grid
    Month {
        /// Calendar year
        #[arg(long)]
        year: i32,
        /// Month index, 0-based (0 = January)
        #[arg(long)]
        month: u32,
        /// First weekday of grid rows: a name or 0-6 with 0 = Sunday
        #[arg(long, default_value = "sunday")]
        week_starts_on: String,
        /// Output file (writes to stdout if omitted)
        #[arg(short, long)]
        output: Option<String>,
    },
    /// Toggle one meal on a day and persist the override
    Toggle {
        /// Date to change, YYYY-MM-DD
        #[arg(long)]
        date: String,
        /// Meal to change: breakfast, lunch, or dinner
        #[arg(long)]
        meal: String,
        /// New opt-in value
        #[arg(long, action = clap::ArgAction::Set)]
        opted_in: bool,
    },
    /// Validate a pattern file
    Check,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let patterns = load_patterns(cli.patterns.as_deref())?;
    let mut overrides = load_overrides(cli.overrides.as_deref())?;
    let now = resolve_now(cli.now.as_deref(), &cli.timezone)?;

    match cli.command {
        Commands::Day { date, output } => {
            let date = parse_date_or(date.as_deref(), now.date())?;
            let day = resolve_day(&patterns, &overrides, date, now);
            let json = serde_json::to_string_pretty(&day)?;
            write_output(output.as_deref(), &json)?;
        }
        Commands::Week { start, output } => {
            let start = parse_date_or(start.as_deref(), now.date())?;
            let week =
                resolve_week(&patterns, &overrides, start, now).context("Failed to resolve week")?;
            let json = serde_json::to_string_pretty(&week)?;
            write_output(output.as_deref(), &json)?;
        }
        Commands::Month {
            year,
            month,
            week_starts_on,
            output,
        } => {
            let week_starts_on = parse_week_start(&week_starts_on)?;
            let grid = resolve_month(&patterns, &overrides, year, month, week_starts_on, now)
                .context("Failed to resolve month")?;
            let json = serde_json::to_string_pretty(&grid)?;
            write_output(output.as_deref(), &json)?;
        }
        Commands::Toggle {
            date,
            meal,
            opted_in,
        } => {
            let store_path = cli
                .overrides
                .as_deref()
                .context("toggle needs --overrides so the change can be stored")?;
            let date = parse_date(&date)?;
            let meal = parse_meal(&meal)?;

            let day = toggle_meal(&patterns, &mut overrides, date, meal, opted_in, now);
            save_overrides(store_path, &overrides)?;
            let json = serde_json::to_string_pretty(&day)?;
            write_output(None, &json)?;
        }
        Commands::Check => {
            if cli.patterns.is_none() {
                anyhow::bail!("check needs --patterns pointing at a pattern file");
            }
            let mut invalid = 0usize;
            for pattern in &patterns {
                match validate_pattern(pattern) {
                    Ok(()) => println!("ok      {} ({})", pattern.name, pattern.id),
                    Err(err) => {
                        invalid += 1;
                        println!("invalid {} ({}): {}", pattern.name, pattern.id, err);
                    }
                }
            }
            if invalid > 0 {
                anyhow::bail!("{} of {} patterns invalid", invalid, patterns.len());
            }
            println!("{} patterns checked", patterns.len());
        }
    }

    Ok(())
}

fn load_patterns(path: Option<&str>) -> Result<Vec<PatternDefinition>> {
    match path {
        Some(path) => {
            let text = fs::read_to_string(path)
                .with_context(|| format!("Failed to read patterns file: {}", path))?;
            serde_json::from_str(&text)
                .with_context(|| format!("Failed to parse patterns file: {}", path))
        }
        None => Ok(Vec::new()),
    }
}

fn load_overrides(path: Option<&str>) -> Result<DayOverrideStore> {
    match path {
        // A store file that does not exist yet is an empty history; the
        // first toggle creates it.
        Some(path) if Path::new(path).exists() => {
            let text = fs::read_to_string(path)
                .with_context(|| format!("Failed to read overrides file: {}", path))?;
            serde_json::from_str(&text)
                .with_context(|| format!("Failed to parse overrides file: {}", path))
        }
        _ => Ok(DayOverrideStore::new()),
    }
}

fn save_overrides(path: &str, overrides: &DayOverrideStore) -> Result<()> {
    let json = serde_json::to_string_pretty(overrides)?;
    fs::write(path, json).with_context(|| format!("Failed to write overrides file: {}", path))
}

fn resolve_now(raw: Option<&str>, timezone: &str) -> Result<NaiveDateTime> {
    match raw {
        Some(text) => text.parse().with_context(|| {
            format!("Failed to parse --now value: {} (expected e.g. 2025-10-14T09:30:00)", text)
        }),
        None => Ok(now_in_zone(timezone)?),
    }
}

fn parse_date(raw: &str) -> Result<NaiveDate> {
    raw.parse()
        .with_context(|| format!("Failed to parse date: {} (expected YYYY-MM-DD)", raw))
}

fn parse_date_or(raw: Option<&str>, fallback: NaiveDate) -> Result<NaiveDate> {
    match raw {
        Some(text) => parse_date(text),
        None => Ok(fallback),
    }
}

fn parse_meal(raw: &str) -> Result<MealType> {
    match raw.to_ascii_lowercase().as_str() {
        "breakfast" => Ok(MealType::Breakfast),
        "lunch" => Ok(MealType::Lunch),
        "dinner" => Ok(MealType::Dinner),
        other => anyhow::bail!(
            "Unknown meal: '{}'. Expected breakfast, lunch, or dinner",
            other
        ),
    }
}

fn parse_week_start(raw: &str) -> Result<Weekday> {
    match raw.to_ascii_lowercase().as_str() {
        "sunday" | "sun" | "0" => Ok(Weekday::Sun),
        "monday" | "mon" | "1" => Ok(Weekday::Mon),
        "tuesday" | "tue" | "2" => Ok(Weekday::Tue),
        "wednesday" | "wed" | "3" => Ok(Weekday::Wed),
        "thursday" | "thu" | "4" => Ok(Weekday::Thu),
        "friday" | "fri" | "5" => Ok(Weekday::Fri),
        "saturday" | "sat" | "6" => Ok(Weekday::Sat),
        other => anyhow::bail!(
            "Unknown week start: '{}'. Expected a weekday name or 0-6 (0 = Sunday)",
            other
        ),
    }
}

fn write_output(path: Option<&str>, content: &str) -> Result<()> {
    match path {
        Some(path) => {
            fs::write(path, content).with_context(|| format!("Failed to write file: {}", path))?;
        }
        None => {
            println!("{}", content);
        }
    }
    Ok(())
}
