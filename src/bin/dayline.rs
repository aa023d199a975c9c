//! Dayline CLI - command-line interface for the dayline analytics engine
//!
//! Commands:
//! - report: Build the full dashboard payload for a period view
//! - series: Print chart-ready series for one metric
//! - insights: Mine comparative insights over a period
//! - habits: Roll up habit totals and commentary
//! - sleep: Analyze one day's sleep occupancy grid

use clap::{Parser, Subcommand, ValueEnum};
use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use chrono::{NaiveDate, Utc};
use serde::de::DeserializeOwned;

use dayline::calendar::Period;
use dayline::types::{DailyEntry, HabitEntry, Metric};
use dayline::{
    AnalyticsError, DashboardSession, EntrySource, ReportBuilder, SeriesNormalizer, SleepAnalyzer,
    ENGINE_VERSION,
};

/// Dayline - analytics engine for sparse daily self-tracking series
#[derive(Parser)]
#[command(name = "dayline")]
#[command(version = ENGINE_VERSION)]
#[command(about = "Turn daily tracking entries into series and insights", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Build the full dashboard payload for a period view
    Report {
        /// Daily entries file (use - for stdin)
        #[arg(short, long)]
        entries: PathBuf,

        /// Habit entries file
        #[arg(long)]
        habits: Option<PathBuf>,

        /// Period granularity
        #[arg(long, default_value = "week", value_parser = parse_period)]
        period: Period,

        /// Period offset; 0 is current, negative navigates backward
        #[arg(long, default_value_t = 0)]
        offset: i32,

        /// Override the current date (YYYY-MM-DD), for reproducible output
        #[arg(long, value_parser = parse_date)]
        today: Option<NaiveDate>,

        /// Input format
        #[arg(long, default_value = "json")]
        format: InputFormat,
    },

    /// Print chart-ready points for one metric
    Series {
        /// Daily entries file (use - for stdin)
        #[arg(short, long)]
        entries: PathBuf,

        /// Metric to chart
        #[arg(long, value_enum, default_value = "mood")]
        metric: MetricArg,

        #[arg(long, default_value = "week", value_parser = parse_period)]
        period: Period,

        #[arg(long, default_value_t = 0)]
        offset: i32,

        #[arg(long, value_parser = parse_date)]
        today: Option<NaiveDate>,

        #[arg(long, default_value = "json")]
        format: InputFormat,
    },

    /// Mine comparative insights over a period
    Insights {
        /// Daily entries file (use - for stdin)
        #[arg(short, long)]
        entries: PathBuf,

        #[arg(long, default_value = "month", value_parser = parse_period)]
        period: Period,

        #[arg(long, default_value_t = 0)]
        offset: i32,

        #[arg(long, value_parser = parse_date)]
        today: Option<NaiveDate>,

        #[arg(long, default_value = "json")]
        format: InputFormat,

        /// Emit JSON even on a terminal
        #[arg(long)]
        json: bool,
    },

    /// Roll up habit totals and commentary for a period
    Habits {
        /// Habit entries file (use - for stdin)
        #[arg(short = 'e', long)]
        habits: PathBuf,

        #[arg(long, default_value = "week", value_parser = parse_period)]
        period: Period,

        #[arg(long, default_value_t = 0)]
        offset: i32,

        #[arg(long, value_parser = parse_date)]
        today: Option<NaiveDate>,

        #[arg(long, default_value = "json")]
        format: InputFormat,

        /// Emit JSON even on a terminal
        #[arg(long)]
        json: bool,
    },

    /// Analyze one day's sleep occupancy grid
    Sleep {
        /// Daily entries file (use - for stdin)
        #[arg(short, long)]
        entries: PathBuf,

        /// Date to analyze (YYYY-MM-DD)
        #[arg(long, value_parser = parse_date)]
        date: NaiveDate,

        #[arg(long, default_value = "json")]
        format: InputFormat,
    },
}

#[derive(Clone, ValueEnum)]
enum InputFormat {
    /// JSON array of entries
    Json,
    /// Newline-delimited JSON (one entry per line)
    Ndjson,
}

#[derive(Clone, Copy, ValueEnum)]
enum MetricArg {
    Energy,
    Mood,
    Anxiety,
    Irritability,
}

impl From<MetricArg> for Metric {
    fn from(arg: MetricArg) -> Self {
        match arg {
            MetricArg::Energy => Metric::Energy,
            MetricArg::Mood => Metric::Mood,
            MetricArg::Anxiety => Metric::Anxiety,
            MetricArg::Irritability => Metric::Irritability,
        }
    }
}

fn parse_period(value: &str) -> Result<Period, String> {
    value.parse::<Period>().map_err(|e| e.to_string())
}

fn parse_date(value: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .map_err(|e| format!("expected YYYY-MM-DD: {e}"))
}

/// Entry source backed by local JSON files
struct FileSource {
    entries: PathBuf,
    habits: Option<PathBuf>,
    format: InputFormat,
}

impl EntrySource for FileSource {
    fn fetch_entries(&self, _user_id: &str) -> Result<Vec<DailyEntry>, AnalyticsError> {
        load(&self.entries, &self.format)
    }

    fn fetch_habit_entries(&self, _user_id: &str) -> Result<Vec<HabitEntry>, AnalyticsError> {
        match &self.habits {
            Some(path) => load(path, &self.format),
            None => Ok(Vec::new()),
        }
    }
}

fn read_input(path: &Path) -> Result<String, AnalyticsError> {
    if path.as_os_str() == "-" {
        let mut buffer = String::new();
        io::stdin().read_to_string(&mut buffer)?;
        Ok(buffer)
    } else {
        Ok(fs::read_to_string(path)?)
    }
}

fn load<T: DeserializeOwned>(path: &Path, format: &InputFormat) -> Result<Vec<T>, AnalyticsError> {
    let raw = read_input(path)?;
    match format {
        InputFormat::Json => Ok(serde_json::from_str(&raw)?),
        InputFormat::Ndjson => raw
            .lines()
            .filter(|line| !line.trim().is_empty())
            .map(|line| serde_json::from_str(line).map_err(AnalyticsError::from))
            .collect(),
    }
}

fn effective_today(today: Option<NaiveDate>) -> NaiveDate {
    today.unwrap_or_else(|| Utc::now().date_naive())
}

fn print_json<T: serde::Serialize>(value: &T) -> Result<(), AnalyticsError> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn run(cli: Cli) -> Result<(), AnalyticsError> {
    match cli.command {
        Commands::Report {
            entries,
            habits,
            period,
            offset,
            today,
            format,
        } => {
            let source = FileSource {
                entries,
                habits,
                format,
            };
            let mut session = DashboardSession::new(source, "local");
            let now = today
                .and_then(|d| d.and_hms_opt(12, 0, 0))
                .map(|dt| dt.and_utc())
                .unwrap_or_else(Utc::now);
            let payload = session.dashboard(period, offset, now)?;
            print_json(&payload)
        }

        Commands::Series {
            entries,
            metric,
            period,
            offset,
            today,
            format,
        } => {
            let stored: Vec<DailyEntry> = load(&entries, &format)?;
            let now = effective_today(today)
                .and_hms_opt(12, 0, 0)
                .map(|dt| dt.and_utc())
                .unwrap_or_else(Utc::now);
            let payload = ReportBuilder::new().build(period, offset, now, &stored, &[]);
            let metric = Metric::from(metric);
            let series = payload
                .series
                .into_iter()
                .find(|s| s.metric == metric)
                .map(|s| s.points)
                .unwrap_or_default();
            print_json(&series)
        }

        Commands::Insights {
            entries,
            period,
            offset,
            today,
            format,
            json,
        } => {
            let stored: Vec<DailyEntry> = load(&entries, &format)?;
            let today = effective_today(today);
            let range = dayline::date_range(period, offset, today);
            let filled = SeriesNormalizer::fill(&stored, range.start, range.end);
            let insights = dayline::insight::mine(&filled);

            if json || !atty::is(atty::Stream::Stdout) {
                print_json(&insights)
            } else {
                if insights.is_empty() {
                    println!("Nothing notable for {}", dayline::period_label(period, offset, today));
                }
                for insight in insights {
                    println!("- {}", insight.text);
                }
                Ok(())
            }
        }

        Commands::Habits {
            habits,
            period,
            offset,
            today,
            format,
            json,
        } => {
            let stored: Vec<HabitEntry> = load(&habits, &format)?;
            let today = effective_today(today);
            let summaries = dayline::habits::rollup(&stored, period, offset, today);

            if json || !atty::is(atty::Stream::Stdout) {
                print_json(&summaries)
            } else {
                for summary in summaries {
                    println!(
                        "{:16} {:>5} min on {:>3} days ({:+} vs previous, {})  {}",
                        summary.habit.display_name(),
                        summary.total_minutes,
                        summary.days_completed,
                        summary.delta_minutes,
                        summary.trend.label(),
                        summary.commentary,
                    );
                }
                Ok(())
            }
        }

        Commands::Sleep {
            entries,
            date,
            format,
        } => {
            let stored: Vec<DailyEntry> = load(&entries, &format)?;
            let analysis = stored
                .iter()
                .find(|e| e.date == date)
                .and_then(|e| e.sleep.as_ref())
                .map(|slots| SleepAnalyzer::analyze(slots))
                .unwrap_or_else(dayline::types::SleepAnalysis::empty);
            print_json(&analysis)
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}
