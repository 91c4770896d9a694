//! couch-planner: command-line front end for the training plan
//!
//! Usage:
//! ```bash
//! # Show the plan (created with default settings on first use)
//! couch-planner plan show
//!
//! # Ten weeks, four days a week, Mondays and Fridays off
//! couch-planner settings set --weeks 10 --days-per-week 4 --rest-days mon,fri
//!
//! # Skip a session; the ones after it move up
//! couch-planner session skip 2 1
//!
//! # Log a run
//! couch-planner session complete 1 1 --on 2024-01-01
//! ```

use chrono::{Local, NaiveDate};
use clap::{Args, Parser, Subcommand};
use std::collections::BTreeSet;
use std::error::Error;
use std::path::PathBuf;
use std::process::ExitCode;

use couch_planner_lib::config::{AppConfig, DEFAULT_LOG_FILTER};
use couch_planner_lib::generator::prescribe;
use couch_planner_lib::models::settings::{parse_rest_days, SettingsError};
use couch_planner_lib::models::{find_session, ProgramSettings, Session};
use couch_planner_lib::plan::{self, Plan};
use couch_planner_lib::progress::ProgressSummary;
use couch_planner_lib::{db, logging};

#[derive(Parser)]
#[command(
    name = "couch-planner",
    version,
    about = "Couch-to-5K/10K training planner",
    long_about = "Generates a run/walk training plan, puts it on the calendar around your rest days, and keeps it on track when sessions are skipped."
)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Database file (overrides COUCH_PLANNER_DB)
    #[arg(long, global = true)]
    database: Option<PathBuf>,

    /// Enable debug logging
    #[arg(long, short = 'v', global = true)]
    verbose: bool,

    /// Print JSON instead of text
    #[arg(long, global = true)]
    json: bool,
}

#[derive(Subcommand)]
enum Command {
    /// Program settings
    Settings {
        #[command(subcommand)]
        action: SettingsCommand,
    },
    /// The whole plan
    Plan {
        #[command(subcommand)]
        action: PlanCommand,
    },
    /// A single session, by week and day
    Session {
        #[command(subcommand)]
        action: SessionCommand,
    },
    /// Completion summary
    Progress,
}

#[derive(Subcommand)]
enum SettingsCommand {
    /// Show the current settings
    Show,
    /// Change settings; the plan is rebuilt or rescheduled as needed
    Set(SettingsArgs),
}

#[derive(Args, Default)]
struct SettingsArgs {
    /// First day of the program (YYYY-MM-DD)
    #[arg(long)]
    start_date: Option<NaiveDate>,
    /// Goal distance in km
    #[arg(long)]
    goal_km: Option<f64>,
    /// Distance you can cover today in km
    #[arg(long)]
    starting_km: Option<f64>,
    /// Walking speed in km/h
    #[arg(long)]
    walking_speed: Option<f64>,
    /// Running speed in km/h
    #[arg(long)]
    running_speed: Option<f64>,
    /// Program length in weeks (1-52)
    #[arg(long)]
    weeks: Option<u32>,
    /// Training sessions per week (1-7)
    #[arg(long)]
    days_per_week: Option<u32>,
    /// Rest days: indices (0 = Sunday) or names, comma separated; "none" for none
    #[arg(long, value_parser = rest_days_arg)]
    rest_days: Option<BTreeSet<u8>>,
}

impl SettingsArgs {
    fn apply(self, mut settings: ProgramSettings) -> ProgramSettings {
        if let Some(v) = self.start_date {
            settings.start_date = v;
        }
        if let Some(v) = self.goal_km {
            settings.goal_distance = v;
        }
        if let Some(v) = self.starting_km {
            settings.starting_distance = v;
        }
        if let Some(v) = self.walking_speed {
            settings.walking_speed = v;
        }
        if let Some(v) = self.running_speed {
            settings.running_speed = v;
        }
        if let Some(v) = self.weeks {
            settings.program_weeks = v;
        }
        if let Some(v) = self.days_per_week {
            settings.training_days_per_week = v;
        }
        if let Some(v) = self.rest_days {
            settings.rest_days = v;
        }
        settings
    }
}

#[derive(Subcommand)]
enum PlanCommand {
    /// List sessions with their dates and status
    Show {
        /// Only this week
        #[arg(long)]
        week: Option<u32>,
        /// Include phase and pace-based distance estimate
        #[arg(long)]
        detail: bool,
    },
    /// Re-date every pending session from the start date
    Schedule,
    /// Discard all progress and rebuild the plan
    Reset {
        /// Confirm the reset
        #[arg(long)]
        yes: bool,
    },
}

#[derive(Subcommand)]
enum SessionCommand {
    /// Skip a session; later sessions move up
    Skip { week: u32, day: u32 },
    /// Mark a session done
    Complete {
        week: u32,
        day: u32,
        /// Day it was done (defaults to today)
        #[arg(long)]
        on: Option<NaiveDate>,
    },
    /// Undo a completion
    Reopen { week: u32, day: u32 },
    /// Put a pending session on a specific date
    Move { week: u32, day: u32, date: NaiveDate },
}

fn rest_days_arg(value: &str) -> Result<BTreeSet<u8>, SettingsError> {
    if value.trim().eq_ignore_ascii_case("none") {
        Ok(BTreeSet::new())
    } else {
        parse_rest_days(value)
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::debug!("Command failed: {:?}", e);
            eprintln!("error: {}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn Error>> {
    let config = AppConfig::load();
    let log_filter = if cli.verbose {
        "debug".to_string()
    } else {
        config
            .as_ref()
            .map(|c| c.log_filter.clone())
            .unwrap_or_else(|_| DEFAULT_LOG_FILTER.to_string())
    };
    logging::init(&log_filter);

    let database_path = match cli.database {
        Some(path) => path,
        None => config?.database_path,
    };
    let pool = db::initialize_db(&database_path).await?;
    let json = cli.json;

    match cli.command {
        Command::Settings { action } => match action {
            SettingsCommand::Show => {
                let plan = plan::load_or_init_plan(&pool).await?;
                print_settings(&plan.settings, json)?;
            }
            SettingsCommand::Set(args) => {
                let current = plan::load_or_init_plan(&pool).await?.settings;
                let updated = plan::update_settings(&pool, args.apply(current)).await?;
                print_settings(&updated.settings, json)?;
            }
        },
        Command::Plan { action } => match action {
            PlanCommand::Show { week, detail } => {
                let plan = plan::load_or_init_plan(&pool).await?;
                print_plan(&plan, week, detail, json)?;
            }
            PlanCommand::Schedule => {
                let plan = plan::schedule_all_sessions(&pool).await?;
                print_plan(&plan, None, false, json)?;
            }
            PlanCommand::Reset { yes } => {
                if !yes {
                    return Err("reset discards all progress; pass --yes to confirm".into());
                }
                let plan = plan::reset_plan(&pool).await?;
                print_plan(&plan, None, false, json)?;
            }
        },
        Command::Session { action } => {
            let (plan, week, day) = match action {
                SessionCommand::Skip { week, day } => {
                    (plan::skip_session(&pool, week, day).await?, week, day)
                }
                SessionCommand::Complete { week, day, on } => {
                    let on = on.unwrap_or_else(|| Local::now().date_naive());
                    (plan::complete_session(&pool, week, day, on).await?, week, day)
                }
                SessionCommand::Reopen { week, day } => {
                    (plan::reopen_session(&pool, week, day).await?, week, day)
                }
                SessionCommand::Move { week, day, date } => {
                    (plan::move_session(&pool, week, day, date).await?, week, day)
                }
            };
            print_session_result(&plan, week, day, json)?;
        }
        Command::Progress => {
            let summary = plan::progress_summary(&pool).await?;
            print_progress(&summary, json)?;
        }
    }

    pool.close().await;
    Ok(())
}

/// ---------------------------------------------------------------------------
/// Output
/// ---------------------------------------------------------------------------

fn print_settings(settings: &ProgramSettings, json: bool) -> Result<(), Box<dyn Error>> {
    if json {
        println!("{}", serde_json::to_string_pretty(settings)?);
        return Ok(());
    }
    let rest = settings.rest_day_names();
    println!("Start date:        {}", settings.start_date);
    println!("Goal distance:     {} km", settings.goal_distance);
    println!("Starting distance: {} km", settings.starting_distance);
    println!("Walking speed:     {} km/h", settings.walking_speed);
    println!("Running speed:     {} km/h", settings.running_speed);
    println!(
        "Program:           {} weeks x {} days",
        settings.program_weeks, settings.training_days_per_week
    );
    println!(
        "Rest days:         {}",
        if rest.is_empty() { "none".to_string() } else { rest.join(", ") }
    );
    Ok(())
}

fn print_plan(
    plan: &Plan,
    week: Option<u32>,
    detail: bool,
    json: bool,
) -> Result<(), Box<dyn Error>> {
    let sessions: Vec<&Session> = match week {
        Some(week) => plan.week(week).collect(),
        None => plan.sessions.iter().collect(),
    };
    if json {
        println!("{}", serde_json::to_string_pretty(&sessions)?);
        return Ok(());
    }

    let settings = &plan.settings;
    println!(
        "Couch to {}K: {} weeks x {} days, starting {}",
        settings.goal_distance,
        settings.program_weeks,
        settings.training_days_per_week,
        settings.start_date
    );
    let today = Local::now().date_naive();
    let mut current_week = 0;
    for session in sessions {
        if session.week != current_week {
            current_week = session.week;
            println!("Week {}", current_week);
        }
        let when = session
            .scheduled_date
            .map(|d| d.format("%a %Y-%m-%d").to_string())
            .unwrap_or_else(|| "--".to_string());
        println!(
            "  Day {}  {:<14}  {:<9}  {}",
            session.day,
            when,
            session.status(today).to_string(),
            session.description
        );
        if detail {
            if let Some(p) = prescribe(settings, session.week, session.day) {
                println!(
                    "         {} phase, {:.0}% through, ~{:.1}km at your paces",
                    p.phase,
                    p.progress * 100.0,
                    p.estimated_km
                );
            }
        }
    }
    Ok(())
}

fn print_session_result(
    plan: &Plan,
    week: u32,
    day: u32,
    json: bool,
) -> Result<(), Box<dyn Error>> {
    let Some(index) = find_session(&plan.sessions, week, day) else {
        println!("No session for week {}, day {}; nothing changed", week, day);
        return Ok(());
    };
    let session = &plan.sessions[index];
    if json {
        println!("{}", serde_json::to_string_pretty(session)?);
        return Ok(());
    }
    let today = Local::now().date_naive();
    println!("{}: {}", session.title, session.status(today));
    if let Some(date) = session.scheduled_date {
        println!("  scheduled {}", date);
    }
    if let Some(date) = session.completed_date {
        println!("  completed {}", date);
    }
    if let Some(next) = plan.progress().next_session {
        println!("Next up: {}{}", next.title, format_on(next.scheduled_date));
    }
    Ok(())
}

fn print_progress(summary: &ProgressSummary, json: bool) -> Result<(), Box<dyn Error>> {
    if json {
        println!("{}", serde_json::to_string_pretty(summary)?);
        return Ok(());
    }
    println!(
        "Progress: {}/{} sessions ({}%), {} skipped, {} remaining",
        summary.completed,
        summary.total,
        summary.percent_complete,
        summary.skipped,
        summary.remaining
    );
    println!("Current week: {}", summary.current_week);
    match &summary.next_session {
        Some(next) => println!("Next: {}{}", next.title, format_on(next.scheduled_date)),
        None if summary.is_finished() => println!("Program finished"),
        None => {}
    }
    for week in &summary.weeks {
        println!("  Week {}: {}/{} ({}%)", week.week, week.completed, week.total, week.percent);
    }
    Ok(())
}

fn format_on(date: Option<NaiveDate>) -> String {
    date.map(|d| format!(" on {}", d.format("%a %Y-%m-%d")))
        .unwrap_or_default()
}
