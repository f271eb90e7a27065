use clap::{Parser, Subcommand, ValueEnum};

/// A day-planner CLI with recurring tasks and per-date completion tracking
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Add a new task
    Add(AddCommand),
    /// Show today's schedule
    Today(TodayCommand),
    /// Show the schedule for one date
    Day(DayCommand),
    /// Show a week overview with per-day progress
    Week(WeekCommand),
    /// List task definitions
    List(ListCommand),
    /// Toggle completion for a task on a date
    Done(DoneCommand),
    /// Push a task's planned date forward
    Postpone(PostponeCommand),
    /// Delete a task
    Delete(DeleteCommand),
}

#[derive(Parser, Debug, Clone)]
pub struct AddCommand {
    /// The title of the task
    pub title: String,
    /// The description of the task
    #[clap(short, long)]
    pub description: Option<String>,
    /// The planned date (e.g., 'tomorrow', 'next friday', '2025-09-01')
    #[clap(long)]
    pub date: Option<String>,
    /// The planned time of day (e.g., '9:00 AM', '14:30')
    #[clap(long)]
    pub time: Option<String>,
    /// The priority of the task (low, medium, high)
    #[clap(short, long)]
    pub priority: Option<String>,
    /// A free-form category (e.g., 'work', 'home')
    #[clap(short, long)]
    pub category: Option<String>,
    /// A free-form context (e.g., 'office', 'errands')
    #[clap(long)]
    pub context: Option<String>,
    /// Estimated duration in minutes
    #[clap(long)]
    pub duration: Option<i64>,
    /// Energy level this task needs (low, medium, high)
    #[clap(long)]
    pub energy: Option<String>,
    /// Recurrence frequency
    #[clap(long, value_enum, help = "Frequency (daily, weekly, monthly, yearly, weekdays, weekends, custom)")]
    pub every: Option<RecurrenceShortcut>,
    /// Days of week for custom recurrence
    #[clap(long, requires = "every", help = "Days of week (mon,tue,wed,thu,fri,sat,sun)")]
    pub on: Option<String>,
}

#[derive(Parser, Debug, Clone)]
pub struct TodayCommand {}

#[derive(Parser, Debug, Clone)]
pub struct DayCommand {
    /// The date to show (e.g., 'tomorrow', '2025-09-01'); defaults to today
    pub date: Option<String>,
}

#[derive(Parser, Debug, Clone)]
pub struct WeekCommand {
    /// Any date inside the week to show; defaults to the current week
    pub date: Option<String>,
}

#[derive(Parser, Debug, Clone)]
pub struct ListCommand {
    /// Filter by status (todo, in_progress, done, cancelled)
    #[clap(long)]
    pub status: Option<String>,
    /// Filter by priority (low, medium, high)
    #[clap(long)]
    pub priority: Option<String>,
    /// Filter by category
    #[clap(long)]
    pub category: Option<String>,
    /// Filter by context
    #[clap(long)]
    pub context: Option<String>,
    /// Filter by energy level (low, medium, high)
    #[clap(long)]
    pub energy: Option<String>,
    /// Search in title and description
    #[clap(long)]
    pub search: Option<String>,
}

#[derive(Parser, Debug, Clone)]
pub struct DoneCommand {
    /// The ID of the task to toggle
    pub id: String,
    /// The occurrence date to toggle; defaults to today
    #[clap(long)]
    pub date: Option<String>,
}

#[derive(Parser, Debug, Clone)]
pub struct PostponeCommand {
    /// The ID of the task to postpone
    pub id: String,
    /// The new planned date; defaults to the day after the current one
    #[clap(long)]
    pub to: Option<String>,
}

#[derive(Parser, Debug, Clone)]
pub struct DeleteCommand {
    /// The ID of the task to delete
    pub id: String,
    /// Force deletion without confirmation
    #[clap(short, long)]
    pub force: bool,
}

/// Human-friendly recurrence patterns
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecurrenceShortcut {
    /// Every day
    Daily,
    /// Every week (same weekday as the planned date)
    Weekly,
    /// Every month (same day of month)
    Monthly,
    /// Every year (same date)
    Yearly,
    /// Monday to Friday
    Weekdays,
    /// Saturday and Sunday
    Weekends,
    /// Specific weekdays given with --on
    Custom,
}

impl std::fmt::Display for RecurrenceShortcut {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RecurrenceShortcut::Daily => write!(f, "daily"),
            RecurrenceShortcut::Weekly => write!(f, "weekly"),
            RecurrenceShortcut::Monthly => write!(f, "monthly"),
            RecurrenceShortcut::Yearly => write!(f, "yearly"),
            RecurrenceShortcut::Weekdays => write!(f, "weekdays"),
            RecurrenceShortcut::Weekends => write!(f, "weekends"),
            RecurrenceShortcut::Custom => write!(f, "custom"),
        }
    }
}

impl RecurrenceShortcut {
    /// The stored rule name plus the weekday names it implies. Custom takes
    /// its days from --on; the weekday groups expand to fixed sets.
    pub fn to_rule_parts(self, on: Option<&str>) -> anyhow::Result<(String, Vec<String>)> {
        let days = |names: &[&str]| names.iter().map(|d| d.to_string()).collect::<Vec<_>>();
        match self {
            RecurrenceShortcut::Daily => Ok(("daily".to_string(), vec![])),
            RecurrenceShortcut::Weekly => Ok(("weekly".to_string(), vec![])),
            RecurrenceShortcut::Monthly => Ok(("monthly".to_string(), vec![])),
            RecurrenceShortcut::Yearly => Ok(("yearly".to_string(), vec![])),
            RecurrenceShortcut::Weekdays => Ok((
                "custom".to_string(),
                days(&["monday", "tuesday", "wednesday", "thursday", "friday"]),
            )),
            RecurrenceShortcut::Weekends => {
                Ok(("custom".to_string(), days(&["saturday", "sunday"])))
            }
            RecurrenceShortcut::Custom => {
                let on = on.ok_or_else(|| {
                    anyhow::anyhow!("--on is required with '--every custom' (e.g., --on mon,thu)")
                })?;
                let names: Vec<String> = on
                    .split(',')
                    .map(|d| d.trim().to_string())
                    .filter(|d| !d.is_empty())
                    .collect();
                Ok(("custom".to_string(), names))
            }
        }
    }
}
