use anyhow::Result;
use chrono::Utc;
use jour_core::dates::week_bounds;
use jour_core::repository::Repository;
use jour_core::schedule::Planner;
use owo_colors::OwoColorize;
use uuid::Uuid;

use crate::cli::WeekCommand;
use crate::parser::parse_natural_date;
use crate::views::table::display_week;

pub async fn show_week(repo: &impl Repository, user_id: Uuid, command: WeekCommand) -> Result<()> {
    let anchor = match command.date.as_deref() {
        Some(raw) => parse_natural_date(raw)?,
        None => Utc::now().date_naive(),
    };

    let (start, end) = week_bounds(anchor);
    let planner = Planner::new(repo);
    let counts = planner.counts_for_range(user_id, start, end).await?;

    let completed: usize = counts.values().map(|day| day.completed).sum();
    let total: usize = counts.values().map(|day| day.total).sum();

    println!(
        "{} {} to {} · {} of {} done",
        "Week".bold(),
        start,
        end,
        completed,
        total
    );
    display_week(&counts);
    Ok(())
}
