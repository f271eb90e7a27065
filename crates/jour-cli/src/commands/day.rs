use anyhow::Result;
use chrono::Utc;
use jour_core::repository::Repository;
use jour_core::schedule::Planner;
use owo_colors::OwoColorize;
use uuid::Uuid;

use crate::cli::DayCommand;
use crate::parser::parse_natural_date;
use crate::views::table::display_day_view;

pub async fn show_day(repo: &impl Repository, user_id: Uuid, command: DayCommand) -> Result<()> {
    let date = match command.date.as_deref() {
        Some(raw) => parse_natural_date(raw)?,
        None => Utc::now().date_naive(),
    };

    let planner = Planner::new(repo);
    let view = planner.view_for_date(user_id, date).await?;

    println!(
        "{} · {} of {} done",
        date.format("%A %Y-%m-%d").to_string().bold(),
        view.completed_count(),
        view.total_count()
    );
    display_day_view(&view);
    Ok(())
}
