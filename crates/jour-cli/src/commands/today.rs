use anyhow::Result;
use chrono::Utc;
use jour_core::repository::Repository;
use jour_core::schedule::Planner;
use owo_colors::OwoColorize;
use uuid::Uuid;

use crate::views::table::display_day_view;

pub async fn show_today(repo: &impl Repository, user_id: Uuid) -> Result<()> {
    let today = Utc::now().date_naive();
    let planner = Planner::new(repo);
    let view = planner.view_for_date(user_id, today).await?;

    println!(
        "{} {} · {} of {} done",
        "Today,".bold(),
        today.format("%A %Y-%m-%d").to_string().bold(),
        view.completed_count(),
        view.total_count()
    );
    display_day_view(&view);
    Ok(())
}
