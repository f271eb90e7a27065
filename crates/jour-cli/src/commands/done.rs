use anyhow::Result;
use chrono::Utc;
use jour_core::error::CoreError;
use jour_core::repository::Repository;
use jour_core::schedule::Planner;
use owo_colors::OwoColorize;

use crate::cli::DoneCommand;
use crate::parser::parse_natural_date;
use crate::util::resolve_definition_id;

pub async fn toggle_task(repo: &impl Repository, command: DoneCommand) -> Result<()> {
    let definition_id = resolve_definition_id(repo, &command.id).await?;
    let date = match command.date.as_deref() {
        Some(raw) => parse_natural_date(raw)?,
        None => Utc::now().date_naive(),
    };

    let definition = repo
        .find_definition_by_id(definition_id)
        .await?
        .ok_or_else(|| CoreError::NotFound(format!("No task definition '{}'", definition_id)))?;

    let planner = Planner::new(repo);
    let completed = planner.toggle(definition_id, date).await?;

    match (completed, definition.is_recurring) {
        (true, true) => println!(
            "{} Completed '{}' for {}",
            "✓".green().bold(),
            definition.title.bright_white(),
            date
        ),
        (true, false) => println!(
            "{} Completed '{}'",
            "✓".green().bold(),
            definition.title.bright_white()
        ),
        (false, true) => println!(
            "{} Reopened '{}' for {}",
            "↺".yellow().bold(),
            definition.title.bright_white(),
            date
        ),
        (false, false) => println!(
            "{} Reopened '{}'",
            "↺".yellow().bold(),
            definition.title.bright_white()
        ),
    }
    Ok(())
}
