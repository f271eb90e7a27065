use anyhow::Result;
use jour_core::repository::Repository;
use owo_colors::OwoColorize;

use crate::cli::PostponeCommand;
use crate::parser::parse_natural_date;
use crate::util::resolve_definition_id;

pub async fn postpone_task(repo: &impl Repository, command: PostponeCommand) -> Result<()> {
    let definition_id = resolve_definition_id(repo, &command.id).await?;
    let to = command.to.as_deref().map(parse_natural_date).transpose()?;

    let definition = repo.postpone_definition(definition_id, to).await?;
    let new_date = definition
        .date_planned
        .map(|date| date.to_string())
        .unwrap_or_else(|| "-".to_string());

    println!(
        "{} Postponed '{}' to {} (reschedule #{})",
        "→".blue().bold(),
        definition.title.bright_white(),
        new_date.cyan(),
        definition.reschedule_count
    );
    Ok(())
}
