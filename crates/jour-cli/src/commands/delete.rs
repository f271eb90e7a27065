use anyhow::Result;
use jour_core::repository::Repository;
use owo_colors::OwoColorize;
use uuid::Uuid;

use crate::util::short_id;

pub async fn delete_task(repo: &impl Repository, definition_id: Uuid) -> Result<()> {
    repo.delete_definition(definition_id).await?;
    println!(
        "{} Deleted task {}",
        "✓".green().bold(),
        short_id(definition_id).yellow()
    );
    Ok(())
}
