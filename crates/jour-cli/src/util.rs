use anyhow::{anyhow, Result};
use jour_core::error::CoreError;
use jour_core::repository::Repository;
use uuid::Uuid;

/// Resolves a short ID prefix to the single definition it identifies.
pub async fn resolve_definition_id(repo: &impl Repository, short_id: &str) -> Result<Uuid> {
    if short_id.len() < 2 {
        return Err(anyhow!(CoreError::InvalidInput(
            "Short ID must be at least 2 characters long.".to_string()
        )));
    }
    let definitions = repo.find_definitions_by_short_id_prefix(short_id).await?;
    if definitions.len() == 1 {
        Ok(definitions[0].id)
    } else if definitions.is_empty() {
        Err(anyhow!(CoreError::NotFound(format!(
            "No task found with ID prefix '{}'",
            short_id
        ))))
    } else {
        let candidates: Vec<String> = definitions
            .into_iter()
            .map(|d| format!("{} ({})", d.id, d.title))
            .collect();
        Err(anyhow!(CoreError::InvalidInput(format!(
            "Ambiguous ID prefix '{}'. Did you mean one of these?\n  {}",
            short_id,
            candidates.join("\n  ")
        ))))
    }
}

/// The short form of an ID used across CLI output.
pub fn short_id(id: Uuid) -> String {
    id.to_string()[..8].to_string()
}
