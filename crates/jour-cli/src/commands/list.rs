use anyhow::Result;
use jour_core::models::DefinitionFilter;
use jour_core::repository::Repository;
use uuid::Uuid;

use crate::cli::ListCommand;
use crate::views::table::display_definitions;

pub async fn list_tasks(repo: &impl Repository, user_id: Uuid, command: ListCommand) -> Result<()> {
    let mut filters = Vec::new();

    if let Some(raw) = command.status.as_deref() {
        filters.push(DefinitionFilter::Status(raw.parse()?));
    }
    if let Some(raw) = command.priority.as_deref() {
        filters.push(DefinitionFilter::Priority(raw.parse()?));
    }
    if let Some(raw) = command.energy.as_deref() {
        filters.push(DefinitionFilter::Energy(raw.parse()?));
    }
    if let Some(category) = command.category.clone() {
        filters.push(DefinitionFilter::Category(category));
    }
    if let Some(context) = command.context.clone() {
        filters.push(DefinitionFilter::Context(context));
    }
    if let Some(term) = command.search.clone() {
        filters.push(DefinitionFilter::Search(term));
    }

    let definitions = if filters.is_empty() {
        repo.list_definitions(user_id).await?
    } else {
        repo.find_definitions(user_id, &filters).await?
    };

    display_definitions(&definitions);
    Ok(())
}
