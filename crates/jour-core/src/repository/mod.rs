use crate::db::DbPool;
use crate::error::CoreError;
use crate::events::{ChangeFeed, ChangeStream};
use crate::models::{
    CompletionRecord, DefinitionFilter, NewDefinitionData, TaskDefinition, UpdateDefinitionData,
};
use async_trait::async_trait;
use chrono::NaiveDate;
use uuid::Uuid;

// Domain modules implement the traits below on SqliteRepository
pub mod completions;
pub mod definitions;

/// Domain-specific trait for task-definition storage.
#[async_trait]
pub trait DefinitionRepository {
    /// Validates and persists a new definition. Recurrence fields are
    /// checked before anything is written.
    async fn create_definition(&self, data: NewDefinitionData) -> Result<TaskDefinition, CoreError>;
    async fn find_definition_by_id(&self, id: Uuid) -> Result<Option<TaskDefinition>, CoreError>;
    async fn find_definitions_by_short_id_prefix(
        &self,
        short_id: &str,
    ) -> Result<Vec<TaskDefinition>, CoreError>;
    /// Every definition of a user, ordered by creation; the stable ordering
    /// the planner's final tiebreak relies on.
    async fn list_definitions(&self, user_id: Uuid) -> Result<Vec<TaskDefinition>, CoreError>;
    async fn find_definitions(
        &self,
        user_id: Uuid,
        filters: &[DefinitionFilter],
    ) -> Result<Vec<TaskDefinition>, CoreError>;
    async fn update_definition(
        &self,
        id: Uuid,
        data: UpdateDefinitionData,
    ) -> Result<TaskDefinition, CoreError>;
    /// Moves a one-off definition's planned date forward and bumps its
    /// reschedule counter. Recurring templates cannot be postponed.
    async fn postpone_definition(
        &self,
        id: Uuid,
        to: Option<NaiveDate>,
    ) -> Result<TaskDefinition, CoreError>;
    async fn delete_definition(&self, id: Uuid) -> Result<(), CoreError>;
}

/// Domain-specific trait for per-date completion evidence.
#[async_trait]
pub trait CompletionRepository {
    /// Flips completion for (definition, date) and returns the new state.
    /// Recurring: deletes the record if present, otherwise upserts one.
    /// One-off: flips the definition status between done and todo.
    async fn toggle_completion(
        &self,
        definition_id: Uuid,
        date: NaiveDate,
    ) -> Result<bool, CoreError>;
    async fn is_completed(&self, definition_id: Uuid, date: NaiveDate) -> Result<bool, CoreError>;
    /// Ids of definitions with completion evidence on `date`.
    async fn completed_definitions_on(
        &self,
        user_id: Uuid,
        date: NaiveDate,
    ) -> Result<Vec<Uuid>, CoreError>;
    async fn completions_in_range(
        &self,
        user_id: Uuid,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<CompletionRecord>, CoreError>;
}

/// Change-notification surface of a store.
pub trait ChangeSource {
    /// Subscribes to one user's post-commit change events.
    fn subscribe(&self, user_id: Uuid) -> ChangeStream;
}

/// Main repository trait that composes all domain traits
#[async_trait]
pub trait Repository:
    DefinitionRepository + CompletionRepository + ChangeSource + Send + Sync
{
    // Individual operations are defined in the domain-specific traits
}

/// SQLite implementation of the repository pattern
pub struct SqliteRepository {
    pool: DbPool,
    events: ChangeFeed,
}

impl SqliteRepository {
    pub fn new(pool: DbPool) -> Self {
        Self {
            pool,
            events: ChangeFeed::new(),
        }
    }

    /// Get a reference to the database pool for internal use across modules
    pub(crate) fn pool(&self) -> &DbPool {
        &self.pool
    }

    pub(crate) fn events(&self) -> &ChangeFeed {
        &self.events
    }
}

impl ChangeSource for SqliteRepository {
    fn subscribe(&self, user_id: Uuid) -> ChangeStream {
        self.events.subscribe(user_id)
    }
}

impl Repository for SqliteRepository {}
