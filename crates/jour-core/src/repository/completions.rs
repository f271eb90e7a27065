use crate::error::CoreError;
use crate::events::{Change, ChangeEvent};
use crate::models::{CompletionRecord, TaskDefinition, TaskStatus};
use crate::repository::SqliteRepository;
use async_trait::async_trait;
use chrono::{NaiveDate, Utc};
use tracing::debug;
use uuid::Uuid;

#[async_trait]
impl super::CompletionRepository for SqliteRepository {
    async fn toggle_completion(
        &self,
        definition_id: Uuid,
        date: NaiveDate,
    ) -> Result<bool, CoreError> {
        let mut tx = self.pool().begin().await?;

        let definition: TaskDefinition =
            sqlx::query_as("SELECT * FROM task_definitions WHERE id = $1")
                .bind(definition_id)
                .fetch_optional(&mut *tx)
                .await?
                .ok_or_else(|| {
                    CoreError::NotFound(format!("No task definition '{}'", definition_id))
                })?;

        let completed = if definition.is_recurring {
            // Delete first: existing evidence for this date is cleared and
            // the toggle lands on "open". Otherwise insert, and let the
            // unique (definition_id, completed_on) pair absorb a concurrent
            // mark for the same day instead of raising a constraint error.
            let cleared = sqlx::query(
                "DELETE FROM completion_records WHERE definition_id = $1 AND completed_on = $2",
            )
            .bind(definition_id)
            .bind(date)
            .execute(&mut *tx)
            .await?
            .rows_affected();

            if cleared > 0 {
                false
            } else {
                sqlx::query(
                    r#"INSERT INTO completion_records (id, definition_id, user_id, completed_on, completed_at)
                    VALUES ($1, $2, $3, $4, $5)
                    ON CONFLICT (definition_id, completed_on)
                    DO UPDATE SET completed_at = excluded.completed_at
                    "#,
                )
                .bind(Uuid::new_v4())
                .bind(definition_id)
                .bind(definition.user_id)
                .bind(date)
                .bind(Utc::now())
                .execute(&mut *tx)
                .await?;
                true
            }
        } else {
            // One-off definitions carry completion on their own status.
            let (next_status, completed) = match definition.status {
                TaskStatus::Done => (TaskStatus::Todo, false),
                _ => (TaskStatus::Done, true),
            };
            sqlx::query("UPDATE task_definitions SET status = $1, updated_at = $2 WHERE id = $3")
                .bind(next_status)
                .bind(Utc::now())
                .bind(definition_id)
                .execute(&mut *tx)
                .await?;
            completed
        };

        tx.commit().await?;

        debug!(
            definition_id = %definition_id,
            date = %date,
            completed,
            "toggled completion"
        );
        self.events().publish(ChangeEvent {
            user_id: definition.user_id,
            change: Change::CompletionToggled {
                definition_id,
                date,
                completed,
            },
        });
        Ok(completed)
    }

    async fn is_completed(&self, definition_id: Uuid, date: NaiveDate) -> Result<bool, CoreError> {
        let definition: TaskDefinition =
            sqlx::query_as("SELECT * FROM task_definitions WHERE id = $1")
                .bind(definition_id)
                .fetch_optional(self.pool())
                .await?
                .ok_or_else(|| {
                    CoreError::NotFound(format!("No task definition '{}'", definition_id))
                })?;

        if !definition.is_recurring {
            return Ok(definition.status == TaskStatus::Done);
        }

        let record: Option<CompletionRecord> = sqlx::query_as(
            "SELECT * FROM completion_records WHERE definition_id = $1 AND completed_on = $2",
        )
        .bind(definition_id)
        .bind(date)
        .fetch_optional(self.pool())
        .await?;
        Ok(record.is_some())
    }

    async fn completed_definitions_on(
        &self,
        user_id: Uuid,
        date: NaiveDate,
    ) -> Result<Vec<Uuid>, CoreError> {
        let ids: Vec<(Uuid,)> = sqlx::query_as(
            "SELECT definition_id FROM completion_records WHERE user_id = $1 AND completed_on = $2",
        )
        .bind(user_id)
        .bind(date)
        .fetch_all(self.pool())
        .await?;
        Ok(ids.into_iter().map(|(id,)| id).collect())
    }

    async fn completions_in_range(
        &self,
        user_id: Uuid,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<CompletionRecord>, CoreError> {
        // completed_on is stored as ISO-8601 text, so BETWEEN compares
        // dates correctly.
        let records: Vec<CompletionRecord> = sqlx::query_as(
            r#"SELECT * FROM completion_records
            WHERE user_id = $1 AND completed_on BETWEEN $2 AND $3
            ORDER BY completed_on ASC
            "#,
        )
        .bind(user_id)
        .bind(start)
        .bind(end)
        .fetch_all(self.pool())
        .await?;
        Ok(records)
    }
}
