use crate::error::CoreError;
use crate::events::{Change, ChangeEvent};
use crate::models::{
    DefinitionFilter, NewDefinitionData, TaskDefinition, TaskStatus, UpdateDefinitionData,
};
use crate::recurrence::Recurrence;
use crate::repository::SqliteRepository;
use async_trait::async_trait;
use chrono::{NaiveDate, Utc};
use sqlx::{QueryBuilder, Sqlite};
use tracing::debug;
use uuid::Uuid;

#[async_trait]
impl super::DefinitionRepository for SqliteRepository {
    async fn create_definition(
        &self,
        data: NewDefinitionData,
    ) -> Result<TaskDefinition, CoreError> {
        let title = data.title.trim();
        if title.is_empty() {
            return Err(CoreError::InvalidInput(
                "Title must not be empty.".to_string(),
            ));
        }

        // Recurrence is validated before anything is written; a malformed
        // rule never reaches the table.
        let recurrence = data
            .recurrence_rule
            .as_deref()
            .map(|rule| Recurrence::from_names(rule, &data.recurrence_days))
            .transpose()
            .map_err(|e| CoreError::InvalidInput(e.to_string()))?;

        let now = Utc::now();
        let definition = TaskDefinition {
            id: Uuid::new_v4(),
            user_id: data.user_id,
            title: title.to_string(),
            description: data.description,
            category: data.category,
            context: data.context,
            priority: data.priority.unwrap_or_default(),
            status: TaskStatus::Todo,
            date_planned: data.date_planned,
            time_planned: data.time_planned,
            duration_minutes: data.duration_minutes,
            energy_level: data.energy_level,
            goal_id: data.goal_id,
            is_recurring: recurrence.is_some(),
            recurrence_rule: recurrence.as_ref().map(|r| r.rule_name().to_string()),
            recurrence_days: recurrence.as_ref().and_then(|r| r.days_json()),
            reschedule_count: 0,
            created_at: now,
            updated_at: now,
        };

        sqlx::query(
            r#"INSERT INTO task_definitions (
                id, user_id, title, description, category, context, priority, status,
                date_planned, time_planned, duration_minutes, energy_level, goal_id,
                is_recurring, recurrence_rule, recurrence_days, reschedule_count,
                created_at, updated_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16, $17, $18, $19)
            "#,
        )
        .bind(definition.id)
        .bind(definition.user_id)
        .bind(&definition.title)
        .bind(&definition.description)
        .bind(&definition.category)
        .bind(&definition.context)
        .bind(definition.priority)
        .bind(definition.status)
        .bind(definition.date_planned)
        .bind(definition.time_planned)
        .bind(definition.duration_minutes)
        .bind(definition.energy_level)
        .bind(definition.goal_id)
        .bind(definition.is_recurring)
        .bind(&definition.recurrence_rule)
        .bind(&definition.recurrence_days)
        .bind(definition.reschedule_count)
        .bind(definition.created_at)
        .bind(definition.updated_at)
        .execute(self.pool())
        .await?;

        debug!(
            definition_id = %definition.id,
            recurring = definition.is_recurring,
            "created task definition"
        );
        self.events().publish(ChangeEvent {
            user_id: definition.user_id,
            change: Change::DefinitionCreated {
                definition_id: definition.id,
            },
        });
        Ok(definition)
    }

    async fn find_definition_by_id(&self, id: Uuid) -> Result<Option<TaskDefinition>, CoreError> {
        let definition = sqlx::query_as("SELECT * FROM task_definitions WHERE id = $1")
            .bind(id)
            .fetch_optional(self.pool())
            .await?;
        Ok(definition)
    }

    async fn find_definitions_by_short_id_prefix(
        &self,
        short_id: &str,
    ) -> Result<Vec<TaskDefinition>, CoreError> {
        // Ids are stored as 16-byte blobs; match the prefix against their
        // hex form, which is what users see once hyphens are stripped.
        let mut pattern = short_id.replace('-', "").to_uppercase();
        pattern.push('%');

        let definitions: Vec<TaskDefinition> =
            sqlx::query_as("SELECT * FROM task_definitions WHERE hex(id) LIKE $1")
                .bind(pattern)
                .fetch_all(self.pool())
                .await?;
        Ok(definitions)
    }

    async fn list_definitions(&self, user_id: Uuid) -> Result<Vec<TaskDefinition>, CoreError> {
        let definitions: Vec<TaskDefinition> = sqlx::query_as(
            "SELECT * FROM task_definitions WHERE user_id = $1 ORDER BY created_at ASC, id ASC",
        )
        .bind(user_id)
        .fetch_all(self.pool())
        .await?;
        Ok(definitions)
    }

    async fn find_definitions(
        &self,
        user_id: Uuid,
        filters: &[DefinitionFilter],
    ) -> Result<Vec<TaskDefinition>, CoreError> {
        let mut qb: QueryBuilder<Sqlite> =
            QueryBuilder::new("SELECT * FROM task_definitions WHERE user_id = ");
        qb.push_bind(user_id);

        for filter in filters {
            match filter {
                DefinitionFilter::Status(status) => {
                    qb.push(" AND status = ");
                    qb.push_bind(*status);
                }
                DefinitionFilter::Category(category) => {
                    qb.push(" AND category = ");
                    qb.push_bind(category.clone());
                }
                DefinitionFilter::Context(context) => {
                    qb.push(" AND context = ");
                    qb.push_bind(context.clone());
                }
                DefinitionFilter::Priority(priority) => {
                    qb.push(" AND priority = ");
                    qb.push_bind(*priority);
                }
                DefinitionFilter::Energy(energy) => {
                    qb.push(" AND energy_level = ");
                    qb.push_bind(*energy);
                }
                DefinitionFilter::Search(needle) => {
                    let pattern = format!("%{}%", needle.to_lowercase());
                    qb.push(" AND (LOWER(title) LIKE ");
                    qb.push_bind(pattern.clone());
                    qb.push(" OR LOWER(COALESCE(description, '')) LIKE ");
                    qb.push_bind(pattern);
                    qb.push(")");
                }
            }
        }

        qb.push(" ORDER BY created_at ASC, id ASC");

        let definitions = qb.build_query_as().fetch_all(self.pool()).await?;
        Ok(definitions)
    }

    async fn update_definition(
        &self,
        id: Uuid,
        data: UpdateDefinitionData,
    ) -> Result<TaskDefinition, CoreError> {
        let mut tx = self.pool().begin().await?;

        let current: TaskDefinition =
            sqlx::query_as("SELECT * FROM task_definitions WHERE id = $1")
                .bind(id)
                .fetch_optional(&mut *tx)
                .await?
                .ok_or_else(|| CoreError::NotFound(format!("No task definition '{}'", id)))?;

        // The rule and day set after this update, revalidated as a pair:
        // an update may not leave a custom rule without days behind.
        let rule_after = match &data.recurrence_rule {
            Some(rule) => rule.clone(),
            None => current.recurrence_rule.clone(),
        };
        let recurrence = match rule_after.as_deref() {
            Some(rule) => Some(
                match &data.recurrence_days {
                    Some(names) => Recurrence::from_names(rule, names),
                    None => Recurrence::from_parts(rule, current.recurrence_days.as_deref()),
                }
                .map_err(|e| CoreError::InvalidInput(e.to_string()))?,
            ),
            None => None,
        };
        let recurrence_touched =
            data.recurrence_rule.is_some() || data.recurrence_days.is_some();

        let mut qb: QueryBuilder<Sqlite> = QueryBuilder::new("UPDATE task_definitions SET ");
        let mut updated = false;

        if let Some(title) = &data.title {
            if title.trim().is_empty() {
                return Err(CoreError::InvalidInput(
                    "Title must not be empty.".to_string(),
                ));
            }
            qb.push("title = ");
            qb.push_bind(title.trim().to_string());
            updated = true;
        }

        if let Some(description) = &data.description {
            if updated {
                qb.push(", ");
            }
            qb.push("description = ");
            qb.push_bind(description.clone());
            updated = true;
        }

        if let Some(category) = &data.category {
            if updated {
                qb.push(", ");
            }
            qb.push("category = ");
            qb.push_bind(category.clone());
            updated = true;
        }

        if let Some(context) = &data.context {
            if updated {
                qb.push(", ");
            }
            qb.push("context = ");
            qb.push_bind(context.clone());
            updated = true;
        }

        if let Some(priority) = &data.priority {
            if updated {
                qb.push(", ");
            }
            qb.push("priority = ");
            qb.push_bind(*priority);
            updated = true;
        }

        if let Some(status) = &data.status {
            if updated {
                qb.push(", ");
            }
            qb.push("status = ");
            qb.push_bind(*status);
            updated = true;
        }

        if let Some(date_planned) = &data.date_planned {
            if updated {
                qb.push(", ");
            }
            qb.push("date_planned = ");
            qb.push_bind(*date_planned);
            updated = true;
        }

        if let Some(time_planned) = &data.time_planned {
            if updated {
                qb.push(", ");
            }
            qb.push("time_planned = ");
            qb.push_bind(*time_planned);
            updated = true;
        }

        if let Some(duration_minutes) = &data.duration_minutes {
            if updated {
                qb.push(", ");
            }
            qb.push("duration_minutes = ");
            qb.push_bind(*duration_minutes);
            updated = true;
        }

        if let Some(energy_level) = &data.energy_level {
            if updated {
                qb.push(", ");
            }
            qb.push("energy_level = ");
            qb.push_bind(*energy_level);
            updated = true;
        }

        if let Some(goal_id) = &data.goal_id {
            if updated {
                qb.push(", ");
            }
            qb.push("goal_id = ");
            qb.push_bind(*goal_id);
            updated = true;
        }

        if recurrence_touched {
            if updated {
                qb.push(", ");
            }
            qb.push("is_recurring = ");
            qb.push_bind(recurrence.is_some());
            qb.push(", recurrence_rule = ");
            qb.push_bind(recurrence.as_ref().map(|r| r.rule_name().to_string()));
            qb.push(", recurrence_days = ");
            qb.push_bind(recurrence.as_ref().and_then(|r| r.days_json()));
            updated = true;
        }

        if !updated {
            tx.commit().await?;
            return Ok(current);
        }

        qb.push(", updated_at = ");
        qb.push_bind(Utc::now());
        qb.push(" WHERE id = ");
        qb.push_bind(id);
        qb.build().execute(&mut *tx).await?;

        let definition: TaskDefinition =
            sqlx::query_as("SELECT * FROM task_definitions WHERE id = $1")
                .bind(id)
                .fetch_one(&mut *tx)
                .await?;

        tx.commit().await?;

        self.events().publish(ChangeEvent {
            user_id: definition.user_id,
            change: Change::DefinitionUpdated {
                definition_id: definition.id,
            },
        });
        Ok(definition)
    }

    async fn postpone_definition(
        &self,
        id: Uuid,
        to: Option<NaiveDate>,
    ) -> Result<TaskDefinition, CoreError> {
        let mut tx = self.pool().begin().await?;

        let current: TaskDefinition =
            sqlx::query_as("SELECT * FROM task_definitions WHERE id = $1")
                .bind(id)
                .fetch_optional(&mut *tx)
                .await?
                .ok_or_else(|| CoreError::NotFound(format!("No task definition '{}'", id)))?;

        if current.is_recurring {
            return Err(CoreError::InvalidInput(
                "Recurring definitions cannot be postponed; edit the rule instead.".to_string(),
            ));
        }

        let new_date = match to {
            Some(date) => date,
            None => current
                .date_planned
                .ok_or_else(|| {
                    CoreError::InvalidInput(
                        "Definition has no planned date to postpone from.".to_string(),
                    )
                })?
                .succ_opt()
                .ok_or_else(|| {
                    CoreError::InvalidInput("Planned date is out of range.".to_string())
                })?,
        };

        let definition: TaskDefinition = sqlx::query_as(
            r#"UPDATE task_definitions
            SET date_planned = $1, reschedule_count = reschedule_count + 1, updated_at = $2
            WHERE id = $3
            RETURNING *
            "#,
        )
        .bind(new_date)
        .bind(Utc::now())
        .bind(id)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;

        debug!(definition_id = %id, date = %new_date, "postponed task definition");
        self.events().publish(ChangeEvent {
            user_id: definition.user_id,
            change: Change::DefinitionUpdated {
                definition_id: definition.id,
            },
        });
        Ok(definition)
    }

    async fn delete_definition(&self, id: Uuid) -> Result<(), CoreError> {
        let definition: TaskDefinition =
            sqlx::query_as("SELECT * FROM task_definitions WHERE id = $1")
                .bind(id)
                .fetch_optional(self.pool())
                .await?
                .ok_or_else(|| CoreError::NotFound(format!("No task definition '{}'", id)))?;

        // Completion records go with it via ON DELETE CASCADE.
        sqlx::query("DELETE FROM task_definitions WHERE id = $1")
            .bind(id)
            .execute(self.pool())
            .await?;

        self.events().publish(ChangeEvent {
            user_id: definition.user_id,
            change: Change::DefinitionDeleted {
                definition_id: id,
            },
        });
        Ok(())
    }
}
