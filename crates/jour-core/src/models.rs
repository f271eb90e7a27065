use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::str::FromStr;
use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, sqlx::Type)]
#[sqlx(type_name = "TEXT", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    Todo,
    InProgress,
    Done,
    Cancelled,
}

#[derive(Error, Debug, PartialEq)]
#[error("Invalid task status: {0}")]
pub struct ParseTaskStatusError(String);

impl FromStr for TaskStatus {
    type Err = ParseTaskStatusError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "todo" => Ok(TaskStatus::Todo),
            "in_progress" | "in-progress" => Ok(TaskStatus::InProgress),
            "done" => Ok(TaskStatus::Done),
            "cancelled" => Ok(TaskStatus::Cancelled),
            _ => Err(ParseTaskStatusError(s.to_string())),
        }
    }
}

impl std::fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TaskStatus::Todo => write!(f, "todo"),
            TaskStatus::InProgress => write!(f, "in_progress"),
            TaskStatus::Done => write!(f, "done"),
            TaskStatus::Cancelled => write!(f, "cancelled"),
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, sqlx::Type)]
#[sqlx(type_name = "TEXT", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Low,
    Medium,
    High,
}

impl Priority {
    /// Weight used for descending priority ordering (high sorts first).
    pub fn weight(&self) -> u8 {
        match self {
            Priority::High => 3,
            Priority::Medium => 2,
            Priority::Low => 1,
        }
    }
}

impl Default for Priority {
    fn default() -> Self {
        Priority::Medium
    }
}

#[derive(Error, Debug, PartialEq)]
#[error("Invalid priority: {0}")]
pub struct ParsePriorityError(String);

impl FromStr for Priority {
    type Err = ParsePriorityError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "low" => Ok(Priority::Low),
            "medium" => Ok(Priority::Medium),
            "high" => Ok(Priority::High),
            _ => Err(ParsePriorityError(s.to_string())),
        }
    }
}

impl std::fmt::Display for Priority {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Priority::Low => write!(f, "low"),
            Priority::Medium => write!(f, "medium"),
            Priority::High => write!(f, "high"),
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, sqlx::Type)]
#[sqlx(type_name = "TEXT", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum EnergyLevel {
    Low,
    Medium,
    High,
}

#[derive(Error, Debug, PartialEq)]
#[error("Invalid energy level: {0}")]
pub struct ParseEnergyLevelError(String);

impl FromStr for EnergyLevel {
    type Err = ParseEnergyLevelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "low" => Ok(EnergyLevel::Low),
            "medium" => Ok(EnergyLevel::Medium),
            "high" => Ok(EnergyLevel::High),
            _ => Err(ParseEnergyLevelError(s.to_string())),
        }
    }
}

impl std::fmt::Display for EnergyLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EnergyLevel::Low => write!(f, "low"),
            EnergyLevel::Medium => write!(f, "medium"),
            EnergyLevel::High => write!(f, "high"),
        }
    }
}

/// A stored task: either a one-off (single `date_planned`) or a recurring
/// template whose occurrences are derived per date, never persisted.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct TaskDefinition {
    pub id: Uuid,
    pub user_id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub category: Option<String>,
    pub context: Option<String>,
    pub priority: Priority,
    pub status: TaskStatus,
    pub date_planned: Option<NaiveDate>,
    pub time_planned: Option<NaiveTime>,
    pub duration_minutes: Option<i64>,
    pub energy_level: Option<EnergyLevel>,
    /// Weak reference to a goal; the goal subsystem lives elsewhere.
    pub goal_id: Option<Uuid>,
    pub is_recurring: bool,
    /// Raw rule name as stored (daily/weekly/monthly/yearly/custom).
    /// Parsed and validated by the recurrence module.
    pub recurrence_rule: Option<String>,
    /// JSON array of lowercase weekday names, set iff the rule is custom.
    pub recurrence_days: Option<String>,
    pub reschedule_count: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl TaskDefinition {
    /// The date a recurring rule's phase is derived from. When a template
    /// has no planned date the creation date stands in, so weekly/monthly/
    /// yearly rules always have a phase to work with.
    pub fn anchor_date(&self) -> NaiveDate {
        self.date_planned
            .unwrap_or_else(|| self.created_at.date_naive())
    }
}

impl Default for TaskDefinition {
    fn default() -> Self {
        Self {
            id: Uuid::new_v4(),
            user_id: Uuid::nil(),
            title: "".to_string(),
            description: None,
            category: None,
            context: None,
            priority: Priority::default(),
            status: TaskStatus::Todo,
            date_planned: None,
            time_planned: None,
            duration_minutes: None,
            energy_level: None,
            goal_id: None,
            is_recurring: false,
            recurrence_rule: None,
            recurrence_days: None,
            reschedule_count: 0,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }
}

/// Per-date completion evidence for a recurring occurrence. Row existence is
/// the completed flag: records are created on mark-done and deleted on
/// mark-undone, so no row ever represents `false`.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct CompletionRecord {
    pub id: Uuid,
    pub definition_id: Uuid,
    pub user_id: Uuid,
    pub completed_on: NaiveDate,
    pub completed_at: DateTime<Utc>,
}

/// Represents a filter for listing task definitions.
#[derive(Debug, Clone)]
pub enum DefinitionFilter {
    Status(TaskStatus),
    Category(String),
    Context(String),
    Priority(Priority),
    Energy(EnergyLevel),
    /// Case-insensitive substring match over title and description.
    Search(String),
}

#[derive(Debug, Clone, Default)]
pub struct NewDefinitionData {
    pub user_id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub category: Option<String>,
    pub context: Option<String>,
    pub priority: Option<Priority>,
    pub date_planned: Option<NaiveDate>,
    pub time_planned: Option<NaiveTime>,
    pub duration_minutes: Option<i64>,
    pub energy_level: Option<EnergyLevel>,
    pub goal_id: Option<Uuid>,
    /// When present the definition is recurring and this is its rule name;
    /// validated before persistence.
    pub recurrence_rule: Option<String>,
    /// Weekday names for a custom rule (e.g. "monday"); ignored otherwise.
    pub recurrence_days: Vec<String>,
}

#[derive(Debug, Clone, Default)]
pub struct UpdateDefinitionData {
    pub title: Option<String>,
    pub description: Option<Option<String>>,
    pub category: Option<Option<String>>,
    pub context: Option<Option<String>>,
    pub priority: Option<Priority>,
    pub status: Option<TaskStatus>,
    pub date_planned: Option<Option<NaiveDate>>,
    pub time_planned: Option<Option<NaiveTime>>,
    pub duration_minutes: Option<Option<i64>>,
    pub energy_level: Option<Option<EnergyLevel>>,
    pub goal_id: Option<Option<Uuid>>,
    /// `Some(None)` clears the rule and turns the definition one-off.
    pub recurrence_rule: Option<Option<String>>,
    pub recurrence_days: Option<Vec<String>>,
}
