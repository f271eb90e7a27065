//! # Jour Core Library
//!
//! A day-planner engine built around calendar recurrence and per-date
//! completion tracking: definitions are stored once, occurrences are cheap
//! derived views.
//!
//! ## Features
//!
//! - **Named Recurrence Rules**: daily, weekly, monthly, yearly, and custom
//!   weekday sets, evaluated as pure functions over calendar dates
//! - **Per-Date Completion**: recurring tasks complete one occurrence at a
//!   time, backed by a uniqueness constraint that absorbs concurrent toggles
//! - **Sorted Day Views**: one display order everywhere; planned time, then
//!   priority, then creation order
//! - **Change Notifications**: per-user broadcast of post-commit mutations
//! - **Fault-Tolerant Resolution**: malformed stored rules degrade to
//!   "never active" with a warning instead of failing the whole view
//!
//! ## Core Modules
//!
//! - [`db`]: Database connection and migration management
//! - [`models`]: Core data structures and transfer objects
//! - [`repository`]: Data access layer with Repository pattern
//! - [`recurrence`]: Recurrence rules and their evaluation
//! - [`resolver`]: Date-to-occurrence resolution over definition sets
//! - [`schedule`]: Sorted day views and completion toggling
//! - [`events`]: Per-user change feed
//! - [`dates`]: Small calendar helpers shared across modules
//! - [`error`]: Error types with context
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use jour_core::{
//!     db,
//!     models::NewDefinitionData,
//!     repository::{DefinitionRepository, SqliteRepository},
//!     schedule::Planner,
//! };
//!
//! #[tokio::main]
//! async fn main() -> Result<(), jour_core::error::CoreError> {
//!     // Initialize database
//!     let pool = db::establish_connection("jour.db").await?;
//!     let repo = SqliteRepository::new(pool);
//!
//!     // Add a daily recurring definition
//!     let data = NewDefinitionData {
//!         title: "Morning pages".to_string(),
//!         recurrence_rule: Some("daily".to_string()),
//!         ..Default::default()
//!     };
//!     let definition = repo.create_definition(data).await?;
//!     println!("Created definition: {}", definition.title);
//!
//!     // Resolve today's schedule
//!     let planner = Planner::new(&repo);
//!     let today = chrono::Utc::now().date_naive();
//!     let view = planner.view_for_date(definition.user_id, today).await?;
//!     println!("{} scheduled today", view.total_count());
//!
//!     Ok(())
//! }
//! ```

pub mod dates;
pub mod db;
pub mod error;
pub mod events;
pub mod models;
pub mod recurrence;
pub mod repository;
pub mod resolver;
pub mod schedule;
