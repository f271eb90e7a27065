//! Day-planner views over resolved occurrences and completion state.
//!
//! [`Planner`] is the one surface other subsystems call for schedule data.
//! It merges the resolver's per-date occurrences with completion evidence
//! into a single sorted [`DayView`]; callers never combine raw rows
//! themselves, so recurrence semantics stay in one place.

use std::cmp::Ordering;
use std::collections::{BTreeMap, HashSet};

use chrono::NaiveDate;
use serde::Serialize;
use uuid::Uuid;

use crate::error::CoreError;
use crate::events::ChangeStream;
use crate::models::{TaskDefinition, TaskStatus};
use crate::recurrence::IntegrityWarning;
use crate::repository::Repository;
use crate::resolver;

/// A single scheduled instance of a definition on a concrete date.
///
/// Occurrences are derived values; only definitions and completion records
/// are stored. The same definition yields a fresh occurrence per date it is
/// active on.
#[derive(Debug, Clone, Serialize)]
pub struct Occurrence {
    pub definition: TaskDefinition,
    pub date: NaiveDate,
    /// True when this instance was produced by a recurrence rule rather
    /// than a planned date.
    pub recurring: bool,
    pub completed: bool,
}

/// Everything scheduled on one date, sorted for display.
#[derive(Debug, Clone, Serialize)]
pub struct DayView {
    pub date: NaiveDate,
    pub occurrences: Vec<Occurrence>,
    /// Recurring rows whose stored rule failed to parse on this fetch.
    pub warnings: Vec<IntegrityWarning>,
}

impl DayView {
    pub fn total_count(&self) -> usize {
        self.occurrences.len()
    }

    pub fn completed_count(&self) -> usize {
        self.occurrences.iter().filter(|o| o.completed).count()
    }

    pub fn open_count(&self) -> usize {
        self.total_count() - self.completed_count()
    }

    /// One-off entries, in display order.
    pub fn regular(&self) -> impl Iterator<Item = &Occurrence> {
        self.occurrences.iter().filter(|o| !o.recurring)
    }

    /// Rule-derived entries, in display order.
    pub fn recurring(&self) -> impl Iterator<Item = &Occurrence> {
        self.occurrences.iter().filter(|o| o.recurring)
    }
}

/// Per-day completion tally for range summaries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DayCounts {
    pub total: usize,
    pub completed: usize,
}

impl DayCounts {
    pub fn open(&self) -> usize {
        self.total - self.completed
    }
}

/// Display order, uniform across every view: entries with a planned time
/// come first in clock order, untimed entries after; ties fall back to
/// priority (high before low), then to creation order.
fn occurrence_order(a: &Occurrence, b: &Occurrence) -> Ordering {
    let by_time = match (a.definition.time_planned, b.definition.time_planned) {
        (Some(a_time), Some(b_time)) => a_time.cmp(&b_time),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    };
    by_time
        .then_with(|| {
            b.definition
                .priority
                .weight()
                .cmp(&a.definition.priority.weight())
        })
        .then_with(|| a.definition.created_at.cmp(&b.definition.created_at))
        .then_with(|| a.definition.id.cmp(&b.definition.id))
}

/// Read API over a repository: sorted day views, range tallies, and the
/// completion toggle. Borrows the repository; cheap to construct per call
/// site.
pub struct Planner<'a, R: Repository + ?Sized> {
    repo: &'a R,
}

impl<'a, R: Repository + ?Sized> Planner<'a, R> {
    pub fn new(repo: &'a R) -> Self {
        Self { repo }
    }

    /// Resolves and sorts everything scheduled for `date`.
    ///
    /// One-off entries report completion from their own status; recurring
    /// entries from the completion record for exactly this date.
    pub async fn view_for_date(
        &self,
        user_id: Uuid,
        date: NaiveDate,
    ) -> Result<DayView, CoreError> {
        let definitions = self.repo.list_definitions(user_id).await?;
        let resolved = resolver::occurrences_for_date(date, &definitions);
        let completed: HashSet<Uuid> = self
            .repo
            .completed_definitions_on(user_id, date)
            .await?
            .into_iter()
            .collect();

        let mut occurrences = Vec::with_capacity(resolved.total());
        for def in resolved.single {
            occurrences.push(Occurrence {
                completed: def.status == TaskStatus::Done,
                recurring: false,
                date,
                definition: def.clone(),
            });
        }
        for def in resolved.recurring {
            occurrences.push(Occurrence {
                completed: completed.contains(&def.id),
                recurring: true,
                date,
                definition: def.clone(),
            });
        }
        occurrences.sort_by(occurrence_order);

        Ok(DayView {
            date,
            occurrences,
            warnings: resolved.warnings,
        })
    }

    /// Per-day completed/total tallies over an inclusive date range, for
    /// week and month summaries. Days without occurrences still appear,
    /// with zero counts.
    pub async fn counts_for_range(
        &self,
        user_id: Uuid,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<BTreeMap<NaiveDate, DayCounts>, CoreError> {
        let definitions = self.repo.list_definitions(user_id).await?;
        let by_day = resolver::occurrences_in_range(start, end, &definitions);
        let evidence: HashSet<(Uuid, NaiveDate)> = self
            .repo
            .completions_in_range(user_id, start, end)
            .await?
            .into_iter()
            .map(|r| (r.definition_id, r.completed_on))
            .collect();

        let mut counts = BTreeMap::new();
        for (date, day) in by_day {
            let completed = day
                .single
                .iter()
                .filter(|d| d.status == TaskStatus::Done)
                .count()
                + day
                    .recurring
                    .iter()
                    .filter(|d| evidence.contains(&(d.id, date)))
                    .count();
            counts.insert(
                date,
                DayCounts {
                    total: day.total(),
                    completed,
                },
            );
        }
        Ok(counts)
    }

    /// Flips completion for one occurrence; see
    /// [`CompletionRepository::toggle_completion`](crate::repository::CompletionRepository::toggle_completion).
    pub async fn toggle(&self, definition_id: Uuid, date: NaiveDate) -> Result<bool, CoreError> {
        self.repo.toggle_completion(definition_id, date).await
    }

    pub async fn is_completed(
        &self,
        definition_id: Uuid,
        date: NaiveDate,
    ) -> Result<bool, CoreError> {
        self.repo.is_completed(definition_id, date).await
    }

    /// Post-commit change events for one user's data.
    pub fn changes(&self, user_id: Uuid) -> ChangeStream {
        self.repo.subscribe(user_id)
    }
}
