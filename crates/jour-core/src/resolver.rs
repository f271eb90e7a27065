//! Occurrence resolution: which definitions exist on a given calendar date.
//!
//! Resolution is pure and synchronous. Definitions are partitioned once per
//! call (one-off vs. recurring, with recurring rules parsed up front), then
//! each requested date is answered from the partition. A recurring
//! definition is classified as recurring on every date it is active,
//! including the date its anchor happens to fall on; it never shows up in
//! the one-off set as well.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use tracing::warn;

use crate::dates::days_inclusive;
use crate::models::TaskDefinition;
use crate::recurrence::{IntegrityWarning, Recurrence};

/// The occurrences that exist on one calendar date.
#[derive(Debug, Clone, Default)]
pub struct DayOccurrences<'a> {
    /// One-off definitions planned exactly on this date.
    pub single: Vec<&'a TaskDefinition>,
    /// Recurring definitions whose rule is active on this date.
    pub recurring: Vec<&'a TaskDefinition>,
    /// Recurring rows whose stored rule failed to parse; they resolve as
    /// never active instead of failing the whole day.
    pub warnings: Vec<IntegrityWarning>,
}

impl<'a> DayOccurrences<'a> {
    pub fn total(&self) -> usize {
        self.single.len() + self.recurring.len()
    }

    pub fn is_empty(&self) -> bool {
        self.single.is_empty() && self.recurring.is_empty()
    }
}

/// Definitions split once so range resolution parses each rule a single
/// time instead of once per day.
struct Partitioned<'a> {
    dated_singles: Vec<(&'a TaskDefinition, NaiveDate)>,
    recurring: Vec<(&'a TaskDefinition, Recurrence, NaiveDate)>,
    warnings: Vec<IntegrityWarning>,
}

impl<'a> Partitioned<'a> {
    fn new(definitions: &'a [TaskDefinition]) -> Self {
        let mut dated_singles = Vec::new();
        let mut recurring = Vec::new();
        let mut warnings = Vec::new();

        for def in definitions {
            if !def.is_recurring {
                if let Some(date) = def.date_planned {
                    dated_singles.push((def, date));
                }
                continue;
            }
            match Recurrence::for_definition(def) {
                Ok(Some(rule)) => recurring.push((def, rule, def.anchor_date())),
                Ok(None) => {}
                Err(err) => {
                    warn!(
                        definition_id = %def.id,
                        title = %def.title,
                        error = %err,
                        "skipping definition with malformed recurrence rule"
                    );
                    warnings.push(IntegrityWarning::for_definition(def, &err));
                }
            }
        }

        Self {
            dated_singles,
            recurring,
            warnings,
        }
    }

    fn day(&self, date: NaiveDate) -> DayOccurrences<'a> {
        let single = self
            .dated_singles
            .iter()
            .filter(|(_, planned)| *planned == date)
            .map(|(def, _)| *def)
            .collect();
        let recurring = self
            .recurring
            .iter()
            .filter(|(_, rule, anchor)| rule.is_active_on(*anchor, date))
            .map(|(def, _, _)| *def)
            .collect();
        DayOccurrences {
            single,
            recurring,
            warnings: self.warnings.clone(),
        }
    }
}

/// Resolves the occurrences for a single date.
pub fn occurrences_for_date(
    date: NaiveDate,
    definitions: &[TaskDefinition],
) -> DayOccurrences<'_> {
    Partitioned::new(definitions).day(date)
}

/// Resolves every date from `start` through `end` inclusive. Cost is
/// O(days x definitions), fine for week- and month-sized windows.
pub fn occurrences_in_range(
    start: NaiveDate,
    end: NaiveDate,
    definitions: &[TaskDefinition],
) -> BTreeMap<NaiveDate, DayOccurrences<'_>> {
    let partitioned = Partitioned::new(definitions);
    days_inclusive(start, end)
        .map(|date| (date, partitioned.day(date)))
        .collect()
}
