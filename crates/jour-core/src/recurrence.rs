//! Recurrence rule parsing and evaluation.
//!
//! A recurring definition stores its rule as text (`daily`, `weekly`,
//! `monthly`, `yearly`, `custom`) plus, for custom rules, a JSON array of
//! weekday names. [`Recurrence::from_parts`] turns that stored form into a
//! typed rule exactly once, at the validation boundary: repositories call it
//! before persisting and the resolver calls it before evaluating, so a rule
//! that reaches [`Recurrence::is_active_on`] is always well formed.
//!
//! Evaluation itself is a pure, total function over calendar dates. A
//! malformed stored rule never panics or errors out of the resolver; it
//! degrades to "never active" and surfaces as an [`IntegrityWarning`].

use chrono::{Datelike, NaiveDate, Weekday};
use serde::Serialize;
use thiserror::Error;
use uuid::Uuid;

use crate::dates::weekday_name;
use crate::models::TaskDefinition;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum RecurrenceError {
    #[error("Unknown recurrence rule '{0}'")]
    UnknownRule(String),

    #[error("Definition is flagged recurring but stores no rule")]
    MissingRule,

    #[error("Custom recurrence requires at least one weekday")]
    EmptyCustomDays,

    #[error("Invalid weekday name '{0}'")]
    InvalidWeekday(String),

    #[error("Recurrence days are not a JSON array of strings: {0}")]
    MalformedDayList(String),
}

/// A validated recurrence rule. Custom day sets are kept sorted
/// Monday-first and deduplicated, so equal rules compare equal and
/// serialize identically.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Recurrence {
    Daily,
    Weekly,
    Monthly,
    Yearly,
    Custom(Vec<Weekday>),
}

impl Recurrence {
    /// Parses the stored form of a rule: the rule name plus the raw
    /// `recurrence_days` column (JSON array of weekday names, only
    /// meaningful for custom rules).
    pub fn from_parts(rule: &str, days_json: Option<&str>) -> Result<Self, RecurrenceError> {
        match rule.trim().to_lowercase().as_str() {
            "daily" => Ok(Recurrence::Daily),
            "weekly" => Ok(Recurrence::Weekly),
            "monthly" => Ok(Recurrence::Monthly),
            "yearly" => Ok(Recurrence::Yearly),
            "custom" => {
                let raw = days_json.ok_or(RecurrenceError::EmptyCustomDays)?;
                let names: Vec<String> = serde_json::from_str(raw)
                    .map_err(|e| RecurrenceError::MalformedDayList(e.to_string()))?;
                Self::custom_from_names(&names)
            }
            other => Err(RecurrenceError::UnknownRule(other.to_string())),
        }
    }

    /// Parses a rule from user-facing inputs (rule name + weekday names),
    /// the form arriving through create/update DTOs.
    pub fn from_names(rule: &str, days: &[String]) -> Result<Self, RecurrenceError> {
        match rule.trim().to_lowercase().as_str() {
            "custom" => Self::custom_from_names(days),
            other => Self::from_parts(other, None),
        }
    }

    /// The typed rule of a definition, `None` when it is not recurring.
    pub fn for_definition(def: &TaskDefinition) -> Result<Option<Self>, RecurrenceError> {
        if !def.is_recurring {
            return Ok(None);
        }
        let rule = def
            .recurrence_rule
            .as_deref()
            .ok_or(RecurrenceError::MissingRule)?;
        Self::from_parts(rule, def.recurrence_days.as_deref()).map(Some)
    }

    fn custom_from_names(names: &[String]) -> Result<Self, RecurrenceError> {
        let mut days: Vec<Weekday> = Vec::new();
        for name in names {
            let trimmed = name.trim();
            if trimmed.is_empty() {
                continue;
            }
            let day: Weekday = trimmed
                .parse()
                .map_err(|_| RecurrenceError::InvalidWeekday(trimmed.to_string()))?;
            if !days.contains(&day) {
                days.push(day);
            }
        }
        if days.is_empty() {
            return Err(RecurrenceError::EmptyCustomDays);
        }
        days.sort_by_key(|d| d.num_days_from_monday());
        Ok(Recurrence::Custom(days))
    }

    /// Whether an occurrence exists on `target` for a rule anchored at
    /// `anchor`. Dates before the anchor match too: the anchor only fixes
    /// the phase (weekday, day-of-month, month-and-day), it is not a start
    /// date.
    pub fn is_active_on(&self, anchor: NaiveDate, target: NaiveDate) -> bool {
        match self {
            Recurrence::Daily => true,
            Recurrence::Weekly => target.weekday() == anchor.weekday(),
            Recurrence::Monthly => target.day() == anchor.day(),
            Recurrence::Yearly => {
                (target.month(), target.day()) == (anchor.month(), anchor.day())
            }
            Recurrence::Custom(days) => days.contains(&target.weekday()),
        }
    }

    /// The stored name of this rule.
    pub fn rule_name(&self) -> &'static str {
        match self {
            Recurrence::Daily => "daily",
            Recurrence::Weekly => "weekly",
            Recurrence::Monthly => "monthly",
            Recurrence::Yearly => "yearly",
            Recurrence::Custom(_) => "custom",
        }
    }

    /// Canonical JSON for the `recurrence_days` column; `None` for rules
    /// without a day set.
    pub fn days_json(&self) -> Option<String> {
        match self {
            Recurrence::Custom(days) => {
                let names: Vec<serde_json::Value> = days
                    .iter()
                    .map(|d| serde_json::Value::from(weekday_name(*d)))
                    .collect();
                Some(serde_json::Value::Array(names).to_string())
            }
            _ => None,
        }
    }
}

/// A malformed stored rule, reported as data rather than an error so one
/// corrupt row never takes down a whole day view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IntegrityWarning {
    pub definition_id: Uuid,
    pub title: String,
    pub detail: String,
}

impl IntegrityWarning {
    pub(crate) fn for_definition(def: &TaskDefinition, err: &RecurrenceError) -> Self {
        Self {
            definition_id: def.id,
            title: def.title.clone(),
            detail: err.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    mod parsing {
        use super::*;
        use rstest::rstest;

        #[rstest]
        #[case("daily", Recurrence::Daily)]
        #[case("Weekly", Recurrence::Weekly)]
        #[case("  monthly ", Recurrence::Monthly)]
        #[case("YEARLY", Recurrence::Yearly)]
        fn named_rules_parse(#[case] rule: &str, #[case] expected: Recurrence) {
            assert_eq!(Recurrence::from_parts(rule, None), Ok(expected));
        }

        #[test]
        fn unknown_rule_is_rejected() {
            assert_eq!(
                Recurrence::from_parts("biweekly", None),
                Err(RecurrenceError::UnknownRule("biweekly".to_string()))
            );
        }

        #[test]
        fn custom_requires_a_day_list() {
            assert_eq!(
                Recurrence::from_parts("custom", None),
                Err(RecurrenceError::EmptyCustomDays)
            );
            assert_eq!(
                Recurrence::from_parts("custom", Some("[]")),
                Err(RecurrenceError::EmptyCustomDays)
            );
        }

        #[test]
        fn custom_parses_full_and_abbreviated_names() {
            let parsed =
                Recurrence::from_parts("custom", Some(r#"["monday", "Thu"]"#)).unwrap();
            assert_eq!(
                parsed,
                Recurrence::Custom(vec![Weekday::Mon, Weekday::Thu])
            );
        }

        #[test]
        fn custom_rejects_invalid_day_names() {
            assert_eq!(
                Recurrence::from_parts("custom", Some(r#"["funday"]"#)),
                Err(RecurrenceError::InvalidWeekday("funday".to_string()))
            );
        }

        #[test]
        fn custom_rejects_malformed_json() {
            assert!(matches!(
                Recurrence::from_parts("custom", Some("monday,thursday")),
                Err(RecurrenceError::MalformedDayList(_))
            ));
        }

        #[test]
        fn from_names_validates_the_dto_form() {
            let days = vec!["monday".to_string(), "thursday".to_string()];
            assert!(Recurrence::from_names("custom", &days).is_ok());
            assert_eq!(
                Recurrence::from_names("custom", &[]),
                Err(RecurrenceError::EmptyCustomDays)
            );
            assert_eq!(
                Recurrence::from_names("daily", &days),
                Ok(Recurrence::Daily)
            );
        }

        #[test]
        fn days_json_round_trips_canonically() {
            let rule =
                Recurrence::from_parts("custom", Some(r#"["THU", "monday"]"#)).unwrap();
            let json = rule.days_json().unwrap();
            assert_eq!(json, r#"["monday","thursday"]"#);
            assert_eq!(Recurrence::from_parts("custom", Some(&json)), Ok(rule));
        }

        #[test]
        fn flagged_recurring_without_rule_is_an_error() {
            let def = TaskDefinition {
                is_recurring: true,
                recurrence_rule: None,
                ..Default::default()
            };
            assert_eq!(
                Recurrence::for_definition(&def),
                Err(RecurrenceError::MissingRule)
            );
        }

        #[test]
        fn non_recurring_definitions_have_no_rule() {
            let def = TaskDefinition::default();
            assert_eq!(Recurrence::for_definition(&def), Ok(None));
        }
    }

    mod evaluation {
        use super::*;
        use proptest::prelude::*;

        #[test]
        fn weekly_matches_anchor_weekday_across_a_year() {
            // 2025-01-01 is a Wednesday.
            let anchor = date(2025, 1, 1);
            let rule = Recurrence::Weekly;
            for offset in 0..365 {
                let target = anchor + Duration::days(offset);
                assert_eq!(
                    rule.is_active_on(anchor, target),
                    target.weekday() == Weekday::Wed,
                    "offset {offset}"
                );
            }
        }

        #[test]
        fn weekly_matches_dates_before_the_anchor() {
            let anchor = date(2024, 6, 5); // Wednesday
            let earlier = date(2024, 5, 29); // Wednesday, one week before
            assert!(Recurrence::Weekly.is_active_on(anchor, earlier));
        }

        #[test]
        fn monthly_on_the_31st_skips_short_months() {
            let anchor = date(2024, 1, 31);
            let rule = Recurrence::Monthly;
            for month in 1..=12u32 {
                let active: Vec<NaiveDate> = crate::dates::days_inclusive(
                    date(2024, month, 1),
                    crate::dates::month_bounds(date(2024, month, 1)).1,
                )
                .filter(|d| rule.is_active_on(anchor, *d))
                .collect();
                match month {
                    4 | 6 | 9 | 11 => assert!(active.is_empty(), "month {month}"),
                    2 => assert!(active.is_empty(), "February has no 31st"),
                    _ => assert_eq!(active, vec![date(2024, month, 31)], "month {month}"),
                }
            }
        }

        #[test]
        fn yearly_leap_anchor_skips_common_years() {
            let anchor = date(2024, 2, 29);
            let rule = Recurrence::Yearly;

            let active_2025 = crate::dates::days_inclusive(date(2025, 1, 1), date(2025, 12, 31))
                .filter(|d| rule.is_active_on(anchor, *d))
                .count();
            assert_eq!(active_2025, 0);

            assert!(rule.is_active_on(anchor, date(2028, 2, 29)));
            assert!(!rule.is_active_on(anchor, date(2028, 2, 28)));
            assert!(!rule.is_active_on(anchor, date(2028, 3, 1)));
        }

        #[test]
        fn custom_monday_thursday_over_a_month() {
            let rule = Recurrence::Custom(vec![Weekday::Mon, Weekday::Thu]);
            let anchor = date(2024, 4, 1);
            for target in crate::dates::days_inclusive(date(2024, 4, 1), date(2024, 4, 30)) {
                let expected =
                    target.weekday() == Weekday::Mon || target.weekday() == Weekday::Thu;
                assert_eq!(rule.is_active_on(anchor, target), expected, "{target}");
            }
        }

        proptest! {
            #[test]
            fn daily_is_active_regardless_of_anchor(
                anchor_offset in 0i64..20_000,
                target_offset in 0i64..20_000,
            ) {
                let base = date(1990, 1, 1);
                let anchor = base + Duration::days(anchor_offset);
                let target = base + Duration::days(target_offset);
                prop_assert!(Recurrence::Daily.is_active_on(anchor, target));
            }

            #[test]
            fn weekly_agrees_with_weekday_equality(
                anchor_offset in 0i64..5_000,
                target_offset in 0i64..5_000,
            ) {
                let base = date(2020, 1, 1);
                let anchor = base + Duration::days(anchor_offset);
                let target = base + Duration::days(target_offset);
                prop_assert_eq!(
                    Recurrence::Weekly.is_active_on(anchor, target),
                    anchor.weekday() == target.weekday()
                );
            }
        }
    }
}
