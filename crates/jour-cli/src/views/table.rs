use std::collections::BTreeMap;

use chrono::{NaiveDate, Utc};
use chrono_humanize::HumanTime;
use comfy_table::{Attribute, Cell, Color, Row, Table};
use jour_core::models::{Priority, TaskDefinition, TaskStatus};
use jour_core::recurrence::IntegrityWarning;
use jour_core::schedule::{DayCounts, DayView, Occurrence};
use owo_colors::OwoColorize;

use crate::util::short_id;

fn priority_cell(cell: Cell, priority: Priority) -> Cell {
    match priority {
        Priority::High => cell.fg(Color::Red).add_attribute(Attribute::Bold),
        Priority::Medium => cell.fg(Color::Yellow),
        Priority::Low => cell.fg(Color::Green),
    }
}

/// One date's schedule: sorted occurrences with completion marks.
pub fn display_day_view(view: &DayView) {
    if view.occurrences.is_empty() {
        println!("Nothing scheduled.");
    } else {
        let mut table = Table::new();
        table.set_header(vec!["", "ID", "Time", "Task", "Priority", "Category"]);

        for occurrence in &view.occurrences {
            table.add_row(occurrence_row(occurrence));
        }
        println!("{table}");
    }

    display_warnings(&view.warnings);
}

fn occurrence_row(occurrence: &Occurrence) -> Row {
    let def = &occurrence.definition;
    let mut row = Row::new();

    row.add_cell(if occurrence.completed {
        Cell::new("✓").fg(Color::Green)
    } else {
        Cell::new(" ")
    });
    row.add_cell(Cell::new(short_id(def.id)));
    row.add_cell(Cell::new(
        def.time_planned
            .map(|t| t.format("%H:%M").to_string())
            .unwrap_or_else(|| "--".to_string()),
    ));

    let mut title = String::new();
    if occurrence.recurring {
        title.push('↻');
        title.push(' ');
    }
    title.push_str(&def.title);

    let mut title_cell = Cell::new(title);
    if occurrence.completed {
        title_cell = title_cell
            .add_attribute(Attribute::CrossedOut)
            .fg(Color::DarkGrey);
    } else {
        title_cell = priority_cell(title_cell, def.priority);
    }
    row.add_cell(title_cell);

    row.add_cell(Cell::new(def.priority.to_string()));
    row.add_cell(Cell::new(def.category.as_deref().unwrap_or("-")));
    row
}

/// Full definition listing, independent of any date.
pub fn display_definitions(definitions: &[TaskDefinition]) {
    if definitions.is_empty() {
        println!("No tasks found.");
        return;
    }

    let mut table = Table::new();
    table.set_header(vec![
        "ID", "Title", "Status", "Priority", "Planned", "Recurrence", "Created",
    ]);

    for def in definitions {
        let mut row = Row::new();
        row.add_cell(Cell::new(short_id(def.id)));

        let mut title = String::new();
        if def.is_recurring {
            title.push('↻');
            title.push(' ');
        }
        title.push_str(&def.title);

        let mut title_cell = Cell::new(title);
        match def.status {
            TaskStatus::Done | TaskStatus::Cancelled => {
                title_cell = title_cell
                    .add_attribute(Attribute::CrossedOut)
                    .fg(Color::DarkGrey);
            }
            TaskStatus::Todo | TaskStatus::InProgress => {
                title_cell = priority_cell(title_cell, def.priority);
            }
        }
        row.add_cell(title_cell);

        let status_cell = match def.status {
            TaskStatus::Done => Cell::new("done").fg(Color::Green),
            TaskStatus::Cancelled => Cell::new("cancelled").fg(Color::DarkGrey),
            TaskStatus::InProgress => Cell::new("in progress").fg(Color::Cyan),
            TaskStatus::Todo => Cell::new("todo"),
        };
        row.add_cell(status_cell);

        row.add_cell(Cell::new(def.priority.to_string()));

        let planned = match (def.date_planned, def.time_planned) {
            (Some(date), Some(time)) => format!("{} {}", date, time.format("%H:%M")),
            (Some(date), None) => date.to_string(),
            (None, _) => "-".to_string(),
        };
        row.add_cell(Cell::new(planned));

        row.add_cell(Cell::new(
            def.recurrence_rule.as_deref().unwrap_or("-"),
        ));
        row.add_cell(Cell::new(HumanTime::from(def.created_at).to_string()));
        table.add_row(row);
    }

    println!("{table}");
}

/// Week grid: one row per day with completion progress.
pub fn display_week(counts: &BTreeMap<NaiveDate, DayCounts>) {
    let today = Utc::now().date_naive();

    let mut table = Table::new();
    table.set_header(vec!["Day", "Date", "Done", "Open", "Progress"]);

    for (date, day) in counts {
        let mut row = Row::new();

        let weekday = date.format("%A").to_string();
        let day_cell = if *date == today {
            Cell::new(format!("{} (today)", weekday)).add_attribute(Attribute::Bold)
        } else {
            Cell::new(weekday)
        };
        row.add_cell(day_cell);
        row.add_cell(Cell::new(date.to_string()));
        row.add_cell(Cell::new(format!("{}/{}", day.completed, day.total)));
        row.add_cell(Cell::new(day.open().to_string()));

        let progress_cell = if day.total == 0 {
            Cell::new("")
        } else {
            let bar: String = "█".repeat(day.completed) + &"░".repeat(day.open());
            if day.completed == day.total {
                Cell::new(bar).fg(Color::Green)
            } else {
                Cell::new(bar)
            }
        };
        row.add_cell(progress_cell);

        table.add_row(row);
    }

    println!("{table}");
}

/// Malformed stored rules, surfaced without failing the view.
pub fn display_warnings(warnings: &[IntegrityWarning]) {
    for warning in warnings {
        eprintln!(
            "{} '{}' has a broken recurrence rule and was left out: {}",
            "Warning:".yellow().bold(),
            warning.title,
            warning.detail
        );
    }
}
