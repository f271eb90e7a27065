use anyhow::Result;
use jour_core::models::{EnergyLevel, NewDefinitionData, Priority};
use jour_core::repository::Repository;
use owo_colors::{OwoColorize, Style};
use uuid::Uuid;

use crate::cli::AddCommand;
use crate::parser::{parse_natural_date, parse_time_of_day};
use crate::util::short_id;

pub async fn add_task(repo: &impl Repository, user_id: Uuid, command: AddCommand) -> Result<()> {
    let date_planned = command
        .date
        .as_deref()
        .map(parse_natural_date)
        .transpose()?;
    let time_planned = command
        .time
        .as_deref()
        .map(parse_time_of_day)
        .transpose()?;
    let priority = command
        .priority
        .as_deref()
        .map(str::parse::<Priority>)
        .transpose()?;
    let energy_level = command
        .energy
        .as_deref()
        .map(str::parse::<EnergyLevel>)
        .transpose()?;

    let (recurrence_rule, recurrence_days) = match command.every {
        Some(shortcut) => {
            let (rule, days) = shortcut.to_rule_parts(command.on.as_deref())?;
            (Some(rule), days)
        }
        None => (None, vec![]),
    };

    let data = NewDefinitionData {
        user_id,
        title: command.title,
        description: command.description,
        category: command.category,
        context: command.context,
        priority,
        date_planned,
        time_planned,
        duration_minutes: command.duration,
        energy_level,
        goal_id: None,
        recurrence_rule,
        recurrence_days,
    };

    let is_recurring = data.recurrence_rule.is_some();
    let definition = repo.create_definition(data).await?;

    let success_style = Style::new().green().bold();
    let info_style = Style::new().blue();
    let subtle_style = Style::new().bright_black();

    if is_recurring {
        println!(
            "{} Created recurring task: {}",
            "✓".style(success_style),
            definition.title.bright_white().bold()
        );
        println!(
            "  {} Task ID: {}",
            "→".style(info_style),
            short_id(definition.id).yellow()
        );
        println!(
            "  {} Repeats: {}",
            "→".style(info_style),
            definition.recurrence_rule.as_deref().unwrap_or("-")
        );
        println!(
            "\n{} Check it off day by day: jour done {}",
            "💡".style(subtle_style),
            short_id(definition.id).yellow()
        );
    } else {
        println!(
            "{} Created task: {}",
            "✓".style(success_style),
            definition.title.bright_white().bold()
        );
        println!(
            "  {} Task ID: {}",
            "→".style(info_style),
            short_id(definition.id).yellow()
        );
        if let Some(date) = definition.date_planned {
            println!("  {} Planned for: {}", "→".style(info_style), date.to_string().cyan());
        }
        println!(
            "\n{} Mark complete: jour done {}",
            "💡".style(subtle_style),
            short_id(definition.id).yellow()
        );
    }

    Ok(())
}
