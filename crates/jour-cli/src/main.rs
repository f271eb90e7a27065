use clap::Parser;
use dialoguer::Confirm;
use jour_core::db;
use jour_core::error::CoreError;
use jour_core::repository::{DefinitionRepository, SqliteRepository};
use owo_colors::{OwoColorize, Style};
use util::resolve_definition_id;

mod cli;
mod commands;
mod config;
mod parser;
mod util;
mod views;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let config = config::Config::new().unwrap_or_default();
    let db_pool = match db::establish_connection(&config.database_path).await {
        Ok(pool) => pool,
        Err(e) => {
            eprintln!("{} {}", "Error:".red().bold(), e);
            std::process::exit(1);
        }
    };
    let repository = SqliteRepository::new(db_pool);
    let user_id = config.user_id;
    tracing::debug!(path = %config.database_path, "database ready");

    let cli = cli::Cli::parse();

    let result = match cli.command {
        cli::Commands::Add(command) => {
            commands::add::add_task(&repository, user_id, command).await
        }
        cli::Commands::Today(_) => commands::today::show_today(&repository, user_id).await,
        cli::Commands::Day(command) => {
            commands::day::show_day(&repository, user_id, command).await
        }
        cli::Commands::Week(command) => {
            commands::week::show_week(&repository, user_id, command).await
        }
        cli::Commands::List(command) => {
            commands::list::list_tasks(&repository, user_id, command).await
        }
        cli::Commands::Done(command) => commands::done::toggle_task(&repository, command).await,
        cli::Commands::Postpone(command) => {
            commands::postpone::postpone_task(&repository, command).await
        }
        cli::Commands::Delete(command) => {
            let definition_id = match resolve_definition_id(&repository, &command.id).await {
                Ok(id) => id,
                Err(e) => handle_error(e),
            };
            let definition = match repository.find_definition_by_id(definition_id).await {
                Ok(Some(definition)) => definition,
                Ok(None) => {
                    let error_style = Style::new().red().bold();
                    eprintln!(
                        "{} Task with ID '{}' not found.",
                        "Error:".style(error_style),
                        definition_id
                    );
                    std::process::exit(1);
                }
                Err(e) => handle_error(e.into()),
            };

            if !command.force {
                let confirmation = Confirm::new()
                    .with_prompt(format!(
                        "Are you sure you want to delete task '{}'?",
                        definition.title
                    ))
                    .default(false)
                    .interact()
                    .unwrap_or(false);

                if !confirmation {
                    println!("Deletion cancelled.");
                    return;
                }
            }
            commands::delete::delete_task(&repository, definition_id).await
        }
    };

    if let Err(e) = result {
        handle_error(e);
    }
}

fn handle_error(err: anyhow::Error) -> ! {
    let error_style = Style::new().red().bold();

    if let Some(core_error) = err.downcast_ref::<CoreError>() {
        match core_error {
            CoreError::NotFound(s) => {
                eprintln!("{} {}", "Error:".style(error_style), s);
            }
            CoreError::InvalidInput(s) => {
                eprintln!("{} Invalid input: {}", "Error:".style(error_style), s);
            }
            CoreError::Conflict(s) => {
                eprintln!(
                    "{} Conflicting update: {}",
                    "Error:".style(error_style),
                    s.yellow()
                );
            }
            _ => eprintln!("{} {}", "Error:".style(error_style), err),
        }
    } else {
        eprintln!("{} {}", "Error:".style(error_style), err);
    }
    std::process::exit(1)
}
