use anyhow::Result;
use clap::{Parser, Subcommand};
use crossterm::style::Stylize;
use harborctl_api_lib::permission::get_permissions;
use harborctl_api_lib::robot::{self, RobotId, system_robot};
use harborctl_tui_lib::ansi::shorten_ansi;
use harborctl_tui_lib::select::{MultiSelect, SelectItem, SelectOutcome};
use harborctl_tui_lib::table::print_table;

use crate::AppContext;
use crate::jobs::format_epoch;

/// Manage robot accounts
#[derive(Parser, Debug, Clone)]
pub struct RobotArgs {
    #[command(subcommand)]
    action: RobotAction,
}

#[derive(Subcommand, Debug, Clone)]
enum RobotAction {
    /// List robot accounts
    List {
        #[arg(long, default_value_t = 1)]
        page: u64,

        #[arg(long, default_value_t = 10)]
        page_size: u64,
    },

    /// Create a robot account, picking its permissions interactively
    Create {
        name: String,

        #[arg(short, long)]
        description: Option<String>,

        /// Lifetime in days, -1 for never expiring
        #[arg(long, default_value_t = 30)]
        duration: i64,
    },

    /// Delete a robot account by id
    Delete { id: i64 },
}

pub async fn handle_robot(
    args: &RobotArgs,
    ctx: &AppContext,
) -> Result<()> {
    let client = ctx.client()?;

    match &args.action {
        RobotAction::List { page, page_size } => {
            let robots =
                robot::list_robots(&client, *page, *page_size).await?;

            let mut rows = vec![format!(
                "[{}]\t{}\t{}\t{}\t{}",
                "robot".cyan(),
                "id".blue(),
                "level".blue(),
                "expires".blue(),
                "description".blue()
            )];

            for entry in &robots.items {
                let name = if entry.disable {
                    entry.name.as_str().dark_grey().to_string()
                } else {
                    entry.name.clone()
                };

                rows.push(format!(
                    " - {}\t{}\t{}\t{}\t{}",
                    name,
                    entry.id,
                    entry.level.as_deref().unwrap_or(""),
                    format_epoch(entry.expires_at.unwrap_or(0)),
                    shorten_ansi(
                        entry.description.as_deref().unwrap_or(""),
                        40
                    ),
                ));
            }

            print_table(rows);

            if let Some(total) = robots.total {
                println!("\n{} robots total", total);
            }

            Ok(())
        }

        RobotAction::Create {
            name,
            description,
            duration,
        } => {
            let permissions = get_permissions(&client).await?;
            let scoped = permissions.scoped();

            if scoped.is_empty() {
                anyhow::bail!("Server reported no grantable permissions");
            }

            let items = scoped
                .iter()
                .map(|(scope, entry)| SelectItem {
                    group: scope.to_string(),
                    name: entry.resource.clone(),
                    detail: entry.action.clone(),
                })
                .collect();

            let mut select = MultiSelect::new(
                format!("Permissions for {}", name),
                items,
            );

            let mut picked = Vec::new();
            if select.run(&mut picked)? == SelectOutcome::Cancelled {
                println!("Aborted, no robot account created");
                return Ok(());
            }

            if picked.is_empty() {
                anyhow::bail!("No permissions selected");
            }

            let chosen: Vec<_> = picked
                .iter()
                .map(|&index| scoped[index])
                .collect();

            let request =
                system_robot(name, description.clone(), *duration, &chosen);
            let created = robot::create_robot(&client, &request).await?;

            println!(
                "{} Created robot account {}",
                "✓".green(),
                created.name.as_str().cyan()
            );
            println!("id: {}", created.id);
            println!(
                "expires: {}",
                format_epoch(created.expires_at.unwrap_or(0))
            );
            println!("secret: {}", created.secret.as_str().yellow());
            println!(
                "{}",
                "Store the secret now, it cannot be retrieved again"
                    .yellow()
            );

            Ok(())
        }

        RobotAction::Delete { id } => {
            robot::delete_robot(&client, RobotId(*id)).await?;
            println!("{} Deleted robot account {}", "✓".green(), id);
            Ok(())
        }
    }
}
