use anyhow::Result;
use clap::Parser;
use crossterm::style::Stylize;
use harborctl_api_lib::health::get_health;
use harborctl_tui_lib::table::print_table;

use crate::AppContext;

/// Show the health of the Harbor instance and its components
#[derive(Parser, Debug, Clone)]
pub struct HealthArgs {}

pub async fn handle_health(
    _args: &HealthArgs,
    ctx: &AppContext,
) -> Result<()> {
    let client = ctx.client()?;
    let health = get_health(&client).await?;

    let mut rows = vec![format!(
        "[{}]\t{}\t{}",
        "component".cyan(),
        "status".blue(),
        "error".blue()
    )];

    for component in &health.components {
        let icon = if component.healthy() {
            "✓".green().to_string()
        } else {
            "✗".red().to_string()
        };

        let status = if component.healthy() {
            component.status.as_str().green().to_string()
        } else {
            component.status.as_str().red().to_string()
        };

        rows.push(format!(
            " {} {}\t{}\t{}",
            icon,
            component.name,
            status,
            component.error.as_deref().unwrap_or(""),
        ));
    }

    print_table(rows);
    println!();

    if health.healthy() {
        println!("{} {} is healthy", "✓".green(), client.base_url().cyan());
        Ok(())
    } else {
        anyhow::bail!("{} is {}", client.base_url(), health.status)
    }
}
