use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::fs;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use crossterm::style::Stylize;
use harborctl_api_lib::config::{
    Configurations, get_configurations, plain_values,
    update_configurations,
};
use harborctl_tui_lib::ansi::shorten_ansi;
use harborctl_tui_lib::diff::{diff_maps, pending_changes, render_diff};
use harborctl_tui_lib::table::print_table;
use serde_json::Value;

use crate::AppContext;
use crate::config_key_arg_completer;

/// Inspect and update the server configuration
#[derive(Parser, Debug, Clone)]
pub struct ConfigArgs {
    #[command(subcommand)]
    action: ConfigAction,
}

#[derive(Subcommand, Debug, Clone)]
enum ConfigAction {
    /// Show current configuration values
    Get {
        /// Show a single key
        #[arg(long, add = config_key_arg_completer())]
        key: Option<String>,

        /// Print raw JSON instead of a table
        #[arg(long)]
        json: bool,
    },

    /// Compare a desired-state file against the live configuration
    Diff {
        /// YAML or JSON file of desired values
        file: PathBuf,
    },

    /// Apply the changed keys from a desired-state file
    Update {
        /// YAML or JSON file of desired values
        file: PathBuf,

        /// Show the diff without pushing it
        #[arg(long)]
        dry_run: bool,
    },
}

pub async fn handle_config(
    args: &ConfigArgs,
    ctx: &AppContext,
) -> Result<()> {
    let client = ctx.client()?;

    match &args.action {
        ConfigAction::Get { key, json } => {
            let configurations = get_configurations(&client).await?;

            if let Some(key) = key {
                let Some(item) = configurations.get(key) else {
                    anyhow::bail!("Unknown configuration key '{}'", key);
                };
                println!("{}", serde_json::to_string_pretty(&item.value)?);
                return Ok(());
            }

            if *json {
                let values = plain_values(&configurations);
                println!("{}", serde_json::to_string_pretty(&values)?);
                return Ok(());
            }

            print_config_table(&configurations);
            Ok(())
        }

        ConfigAction::Diff { file } => {
            let desired = load_desired(file)?;
            let current =
                plain_values(&get_configurations(&client).await?);

            let entries = diff_maps(&current, &desired);
            for line in render_diff(&entries) {
                println!("{}", line);
            }

            Ok(())
        }

        ConfigAction::Update { file, dry_run } => {
            let desired = load_desired(file)?;
            let configurations = get_configurations(&client).await?;
            let current = plain_values(&configurations);

            let entries = diff_maps(&current, &desired);
            let pending = pending_changes(&entries);

            for line in render_diff(&entries) {
                println!("{}", line);
            }

            if pending.is_empty() {
                println!("Nothing to update");
                return Ok(());
            }

            for key in pending.keys() {
                if let Some(item) = configurations.get(key) {
                    if !item.editable {
                        eprintln!(
                            "{} '{}' is not editable on this server",
                            "⚠".yellow(),
                            key
                        );
                    }
                }
            }

            if *dry_run {
                println!("Dry run, nothing pushed");
                return Ok(());
            }

            update_configurations(&client, &pending).await?;
            println!(
                "{} Updated {} setting(s)",
                "✓".green(),
                pending.len()
            );

            Ok(())
        }
    }
}

fn print_config_table(configurations: &Configurations) {
    let mut rows = vec![format!(
        "[{}]\t{}\t{}",
        "key".cyan(),
        "value".blue(),
        "editable".blue()
    )];

    for (key, item) in configurations {
        let value = match &item.value {
            Value::String(s) => s.clone(),
            other => other.to_string(),
        };

        let editable = if item.editable {
            "yes".to_string()
        } else {
            "no".dark_grey().to_string()
        };

        rows.push(format!(
            " - {}\t{}\t{}",
            key,
            shorten_ansi(&value, 48),
            editable
        ));
    }

    print_table(rows);
}

fn load_desired(path: &Path) -> Result<BTreeMap<String, Value>> {
    let data = fs::read_to_string(path).with_context(|| {
        anyhow::anyhow!("Failed to read {}", path.display())
    })?;

    serde_yml::from_str(&data).with_context(|| {
        anyhow::anyhow!("Failed to parse {}", path.display())
    })
}
