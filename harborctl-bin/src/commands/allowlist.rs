use std::time::{Duration, SystemTime, UNIX_EPOCH};

use anyhow::Result;
use clap::{Parser, Subcommand};
use crossterm::style::Stylize;
use harborctl_api_lib::allowlist::{
    get_system_allowlist, update_system_allowlist,
};
use harborctl_tui_lib::table::print_table;

use crate::AppContext;
use crate::jobs::format_epoch;

/// Manage the system-wide CVE allowlist
#[derive(Parser, Debug, Clone)]
pub struct AllowlistArgs {
    #[command(subcommand)]
    action: AllowlistAction,
}

#[derive(Subcommand, Debug, Clone)]
enum AllowlistAction {
    /// Show the current allowlist
    Show,

    /// Add and remove allowlist entries
    Update {
        /// CVE id to add (repeatable)
        #[arg(long = "add", value_name = "CVE_ID")]
        add: Vec<String>,

        /// CVE id to remove (repeatable)
        #[arg(long = "remove", value_name = "CVE_ID")]
        remove: Vec<String>,

        /// Expire the allowlist this long from now, e.g. 90d
        #[arg(
            long,
            value_parser = humantime::parse_duration,
            conflicts_with = "never_expires"
        )]
        expires_in: Option<Duration>,

        /// Clear the expiry
        #[arg(long)]
        never_expires: bool,
    },
}

pub async fn handle_allowlist(
    args: &AllowlistArgs,
    ctx: &AppContext,
) -> Result<()> {
    let client = ctx.client()?;

    match &args.action {
        AllowlistAction::Show => {
            let allowlist = get_system_allowlist(&client).await?;

            if allowlist.items.is_empty() {
                println!("The CVE allowlist is empty");
            } else {
                let mut rows = vec![format!("[{}]", "cve".cyan())];
                for item in &allowlist.items {
                    rows.push(format!(" - {}", item.cve_id));
                }
                print_table(rows);
            }

            println!(
                "expires: {}",
                format_epoch(allowlist.expires_at.unwrap_or(0))
            );

            Ok(())
        }

        AllowlistAction::Update {
            add,
            remove,
            expires_in,
            never_expires,
        } => {
            let mut allowlist = get_system_allowlist(&client).await?;
            allowlist.apply_edits(add, remove);

            if *never_expires {
                allowlist.expires_at = None;
            } else if let Some(expires_in) = expires_in {
                let expires_at = SystemTime::now() + *expires_in;
                allowlist.expires_at = Some(
                    expires_at
                        .duration_since(UNIX_EPOCH)?
                        .as_secs() as i64,
                );
            }

            update_system_allowlist(&client, &allowlist).await?;

            println!(
                "{} Allowlist updated, {} entries",
                "✓".green(),
                allowlist.items.len()
            );

            Ok(())
        }
    }
}
