use std::time::Duration;

use anyhow::Result;
use clap::{Parser, Subcommand};
use crossterm::style::Stylize;
use harborctl_api_lib::job::JobId;
use harborctl_api_lib::purge::{self, PurgeParams};
use harborctl_lib::schedule::ScheduleType;
use harborctl_tui_lib::table::print_table;

use crate::AppContext;
use crate::commands::gc::parse_schedule;
use crate::jobs::{
    history_header, history_row, schedule_lines, wait_for_job,
};

/// Manage audit log purging
#[derive(Parser, Debug, Clone)]
pub struct PurgeArgs {
    #[command(subcommand)]
    action: PurgeAction,
}

#[derive(Subcommand, Debug, Clone)]
enum PurgeAction {
    /// Show or change the purge schedule
    Schedule {
        /// New schedule: none, hourly, daily, weekly, or a 6-field cron
        #[arg(long, value_parser = parse_schedule)]
        every: Option<ScheduleType>,

        /// Keep audit log entries younger than this many hours
        #[arg(long, default_value_t = 168)]
        retention_hours: i64,

        /// Comma separated event types to purge
        #[arg(long, default_value = "create,delete,pull")]
        include_event_types: String,
    },

    /// Trigger an audit log purge
    Run {
        /// Keep audit log entries younger than this many hours
        #[arg(long, default_value_t = 168)]
        retention_hours: i64,

        /// Comma separated event types to purge
        #[arg(long, default_value = "create,delete,pull")]
        include_event_types: String,

        /// Simulate without deleting anything
        #[arg(long)]
        dry_run: bool,

        /// Block until the job finishes
        #[arg(short, long)]
        wait: bool,

        /// Poll interval while waiting
        #[arg(
            long,
            default_value = "2s",
            value_parser = humantime::parse_duration
        )]
        interval: Duration,
    },

    /// List past purge runs
    List {
        #[arg(long, default_value_t = 1)]
        page: u64,

        #[arg(long, default_value_t = 10)]
        page_size: u64,
    },

    /// Print the log of a purge job
    Log { id: i64 },
}

pub async fn handle_purge(
    args: &PurgeArgs,
    ctx: &AppContext,
) -> Result<()> {
    let client = ctx.client()?;

    match &args.action {
        PurgeAction::Schedule {
            every,
            retention_hours,
            include_event_types,
        } => {
            let current = purge::get_schedule(&client).await?;

            let Some(every) = every else {
                print_table(schedule_lines(current.as_ref()));
                return Ok(());
            };

            let params = PurgeParams {
                audit_retention_hour: *retention_hours,
                include_event_types: include_event_types.clone(),
                dry_run: false,
            };

            if current.is_some() {
                purge::update_schedule(&client, every.to_spec(), &params)
                    .await?;
            } else {
                purge::create_schedule(&client, every.to_spec(), &params)
                    .await?;
            }

            println!("{} Purge schedule set to {}", "✓".green(), every);
            Ok(())
        }

        PurgeAction::Run {
            retention_hours,
            include_event_types,
            dry_run,
            wait,
            interval,
        } => {
            let params = PurgeParams {
                audit_retention_hour: *retention_hours,
                include_event_types: include_event_types.clone(),
                dry_run: *dry_run,
            };

            purge::run_now(&client, &params).await?;
            println!("{} Audit log purge triggered", "✓".green());

            if !wait {
                return Ok(());
            }

            let page = purge::list_history(&client, 1, 1).await?;
            let Some(id) = page
                .items
                .first()
                .and_then(|record| record.id)
            else {
                anyhow::bail!("Triggered job not found in history");
            };

            let record = wait_for_job("purge", *interval, || {
                purge::get_job(&client, id)
            })
            .await?;

            match record.job_status.as_deref() {
                Some("Success") => {
                    println!("{} Purge job {} finished", "✓".green(), id);
                    Ok(())
                }
                other => anyhow::bail!(
                    "Purge job {} finished with status {}",
                    id,
                    other.unwrap_or("unknown")
                ),
            }
        }

        PurgeAction::List { page, page_size } => {
            let history =
                purge::list_history(&client, *page, *page_size).await?;

            let mut rows = vec![history_header("purge jobs")];
            for record in &history.items {
                rows.push(history_row(record));
            }
            print_table(rows);

            if let Some(total) = history.total {
                println!("\n{} jobs total", total);
            }

            Ok(())
        }

        PurgeAction::Log { id } => {
            let log = purge::get_job_log(&client, JobId(*id)).await?;
            print!("{}", log);
            Ok(())
        }
    }
}
