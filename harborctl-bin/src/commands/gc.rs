use std::time::Duration;

use anyhow::Result;
use clap::{Parser, Subcommand};
use crossterm::style::Stylize;
use harborctl_api_lib::gc::{self, GcParams};
use harborctl_api_lib::job::JobId;
use harborctl_lib::schedule::ScheduleType;
use harborctl_tui_lib::table::print_table;

use crate::AppContext;
use crate::jobs::{
    history_header, history_row, schedule_lines, wait_for_job,
};

pub fn parse_schedule(s: &str) -> Result<ScheduleType, String> {
    s.parse()
        .map_err(|e: anyhow::Error| e.to_string())
}

/// Manage registry garbage collection
#[derive(Parser, Debug, Clone)]
pub struct GcArgs {
    #[command(subcommand)]
    action: GcAction,
}

#[derive(Subcommand, Debug, Clone)]
enum GcAction {
    /// Show or change the GC schedule
    Schedule {
        /// New schedule: none, hourly, daily, weekly, or a 6-field cron
        #[arg(long, value_parser = parse_schedule)]
        every: Option<ScheduleType>,

        /// Also remove untagged artifacts on scheduled runs
        #[arg(long)]
        delete_untagged: bool,

        #[arg(long, default_value_t = 1)]
        workers: i64,
    },

    /// Trigger a garbage collection run
    Run {
        /// Also remove untagged artifacts
        #[arg(long)]
        delete_untagged: bool,

        #[arg(long, default_value_t = 1)]
        workers: i64,

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

    /// List past garbage collection runs
    List {
        #[arg(long, default_value_t = 1)]
        page: u64,

        #[arg(long, default_value_t = 10)]
        page_size: u64,
    },

    /// Print the log of a garbage collection job
    Log { id: i64 },
}

pub async fn handle_gc(args: &GcArgs, ctx: &AppContext) -> Result<()> {
    let client = ctx.client()?;

    match &args.action {
        GcAction::Schedule {
            every,
            delete_untagged,
            workers,
        } => {
            let current = gc::get_schedule(&client).await?;

            let Some(every) = every else {
                print_table(schedule_lines(current.as_ref()));
                return Ok(());
            };

            let params = GcParams {
                delete_untagged: *delete_untagged,
                workers: *workers,
                dry_run: false,
            };

            if current.is_some() {
                gc::update_schedule(&client, every.to_spec(), &params)
                    .await?;
            } else {
                gc::create_schedule(&client, every.to_spec(), &params)
                    .await?;
            }

            println!("{} GC schedule set to {}", "✓".green(), every);
            Ok(())
        }

        GcAction::Run {
            delete_untagged,
            workers,
            dry_run,
            wait,
            interval,
        } => {
            let params = GcParams {
                delete_untagged: *delete_untagged,
                workers: *workers,
                dry_run: *dry_run,
            };

            gc::run_now(&client, &params).await?;
            println!("{} Garbage collection triggered", "✓".green());

            if !wait {
                return Ok(());
            }

            let page = gc::list_history(&client, 1, 1).await?;
            let Some(id) = page
                .items
                .first()
                .and_then(|record| record.id)
            else {
                anyhow::bail!("Triggered job not found in history");
            };

            let record = wait_for_job("gc", *interval, || {
                gc::get_job(&client, id)
            })
            .await?;

            finish_line(id, record.job_status.as_deref())
        }

        GcAction::List { page, page_size } => {
            let history =
                gc::list_history(&client, *page, *page_size).await?;

            let mut rows = vec![history_header("gc jobs")];
            for record in &history.items {
                rows.push(history_row(record));
            }
            print_table(rows);

            if let Some(total) = history.total {
                println!("\n{} jobs total", total);
            }

            Ok(())
        }

        GcAction::Log { id } => {
            let log = gc::get_job_log(&client, JobId(*id)).await?;
            print!("{}", log);
            Ok(())
        }
    }
}

fn finish_line(id: JobId, status: Option<&str>) -> Result<()> {
    match status {
        Some("Success") => {
            println!("{} GC job {} finished", "✓".green(), id);
            Ok(())
        }
        other => anyhow::bail!(
            "GC job {} finished with status {}",
            id,
            other.unwrap_or("unknown")
        ),
    }
}
