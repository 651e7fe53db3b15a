//! Sync subcommand: keeps the calendar databases in shape.
//!
//! Meant to be run from cron or a systemd timer; each action is one
//! pass over the remote store.

use chrono::NaiveDate;
use clap::Subcommand;
use daybook_core::calendar::{BackfillReport, CalendarSync, PeriodRecord, PeriodReport};

use super::CommandResult;

/// Sync actions.
#[derive(Subcommand)]
pub enum SyncAction {
    /// Ensure today's Day, Week and Month records exist
    Today {
        /// Date to use instead of today (YYYY-MM-DD)
        #[arg(long)]
        date: Option<NaiveDate>,
    },
    /// Relate links without a Day to the Day they were created on
    Backfill,
    /// Run `today` then `backfill`
    All {
        /// Date to use instead of today (YYYY-MM-DD)
        #[arg(long)]
        date: Option<NaiveDate>,
    },
}

/// Run the sync command.
pub async fn run(action: SyncAction) -> CommandResult {
    let (config, client) = super::connect().await?;
    let sync = CalendarSync::new(&client, &config.calendar);

    match action {
        SyncAction::Today { date } => {
            let today = date.unwrap_or_else(|| sync.today());
            let report = sync.ensure_period_records(today).await?;
            print_periods(&report);
        }
        SyncAction::Backfill => {
            let report = sync.backfill_missing_relation().await?;
            print_backfill(&report);
        }
        SyncAction::All { date } => {
            let today = date.unwrap_or_else(|| sync.today());
            let (periods, backfill) = sync.run_all(today).await?;
            print_periods(&periods);
            print_backfill(&backfill);
        }
    }
    Ok(())
}

fn print_periods(report: &PeriodReport) {
    for (kind, record) in [
        ("Week", &report.week),
        ("Month", &report.month),
        ("Day", &report.day),
    ] {
        println!("{kind:<5} {}", describe(record));
    }
}

fn describe(record: &PeriodRecord) -> String {
    let title = record.page.title().unwrap_or_default();
    let state = if record.created { "created" } else { "exists" };
    format!("{title} ({state}, {})", record.page.id)
}

fn print_backfill(report: &BackfillReport) {
    println!(
        "Links: {} examined, {} linked",
        report.examined,
        report.linked.len()
    );
}
