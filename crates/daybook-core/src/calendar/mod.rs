//! Day/Week/Month records on top of the Notion client.

pub mod period;
pub mod sync;

pub use period::{day_label, local_date, month_label, week_of, Week};
pub use sync::{BackfillReport, CalendarSync, CalendarTable, PeriodRecord, PeriodReport};
