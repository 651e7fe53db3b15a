//! CalendarSync: keeps Day/Week/Month records and their links in place.
//!
//! Every step is check-then-create against the remote store. Two runs
//! overlapping in time can both miss a record and both create it.

use std::collections::HashMap;

use chrono::{NaiveDate, Utc};

use super::period::{day_label, local_date, month_label, week_of};
use crate::error::{SyncError, UnmatchedLink};
use crate::notion::filter::{filter, Condition, FilterType};
use crate::notion::{DatabaseClient, Page, Properties, PropertyValue};
use crate::storage::CalendarConfig;

/// Databases the sync works with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CalendarTable {
    Day,
    Week,
    Month,
    /// Records linked to the Day they were created on.
    Links,
}

/// A period record and whether this run created it.
#[derive(Debug, Clone, PartialEq)]
pub struct PeriodRecord {
    pub page: Page,
    pub created: bool,
}

/// Outcome of [`CalendarSync::ensure_period_records`].
#[derive(Debug, Clone, PartialEq)]
pub struct PeriodReport {
    pub day: PeriodRecord,
    pub week: PeriodRecord,
    pub month: PeriodRecord,
}

impl PeriodReport {
    pub fn created_count(&self) -> usize {
        [&self.day, &self.week, &self.month]
            .iter()
            .filter(|r| r.created)
            .count()
    }
}

/// Outcome of a successful [`CalendarSync::backfill_missing_relation`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BackfillReport {
    /// Links without a Day relation that were examined.
    pub examined: usize,
    /// `(link id, day id)` of every link that was updated.
    pub linked: Vec<(String, String)>,
}

pub struct CalendarSync<'a> {
    client: &'a DatabaseClient,
    config: &'a CalendarConfig,
}

impl<'a> CalendarSync<'a> {
    pub fn new(client: &'a DatabaseClient, config: &'a CalendarConfig) -> Self {
        Self { client, config }
    }

    /// Configured display name of `table`.
    pub fn table_name(&self, table: CalendarTable) -> &'a str {
        let tables = &self.config.tables;
        match table {
            CalendarTable::Day => &tables.day,
            CalendarTable::Week => &tables.week,
            CalendarTable::Month => &tables.month,
            CalendarTable::Links => &tables.links,
        }
    }

    /// Today in the client's time zone.
    pub fn today(&self) -> NaiveDate {
        local_date(&Utc::now(), &self.client.time_zone())
    }

    async fn find(&self, table: CalendarTable, label: &str) -> Result<Option<Page>, SyncError> {
        Ok(self
            .client
            .get_by(self.table_name(table), &self.config.properties.name, label)
            .await?)
    }

    async fn find_or_create(
        &self,
        table: CalendarTable,
        label: &str,
        properties: impl FnOnce() -> Properties,
    ) -> Result<PeriodRecord, SyncError> {
        if let Some(page) = self.find(table, label).await? {
            tracing::debug!(?table, label, page_id = %page.id, "record exists");
            return Ok(PeriodRecord {
                page,
                created: false,
            });
        }

        let mut props = properties();
        props.insert(
            self.config.properties.name.clone(),
            PropertyValue::title(label),
        );
        let page = self.client.create(self.table_name(table), &props).await?;
        tracing::info!(?table, label, page_id = %page.id, "created record");
        Ok(PeriodRecord {
            page,
            created: true,
        })
    }

    /// Make sure the Week, Month and Day records for `today` exist, creating
    /// whichever are missing. A new Day is related to its Week and Month.
    pub async fn ensure_period_records(&self, today: NaiveDate) -> Result<PeriodReport, SyncError> {
        let props = &self.config.properties;

        let week = week_of(today);
        let week_record = self
            .find_or_create(CalendarTable::Week, &week.label, || {
                let mut p = Properties::new();
                p.insert(
                    props.date_range.clone(),
                    PropertyValue::date(week.start, Some(week.end)),
                );
                p
            })
            .await?;

        let month_record = self
            .find_or_create(CalendarTable::Month, &month_label(today), Properties::new)
            .await?;

        let day_record = self
            .find_or_create(CalendarTable::Day, &day_label(today), || {
                let mut p = Properties::new();
                p.insert(props.date.clone(), PropertyValue::date(today, None));
                p.insert(
                    props.week.clone(),
                    PropertyValue::relation([week_record.page.id.as_str()]),
                );
                p.insert(
                    props.month.clone(),
                    PropertyValue::relation([month_record.page.id.as_str()]),
                );
                p
            })
            .await?;

        Ok(PeriodReport {
            day: day_record,
            week: week_record,
            month: month_record,
        })
    }

    /// Relate link records that have no Day to the Day they were created on.
    ///
    /// # Errors
    ///
    /// Remote failures abort immediately. Links whose Day record does not
    /// exist are never written; once every other link has been handled the
    /// run fails with [`SyncError::MissingDays`] naming them.
    pub async fn backfill_missing_relation(&self) -> Result<BackfillReport, SyncError> {
        let props = &self.config.properties;
        let tz = self.client.time_zone();

        let unlinked = filter(props.day.clone(), FilterType::Relation, Condition::IsEmpty, true)?;
        let links = self
            .client
            .query(
                self.table_name(CalendarTable::Links),
                &unlinked,
                Some(self.config.backfill_limit),
            )
            .await?;

        let mut report = BackfillReport {
            examined: links.len(),
            ..BackfillReport::default()
        };
        let mut missing = Vec::new();
        let mut days: HashMap<String, Option<String>> = HashMap::new();

        for link in &links {
            let label = day_label(local_date(&link.created_time, &tz));
            let day_id = match days.get(&label) {
                Some(cached) => cached.clone(),
                None => {
                    let found = self.find(CalendarTable::Day, &label).await?.map(|p| p.id);
                    days.insert(label.clone(), found.clone());
                    found
                }
            };

            let Some(day_id) = day_id else {
                tracing::warn!(link_id = %link.id, day = %label, "no Day record for link");
                missing.push(UnmatchedLink {
                    link_id: link.id.clone(),
                    day: label,
                });
                continue;
            };

            let mut update = Properties::new();
            update.insert(
                props.day.clone(),
                PropertyValue::relation([day_id.as_str()]),
            );
            self.client.update(&link.id, &update).await?;
            report.linked.push((link.id.clone(), day_id));
        }

        if !missing.is_empty() {
            return Err(SyncError::MissingDays {
                missing,
                updated: report.linked.len(),
            });
        }
        Ok(report)
    }

    /// Ensure today's records, then backfill links.
    pub async fn run_all(
        &self,
        today: NaiveDate,
    ) -> Result<(PeriodReport, BackfillReport), SyncError> {
        let periods = self.ensure_period_records(today).await?;
        let backfill = self.backfill_missing_relation().await?;
        Ok((periods, backfill))
    }
}
