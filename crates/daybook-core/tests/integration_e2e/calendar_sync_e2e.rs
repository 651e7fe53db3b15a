//! E2E tests for CalendarSync.

use super::mock_notion::{self, client_config, connect, list_json, page_json, DATABASES};
use chrono::NaiveDate;
use daybook_core::calendar::{CalendarSync, CalendarTable};
use daybook_core::notion::DatabaseClient;
use daybook_core::storage::CalendarConfig;
use daybook_core::SyncError;
use mockito::{Matcher, Mock, ServerGuard};
use serde_json::json;

const CREATED: &str = "2023-07-05T08:00:00.000Z";

fn july_5th() -> NaiveDate {
    NaiveDate::from_ymd_opt(2023, 7, 5).unwrap()
}

/// Mock of a page creation in `database_id` whose properties include `properties`.
async fn mock_create(
    server: &mut ServerGuard,
    database_id: &str,
    properties: serde_json::Value,
    created_id: &str,
    title: &str,
) -> Mock {
    server
        .mock("POST", "/v1/pages")
        .match_body(Matcher::PartialJson(json!({
            "parent": { "database_id": database_id },
            "properties": properties
        })))
        .with_status(200)
        .with_body(page_json(created_id, CREATED, title).to_string())
        .expect(1)
        .create_async()
        .await
}

/// Mock of the "links without a Day" query.
async fn mock_unlinked(server: &mut ServerGuard, links: Vec<serde_json::Value>) -> Mock {
    server
        .mock("POST", "/v1/databases/links-db/query")
        .match_body(Matcher::Json(json!({
            "filter": { "property": "Day", "relation": { "is_empty": true } },
            "page_size": 100
        })))
        .with_status(200)
        .with_body(list_json(links))
        .expect(1)
        .create_async()
        .await
}

async fn mock_link_update(server: &mut ServerGuard, link_id: &str, day_id: &str) -> Mock {
    server
        .mock("PATCH", format!("/v1/pages/{link_id}").as_str())
        .match_body(Matcher::Json(json!({
            "properties": { "Day": { "relation": [{ "id": day_id }] } }
        })))
        .with_status(200)
        .with_body(page_json(link_id, CREATED, "link").to_string())
        .expect(1)
        .create_async()
        .await
}

/// Test: table names come from the config.
#[tokio::test]
async fn test_table_names_follow_config() {
    let mut server = mock_notion::server().await;
    let client = connect(&mut server).await;
    let mut config = CalendarConfig::default();
    config.tables.links = "Reading List".into();

    let sync = CalendarSync::new(&client, &config);
    assert_eq!(sync.table_name(CalendarTable::Day), "My Days");
    assert_eq!(sync.table_name(CalendarTable::Links), "Reading List");
}

/// Test: with Week and Month present, only the Day is created, related to both.
#[tokio::test]
async fn test_creates_only_missing_day() {
    let mut server = mock_notion::server().await;
    let client = connect(&mut server).await;
    let config = CalendarConfig::default();

    let _week = mock_notion::mock_lookup(
        &mut server,
        "week-db",
        "3 - 9 Jul 2023",
        vec![page_json("week-1", CREATED, "3 - 9 Jul 2023")],
    )
    .await;
    let _month = mock_notion::mock_lookup(
        &mut server,
        "month-db",
        "Jul 2023",
        vec![page_json("month-1", CREATED, "Jul 2023")],
    )
    .await;
    let _day = mock_notion::mock_lookup(&mut server, "day-db", "5 Jul 2023", vec![]).await;

    let create_day = server
        .mock("POST", "/v1/pages")
        .match_body(Matcher::Json(json!({
            "parent": { "database_id": "day-db" },
            "properties": {
                "Name": { "title": [{ "text": { "content": "5 Jul 2023" } }] },
                "Date": { "date": { "start": "2023-07-05" } },
                "Week": { "relation": [{ "id": "week-1" }] },
                "Month": { "relation": [{ "id": "month-1" }] }
            }
        })))
        .with_status(200)
        .with_body(page_json("day-1", CREATED, "5 Jul 2023").to_string())
        .expect(1)
        .create_async()
        .await;

    let sync = CalendarSync::new(&client, &config);
    let report = sync.ensure_period_records(july_5th()).await.unwrap();

    create_day.assert_async().await;
    assert_eq!(report.created_count(), 1);
    assert!(report.day.created);
    assert_eq!(report.day.page.id, "day-1");
    assert!(!report.week.created);
    assert_eq!(report.week.page.id, "week-1");
    assert!(!report.month.created);
}

/// Test: an empty calendar gets a Week, a Month and a Day.
#[tokio::test]
async fn test_creates_all_periods() {
    let mut server = mock_notion::server().await;
    let client = connect(&mut server).await;
    let config = CalendarConfig::default();

    let _week = mock_notion::mock_lookup(&mut server, "week-db", "31 Jul - 6 Aug 2023", vec![]).await;
    let _month = mock_notion::mock_lookup(&mut server, "month-db", "Aug 2023", vec![]).await;
    let _day = mock_notion::mock_lookup(&mut server, "day-db", "2 Aug 2023", vec![]).await;

    let create_week = mock_create(
        &mut server,
        "week-db",
        json!({
            "Name": { "title": [{ "text": { "content": "31 Jul - 6 Aug 2023" } }] },
            "Date Range": { "date": { "start": "2023-07-31", "end": "2023-08-06" } }
        }),
        "week-9",
        "31 Jul - 6 Aug 2023",
    )
    .await;
    let create_month = mock_create(
        &mut server,
        "month-db",
        json!({ "Name": { "title": [{ "text": { "content": "Aug 2023" } }] } }),
        "month-9",
        "Aug 2023",
    )
    .await;
    let create_day = mock_create(
        &mut server,
        "day-db",
        json!({
            "Week": { "relation": [{ "id": "week-9" }] },
            "Month": { "relation": [{ "id": "month-9" }] }
        }),
        "day-9",
        "2 Aug 2023",
    )
    .await;

    let sync = CalendarSync::new(&client, &config);
    let report = sync
        .ensure_period_records(NaiveDate::from_ymd_opt(2023, 8, 2).unwrap())
        .await
        .unwrap();

    create_week.assert_async().await;
    create_month.assert_async().await;
    create_day.assert_async().await;
    assert_eq!(report.created_count(), 3);
}

/// Test: nothing is created when every record exists.
#[tokio::test]
async fn test_existing_records_are_left_alone() {
    let mut server = mock_notion::server().await;
    let client = connect(&mut server).await;
    let config = CalendarConfig::default();

    let _week = mock_notion::mock_lookup(
        &mut server,
        "week-db",
        "3 - 9 Jul 2023",
        vec![page_json("week-1", CREATED, "3 - 9 Jul 2023")],
    )
    .await;
    let _month = mock_notion::mock_lookup(
        &mut server,
        "month-db",
        "Jul 2023",
        vec![page_json("month-1", CREATED, "Jul 2023")],
    )
    .await;
    let _day = mock_notion::mock_lookup(
        &mut server,
        "day-db",
        "5 Jul 2023",
        vec![page_json("day-1", CREATED, "5 Jul 2023")],
    )
    .await;
    let no_create = server.mock("POST", "/v1/pages").expect(0).create_async().await;

    let sync = CalendarSync::new(&client, &config);
    let report = sync.ensure_period_records(july_5th()).await.unwrap();

    no_create.assert_async().await;
    assert_eq!(report.created_count(), 0);
}

/// Test: a failed create aborts the run with the table name.
#[tokio::test]
async fn test_create_failure_aborts() {
    let mut server = mock_notion::server().await;
    let client = connect(&mut server).await;
    let config = CalendarConfig::default();

    let _week = mock_notion::mock_lookup(&mut server, "week-db", "3 - 9 Jul 2023", vec![]).await;
    let _create = server
        .mock("POST", "/v1/pages")
        .with_status(400)
        .with_body(r#"{"message":"Date Range is not a property that exists."}"#)
        .create_async()
        .await;
    let month_lookup = server
        .mock("POST", "/v1/databases/month-db/query")
        .expect(0)
        .create_async()
        .await;

    let sync = CalendarSync::new(&client, &config);
    let err = sync.ensure_period_records(july_5th()).await.unwrap_err();

    month_lookup.assert_async().await;
    assert!(err.to_string().contains("Error creating Week"));
}

/// Test: links are related to the Day of their creation date.
#[tokio::test]
async fn test_backfill_links_days() {
    let mut server = mock_notion::server().await;
    let client = connect(&mut server).await;
    let config = CalendarConfig::default();

    let _links = mock_unlinked(
        &mut server,
        vec![
            page_json("link-1", "2023-07-05T08:00:00.000Z", "Article"),
            page_json("link-2", "2023-07-05T19:00:00.000Z", "Video"),
            page_json("link-3", "2023-07-06T10:00:00.000Z", "Podcast"),
        ],
    )
    .await;
    // one lookup per distinct day
    let day_5 = server
        .mock("POST", "/v1/databases/day-db/query")
        .match_body(Matcher::PartialJson(json!({
            "filter": { "property": "Name", "text": { "equals": "5 Jul 2023" } }
        })))
        .with_status(200)
        .with_body(list_json(vec![page_json("day-5", CREATED, "5 Jul 2023")]))
        .expect(1)
        .create_async()
        .await;
    let _day_6 = mock_notion::mock_lookup(
        &mut server,
        "day-db",
        "6 Jul 2023",
        vec![page_json("day-6", CREATED, "6 Jul 2023")],
    )
    .await;
    let u1 = mock_link_update(&mut server, "link-1", "day-5").await;
    let u2 = mock_link_update(&mut server, "link-2", "day-5").await;
    let u3 = mock_link_update(&mut server, "link-3", "day-6").await;

    let sync = CalendarSync::new(&client, &config);
    let report = sync.backfill_missing_relation().await.unwrap();

    day_5.assert_async().await;
    u1.assert_async().await;
    u2.assert_async().await;
    u3.assert_async().await;
    assert_eq!(report.examined, 3);
    assert_eq!(
        report.linked,
        vec![
            ("link-1".to_string(), "day-5".to_string()),
            ("link-2".to_string(), "day-5".to_string()),
            ("link-3".to_string(), "day-6".to_string()),
        ]
    );
}

/// Test: a link whose Day is missing is not written and fails the run.
#[tokio::test]
async fn test_backfill_missing_day_is_an_error() {
    let mut server = mock_notion::server().await;
    let client = connect(&mut server).await;
    let config = CalendarConfig::default();

    let _links = mock_unlinked(
        &mut server,
        vec![
            page_json("link-1", "2023-07-04T08:00:00.000Z", "Orphan"),
            page_json("link-2", "2023-07-05T08:00:00.000Z", "Article"),
        ],
    )
    .await;
    let _day_4 = mock_notion::mock_lookup(&mut server, "day-db", "4 Jul 2023", vec![]).await;
    let _day_5 = mock_notion::mock_lookup(
        &mut server,
        "day-db",
        "5 Jul 2023",
        vec![page_json("day-5", CREATED, "5 Jul 2023")],
    )
    .await;
    let orphan_update = server
        .mock("PATCH", "/v1/pages/link-1")
        .expect(0)
        .create_async()
        .await;
    let linked = mock_link_update(&mut server, "link-2", "day-5").await;

    let sync = CalendarSync::new(&client, &config);
    let err = sync.backfill_missing_relation().await.unwrap_err();

    orphan_update.assert_async().await;
    linked.assert_async().await;
    match err {
        SyncError::MissingDays { missing, updated } => {
            assert_eq!(updated, 1);
            assert_eq!(missing.len(), 1);
            assert_eq!(missing[0].link_id, "link-1");
            assert_eq!(missing[0].day, "4 Jul 2023");
        }
        other => panic!("unexpected error: {other}"),
    }
}

/// Test: creation timestamps are read in the configured time zone.
#[tokio::test]
async fn test_backfill_uses_time_zone() {
    let mut server = mock_notion::server().await;
    let _search = mock_notion::mock_search(&mut server, DATABASES).await;
    let client = DatabaseClient::connect(
        client_config(&server).with_time_zone(chrono_tz::Australia::Sydney),
    )
    .await
    .unwrap_or_else(|e| panic!("connect: {e}"));
    let config = CalendarConfig::default();

    // 20:00 UTC on the 5th is the morning of the 6th in Sydney
    let _links = mock_unlinked(
        &mut server,
        vec![page_json("link-1", "2023-07-05T20:00:00.000Z", "Late")],
    )
    .await;
    let lookup = mock_notion::mock_lookup(
        &mut server,
        "day-db",
        "6 Jul 2023",
        vec![page_json("day-6", CREATED, "6 Jul 2023")],
    )
    .await;
    let update = mock_link_update(&mut server, "link-1", "day-6").await;

    let sync = CalendarSync::new(&client, &config);
    let report = sync.backfill_missing_relation().await.unwrap();

    lookup.assert_async().await;
    update.assert_async().await;
    assert_eq!(report.linked.len(), 1);
}

/// Test: nothing to backfill is a successful, empty run.
#[tokio::test]
async fn test_backfill_nothing_to_do() {
    let mut server = mock_notion::server().await;
    let client = connect(&mut server).await;
    let config = CalendarConfig::default();

    let _links = mock_unlinked(&mut server, vec![]).await;

    let sync = CalendarSync::new(&client, &config);
    let report = sync.backfill_missing_relation().await.unwrap();
    assert_eq!(report.examined, 0);
    assert!(report.linked.is_empty());
}

/// Test: the backfill page size follows the config.
#[tokio::test]
async fn test_backfill_limit_from_config() {
    let mut server = mock_notion::server().await;
    let client = connect(&mut server).await;
    let mut config = CalendarConfig::default();
    config.backfill_limit = 5;

    let links = server
        .mock("POST", "/v1/databases/links-db/query")
        .match_body(Matcher::PartialJson(json!({ "page_size": 5 })))
        .with_status(200)
        .with_body(list_json(vec![]))
        .expect(1)
        .create_async()
        .await;

    let sync = CalendarSync::new(&client, &config);
    sync.backfill_missing_relation().await.unwrap();
    links.assert_async().await;
}
