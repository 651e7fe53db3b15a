//! Helpers for standing up a mock Notion API.

use daybook_core::notion::{ClientConfig, DatabaseClient, NOTION_VERSION};
use mockito::{Matcher, Mock, ServerGuard};
use serde_json::{json, Value};

pub const SECRET: &str = "secret_test_token";

/// Databases returned by the default search mock.
pub const DATABASES: &[(&str, &str)] = &[
    ("day-db", "My Days"),
    ("week-db", "Week"),
    ("month-db", "Month"),
    ("links-db", "Resonance Calendar"),
];

pub async fn server() -> ServerGuard {
    mockito::Server::new_async().await
}

/// Page object as the API returns it.
pub fn page_json(id: &str, created_time: &str, title: &str) -> Value {
    json!({
        "object": "page",
        "id": id,
        "created_time": created_time,
        "last_edited_time": created_time,
        "archived": false,
        "properties": {
            "Name": {
                "id": "title",
                "type": "title",
                "title": [{ "plain_text": title, "text": { "content": title } }]
            }
        }
    })
}

pub fn list_json(results: Vec<Value>) -> String {
    json!({ "object": "list", "results": results, "has_more": false }).to_string()
}

/// Mock of `POST /v1/search` listing `databases`.
pub async fn mock_search(server: &mut ServerGuard, databases: &[(&str, &str)]) -> Mock {
    let results = databases
        .iter()
        .map(|(id, title)| {
            json!({
                "object": "database",
                "id": id,
                "title": [{ "type": "text", "plain_text": title }]
            })
        })
        .collect();

    server
        .mock("POST", "/v1/search")
        .match_header("authorization", format!("Bearer {SECRET}").as_str())
        .match_header("notion-version", NOTION_VERSION)
        .match_body(Matcher::PartialJson(json!({
            "filter": { "value": "database", "property": "object" }
        })))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(list_json(results))
        .create_async()
        .await
}

/// Mock of a `Name equals title` lookup in `database_id`.
pub async fn mock_lookup(
    server: &mut ServerGuard,
    database_id: &str,
    title: &str,
    results: Vec<Value>,
) -> Mock {
    server
        .mock("POST", format!("/v1/databases/{database_id}/query").as_str())
        .match_body(Matcher::PartialJson(json!({
            "filter": { "property": "Name", "text": { "equals": title } },
            "page_size": 1
        })))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(list_json(results))
        .create_async()
        .await
}

pub fn client_config(server: &ServerGuard) -> ClientConfig {
    ClientConfig::new(SECRET).with_base_url(server.url())
}

/// Client connected to `server` with the default databases.
pub async fn connect(server: &mut ServerGuard) -> DatabaseClient {
    mock_search(server, DATABASES).await;
    DatabaseClient::connect(client_config(server))
        .await
        .expect("connect to mock server")
}
