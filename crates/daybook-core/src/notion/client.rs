//! DatabaseClient: authenticated query/create/update against Notion databases.
//!
//! Databases are addressed by display name. The name -> id catalog is
//! fetched once in [`DatabaseClient::connect`] and never refreshed, so a
//! database shared or renamed after connecting is invisible to the client.

use std::time::Duration;

use chrono_tz::Tz;
use reqwest::{Client, Method, RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use serde_json::json;
use url::Url;

use super::catalog::{DatabaseSummary, TableCatalog};
use super::filter::{title_equals, FilterExpression};
use super::page::{ListResponse, Page};
use super::property::Properties;
use crate::error::NotionError;

/// API version sent with every request.
pub const NOTION_VERSION: &str = "2021-05-13";
pub const DEFAULT_BASE_URL: &str = "https://api.notion.com";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Title property label used by [`DatabaseClient::get`].
pub const TITLE_PROPERTY: &str = "Name";

/// Everything a client needs; nothing is read from ambient state.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Internal integration secret.
    pub credential: String,
    /// Zone used to turn instants into calendar dates.
    pub time_zone: Tz,
    pub base_url: String,
    pub timeout: Duration,
}

impl ClientConfig {
    pub fn new(credential: impl Into<String>) -> Self {
        Self {
            credential: credential.into(),
            time_zone: Tz::UTC,
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }

    pub fn with_time_zone(mut self, time_zone: Tz) -> Self {
        self.time_zone = time_zone;
        self
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

/// Client for the databases shared with one integration.
pub struct DatabaseClient {
    config: ClientConfig,
    base_url: Url,
    http_client: Client,
    catalog: TableCatalog,
}

impl DatabaseClient {
    /// Build the client and fetch the table catalog.
    ///
    /// # Errors
    ///
    /// Fails if the base URL is invalid or the database listing fails; no
    /// client with a partial catalog is ever returned.
    pub async fn connect(config: ClientConfig) -> Result<Self, NotionError> {
        let mut base_url = Url::parse(&config.base_url)?;
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }
        let http_client = Client::builder().timeout(config.timeout).build()?;

        let mut client = Self {
            config,
            base_url,
            http_client,
            catalog: TableCatalog::default(),
        };
        client.catalog = client.list_databases().await?;
        Ok(client)
    }

    /// Only the first page of search results is read.
    async fn list_databases(&self) -> Result<TableCatalog, NotionError> {
        let body = json!({
            "filter": {
                "value": "database",
                "property": "object"
            }
        });

        let request = self.request(Method::POST, "v1/search")?.json(&body);
        let resp: ListResponse<DatabaseSummary> =
            Self::send(request, |status, body| NotionError::ListFailed { status, body }).await?;

        let catalog = TableCatalog::from_summaries(resp.results);
        tracing::debug!(
            databases = ?catalog.iter().collect::<Vec<_>>(),
            "fetched database catalog"
        );
        Ok(catalog)
    }

    /// Records of `table` matching `filter`, in the order the service
    /// returns them. At most `page_size` records are returned.
    ///
    /// # Errors
    ///
    /// `UnknownTable` before any request if `table` is not in the catalog;
    /// `QueryFailed` (or `Unauthorized`) on a non-success status.
    pub async fn query(
        &self,
        table: &str,
        filter: &FilterExpression,
        page_size: Option<u32>,
    ) -> Result<Vec<Page>, NotionError> {
        let database_id = self.catalog.resolve(table)?;

        let mut body = json!({ "filter": filter });
        if let Some(size) = page_size {
            body["page_size"] = json!(size);
        }

        tracing::debug!(table, database_id, ?page_size, "querying database");
        let request = self
            .request(Method::POST, &format!("v1/databases/{database_id}/query"))?
            .json(&body);
        let resp: ListResponse<Page> = Self::send(request, |status, body| NotionError::QueryFailed {
            table: table.to_string(),
            status,
            body,
        })
        .await?;

        let mut results = resp.results;
        if let Some(size) = page_size {
            results.truncate(size as usize);
        }
        Ok(results)
    }

    /// First record of `table` whose `Name` equals `title`, if any.
    pub async fn get(&self, table: &str, title: &str) -> Result<Option<Page>, NotionError> {
        self.get_by(table, TITLE_PROPERTY, title).await
    }

    /// First record of `table` whose title property `property` equals
    /// `title`, if any.
    pub async fn get_by(
        &self,
        table: &str,
        property: &str,
        title: &str,
    ) -> Result<Option<Page>, NotionError> {
        let filter = title_equals(property, title);
        let mut results = self.query(table, &filter, Some(1)).await?;
        Ok(if results.is_empty() {
            None
        } else {
            Some(results.swap_remove(0))
        })
    }

    /// Create a record in `table`. Always creates, even if an equal record
    /// already exists.
    pub async fn create(&self, table: &str, properties: &Properties) -> Result<Page, NotionError> {
        let database_id = self.catalog.resolve(table)?;

        let body = json!({
            "parent": { "database_id": database_id },
            "properties": properties,
        });

        let request = self.request(Method::POST, "v1/pages")?.json(&body);
        let page: Page = Self::send(request, |status, body| NotionError::CreateFailed {
            table: table.to_string(),
            status,
            body,
        })
        .await?;

        tracing::info!(table, page_id = %page.id, "created page");
        Ok(page)
    }

    /// Change only the given properties of a record.
    pub async fn update(&self, page_id: &str, properties: &Properties) -> Result<Page, NotionError> {
        let body = json!({ "properties": properties });

        let request = self
            .request(Method::PATCH, &format!("v1/pages/{page_id}"))?
            .json(&body);
        let page: Page = Self::send(request, |status, body| NotionError::UpdateFailed {
            page_id: page_id.to_string(),
            status,
            body,
        })
        .await?;

        tracing::info!(page_id = %page.id, "updated page");
        Ok(page)
    }

    pub fn catalog(&self) -> &TableCatalog {
        &self.catalog
    }

    /// Remote id of the database called `table`.
    pub fn database_id(&self, table: &str) -> Result<&str, NotionError> {
        self.catalog.resolve(table)
    }

    pub fn time_zone(&self) -> Tz {
        self.config.time_zone
    }

    fn request(&self, method: Method, path: &str) -> Result<RequestBuilder, NotionError> {
        let url = self.base_url.join(path)?;
        Ok(self
            .http_client
            .request(method, url)
            .bearer_auth(&self.config.credential)
            .header("Notion-Version", NOTION_VERSION))
    }

    /// Send `request` and decode a 200 body, mapping any other status
    /// through `on_error` (401 always maps to `Unauthorized`).
    async fn send<T, F>(request: RequestBuilder, on_error: F) -> Result<T, NotionError>
    where
        T: DeserializeOwned,
        F: FnOnce(u16, String) -> NotionError,
    {
        let resp = request.send().await?;
        let status = resp.status();
        let text = resp.text().await?;

        if status == StatusCode::OK {
            return Ok(serde_json::from_str(&text)?);
        }

        tracing::error!(status = status.as_u16(), body = %text, "Notion request failed");
        if status == StatusCode::UNAUTHORIZED {
            return Err(NotionError::Unauthorized {
                status: status.as_u16(),
                body: text,
            });
        }
        Err(on_error(status.as_u16(), text))
    }
}
