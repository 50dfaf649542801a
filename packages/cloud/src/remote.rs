// ABOUTME: RemoteStore adapter speaking PostgREST to the hosted backend
// ABOUTME: One route per collection under /rest/v1, canonical rows come back on every write

use crate::config::CloudConfig;
use async_trait::async_trait;
use milemap_core::{
    AnalysisLog, DepartmentConfig, DepartmentPatch, FeedbackItem, FeedbackStatus, ItemPatch,
    NewAnalysisLog, NewFeedback, NewRoadmapItem, OwnerConfig, OwnerPatch, RoadmapItem,
};
use milemap_storage::{
    mappers, AnalysisLogRecord, Collection, DepartmentRecord, ItemRecord, JsonMap, OwnerRecord,
    RemoteStore, StorageError, StorageResult,
};
use reqwest::{Client, Method, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::json;
use std::sync::RwLock;
use std::time::Duration;
use tracing::warn;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// `RemoteStore` over the hosted REST surface.
///
/// Every collection maps to `{api_url}/rest/v1/{table}`; writes ask for
/// `return=representation` so the canonical stored row flows back to the
/// caller. Requests authenticate with the anon `apikey` plus a bearer
/// token: the signed-in user's access token when one has been supplied,
/// the anon key itself otherwise.
pub struct RestRemote {
    http: Client,
    api_url: String,
    api_key: String,
    access_token: RwLock<Option<String>>,
}

impl RestRemote {
    pub fn new(config: CloudConfig) -> StorageResult<Self> {
        let http = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(transport)?;
        Ok(RestRemote {
            http,
            api_url: config.api_url,
            api_key: config.api_key,
            access_token: RwLock::new(None),
        })
    }

    /// Installs (or clears) the signed-in user's access token. Call on
    /// every `SignedIn`/`SignedOut` transition so row-level security sees
    /// the right principal.
    pub fn set_access_token(&self, token: Option<String>) {
        *self
            .access_token
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner()) = token;
    }

    fn auth_header(&self) -> String {
        let token = self
            .access_token
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        match token.as_deref() {
            Some(token) => format!("Bearer {}", token),
            None => format!("Bearer {}", self.api_key),
        }
    }

    fn request(&self, method: Method, collection: Collection) -> RequestBuilder {
        let url = format!("{}/rest/v1/{}", self.api_url, collection.as_str());
        self.http
            .request(method, url)
            .header("apikey", &self.api_key)
            .header("Authorization", self.auth_header())
    }

    async fn fetch<T: DeserializeOwned>(
        &self,
        collection: Collection,
        query: &[(&str, &str)],
    ) -> StorageResult<Vec<T>> {
        let response = self
            .request(Method::GET, collection)
            .query(query)
            .send()
            .await
            .map_err(transport)?;
        if !response.status().is_success() {
            return Err(error_for(response, collection).await);
        }
        decode(response).await
    }

    async fn create<T: DeserializeOwned>(
        &self,
        collection: Collection,
        row: &impl Serialize,
    ) -> StorageResult<T> {
        let response = self
            .request(Method::POST, collection)
            .header("Content-Type", "application/json")
            .header("Prefer", "return=representation")
            .json(row)
            .send()
            .await
            .map_err(transport)?;
        let status = response.status();
        match status {
            StatusCode::CREATED | StatusCode::OK => {
                let rows: Vec<T> = decode(response).await?;
                rows.into_iter().next().ok_or_else(|| StorageError::Http {
                    status: status.as_u16(),
                    message: format!("insert into {collection} returned no representation"),
                })
            }
            _ => Err(error_for(response, collection).await),
        }
    }

    async fn modify<T: DeserializeOwned>(
        &self,
        collection: Collection,
        key_column: &str,
        key: &str,
        row: &impl Serialize,
    ) -> StorageResult<T> {
        let response = self
            .request(Method::PATCH, collection)
            .header("Content-Type", "application/json")
            .header("Prefer", "return=representation")
            .query(&[(key_column, format!("eq.{}", key))])
            .json(row)
            .send()
            .await
            .map_err(transport)?;
        match response.status() {
            StatusCode::OK => {
                let rows: Vec<T> = decode(response).await?;
                // an empty representation means the filter matched no row
                rows.into_iter()
                    .next()
                    .ok_or_else(|| StorageError::RowMissing {
                        collection,
                        id: key.to_string(),
                    })
            }
            _ => Err(error_for(response, collection).await),
        }
    }

    async fn remove(
        &self,
        collection: Collection,
        key_column: &str,
        key: &str,
    ) -> StorageResult<()> {
        let response = self
            .request(Method::DELETE, collection)
            .query(&[(key_column, format!("eq.{}", key))])
            .send()
            .await
            .map_err(transport)?;
        // deleting a row that is already gone matches zero rows and succeeds
        if response.status().is_success() {
            Ok(())
        } else {
            Err(error_for(response, collection).await)
        }
    }
}

fn transport(err: reqwest::Error) -> StorageError {
    StorageError::Transport(err.to_string())
}

async fn decode<T: DeserializeOwned>(response: Response) -> StorageResult<T> {
    let body = response.text().await.map_err(transport)?;
    Ok(serde_json::from_str(&body)?)
}

async fn error_for(response: Response, collection: Collection) -> StorageError {
    let status = response.status();
    warn!(
        "REST request failed: collection={} status={}",
        collection, status
    );
    if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
        return StorageError::Unauthorized;
    }
    let body = response
        .text()
        .await
        .unwrap_or_else(|_| status.to_string());
    // 42P01 is the backend's "relation does not exist": the table was never
    // provisioned, which callers treat differently from a plain 404
    if status == StatusCode::NOT_FOUND && body.contains("42P01") {
        return StorageError::CollectionMissing(collection);
    }
    StorageError::Http {
        status: status.as_u16(),
        message: body,
    }
}

#[async_trait]
impl RemoteStore for RestRemote {
    async fn list_items(&self) -> StorageResult<Vec<RoadmapItem>> {
        let rows: Vec<ItemRecord> = self
            .fetch(
                Collection::Items,
                &[("select", "*"), ("order", "created_at.asc")],
            )
            .await?;
        Ok(rows.into_iter().map(mappers::item_from_record).collect())
    }

    async fn insert_item(&self, item: &NewRoadmapItem) -> StorageResult<RoadmapItem> {
        let row = mappers::new_item_to_record(item);
        let record: ItemRecord = self.create(Collection::Items, &row).await?;
        Ok(mappers::item_from_record(record))
    }

    async fn update_item(&self, id: &str, patch: &ItemPatch) -> StorageResult<RoadmapItem> {
        let row = mappers::item_patch_to_record(patch);
        let record: ItemRecord = self.modify(Collection::Items, "id", id, &row).await?;
        Ok(mappers::item_from_record(record))
    }

    async fn delete_item(&self, id: &str) -> StorageResult<()> {
        self.remove(Collection::Items, "id", id).await
    }

    async fn list_departments(&self) -> StorageResult<Vec<DepartmentConfig>> {
        let rows: Vec<DepartmentRecord> = self
            .fetch(
                Collection::Departments,
                &[("select", "*"), ("order", "sort_order.asc")],
            )
            .await?;
        Ok(rows
            .into_iter()
            .map(mappers::department_from_record)
            .collect())
    }

    async fn insert_department(
        &self,
        dept: &DepartmentConfig,
        sort_order: i64,
    ) -> StorageResult<DepartmentConfig> {
        let mut row = mappers::department_to_record(dept);
        row.insert("sort_order".into(), json!(sort_order));
        let record: DepartmentRecord = self.create(Collection::Departments, &row).await?;
        Ok(mappers::department_from_record(record))
    }

    async fn update_department(
        &self,
        key: &str,
        patch: &DepartmentPatch,
    ) -> StorageResult<DepartmentConfig> {
        let row = mappers::department_patch_to_record(patch);
        let record: DepartmentRecord = self
            .modify(Collection::Departments, "key", key, &row)
            .await?;
        Ok(mappers::department_from_record(record))
    }

    async fn delete_department(&self, key: &str) -> StorageResult<()> {
        self.remove(Collection::Departments, "key", key).await
    }

    async fn list_owners(&self) -> StorageResult<Vec<OwnerConfig>> {
        let rows: Vec<OwnerRecord> = self
            .fetch(
                Collection::Owners,
                &[("select", "*"), ("order", "sort_order.asc")],
            )
            .await?;
        Ok(rows.into_iter().map(mappers::owner_from_record).collect())
    }

    async fn insert_owner(
        &self,
        owner: &OwnerConfig,
        sort_order: i64,
    ) -> StorageResult<OwnerConfig> {
        let mut row = mappers::owner_to_record(owner);
        row.insert("sort_order".into(), json!(sort_order));
        let record: OwnerRecord = self.create(Collection::Owners, &row).await?;
        Ok(mappers::owner_from_record(record))
    }

    async fn update_owner(&self, key: &str, patch: &OwnerPatch) -> StorageResult<OwnerConfig> {
        let row = mappers::owner_patch_to_record(patch);
        let record: OwnerRecord = self.modify(Collection::Owners, "key", key, &row).await?;
        Ok(mappers::owner_from_record(record))
    }

    async fn delete_owner(&self, key: &str) -> StorageResult<()> {
        self.remove(Collection::Owners, "key", key).await
    }

    async fn list_feedback(&self) -> StorageResult<Vec<FeedbackItem>> {
        // feedback rows share the domain shape, no mapper needed
        self.fetch(
            Collection::Feedback,
            &[("select", "*"), ("order", "created_at.desc")],
        )
        .await
    }

    async fn insert_feedback(&self, feedback: &NewFeedback) -> StorageResult<FeedbackItem> {
        self.create(Collection::Feedback, feedback).await
    }

    async fn update_feedback_status(
        &self,
        id: &str,
        status: FeedbackStatus,
    ) -> StorageResult<FeedbackItem> {
        let mut row = JsonMap::new();
        row.insert("status".into(), json!(status));
        self.modify(Collection::Feedback, "id", id, &row).await
    }

    async fn list_analysis_logs(&self, limit: usize) -> StorageResult<Vec<AnalysisLog>> {
        let limit = limit.to_string();
        let rows: Vec<AnalysisLogRecord> = self
            .fetch(
                Collection::AnalysisLogs,
                &[
                    ("select", "*"),
                    ("order", "created_at.desc"),
                    ("limit", &limit),
                ],
            )
            .await?;
        Ok(rows
            .into_iter()
            .map(mappers::analysis_log_from_record)
            .collect())
    }

    async fn insert_analysis_log(&self, log: &NewAnalysisLog) -> StorageResult<AnalysisLog> {
        let row = mappers::new_analysis_log_to_record(log);
        let record: AnalysisLogRecord = self.create(Collection::AnalysisLogs, &row).await?;
        Ok(mappers::analysis_log_from_record(record))
    }
}
