// ABOUTME: Traits every remote backend implements: typed CRUD plus a change feed
// ABOUTME: Implemented by the REST adapter in milemap-cloud and by MemoryRemote for tests

use crate::error::{Collection, StorageResult};
use async_trait::async_trait;
use milemap_core::{
    AnalysisLog, DepartmentConfig, DepartmentPatch, FeedbackItem, FeedbackStatus, ItemPatch,
    NewAnalysisLog, NewFeedback, NewRoadmapItem, OwnerConfig, OwnerPatch, RoadmapItem,
};
use serde_json::Value;
use tokio::sync::broadcast;

/// What a change event did to its row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeAction {
    Insert,
    Update,
    Delete,
}

/// One row-level change as announced by the backend. Deletes carry only
/// `old_record`; inserts carry only `record`; updates may carry both.
#[derive(Debug, Clone)]
pub struct ChangeEvent {
    pub collection: Collection,
    pub action: ChangeAction,
    pub record: Option<Value>,
    pub old_record: Option<Value>,
}

/// Typed persistence surface for the five collections.
///
/// Every write returns the canonical row as the backend stored it, so callers
/// merge what the server actually persisted rather than what they sent.
#[async_trait]
pub trait RemoteStore: Send + Sync {
    async fn list_items(&self) -> StorageResult<Vec<RoadmapItem>>;
    async fn insert_item(&self, item: &NewRoadmapItem) -> StorageResult<RoadmapItem>;
    async fn update_item(&self, id: &str, patch: &ItemPatch) -> StorageResult<RoadmapItem>;
    async fn delete_item(&self, id: &str) -> StorageResult<()>;

    async fn list_departments(&self) -> StorageResult<Vec<DepartmentConfig>>;
    async fn insert_department(
        &self,
        dept: &DepartmentConfig,
        sort_order: i64,
    ) -> StorageResult<DepartmentConfig>;
    async fn update_department(
        &self,
        key: &str,
        patch: &DepartmentPatch,
    ) -> StorageResult<DepartmentConfig>;
    async fn delete_department(&self, key: &str) -> StorageResult<()>;

    async fn list_owners(&self) -> StorageResult<Vec<OwnerConfig>>;
    async fn insert_owner(&self, owner: &OwnerConfig, sort_order: i64)
        -> StorageResult<OwnerConfig>;
    async fn update_owner(&self, key: &str, patch: &OwnerPatch) -> StorageResult<OwnerConfig>;
    async fn delete_owner(&self, key: &str) -> StorageResult<()>;

    async fn list_feedback(&self) -> StorageResult<Vec<FeedbackItem>>;
    async fn insert_feedback(&self, feedback: &NewFeedback) -> StorageResult<FeedbackItem>;
    async fn update_feedback_status(
        &self,
        id: &str,
        status: FeedbackStatus,
    ) -> StorageResult<FeedbackItem>;

    /// Newest first, capped at `limit` rows.
    async fn list_analysis_logs(&self, limit: usize) -> StorageResult<Vec<AnalysisLog>>;
    async fn insert_analysis_log(&self, log: &NewAnalysisLog) -> StorageResult<AnalysisLog>;
}

/// Live notification stream for row changes across all collections.
#[async_trait]
pub trait ChangeFeed: Send + Sync {
    /// Subscribing twice hands back independent receivers over the same
    /// underlying feed; events published before a subscribe are not replayed.
    async fn subscribe(&self) -> StorageResult<broadcast::Receiver<ChangeEvent>>;
}
