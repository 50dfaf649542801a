// ABOUTME: Wire-format row shapes as the remote store returns them
// ABOUTME: snake_case columns, nullable scalars, jsonb arrays that may be null

use chrono::{DateTime, NaiveDate, Utc};
use milemap_core::{AnalysisType, ItemLink, ItemStatus, Milestone, Priority};
use serde::{Deserialize, Serialize};

/// Partial row payload for inserts and updates. Keys absent from the map are
/// not touched remotely.
pub type JsonMap = serde_json::Map<String, serde_json::Value>;

/// A `roadmap_items` row
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ItemRecord {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub subtitle: Option<String>,
    pub department: String,
    pub priority: Priority,
    pub status: ItemStatus,
    pub owner: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub progress: u8,
    #[serde(default)]
    pub parent_id: Option<String>,
    #[serde(default)]
    pub milestones: Option<Vec<Milestone>>,
    #[serde(default)]
    pub dependencies: Option<Vec<String>>,
    #[serde(default)]
    pub links: Option<Vec<ItemLink>>,
    #[serde(default)]
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A `departments` row; sort_order and created_at are server-side concerns
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DepartmentRecord {
    pub key: String,
    pub name_th: String,
    pub name_en: String,
    pub color: String,
    pub bg_class: String,
    pub text_class: String,
    pub border_class: String,
    pub sort_order: i64,
    pub created_at: DateTime<Utc>,
}

/// An `owners` row
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct OwnerRecord {
    pub key: String,
    pub label: String,
    #[serde(default)]
    pub color: Option<String>,
    pub sort_order: i64,
    pub created_at: DateTime<Utc>,
}

/// An `analysis_logs` row
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AnalysisLogRecord {
    pub id: String,
    pub user_id: String,
    pub user_email: String,
    pub analysis_type: AnalysisType,
    #[serde(default)]
    pub item_id: Option<String>,
    pub prompt_summary: String,
    pub result_markdown: String,
    pub model_used: String,
    pub created_at: DateTime<Utc>,
}
