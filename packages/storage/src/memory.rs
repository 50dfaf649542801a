// ABOUTME: In-memory RemoteStore with a broadcast change feed, used by tests and demos
// ABOUTME: Mirrors the hosted backend contract: canonical rows, 409 on duplicate keys, fault injection

use crate::error::{Collection, StorageError, StorageResult};
use crate::mappers;
use crate::remote::{ChangeAction, ChangeEvent, ChangeFeed, RemoteStore};
use crate::wire::{AnalysisLogRecord, DepartmentRecord, ItemRecord, JsonMap, OwnerRecord};
use async_trait::async_trait;
use chrono::Utc;
use milemap_core::{
    generate_entity_id, AnalysisLog, DepartmentConfig, DepartmentPatch, FeedbackItem,
    FeedbackStatus, ItemPatch, NewAnalysisLog, NewFeedback, NewRoadmapItem, OwnerConfig,
    OwnerPatch, RoadmapItem,
};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{json, Value};
use std::collections::HashSet;
use std::sync::{Mutex, RwLock, RwLockReadGuard, RwLockWriteGuard};
use tokio::sync::broadcast;

const EVENT_CAPACITY: usize = 64;

#[derive(Default)]
struct MemoryState {
    items: Vec<ItemRecord>,
    departments: Vec<DepartmentRecord>,
    owners: Vec<OwnerRecord>,
    feedback: Vec<FeedbackItem>,
    analysis_logs: Vec<AnalysisLogRecord>,
}

/// Backend stand-in that keeps every collection in process memory.
///
/// Writes behave like the hosted service: ids and timestamps are assigned
/// here, every mutation returns the canonical row and announces itself on
/// the change feed, and updating a row that does not exist is an error
/// while deleting one is not.
pub struct MemoryRemote {
    state: RwLock<MemoryState>,
    failures: Mutex<HashSet<Collection>>,
    analysis_logs_provisioned: bool,
    events: broadcast::Sender<ChangeEvent>,
}

impl Default for MemoryRemote {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryRemote {
    pub fn new() -> Self {
        let (events, _) = broadcast::channel(EVENT_CAPACITY);
        MemoryRemote {
            state: RwLock::new(MemoryState::default()),
            failures: Mutex::new(HashSet::new()),
            analysis_logs_provisioned: true,
            events,
        }
    }

    /// A deployment whose analysis_logs table was never migrated.
    pub fn without_analysis_logs() -> Self {
        MemoryRemote {
            analysis_logs_provisioned: false,
            ..Self::new()
        }
    }

    /// Arms a one-shot fault: the next call touching `collection` fails
    /// with an HTTP 500 and the fault clears.
    pub fn fail_next(&self, collection: Collection) {
        self.lock_failures().insert(collection);
    }

    /// Live feed receivers, countable so tests can assert subscription
    /// lifecycle without racing the consumer.
    pub fn feed_subscribers(&self) -> usize {
        self.events.receiver_count()
    }

    pub fn seed_items(&self, items: Vec<RoadmapItem>) {
        self.write().items.extend(items.into_iter().map(record_from_item));
    }

    pub fn seed_departments(&self, departments: Vec<DepartmentConfig>) {
        let now = Utc::now();
        self.write()
            .departments
            .extend(departments.into_iter().enumerate().map(|(idx, dept)| {
                record_from_department(&dept, idx as i64, now)
            }));
    }

    pub fn seed_owners(&self, owners: Vec<OwnerConfig>) {
        let now = Utc::now();
        self.write().owners.extend(
            owners
                .into_iter()
                .enumerate()
                .map(|(idx, owner)| record_from_owner(&owner, idx as i64, now)),
        );
    }

    pub fn seed_feedback(&self, feedback: Vec<FeedbackItem>) {
        self.write().feedback.extend(feedback);
    }

    pub fn seed_analysis_logs(&self, logs: Vec<AnalysisLog>) {
        self.write()
            .analysis_logs
            .extend(logs.into_iter().map(record_from_analysis_log));
    }

    fn read(&self) -> RwLockReadGuard<'_, MemoryState> {
        self.state
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn write(&self) -> RwLockWriteGuard<'_, MemoryState> {
        self.state
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn lock_failures(&self) -> std::sync::MutexGuard<'_, HashSet<Collection>> {
        self.failures
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn take_failure(&self, collection: Collection) -> StorageResult<()> {
        if self.lock_failures().remove(&collection) {
            return Err(StorageError::Http {
                status: 500,
                message: format!("injected fault on {collection}"),
            });
        }
        Ok(())
    }

    fn require_analysis_logs(&self) -> StorageResult<()> {
        if self.analysis_logs_provisioned {
            Ok(())
        } else {
            Err(StorageError::CollectionMissing(Collection::AnalysisLogs))
        }
    }

    fn publish(
        &self,
        collection: Collection,
        action: ChangeAction,
        record: Option<Value>,
        old_record: Option<Value>,
    ) {
        // nobody listening is fine
        let _ = self.events.send(ChangeEvent {
            collection,
            action,
            record,
            old_record,
        });
    }
}

/// Applies wire columns over an existing row, PostgREST-style: present keys
/// overwrite, absent keys keep the stored value.
fn merge_record<T>(row: &T, columns: &JsonMap) -> StorageResult<T>
where
    T: Serialize + DeserializeOwned,
{
    let mut value = serde_json::to_value(row)?;
    if let Value::Object(map) = &mut value {
        for (key, column) in columns {
            map.insert(key.clone(), column.clone());
        }
    }
    Ok(serde_json::from_value(value)?)
}

fn record_from_item(item: RoadmapItem) -> ItemRecord {
    ItemRecord {
        id: item.id,
        title: item.title,
        subtitle: item.subtitle,
        department: item.department,
        priority: item.priority,
        status: item.status,
        owner: item.owner,
        start_date: item.start_date,
        end_date: item.end_date,
        progress: item.progress,
        parent_id: item.parent_id,
        milestones: Some(item.milestones),
        dependencies: Some(item.dependencies),
        links: item.links,
        notes: item.notes,
        created_at: item.created_at,
        updated_at: item.updated_at,
    }
}

fn record_from_department(
    dept: &DepartmentConfig,
    sort_order: i64,
    created_at: chrono::DateTime<Utc>,
) -> DepartmentRecord {
    DepartmentRecord {
        key: dept.key.clone(),
        name_th: dept.name_th.clone(),
        name_en: dept.name_en.clone(),
        color: dept.color.clone(),
        bg_class: dept.bg_class.clone(),
        text_class: dept.text_class.clone(),
        border_class: dept.border_class.clone(),
        sort_order,
        created_at,
    }
}

fn record_from_owner(
    owner: &OwnerConfig,
    sort_order: i64,
    created_at: chrono::DateTime<Utc>,
) -> OwnerRecord {
    OwnerRecord {
        key: owner.key.clone(),
        label: owner.label.clone(),
        color: owner.color.clone().filter(|c| !c.is_empty()),
        sort_order,
        created_at,
    }
}

fn record_from_analysis_log(log: AnalysisLog) -> AnalysisLogRecord {
    AnalysisLogRecord {
        id: log.id,
        user_id: log.user_id,
        user_email: log.user_email,
        analysis_type: log.analysis_type,
        item_id: log.item_id,
        prompt_summary: log.prompt_summary,
        result_markdown: log.result_markdown,
        model_used: log.model_used,
        created_at: log.created_at,
    }
}

fn duplicate_key(constraint: &str) -> StorageError {
    StorageError::Http {
        status: 409,
        message: format!("duplicate key value violates unique constraint \"{constraint}\""),
    }
}

#[async_trait]
impl RemoteStore for MemoryRemote {
    async fn list_items(&self) -> StorageResult<Vec<RoadmapItem>> {
        self.take_failure(Collection::Items)?;
        let mut records = self.read().items.clone();
        records.sort_by(|a, b| a.created_at.cmp(&b.created_at));
        Ok(records.into_iter().map(mappers::item_from_record).collect())
    }

    async fn insert_item(&self, item: &NewRoadmapItem) -> StorageResult<RoadmapItem> {
        self.take_failure(Collection::Items)?;
        let now = Utc::now();
        let mut row = mappers::new_item_to_record(item);
        row.insert("id".into(), json!(generate_entity_id()));
        row.insert("created_at".into(), json!(now));
        row.insert("updated_at".into(), json!(now));
        let record: ItemRecord = serde_json::from_value(Value::Object(row))?;
        self.write().items.push(record.clone());
        self.publish(
            Collection::Items,
            ChangeAction::Insert,
            Some(serde_json::to_value(&record)?),
            None,
        );
        Ok(mappers::item_from_record(record))
    }

    async fn update_item(&self, id: &str, patch: &ItemPatch) -> StorageResult<RoadmapItem> {
        self.take_failure(Collection::Items)?;
        let columns = mappers::item_patch_to_record(patch);
        let (record, previous) = {
            let mut state = self.write();
            let slot = state
                .items
                .iter_mut()
                .find(|r| r.id == id)
                .ok_or_else(|| StorageError::RowMissing {
                    collection: Collection::Items,
                    id: id.to_string(),
                })?;
            let previous = serde_json::to_value(&*slot)?;
            let mut merged: ItemRecord = merge_record(&*slot, &columns)?;
            merged.updated_at = Utc::now();
            *slot = merged.clone();
            (merged, previous)
        };
        self.publish(
            Collection::Items,
            ChangeAction::Update,
            Some(serde_json::to_value(&record)?),
            Some(previous),
        );
        Ok(mappers::item_from_record(record))
    }

    async fn delete_item(&self, id: &str) -> StorageResult<()> {
        self.take_failure(Collection::Items)?;
        let removed = {
            let mut state = self.write();
            match state.items.iter().position(|r| r.id == id) {
                Some(pos) => Some(state.items.remove(pos)),
                None => None,
            }
        };
        if let Some(record) = removed {
            self.publish(
                Collection::Items,
                ChangeAction::Delete,
                None,
                Some(serde_json::to_value(&record)?),
            );
        }
        Ok(())
    }

    async fn list_departments(&self) -> StorageResult<Vec<DepartmentConfig>> {
        self.take_failure(Collection::Departments)?;
        let mut records = self.read().departments.clone();
        records.sort_by_key(|r| r.sort_order);
        Ok(records
            .into_iter()
            .map(mappers::department_from_record)
            .collect())
    }

    async fn insert_department(
        &self,
        dept: &DepartmentConfig,
        sort_order: i64,
    ) -> StorageResult<DepartmentConfig> {
        self.take_failure(Collection::Departments)?;
        let record = {
            let mut state = self.write();
            if state.departments.iter().any(|r| r.key == dept.key) {
                return Err(duplicate_key("departments_pkey"));
            }
            let record = record_from_department(dept, sort_order, Utc::now());
            state.departments.push(record.clone());
            record
        };
        self.publish(
            Collection::Departments,
            ChangeAction::Insert,
            Some(serde_json::to_value(&record)?),
            None,
        );
        Ok(mappers::department_from_record(record))
    }

    async fn update_department(
        &self,
        key: &str,
        patch: &DepartmentPatch,
    ) -> StorageResult<DepartmentConfig> {
        self.take_failure(Collection::Departments)?;
        let columns = mappers::department_patch_to_record(patch);
        let (record, previous) = {
            let mut state = self.write();
            let slot = state
                .departments
                .iter_mut()
                .find(|r| r.key == key)
                .ok_or_else(|| StorageError::RowMissing {
                    collection: Collection::Departments,
                    id: key.to_string(),
                })?;
            let previous = serde_json::to_value(&*slot)?;
            let merged: DepartmentRecord = merge_record(&*slot, &columns)?;
            *slot = merged.clone();
            (merged, previous)
        };
        self.publish(
            Collection::Departments,
            ChangeAction::Update,
            Some(serde_json::to_value(&record)?),
            Some(previous),
        );
        Ok(mappers::department_from_record(record))
    }

    async fn delete_department(&self, key: &str) -> StorageResult<()> {
        self.take_failure(Collection::Departments)?;
        let removed = {
            let mut state = self.write();
            match state.departments.iter().position(|r| r.key == key) {
                Some(pos) => Some(state.departments.remove(pos)),
                None => None,
            }
        };
        if let Some(record) = removed {
            self.publish(
                Collection::Departments,
                ChangeAction::Delete,
                None,
                Some(serde_json::to_value(&record)?),
            );
        }
        Ok(())
    }

    async fn list_owners(&self) -> StorageResult<Vec<OwnerConfig>> {
        self.take_failure(Collection::Owners)?;
        let mut records = self.read().owners.clone();
        records.sort_by_key(|r| r.sort_order);
        Ok(records.into_iter().map(mappers::owner_from_record).collect())
    }

    async fn insert_owner(
        &self,
        owner: &OwnerConfig,
        sort_order: i64,
    ) -> StorageResult<OwnerConfig> {
        self.take_failure(Collection::Owners)?;
        let record = {
            let mut state = self.write();
            if state.owners.iter().any(|r| r.key == owner.key) {
                return Err(duplicate_key("owners_pkey"));
            }
            let record = record_from_owner(owner, sort_order, Utc::now());
            state.owners.push(record.clone());
            record
        };
        self.publish(
            Collection::Owners,
            ChangeAction::Insert,
            Some(serde_json::to_value(&record)?),
            None,
        );
        Ok(mappers::owner_from_record(record))
    }

    async fn update_owner(&self, key: &str, patch: &OwnerPatch) -> StorageResult<OwnerConfig> {
        self.take_failure(Collection::Owners)?;
        let columns = mappers::owner_patch_to_record(patch);
        let (record, previous) = {
            let mut state = self.write();
            let slot = state
                .owners
                .iter_mut()
                .find(|r| r.key == key)
                .ok_or_else(|| StorageError::RowMissing {
                    collection: Collection::Owners,
                    id: key.to_string(),
                })?;
            let previous = serde_json::to_value(&*slot)?;
            let merged: OwnerRecord = merge_record(&*slot, &columns)?;
            *slot = merged.clone();
            (merged, previous)
        };
        self.publish(
            Collection::Owners,
            ChangeAction::Update,
            Some(serde_json::to_value(&record)?),
            Some(previous),
        );
        Ok(mappers::owner_from_record(record))
    }

    async fn delete_owner(&self, key: &str) -> StorageResult<()> {
        self.take_failure(Collection::Owners)?;
        let removed = {
            let mut state = self.write();
            match state.owners.iter().position(|r| r.key == key) {
                Some(pos) => Some(state.owners.remove(pos)),
                None => None,
            }
        };
        if let Some(record) = removed {
            self.publish(
                Collection::Owners,
                ChangeAction::Delete,
                None,
                Some(serde_json::to_value(&record)?),
            );
        }
        Ok(())
    }

    async fn list_feedback(&self) -> StorageResult<Vec<FeedbackItem>> {
        self.take_failure(Collection::Feedback)?;
        let mut records = self.read().feedback.clone();
        records.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(records)
    }

    async fn insert_feedback(&self, feedback: &NewFeedback) -> StorageResult<FeedbackItem> {
        self.take_failure(Collection::Feedback)?;
        let now = Utc::now();
        let record = FeedbackItem {
            id: generate_entity_id(),
            user_id: feedback.user_id.clone(),
            user_email: feedback.user_email.clone(),
            category: feedback.category,
            title: feedback.title.clone(),
            description: feedback.description.clone(),
            priority: feedback.priority,
            status: feedback.status,
            created_at: now,
            updated_at: now,
        };
        self.write().feedback.push(record.clone());
        self.publish(
            Collection::Feedback,
            ChangeAction::Insert,
            Some(serde_json::to_value(&record)?),
            None,
        );
        Ok(record)
    }

    async fn update_feedback_status(
        &self,
        id: &str,
        status: FeedbackStatus,
    ) -> StorageResult<FeedbackItem> {
        self.take_failure(Collection::Feedback)?;
        let (record, previous) = {
            let mut state = self.write();
            let slot = state
                .feedback
                .iter_mut()
                .find(|r| r.id == id)
                .ok_or_else(|| StorageError::RowMissing {
                    collection: Collection::Feedback,
                    id: id.to_string(),
                })?;
            let previous = serde_json::to_value(&*slot)?;
            slot.status = status;
            slot.updated_at = Utc::now();
            (slot.clone(), previous)
        };
        self.publish(
            Collection::Feedback,
            ChangeAction::Update,
            Some(serde_json::to_value(&record)?),
            Some(previous),
        );
        Ok(record)
    }

    async fn list_analysis_logs(&self, limit: usize) -> StorageResult<Vec<AnalysisLog>> {
        self.require_analysis_logs()?;
        self.take_failure(Collection::AnalysisLogs)?;
        let mut records = self.read().analysis_logs.clone();
        records.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        records.truncate(limit);
        Ok(records
            .into_iter()
            .map(mappers::analysis_log_from_record)
            .collect())
    }

    async fn insert_analysis_log(&self, log: &NewAnalysisLog) -> StorageResult<AnalysisLog> {
        self.require_analysis_logs()?;
        self.take_failure(Collection::AnalysisLogs)?;
        let mut row = mappers::new_analysis_log_to_record(log);
        row.insert("id".into(), json!(generate_entity_id()));
        row.insert("created_at".into(), json!(Utc::now()));
        let record: AnalysisLogRecord = serde_json::from_value(Value::Object(row))?;
        self.write().analysis_logs.push(record.clone());
        self.publish(
            Collection::AnalysisLogs,
            ChangeAction::Insert,
            Some(serde_json::to_value(&record)?),
            None,
        );
        Ok(mappers::analysis_log_from_record(record))
    }
}

#[async_trait]
impl ChangeFeed for MemoryRemote {
    async fn subscribe(&self) -> StorageResult<broadcast::Receiver<ChangeEvent>> {
        Ok(self.events.subscribe())
    }
}
