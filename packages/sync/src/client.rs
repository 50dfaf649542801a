// ABOUTME: SyncClient: all-or-nothing bulk load plus a single change-feed consumer
// ABOUTME: Events apply through the store's public merge surface, keyed by identifier

use milemap_core::merge::EntityChange;
use milemap_core::{DepartmentConfig, FeedbackItem, OwnerConfig, RoadmapItem};
use milemap_storage::{
    mappers, wire::{DepartmentRecord, ItemRecord, OwnerRecord},
    ChangeAction, ChangeEvent, ChangeFeed, Collection, RemoteStore, StorageResult,
};
use milemap_store::RoadmapStore;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::sync::Arc;
use tokio::sync::broadcast::error::RecvError;
use tokio::sync::{broadcast, Mutex};
use tokio::task::JoinHandle;
use tracing::{debug, warn};

/// Mirrors the remote dataset into a [`RoadmapStore`].
pub struct SyncClient {
    store: Arc<RoadmapStore>,
    remote: Arc<dyn RemoteStore>,
    feed: Arc<dyn ChangeFeed>,
    task: Mutex<Option<JoinHandle<()>>>,
}

impl SyncClient {
    pub fn new(
        store: Arc<RoadmapStore>,
        remote: Arc<dyn RemoteStore>,
        feed: Arc<dyn ChangeFeed>,
    ) -> Self {
        SyncClient {
            store,
            remote,
            feed,
            task: Mutex::new(None),
        }
    }

    /// Fetches all four tracked collections concurrently and commits them as
    /// one unit: any fetch failure commits nothing and records a single
    /// aggregate message. The loading flag is true for the duration and
    /// false afterwards on both paths.
    pub async fn initialize(&self) -> StorageResult<()> {
        self.store.set_loading(true);
        let result = self.load_all().await;
        self.store.set_loading(false);
        if let Err(err) = &result {
            self.store.set_error(format!("Failed to load data: {err}"));
        }
        result
    }

    async fn load_all(&self) -> StorageResult<()> {
        let (items, departments, owners, feedback) = tokio::try_join!(
            self.remote.list_items(),
            self.remote.list_departments(),
            self.remote.list_owners(),
            self.remote.list_feedback(),
        )?;
        debug!(
            items = items.len(),
            departments = departments.len(),
            owners = owners.len(),
            feedback = feedback.len(),
            "bulk load complete"
        );
        self.store.set_items(items);
        self.store.set_departments(departments);
        self.store.set_owners(owners);
        self.store.set_feedback_items(feedback);
        Ok(())
    }

    /// Starts the feed consumer. Calling again while one is running is a
    /// no-op, so repeated session bootstraps never double-apply events.
    pub async fn subscribe_to_changes(&self) -> StorageResult<()> {
        let mut task = self.task.lock().await;
        if task.as_ref().is_some_and(|t| !t.is_finished()) {
            return Ok(());
        }
        let receiver = self.feed.subscribe().await?;
        let store = self.store.clone();
        *task = Some(tokio::spawn(run_feed(store, receiver)));
        Ok(())
    }

    /// Stops the feed consumer if one is running.
    pub async fn unsubscribe_from_changes(&self) {
        if let Some(task) = self.task.lock().await.take() {
            task.abort();
        }
    }

    pub async fn is_subscribed(&self) -> bool {
        self.task
            .lock()
            .await
            .as_ref()
            .is_some_and(|t| !t.is_finished())
    }
}

async fn run_feed(store: Arc<RoadmapStore>, mut receiver: broadcast::Receiver<ChangeEvent>) {
    loop {
        match receiver.recv().await {
            Ok(event) => dispatch_event(&store, event),
            Err(RecvError::Lagged(skipped)) => {
                // missed events mean the mirror may be stale; reconnection
                // and refetch are the transport's concern
                warn!("change feed lagged by {skipped} events, stopping consumer");
                break;
            }
            Err(RecvError::Closed) => {
                warn!("change feed closed, stopping consumer");
                break;
            }
        }
    }
}

fn dispatch_event(store: &RoadmapStore, event: ChangeEvent) {
    match event.collection {
        Collection::Items => {
            if let Some(change) = item_change(&event) {
                store.apply_item_change(change);
            }
        }
        Collection::Departments => {
            if let Some(change) = department_change(&event) {
                store.apply_department_change(change);
            }
        }
        Collection::Owners => {
            if let Some(change) = owner_change(&event) {
                store.apply_owner_change(change);
            }
        }
        Collection::Feedback => {
            if let Some(change) = feedback_change(&event) {
                store.apply_feedback_change(change);
            }
        }
        // analysis logs are fetched on demand, never streamed
        Collection::AnalysisLogs => {}
    }
}

fn item_change(event: &ChangeEvent) -> Option<EntityChange<RoadmapItem>> {
    match event.action {
        ChangeAction::Insert => {
            let record: ItemRecord = decode(event.record.as_ref()?)?;
            Some(EntityChange::Inserted(mappers::item_from_record(record)))
        }
        ChangeAction::Update => {
            let record: ItemRecord = decode(event.record.as_ref()?)?;
            Some(EntityChange::Updated(mappers::item_from_record(record)))
        }
        ChangeAction::Delete => Some(EntityChange::Removed(removed_key(event, "id")?)),
    }
}

fn department_change(event: &ChangeEvent) -> Option<EntityChange<DepartmentConfig>> {
    match event.action {
        ChangeAction::Insert => {
            let record: DepartmentRecord = decode(event.record.as_ref()?)?;
            Some(EntityChange::Inserted(mappers::department_from_record(
                record,
            )))
        }
        ChangeAction::Update => {
            let record: DepartmentRecord = decode(event.record.as_ref()?)?;
            Some(EntityChange::Updated(mappers::department_from_record(
                record,
            )))
        }
        ChangeAction::Delete => Some(EntityChange::Removed(removed_key(event, "key")?)),
    }
}

fn owner_change(event: &ChangeEvent) -> Option<EntityChange<OwnerConfig>> {
    match event.action {
        ChangeAction::Insert => {
            let record: OwnerRecord = decode(event.record.as_ref()?)?;
            Some(EntityChange::Inserted(mappers::owner_from_record(record)))
        }
        ChangeAction::Update => {
            let record: OwnerRecord = decode(event.record.as_ref()?)?;
            Some(EntityChange::Updated(mappers::owner_from_record(record)))
        }
        ChangeAction::Delete => Some(EntityChange::Removed(removed_key(event, "key")?)),
    }
}

fn feedback_change(event: &ChangeEvent) -> Option<EntityChange<FeedbackItem>> {
    match event.action {
        ChangeAction::Insert => Some(EntityChange::Inserted(decode(event.record.as_ref()?)?)),
        ChangeAction::Update => Some(EntityChange::Updated(decode(event.record.as_ref()?)?)),
        ChangeAction::Delete => Some(EntityChange::Removed(removed_key(event, "id")?)),
    }
}

/// Delete events carry at least the row identifier in `old_record`.
fn removed_key(event: &ChangeEvent, field: &str) -> Option<String> {
    let key = event.old_record.as_ref()?.get(field)?.as_str()?;
    Some(key.to_string())
}

fn decode<T: DeserializeOwned>(value: &Value) -> Option<T> {
    match serde_json::from_value(value.clone()) {
        Ok(decoded) => Some(decoded),
        Err(err) => {
            warn!("skipping change row that failed to decode: {err}");
            None
        }
    }
}
