// ABOUTME: Async store actions: remote write first, local merge only after the
// ABOUTME: server confirms; failures set the error slot and leave state untouched

use crate::error::StoreError;
use crate::state::current_year;
use crate::store::{RoadmapStore, ANALYSIS_LOG_LIMIT};
use milemap_core::{
    derived_progress, merge,
    validation::{validate_item_patch, validate_new_item},
    AnalysisLog, DepartmentConfig, DepartmentPatch, FeedbackItem, FeedbackStatus, ItemPatch,
    NewAnalysisLog, NewFeedback, NewRoadmapItem, OwnerConfig, OwnerPatch, RoadmapItem,
};
use milemap_storage::StorageError;
use tracing::warn;

impl RoadmapStore {
    fn fail(&self, message: String, err: impl Into<StoreError>) -> StoreError {
        self.set_error(message);
        err.into()
    }

    /// Insert a new item. Progress is derived from milestones when any
    /// exist; the server-assigned row is what lands in the collection.
    pub async fn add_item(&self, mut item: NewRoadmapItem) -> Result<RoadmapItem, StoreError> {
        if let Some(progress) = derived_progress(&item.milestones) {
            item.progress = progress;
        }
        if let Err(err) = validate_new_item(&item) {
            return Err(self.fail(
                format!("Failed to add item: {err}"),
                StoreError::Validation(err.to_string()),
            ));
        }
        match self.remote.insert_item(&item).await {
            Ok(created) => {
                self.write().items.push(created.clone());
                Ok(created)
            }
            Err(err) => Err(self.fail(format!("Failed to add item: {err}"), err)),
        }
    }

    /// Partial update. The effective milestone list (the patch's, else the
    /// current item's) overrides any caller-supplied progress when non-empty.
    pub async fn update_item(
        &self,
        id: &str,
        mut patch: ItemPatch,
    ) -> Result<RoadmapItem, StoreError> {
        let effective_milestones = match &patch.milestones {
            Some(milestones) => Some(milestones.clone()),
            None => self
                .read()
                .items
                .iter()
                .find(|item| item.id == id)
                .map(|item| item.milestones.clone()),
        };
        if let Some(progress) = effective_milestones.as_deref().and_then(derived_progress) {
            patch.progress = Some(progress);
        }
        if let Err(err) = validate_item_patch(&patch) {
            return Err(self.fail(
                format!("Failed to update item: {err}"),
                StoreError::Validation(err.to_string()),
            ));
        }
        match self.remote.update_item(id, &patch).await {
            Ok(updated) => {
                merge::replace(&mut self.write().items, updated.clone());
                Ok(updated)
            }
            Err(err) => Err(self.fail(format!("Failed to update item: {err}"), err)),
        }
    }

    pub async fn delete_item(&self, id: &str) -> Result<(), StoreError> {
        match self.remote.delete_item(id).await {
            Ok(()) => {
                merge::remove(&mut self.write().items, id);
                Ok(())
            }
            Err(err) => Err(self.fail(format!("Failed to delete item: {err}"), err)),
        }
    }

    /// New departments land at the end of the configured order.
    pub async fn add_department(
        &self,
        dept: DepartmentConfig,
    ) -> Result<DepartmentConfig, StoreError> {
        let sort_order = self.read().departments.len() as i64;
        match self.remote.insert_department(&dept, sort_order).await {
            Ok(created) => {
                self.write().departments.push(created.clone());
                Ok(created)
            }
            Err(err) => Err(self.fail(format!("Failed to add department: {err}"), err)),
        }
    }

    pub async fn update_department(
        &self,
        key: &str,
        patch: DepartmentPatch,
    ) -> Result<DepartmentConfig, StoreError> {
        match self.remote.update_department(key, &patch).await {
            Ok(updated) => {
                merge::replace(&mut self.write().departments, updated.clone());
                Ok(updated)
            }
            Err(err) => Err(self.fail(format!("Failed to update department: {err}"), err)),
        }
    }

    /// Items referencing the removed key keep it; they render as unknown
    /// department until reassigned.
    pub async fn remove_department(&self, key: &str) -> Result<(), StoreError> {
        match self.remote.delete_department(key).await {
            Ok(()) => {
                merge::remove(&mut self.write().departments, key);
                Ok(())
            }
            Err(err) => Err(self.fail(format!("Failed to remove department: {err}"), err)),
        }
    }

    pub async fn add_owner(&self, owner: OwnerConfig) -> Result<OwnerConfig, StoreError> {
        let sort_order = self.read().owners.len() as i64;
        match self.remote.insert_owner(&owner, sort_order).await {
            Ok(created) => {
                self.write().owners.push(created.clone());
                Ok(created)
            }
            Err(err) => Err(self.fail(format!("Failed to add owner: {err}"), err)),
        }
    }

    pub async fn update_owner(
        &self,
        key: &str,
        patch: OwnerPatch,
    ) -> Result<OwnerConfig, StoreError> {
        match self.remote.update_owner(key, &patch).await {
            Ok(updated) => {
                merge::replace(&mut self.write().owners, updated.clone());
                Ok(updated)
            }
            Err(err) => Err(self.fail(format!("Failed to update owner: {err}"), err)),
        }
    }

    pub async fn remove_owner(&self, key: &str) -> Result<(), StoreError> {
        match self.remote.delete_owner(key).await {
            Ok(()) => {
                merge::remove(&mut self.write().owners, key);
                Ok(())
            }
            Err(err) => Err(self.fail(format!("Failed to remove owner: {err}"), err)),
        }
    }

    /// Feedback lists newest first, so the confirmed row goes to the front.
    pub async fn add_feedback(&self, feedback: NewFeedback) -> Result<FeedbackItem, StoreError> {
        match self.remote.insert_feedback(&feedback).await {
            Ok(created) => {
                self.write().feedback_items.insert(0, created.clone());
                Ok(created)
            }
            Err(err) => Err(self.fail(format!("Failed to submit feedback: {err}"), err)),
        }
    }

    pub async fn update_feedback_status(
        &self,
        id: &str,
        status: FeedbackStatus,
    ) -> Result<FeedbackItem, StoreError> {
        match self.remote.update_feedback_status(id, status).await {
            Ok(updated) => {
                merge::replace(&mut self.write().feedback_items, updated.clone());
                Ok(updated)
            }
            Err(err) => Err(self.fail(format!("Failed to update feedback: {err}"), err)),
        }
    }

    /// Loads the analysis history once per session. A deployment without the
    /// log collection degrades silently: history stays empty, no error.
    pub async fn fetch_analysis_logs(&self) -> Result<(), StoreError> {
        if self.read().analysis_logs_loaded {
            return Ok(());
        }
        match self.remote.list_analysis_logs(ANALYSIS_LOG_LIMIT).await {
            Ok(logs) => {
                let mut state = self.write();
                state.analysis_logs = logs;
                state.analysis_logs_loaded = true;
                Ok(())
            }
            Err(StorageError::CollectionMissing(collection)) => {
                warn!("{collection} is not provisioned, analysis history disabled");
                self.write().analysis_logs_loaded = true;
                Ok(())
            }
            Err(err) => Err(self.fail(format!("Failed to load analysis logs: {err}"), err)),
        }
    }

    /// Persist one analysis run. `Ok(None)` means the log collection is not
    /// provisioned; the analysis result itself is still usable.
    pub async fn add_analysis_log(
        &self,
        log: NewAnalysisLog,
    ) -> Result<Option<AnalysisLog>, StoreError> {
        match self.remote.insert_analysis_log(&log).await {
            Ok(saved) => {
                self.write().analysis_logs.insert(0, saved.clone());
                Ok(Some(saved))
            }
            Err(StorageError::CollectionMissing(collection)) => {
                warn!("{collection} is not provisioned, analysis result not logged");
                Ok(None)
            }
            Err(err) => Err(self.fail(format!("Failed to save analysis: {err}"), err)),
        }
    }

    /// Signs out and resets session-scoped state. Departments and owners are
    /// tenant configuration and survive; so do filters and view state. The
    /// local reset happens even when the provider rejects the sign-out.
    pub async fn logout(&self) -> Result<(), StoreError> {
        let result = self.auth.sign_out().await;
        {
            let mut state = self.write();
            state.items.clear();
            state.feedback_items.clear();
            state.analysis_logs.clear();
            state.analysis_logs_loaded = false;
            state.focused_item_id = None;
            state.selected_year = current_year();
            state.is_authenticated = false;
            state.current_user = None;
        }
        if let Err(err) = &result {
            warn!("sign-out failed, local session state was reset anyway: {err}");
        }
        result.map_err(StoreError::from)
    }
}
