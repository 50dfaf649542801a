// ABOUTME: RoadmapStore: collections plus UI state behind one RwLock, with derived views
// ABOUTME: The lock is never held across an await; async actions live in actions.rs

use crate::state::{current_year, StoreState};
use chrono::Datelike;
use milemap_auth::{AuthProvider, AuthUser};
use milemap_core::{
    merge::{apply_change, EntityChange, Placement},
    ActiveSection, AnalysisLog, DepartmentConfig, FeedbackItem, FilterPatch, FilterState,
    NewItemDefaults, OwnerConfig, RoadmapItem, SortBy, SortDirection, Theme, ViewMode, OWNER_ALL,
};
use milemap_settings::{PreferenceStorage, THEME_KEY};
use milemap_storage::RemoteStore;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};
use std::time::Duration;

/// How long the UI leaves a recorded error on screen before clearing it.
pub const ERROR_AUTOCLEAR: Duration = Duration::from_secs(5);

/// Analysis history page size, newest first.
pub const ANALYSIS_LOG_LIMIT: usize = 50;

/// One mirror of the remote dataset plus session and view state.
///
/// The store is the only writer of its own collections; the sync layer
/// writes through the same public surface the UI uses. Mutations apply
/// atomically under the write lock, after the remote has confirmed.
pub struct RoadmapStore {
    pub(crate) remote: Arc<dyn RemoteStore>,
    pub(crate) auth: Arc<dyn AuthProvider>,
    prefs: Arc<dyn PreferenceStorage>,
    state: RwLock<StoreState>,
}

impl RoadmapStore {
    /// The initial theme comes from preference storage; anything absent or
    /// unreadable falls back to dark.
    pub fn new(
        remote: Arc<dyn RemoteStore>,
        auth: Arc<dyn AuthProvider>,
        prefs: Arc<dyn PreferenceStorage>,
    ) -> Self {
        let theme = prefs
            .get(THEME_KEY)
            .and_then(|value| Theme::from_str(&value))
            .unwrap_or_default();
        RoadmapStore {
            remote,
            auth,
            prefs,
            state: RwLock::new(StoreState::new(theme)),
        }
    }

    pub(crate) fn read(&self) -> RwLockReadGuard<'_, StoreState> {
        self.state
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub(crate) fn write(&self) -> RwLockWriteGuard<'_, StoreState> {
        self.state
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    // --- collections ---

    pub fn items(&self) -> Vec<RoadmapItem> {
        self.read().items.clone()
    }

    pub fn departments(&self) -> Vec<DepartmentConfig> {
        self.read().departments.clone()
    }

    pub fn owners(&self) -> Vec<OwnerConfig> {
        self.read().owners.clone()
    }

    pub fn feedback_items(&self) -> Vec<FeedbackItem> {
        self.read().feedback_items.clone()
    }

    pub fn analysis_logs(&self) -> Vec<AnalysisLog> {
        self.read().analysis_logs.clone()
    }

    pub fn analysis_logs_loaded(&self) -> bool {
        self.read().analysis_logs_loaded
    }

    /// Bulk replacement used by the sync layer after a full fetch.
    pub fn set_items(&self, items: Vec<RoadmapItem>) {
        self.write().items = items;
    }

    pub fn set_departments(&self, departments: Vec<DepartmentConfig>) {
        self.write().departments = departments;
    }

    pub fn set_owners(&self, owners: Vec<OwnerConfig>) {
        self.write().owners = owners;
    }

    pub fn set_feedback_items(&self, feedback: Vec<FeedbackItem>) {
        self.write().feedback_items = feedback;
    }

    // --- change-feed application ---

    pub fn apply_item_change(&self, change: EntityChange<RoadmapItem>) {
        apply_change(&mut self.write().items, change, Placement::Append);
    }

    pub fn apply_department_change(&self, change: EntityChange<DepartmentConfig>) {
        apply_change(&mut self.write().departments, change, Placement::Append);
    }

    pub fn apply_owner_change(&self, change: EntityChange<OwnerConfig>) {
        apply_change(&mut self.write().owners, change, Placement::Append);
    }

    /// Feedback lists newest first, so inserts go to the front.
    pub fn apply_feedback_change(&self, change: EntityChange<FeedbackItem>) {
        apply_change(&mut self.write().feedback_items, change, Placement::Prepend);
    }

    // --- derived views ---

    /// Items passing every active filter, in stored order. Sorting is the
    /// timeline's concern.
    pub fn filtered_items(&self) -> Vec<RoadmapItem> {
        let state = self.read();
        let filters = &state.filters;
        let search = filters.search.to_lowercase();
        state
            .items
            .iter()
            .filter(|item| {
                let start_year = item.start_date.year();
                let end_year = item.end_date.year();
                if state.selected_year < start_year || state.selected_year > end_year {
                    return false;
                }
                if !filters.departments.is_empty()
                    && !filters.departments.contains(&item.department)
                {
                    return false;
                }
                if !filters.priorities.is_empty() && !filters.priorities.contains(&item.priority) {
                    return false;
                }
                if !filters.statuses.is_empty() && !filters.statuses.contains(&item.status) {
                    return false;
                }
                if filters.owner != OWNER_ALL && item.owner != filters.owner {
                    return false;
                }
                if !search.is_empty() {
                    let matches = item.title.to_lowercase().contains(&search)
                        || item
                            .subtitle
                            .as_ref()
                            .is_some_and(|s| s.to_lowercase().contains(&search))
                        || item
                            .notes
                            .as_ref()
                            .is_some_and(|n| n.to_lowercase().contains(&search));
                    if !matches {
                        return false;
                    }
                }
                true
            })
            .cloned()
            .collect()
    }

    /// Every year any item touches, plus the selected and current years,
    /// newest first.
    pub fn available_years(&self) -> Vec<i32> {
        let state = self.read();
        let mut years = std::collections::BTreeSet::new();
        years.insert(state.selected_year);
        years.insert(current_year());
        for item in &state.items {
            years.insert(item.start_date.year());
            years.insert(item.end_date.year());
        }
        years.into_iter().rev().collect()
    }

    /// Weak lookup: a dangling key is a defined state, not an error.
    pub fn department(&self, key: &str) -> Option<DepartmentConfig> {
        self.read()
            .departments
            .iter()
            .find(|d| d.key == key)
            .cloned()
    }

    pub fn owner(&self, key: &str) -> Option<OwnerConfig> {
        self.read().owners.iter().find(|o| o.key == key).cloned()
    }

    /// Item creation needs at least one department and one owner to exist.
    pub fn can_create_items(&self) -> bool {
        let state = self.read();
        !state.departments.is_empty() && !state.owners.is_empty()
    }

    // --- filters and view state ---

    pub fn filters(&self) -> FilterState {
        self.read().filters.clone()
    }

    pub fn set_filters(&self, patch: FilterPatch) {
        self.write().filters.apply(patch);
    }

    pub fn reset_filters(&self) {
        self.write().filters = FilterState::default();
    }

    pub fn set_sort_options(&self, sort_by: SortBy, direction: SortDirection) {
        let mut state = self.write();
        state.filters.sort_by = sort_by;
        state.filters.sort_direction = direction;
    }

    pub fn view_mode(&self) -> ViewMode {
        self.read().view_mode
    }

    pub fn set_view_mode(&self, mode: ViewMode) {
        self.write().view_mode = mode;
    }

    pub fn active_section(&self) -> ActiveSection {
        self.read().active_section
    }

    pub fn set_active_section(&self, section: ActiveSection) {
        self.write().active_section = section;
    }

    pub fn editing_item(&self) -> Option<RoadmapItem> {
        self.read().editing_item.clone()
    }

    pub fn set_editing_item(&self, item: Option<RoadmapItem>) {
        self.write().editing_item = item;
    }

    pub fn show_form(&self) -> bool {
        self.read().show_form
    }

    pub fn set_show_form(&self, show: bool) {
        self.write().show_form = show;
    }

    pub fn new_item_defaults(&self) -> Option<NewItemDefaults> {
        self.read().new_item_defaults.clone()
    }

    pub fn set_new_item_defaults(&self, defaults: Option<NewItemDefaults>) {
        self.write().new_item_defaults = defaults;
    }

    pub fn focused_item_id(&self) -> Option<String> {
        self.read().focused_item_id.clone()
    }

    pub fn set_focused_item(&self, item_id: Option<String>) {
        self.write().focused_item_id = item_id;
    }

    /// Focuses one item and jumps the UI to the focus section in one step.
    pub fn navigate_to_focus(&self, item_id: impl Into<String>) {
        let mut state = self.write();
        state.focused_item_id = Some(item_id.into());
        state.active_section = ActiveSection::Focus;
    }

    pub fn selected_year(&self) -> i32 {
        self.read().selected_year
    }

    pub fn set_selected_year(&self, year: i32) {
        self.write().selected_year = year;
    }

    // --- theme ---

    pub fn theme(&self) -> Theme {
        self.read().theme
    }

    pub fn toggle_theme(&self) {
        let next = {
            let mut state = self.write();
            state.theme = state.theme.toggled();
            state.theme
        };
        self.prefs.set(THEME_KEY, next.as_str());
    }

    // --- session and status ---

    pub fn is_authenticated(&self) -> bool {
        self.read().is_authenticated
    }

    pub fn set_authenticated(&self, authenticated: bool) {
        self.write().is_authenticated = authenticated;
    }

    pub fn current_user(&self) -> Option<AuthUser> {
        self.read().current_user.clone()
    }

    pub fn set_current_user(&self, user: Option<AuthUser>) {
        self.write().current_user = user;
    }

    pub fn is_loading(&self) -> bool {
        self.read().is_loading
    }

    pub fn set_loading(&self, loading: bool) {
        self.write().is_loading = loading;
    }

    pub fn error(&self) -> Option<String> {
        self.read().error.clone()
    }

    /// Single slot: a new error overwrites whatever was there.
    pub fn set_error(&self, message: impl Into<String>) {
        self.write().error = Some(message.into());
    }

    pub fn clear_error(&self) {
        self.write().error = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use milemap_auth::MemoryAuth;
    use milemap_core::{ItemStatus, Priority};
    use milemap_settings::MemoryPreferences;
    use milemap_storage::MemoryRemote;
    use pretty_assertions::assert_eq;

    fn store_with_prefs(prefs: MemoryPreferences) -> RoadmapStore {
        RoadmapStore::new(
            Arc::new(MemoryRemote::new()),
            Arc::new(MemoryAuth::new()),
            Arc::new(prefs),
        )
    }

    fn store() -> RoadmapStore {
        store_with_prefs(MemoryPreferences::new())
    }

    fn item(id: &str, title: &str, department: &str, owner: &str, year: i32) -> RoadmapItem {
        RoadmapItem {
            id: id.to_string(),
            title: title.to_string(),
            subtitle: None,
            department: department.to_string(),
            priority: Priority::P2,
            status: ItemStatus::Planned,
            owner: owner.to_string(),
            start_date: NaiveDate::from_ymd_opt(year, 1, 1).unwrap(),
            end_date: NaiveDate::from_ymd_opt(year, 6, 30).unwrap(),
            progress: 0,
            parent_id: None,
            milestones: Vec::new(),
            dependencies: Vec::new(),
            links: None,
            notes: None,
            created_at: chrono::Utc::now(),
            updated_at: chrono::Utc::now(),
        }
    }

    fn seeded_store() -> RoadmapStore {
        let store = store();
        store.set_selected_year(2026);
        store.set_items(vec![
            item("a", "Frontend Redesign", "engineering", "nok", 2026),
            item("b", "Clinic Expansion", "clinical", "mike", 2026),
            item("c", "Lab Upgrade", "clinical", "nok", 2026),
            item("d", "Old Initiative", "engineering", "nok", 2024),
        ]);
        store
    }

    #[test]
    fn default_filters_keep_only_the_selected_year() {
        let store = seeded_store();
        let visible = store.filtered_items();
        assert_eq!(
            visible.iter().map(|i| i.id.as_str()).collect::<Vec<_>>(),
            vec!["a", "b", "c"]
        );
    }

    #[test]
    fn department_filter_narrows_preserving_order() {
        let store = seeded_store();
        store.set_filters(FilterPatch {
            departments: Some(vec!["clinical".to_string()]),
            ..Default::default()
        });
        let visible = store.filtered_items();
        assert_eq!(
            visible.iter().map(|i| i.id.as_str()).collect::<Vec<_>>(),
            vec!["b", "c"]
        );
    }

    #[test]
    fn search_is_case_insensitive_across_title_subtitle_notes() {
        let store = seeded_store();
        store.set_filters(FilterPatch {
            search: Some("FRONTEND".to_string()),
            ..Default::default()
        });
        let visible = store.filtered_items();
        assert_eq!(visible.len(), 1);
        assert_eq!(visible[0].id, "a");

        let mut noted = item("e", "Unrelated", "clinical", "nok", 2026);
        noted.notes = Some("frontend follow-up".to_string());
        store.apply_item_change(EntityChange::Inserted(noted));
        assert_eq!(store.filtered_items().len(), 2);
    }

    #[test]
    fn owner_filter_uses_the_all_sentinel() {
        let store = seeded_store();
        store.set_filters(FilterPatch {
            owner: Some("mike".to_string()),
            ..Default::default()
        });
        assert_eq!(store.filtered_items().len(), 1);

        store.set_filters(FilterPatch {
            owner: Some(OWNER_ALL.to_string()),
            ..Default::default()
        });
        assert_eq!(store.filtered_items().len(), 3);
    }

    #[test]
    fn combined_filters_never_grow_the_result() {
        let store = seeded_store();
        let baseline = store.filtered_items().len();
        store.set_filters(FilterPatch {
            departments: Some(vec!["clinical".to_string()]),
            owner: Some("nok".to_string()),
            ..Default::default()
        });
        let narrowed = store.filtered_items();
        assert!(narrowed.len() <= baseline);
        assert_eq!(narrowed[0].id, "c");
    }

    #[test]
    fn reset_filters_restores_the_defaults() {
        let store = seeded_store();
        store.set_filters(FilterPatch {
            search: Some("lab".to_string()),
            priorities: Some(vec![Priority::P0]),
            ..Default::default()
        });
        store.reset_filters();
        assert_eq!(store.filters(), FilterState::default());
    }

    #[test]
    fn available_years_are_descending_and_deduplicated() {
        let store = seeded_store();
        let years = store.available_years();
        assert!(years.contains(&2026));
        assert!(years.contains(&2024));
        let mut sorted = years.clone();
        sorted.sort_unstable_by(|a, b| b.cmp(a));
        assert_eq!(years, sorted);
    }

    #[test]
    fn can_create_items_requires_both_taxonomies() {
        let store = store();
        assert!(!store.can_create_items());
        store.set_departments(vec![DepartmentConfig {
            key: "clinical".to_string(),
            name_th: "คลินิก".to_string(),
            name_en: "Clinical".to_string(),
            color: "cyan".to_string(),
            bg_class: "bg-cyan-500".to_string(),
            text_class: "text-cyan-400".to_string(),
            border_class: "border-cyan-500".to_string(),
        }]);
        assert!(!store.can_create_items());
        store.set_owners(vec![OwnerConfig {
            key: "nok".to_string(),
            label: "Nok".to_string(),
            color: None,
        }]);
        assert!(store.can_create_items());
    }

    #[test]
    fn navigate_to_focus_sets_both_fields() {
        let store = store();
        store.navigate_to_focus("item-9");
        assert_eq!(store.focused_item_id().as_deref(), Some("item-9"));
        assert_eq!(store.active_section(), ActiveSection::Focus);
    }

    #[test]
    fn theme_comes_from_preferences_and_toggles_persist() {
        let prefs = MemoryPreferences::new().with_value(THEME_KEY, "light");
        let store = store_with_prefs(prefs);
        assert_eq!(store.theme(), Theme::Light);

        store.toggle_theme();
        assert_eq!(store.theme(), Theme::Dark);
        store.toggle_theme();
        assert_eq!(store.theme(), Theme::Light);
    }

    #[test]
    fn unreadable_theme_preference_falls_back_to_dark() {
        let prefs = MemoryPreferences::new().with_value(THEME_KEY, "sepia");
        let store = store_with_prefs(prefs);
        assert_eq!(store.theme(), Theme::Dark);
    }

    #[test]
    fn error_slot_holds_one_message() {
        let store = store();
        store.set_error("first");
        store.set_error("second");
        assert_eq!(store.error().as_deref(), Some("second"));
        store.clear_error();
        assert_eq!(store.error(), None);
    }
}
