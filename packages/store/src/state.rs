// ABOUTME: The store's interior state and its initial values

use chrono::{Datelike, Local};
use milemap_auth::AuthUser;
use milemap_core::{
    ActiveSection, AnalysisLog, DepartmentConfig, FeedbackItem, FilterState, NewItemDefaults,
    OwnerConfig, RoadmapItem, Theme, ViewMode,
};

pub(crate) fn current_year() -> i32 {
    Local::now().date_naive().year()
}

pub(crate) struct StoreState {
    pub items: Vec<RoadmapItem>,
    pub departments: Vec<DepartmentConfig>,
    pub owners: Vec<OwnerConfig>,
    pub feedback_items: Vec<FeedbackItem>,
    pub analysis_logs: Vec<AnalysisLog>,
    pub analysis_logs_loaded: bool,
    pub is_authenticated: bool,
    pub current_user: Option<AuthUser>,
    pub is_loading: bool,
    pub error: Option<String>,
    pub filters: FilterState,
    pub view_mode: ViewMode,
    pub active_section: ActiveSection,
    pub editing_item: Option<RoadmapItem>,
    pub show_form: bool,
    pub focused_item_id: Option<String>,
    pub selected_year: i32,
    pub theme: Theme,
    pub new_item_defaults: Option<NewItemDefaults>,
}

impl StoreState {
    /// Loading starts true: the session bootstrap clears it once the first
    /// fetch settles (or immediately when no session exists).
    pub fn new(theme: Theme) -> Self {
        StoreState {
            items: Vec::new(),
            departments: Vec::new(),
            owners: Vec::new(),
            feedback_items: Vec::new(),
            analysis_logs: Vec::new(),
            analysis_logs_loaded: false,
            is_authenticated: false,
            current_user: None,
            is_loading: true,
            error: None,
            filters: FilterState::default(),
            view_mode: ViewMode::default(),
            active_section: ActiveSection::default(),
            editing_item: None,
            show_form: false,
            focused_item_id: None,
            selected_year: current_year(),
            theme,
            new_item_defaults: None,
        }
    }
}
