// ABOUTME: Domain model for the Milemap roadmap dashboard
// ABOUTME: Items, milestones, taxonomies, feedback, analysis logs, and filter/view state

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Priority levels, P0 is the most urgent
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum Priority {
    P0,
    P1,
    P2,
    P3,
}

impl Priority {
    /// Sort rank, lower is more urgent
    pub fn rank(&self) -> u8 {
        match self {
            Priority::P0 => 0,
            Priority::P1 => 1,
            Priority::P2 => 2,
            Priority::P3 => 3,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Priority::P0 => "P0",
            Priority::P1 => "P1",
            Priority::P2 => "P2",
            Priority::P3 => "P3",
        }
    }
}

impl Default for Priority {
    fn default() -> Self {
        Priority::P2
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Status options for roadmap items
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum ItemStatus {
    Planned,
    InProgress,
    OnTrack,
    AtRisk,
    Blocked,
    Completed,
}

impl ItemStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ItemStatus::Planned => "planned",
            ItemStatus::InProgress => "in_progress",
            ItemStatus::OnTrack => "on_track",
            ItemStatus::AtRisk => "at_risk",
            ItemStatus::Blocked => "blocked",
            ItemStatus::Completed => "completed",
        }
    }
}

impl Default for ItemStatus {
    fn default() -> Self {
        ItemStatus::Planned
    }
}

impl fmt::Display for ItemStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A dated sub-goal owned by a roadmap item
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Milestone {
    pub id: String,
    pub title: String,
    pub date: NaiveDate,
    pub completed: bool,
}

/// A named external link attached to a roadmap item
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ItemLink {
    pub id: String,
    pub title: String,
    pub url: String,
}

/// A trackable unit of work on the roadmap
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RoadmapItem {
    pub id: String,
    pub title: String,
    pub subtitle: Option<String>,
    pub department: String,
    pub priority: Priority,
    pub status: ItemStatus,
    pub owner: String,
    #[serde(rename = "startDate")]
    pub start_date: NaiveDate,
    #[serde(rename = "endDate")]
    pub end_date: NaiveDate,
    pub progress: u8,
    #[serde(rename = "parentId")]
    pub parent_id: Option<String>,
    pub milestones: Vec<Milestone>,
    pub dependencies: Vec<String>,
    pub links: Option<Vec<ItemLink>>,
    pub notes: Option<String>,
    #[serde(rename = "createdAt")]
    pub created_at: DateTime<Utc>,
    #[serde(rename = "updatedAt")]
    pub updated_at: DateTime<Utc>,
}

/// Input shape for creating a roadmap item; id and timestamps are server-assigned
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NewRoadmapItem {
    pub title: String,
    pub subtitle: Option<String>,
    pub department: String,
    pub priority: Priority,
    pub status: ItemStatus,
    pub owner: String,
    #[serde(rename = "startDate")]
    pub start_date: NaiveDate,
    #[serde(rename = "endDate")]
    pub end_date: NaiveDate,
    pub progress: u8,
    #[serde(rename = "parentId")]
    pub parent_id: Option<String>,
    pub milestones: Vec<Milestone>,
    pub dependencies: Vec<String>,
    pub links: Option<Vec<ItemLink>>,
    pub notes: Option<String>,
}

/// Partial update of a roadmap item; absent fields are left untouched remotely.
/// An empty string for subtitle, notes, or parent reference clears the field.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ItemPatch {
    pub title: Option<String>,
    pub subtitle: Option<String>,
    pub department: Option<String>,
    pub priority: Option<Priority>,
    pub status: Option<ItemStatus>,
    pub owner: Option<String>,
    #[serde(rename = "startDate")]
    pub start_date: Option<NaiveDate>,
    #[serde(rename = "endDate")]
    pub end_date: Option<NaiveDate>,
    pub progress: Option<u8>,
    #[serde(rename = "parentId")]
    pub parent_id: Option<String>,
    pub milestones: Option<Vec<Milestone>>,
    pub dependencies: Option<Vec<String>>,
    pub links: Option<Vec<ItemLink>>,
    pub notes: Option<String>,
}

/// A user-configurable department category with derived style tokens
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DepartmentConfig {
    pub key: String,
    #[serde(rename = "nameTh")]
    pub name_th: String,
    #[serde(rename = "nameEn")]
    pub name_en: String,
    pub color: String,
    #[serde(rename = "bgClass")]
    pub bg_class: String,
    #[serde(rename = "textClass")]
    pub text_class: String,
    #[serde(rename = "borderClass")]
    pub border_class: String,
}

/// Partial update of a department
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct DepartmentPatch {
    #[serde(rename = "nameTh")]
    pub name_th: Option<String>,
    #[serde(rename = "nameEn")]
    pub name_en: Option<String>,
    pub color: Option<String>,
    #[serde(rename = "bgClass")]
    pub bg_class: Option<String>,
    #[serde(rename = "textClass")]
    pub text_class: Option<String>,
    #[serde(rename = "borderClass")]
    pub border_class: Option<String>,
}

/// A responsible party referenced by roadmap items
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct OwnerConfig {
    pub key: String,
    pub label: String,
    pub color: Option<String>,
}

/// Partial update of an owner
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct OwnerPatch {
    pub label: Option<String>,
    pub color: Option<String>,
}

/// Feedback categories
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum FeedbackCategory {
    FeatureRequest,
    Bug,
    Improvement,
    Question,
    Other,
}

/// Feedback priority
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum FeedbackPriority {
    Low,
    Medium,
    High,
}

/// Feedback lifecycle status; the UI drives new -> acknowledged -> resolved
/// but the model does not enforce ordering
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum FeedbackStatus {
    New,
    Acknowledged,
    InProgress,
    Resolved,
    WontFix,
}

impl FeedbackStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            FeedbackStatus::New => "new",
            FeedbackStatus::Acknowledged => "acknowledged",
            FeedbackStatus::InProgress => "in_progress",
            FeedbackStatus::Resolved => "resolved",
            FeedbackStatus::WontFix => "wont_fix",
        }
    }
}

/// A user-submitted note. The remote row shape equals this shape, so no
/// mapper exists for feedback.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FeedbackItem {
    pub id: String,
    pub user_id: String,
    pub user_email: String,
    pub category: FeedbackCategory,
    pub title: String,
    pub description: String,
    pub priority: FeedbackPriority,
    pub status: FeedbackStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Input shape for submitting feedback
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NewFeedback {
    pub user_id: String,
    pub user_email: String,
    pub category: FeedbackCategory,
    pub title: String,
    pub description: String,
    pub priority: FeedbackPriority,
    pub status: FeedbackStatus,
}

/// Which analysis template was used
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum AnalysisType {
    Strategic,
    Roadmap,
    Milestone,
    Kpi,
    Process,
    Critique,
}

impl AnalysisType {
    pub fn as_str(&self) -> &'static str {
        match self {
            AnalysisType::Strategic => "strategic",
            AnalysisType::Roadmap => "roadmap",
            AnalysisType::Milestone => "milestone",
            AnalysisType::Kpi => "kpi",
            AnalysisType::Process => "process",
            AnalysisType::Critique => "critique",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            AnalysisType::Strategic => "Strategic",
            AnalysisType::Roadmap => "Roadmap",
            AnalysisType::Milestone => "Milestone",
            AnalysisType::Kpi => "KPI",
            AnalysisType::Process => "Process",
            AnalysisType::Critique => "Critique",
        }
    }

    /// Thai label shown in prompt pickers and log summaries. Strategic keeps
    /// its English label, matching the log page chips.
    pub fn label_th(&self) -> &'static str {
        match self {
            AnalysisType::Strategic => "Strategic",
            AnalysisType::Roadmap => "แผนกลยุทธ์",
            AnalysisType::Milestone => "เป้าหมายย่อย",
            AnalysisType::Kpi => "ตัวชี้วัด",
            AnalysisType::Process => "กระบวนการ",
            AnalysisType::Critique => "วิเคราะห์ความเสี่ยง",
        }
    }
}

/// Immutable record of one AI analysis invocation
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AnalysisLog {
    pub id: String,
    #[serde(rename = "userId")]
    pub user_id: String,
    #[serde(rename = "userEmail")]
    pub user_email: String,
    #[serde(rename = "analysisType")]
    pub analysis_type: AnalysisType,
    #[serde(rename = "itemId")]
    pub item_id: Option<String>,
    #[serde(rename = "promptSummary")]
    pub prompt_summary: String,
    #[serde(rename = "resultMarkdown")]
    pub result_markdown: String,
    #[serde(rename = "modelUsed")]
    pub model_used: String,
    #[serde(rename = "createdAt")]
    pub created_at: DateTime<Utc>,
}

/// Input shape for appending an analysis log
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NewAnalysisLog {
    #[serde(rename = "userId")]
    pub user_id: String,
    #[serde(rename = "userEmail")]
    pub user_email: String,
    #[serde(rename = "analysisType")]
    pub analysis_type: AnalysisType,
    #[serde(rename = "itemId")]
    pub item_id: Option<String>,
    #[serde(rename = "promptSummary")]
    pub prompt_summary: String,
    #[serde(rename = "resultMarkdown")]
    pub result_markdown: String,
    #[serde(rename = "modelUsed")]
    pub model_used: String,
}

/// Company goal status
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum GoalStatus {
    OnTrack,
    AtRisk,
    NotStarted,
}

impl GoalStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            GoalStatus::OnTrack => "on_track",
            GoalStatus::AtRisk => "at_risk",
            GoalStatus::NotStarted => "not_started",
        }
    }
}

/// A measurable metric attached to a company goal
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GoalMetric {
    pub name: String,
    pub target: String,
}

/// A top-level company goal, used as context for portfolio analysis
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CompanyGoal {
    pub id: String,
    pub title: String,
    #[serde(rename = "titleEn")]
    pub title_en: String,
    pub target: String,
    #[serde(rename = "relatedMetric")]
    pub related_metric: Option<GoalMetric>,
    pub status: GoalStatus,
    #[serde(rename = "relatedDepartments")]
    pub related_departments: Vec<String>,
    pub description: String,
    pub icon: String,
}

/// Item sort key
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum SortBy {
    StartDate,
    EndDate,
    Priority,
    CreatedAt,
    UpdatedAt,
}

impl Default for SortBy {
    fn default() -> Self {
        SortBy::StartDate
    }
}

/// Item sort direction
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    Asc,
    Desc,
}

impl Default for SortDirection {
    fn default() -> Self {
        SortDirection::Asc
    }
}

/// Sentinel value meaning the owner filter is inactive
pub const OWNER_ALL: &str = "all";

/// Current item filters plus sort options
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FilterState {
    pub departments: Vec<String>,
    pub priorities: Vec<Priority>,
    pub statuses: Vec<ItemStatus>,
    pub owner: String,
    pub search: String,
    #[serde(rename = "sortBy")]
    pub sort_by: SortBy,
    #[serde(rename = "sortDirection")]
    pub sort_direction: SortDirection,
}

impl Default for FilterState {
    fn default() -> Self {
        FilterState {
            departments: Vec::new(),
            priorities: Vec::new(),
            statuses: Vec::new(),
            owner: OWNER_ALL.to_string(),
            search: String::new(),
            sort_by: SortBy::default(),
            sort_direction: SortDirection::default(),
        }
    }
}

impl FilterState {
    /// Shallow-merge: only provided keys overwrite, the rest keep prior values
    pub fn apply(&mut self, patch: FilterPatch) {
        if let Some(departments) = patch.departments {
            self.departments = departments;
        }
        if let Some(priorities) = patch.priorities {
            self.priorities = priorities;
        }
        if let Some(statuses) = patch.statuses {
            self.statuses = statuses;
        }
        if let Some(owner) = patch.owner {
            self.owner = owner;
        }
        if let Some(search) = patch.search {
            self.search = search;
        }
        if let Some(sort_by) = patch.sort_by {
            self.sort_by = sort_by;
        }
        if let Some(sort_direction) = patch.sort_direction {
            self.sort_direction = sort_direction;
        }
    }
}

/// Partial filter update
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilterPatch {
    pub departments: Option<Vec<String>>,
    pub priorities: Option<Vec<Priority>>,
    pub statuses: Option<Vec<ItemStatus>>,
    pub owner: Option<String>,
    pub search: Option<String>,
    pub sort_by: Option<SortBy>,
    pub sort_direction: Option<SortDirection>,
}

/// Timeline presentation mode
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ViewMode {
    Gantt,
    List,
}

impl Default for ViewMode {
    fn default() -> Self {
        ViewMode::Gantt
    }
}

/// Dashboard section the user is looking at
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ActiveSection {
    Overview,
    Goals,
    Roadmap,
    Focus,
    Analysis,
    Definition,
    Settings,
    Feedback,
}

impl Default for ActiveSection {
    fn default() -> Self {
        ActiveSection::Overview
    }
}

/// Color theme, persisted across sessions
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    Dark,
    Light,
}

impl Theme {
    pub fn as_str(&self) -> &'static str {
        match self {
            Theme::Dark => "dark",
            Theme::Light => "light",
        }
    }

    pub fn from_str(value: &str) -> Option<Theme> {
        match value {
            "dark" => Some(Theme::Dark),
            "light" => Some(Theme::Light),
            _ => None,
        }
    }

    pub fn toggled(&self) -> Theme {
        match self {
            Theme::Dark => Theme::Light,
            Theme::Light => Theme::Dark,
        }
    }
}

impl Default for Theme {
    fn default() -> Self {
        Theme::Dark
    }
}

/// Prefill values for the item creation form
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct NewItemDefaults {
    pub department: Option<String>,
    #[serde(rename = "startDate")]
    pub start_date: Option<NaiveDate>,
    #[serde(rename = "endDate")]
    pub end_date: Option<NaiveDate>,
}
