// ABOUTME: Core types, constants, and utilities for Milemap
// ABOUTME: Foundational package providing the domain model shared across all Milemap packages

pub mod constants;
pub mod merge;
pub mod progress;
pub mod types;
pub mod utils;
pub mod validation;

// Re-export main types
pub use types::{
    ActiveSection, AnalysisType, CompanyGoal, DepartmentConfig, DepartmentPatch, FeedbackCategory,
    FeedbackItem, FeedbackPriority, FeedbackStatus, FilterPatch, FilterState, GoalMetric,
    GoalStatus, ItemLink, ItemPatch, ItemStatus, Milestone, NewAnalysisLog, NewFeedback,
    NewItemDefaults, NewRoadmapItem, OwnerConfig, OwnerPatch, Priority, RoadmapItem, SortBy,
    SortDirection, Theme, ViewMode, OWNER_ALL,
};

pub use types::AnalysisLog;

// Re-export constants
pub use constants::{
    priority_info, status_info, PriorityInfo, StatusInfo, COMPANY_GOALS, MONTHS_TH, PRIORITIES,
    STATUSES,
};

// Re-export merge helpers
pub use merge::{apply_change, remove, replace, upsert, EntityChange, Keyed, Placement};

// Re-export progress derivation
pub use progress::derived_progress;

// Re-export utilities
pub use utils::generate_entity_id;

// Re-export validation
pub use validation::{validate_item_patch, validate_new_item, ValidationError};
