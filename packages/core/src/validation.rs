// ABOUTME: Validation for item creation and update inputs
// ABOUTME: Checked before any remote write is attempted

use crate::types::{ItemPatch, NewRoadmapItem};
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("title cannot be empty")]
    EmptyTitle,
    #[error("department key cannot be empty")]
    EmptyDepartment,
    #[error("owner key cannot be empty")]
    EmptyOwner,
    #[error("end date {end} is before start date {start}")]
    InvertedDates { start: String, end: String },
    #[error("progress {0} exceeds 100")]
    ProgressOutOfRange(u8),
}

/// Validate a full item payload before insertion.
pub fn validate_new_item(item: &NewRoadmapItem) -> Result<(), ValidationError> {
    if item.title.trim().is_empty() {
        return Err(ValidationError::EmptyTitle);
    }
    if item.department.trim().is_empty() {
        return Err(ValidationError::EmptyDepartment);
    }
    if item.owner.trim().is_empty() {
        return Err(ValidationError::EmptyOwner);
    }
    if item.end_date < item.start_date {
        return Err(ValidationError::InvertedDates {
            start: item.start_date.to_string(),
            end: item.end_date.to_string(),
        });
    }
    if item.progress > 100 {
        return Err(ValidationError::ProgressOutOfRange(item.progress));
    }
    Ok(())
}

/// Validate the provided fields of a partial update. Only pairwise date
/// checks are possible here; the caller holds the current item.
pub fn validate_item_patch(patch: &ItemPatch) -> Result<(), ValidationError> {
    if let Some(title) = &patch.title {
        if title.trim().is_empty() {
            return Err(ValidationError::EmptyTitle);
        }
    }
    if let (Some(start), Some(end)) = (patch.start_date, patch.end_date) {
        if end < start {
            return Err(ValidationError::InvertedDates {
                start: start.to_string(),
                end: end.to_string(),
            });
        }
    }
    if let Some(progress) = patch.progress {
        if progress > 100 {
            return Err(ValidationError::ProgressOutOfRange(progress));
        }
    }
    Ok(())
}
