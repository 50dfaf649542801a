// ABOUTME: Progress derivation from milestone completion

use crate::types::Milestone;

/// Progress derived from milestone completion, as a rounded percentage.
/// Returns None when there are no milestones; manual progress applies then.
pub fn derived_progress(milestones: &[Milestone]) -> Option<u8> {
    if milestones.is_empty() {
        return None;
    }
    let total = milestones.len() as f64;
    let completed = milestones.iter().filter(|m| m.completed).count() as f64;
    Some((completed / total * 100.0).round() as u8)
}
