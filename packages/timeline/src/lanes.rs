// ABOUTME: Swim-lane assembly for the Gantt view: per-department grouping,
// ABOUTME: item sorting, and row placement constants

use crate::geometry::{bar_span, milestone_offset, BarSpan};
use milemap_core::{DepartmentConfig, RoadmapItem, SortBy, SortDirection};

/// Vertical pitch of one item row, px
pub const ROW_HEIGHT: u32 = 48;
/// Height of the bar itself, px
pub const BAR_HEIGHT: u32 = 32;
/// Gap between the row top and the bar top, px
pub const BAR_TOP_INSET: u32 = 8;

/// Lane height in px; empty lanes keep a single-row height
pub fn lane_height(count: usize) -> u32 {
    (count as u32 * ROW_HEIGHT).max(ROW_HEIGHT)
}

/// An in-range milestone marker on a bar
#[derive(Debug, Clone, PartialEq)]
pub struct MilestoneMarker {
    pub id: String,
    pub offset: f64,
    pub completed: bool,
}

/// One positioned item row inside a lane
#[derive(Debug, Clone, PartialEq)]
pub struct LaneRow {
    pub item: RoadmapItem,
    pub top: u32,
    pub span: BarSpan,
    pub markers: Vec<MilestoneMarker>,
}

/// One department band of the Gantt chart
#[derive(Debug, Clone, PartialEq)]
pub struct SwimLane {
    pub department: DepartmentConfig,
    pub height: u32,
    pub rows: Vec<LaneRow>,
}

/// Stable in-place sort by the selected key; `Desc` reverses the comparison
pub fn sort_items(items: &mut [RoadmapItem], sort_by: SortBy, direction: SortDirection) {
    items.sort_by(|a, b| {
        let cmp = match sort_by {
            SortBy::StartDate => a.start_date.cmp(&b.start_date),
            SortBy::EndDate => a.end_date.cmp(&b.end_date),
            SortBy::Priority => a.priority.rank().cmp(&b.priority.rank()),
            SortBy::CreatedAt => a.created_at.cmp(&b.created_at),
            SortBy::UpdatedAt => a.updated_at.cmp(&b.updated_at),
        };
        match direction {
            SortDirection::Asc => cmp,
            SortDirection::Desc => cmp.reverse(),
        }
    });
}

/// Builds one lane per configured department, in department-list order. Each
/// lane holds its items sorted, one per row, with bar geometry against the
/// selected year and in-range milestone markers. Items referencing a key with
/// no configured department land in no lane.
pub fn build_lanes(
    items: &[RoadmapItem],
    departments: &[DepartmentConfig],
    sort_by: SortBy,
    direction: SortDirection,
    year: i32,
) -> Vec<SwimLane> {
    departments
        .iter()
        .map(|dept| {
            let mut group: Vec<RoadmapItem> = items
                .iter()
                .filter(|item| item.department == dept.key)
                .cloned()
                .collect();
            sort_items(&mut group, sort_by, direction);

            let rows: Vec<LaneRow> = group
                .into_iter()
                .enumerate()
                .map(|(row, item)| {
                    let markers = item
                        .milestones
                        .iter()
                        .filter_map(|milestone| {
                            milestone_offset(&item, milestone).map(|offset| MilestoneMarker {
                                id: milestone.id.clone(),
                                offset,
                                completed: milestone.completed,
                            })
                        })
                        .collect();
                    LaneRow {
                        top: row as u32 * ROW_HEIGHT + BAR_TOP_INSET,
                        span: bar_span(item.start_date, item.end_date, year),
                        markers,
                        item,
                    }
                })
                .collect();

            SwimLane {
                department: dept.clone(),
                height: lane_height(rows.len()),
                rows,
            }
        })
        .collect()
}
