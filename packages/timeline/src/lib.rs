// ABOUTME: Gantt layout engine for Milemap
// ABOUTME: Pure calendar math and lane assembly, no I/O

pub mod format;
pub mod geometry;
pub mod lanes;

pub use format::{format_date_range, format_date_th};
pub use geometry::{
    bar_span, day_of_year, days_in_year, milestone_offset, month_grid, today_offset, BarSpan,
    MonthColumn,
};
pub use lanes::{
    build_lanes, lane_height, sort_items, LaneRow, MilestoneMarker, SwimLane, BAR_HEIGHT,
    BAR_TOP_INSET, ROW_HEIGHT,
};
