// ABOUTME: Calendar math for the Gantt view: day ordinals, bar geometry,
// ABOUTME: milestone interpolation, today marker, and the month grid

use chrono::{Datelike, NaiveDate};
use milemap_core::constants::MONTHS_TH;
use milemap_core::{Milestone, RoadmapItem};

/// 1-based ordinal of the date within its own year (Jan 1 = 1)
pub fn day_of_year(date: NaiveDate) -> u32 {
    date.ordinal()
}

/// 366 for leap years, 365 otherwise
pub fn days_in_year(year: i32) -> u32 {
    if (year % 4 == 0 && year % 100 != 0) || year % 400 == 0 {
        366
    } else {
        365
    }
}

/// Horizontal placement of a Gantt bar, both values percents of the year
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BarSpan {
    pub left: f64,
    pub width: f64,
}

impl BarSpan {
    pub fn left_pct(&self) -> String {
        format!("{:.2}%", self.left)
    }

    pub fn width_pct(&self) -> String {
        format!("{:.2}%", self.width)
    }
}

/// Bar geometry for an item within the selected year. Each date contributes
/// the ordinal within its own calendar year, so a bar spanning into another
/// year can come out with negative width; callers filter by year first.
pub fn bar_span(start: NaiveDate, end: NaiveDate, year: i32) -> BarSpan {
    let total = days_in_year(year) as f64;
    let start_day = day_of_year(start) as f64;
    let end_day = day_of_year(end) as f64;
    BarSpan {
        left: (start_day - 1.0) / total * 100.0,
        width: (end_day - start_day + 1.0) / total * 100.0,
    }
}

/// Position of a milestone between item start and end as a 0-100 offset.
/// Offsets outside that range drop the marker. On a zero-duration item only
/// a milestone on the single day renders, pinned to the left edge.
pub fn milestone_offset(item: &RoadmapItem, milestone: &Milestone) -> Option<f64> {
    let total = (item.end_date - item.start_date).num_days();
    if total == 0 {
        return (milestone.date == item.start_date).then_some(0.0);
    }
    let offset = (milestone.date - item.start_date).num_days() as f64 / total as f64 * 100.0;
    (0.0..=100.0).contains(&offset).then_some(offset)
}

/// Left offset of the today marker, present only when today falls in the
/// selected year
pub fn today_offset(selected_year: i32, today: NaiveDate) -> Option<f64> {
    (today.year() == selected_year)
        .then(|| (day_of_year(today) as f64 - 1.0) / days_in_year(selected_year) as f64 * 100.0)
}

/// One column of the month header row
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MonthColumn {
    pub label: &'static str,
    pub left: f64,
    pub width: f64,
}

/// Twelve equal columns labelled with Thai month abbreviations
pub fn month_grid() -> [MonthColumn; 12] {
    std::array::from_fn(|i| MonthColumn {
        label: MONTHS_TH[i],
        left: i as f64 / 12.0 * 100.0,
        width: 100.0 / 12.0,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use milemap_core::{ItemStatus, Priority};
    use pretty_assertions::assert_eq;

    fn date(year: i32, month: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(year, month, day).unwrap()
    }

    fn item_spanning(start: NaiveDate, end: NaiveDate) -> RoadmapItem {
        let at = Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap();
        RoadmapItem {
            id: "itm-1".to_string(),
            title: "Item".to_string(),
            subtitle: None,
            department: "clinical".to_string(),
            priority: Priority::P1,
            status: ItemStatus::Planned,
            owner: "nok".to_string(),
            start_date: start,
            end_date: end,
            progress: 0,
            parent_id: None,
            milestones: Vec::new(),
            dependencies: Vec::new(),
            links: None,
            notes: None,
            created_at: at,
            updated_at: at,
        }
    }

    fn milestone_on(day: NaiveDate) -> Milestone {
        Milestone {
            id: "ms-1".to_string(),
            title: "Milestone".to_string(),
            date: day,
            completed: false,
        }
    }

    #[test]
    fn day_ordinals_respect_leap_years() {
        assert_eq!(day_of_year(date(2026, 1, 1)), 1);
        assert_eq!(day_of_year(date(2026, 12, 31)), 365);
        assert_eq!(day_of_year(date(2024, 12, 31)), 366);
        // Feb 29 pushes March 1 to ordinal 61 in a leap year
        assert_eq!(day_of_year(date(2024, 3, 1)), 61);
        assert_eq!(day_of_year(date(2026, 3, 1)), 60);
    }

    #[test]
    fn year_lengths_follow_the_gregorian_rule() {
        assert_eq!(days_in_year(2024), 366);
        assert_eq!(days_in_year(2026), 365);
        assert_eq!(days_in_year(1900), 365);
        assert_eq!(days_in_year(2000), 366);
    }

    #[test]
    fn full_year_bar_fills_the_row() {
        let span = bar_span(date(2026, 1, 1), date(2026, 12, 31), 2026);
        assert_eq!(span.left_pct(), "0.00%");
        assert_eq!(span.width_pct(), "100.00%");

        // same in a leap year, against its own 366-day total
        let leap = bar_span(date(2024, 1, 1), date(2024, 12, 31), 2024);
        assert_eq!(leap.left_pct(), "0.00%");
        assert_eq!(leap.width_pct(), "100.00%");
    }

    #[test]
    fn january_bar_geometry() {
        let span = bar_span(date(2026, 1, 1), date(2026, 1, 31), 2026);
        assert_eq!(span.left_pct(), "0.00%");
        assert_eq!(span.width_pct(), "8.49%");
    }

    #[test]
    fn cross_year_bar_has_negative_width() {
        // end date contributes its ordinal within 2027, far left of the start
        let span = bar_span(date(2026, 11, 1), date(2027, 2, 28), 2026);
        assert!(span.width < 0.0);
        assert_eq!(span.width_pct(), "-67.12%");
    }

    #[test]
    fn milestones_interpolate_between_start_and_end() {
        let item = item_spanning(date(2026, 1, 1), date(2026, 1, 11));
        assert_eq!(
            milestone_offset(&item, &milestone_on(date(2026, 1, 1))),
            Some(0.0)
        );
        assert_eq!(
            milestone_offset(&item, &milestone_on(date(2026, 1, 6))),
            Some(50.0)
        );
        assert_eq!(
            milestone_offset(&item, &milestone_on(date(2026, 1, 11))),
            Some(100.0)
        );
    }

    #[test]
    fn out_of_range_milestones_are_dropped() {
        let item = item_spanning(date(2026, 1, 1), date(2026, 1, 11));
        assert_eq!(milestone_offset(&item, &milestone_on(date(2025, 12, 31))), None);
        assert_eq!(milestone_offset(&item, &milestone_on(date(2026, 1, 12))), None);
    }

    #[test]
    fn zero_duration_item_pins_its_single_day() {
        let item = item_spanning(date(2026, 5, 1), date(2026, 5, 1));
        assert_eq!(
            milestone_offset(&item, &milestone_on(date(2026, 5, 1))),
            Some(0.0)
        );
        assert_eq!(milestone_offset(&item, &milestone_on(date(2026, 5, 2))), None);
    }

    #[test]
    fn today_marker_only_in_the_selected_year() {
        assert_eq!(today_offset(2026, date(2026, 1, 1)), Some(0.0));
        assert_eq!(today_offset(2026, date(2027, 1, 1)), None);

        let mid = today_offset(2026, date(2026, 7, 3)).unwrap();
        assert_eq!(format!("{mid:.2}"), "50.14");
    }

    #[test]
    fn month_grid_has_twelve_even_columns() {
        let grid = month_grid();
        assert_eq!(grid.len(), 12);
        assert_eq!(grid[0].label, "ม.ค.");
        assert_eq!(grid[11].label, "ธ.ค.");
        assert_eq!(grid[0].left, 0.0);
        assert_eq!(grid[6].left, 50.0);
        assert_eq!(grid[3].width, 100.0 / 12.0);
    }
}
