// ABOUTME: Thai date formatting for tooltips and list rows

use chrono::{Datelike, NaiveDate};
use milemap_core::constants::MONTHS_TH;

/// "15 ม.ค. 2026"; the day is not zero-padded
pub fn format_date_th(date: NaiveDate) -> String {
    format!(
        "{} {} {}",
        date.day(),
        MONTHS_TH[date.month0() as usize],
        date.year()
    )
}

/// "ม.ค. - มี.ค. 2026", collapsing to "ม.ค. 2026" when the month labels
/// match. The year always comes from the end date.
pub fn format_date_range(start: NaiveDate, end: NaiveDate) -> String {
    let start_month = MONTHS_TH[start.month0() as usize];
    let end_month = MONTHS_TH[end.month0() as usize];
    let year = end.year();
    if start_month == end_month {
        format!("{start_month} {year}")
    } else {
        format!("{start_month} - {end_month} {year}")
    }
}
