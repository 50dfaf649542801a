// ABOUTME: Display tables and fixed vocabulary for the dashboard
// ABOUTME: Priority/status styling, Thai month labels, company goal seed

use crate::types::{CompanyGoal, ItemStatus, Priority};

/// Display metadata for one priority level
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PriorityInfo {
    pub key: Priority,
    pub label: &'static str,
    pub color: &'static str,
    pub bg_class: &'static str,
    pub text_class: &'static str,
}

pub const PRIORITIES: [PriorityInfo; 4] = [
    PriorityInfo {
        key: Priority::P0,
        label: "P0 - วิกฤต",
        color: "red",
        bg_class: "bg-red-500",
        text_class: "text-red-400",
    },
    PriorityInfo {
        key: Priority::P1,
        label: "P1 - สูง",
        color: "orange",
        bg_class: "bg-orange-500",
        text_class: "text-orange-400",
    },
    PriorityInfo {
        key: Priority::P2,
        label: "P2 - กลาง",
        color: "yellow",
        bg_class: "bg-yellow-500",
        text_class: "text-yellow-400",
    },
    PriorityInfo {
        key: Priority::P3,
        label: "P3 - ต่ำ",
        color: "gray",
        bg_class: "bg-gray-500",
        text_class: "text-gray-400",
    },
];

/// Display metadata for one item status
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatusInfo {
    pub key: ItemStatus,
    pub label: &'static str,
    pub color: &'static str,
    pub bg_class: &'static str,
    pub text_class: &'static str,
}

pub const STATUSES: [StatusInfo; 6] = [
    StatusInfo {
        key: ItemStatus::Planned,
        label: "วางแผน",
        color: "gray",
        bg_class: "bg-gray-500",
        text_class: "text-gray-400",
    },
    StatusInfo {
        key: ItemStatus::InProgress,
        label: "กำลังดำเนินการ",
        color: "blue",
        bg_class: "bg-blue-500",
        text_class: "text-blue-400",
    },
    StatusInfo {
        key: ItemStatus::OnTrack,
        label: "ตามแผน",
        color: "green",
        bg_class: "bg-green-500",
        text_class: "text-green-400",
    },
    StatusInfo {
        key: ItemStatus::AtRisk,
        label: "เสี่ยงล่าช้า",
        color: "yellow",
        bg_class: "bg-yellow-500",
        text_class: "text-yellow-400",
    },
    StatusInfo {
        key: ItemStatus::Blocked,
        label: "ติดขัด",
        color: "red",
        bg_class: "bg-red-500",
        text_class: "text-red-400",
    },
    StatusInfo {
        key: ItemStatus::Completed,
        label: "เสร็จสิ้น",
        color: "emerald",
        bg_class: "bg-emerald-500",
        text_class: "text-emerald-400",
    },
];

/// Thai month abbreviations, January first
pub const MONTHS_TH: [&str; 12] = [
    "ม.ค.", "ก.พ.", "มี.ค.", "เม.ย.", "พ.ค.", "มิ.ย.", "ก.ค.", "ส.ค.", "ก.ย.", "ต.ค.", "พ.ย.",
    "ธ.ค.",
];

/// Company goals shown on the goals page and fed into portfolio analysis.
/// Empty by default; tenants define their own.
pub const COMPANY_GOALS: &[CompanyGoal] = &[];

/// Lookup display metadata for a priority
pub fn priority_info(priority: Priority) -> &'static PriorityInfo {
    &PRIORITIES[priority.rank() as usize]
}

/// Lookup display metadata for a status
pub fn status_info(status: ItemStatus) -> &'static StatusInfo {
    STATUSES
        .iter()
        .find(|info| info.key == status)
        .unwrap_or(&STATUSES[0])
}
