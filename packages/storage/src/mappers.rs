// ABOUTME: Bidirectional translation between wire rows and domain entities
// ABOUTME: Wire null becomes None, null jsonb arrays become empty vecs, writes are partial-safe

use crate::wire::{AnalysisLogRecord, DepartmentRecord, ItemRecord, JsonMap, OwnerRecord};
use milemap_core::{
    AnalysisLog, DepartmentConfig, DepartmentPatch, ItemPatch, NewAnalysisLog, NewRoadmapItem,
    OwnerConfig, OwnerPatch, RoadmapItem,
};
use serde_json::{json, Value};

/// An empty string means "present but cleared": written as explicit null so
/// the remote column is actually nulled rather than left alone.
fn text_or_null(value: &str) -> Value {
    if value.is_empty() {
        Value::Null
    } else {
        Value::String(value.to_owned())
    }
}

pub fn item_from_record(record: ItemRecord) -> RoadmapItem {
    RoadmapItem {
        id: record.id,
        title: record.title,
        subtitle: record.subtitle,
        department: record.department,
        priority: record.priority,
        status: record.status,
        owner: record.owner,
        start_date: record.start_date,
        end_date: record.end_date,
        progress: record.progress,
        parent_id: record.parent_id,
        milestones: record.milestones.unwrap_or_default(),
        dependencies: record.dependencies.unwrap_or_default(),
        links: record.links,
        notes: record.notes,
        created_at: record.created_at,
        updated_at: record.updated_at,
    }
}

/// Partial-safe: a field absent from the patch produces no key at all, so the
/// remote row keeps its current value for that column.
pub fn item_patch_to_record(patch: &ItemPatch) -> JsonMap {
    let mut record = JsonMap::new();
    if let Some(title) = &patch.title {
        record.insert("title".into(), json!(title));
    }
    if let Some(subtitle) = &patch.subtitle {
        record.insert("subtitle".into(), text_or_null(subtitle));
    }
    if let Some(department) = &patch.department {
        record.insert("department".into(), json!(department));
    }
    if let Some(priority) = patch.priority {
        record.insert("priority".into(), json!(priority));
    }
    if let Some(status) = patch.status {
        record.insert("status".into(), json!(status));
    }
    if let Some(owner) = &patch.owner {
        record.insert("owner".into(), json!(owner));
    }
    if let Some(start_date) = patch.start_date {
        record.insert("start_date".into(), json!(start_date));
    }
    if let Some(end_date) = patch.end_date {
        record.insert("end_date".into(), json!(end_date));
    }
    if let Some(progress) = patch.progress {
        record.insert("progress".into(), json!(progress));
    }
    if let Some(parent_id) = &patch.parent_id {
        record.insert("parent_id".into(), text_or_null(parent_id));
    }
    if let Some(milestones) = &patch.milestones {
        record.insert("milestones".into(), json!(milestones));
    }
    if let Some(dependencies) = &patch.dependencies {
        record.insert("dependencies".into(), json!(dependencies));
    }
    if let Some(links) = &patch.links {
        record.insert("links".into(), json!(links));
    }
    if let Some(notes) = &patch.notes {
        record.insert("notes".into(), text_or_null(notes));
    }
    record
}

pub fn new_item_to_record(item: &NewRoadmapItem) -> JsonMap {
    let patch = ItemPatch {
        title: Some(item.title.clone()),
        subtitle: item.subtitle.clone(),
        department: Some(item.department.clone()),
        priority: Some(item.priority),
        status: Some(item.status),
        owner: Some(item.owner.clone()),
        start_date: Some(item.start_date),
        end_date: Some(item.end_date),
        progress: Some(item.progress),
        parent_id: item.parent_id.clone(),
        milestones: Some(item.milestones.clone()),
        dependencies: Some(item.dependencies.clone()),
        links: item.links.clone(),
        notes: item.notes.clone(),
    };
    item_patch_to_record(&patch)
}

pub fn department_from_record(record: DepartmentRecord) -> DepartmentConfig {
    DepartmentConfig {
        key: record.key,
        name_th: record.name_th,
        name_en: record.name_en,
        color: record.color,
        bg_class: record.bg_class,
        text_class: record.text_class,
        border_class: record.border_class,
    }
}

pub fn department_to_record(dept: &DepartmentConfig) -> JsonMap {
    let mut record = JsonMap::new();
    record.insert("key".into(), json!(dept.key));
    record.insert("name_th".into(), json!(dept.name_th));
    record.insert("name_en".into(), json!(dept.name_en));
    record.insert("color".into(), json!(dept.color));
    record.insert("bg_class".into(), json!(dept.bg_class));
    record.insert("text_class".into(), json!(dept.text_class));
    record.insert("border_class".into(), json!(dept.border_class));
    record
}

pub fn department_patch_to_record(patch: &DepartmentPatch) -> JsonMap {
    let mut record = JsonMap::new();
    if let Some(name_th) = &patch.name_th {
        record.insert("name_th".into(), json!(name_th));
    }
    if let Some(name_en) = &patch.name_en {
        record.insert("name_en".into(), json!(name_en));
    }
    if let Some(color) = &patch.color {
        record.insert("color".into(), json!(color));
    }
    if let Some(bg_class) = &patch.bg_class {
        record.insert("bg_class".into(), json!(bg_class));
    }
    if let Some(text_class) = &patch.text_class {
        record.insert("text_class".into(), json!(text_class));
    }
    if let Some(border_class) = &patch.border_class {
        record.insert("border_class".into(), json!(border_class));
    }
    record
}

pub fn owner_from_record(record: OwnerRecord) -> OwnerConfig {
    OwnerConfig {
        key: record.key,
        label: record.label,
        color: record.color,
    }
}

pub fn owner_to_record(owner: &OwnerConfig) -> JsonMap {
    let mut record = JsonMap::new();
    record.insert("key".into(), json!(owner.key));
    record.insert("label".into(), json!(owner.label));
    let color = match &owner.color {
        Some(color) if !color.is_empty() => json!(color),
        _ => Value::Null,
    };
    record.insert("color".into(), color);
    record
}

pub fn owner_patch_to_record(patch: &OwnerPatch) -> JsonMap {
    let mut record = JsonMap::new();
    if let Some(label) = &patch.label {
        record.insert("label".into(), json!(label));
    }
    if let Some(color) = &patch.color {
        record.insert("color".into(), json!(color));
    }
    record
}

pub fn analysis_log_from_record(record: AnalysisLogRecord) -> AnalysisLog {
    AnalysisLog {
        id: record.id,
        user_id: record.user_id,
        user_email: record.user_email,
        analysis_type: record.analysis_type,
        item_id: record.item_id,
        prompt_summary: record.prompt_summary,
        result_markdown: record.result_markdown,
        model_used: record.model_used,
        created_at: record.created_at,
    }
}

pub fn new_analysis_log_to_record(log: &NewAnalysisLog) -> JsonMap {
    let mut record = JsonMap::new();
    record.insert("user_id".into(), json!(log.user_id));
    record.insert("user_email".into(), json!(log.user_email));
    record.insert("analysis_type".into(), json!(log.analysis_type));
    // item_id is nullable but always supplied; null marks a portfolio-level run
    record.insert("item_id".into(), json!(log.item_id));
    record.insert("prompt_summary".into(), json!(log.prompt_summary));
    record.insert("result_markdown".into(), json!(log.result_markdown));
    record.insert("model_used".into(), json!(log.model_used));
    record
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use milemap_core::{AnalysisType, ItemLink, ItemStatus, Milestone, Priority};
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn full_record() -> ItemRecord {
        serde_json::from_value(json!({
            "id": "item-1",
            "title": "Frontend Redesign",
            "subtitle": "New design system",
            "department": "engineering",
            "priority": "P1",
            "status": "in_progress",
            "owner": "nok",
            "start_date": "2026-01-01",
            "end_date": "2026-06-30",
            "progress": 40,
            "parent_id": "item-0",
            "milestones": [
                { "id": "ms-1", "title": "Design tokens", "date": "2026-02-01", "completed": true }
            ],
            "dependencies": ["item-9"],
            "links": [ { "id": "ln-1", "title": "Spec doc", "url": "https://example.com" } ],
            "notes": "Watch bundle size",
            "created_at": "2026-01-01T00:00:00Z",
            "updated_at": "2026-01-02T00:00:00Z"
        }))
        .unwrap()
    }

    #[test]
    fn item_round_trip_reproduces_shared_fields() {
        let record = full_record();
        let item = item_from_record(record.clone());
        let patch = ItemPatch {
            title: Some(item.title.clone()),
            subtitle: item.subtitle.clone(),
            department: Some(item.department.clone()),
            priority: Some(item.priority),
            status: Some(item.status),
            owner: Some(item.owner.clone()),
            start_date: Some(item.start_date),
            end_date: Some(item.end_date),
            progress: Some(item.progress),
            parent_id: item.parent_id.clone(),
            milestones: Some(item.milestones.clone()),
            dependencies: Some(item.dependencies.clone()),
            links: item.links.clone(),
            notes: item.notes.clone(),
        };
        let written = item_patch_to_record(&patch);

        // every field both directions define comes back byte-identical;
        // id and timestamps are server-assigned and never written
        let mut expected = serde_json::to_value(&record)
            .unwrap()
            .as_object()
            .unwrap()
            .clone();
        expected.remove("id");
        expected.remove("created_at");
        expected.remove("updated_at");
        assert_eq!(Value::Object(written), Value::Object(expected));
    }

    #[test]
    fn nulls_become_absent_and_null_arrays_become_empty() {
        let record: ItemRecord = serde_json::from_value(json!({
            "id": "item-2",
            "title": "Backend API",
            "subtitle": null,
            "department": "engineering",
            "priority": "P0",
            "status": "planned",
            "owner": "mike",
            "start_date": "2026-03-01",
            "end_date": "2026-04-01",
            "progress": 0,
            "parent_id": null,
            "milestones": null,
            "dependencies": null,
            "links": null,
            "notes": null,
            "created_at": "2026-01-01T00:00:00Z",
            "updated_at": "2026-01-01T00:00:00Z"
        }))
        .unwrap();

        let item = item_from_record(record);
        assert_eq!(item.subtitle, None);
        assert_eq!(item.notes, None);
        assert_eq!(item.parent_id, None);
        assert_eq!(item.links, None);
        assert_eq!(item.milestones, Vec::<Milestone>::new());
        assert_eq!(item.dependencies, Vec::<String>::new());
    }

    #[test]
    fn absent_patch_fields_produce_no_keys() {
        let patch = ItemPatch {
            title: Some("Renamed".to_string()),
            ..Default::default()
        };
        let record = item_patch_to_record(&patch);
        assert_eq!(record.len(), 1);
        assert_eq!(record.get("title"), Some(&json!("Renamed")));
    }

    #[test]
    fn cleared_text_fields_are_written_as_explicit_null() {
        let patch = ItemPatch {
            subtitle: Some(String::new()),
            notes: Some(String::new()),
            parent_id: Some(String::new()),
            ..Default::default()
        };
        let record = item_patch_to_record(&patch);
        assert_eq!(record.get("subtitle"), Some(&Value::Null));
        assert_eq!(record.get("notes"), Some(&Value::Null));
        assert_eq!(record.get("parent_id"), Some(&Value::Null));
    }

    #[test]
    fn new_item_emits_every_provided_column() {
        let item = NewRoadmapItem {
            title: "Database Migration".to_string(),
            subtitle: None,
            department: "platform".to_string(),
            priority: Priority::P2,
            status: ItemStatus::Planned,
            owner: "joy".to_string(),
            start_date: NaiveDate::from_ymd_opt(2026, 5, 1).unwrap(),
            end_date: NaiveDate::from_ymd_opt(2026, 8, 31).unwrap(),
            progress: 0,
            parent_id: None,
            milestones: vec![Milestone {
                id: "ms-1".to_string(),
                title: "Schema freeze".to_string(),
                date: NaiveDate::from_ymd_opt(2026, 6, 1).unwrap(),
                completed: false,
            }],
            dependencies: Vec::new(),
            links: Some(vec![ItemLink {
                id: "ln-1".to_string(),
                title: "Runbook".to_string(),
                url: "https://example.com/runbook".to_string(),
            }]),
            notes: None,
        };
        let record = new_item_to_record(&item);

        assert_eq!(record.get("title"), Some(&json!("Database Migration")));
        assert_eq!(record.get("start_date"), Some(&json!("2026-05-01")));
        assert_eq!(record.get("milestones").unwrap()[0]["completed"], json!(false));
        // optional fields that were never set produce no key
        assert!(!record.contains_key("subtitle"));
        assert!(!record.contains_key("notes"));
        assert!(!record.contains_key("parent_id"));
        // server-assigned columns are never written
        assert!(!record.contains_key("id"));
        assert!(!record.contains_key("created_at"));
    }

    #[test]
    fn department_round_trip() {
        let record: DepartmentRecord = serde_json::from_value(json!({
            "key": "clinical",
            "name_th": "คลินิก",
            "name_en": "Clinical",
            "color": "cyan",
            "bg_class": "bg-cyan-500",
            "text_class": "text-cyan-400",
            "border_class": "border-cyan-500",
            "sort_order": 0,
            "created_at": "2026-01-01T00:00:00Z"
        }))
        .unwrap();
        let dept = department_from_record(record);
        let written = department_to_record(&dept);
        assert_eq!(written.get("key"), Some(&json!("clinical")));
        assert_eq!(written.get("name_th"), Some(&json!("คลินิก")));
        assert_eq!(written.get("border_class"), Some(&json!("border-cyan-500")));
        assert_eq!(written.len(), 7);
    }

    #[test]
    fn owner_color_null_coercion() {
        let named = OwnerConfig {
            key: "nok".to_string(),
            label: "Nok".to_string(),
            color: Some("purple".to_string()),
        };
        assert_eq!(owner_to_record(&named).get("color"), Some(&json!("purple")));

        let unset = OwnerConfig {
            key: "mike".to_string(),
            label: "Mike".to_string(),
            color: None,
        };
        assert_eq!(owner_to_record(&unset).get("color"), Some(&Value::Null));

        let cleared = OwnerConfig {
            key: "joy".to_string(),
            label: "Joy".to_string(),
            color: Some(String::new()),
        };
        assert_eq!(owner_to_record(&cleared).get("color"), Some(&Value::Null));
    }

    #[test]
    fn analysis_log_mapping_keeps_nullable_item_reference() {
        let log = NewAnalysisLog {
            user_id: "u-1".to_string(),
            user_email: "dr@example.com".to_string(),
            analysis_type: AnalysisType::Strategic,
            item_id: None,
            prompt_summary: "Portfolio review".to_string(),
            result_markdown: "## Gaps".to_string(),
            model_used: "gemini-2.0-flash".to_string(),
        };
        let record = new_analysis_log_to_record(&log);
        assert_eq!(record.get("item_id"), Some(&Value::Null));
        assert_eq!(record.get("analysis_type"), Some(&json!("strategic")));
        assert!(!record.contains_key("id"));

        let row: AnalysisLogRecord = serde_json::from_value(json!({
            "id": "log-1",
            "user_id": "u-1",
            "user_email": "dr@example.com",
            "analysis_type": "kpi",
            "item_id": "item-7",
            "prompt_summary": "KPI: Telehealth",
            "result_markdown": "### Lead KPIs",
            "model_used": "gemini-2.0-flash",
            "created_at": "2026-02-01T00:00:00Z"
        }))
        .unwrap();
        let mapped = analysis_log_from_record(row);
        assert_eq!(mapped.analysis_type, AnalysisType::Kpi);
        assert_eq!(mapped.item_id.as_deref(), Some("item-7"));
    }
}
