// ABOUTME: Prompt catalog for roadmap analysis: the portfolio-wide strategic
// ABOUTME: prompt and the five per-item templates

use milemap_core::{AnalysisType, CompanyGoal, DepartmentConfig, RoadmapItem};

/// Log summary used for portfolio-wide runs
pub const PORTFOLIO_PROMPT_SUMMARY: &str = "Strategic analysis of full roadmap";

/// Everything a per-item analysis needs: the item itself plus the roadmap
/// context it sits in
#[derive(Debug, Clone)]
pub struct ItemAnalysisRequest {
    pub item: RoadmapItem,
    pub prompt_type: AnalysisType,
    pub items: Vec<RoadmapItem>,
    pub departments: Vec<DepartmentConfig>,
}

/// Log summary for a per-item run: "{type label}: {item title}"
pub fn prompt_summary(prompt_type: AnalysisType, item_title: &str) -> String {
    format!("{}: {}", prompt_type.label_th(), item_title)
}

/// Portfolio-wide strategic prompt: goals, items, and departments rendered as
/// bullet sections, followed by the five-part analysis request in Thai
pub fn portfolio_prompt(
    goals: &[CompanyGoal],
    items: &[RoadmapItem],
    departments: &[DepartmentConfig],
) -> String {
    let goals_text = goals
        .iter()
        .map(|goal| {
            let related = if goal.related_departments.is_empty() {
                "ไม่ระบุ".to_string()
            } else {
                goal.related_departments.join(", ")
            };
            format!(
                "- {} ({}): เป้าหมาย {}, สถานะ {}, แผนกที่เกี่ยวข้อง: {}",
                goal.title,
                goal.title_en,
                goal.target,
                goal.status.as_str(),
                related
            )
        })
        .collect::<Vec<_>>()
        .join("\n");

    let items_text = items
        .iter()
        .map(|item| {
            format!(
                "- {} ({}): {}, ความคืบหน้า {}%, {} - {}, Priority: {}",
                item.title,
                item.department,
                item.status,
                item.progress,
                item.start_date,
                item.end_date,
                item.priority
            )
        })
        .collect::<Vec<_>>()
        .join("\n");

    let depts_text = departments
        .iter()
        .map(|dept| format!("- {} ({})", dept.name_th, dept.name_en))
        .collect::<Vec<_>>()
        .join("\n");

    format!(
        "คุณเป็นที่ปรึกษาเชิงกลยุทธ์สำหรับเป้าหมายและแผนงานส่วนตัว

วิเคราะห์ข้อมูล Roadmap ต่อไปนี้และให้คำแนะนำเชิงกลยุทธ์:

## เป้าหมายองค์กร (Goals)
{goals_text}

## โครงการใน Roadmap
{items_text}

## แผนกทั้งหมด
{depts_text}

---

กรุณาวิเคราะห์และตอบเป็นภาษาไทยด้วย Markdown formatting ในหัวข้อต่อไปนี้:

### 1. Gap Analysis (ช่องว่างระหว่างเป้าหมายกับโครงการ)
- เป้าหมายใดบ้างที่ยังขาดโครงการสนับสนุน
- เป้าหมายใดที่มีโครงการรองรับไม่เพียงพอ
- แนะนำโครงการที่ควรเพิ่มเติม

### 2. Risk Areas (พื้นที่เสี่ยง)
- แผนกใดมีภาระงานมากเกินไป (overloaded)
- โครงการใดที่มีความเสี่ยงสูง (ล่าช้า, ติดขัด, ความคืบหน้าต่ำ)
- ข้อกังวลด้าน resource allocation

### 3. Priority Recommendations (คำแนะนำการจัดลำดับความสำคัญ)
- โครงการใดควรเร่งดำเนินการก่อน
- โครงการใดควรชะลอหรือพิจารณาใหม่
- เหตุผลเชิงกลยุทธ์

### 4. Timeline Concerns (ข้อกังวลด้านเวลา)
- โครงการที่มี timeline ไม่สมเหตุสมผล
- ความขัดแย้งของ timeline ระหว่างโครงการ
- แนะนำการปรับ timeline

### 5. Strategic Insights (ข้อมูลเชิงลึกเชิงกลยุทธ์)
- แนวโน้มที่สังเกตเห็นจากข้อมูล
- โอกาสทางธุรกิจที่อาจพลาด
- ข้อเสนอแนะเพิ่มเติมสำหรับผู้บริหาร

---

ตอบด้วยน้ำเสียงที่เป็นมืออาชีพ กระชับ ตรงประเด็น และให้คำแนะนำที่นำไปปฏิบัติได้จริง"
    )
}

/// Per-item prompt: the item context block followed by the template for the
/// requested analysis type. Strategic and anything unrecognized fall back to
/// the roadmap template.
pub fn item_prompt(request: &ItemAnalysisRequest) -> String {
    let context = item_context(request);
    match request.prompt_type {
        AnalysisType::Milestone => milestone_template(&context),
        AnalysisType::Kpi => kpi_template(&context),
        AnalysisType::Process => process_template(&context),
        AnalysisType::Critique => critique_template(&context),
        AnalysisType::Roadmap | AnalysisType::Strategic => roadmap_template(&context),
    }
}

fn item_context(request: &ItemAnalysisRequest) -> String {
    let item = &request.item;
    let dept_name = request
        .departments
        .iter()
        .find(|dept| dept.key == item.department)
        .map(|dept| dept.name_th.clone())
        .unwrap_or_else(|| item.department.clone());

    let milestones = if item.milestones.is_empty() {
        "none".to_string()
    } else {
        item.milestones
            .iter()
            .map(|m| {
                format!(
                    "{} ({}) [{}]",
                    m.title,
                    m.date,
                    if m.completed { "done" } else { "pending" }
                )
            })
            .collect::<Vec<_>>()
            .join(", ")
    };

    let dependencies = if item.dependencies.is_empty() {
        "N/A".to_string()
    } else {
        item.dependencies.join(", ")
    };

    let related = request
        .items
        .iter()
        .filter(|other| other.department == item.department && other.id != item.id)
        .map(|other| {
            format!(
                "- {} ({}, {}%, {} - {})",
                other.title, other.status, other.progress, other.start_date, other.end_date
            )
        })
        .collect::<Vec<_>>()
        .join("\n");
    let related = if related.is_empty() {
        "none".to_string()
    } else {
        related
    };

    format!(
        "## Project Data
- Name: {}
- Detail: {}
- Department: {}
- Priority: {}
- Status: {}
- Owner: {}
- Start: {}
- End: {}
- Progress: {}%
- Milestones: {}
- Dependencies: {}
- Notes: {}

## Related Projects (same department)
{}",
        item.title,
        item.subtitle.as_deref().unwrap_or("N/A"),
        dept_name,
        item.priority,
        item.status,
        item.owner,
        item.start_date,
        item.end_date,
        item.progress,
        milestones,
        dependencies,
        item.notes.as_deref().unwrap_or("N/A"),
        related
    )
}

fn roadmap_template(context: &str) -> String {
    format!(
        "You are a strategic advisor for personal goals and roadmap planning.

{context}

Analyze this project strategically. Answer in Thai with Markdown:

### 1. Strategic Positioning
- How does this align with company goals
- Is the priority level appropriate

### 2. Timeline Analysis
- Is the timeline realistic
- Time-related risks

### 3. Impact on Other Projects
- Cross-project effects
- Dependencies to watch

### 4. Strategic Recommendations
- 3-5 actionable recommendations

Be concise, max 800 words."
    )
}

fn milestone_template(context: &str) -> String {
    format!(
        "You are a project management expert for personal goals and roadmap planning.

{context}

Analyze and recommend milestones. Answer in Thai with Markdown:

### 1. Current Milestones Assessment
- Are current milestones sufficient
- Are dates realistic

### 2. Recommended Additional Milestones
- Suggest new milestones with target dates and rationale

### 3. Dependencies & Critical Path
- Task sequencing requirements
- Critical path to watch

### 4. Deliverables per Milestone
- Expected output for each milestone

Be concise, max 800 words."
    )
}

fn kpi_template(context: &str) -> String {
    format!(
        "You are a KPI and measurement expert for personal goals and roadmap planning.

{context}

Design KPIs for this project. Answer in Thai with Markdown:

### 1. Lead KPIs (3-5)
- Name, target, frequency, data source

### 2. Lag KPIs (2-3)
- Name, target, measurement method

### 3. Dashboard Metrics
- 3-5 metrics to display on dashboard

### 4. Warning Thresholds
- Red/Yellow/Green thresholds

Be concise, max 800 words."
    )
}

fn process_template(context: &str) -> String {
    format!(
        "You are a process design expert for personal goals and roadmap planning.

{context}

Design workflow for this project. Answer in Thai with Markdown:

### 1. Workflow Overview
- Step-by-step numbered process
- Who is responsible for each step

### 2. Standard Operating Procedures (SOPs)
- SOPs for 2-3 critical steps

### 3. Tools & Resources Required
- Software, equipment, people

### 4. Check Points & Quality Gates
- Quality checks before proceeding

Be concise, max 800 words."
    )
}

fn critique_template(context: &str) -> String {
    format!(
        "You are a Devil's Advocate advisor for personal goals and roadmap planning.
Your job is to identify weaknesses and risks bluntly.

{context}

Provide blunt risk analysis. Answer in Thai with Markdown:

### 1. Plan Weaknesses
- What is missing from the current plan
- Assumptions that could be wrong

### 2. Key Risks (3-5)
- Risk, severity (High/Medium/Low), likelihood vs impact

### 3. Blind Spots
- What the team might overlook
- What-if scenarios

### 4. Mitigation Plan
- How to reduce each risk
- Plan B for worst case

### 5. Improvement Suggestions
- 3-5 things to do now to increase success chance

Be direct and honest, max 800 words."
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, TimeZone, Utc};
    use milemap_core::{GoalStatus, ItemStatus, Milestone, Priority};

    fn date(month: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, month, day).unwrap()
    }

    fn item(id: &str, dept: &str) -> RoadmapItem {
        let at = Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap();
        RoadmapItem {
            id: id.to_string(),
            title: format!("Project {id}"),
            subtitle: None,
            department: dept.to_string(),
            priority: Priority::P1,
            status: ItemStatus::InProgress,
            owner: "nok".to_string(),
            start_date: date(1, 15),
            end_date: date(6, 30),
            progress: 40,
            parent_id: None,
            milestones: Vec::new(),
            dependencies: Vec::new(),
            links: None,
            notes: None,
            created_at: at,
            updated_at: at,
        }
    }

    fn dept(key: &str, name_th: &str) -> DepartmentConfig {
        DepartmentConfig {
            key: key.to_string(),
            name_th: name_th.to_string(),
            name_en: key.to_string(),
            color: "blue".to_string(),
            bg_class: "bg-blue-500".to_string(),
            text_class: "text-blue-400".to_string(),
            border_class: "border-blue-500".to_string(),
        }
    }

    #[test]
    fn portfolio_prompt_renders_all_three_sections() {
        let goals = vec![CompanyGoal {
            id: "g-1".to_string(),
            title: "ขยายฐานลูกค้า".to_string(),
            title_en: "Grow customer base".to_string(),
            target: "2x".to_string(),
            related_metric: None,
            status: GoalStatus::OnTrack,
            related_departments: vec!["clinical".to_string()],
            description: String::new(),
            icon: "target".to_string(),
        }];
        let items = vec![item("a", "clinical")];
        let departments = vec![dept("clinical", "คลินิก")];

        let prompt = portfolio_prompt(&goals, &items, &departments);

        assert!(prompt.contains("## เป้าหมายองค์กร (Goals)"));
        assert!(prompt.contains("- ขยายฐานลูกค้า (Grow customer base): เป้าหมาย 2x, สถานะ on_track"));
        assert!(prompt.contains("- Project a (clinical): in_progress, ความคืบหน้า 40%"));
        assert!(prompt.contains("2026-01-15 - 2026-06-30, Priority: P1"));
        assert!(prompt.contains("- คลินิก (clinical)"));
        assert!(prompt.contains("### 5. Strategic Insights"));
    }

    #[test]
    fn item_context_renders_milestones_and_related_projects() {
        let mut focus = item("a", "clinical");
        focus.milestones = vec![Milestone {
            id: "ms-1".to_string(),
            title: "Pilot".to_string(),
            date: date(3, 1),
            completed: true,
        }];
        focus.dependencies = vec!["Project b".to_string()];
        let request = ItemAnalysisRequest {
            items: vec![focus.clone(), item("b", "clinical"), item("c", "finance")],
            item: focus,
            prompt_type: AnalysisType::Roadmap,
            departments: vec![dept("clinical", "คลินิก")],
        };

        let prompt = item_prompt(&request);

        assert!(prompt.contains("- Department: คลินิก"));
        assert!(prompt.contains("- Milestones: Pilot (2026-03-01) [done]"));
        assert!(prompt.contains("- Dependencies: Project b"));
        assert!(prompt.contains("- Notes: N/A"));
        // same department only, never the item itself
        assert!(prompt.contains("- Project b (in_progress, 40%,"));
        assert!(!prompt.contains("- Project c"));
        assert!(prompt.contains("### 1. Strategic Positioning"));
    }

    #[test]
    fn unknown_department_falls_back_to_the_key() {
        let request = ItemAnalysisRequest {
            item: item("a", "mystery"),
            prompt_type: AnalysisType::Kpi,
            items: Vec::new(),
            departments: vec![dept("clinical", "คลินิก")],
        };

        let prompt = item_prompt(&request);
        assert!(prompt.contains("- Department: mystery"));
        assert!(prompt.contains("## Related Projects (same department)\nnone"));
    }

    #[test]
    fn each_type_selects_its_template() {
        let base = ItemAnalysisRequest {
            item: item("a", "clinical"),
            prompt_type: AnalysisType::Roadmap,
            items: Vec::new(),
            departments: Vec::new(),
        };

        let expect = [
            (AnalysisType::Roadmap, "### 1. Strategic Positioning"),
            (AnalysisType::Milestone, "### 1. Current Milestones Assessment"),
            (AnalysisType::Kpi, "### 1. Lead KPIs (3-5)"),
            (AnalysisType::Process, "### 1. Workflow Overview"),
            (AnalysisType::Critique, "### 1. Plan Weaknesses"),
            // strategic has no per-item template of its own
            (AnalysisType::Strategic, "### 1. Strategic Positioning"),
        ];
        for (prompt_type, marker) in expect {
            let request = ItemAnalysisRequest {
                prompt_type,
                ..base.clone()
            };
            let prompt = item_prompt(&request);
            assert!(prompt.contains(marker), "missing {marker} for {prompt_type:?}");
            assert!(prompt.contains("max 800 words"));
        }
    }

    #[test]
    fn summaries_pair_the_thai_label_with_the_title() {
        assert_eq!(
            prompt_summary(AnalysisType::Critique, "Expand clinic"),
            "วิเคราะห์ความเสี่ยง: Expand clinic"
        );
        assert_eq!(PORTFOLIO_PROMPT_SUMMARY, "Strategic analysis of full roadmap");
    }
}
