// ABOUTME: Wire-level tests for the Gemini analysis client against a mock
// ABOUTME: endpoint: request shape, success path, and every failure mapping

use milemap_ai::{AnalysisError, AnalysisService, ItemAnalysisRequest};
use milemap_core::{AnalysisType, ItemStatus, Priority, RoadmapItem};

use chrono::{NaiveDate, TimeZone, Utc};
use pretty_assertions::assert_eq;
use serde_json::json;
use wiremock::matchers::{body_partial_json, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn item(id: &str) -> RoadmapItem {
    let at = Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap();
    RoadmapItem {
        id: id.to_string(),
        title: format!("Project {id}"),
        subtitle: None,
        department: "clinical".to_string(),
        priority: Priority::P1,
        status: ItemStatus::InProgress,
        owner: "nok".to_string(),
        start_date: NaiveDate::from_ymd_opt(2026, 1, 15).unwrap(),
        end_date: NaiveDate::from_ymd_opt(2026, 6, 30).unwrap(),
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

fn service_against(server: &MockServer) -> AnalysisService {
    AnalysisService::with_api_key("k-test".to_string()).with_base_url(server.uri())
}

fn candidate_body(text: &str) -> serde_json::Value {
    json!({
        "candidates": [
            { "content": { "parts": [ { "text": text } ] } }
        ]
    })
}

#[tokio::test]
async fn posts_generate_content_with_the_configured_knobs() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1beta/models/gemini-2.0-flash:generateContent"))
        .and(query_param("key", "k-test"))
        .and(body_partial_json(json!({
            "generationConfig": { "temperature": 0.7, "maxOutputTokens": 2048 }
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(candidate_body("## บทวิเคราะห์")))
        .expect(1)
        .mount(&server)
        .await;

    let service = service_against(&server);
    let analysis = service
        .analyze_portfolio(&[], &[item("a")], &[])
        .await
        .unwrap();

    assert_eq!(analysis, "## บทวิเคราะห์");
}

#[tokio::test]
async fn item_analysis_sends_the_selected_template() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(candidate_body("ok")))
        .mount(&server)
        .await;

    let service = service_against(&server);
    let request = ItemAnalysisRequest {
        item: item("a"),
        prompt_type: AnalysisType::Kpi,
        items: vec![item("a"), item("b")],
        departments: Vec::new(),
    };
    service.analyze_item(&request).await.unwrap();

    let requests = server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 1);
    let body: serde_json::Value = serde_json::from_slice(&requests[0].body).unwrap();
    let text = body["contents"][0]["parts"][0]["text"].as_str().unwrap();
    assert!(text.contains("### 1. Lead KPIs (3-5)"));
    assert!(text.contains("- Name: Project a"));
    assert!(text.contains("- Project b (in_progress, 40%,"));
}

#[tokio::test]
async fn non_success_status_carries_status_and_body() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
        .mount(&server)
        .await;

    let err = service_against(&server)
        .analyze_portfolio(&[], &[], &[])
        .await
        .unwrap_err();

    match &err {
        AnalysisError::Endpoint { status, body } => {
            assert_eq!(*status, 500);
            assert_eq!(body, "boom");
        }
        other => panic!("expected Endpoint, got {other:?}"),
    }
    assert_eq!(err.to_string(), "Gemini API error (500): boom");
}

#[tokio::test]
async fn endpoint_error_object_maps_to_its_message() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "error": { "message": "quota exceeded" }
        })))
        .mount(&server)
        .await;

    let err = service_against(&server)
        .analyze_portfolio(&[], &[], &[])
        .await
        .unwrap_err();

    assert!(matches!(&err, AnalysisError::Api(message) if message == "quota exceeded"));
    assert_eq!(err.to_string(), "Gemini API error: quota exceeded");
}

#[tokio::test]
async fn empty_candidates_map_to_the_empty_variant() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "candidates": [] })))
        .mount(&server)
        .await;

    let err = service_against(&server)
        .analyze_portfolio(&[], &[], &[])
        .await
        .unwrap_err();

    assert!(matches!(err, AnalysisError::Empty));
    assert_eq!(err.to_string(), "No response from Gemini API");
}

#[tokio::test]
async fn missing_key_is_rejected_before_any_request() {
    let server = MockServer::start().await;

    std::env::remove_var("GEMINI_API_KEY");
    let service = AnalysisService::new().with_base_url(server.uri());
    let err = service.analyze_portfolio(&[], &[], &[]).await.unwrap_err();

    assert!(matches!(err, AnalysisError::MissingApiKey));
    assert_eq!(err.to_string(), "Missing GEMINI_API_KEY");
    assert!(server.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn transport_failures_surface_as_transport() {
    // nothing listens on this port
    let service =
        AnalysisService::with_api_key("k-test".to_string()).with_base_url("http://127.0.0.1:9".to_string());

    let err = service.analyze_portfolio(&[], &[], &[]).await.unwrap_err();

    match &err {
        AnalysisError::Transport(_) => {}
        other => panic!("expected Transport, got {other:?}"),
    }
    assert!(err.to_string().starts_with("Failed to call Gemini API: "));
}
