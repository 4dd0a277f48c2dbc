use std::sync::Arc;

use axum::body::Body;
use axum::http::{header, Method, Request, StatusCode};
use tower::ServiceExt;

use chrono::Utc;
use triage_data::Snapshot;
use triage_web::state::AppState;

/// Make a GET request against a shared state
async fn get_json(state: &Arc<AppState>, path: &str) -> (StatusCode, serde_json::Value) {
    request(state, Method::GET, path, None).await
}

/// Make a request with an optional JSON body against a shared state
async fn request(
    state: &Arc<AppState>,
    method: Method,
    path: &str,
    body: Option<serde_json::Value>,
) -> (StatusCode, serde_json::Value) {
    let app = triage_web::build_router(state.clone());

    let builder = Request::builder().method(method).uri(path);
    let request = match body {
        Some(json) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json: serde_json::Value =
        serde_json::from_slice(&bytes).unwrap_or(serde_json::Value::Null);
    (status, json)
}

#[tokio::test]
async fn test_full_ticket_lifecycle() {
    let state = AppState::new();

    // Create a new High-priority ticket, unassigned.
    let (status, created) = request(
        &state,
        Method::POST,
        "/api/tickets",
        Some(serde_json::json!({
            "client": "Casey Jordan",
            "email": "casey@example.com",
            "subject": "Cannot log in",
            "priority": "High"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let id = created["id"].as_str().unwrap().to_string();
    assert_eq!(created["status"], "Open");
    assert_eq!(created["assignedAgentId"], serde_json::Value::Null);

    // Assign it to Sofia (a1).
    let (status, assigned) = request(
        &state,
        Method::POST,
        &format!("/api/tickets/{}/assign", id),
        Some(serde_json::json!({"agentId": "a1"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(assigned["assignedAgentId"], "a1");

    let (_, agent) = get_json(&state, "/api/agents/a1").await;
    assert!(agent["assignedTickets"]
        .as_array()
        .unwrap()
        .iter()
        .any(|t| t == id.as_str()));

    // A closing note resolves the case and clears the assignment.
    let (status, closed) = request(
        &state,
        Method::POST,
        &format!("/api/tickets/{}/notes", id),
        Some(serde_json::json!({"content": "fixed and verified", "status": "Closed"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(closed["status"], "Closed");
    assert_eq!(closed["assignedAgentId"], serde_json::Value::Null);

    let (_, agent) = get_json(&state, "/api/agents/a1").await;
    assert!(!agent["assignedTickets"]
        .as_array()
        .unwrap()
        .iter()
        .any(|t| t == id.as_str()));

    // The resolution landed in the notification tray.
    let (_, notifications) = get_json(&state, "/api/notifications").await;
    assert!(notifications
        .as_array()
        .unwrap()
        .iter()
        .any(|n| n["type"] == "success" && n["message"].as_str().unwrap().contains(&id)));

    // The timeline shows the note, creation, and closure.
    let (_, timeline) = get_json(&state, &format!("/api/tickets/{}/timeline", id)).await;
    let events = timeline.as_array().unwrap();
    assert!(events.iter().any(|e| e["id"] == "created"));
    assert!(events.iter().any(|e| e["id"] == "closed"));
    assert!(events
        .iter()
        .any(|e| e["content"] == "fixed and verified"));
}

#[tokio::test]
async fn test_note_resets_sla_clock() {
    let state = AppState::new();

    // TK-1002 is High priority; the default policy grants 2880 minutes.
    let (status, before) = get_json(&state, "/api/tickets/TK-1002").await;
    assert_eq!(status, StatusCode::OK);
    let before_deadline = before["slaDeadline"].as_str().unwrap().to_string();

    let (_, after) = request(
        &state,
        Method::POST,
        "/api/tickets/TK-1002/notes",
        Some(serde_json::json!({"content": "customer updated"})),
    )
    .await;
    let after_deadline: chrono::DateTime<Utc> =
        after["slaDeadline"].as_str().unwrap().parse().unwrap();
    assert_ne!(before_deadline, after["slaDeadline"].as_str().unwrap());

    let expected = Utc::now() + chrono::Duration::minutes(2880);
    assert!((after_deadline - expected).num_seconds().abs() <= 1);
}

#[tokio::test]
async fn test_patch_with_assignment_moves_ticket() {
    let state = AppState::new();

    // TK-1001 is held by a1; a patch that reassigns it moves it to a2.
    let (status, patched) = request(
        &state,
        Method::PATCH,
        "/api/tickets/TK-1001",
        Some(serde_json::json!({"assignedAgentId": "a2", "subject": "Escalated DB timeout"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(patched["assignedAgentId"], "a2");
    assert_eq!(patched["subject"], "Escalated DB timeout");

    let (_, a1) = get_json(&state, "/api/agents/a1").await;
    assert!(!a1["assignedTickets"]
        .as_array()
        .unwrap()
        .iter()
        .any(|t| t == "TK-1001"));
    let (_, a2) = get_json(&state, "/api/agents/a2").await;
    assert!(a2["assignedTickets"]
        .as_array()
        .unwrap()
        .iter()
        .any(|t| t == "TK-1001"));
}

#[tokio::test]
async fn test_unassigned_filter_matches_only_unassigned() {
    let state = AppState::new();

    let (status, json) = get_json(&state, "/api/tickets?unassigned=true").await;
    assert_eq!(status, StatusCode::OK);
    for ticket in json.as_array().unwrap() {
        assert_eq!(ticket["assignedAgentId"], serde_json::Value::Null);
    }
}

#[tokio::test]
async fn test_agent_name_filter_resolves_assignment() {
    let state = AppState::new();

    let (status, json) = get_json(&state, "/api/tickets?agent=sofia").await;
    assert_eq!(status, StatusCode::OK);
    let tickets = json.as_array().unwrap();
    assert!(!tickets.is_empty());
    for ticket in tickets {
        assert_eq!(ticket["assignedAgentId"], "a1");
    }
}

#[tokio::test]
async fn test_sla_limit_update_affects_next_reset() {
    let state = AppState::new();

    let (status, _) = request(
        &state,
        Method::PUT,
        "/api/sla",
        Some(serde_json::json!({"priority": "High", "timeLimit": 60})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (_, after) = request(
        &state,
        Method::POST,
        "/api/tickets/TK-1002/notes",
        Some(serde_json::json!({"content": "re-checked"})),
    )
    .await;
    let deadline: chrono::DateTime<Utc> =
        after["slaDeadline"].as_str().unwrap().parse().unwrap();
    let expected = Utc::now() + chrono::Duration::minutes(60);
    assert!((deadline - expected).num_seconds().abs() <= 1);
}

#[tokio::test]
async fn test_boot_from_snapshot_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("queue.json");
    Snapshot::demo(Utc::now()).save(&path).unwrap();

    let state = AppState::from_snapshot(Snapshot::load(&path).unwrap());
    let (status, json) = get_json(&state, "/api/tickets/TK-1001").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["client"], "Alice Freeman");
}

#[tokio::test]
async fn test_clear_notifications_endpoint() {
    let state = AppState::new();

    let (status, _) = request(&state, Method::DELETE, "/api/notifications", None).await;
    assert_eq!(status, StatusCode::OK);

    let (_, json) = get_json(&state, "/api/notifications").await;
    assert!(json.as_array().unwrap().is_empty());
}
