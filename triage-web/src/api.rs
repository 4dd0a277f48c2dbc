use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::Json;
use chrono::Utc;
use serde::{Deserialize, Serialize};

use triage_data::queries::{
    self, ShiftReport, SortKey, SortOrder, TicketFilter, TimelineEvent,
};
use triage_data::types::{
    Agent, Notification, Priority, SlaConfig, Ticket, TicketForm, TicketPatch, TicketStatus,
};

use crate::state::AppState;

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: String,
}

pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
    })
}

// --- Tickets ---

/// Inbox list query: filter and sort state from the dashboard toolbar.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TicketListQuery {
    #[serde(default)]
    pub search: Option<String>,
    #[serde(default)]
    pub unassigned: Option<bool>,
    /// Exact status, or "All"/absent for everything.
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub agent: Option<String>,
    #[serde(default)]
    pub sort: Option<SortKey>,
    #[serde(default)]
    pub order: Option<SortOrder>,
}

impl TicketListQuery {
    fn filter(&self) -> Result<TicketFilter, StatusCode> {
        let status = match self.status.as_deref() {
            None | Some("All") | Some("all") => None,
            Some(s) => Some(s.parse::<TicketStatus>().map_err(|_| StatusCode::BAD_REQUEST)?),
        };
        Ok(TicketFilter {
            search: self.search.clone().unwrap_or_default(),
            unassigned_only: self.unassigned.unwrap_or(false),
            status,
            agent_name: self.agent.clone().unwrap_or_default(),
        })
    }
}

pub async fn list_tickets(
    State(state): State<Arc<AppState>>,
    Query(query): Query<TicketListQuery>,
) -> Result<Json<Vec<Ticket>>, StatusCode> {
    let filter = query.filter()?;
    let tickets = state
        .read(|store| {
            let mut view = queries::filter_tickets(store.tickets(), store.agents(), &filter);
            if let Some(key) = query.sort {
                queries::sort_tickets(&mut view, key, query.order.unwrap_or(SortOrder::Asc));
            }
            view.into_iter().cloned().collect::<Vec<_>>()
        })
        .await;
    Ok(Json(tickets))
}

pub async fn get_ticket(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<Ticket>, StatusCode> {
    state.ticket(&id).await.map(Json).ok_or(StatusCode::NOT_FOUND)
}

pub async fn get_ticket_timeline(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<Vec<TimelineEvent>>, StatusCode> {
    let ticket = state.ticket(&id).await.ok_or(StatusCode::NOT_FOUND)?;
    Ok(Json(queries::timeline(&ticket, Utc::now())))
}

pub async fn get_ticket_history(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<Vec<Ticket>>, StatusCode> {
    let history = state
        .read(|store| {
            store.ticket(&id).map(|ticket| {
                queries::client_history(store.tickets(), ticket)
                    .into_iter()
                    .cloned()
                    .collect::<Vec<_>>()
            })
        })
        .await;
    history.map(Json).ok_or(StatusCode::NOT_FOUND)
}

pub async fn create_ticket(
    State(state): State<Arc<AppState>>,
    Json(form): Json<TicketForm>,
) -> (StatusCode, Json<Ticket>) {
    let ticket = state.create(&form).await;
    (StatusCode::CREATED, Json(ticket))
}

pub async fn update_ticket(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(patch): Json<TicketPatch>,
) -> Result<Json<Ticket>, StatusCode> {
    if !state.ticket_exists(&id).await {
        return Err(StatusCode::NOT_FOUND);
    }
    state.update(&id, patch).await;
    state.ticket(&id).await.map(Json).ok_or(StatusCode::NOT_FOUND)
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssignRequest {
    /// `null` unassigns the ticket.
    pub agent_id: Option<String>,
}

pub async fn assign_ticket(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(body): Json<AssignRequest>,
) -> Result<Json<Ticket>, StatusCode> {
    if !state.ticket_exists(&id).await {
        return Err(StatusCode::NOT_FOUND);
    }
    state.assign(&id, body.agent_id.as_deref()).await;
    state.ticket(&id).await.map(Json).ok_or(StatusCode::NOT_FOUND)
}

pub async fn close_ticket(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<Ticket>, StatusCode> {
    if !state.ticket_exists(&id).await {
        return Err(StatusCode::NOT_FOUND);
    }
    state.close(&id).await;
    state.ticket(&id).await.map(Json).ok_or(StatusCode::NOT_FOUND)
}

#[derive(Debug, Deserialize)]
pub struct AddNoteRequest {
    pub content: String,
    /// Optional status transition applied with the note.
    #[serde(default)]
    pub status: Option<TicketStatus>,
}

pub async fn add_note(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(body): Json<AddNoteRequest>,
) -> Result<Json<Ticket>, StatusCode> {
    if !state.ticket_exists(&id).await {
        return Err(StatusCode::NOT_FOUND);
    }
    state.add_note(&id, &body.content, body.status).await;
    state.ticket(&id).await.map(Json).ok_or(StatusCode::NOT_FOUND)
}

// --- Agents ---

#[derive(Debug, Serialize)]
pub struct AgentWithCapacity {
    #[serde(flatten)]
    pub agent: Agent,
    /// Workload percentage against a ten-ticket reference load.
    pub capacity: f64,
}

fn with_capacity(agent: Agent) -> AgentWithCapacity {
    let capacity = queries::workload_capacity(&agent);
    AgentWithCapacity { agent, capacity }
}

pub async fn list_agents(State(state): State<Arc<AppState>>) -> Json<Vec<AgentWithCapacity>> {
    let agents = state
        .read(|store| store.agents().to_vec())
        .await
        .into_iter()
        .map(with_capacity)
        .collect();
    Json(agents)
}

pub async fn get_agent(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<AgentWithCapacity>, StatusCode> {
    state
        .read(|store| store.agent(&id).cloned())
        .await
        .map(|agent| Json(with_capacity(agent)))
        .ok_or(StatusCode::NOT_FOUND)
}

// --- Notifications ---

pub async fn list_notifications(State(state): State<Arc<AppState>>) -> Json<Vec<Notification>> {
    Json(state.read(|store| store.notifications().to_vec()).await)
}

pub async fn mark_notification_read(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<StatusCode, StatusCode> {
    let exists = state
        .read(|store| store.notifications().iter().any(|n| n.id == id))
        .await;
    if !exists {
        return Err(StatusCode::NOT_FOUND);
    }
    state.mark_notification_read(&id).await;
    Ok(StatusCode::OK)
}

pub async fn clear_notifications(State(state): State<Arc<AppState>>) -> StatusCode {
    state.clear_notifications().await;
    StatusCode::OK
}

// --- SLA policy ---

pub async fn get_sla(State(state): State<Arc<AppState>>) -> Json<Vec<SlaConfig>> {
    Json(state.read(|store| store.sla().configs().to_vec()).await)
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SlaLimitRequest {
    pub priority: Priority,
    pub time_limit: i64,
}

pub async fn put_sla(
    State(state): State<Arc<AppState>>,
    Json(body): Json<SlaLimitRequest>,
) -> Json<Vec<SlaConfig>> {
    state.set_sla_limit(body.priority, body.time_limit).await;
    Json(state.read(|store| store.sla().configs().to_vec()).await)
}

// --- Report ---

pub async fn get_report(State(state): State<Arc<AppState>>) -> Json<ShiftReport> {
    let report = state
        .read(|store| queries::shift_report(store.tickets(), Utc::now()))
        .await;
    Json(report)
}
