pub mod api;
pub mod state;
pub mod ws;

use std::sync::Arc;

use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::services::ServeDir;

use crate::state::AppState;

fn api_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/health", get(api::health))
        .route("/tickets", get(api::list_tickets).post(api::create_ticket))
        .route(
            "/tickets/{id}",
            get(api::get_ticket).patch(api::update_ticket),
        )
        .route("/tickets/{id}/timeline", get(api::get_ticket_timeline))
        .route("/tickets/{id}/history", get(api::get_ticket_history))
        .route("/tickets/{id}/assign", post(api::assign_ticket))
        .route("/tickets/{id}/close", post(api::close_ticket))
        .route("/tickets/{id}/notes", post(api::add_note))
        .route("/agents", get(api::list_agents))
        .route("/agents/{id}", get(api::get_agent))
        .route(
            "/notifications",
            get(api::list_notifications).delete(api::clear_notifications),
        )
        .route(
            "/notifications/{id}/read",
            post(api::mark_notification_read),
        )
        .route("/sla", get(api::get_sla).put(api::put_sla))
        .route("/report", get(api::get_report))
}

/// Build the Axum router with all routes
pub fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        .nest("/api", api_routes())
        .route("/ws", get(ws::ws_handler))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Build the router with static file serving for production builds
pub fn build_router_with_static(state: Arc<AppState>, static_dir: &str) -> Router {
    Router::new()
        .nest("/api", api_routes())
        .route("/ws", get(ws::ws_handler))
        .fallback_service(ServeDir::new(static_dir))
        .layer(CorsLayer::permissive())
        .with_state(state)
}
