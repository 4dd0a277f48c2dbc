use std::net::SocketAddr;
use std::path::PathBuf;

use triage_data::Snapshot;
use triage_web::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();

    // Boot from a snapshot file when TRIAGE_SNAPSHOT is set, otherwise use
    // the built-in demo queue.
    let state = match std::env::var_os("TRIAGE_SNAPSHOT") {
        Some(path) => {
            let path = PathBuf::from(path);
            tracing::info!("Loading snapshot from {}", path.display());
            AppState::from_snapshot(Snapshot::load(&path)?)
        }
        None => AppState::new(),
    };

    // Check for built frontend in frontend/dist
    let static_dir = std::env::current_dir()?.join("frontend").join("dist");
    let app = if static_dir.exists() {
        tracing::info!("Serving static files from {}", static_dir.display());
        triage_web::build_router_with_static(state, static_dir.to_str().unwrap())
    } else {
        tracing::info!("No frontend build found, serving API only");
        triage_web::build_router(state)
    };

    let addr = SocketAddr::from(([127, 0, 0, 1], 3200));
    tracing::info!("triage-web listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
