//! HTTP server setup and routing.

pub mod extract;
pub mod handlers;
pub mod state;

use std::net::SocketAddr;

use axum::middleware;
use axum::routing::{get, post};
use axum::Router;
use tokio::signal;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

use crate::auth::identity_middleware;
use self::state::AppState;

/// Create the Axum application router with all routes and middleware.
///
/// Forum routes run behind [`identity_middleware`], so handlers see the
/// caller's verified identity (or none) as a `Caller` extension.
pub fn create_app(state: AppState, cors: CorsLayer) -> Router {
    let forum_routes = Router::new()
        .route(
            "/api/posts",
            get(handlers::list_posts).post(handlers::create_post),
        )
        .route(
            "/api/posts/:post_id/comments",
            get(handlers::list_comments).post(handlers::create_comment),
        )
        .route("/api/posts/:post_id/upvote", post(handlers::toggle_upvote))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            identity_middleware,
        ));

    Router::new()
        .merge(forum_routes)
        .route("/api/auth/verify", post(handlers::verify_token))
        .route("/health", get(handlers::health_check))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

/// Run the server on the specified address until Ctrl+C or SIGTERM.
pub async fn run_server(app: Router, addr: SocketAddr) -> anyhow::Result<()> {
    let listener = tokio::net::TcpListener::bind(addr).await?;

    info!("Server listening on {}", addr);
    info!("- Posts endpoint: http://{}/api/posts", addr);
    info!("- Health endpoint: http://{}/health", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        match signal::ctrl_c().await {
            Ok(()) => info!("Received Ctrl+C, shutting down"),
            Err(e) => {
                warn!(error = %e, "Failed to install Ctrl+C handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
                info!("Received terminate signal, shutting down");
            }
            Err(e) => {
                warn!(error = %e, "Failed to install terminate handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
