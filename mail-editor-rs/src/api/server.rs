//! API Server - HTTP server for the admin surface

use axum::{
    extract::State,
    http::StatusCode,
    middleware::{self, Next},
    response::{IntoResponse, Redirect, Response},
    routing::get,
    Json, Router,
};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

use crate::api::preview::{self, ApiError, AppState};
use crate::api::web;
use crate::auth::{get_session_email, AdminStore};
use crate::preview::{PreviewEnv, PreviewRegistry};
use crate::settings::SettingsHandle;

pub struct ApiServer {
    state: Arc<AppState>,
    addr: String,
}

impl ApiServer {
    pub fn new(
        registry: Arc<PreviewRegistry>,
        env: PreviewEnv,
        settings: SettingsHandle,
        admin: AdminStore,
        reject_unauthorized: bool,
        addr: String,
    ) -> Self {
        let state = Arc::new(AppState {
            registry,
            env,
            settings,
            admin,
            reject_unauthorized,
        });

        Self { state, addr }
    }

    /// Build the router with all routes.
    pub fn router(&self) -> Router {
        let cors = CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any);

        // Staff-only preview routes
        let preview_routes = Router::new()
            .route(
                "/admin/preview",
                get(preview::preview_get).post(preview::preview_post),
            )
            .route_layer(middleware::from_fn_with_state(
                self.state.clone(),
                staff_middleware,
            ));

        // Login flow (no auth required)
        let web_routes = Router::new()
            .route("/admin/login", get(web::login_page).post(web::login_submit))
            .route("/admin/logout", get(web::logout));

        Router::new()
            .route("/health", get(health))
            .merge(preview_routes)
            .merge(web_routes)
            .layer(TraceLayer::new_for_http())
            .layer(cors)
            .with_state(self.state.clone())
    }

    /// Start the API server.
    pub async fn run(&self) -> std::io::Result<()> {
        let router = self.router();

        info!("Starting admin server on {}", self.addr);

        let listener = tokio::net::TcpListener::bind(&self.addr).await?;
        axum::serve(listener, router).await?;

        Ok(())
    }
}

async fn health() -> impl IntoResponse {
    Json(serde_json::json!({ "status": "ok" }))
}

/// Staff gate for the preview routes.
///
/// No valid session: redirect to the login page, or 401 when the host
/// configured outright rejection. A valid session without the staff flag is
/// always a 403 and never sees preview content.
async fn staff_middleware(
    State(state): State<Arc<AppState>>,
    req: axum::http::Request<axum::body::Body>,
    next: Next,
) -> Response {
    let email = match get_session_email(req.headers()) {
        Some(email) => email,
        None => {
            warn!("Unauthenticated preview access");
            if state.reject_unauthorized {
                return (
                    StatusCode::UNAUTHORIZED,
                    Json(ApiError::new("Not authenticated")),
                )
                    .into_response();
            }
            return Redirect::to("/admin/login").into_response();
        }
    };

    match state.admin.is_staff(&email).await {
        Ok(true) => next.run(req).await,
        Ok(false) => {
            warn!("Non-staff preview access by {}", email);
            (StatusCode::FORBIDDEN, Json(ApiError::new("Forbidden"))).into_response()
        }
        Err(e) => {
            warn!("Staff lookup failed for {}: {}", email, e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ApiError::new("Authentication error")),
            )
                .into_response()
        }
    }
}
