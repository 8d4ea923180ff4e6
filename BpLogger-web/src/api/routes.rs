use std::sync::Arc;

use axum::{
    http::{header, HeaderName, HeaderValue},
    middleware,
    routing::{get, post},
    Router,
};
use tower::ServiceBuilder;
use tower_http::{set_header::SetResponseHeaderLayer, trace::TraceLayer};
use tracing::debug;

use bp_logger_data::repository::EntryRepository;
use bp_logger_domain::health::{HealthService, HealthServiceTrait};
use bp_logger_domain::services::{create_default_entry_service, EntryServiceTrait};

use crate::api::handlers::{entries, health, pages};
use crate::openapi::configure_swagger_routes;
use crate::session::{session_middleware, SessionStore};

/// Entry service shared by all handlers
pub type EntryServiceRef = Arc<dyn EntryServiceTrait + Send + Sync>;

/// Shared state of the router
#[derive(Clone)]
pub struct AppState {
    pub entries: EntryServiceRef,
    pub health: Arc<dyn HealthServiceTrait>,
    pub sessions: SessionStore,
    /// Deployment environment reported by `/health`
    pub environment: String,
}

impl AppState {
    /// State over an entry repository
    pub fn new(repository: EntryRepository, environment: impl Into<String>) -> Self {
        let entries: EntryServiceRef = Arc::new(create_default_entry_service(repository));
        Self {
            health: Arc::new(HealthService::new(entries.clone())),
            entries,
            sessions: SessionStore::new(),
            environment: environment.into(),
        }
    }
}

/// Create the application router
pub fn create_app(state: AppState) -> Router {
    debug!("Creating application router");

    // HTML page and its forms, all tied to the visitor's session
    let page_routes = Router::new()
        .route("/", get(pages::index).post(pages::create_entry))
        .route("/edit/:id", post(pages::edit_entry))
        .route("/delete/:id", post(pages::delete_entry))
        .route("/reset_user", get(pages::reset_user))
        .route("/download", post(pages::download))
        .layer(middleware::from_fn_with_state(state.clone(), session_middleware));

    debug!("Page routes configured");

    let api_routes = Router::new()
        .route("/blocks", get(entries::list_blocks))
        .route("/readings", get(entries::list_readings));

    let app = Router::new()
        .merge(page_routes)
        .route("/health", get(health::health_check))
        .nest("/api/v1", api_routes)
        .with_state(state);

    debug!("API routes nested");

    let app = app.merge(configure_swagger_routes());

    health::initialize_server_start_time();

    app.layer(
        ServiceBuilder::new()
            .layer(TraceLayer::new_for_http())
            .layer(SetResponseHeaderLayer::if_not_present(
                header::X_CONTENT_TYPE_OPTIONS,
                HeaderValue::from_static("nosniff"),
            ))
            .layer(SetResponseHeaderLayer::if_not_present(
                header::X_FRAME_OPTIONS,
                HeaderValue::from_static("DENY"),
            ))
            .layer(SetResponseHeaderLayer::if_not_present(
                HeaderName::from_static("referrer-policy"),
                HeaderValue::from_static("same-origin"),
            )),
    )
}
