use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

/// Configure Swagger UI endpoints
pub fn configure_swagger_routes() -> SwaggerUi {
    SwaggerUi::new("/api-docs").url("/api-docs/openapi.json", ApiDoc::openapi())
}

// API Documentation
#[derive(OpenApi)]
#[openapi(
    paths(
        // Health endpoints
        crate::api::handlers::health::health_check,

        // Reading endpoints
        crate::api::handlers::entries::list_blocks,
        crate::api::handlers::entries::list_readings,
    ),
    components(
        schemas(
            // Entities
            crate::entities::blocks::PublicReading,
            crate::entities::blocks::PublicBlock,
            crate::entities::blocks::PublicBlockTotals,
            crate::entities::common::PublicErrorResponse,

            // Health handlers
            crate::api::handlers::health::HealthResponse,
            crate::api::handlers::health::ComponentStatus,
            crate::api::handlers::health::ComponentHealthStatus,
        )
    ),
    tags(
        (name = "health", description = "Health check endpoint"),
        (name = "readings", description = "Logged readings and their seven-day blocks")
    ),
    info(
        title = "BP Logger API",
        version = "0.1.0",
        description = "Read-only JSON view of the blood pressure log",
        license(
            name = "MIT",
            url = "https://opensource.org/licenses/MIT"
        ),
    ),
    servers(
        (url = "/", description = "Local development server")
    )
)]
pub struct ApiDoc;
