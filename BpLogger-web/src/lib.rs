// BP Logger web layer
//
// HTML pages, form handlers, the JSON API and its OpenAPI documentation.

// Public modules
pub mod api;
pub mod config;
pub mod entities;
pub mod error;
pub mod openapi;
pub mod session;
pub mod views;

use axum::Router;

pub use api::AppState;

/// Create the application router
pub fn create_application(state: AppState) -> Router {
    api::create_app(state)
}
