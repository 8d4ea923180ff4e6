use axum::{
    extract::{Form, Path, State},
    http::header,
    response::{Html, IntoResponse, Redirect, Response},
    Extension,
};
use tracing::{info, instrument};

use bp_logger_domain::services::{ExportScope, EXPORT_FILE_NAME};

use crate::api::routes::AppState;
use crate::entities::forms::{DownloadForm, EntryForm, MeasurementsForm};
use crate::error::AppError;
use crate::session::SessionContext;
use crate::views;

/// Log page with the entry form and all blocks
#[instrument(skip_all, fields(session = %session.id()))]
pub async fn index(
    State(state): State<AppState>,
    Extension(session): Extension<SessionContext>,
) -> Result<Html<String>, AppError> {
    let blocks = state.entries.list_blocks().await?;
    let user = session.get().await;
    Ok(Html(views::render_index(&blocks, &user)))
}

/// Log a new entry for the session's identity
#[instrument(skip_all, fields(session = %session.id()))]
pub async fn create_entry(
    State(state): State<AppState>,
    Extension(session): Extension<SessionContext>,
    Form(form): Form<EntryForm>,
) -> Result<Redirect, AppError> {
    // identity is remembered even when the measurements turn out malformed
    let identity = session.update(|user| user.resolve(form.identity())).await?;
    let measurements = form.measurements().map_err(AppError::BadRequest)?;
    let reading = state.entries.create_entry(identity, measurements).await?;
    info!("Created entry {}", reading.id);
    Ok(Redirect::to("/"))
}

/// Replace the measurements of an entry
#[instrument(skip(state, form))]
pub async fn edit_entry(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Form(form): Form<MeasurementsForm>,
) -> Result<Redirect, AppError> {
    state.entries.update_entry(id, form.into()).await?;
    Ok(Redirect::to("/"))
}

#[instrument(skip(state))]
pub async fn delete_entry(State(state): State<AppState>, Path(id): Path<i64>) -> Result<Redirect, AppError> {
    state.entries.delete_entry(id).await?;
    Ok(Redirect::to("/"))
}

/// Forget the remembered identity
#[instrument(skip_all, fields(session = %session.id()))]
pub async fn reset_user(Extension(session): Extension<SessionContext>) -> Redirect {
    session.clear().await;
    info!("Session identity cleared");
    Redirect::to("/")
}

/// CSV download of all readings or an inclusive date range
#[instrument(skip_all, fields(mode = ?form.mode))]
pub async fn download(State(state): State<AppState>, Form(form): Form<DownloadForm>) -> Result<Response, AppError> {
    let scope = ExportScope::from_form(
        form.mode.as_deref(),
        form.start_date.as_deref(),
        form.end_date.as_deref(),
    )?;
    let body = state.entries.export_csv(scope).await?;

    let headers = [
        (header::CONTENT_TYPE, mime::TEXT_CSV_UTF_8.to_string()),
        (
            header::CONTENT_DISPOSITION,
            format!("attachment; filename=\"{}\"", EXPORT_FILE_NAME),
        ),
    ];
    Ok((headers, body).into_response())
}
