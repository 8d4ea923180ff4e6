//! Cookie-keyed storage of per-visitor identity.
//!
//! `session_middleware` resolves the `bp_session` cookie to a `SessionContext`
//! and places it in the request extensions, so handlers receive the visitor's
//! identity explicitly instead of reading shared state.

use std::collections::HashMap;
use std::sync::Arc;

use axum::{
    extract::{Request, State},
    http::{header, HeaderMap, HeaderValue},
    middleware::Next,
    response::Response,
};
use tokio::sync::RwLock;
use tracing::{debug, warn};
use uuid::Uuid;

use bp_logger_domain::session::UserSession;

use crate::api::routes::AppState;

/// Name of the cookie carrying the session id
pub const SESSION_COOKIE: &str = "bp_session";

/// In-memory session storage shared by all requests
#[derive(Debug, Clone, Default)]
pub struct SessionStore {
    sessions: Arc<RwLock<HashMap<Uuid, UserSession>>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Context for the given session id. Unknown or missing ids get a fresh
    /// id that is only stored once something is written to it. The flag is
    /// true when the id was already known.
    pub async fn open(&self, id: Option<Uuid>) -> (SessionContext, bool) {
        if let Some(id) = id {
            if self.contains(id).await {
                return (self.context(id), true);
            }
        }
        (self.context(Uuid::new_v4()), false)
    }

    /// Number of stored sessions
    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }

    async fn contains(&self, id: Uuid) -> bool {
        self.sessions.read().await.contains_key(&id)
    }

    fn context(&self, id: Uuid) -> SessionContext {
        SessionContext {
            id,
            store: self.clone(),
        }
    }
}

/// Handle on one visitor's session, handed to handlers as an extension
#[derive(Debug, Clone)]
pub struct SessionContext {
    id: Uuid,
    store: SessionStore,
}

impl SessionContext {
    pub fn id(&self) -> Uuid {
        self.id
    }

    /// Snapshot of the remembered identity
    pub async fn get(&self) -> UserSession {
        self.store
            .sessions
            .read()
            .await
            .get(&self.id)
            .cloned()
            .unwrap_or_default()
    }

    /// Run `f` against the session under the write lock. The session is
    /// stored only while it holds something.
    pub async fn update<F, T>(&self, f: F) -> T
    where
        F: FnOnce(&mut UserSession) -> T,
    {
        let mut sessions = self.store.sessions.write().await;
        let session = sessions.entry(self.id).or_default();
        let result = f(&mut *session);
        if *session == UserSession::default() {
            sessions.remove(&self.id);
        }
        result
    }

    /// Forget the session entirely
    pub async fn clear(&self) {
        self.store.sessions.write().await.remove(&self.id);
    }

    async fn is_stored(&self) -> bool {
        self.store.contains(self.id).await
    }
}

/// Session id carried by the request's `Cookie` headers, if any
pub fn session_id_from_headers(headers: &HeaderMap) -> Option<Uuid> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|cookies| cookies.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(name, _)| *name == SESSION_COOKIE)
        .and_then(|(_, value)| Uuid::parse_str(value.trim()).ok())
}

/// Attach the visitor's session to the request. The cookie is only sent once
/// a handler has stored something for a new session.
pub async fn session_middleware(State(state): State<AppState>, mut req: Request, next: Next) -> Response {
    let existing = session_id_from_headers(req.headers());
    let (context, known) = state.sessions.open(existing).await;

    req.extensions_mut().insert(context.clone());
    let mut response = next.run(req).await;

    if !known && context.is_stored().await {
        let cookie = format!("{}={}; Path=/; HttpOnly; SameSite=Lax", SESSION_COOKIE, context.id());
        match HeaderValue::from_str(&cookie) {
            Ok(value) => {
                response.headers_mut().append(header::SET_COOKIE, value);
                debug!("Started session {} ({} stored)", context.id(), state.sessions.len().await);
            }
            Err(e) => warn!("Could not build session cookie: {}", e),
        }
    }

    response
}
