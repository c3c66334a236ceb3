use std::sync::Arc;

use axum::{
    Json,
    extract::{Path, State, rejection::JsonRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};

use tracing::{debug, error, info};

use crate::api::ErrorResponder;
use crate::config::DeploymentMode;
use crate::model::CreateBookmark;
use crate::store::BookmarkStore;

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<BookmarkStore>,
    pub errors: ErrorResponder,
    pub mode: DeploymentMode,
}

impl AppState {
    pub fn new(store: Arc<BookmarkStore>, mode: DeploymentMode) -> Self {
        AppState {
            store,
            errors: ErrorResponder::new(!mode.is_production()),
            mode,
        }
    }
}

pub async fn list_bookmarks(State(state): State<AppState>) -> Response {
    match state.store.list() {
        Ok(bookmarks) => (StatusCode::OK, Json(bookmarks)).into_response(),
        Err(e) => state.errors.respond_to_error(e.into()),
    }
}

pub async fn get_bookmark(State(state): State<AppState>, Path(id): Path<String>) -> Response {
    let bookmark = match state.store.find(&id) {
        Ok(b) => b,
        Err(e) => return state.errors.respond_to_error(e.into()),
    };

    debug!(id = %id, bookmark = ?bookmark, "looked up bookmark");

    match bookmark {
        Some(bookmark) => (StatusCode::OK, Json(bookmark)).into_response(),
        None => {
            error!("Bookmark with id {} not found.", id);
            (StatusCode::NOT_FOUND, "Bookmark Not Found").into_response()
        }
    }
}

pub async fn create_bookmark(
    State(state): State<AppState>,
    payload: Result<Json<CreateBookmark>, JsonRejection>,
) -> Response {
    // Bodies that are not declared as JSON are not parsed at all.
    let payload = match payload {
        Ok(Json(p)) => p,
        Err(JsonRejection::MissingJsonContentType(_)) => CreateBookmark::default(),
        Err(rejection) => return state.errors.respond_to_error(rejection.into()),
    };

    match state.store.append(payload.into_bookmark()) {
        Ok(bookmark) => {
            info!("Bookmark with id {} created.", bookmark.id);
            (StatusCode::CREATED, Json(bookmark)).into_response()
        }
        Err(e) => state.errors.respond_to_error(e.into()),
    }
}

pub async fn delete_bookmark(State(state): State<AppState>, Path(id): Path<String>) -> Response {
    match state.store.remove(&id) {
        Ok(Some(_)) => {
            info!("Bookmark with id {} deleted.", id);
            StatusCode::NO_CONTENT.into_response()
        }
        Ok(None) => {
            error!("Bookmark with id {} not found.", id);
            (StatusCode::NOT_FOUND, "Not Found").into_response()
        }
        Err(e) => state.errors.respond_to_error(e.into()),
    }
}
