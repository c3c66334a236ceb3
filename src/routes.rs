use axum::{
    Router,
    routing::{delete, get, post},
};

use crate::handler::{self, AppState};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/bookmarks", get(handler::list_bookmarks))
        .route("/bookmarks", post(handler::create_bookmark))
        .route("/bookmarks/:id", get(handler::get_bookmark))
        .route("/bookmarks/:id", delete(handler::delete_bookmark))
}
