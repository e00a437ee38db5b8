use crate::state::AppState;
use axum::{
    Router,
    routing::{delete, get, post, put},
};

use super::controller::{
    create_book, delete_book, delete_book_by_admin, get_all_books, get_books, get_user_books,
    update_book, upload_image,
};

pub fn init_books_router() -> Router<AppState> {
    Router::new()
        .route("/upload", post(upload_image))
        .route("/", post(create_book).get(get_books))
        .route("/user", get(get_user_books))
        .route("/{id}", put(update_book).delete(delete_book))
}

/// Admin-only book administration routes; the caller applies the role layer.
pub fn init_books_admin_router() -> Router<AppState> {
    Router::new()
        .route("/", get(get_all_books))
        .route("/{id}", delete(delete_book_by_admin))
}
