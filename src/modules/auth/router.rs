use crate::state::AppState;
use axum::{
    Router,
    routing::{delete, get, post},
};

use super::controller::{delete_user, get_current_user, get_users, login, sign_up};

pub fn init_auth_router() -> Router<AppState> {
    Router::new()
        .route("/sign-up", post(sign_up))
        .route("/login", post(login))
}

/// Admin-only user administration routes; the caller applies the role layer.
pub fn init_auth_admin_router() -> Router<AppState> {
    Router::new()
        .route("/", get(get_users))
        .route("/user", get(get_current_user))
        .route("/{id}", delete(delete_user))
}
