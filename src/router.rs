use crate::docs::ApiDoc;
use crate::logging::logging_middleware;
use crate::middleware::role::require_admin;
use crate::modules::auth::router::{init_auth_admin_router, init_auth_router};
use crate::modules::books::router::{init_books_admin_router, init_books_router};
use crate::state::AppState;
use axum::http::{HeaderValue, Method};
use axum::routing::get;
use axum::{Json, Router, middleware};
use serde_json::json;
use tower_http::cors::CorsLayer;
use tower_http::services::ServeDir;
use utoipa::OpenApi;
use utoipa_scalar::{Scalar, Servable as _};
use utoipa_swagger_ui::SwaggerUi;

pub fn init_router(state: AppState) -> Router {
    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .merge(Scalar::with_url("/scalar", ApiDoc::openapi()))
        .route("/", get(root))
        .nest(
            "/api",
            Router::new()
                .nest(
                    "/auth",
                    init_auth_router().merge(
                        init_auth_admin_router().route_layer(middleware::from_fn_with_state(
                            state.clone(),
                            require_admin,
                        )),
                    ),
                )
                .nest(
                    "/books",
                    init_books_router().nest(
                        "/admin",
                        init_books_admin_router().route_layer(middleware::from_fn_with_state(
                            state.clone(),
                            require_admin,
                        )),
                    ),
                ),
        )
        .nest_service("/uploads", ServeDir::new(state.storage.base_dir()))
        .with_state(state.clone())
        .layer({
            let allowed_origins: Vec<HeaderValue> = state
                .cors_config
                .allowed_origins
                .iter()
                .filter_map(|origin| origin.parse().ok())
                .collect();

            CorsLayer::new()
                .allow_origin(allowed_origins)
                .allow_methods([
                    Method::GET,
                    Method::POST,
                    Method::PUT,
                    Method::PATCH,
                    Method::DELETE,
                    Method::OPTIONS,
                ])
                .allow_headers([
                    axum::http::header::AUTHORIZATION,
                    axum::http::header::CONTENT_TYPE,
                    axum::http::header::ACCEPT,
                ])
                .allow_credentials(true)
        })
        .layer(middleware::from_fn(logging_middleware))
}

async fn root() -> Json<serde_json::Value> {
    Json(json!({
        "message": "Server is running! Swagger docs available at /swagger-ui and /scalar"
    }))
}
