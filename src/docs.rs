use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::modules::auth::controller::ErrorResponse;
use crate::modules::auth::model::{
    AuthResponse, DeleteUserResponse, LoginRequest, SignUpRequest, User, UserRole, UserSummary,
    UserWithDeletedBy,
};
use crate::modules::books::model::{
    BookAdminResponse, BookMessageResponse, BookResponse, CreateBookRequest,
    PaginatedBooksResponse, UpdateBookRequest, UploadResponse,
};
use crate::utils::pagination::PaginationParams;

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::modules::auth::controller::sign_up,
        crate::modules::auth::controller::login,
        crate::modules::auth::controller::get_users,
        crate::modules::auth::controller::get_current_user,
        crate::modules::auth::controller::delete_user,
        crate::modules::books::controller::upload_image,
        crate::modules::books::controller::create_book,
        crate::modules::books::controller::get_books,
        crate::modules::books::controller::get_user_books,
        crate::modules::books::controller::get_all_books,
        crate::modules::books::controller::update_book,
        crate::modules::books::controller::delete_book,
        crate::modules::books::controller::delete_book_by_admin,
    ),
    components(
        schemas(
            User,
            UserRole,
            UserSummary,
            UserWithDeletedBy,
            SignUpRequest,
            LoginRequest,
            AuthResponse,
            DeleteUserResponse,
            BookResponse,
            BookAdminResponse,
            CreateBookRequest,
            UpdateBookRequest,
            BookMessageResponse,
            PaginatedBooksResponse,
            UploadResponse,
            PaginationParams,
            ErrorResponse,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Auth", description = "User registration, login and administration"),
        (name = "Books", description = "Book catalogue management")
    ),
    info(
        title = "Bookden API",
        version = "0.1.0",
        description = "A REST API built with Rust, Axum, and PostgreSQL for managing a shared book catalogue with JWT-based authentication.",
        contact(
            name = "API Support",
            email = "support@bookden.dev"
        ),
        license(
            name = "MIT"
        )
    )
)]
pub struct ApiDoc;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            )
        }
    }
}
