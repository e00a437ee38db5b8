use axum::Json;
use axum::extract::{Multipart, Path, Query, State};
use axum::http::StatusCode;
use tracing::instrument;
use uuid::Uuid;

use crate::middleware::auth::AuthUser;
use crate::middleware::role::ACCESS_DENIED;
use crate::modules::auth::controller::ErrorResponse;
use crate::state::AppState;
use crate::utils::errors::AppError;
use crate::utils::pagination::PaginationParams;
use crate::utils::storage::FileStorage;

use super::model::{
    BookAdminResponse, BookMessageResponse, BookResponse, CreateBookRequest,
    PaginatedBooksResponse, UpdateBookRequest, UploadResponse,
};
use super::service::BookService;

/// Upload a book cover image
#[utoipa::path(
    post,
    path = "/api/books/upload",
    request_body(content_type = "multipart/form-data"),
    responses(
        (status = 200, description = "Image uploaded successfully", body = UploadResponse),
        (status = 401, description = "Missing or invalid token", body = ErrorResponse),
        (status = 422, description = "No file part in the request", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Books"
)]
#[instrument(skip(state, _auth_user, multipart))]
pub async fn upload_image(
    State(state): State<AppState>,
    _auth_user: AuthUser,
    mut multipart: Multipart,
) -> Result<Json<UploadResponse>, AppError> {
    let mut image_url = None;

    // The first field carrying a filename is taken as the image; any
    // additional fields are ignored.
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::bad_request(anyhow::anyhow!("Invalid multipart payload: {}", e)))?
    {
        let original_name = match field.file_name() {
            Some(name) => name.to_string(),
            None => continue,
        };

        let data = field
            .bytes()
            .await
            .map_err(|e| AppError::bad_request(anyhow::anyhow!("Failed to read upload: {}", e)))?;

        let key = FileStorage::make_key(&original_name);
        let key = state.storage.save(&key, &data).await?;
        image_url = Some(state.storage.url_for(&key));
        break;
    }

    let image_url =
        image_url.ok_or_else(|| AppError::unprocessable(anyhow::anyhow!("Image is required")))?;

    Ok(Json(UploadResponse {
        message: "Image uploaded successfully".to_string(),
        image_url,
    }))
}

/// Create a new book
#[utoipa::path(
    post,
    path = "/api/books",
    request_body = CreateBookRequest,
    responses(
        (status = 201, description = "Book created successfully", body = BookMessageResponse),
        (status = 401, description = "Missing or invalid token", body = ErrorResponse),
        (status = 409, description = "A live book already holds this title", body = ErrorResponse),
        (status = 422, description = "Validation error", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Books"
)]
#[instrument(skip(state, auth_user, dto))]
pub async fn create_book(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Json(dto): Json<CreateBookRequest>,
) -> Result<(StatusCode, Json<BookMessageResponse>), AppError> {
    let book = BookService::create_book(&state.db, dto, auth_user.0.id).await?;

    Ok((
        StatusCode::CREATED,
        Json(BookMessageResponse {
            message: "Book created successfully".to_string(),
            book,
        }),
    ))
}

/// List live books, newest first, paginated
#[utoipa::path(
    get,
    path = "/api/books",
    params(PaginationParams),
    responses(
        (status = 200, description = "One page of books", body = PaginatedBooksResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    tag = "Books"
)]
#[instrument(skip(state))]
pub async fn get_books(
    State(state): State<AppState>,
    Query(params): Query<PaginationParams>,
) -> Result<Json<PaginatedBooksResponse>, AppError> {
    let page = BookService::list_books(&state.db, &params).await?;
    Ok(Json(page))
}

/// List the authenticated user's own books
#[utoipa::path(
    get,
    path = "/api/books/user",
    responses(
        (status = 200, description = "The caller's live books", body = Vec<BookResponse>),
        (status = 401, description = "Missing or invalid token", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Books"
)]
#[instrument(skip(state, auth_user))]
pub async fn get_user_books(
    State(state): State<AppState>,
    auth_user: AuthUser,
) -> Result<Json<Vec<BookResponse>>, AppError> {
    let books = BookService::list_books_by_author(&state.db, auth_user.0.id).await?;
    Ok(Json(books))
}

/// List every book including deleted ones (admin only)
#[utoipa::path(
    get,
    path = "/api/books/admin",
    responses(
        (status = 200, description = "All books with soft-delete metadata", body = Vec<BookAdminResponse>),
        (status = 401, description = "Missing or invalid token", body = ErrorResponse),
        (status = 403, description = "Admin role required", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Books"
)]
#[instrument(skip(state))]
pub async fn get_all_books(
    State(state): State<AppState>,
) -> Result<Json<Vec<BookAdminResponse>>, AppError> {
    let books = BookService::list_all_books(&state.db).await?;
    Ok(Json(books))
}

/// Update a book (admin only)
#[utoipa::path(
    put,
    path = "/api/books/{id}",
    params(("id" = String, Path, description = "Book id")),
    request_body = UpdateBookRequest,
    responses(
        (status = 200, description = "Book updated successfully", body = BookMessageResponse),
        (status = 401, description = "Missing or invalid token", body = ErrorResponse),
        (status = 403, description = "Admin role required", body = ErrorResponse),
        (status = 404, description = "Book not found or deleted", body = ErrorResponse),
        (status = 409, description = "A live book already holds this title", body = ErrorResponse),
        (status = 422, description = "Malformed book id", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Books"
)]
#[instrument(skip(state, auth_user, dto))]
pub async fn update_book(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(id): Path<String>,
    Json(dto): Json<UpdateBookRequest>,
) -> Result<Json<BookMessageResponse>, AppError> {
    if !auth_user.is_admin() {
        return Err(AppError::forbidden(anyhow::anyhow!(ACCESS_DENIED)));
    }

    // Malformed ids are a validation failure here, unlike deletion below.
    let book_id = Uuid::parse_str(&id)
        .map_err(|_| AppError::unprocessable(anyhow::anyhow!("Invalid book id")))?;

    let book = BookService::update_book(&state.db, book_id, dto).await?;

    Ok(Json(BookMessageResponse {
        message: "Book updated successfully".to_string(),
        book,
    }))
}

/// Delete a book as its owner or as an admin
#[utoipa::path(
    delete,
    path = "/api/books/{id}",
    params(("id" = String, Path, description = "Book id")),
    responses(
        (status = 200, description = "Book deleted successfully", body = BookMessageResponse),
        (status = 400, description = "Malformed book id", body = ErrorResponse),
        (status = 401, description = "Missing or invalid token", body = ErrorResponse),
        (status = 403, description = "Caller is neither the owner nor an admin", body = ErrorResponse),
        (status = 404, description = "Book not found or already deleted", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Books"
)]
#[instrument(skip(state, auth_user))]
pub async fn delete_book(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(id): Path<String>,
) -> Result<Json<BookMessageResponse>, AppError> {
    let book_id = Uuid::parse_str(&id)
        .map_err(|_| AppError::bad_request(anyhow::anyhow!("Invalid book id")))?;

    let book = BookService::delete_book(&state.db, &state.storage, book_id, &auth_user.0).await?;

    Ok(Json(BookMessageResponse {
        message: "Book deleted successfully".to_string(),
        book,
    }))
}

/// Delete any book (admin only)
#[utoipa::path(
    delete,
    path = "/api/books/admin/{id}",
    params(("id" = String, Path, description = "Book id")),
    responses(
        (status = 200, description = "Book deleted successfully", body = BookMessageResponse),
        (status = 400, description = "Malformed book id", body = ErrorResponse),
        (status = 401, description = "Missing or invalid token", body = ErrorResponse),
        (status = 403, description = "Admin role required", body = ErrorResponse),
        (status = 404, description = "Book not found or already deleted", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Books"
)]
#[instrument(skip(state, auth_user))]
pub async fn delete_book_by_admin(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(id): Path<String>,
) -> Result<Json<BookMessageResponse>, AppError> {
    let book_id = Uuid::parse_str(&id)
        .map_err(|_| AppError::bad_request(anyhow::anyhow!("Invalid book id")))?;

    let book =
        BookService::delete_book_by_admin(&state.db, &state.storage, book_id, auth_user.0.id)
            .await?;

    Ok(Json(BookMessageResponse {
        message: "Book deleted successfully".to_string(),
        book,
    }))
}
