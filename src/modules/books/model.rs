//! Book data models and DTOs.
//!
//! # Core Types
//!
//! - [`BookResponse`] - A live book with its author expanded
//! - [`BookAdminResponse`] - Administrative view including soft-delete state
//!
//! # Request DTOs
//!
//! - [`CreateBookRequest`] - Create a new book
//! - [`UpdateBookRequest`] - Partial update; only supplied fields change

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::modules::auth::model::UserSummary;

/// A book with its author expanded to a display projection. The author is
/// absent when the account that created the book has been deleted.
#[derive(Debug, Serialize, ToSchema)]
pub struct BookResponse {
    pub id: Uuid,
    pub title: String,
    pub caption: String,
    pub rating: f64,
    pub image_url: String,
    pub author: Option<UserSummary>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Administrative view of a book, including soft-deleted entries and the
/// actor who deleted them.
#[derive(Debug, Serialize, ToSchema)]
pub struct BookAdminResponse {
    pub id: Uuid,
    pub title: String,
    pub caption: String,
    pub rating: f64,
    pub image_url: String,
    pub author: Option<UserSummary>,
    pub is_deleted: bool,
    pub deleted_at: Option<DateTime<Utc>>,
    pub deleted_by: Option<UserSummary>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Create payload. Fields are checked in the service rather than by serde
/// so that missing and empty values produce the same validation error.
#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateBookRequest {
    pub title: Option<String>,
    pub caption: Option<String>,
    pub rating: Option<f64>,
    pub image_url: Option<String>,
}

/// Partial update payload.
#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateBookRequest {
    pub title: Option<String>,
    pub caption: Option<String>,
    pub rating: Option<f64>,
    pub image_url: Option<String>,
}

/// Response wrapping a single book with an action message.
#[derive(Debug, Serialize, ToSchema)]
pub struct BookMessageResponse {
    pub message: String,
    pub book: BookResponse,
}

/// One page of the public book listing.
#[derive(Debug, Serialize, ToSchema)]
pub struct PaginatedBooksResponse {
    pub books: Vec<BookResponse>,
    pub total_count: i64,
    pub total_pages: i64,
    pub current_page: i64,
}

/// Response for image uploads.
#[derive(Debug, Serialize, ToSchema)]
pub struct UploadResponse {
    pub message: String,
    pub image_url: String,
}
