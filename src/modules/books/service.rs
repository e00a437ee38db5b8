use chrono::{DateTime, Utc};
use sqlx::PgPool;
use tracing::{instrument, warn};
use uuid::Uuid;

use crate::modules::auth::model::{User, UserRole, UserSummary};
use crate::utils::errors::AppError;
use crate::utils::pagination::{PaginationParams, total_pages};
use crate::utils::storage::FileStorage;

use super::model::{
    BookAdminResponse, BookResponse, CreateBookRequest, PaginatedBooksResponse, UpdateBookRequest,
};

/// Treats a field the way the API contract treats it: absent and empty
/// string are both "not provided".
fn required(field: &Option<String>) -> Option<&str> {
    field.as_deref().filter(|value| !value.is_empty())
}

#[derive(sqlx::FromRow)]
struct BookRow {
    id: Uuid,
    title: String,
    caption: String,
    rating: f64,
    image_url: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    author_id: Option<Uuid>,
    author_username: Option<String>,
    author_email: Option<String>,
    author_profile_img: Option<String>,
}

impl From<BookRow> for BookResponse {
    fn from(row: BookRow) -> Self {
        Self {
            id: row.id,
            title: row.title,
            caption: row.caption,
            rating: row.rating,
            image_url: row.image_url,
            author: UserSummary::from_joined(
                row.author_id,
                row.author_username,
                row.author_email,
                row.author_profile_img,
            ),
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

#[derive(sqlx::FromRow)]
struct BookAdminRow {
    id: Uuid,
    title: String,
    caption: String,
    rating: f64,
    image_url: String,
    is_deleted: bool,
    deleted_at: Option<DateTime<Utc>>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    author_id: Option<Uuid>,
    author_username: Option<String>,
    author_email: Option<String>,
    author_profile_img: Option<String>,
    deleted_by_id: Option<Uuid>,
    deleted_by_username: Option<String>,
    deleted_by_email: Option<String>,
    deleted_by_profile_img: Option<String>,
}

impl From<BookAdminRow> for BookAdminResponse {
    fn from(row: BookAdminRow) -> Self {
        Self {
            id: row.id,
            title: row.title,
            caption: row.caption,
            rating: row.rating,
            image_url: row.image_url,
            author: UserSummary::from_joined(
                row.author_id,
                row.author_username,
                row.author_email,
                row.author_profile_img,
            ),
            is_deleted: row.is_deleted,
            deleted_at: row.deleted_at,
            deleted_by: UserSummary::from_joined(
                row.deleted_by_id,
                row.deleted_by_username,
                row.deleted_by_email,
                row.deleted_by_profile_img,
            ),
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

pub struct BookService;

impl BookService {
    #[instrument(skip(db, dto))]
    pub async fn create_book(
        db: &PgPool,
        dto: CreateBookRequest,
        author_id: Uuid,
    ) -> Result<BookResponse, AppError> {
        let (title, caption, rating, image_url) = match (
            required(&dto.title),
            required(&dto.caption),
            dto.rating,
            required(&dto.image_url),
        ) {
            (Some(title), Some(caption), Some(rating), Some(image_url)) => {
                (title, caption, rating, image_url)
            }
            _ => {
                return Err(AppError::unprocessable(anyhow::anyhow!(
                    "All fields are required"
                )));
            }
        };

        if !(1.0..=5.0).contains(&rating) {
            return Err(AppError::unprocessable(anyhow::anyhow!(
                "Rating must be between 1 and 5"
            )));
        }

        // Only live books hold a title; deleted ones release it.
        let title_taken = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS (SELECT 1 FROM books WHERE title = $1 AND is_deleted = FALSE)",
        )
        .bind(title)
        .fetch_one(db)
        .await?;
        if title_taken {
            return Err(AppError::conflict(anyhow::anyhow!("Book already exists")));
        }

        let book_id = sqlx::query_scalar::<_, Uuid>(
            "INSERT INTO books (title, caption, rating, image_url, author_id)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING id",
        )
        .bind(title)
        .bind(caption)
        .bind(rating)
        .bind(image_url)
        .bind(author_id)
        .fetch_one(db)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(db_err) = &e {
                if db_err.is_unique_violation() {
                    return AppError::conflict(anyhow::anyhow!("Book already exists"));
                }
            }
            AppError::database(anyhow::Error::from(e))
        })?;

        Self::get_book(db, book_id).await
    }

    /// Fetches a live book with its author joined in.
    async fn get_book(db: &PgPool, id: Uuid) -> Result<BookResponse, AppError> {
        let row = sqlx::query_as::<_, BookRow>(
            "SELECT b.id, b.title, b.caption, b.rating, b.image_url,
                    b.created_at, b.updated_at,
                    u.id AS author_id, u.username AS author_username,
                    u.email AS author_email, u.profile_img AS author_profile_img
             FROM books b
             LEFT JOIN users u ON u.id = b.author_id
             WHERE b.id = $1 AND b.is_deleted = FALSE",
        )
        .bind(id)
        .fetch_optional(db)
        .await?
        .ok_or_else(|| AppError::not_found(anyhow::anyhow!("Book not found")))?;

        Ok(row.into())
    }

    #[instrument(skip(db))]
    pub async fn list_books(
        db: &PgPool,
        params: &PaginationParams,
    ) -> Result<PaginatedBooksResponse, AppError> {
        let page = params.page();
        let limit = params.limit();
        let offset = params.offset();

        let total_count =
            sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM books WHERE is_deleted = FALSE")
                .fetch_one(db)
                .await?;

        let rows = sqlx::query_as::<_, BookRow>(
            "SELECT b.id, b.title, b.caption, b.rating, b.image_url,
                    b.created_at, b.updated_at,
                    u.id AS author_id, u.username AS author_username,
                    u.email AS author_email, u.profile_img AS author_profile_img
             FROM books b
             LEFT JOIN users u ON u.id = b.author_id
             WHERE b.is_deleted = FALSE
             ORDER BY b.created_at DESC
             LIMIT $1 OFFSET $2",
        )
        .bind(limit)
        .bind(offset)
        .fetch_all(db)
        .await?;

        Ok(PaginatedBooksResponse {
            books: rows.into_iter().map(Into::into).collect(),
            total_count,
            total_pages: total_pages(total_count, limit),
            current_page: page,
        })
    }

    #[instrument(skip(db))]
    pub async fn list_books_by_author(
        db: &PgPool,
        author_id: Uuid,
    ) -> Result<Vec<BookResponse>, AppError> {
        let rows = sqlx::query_as::<_, BookRow>(
            "SELECT b.id, b.title, b.caption, b.rating, b.image_url,
                    b.created_at, b.updated_at,
                    u.id AS author_id, u.username AS author_username,
                    u.email AS author_email, u.profile_img AS author_profile_img
             FROM books b
             LEFT JOIN users u ON u.id = b.author_id
             WHERE b.author_id = $1 AND b.is_deleted = FALSE
             ORDER BY b.created_at DESC",
        )
        .bind(author_id)
        .fetch_all(db)
        .await?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    /// Lists every book, deleted ones included, with soft-delete metadata.
    #[instrument(skip(db))]
    pub async fn list_all_books(db: &PgPool) -> Result<Vec<BookAdminResponse>, AppError> {
        let rows = sqlx::query_as::<_, BookAdminRow>(
            "SELECT b.id, b.title, b.caption, b.rating, b.image_url,
                    b.is_deleted, b.deleted_at, b.created_at, b.updated_at,
                    u.id AS author_id, u.username AS author_username,
                    u.email AS author_email, u.profile_img AS author_profile_img,
                    d.id AS deleted_by_id, d.username AS deleted_by_username,
                    d.email AS deleted_by_email, d.profile_img AS deleted_by_profile_img
             FROM books b
             LEFT JOIN users u ON u.id = b.author_id
             LEFT JOIN users d ON d.id = b.deleted_by
             ORDER BY b.created_at DESC",
        )
        .fetch_all(db)
        .await?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    #[instrument(skip(db, dto))]
    pub async fn update_book(
        db: &PgPool,
        id: Uuid,
        dto: UpdateBookRequest,
    ) -> Result<BookResponse, AppError> {
        let existing = Self::get_book(db, id).await?;

        let title = dto.title.unwrap_or(existing.title);
        let caption = dto.caption.unwrap_or(existing.caption);
        let rating = dto.rating.unwrap_or(existing.rating);
        let image_url = dto.image_url.unwrap_or(existing.image_url);

        sqlx::query(
            "UPDATE books
             SET title = $1, caption = $2, rating = $3, image_url = $4, updated_at = NOW()
             WHERE id = $5 AND is_deleted = FALSE",
        )
        .bind(&title)
        .bind(&caption)
        .bind(rating)
        .bind(&image_url)
        .bind(id)
        .execute(db)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(db_err) = &e {
                if db_err.is_unique_violation() {
                    return AppError::conflict(anyhow::anyhow!("Book already exists"));
                }
            }
            AppError::database(anyhow::Error::from(e))
        })?;

        Self::get_book(db, id).await
    }

    /// Soft-deletes a book on behalf of its owner or an admin.
    #[instrument(skip(db, storage, acting_user))]
    pub async fn delete_book(
        db: &PgPool,
        storage: &FileStorage,
        id: Uuid,
        acting_user: &User,
    ) -> Result<BookResponse, AppError> {
        let book = Self::get_book(db, id).await?;

        let is_owner = book
            .author
            .as_ref()
            .map(|author| author.id == acting_user.id)
            .unwrap_or(false);
        let is_admin = UserRole::parse(&acting_user.role) == Some(UserRole::Admin);
        if !is_owner && !is_admin {
            return Err(AppError::forbidden(anyhow::anyhow!(
                "You are not authorized to delete this book"
            )));
        }

        Self::soft_delete(db, storage, book, acting_user.id).await
    }

    /// Soft-deletes any book; the admin role layer has already gated access.
    #[instrument(skip(db, storage))]
    pub async fn delete_book_by_admin(
        db: &PgPool,
        storage: &FileStorage,
        id: Uuid,
        acting_id: Uuid,
    ) -> Result<BookResponse, AppError> {
        let book = Self::get_book(db, id).await?;
        Self::soft_delete(db, storage, book, acting_id).await
    }

    async fn soft_delete(
        db: &PgPool,
        storage: &FileStorage,
        book: BookResponse,
        acting_id: Uuid,
    ) -> Result<BookResponse, AppError> {
        let result = sqlx::query(
            "UPDATE books
             SET is_deleted = TRUE, deleted_at = NOW(), deleted_by = $2, updated_at = NOW()
             WHERE id = $1 AND is_deleted = FALSE",
        )
        .bind(book.id)
        .bind(acting_id)
        .execute(db)
        .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found(anyhow::anyhow!("Book not found")));
        }

        // Removing the stored image is best effort; the record stays deleted
        // even if the file cannot be removed.
        if let Some(key) = FileStorage::key_from_url(&book.image_url) {
            if let Err(e) = storage.delete(key).await {
                warn!(book_id = %book.id, error = ?e.error, "Failed to remove book image");
            }
        }

        Ok(book)
    }
}
