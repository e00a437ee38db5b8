use chrono::{DateTime, Utc};
use sqlx::PgPool;
use tracing::instrument;
use uuid::Uuid;

use crate::config::jwt::JwtConfig;
use crate::utils::errors::AppError;
use crate::utils::jwt::create_access_token;
use crate::utils::password::{hash_password, verify_password};

use super::model::{
    AuthResponse, LoginRequest, SignUpRequest, User, UserSummary, UserWithDeletedBy,
};

/// Treats a field the way the API contract treats it: absent and empty
/// string are both "not provided".
fn required(field: &Option<String>) -> Option<&str> {
    field.as_deref().filter(|value| !value.is_empty())
}

fn default_profile_img(username: &str) -> String {
    format!(
        "https://api.dicebear.com/9.x/big-ears-neutral/svg?seed={}",
        username
    )
}

pub struct AuthService;

impl AuthService {
    #[instrument(skip(db, dto, jwt_config))]
    pub async fn sign_up(
        db: &PgPool,
        dto: SignUpRequest,
        jwt_config: &JwtConfig,
    ) -> Result<AuthResponse, AppError> {
        let (username, email, password) = match (
            required(&dto.username),
            required(&dto.email),
            required(&dto.password),
        ) {
            (Some(username), Some(email), Some(password)) => (username, email, password),
            _ => {
                return Err(AppError::unprocessable(anyhow::anyhow!(
                    "All fields are required"
                )));
            }
        };

        if password.chars().count() < 6 {
            return Err(AppError::unprocessable(anyhow::anyhow!(
                "Password must be at least 6 characters"
            )));
        }

        if username.chars().count() < 3 || username.trim().is_empty() {
            return Err(AppError::unprocessable(anyhow::anyhow!(
                "Name must be at least 3 characters"
            )));
        }

        // Deliberately shallow check; the address only has to contain an '@'.
        if !email.contains('@') {
            return Err(AppError::unprocessable(anyhow::anyhow!(
                "Email must be valid"
            )));
        }

        // Soft-deleted accounts keep their email and username reserved, so
        // both lookups ignore the deletion flag.
        let email_taken =
            sqlx::query_scalar::<_, bool>("SELECT EXISTS (SELECT 1 FROM users WHERE email = $1)")
                .bind(email)
                .fetch_one(db)
                .await?;
        if email_taken {
            return Err(AppError::conflict(anyhow::anyhow!("Email already exists")));
        }

        let username_taken = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS (SELECT 1 FROM users WHERE username = $1)",
        )
        .bind(username)
        .fetch_one(db)
        .await?;
        if username_taken {
            return Err(AppError::conflict(anyhow::anyhow!(
                "Username already exists"
            )));
        }

        let hashed_password = hash_password(password)?;
        let profile_img = match required(&dto.profile_img) {
            Some(url) => url.to_string(),
            None => default_profile_img(username),
        };

        let user = sqlx::query_as::<_, User>(
            "INSERT INTO users (username, email, password, profile_img)
             VALUES ($1, $2, $3, $4)
             RETURNING id, username, email, profile_img, role, created_at, updated_at",
        )
        .bind(username)
        .bind(email)
        .bind(&hashed_password)
        .bind(&profile_img)
        .fetch_one(db)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(db_err) = &e {
                if db_err.is_unique_violation() {
                    let message = if db_err.constraint() == Some("users_email_key") {
                        "Email already exists"
                    } else {
                        "Username already exists"
                    };
                    return AppError::conflict(anyhow::anyhow!(message));
                }
            }
            AppError::database(anyhow::Error::from(e))
        })?;

        let token = create_access_token(user.id, jwt_config)?;

        Ok(AuthResponse {
            message: "User created successfully".to_string(),
            user,
            token,
        })
    }

    #[instrument(skip(db, dto, jwt_config))]
    pub async fn login(
        db: &PgPool,
        dto: LoginRequest,
        jwt_config: &JwtConfig,
    ) -> Result<AuthResponse, AppError> {
        let (email, password) = match (required(&dto.email), required(&dto.password)) {
            (Some(email), Some(password)) => (email, password),
            _ => {
                return Err(AppError::unprocessable(anyhow::anyhow!(
                    "All fields are required"
                )));
            }
        };

        #[derive(sqlx::FromRow)]
        struct UserWithPassword {
            id: Uuid,
            username: String,
            email: String,
            profile_img: String,
            role: String,
            password: String,
            created_at: DateTime<Utc>,
            updated_at: DateTime<Utc>,
        }

        let user_with_password = sqlx::query_as::<_, UserWithPassword>(
            "SELECT id, username, email, profile_img, role, password, created_at, updated_at
             FROM users
             WHERE email = $1 AND is_deleted = FALSE",
        )
        .bind(email)
        .fetch_optional(db)
        .await?
        .ok_or_else(|| AppError::not_found(anyhow::anyhow!("User not found")))?;

        let is_valid = verify_password(password, &user_with_password.password)?;

        if !is_valid {
            return Err(AppError::unauthorized(anyhow::anyhow!(
                "Invalid credentials"
            )));
        }

        let token = create_access_token(user_with_password.id, jwt_config)?;

        let user = User {
            id: user_with_password.id,
            username: user_with_password.username,
            email: user_with_password.email,
            profile_img: user_with_password.profile_img,
            role: user_with_password.role,
            created_at: user_with_password.created_at,
            updated_at: user_with_password.updated_at,
        };

        Ok(AuthResponse {
            message: "User logged in successfully".to_string(),
            user,
            token,
        })
    }

    #[instrument(skip(db))]
    pub async fn list_users(db: &PgPool) -> Result<Vec<UserWithDeletedBy>, AppError> {
        #[derive(sqlx::FromRow)]
        struct UserListRow {
            id: Uuid,
            username: String,
            email: String,
            profile_img: String,
            role: String,
            created_at: DateTime<Utc>,
            updated_at: DateTime<Utc>,
            deleted_by_id: Option<Uuid>,
            deleted_by_username: Option<String>,
            deleted_by_email: Option<String>,
            deleted_by_profile_img: Option<String>,
        }

        let rows = sqlx::query_as::<_, UserListRow>(
            "SELECT u.id, u.username, u.email, u.profile_img, u.role,
                    u.created_at, u.updated_at,
                    d.id AS deleted_by_id, d.username AS deleted_by_username,
                    d.email AS deleted_by_email, d.profile_img AS deleted_by_profile_img
             FROM users u
             LEFT JOIN users d ON d.id = u.deleted_by
             WHERE u.is_deleted = FALSE
             ORDER BY u.created_at DESC",
        )
        .fetch_all(db)
        .await?;

        Ok(rows
            .into_iter()
            .map(|row| UserWithDeletedBy {
                id: row.id,
                username: row.username,
                email: row.email,
                profile_img: row.profile_img,
                role: row.role,
                created_at: row.created_at,
                updated_at: row.updated_at,
                deleted_by: UserSummary::from_joined(
                    row.deleted_by_id,
                    row.deleted_by_username,
                    row.deleted_by_email,
                    row.deleted_by_profile_img,
                ),
            })
            .collect())
    }

    /// Soft-deletes a user and detaches their books so the books stay
    /// publicly listed with an absent author.
    #[instrument(skip(db))]
    pub async fn delete_user(
        db: &PgPool,
        target_id: Uuid,
        acting_id: Uuid,
    ) -> Result<User, AppError> {
        let mut tx = db.begin().await?;

        let user = sqlx::query_as::<_, User>(
            "UPDATE users
             SET is_deleted = TRUE, deleted_at = NOW(), deleted_by = $2, updated_at = NOW()
             WHERE id = $1 AND is_deleted = FALSE
             RETURNING id, username, email, profile_img, role, created_at, updated_at",
        )
        .bind(target_id)
        .bind(acting_id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or_else(|| AppError::not_found(anyhow::anyhow!("User not found")))?;

        sqlx::query("UPDATE books SET author_id = NULL, updated_at = NOW() WHERE author_id = $1")
            .bind(target_id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        Ok(user)
    }
}
