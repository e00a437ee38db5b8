//! User data models and auth DTOs.
//!
//! This module contains all data structures related to accounts and
//! sessions, including the user entity, request/response DTOs, and the
//! system role definitions.
//!
//! # Core Types
//!
//! - [`User`] - Base user entity from the database (password never included)
//! - [`UserSummary`] - Display projection embedded in other resources
//! - [`UserWithDeletedBy`] - Listing entry with the deleting actor expanded
//! - [`UserRole`] - The two system roles, stored as plain text
//!
//! # Request DTOs
//!
//! - [`SignUpRequest`] - Register a new account
//! - [`LoginRequest`] - Authenticate with email and password

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

// JWT Claims structure
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String, // user_id
    pub exp: usize,
    pub iat: usize,
}

/// A user in the system.
///
/// This struct represents the core user entity stored in the database.
/// The password hash is deliberately absent; it never leaves the service
/// layer.
#[derive(Serialize, Deserialize, FromRow, Debug, Clone, PartialEq, Eq, ToSchema)]
pub struct User {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    pub profile_img: String,
    pub role: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// System roles. The `role` column holds these as plain text and is never
/// assignable through the HTTP API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    User,
    Admin,
}

impl UserRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            UserRole::User => "user",
            UserRole::Admin => "admin",
        }
    }

    pub fn parse(role: &str) -> Option<UserRole> {
        match role {
            "user" => Some(UserRole::User),
            "admin" => Some(UserRole::Admin),
            _ => None,
        }
    }
}

/// Display projection of a user embedded in other resources.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, ToSchema)]
pub struct UserSummary {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    pub profile_img: String,
}

impl UserSummary {
    /// Assembles a summary from the optional columns of a LEFT JOIN.
    /// An absent id means no joined row.
    pub fn from_joined(
        id: Option<Uuid>,
        username: Option<String>,
        email: Option<String>,
        profile_img: Option<String>,
    ) -> Option<Self> {
        Some(Self {
            id: id?,
            username: username?,
            email: email?,
            profile_img: profile_img?,
        })
    }
}

/// Active-user listing entry with the deleting actor expanded.
/// `deleted_by` is always `None` for users that are still active.
#[derive(Debug, Serialize, ToSchema)]
pub struct UserWithDeletedBy {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    pub profile_img: String,
    pub role: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub deleted_by: Option<UserSummary>,
}

/// Sign-up payload. Fields are checked in the service rather than by serde
/// so that missing and empty values produce the same validation error.
#[derive(Debug, Deserialize, ToSchema)]
pub struct SignUpRequest {
    pub username: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
    pub profile_img: Option<String>,
}

/// Login payload.
#[derive(Debug, Deserialize, ToSchema)]
pub struct LoginRequest {
    pub email: Option<String>,
    pub password: Option<String>,
}

/// Response for sign-up and login.
#[derive(Debug, Serialize, ToSchema)]
pub struct AuthResponse {
    pub message: String,
    pub user: User,
    pub token: String,
}

/// Response for user deletion.
#[derive(Debug, Serialize, ToSchema)]
pub struct DeleteUserResponse {
    pub message: String,
    pub user: User,
}
