//! Middleware modules for request processing.
//!
//! This module contains middleware and extractors for handling cross-cutting
//! concerns like authentication and role checking.
//!
//! # Modules
//!
//! - [`auth`]: Authentication extractor that resolves the bearer token to a user
//! - [`role`]: Role checking middleware for admin-only routes
//!
//! # Authentication Flow
//!
//! 1. Client sends request with `Authorization: Bearer <token>` header
//! 2. `AuthUser` extractor validates the JWT and loads the active user
//! 3. Role middleware (where applied) checks the user's role
//! 4. Handler executes if all checks pass

pub mod auth;
pub mod role;
