//! Utility modules for the Bookden API.
//!
//! This module contains shared utilities used throughout the application:
//!
//! - [`errors`]: Application error types and handling
//! - [`jwt`]: JWT token creation and verification
//! - [`pagination`]: Request pagination utilities
//! - [`password`]: Password hashing and verification
//! - [`storage`]: Local filesystem storage for uploaded images

pub mod errors;
pub mod jwt;
pub mod pagination;
pub mod password;
pub mod storage;
