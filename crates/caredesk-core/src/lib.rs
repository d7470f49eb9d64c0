//! # CareDesk Core
//!
//! Core types, errors, and utilities for the CareDesk API.
//!
//! This crate provides foundational pieces used throughout the application:
//!
//! - [`errors`]: Application error type with HTTP response conversion
//! - [`pagination`]: Page/limit query parameters and response metadata
//! - [`password`]: Password and refresh-token hashing
//! - [`mrn`]: Medical record number (MRN) generation

pub mod errors;
pub mod mrn;
pub mod pagination;
pub mod password;

// Re-export commonly used types at crate root
pub use errors::AppError;
pub use pagination::{PaginationMeta, PaginationParams};
pub use password::{hash_password, hash_refresh_token, verify_password, verify_refresh_token_hash};
