//! # CareDesk Auth
//!
//! Authentication types and JWT utilities for the CareDesk API.
//!
//! This crate provides:
//!
//! - [`claims`]: claim structures for access and refresh tokens
//! - [`jwt`]: token creation, verification, and paired issuance
//!
//! # Token Types
//!
//! - **Access token** ([`Claims`]): short-lived (minutes), signed with the
//!   access secret, presented on every API request.
//! - **Refresh token** ([`RefreshTokenClaims`]): long-lived (days), signed
//!   with a distinct refresh secret, exchanged for a new pair and rotated on
//!   every use. The server stores only a hash of the current refresh token.
//!
//! # Example
//!
//! ```ignore
//! use caredesk_auth::{issue_token_pair, verify_access_token};
//! use caredesk_config::JwtConfig;
//!
//! let config = JwtConfig::from_env();
//! let pair = issue_token_pair(user_id, "user@example.com", &config)?;
//! let claims = verify_access_token(&pair.access_token, &config)?;
//! assert_eq!(claims.sub, user_id.to_string());
//! ```

pub mod claims;
pub mod jwt;

// Re-export commonly used types at crate root
pub use claims::{Claims, RefreshTokenClaims};
pub use jwt::{
    TokenPair, create_access_token, create_refresh_token, issue_token_pair, verify_access_token,
    verify_refresh_token,
};
