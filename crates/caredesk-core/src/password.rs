//! Password and refresh-token hashing.
//!
//! Passwords are hashed with bcrypt. Refresh tokens (JWTs, well past bcrypt's
//! 72-byte input limit) are digested with SHA-256 first, then bcrypt-hashed,
//! so the full token value participates in the comparison and the stored
//! value is still salted. Only hashes are ever persisted; a leaked database
//! row cannot be replayed as a session.

use anyhow::anyhow;
use bcrypt::{DEFAULT_COST, hash, verify};
use sha2::{Digest, Sha256};

use crate::errors::AppError;

pub fn hash_password(password: &str) -> Result<String, AppError> {
    hash(password, DEFAULT_COST)
        .map_err(|e| AppError::internal(anyhow!("Failed to hash password: {}", e)))
}

pub fn verify_password(password: &str, hashed: &str) -> Result<bool, AppError> {
    verify(password, hashed)
        .map_err(|e| AppError::internal(anyhow!("Failed to verify password: {}", e)))
}

fn digest_token(token: &str) -> String {
    hex::encode(Sha256::digest(token.as_bytes()))
}

pub fn hash_refresh_token(token: &str) -> Result<String, AppError> {
    hash(digest_token(token), DEFAULT_COST)
        .map_err(|e| AppError::internal(anyhow!("Failed to hash refresh token: {}", e)))
}

pub fn verify_refresh_token_hash(token: &str, hashed: &str) -> Result<bool, AppError> {
    verify(digest_token(token), hashed)
        .map_err(|e| AppError::internal(anyhow!("Failed to verify refresh token: {}", e)))
}
