//! Platform Crate - Technical Infrastructure
//!
//! This crate provides shared technical foundations:
//! - Document store adapter (Postgres JSONB and in-memory backends)
//! - Cryptographic utilities (secure random tokens, SHA-256)
//! - Password hashing (Argon2id)
//! - Cookie management

pub mod cookie;
pub mod crypto;
pub mod docstore;
pub mod password;
