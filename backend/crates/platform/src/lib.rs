//! Platform - shared infrastructure utilities
//!
//! Security and storage plumbing used by the domain crates:
//! - `password`: Argon2id hashing with zeroization and pepper support
//! - `token`: opaque bearer-token generation and digesting
//! - `upload`: validated file storage for multipart uploads

pub mod password;
pub mod token;
pub mod upload;
