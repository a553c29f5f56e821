//! Infrastructure layer: PostgreSQL repositories.

pub mod postgres;
