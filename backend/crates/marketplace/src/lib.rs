//! Marketplace Backend Module
//!
//! The four content domains of the campus marketplace: textbooks with a
//! rental lifecycle, peer mentor profiles with a running-mean rating,
//! past exam papers (PYQs) with a download counter, and blog posts with
//! likes, comments and a view counter.
//!
//! Clean Architecture structure:
//! - `domain/` - Entities, state transitions, repository traits
//! - `application/` - One service per entity
//! - `infra/` - PostgreSQL implementation with explicit relation joins
//! - `presentation/` - DTOs, multipart handling, handlers, routers
//!
//! Every mutation runs the same guard: the resource must exist (404
//! otherwise), and the actor must be its owner or an admin (401
//! otherwise).

pub mod application;
pub mod domain;
pub mod error;
pub mod infra;
pub mod presentation;

#[cfg(test)]
mod tests;

// Re-exports for convenience
pub use error::{MarketError, MarketResult};
pub use infra::postgres::PgMarketRepository;
pub use presentation::router::{
    RouterPair, blogs_router, books_router, mentors_router, pyqs_router,
};
