//! Presentation layer: DTOs, handlers, middleware, router.

pub mod dto;
pub mod handlers;
pub mod middleware;
pub mod router;
