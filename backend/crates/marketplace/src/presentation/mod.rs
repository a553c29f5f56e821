//! Presentation layer: DTOs, body collection, handlers, routers.

pub mod dto;
pub mod extract;
pub mod handlers;
pub mod router;
