//! Application layer: auth use cases.

pub mod authenticate;
pub mod config;
pub mod login;
pub mod profile;
pub mod register;
