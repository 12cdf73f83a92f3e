//! REST API server: routes, DTOs, cache backend selection, and OpenAPI documentation.

pub mod cache;
pub mod config;
pub mod dto;
pub mod error;
pub mod openapi;
pub mod routes;
pub mod state;
