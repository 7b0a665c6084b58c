//! HTTP request handlers, one module per resource.

pub mod auth;
pub mod genres;
pub mod movies;
pub mod stats;
