//! Domain model structs and DTOs.
//!
//! Each submodule contains:
//! - A `FromRow` + `Serialize` entity struct matching the database row
//! - `Deserialize` request DTOs for the write endpoints

pub mod genre;
pub mod movie;
pub mod session;
pub mod user;
