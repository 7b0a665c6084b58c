//! Shared domain types, the error taxonomy, and the pure dataset
//! normalization logic used by the bulk loader.

pub mod dataset;
pub mod error;
pub mod types;
