//! Shared response envelope types for API handlers.
//!
//! List endpoints use a `{ "count": N, "results": [...] }` envelope: the
//! total number of matching rows plus the requested page. Single-record
//! endpoints return the record bare.

use serde::Serialize;

/// Standard paginated list envelope.
///
/// `count` is the total matching-row count, not the page length.
#[derive(Debug, Serialize)]
pub struct Page<T: Serialize> {
    pub count: i64,
    pub results: Vec<T>,
}
