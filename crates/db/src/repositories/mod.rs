//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async CRUD methods
//! that accept `&PgPool` as the first argument.

pub mod dataset_repo;
pub mod genre_repo;
pub mod movie_repo;
pub mod session_repo;
pub mod stats_repo;
pub mod user_repo;

pub use dataset_repo::DatasetRepo;
pub use genre_repo::GenreRepo;
pub use movie_repo::MovieRepo;
pub use session_repo::SessionRepo;
pub use stats_repo::StatsRepo;
pub use user_repo::UserRepo;
