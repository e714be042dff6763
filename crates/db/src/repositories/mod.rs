//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async CRUD methods
//! that accept `&PgPool` as the first argument.

pub mod admin_repo;
pub mod article_repo;
pub mod work_repo;

pub use admin_repo::AdminRepo;
pub use article_repo::ArticleRepo;
pub use work_repo::WorkRepo;
