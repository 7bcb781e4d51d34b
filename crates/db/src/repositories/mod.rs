//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async methods. Reads take
//! `&PgPool`; writes that must share a transaction with other writes take any
//! `PgExecutor`, so callers pass either the pool or `&mut *tx`.

pub mod activity_repo;
pub mod article_repo;
pub mod category_repo;
pub mod feedback_repo;
pub mod queue_repo;
pub mod review_repo;
pub mod user_repo;

pub use activity_repo::ActivityRepo;
pub use article_repo::ArticleRepo;
pub use category_repo::CategoryRepo;
pub use feedback_repo::FeedbackRepo;
pub use queue_repo::QueueRepo;
pub use review_repo::ReviewRepo;
pub use user_repo::UserRepo;
