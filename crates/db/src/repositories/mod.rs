//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async CRUD methods
//! that accept `&PgPool` as the first argument.

pub mod chat_repo;
pub mod client_repo;
pub mod estimate_repo;
pub mod expense_repo;
pub mod photo_repo;
pub mod price_list_repo;
pub mod project_file_repo;
pub mod project_repo;
pub mod report_repo;
pub mod session_repo;
pub mod user_repo;

pub use chat_repo::ChatRepo;
pub use client_repo::ClientRepo;
pub use estimate_repo::EstimateRepo;
pub use expense_repo::ExpenseRepo;
pub use photo_repo::PhotoRepo;
pub use price_list_repo::PriceListRepo;
pub use project_file_repo::ProjectFileRepo;
pub use project_repo::ProjectRepo;
pub use report_repo::ReportRepo;
pub use session_repo::SessionRepo;
pub use user_repo::UserRepo;
