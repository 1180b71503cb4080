//! Domain model structs and DTOs.
//!
//! Each submodule contains:
//! - A `FromRow` + `Serialize` entity struct matching the database row
//! - A `Deserialize` create DTO for inserts
//! - A `Deserialize` update DTO (all `Option` fields) for patches

pub mod chat;
pub mod client;
pub mod estimate;
pub mod expense;
pub mod photo;
pub mod price_list_item;
pub mod project;
pub mod project_file;
pub mod report;
pub mod session;
pub mod user;
