//! Trait definitions for OpenProject operations.
//!
//! Each resource type implements the traits its endpoints support. The
//! implementations route through the generic dispatcher with their own
//! endpoint and resource kind.

mod create;
mod delete;
mod get;
mod list;

pub use create::Create;
pub use delete::Delete;
pub use get::Get;
pub use list::{List, MAX_PAGES};
