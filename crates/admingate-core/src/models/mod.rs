//! Data models for coded admin-console resources.
//!
//! This module contains the data structures shared by the API layer and
//! the navigation tree machinery:
//!
//! - `ResourceNode`: a coded parent/child record (menus, categories, ...)
//! - `FlatNode`: a flattened, leveled entry produced from a resolved tree
//! - `Page`: the paged response wrapper some search endpoints return

pub mod resource;

pub use resource::{sort_siblings, FlatNode, Page, ResourceNode, ROOT_CODE};
