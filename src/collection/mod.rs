//! Observed-resource storage.
//!
//! A page load is analyzed as a collection of observed HTTP resources.
//! Resources are appended while the collection is unfrozen; freezing
//! switches it one-way into an immutable, indexed state and builds the
//! redirect registry over it.

mod filter;
mod kind;
mod resource;
mod store;

pub use filter::{AllowAllFilter, ResourceFilter};
pub use kind::ResourceType;
pub use resource::Resource;
pub use store::{ResourceCollection, ResourceId};
