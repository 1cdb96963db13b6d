//! Redirect chain recovery.
//!
//! Builds a URL graph over the redirects observed in a frozen
//! collection, extracts non-overlapping chains with a prioritized
//! depth-first traversal, and repairs the landing-page chain when the
//! observation set was missing intermediate hops.

mod graph;
mod registry;

pub use registry::{RedirectChain, RedirectRegistry};
