//! Resource acceptance policy.

use super::Resource;

/// Policy deciding which observed resources enter a collection.
///
/// The embedding tool supplies its own filter (ad blockers, tracking
/// strippers, scheme restrictions); analysis code never sees a
/// resource the filter rejected.
pub trait ResourceFilter {
    /// Check whether the resource should be kept.
    fn is_accepted(&self, resource: &Resource) -> bool;
}

/// Default policy: accept everything.
#[derive(Debug, Default, Clone, Copy)]
pub struct AllowAllFilter;

impl ResourceFilter for AllowAllFilter {
    fn is_accepted(&self, _resource: &Resource) -> bool {
        true
    }
}
