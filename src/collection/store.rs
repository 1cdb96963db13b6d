//! Ordered, freezable storage for observed resources.

use rustc_hash::FxHashMap;

use crate::core::url as uri;
use crate::redirect::RedirectRegistry;
use crate::{debug, log};

use super::{AllowAllFilter, Resource, ResourceFilter};

/// Stable identity of a resource within one collection.
///
/// Chains and indices refer to resources by id, so nothing dangles no
/// matter how the registry reshuffles its chain storage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ResourceId(pub(crate) usize);

impl ResourceId {
    /// Position of the resource in insertion order.
    pub fn index(self) -> usize {
        self.0
    }
}

/// Append-only collection of observed resources.
///
/// Mutable while unfrozen; [`freeze`](Self::freeze) switches it
/// one-way into an immutable, indexed state suitable for analysis and
/// builds the owned [`RedirectRegistry`]. Mutations after freeze are
/// programming errors: they log loudly and change nothing.
pub struct ResourceCollection {
    filter: Box<dyn ResourceFilter>,
    resources: Vec<Resource>,
    url_index: FxHashMap<String, ResourceId>,
    host_index: FxHashMap<String, Vec<ResourceId>>,
    frozen: bool,
    request_order: Vec<ResourceId>,
    primary_url: Option<String>,
    registry: RedirectRegistry,
}

impl Default for ResourceCollection {
    fn default() -> Self {
        Self::new()
    }
}

impl ResourceCollection {
    /// Create a collection that accepts every valid resource.
    pub fn new() -> Self {
        Self::with_filter(Box::new(AllowAllFilter))
    }

    /// Create a collection with a custom acceptance policy.
    pub fn with_filter(filter: Box<dyn ResourceFilter>) -> Self {
        Self {
            filter,
            resources: Vec::new(),
            url_index: FxHashMap::default(),
            host_index: FxHashMap::default(),
            frozen: false,
            request_order: Vec::new(),
            primary_url: None,
            registry: RedirectRegistry::new(),
        }
    }

    /// Add a resource, taking ownership. Returns false (dropping the
    /// resource) when the collection is frozen or the resource is
    /// invalid: empty URL, duplicate canonical URL, non-positive
    /// status, or filter rejection.
    pub fn add(&mut self, resource: Resource) -> bool {
        if self.frozen {
            log!("error"; "can't add {} to a frozen collection", resource.request_url());
            return false;
        }
        if !self.is_valid(&resource) {
            return false;
        }
        let key = uri::canonical_or_raw(resource.request_url());
        let id = ResourceId(self.resources.len());
        self.url_index.insert(key, id);
        if !resource.host().is_empty() {
            self.host_index
                .entry(resource.host().to_string())
                .or_default()
                .push(id);
        }
        self.resources.push(resource);
        true
    }

    fn is_valid(&self, resource: &Resource) -> bool {
        if resource.request_url().is_empty() {
            log!("warning"; "refusing resource with empty URL");
            return false;
        }
        if self.id_by_url(resource.request_url()).is_some() {
            debug!("store"; "ignoring duplicate add for {}", resource.request_url());
            return false;
        }
        if resource.status_code() <= 0 {
            log!(
                "warning";
                "refusing resource with status {}: {}",
                resource.status_code(),
                resource.request_url()
            );
            return false;
        }
        self.filter.is_accepted(resource)
    }

    /// Record the landing-page URL. Fails when frozen or when no
    /// resource with that canonical URL exists.
    pub fn set_primary_url(&mut self, url: &str) -> bool {
        if self.frozen {
            log!("error"; "can't set primary resource {url} on a frozen collection");
            return false;
        }
        let canonical = uri::canonical_or_raw(url);
        if !self.url_index.contains_key(&canonical) {
            debug!("store"; "no resource for primary URL {canonical}");
            return false;
        }
        self.primary_url = Some(canonical);
        true
    }

    /// Freeze the collection: compute the request-order view (only
    /// when every resource carries a start timestamp, with a stable
    /// sort) and build the redirect registry. One-way and single-shot.
    pub fn freeze(&mut self) {
        if self.frozen {
            log!("error"; "collection is already frozen");
            return;
        }
        if self
            .resources
            .iter()
            .all(Resource::has_request_start_time)
        {
            let mut order: Vec<ResourceId> = (0..self.resources.len()).map(ResourceId).collect();
            order.sort_by(|&a, &b| {
                let (lhs, rhs) = (&self.resources[a.0], &self.resources[b.0]);
                if lhs.is_request_start_time_less_than(rhs) {
                    std::cmp::Ordering::Less
                } else if rhs.is_request_start_time_less_than(lhs) {
                    std::cmp::Ordering::Greater
                } else {
                    std::cmp::Ordering::Equal
                }
            });
            self.request_order = order;
        }
        self.frozen = true;
        let mut registry = RedirectRegistry::new();
        registry.init(self);
        self.registry = registry;
    }

    pub fn is_frozen(&self) -> bool {
        self.frozen
    }

    pub fn len(&self) -> usize {
        self.resources.len()
    }

    pub fn is_empty(&self) -> bool {
        self.resources.is_empty()
    }

    /// Look up a resource by id.
    pub fn get(&self, id: ResourceId) -> Option<&Resource> {
        self.resources.get(id.0)
    }

    /// Mutable access to a resource, only while unfrozen.
    pub fn get_mut(&mut self, id: ResourceId) -> Option<&mut Resource> {
        if self.frozen {
            log!("error"; "mutable resource access after freeze");
            return None;
        }
        self.resources.get_mut(id.0)
    }

    /// Mutable lookup by URL, only while unfrozen.
    pub fn by_url_mut(&mut self, url: &str) -> Option<&mut Resource> {
        let id = self.id_by_url(url)?;
        self.get_mut(id)
    }

    /// Iterate resources in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (ResourceId, &Resource)> {
        self.resources
            .iter()
            .enumerate()
            .map(|(index, resource)| (ResourceId(index), resource))
    }

    /// Find the id of the resource with the given URL. The query is
    /// canonicalized; when canonicalization fails the raw string is
    /// the key, so a malformed stored URL and a malformed query still
    /// match.
    pub fn id_by_url(&self, url: &str) -> Option<ResourceId> {
        self.url_index.get(&uri::canonical_or_raw(url)).copied()
    }

    /// Find the resource with the given URL.
    pub fn by_url(&self, url: &str) -> Option<&Resource> {
        self.id_by_url(url).and_then(|id| self.get(id))
    }

    /// Resources stable-sorted by request start time. `None` before
    /// freeze and when any resource lacked a start timestamp.
    pub fn request_order(&self) -> Option<&[ResourceId]> {
        if !self.frozen {
            log!("error"; "request order requested before freeze");
            return None;
        }
        if self.request_order.is_empty() {
            None
        } else {
            Some(&self.request_order)
        }
    }

    /// Resources grouped by host, each group in insertion order.
    /// Meaningful only after freeze.
    pub fn host_map(&self) -> &FxHashMap<String, Vec<ResourceId>> {
        if !self.frozen {
            log!("error"; "host map requested before freeze");
        }
        &self.host_index
    }

    /// The landing-page resource, when a primary URL was recorded and
    /// the resource exists.
    pub fn primary_resource(&self) -> Option<ResourceId> {
        let url = self.primary_url.as_deref()?;
        self.id_by_url(url)
    }

    /// The recorded landing-page URL, canonicalized.
    pub fn primary_url(&self) -> Option<&str> {
        self.primary_url.as_deref()
    }

    /// The redirect registry. Meaningful only after freeze.
    pub fn registry(&self) -> &RedirectRegistry {
        if !self.frozen {
            log!("error"; "registry requested before freeze");
        }
        &self.registry
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collection::ResourceType;

    fn timed(url: &str, status: i32, start: i64) -> Resource {
        Resource::new(url, status).with_request_start_millis(start)
    }

    #[test]
    fn test_add_and_lookup() {
        let mut collection = ResourceCollection::new();
        assert!(collection.add(Resource::new("http://a.com/x", 200)));
        assert_eq!(collection.len(), 1);

        let id = collection.id_by_url("http://a.com/x").unwrap();
        assert_eq!(collection.get(id).unwrap().request_url(), "http://a.com/x");
        // Fragments are stripped for lookups.
        assert_eq!(collection.id_by_url("http://a.com/x#frag"), Some(id));
        assert_eq!(collection.id_by_url("http://a.com/other"), None);
        // Mutable lookups work while unfrozen.
        assert!(collection.by_url_mut("http://a.com/x").is_some());
    }

    #[test]
    fn test_canonical_keys_on_insert() {
        let mut collection = ResourceCollection::new();
        assert!(collection.add(Resource::new("HTTP://A.com/x#frag", 200)));
        // The stored key is canonical, so lookups in any spelling hit.
        assert!(collection.by_url("http://a.com/x").is_some());
        // A second spelling of the same canonical URL is a duplicate.
        assert!(!collection.add(Resource::new("http://a.com/x", 200)));
    }

    #[test]
    fn test_malformed_urls_fall_back_to_raw_keys() {
        let mut collection = ResourceCollection::new();
        assert!(collection.add(Resource::new("not a url", 200)));
        assert!(collection.by_url("not a url").is_some());
    }

    #[test]
    fn test_rejects_invalid_resources() {
        let mut collection = ResourceCollection::new();
        assert!(!collection.add(Resource::new("", 200)));
        assert!(!collection.add(Resource::new("http://a.com/", 0)));
        assert!(!collection.add(Resource::new("http://a.com/", -5)));
        assert!(collection.add(Resource::new("http://a.com/", 200)));
        assert!(!collection.add(Resource::new("http://a.com/", 404)));
        assert_eq!(collection.len(), 1);
    }

    #[test]
    fn test_filter_rejection() {
        struct NoImages;
        impl ResourceFilter for NoImages {
            fn is_accepted(&self, resource: &Resource) -> bool {
                resource.resource_type() != ResourceType::Image
            }
        }

        let mut collection = ResourceCollection::with_filter(Box::new(NoImages));
        assert!(collection.add(Resource::new("http://a.com/page", 200)));
        assert!(
            !collection
                .add(Resource::new("http://a.com/logo", 200).with_content_type("image/png"))
        );
        assert_eq!(collection.len(), 1);
    }

    #[test]
    fn test_frozen_rejects_mutation() {
        let mut collection = ResourceCollection::new();
        assert!(collection.add(Resource::new("http://a.com/", 200)));
        collection.freeze();
        assert!(collection.is_frozen());

        assert!(!collection.add(Resource::new("http://a.com/late", 200)));
        assert!(!collection.set_primary_url("http://a.com/"));
        let id = collection.id_by_url("http://a.com/").unwrap();
        assert!(collection.get_mut(id).is_none());
        assert!(collection.by_url_mut("http://a.com/").is_none());
        assert_eq!(collection.len(), 1);
    }

    #[test]
    fn test_primary_url() {
        let mut collection = ResourceCollection::new();
        assert!(collection.add(Resource::new("http://a.com/", 200)));
        // Unknown URLs are refused.
        assert!(!collection.set_primary_url("http://b.com/"));
        assert!(collection.set_primary_url("http://a.com/#landing"));
        assert_eq!(collection.primary_url(), Some("http://a.com/"));

        collection.freeze();
        let id = collection.primary_resource().unwrap();
        assert_eq!(collection.get(id).unwrap().request_url(), "http://a.com/");
    }

    #[test]
    fn test_request_order_stable_sort() {
        let mut collection = ResourceCollection::new();
        assert!(collection.add(timed("http://a.com/1", 200, 20)));
        assert!(collection.add(timed("http://a.com/2", 200, 10)));
        // Ties keep insertion order.
        assert!(collection.add(timed("http://a.com/3", 200, 10)));
        collection.freeze();

        let order: Vec<&str> = collection
            .request_order()
            .unwrap()
            .iter()
            .map(|&id| collection.get(id).unwrap().request_url())
            .collect();
        assert_eq!(
            order,
            ["http://a.com/2", "http://a.com/3", "http://a.com/1"]
        );
    }

    #[test]
    fn test_request_order_absent_without_timestamps() {
        let mut collection = ResourceCollection::new();
        assert!(collection.add(timed("http://a.com/1", 200, 10)));
        assert!(collection.add(Resource::new("http://a.com/2", 200)));
        collection.freeze();
        assert!(collection.request_order().is_none());
    }

    #[test]
    fn test_host_map_groups_resources() {
        let mut collection = ResourceCollection::new();
        assert!(collection.add(Resource::new("http://a.com/1", 200)));
        assert!(collection.add(Resource::new("http://b.com/2", 200)));
        assert!(collection.add(Resource::new("http://a.com/3", 200)));
        collection.freeze();

        let hosts = collection.host_map();
        assert_eq!(hosts["a.com"].len(), 2);
        assert_eq!(hosts["b.com"].len(), 1);
    }

    #[test]
    fn test_accessors_stable_after_freeze() {
        let mut collection = ResourceCollection::new();
        assert!(collection.add(timed("http://a.com/1", 200, 1)));
        assert!(collection.add(timed("http://a.com/2", 200, 2)));
        collection.freeze();

        let first: Vec<ResourceId> = collection.request_order().unwrap().to_vec();
        let second: Vec<ResourceId> = collection.request_order().unwrap().to_vec();
        assert_eq!(first, second);
        assert_eq!(collection.len(), 2);
        assert_eq!(
            collection.id_by_url("http://a.com/1"),
            collection.id_by_url("http://a.com/1")
        );
    }
}
