//! Redirect chain registry and landing-page fix-up.

use rustc_hash::{FxHashMap, FxHashSet};

use crate::collection::{ResourceCollection, ResourceId};

use super::graph::RedirectGraph;

/// An observed redirect chain: one or more redirects ending in either
/// a non-redirect terminus or a loop-closing repeat.
pub type RedirectChain = Vec<ResourceId>;

/// Registry of the redirect chains recovered from a frozen collection.
///
/// Owned by the collection and built during freeze. Chains live in a
/// slot vector; the resource-to-chain map stores slot numbers, so
/// lookups stay valid for the registry's whole lifetime.
#[derive(Debug, Default)]
pub struct RedirectRegistry {
    chains: Vec<RedirectChain>,
    chain_index: FxHashMap<ResourceId, usize>,
    initialized: bool,
}

impl RedirectRegistry {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Build chains from the collection's redirect graph, then repair
    /// the landing-page chain against the request-ordered view.
    pub(crate) fn init(&mut self, collection: &ResourceCollection) {
        debug_assert!(!self.initialized, "registry initialized twice");
        debug_assert!(collection.is_frozen(), "registry built before freeze");
        if self.initialized || !collection.is_frozen() {
            return;
        }
        self.build_chains(collection);
        self.initialized = true;
        self.fix_up_landing_chain(collection);
    }

    fn build_chains(&mut self, collection: &ResourceCollection) {
        let mut graph = RedirectGraph::new(collection);
        self.chains.clear();
        graph.append_chains(&mut self.chains);
        self.reindex();
    }

    /// Rebuild the resource-to-chain map from the chain slots.
    fn reindex(&mut self) {
        self.chain_index.clear();
        for (slot, chain) in self.chains.iter().enumerate() {
            for &id in chain {
                self.chain_index.insert(id, slot);
            }
        }
    }

    /// The observation set can be missing redirect hops (a HAR without
    /// intermediate responses), leaving the graph-derived landing
    /// chain truncated. Rebuild that chain from the request-ordered
    /// view and, when it is longer than what the graph produced,
    /// replace the graph's version.
    fn fix_up_landing_chain(&mut self, collection: &ResourceCollection) {
        let fixup_chain = build_fixup_chain(collection);
        if fixup_chain.is_empty() {
            return;
        }
        // The landing resource: the recorded primary when present,
        // otherwise the final resource of the rebuilt chain.
        let landing = collection
            .primary_resource()
            .or_else(|| fixup_chain.last().copied());
        let Some(landing) = landing else {
            return;
        };
        let replace = match self.chain_for(landing) {
            None => true,
            Some(primary_chain) => primary_chain.len() < fixup_chain.len(),
        };
        if !replace {
            return;
        }
        // Drop every chain whose head is inside the rebuilt chain; the
        // rebuilt chain supersedes them. Membership is judged by head
        // identity only - each resource is assumed to belong to at
        // most one chain.
        let fixup_members: FxHashSet<ResourceId> = fixup_chain.iter().copied().collect();
        self.chains.retain(|chain| match chain.first() {
            Some(head) => !fixup_members.contains(head),
            None => true,
        });
        // Removal shifted the slots; re-index survivors before
        // indexing the appended chain.
        self.reindex();
        let slot = self.chains.len();
        for &id in &fixup_chain {
            self.chain_index.insert(id, slot);
        }
        self.chains.push(fixup_chain);
    }

    /// All recovered chains.
    pub fn chains(&self) -> &[RedirectChain] {
        &self.chains
    }

    /// The chain containing the given resource, if any.
    pub fn chain_for(&self, id: ResourceId) -> Option<&RedirectChain> {
        self.chain_index.get(&id).map(|&slot| &self.chains[slot])
    }

    /// The final resource of the chain containing `id`, or `id` itself
    /// when it belongs to no chain.
    pub fn final_redirect_target(&self, id: ResourceId) -> ResourceId {
        self.chain_for(id)
            .and_then(|chain| chain.last().copied())
            .unwrap_or(id)
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized
    }
}

/// Collect the leading run of redirects from the request-ordered view,
/// plus the first non-redirect terminus. Empty when the view is absent
/// or the load did not start with a redirect.
fn build_fixup_chain(collection: &ResourceCollection) -> RedirectChain {
    let mut chain = RedirectChain::new();
    let Some(order) = collection.request_order() else {
        return chain;
    };
    for (position, &id) in order.iter().enumerate() {
        let Some(resource) = collection.get(id) else {
            break;
        };
        if resource.is_redirect() {
            chain.push(id);
        } else {
            if position > 0 {
                chain.push(id);
            }
            break;
        }
    }
    chain
}
