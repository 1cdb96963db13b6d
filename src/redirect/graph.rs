//! Redirect graph construction and chain extraction.

use rustc_hash::{FxHashMap, FxHashSet};

use crate::collection::ResourceCollection;
use crate::core::url as uri;
use crate::debug;

use super::RedirectChain;

/// Directed URL graph over the redirects in a frozen collection.
///
/// Sources are kept in first-seen order and each source's target list
/// preserves observation order, so chain extraction is deterministic.
pub(crate) struct RedirectGraph<'a> {
    collection: &'a ResourceCollection,
    /// Source URL -> observed targets, in first-seen source order.
    sources: Vec<(String, Vec<String>)>,
    source_slots: FxHashMap<String, usize>,
    /// Every URL that appears as a redirect target.
    destinations: FxHashSet<String>,
    processed: FxHashSet<String>,
}

impl<'a> RedirectGraph<'a> {
    pub(crate) fn new(collection: &'a ResourceCollection) -> Self {
        let mut graph = Self {
            collection,
            sources: Vec::new(),
            source_slots: FxHashMap::default(),
            destinations: FxHashSet::default(),
            processed: FxHashSet::default(),
        };
        for (_, resource) in collection.iter() {
            if let Some(target) = resource.redirect_target() {
                let source = uri::canonical_or_raw(resource.request_url());
                graph.add_edge(source, target);
            }
        }
        graph
    }

    fn add_edge(&mut self, source: String, target: String) {
        let slot = match self.source_slots.get(&source) {
            Some(&slot) => slot,
            None => {
                let slot = self.sources.len();
                self.sources.push((source.clone(), Vec::new()));
                self.source_slots.insert(source, slot);
                slot
            }
        };
        self.sources[slot].1.push(target.clone());
        self.destinations.insert(target);
    }

    /// Emit chains into `chains`, one per unprocessed root.
    pub(crate) fn append_chains(&mut self, chains: &mut Vec<RedirectChain>) {
        for root in self.prioritized_roots() {
            if self.processed.contains(&root) {
                continue;
            }
            let mut chain = RedirectChain::new();
            self.populate_chain(&root, &mut chain);
            chains.push(chain);
        }
    }

    /// All redirect sources, prioritized: first the sources that are
    /// not themselves redirect targets (chain heads), then the rest.
    /// The second group exists inside longer chains or in pure loops;
    /// keeping it means loops are still reported.
    fn prioritized_roots(&self) -> Vec<String> {
        let mut primary = Vec::new();
        let mut secondary = Vec::new();
        for (source, _) in &self.sources {
            if self.destinations.contains(source) {
                secondary.push(source.clone());
            } else {
                primary.push(source.clone());
            }
        }
        primary.extend(secondary);
        primary
    }

    /// Depth-first traversal from `root`. Targets are pushed in
    /// reverse so the first-observed target is visited first. A URL
    /// already processed is appended once more (closing a loop) but
    /// never expanded again.
    fn populate_chain(&mut self, root: &str, chain: &mut RedirectChain) {
        let mut work_stack = vec![root.to_string()];
        while let Some(current) = work_stack.pop() {
            let Some(id) = self.collection.id_by_url(&current) else {
                debug!("redirect"; "no resource observed for {current}");
                continue;
            };
            chain.push(id);
            if !self.processed.insert(current.clone()) {
                continue;
            }
            if let Some(&slot) = self.source_slots.get(&current) {
                let targets = &self.sources[slot].1;
                work_stack.extend(targets.iter().rev().cloned());
            }
        }
    }
}
