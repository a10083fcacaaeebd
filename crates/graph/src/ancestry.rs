use crate::fingerprint::ViolationSetKey;
use crate::types::{Node, NodeId, Violation};
use std::collections::{HashMap, HashSet};

/// Ancestors of a node, nearest first: index 0 is the immediate parent, the last
/// entry is the hierarchy root
pub type AncestryChain = Vec<Node>;

/// Parent lookup capability supplied by the structure model
pub trait ParentLookup {
    /// Immediate container of `node`, `None` for roots
    fn parent_of(&self, node: &Node) -> Option<Node>;

    /// Full ancestor chain, nearest first
    ///
    /// Stops at the first repeated id, so a malformed lookup cannot loop.
    fn parents(&self, node: &Node) -> AncestryChain {
        let mut chain = Vec::new();
        let mut seen = HashSet::new();
        seen.insert(node.id.clone());

        let mut current = self.parent_of(node);
        while let Some(parent) = current {
            if !seen.insert(parent.id.clone()) {
                log::warn!("Parent lookup revisited {} while walking up from {}", parent.id, node.id);
                break;
            }
            current = self.parent_of(&parent);
            chain.push(parent);
        }

        chain
    }
}

/// Child id -> parent node table
impl ParentLookup for HashMap<NodeId, Node> {
    fn parent_of(&self, node: &Node) -> Option<Node> {
        self.get(&node.id).cloned()
    }
}

/// Resolve the ancestor chain of a node (empty for a root)
pub fn resolve_ancestors<L: ParentLookup + ?Sized>(lookup: &L, node: &Node) -> AncestryChain {
    lookup.parents(node)
}

/// Memoized node id -> ancestor chain map for one violation set
#[derive(Debug, Clone, Default)]
pub struct AncestryCache {
    chains: HashMap<NodeId, AncestryChain>,

    /// Bumped on every rebuild
    generation: u64,

    /// Violation set the chains were computed for
    source_key: Option<ViolationSetKey>,
}

impl AncestryCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn build<L: ParentLookup + ?Sized>(violations: &[Violation], lookup: &L) -> Self {
        let mut cache = Self::new();
        cache.rebuild(violations, lookup);
        cache
    }

    /// Replace all chains with those of the nodes referenced by `violations`
    ///
    /// Each distinct node id is resolved once; later references reuse the chain.
    pub fn rebuild<L: ParentLookup + ?Sized>(&mut self, violations: &[Violation], lookup: &L) {
        let mut chains: HashMap<NodeId, AncestryChain> = HashMap::new();

        for violation in violations {
            for node in [&violation.source_node, &violation.target_node]
                .into_iter()
                .flatten()
            {
                if !chains.contains_key(&node.id) {
                    chains.insert(node.id.clone(), resolve_ancestors(lookup, node));
                }
            }
        }

        self.chains = chains;
        self.generation += 1;
        self.source_key = Some(ViolationSetKey::of(violations));

        log::debug!(
            "Ancestry cache rebuilt: {} nodes (generation {})",
            self.chains.len(),
            self.generation
        );
    }

    /// Chain for `id`; a node the cache has not seen reads as having no ancestors
    pub fn chain(&self, id: &NodeId) -> &[Node] {
        self.chains.get(id).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn contains(&self, id: &NodeId) -> bool {
        self.chains.contains_key(id)
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn source_key(&self) -> Option<&ViolationSetKey> {
        self.source_key.as_ref()
    }

    pub fn len(&self) -> usize {
        self.chains.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chains.is_empty()
    }
}
