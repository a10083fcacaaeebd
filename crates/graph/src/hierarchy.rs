use crate::ancestry::ParentLookup;
use crate::error::{GraphError, Result};
use crate::types::{Node, NodeId};
use petgraph::algo::{has_path_connecting, toposort};
use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::Direction;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Flat description of a hierarchy node, as produced by the structure model
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeSpec {
    pub id: NodeId,

    #[serde(default)]
    pub label: String,

    /// Containing node; `None` for roots
    #[serde(default)]
    pub parent: Option<NodeId>,
}

/// Containment tree of the software structure (root -> ... -> leaf)
#[derive(Debug, Clone, Default)]
pub struct Hierarchy {
    /// Directed graph, edges point from parent to child
    graph: DiGraph<Node, ()>,

    /// Node id -> NodeIndex mapping for fast lookup
    index: HashMap<NodeId, NodeIndex>,
}

impl Hierarchy {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build hierarchy from flat node specs, parents may appear after children
    ///
    /// Cycles are detected once over the finished graph, in linear time.
    pub fn from_specs(specs: &[NodeSpec]) -> Result<Self> {
        let mut hierarchy = Self::new();

        // Phase 1: register every node
        for spec in specs {
            hierarchy.add_node(Node::new(spec.id.clone(), spec.label.clone()))?;
        }

        // Phase 2: wire containment edges
        for spec in specs {
            if let Some(parent) = &spec.parent {
                if !hierarchy.index.contains_key(parent) {
                    return Err(GraphError::UnknownParent {
                        node: spec.id.to_string(),
                        parent: parent.to_string(),
                    });
                }
                let parent_idx = hierarchy.index_of(parent)?;
                let child_idx = hierarchy.index_of(&spec.id)?;
                hierarchy.graph.add_edge(parent_idx, child_idx, ());
            }
        }

        // Phase 3: ids are unique, so each node got at most one parent edge above
        if let Err(cycle) = toposort(&hierarchy.graph, None) {
            let id = hierarchy
                .graph
                .node_weight(cycle.node_id())
                .map(|node| node.id.to_string())
                .unwrap_or_default();
            return Err(GraphError::CycleDetected(id));
        }

        log::debug!(
            "Built hierarchy: {} nodes, {} layers",
            hierarchy.node_count(),
            hierarchy.layer_count()
        );

        Ok(hierarchy)
    }

    pub fn add_node(&mut self, node: Node) -> Result<NodeIndex> {
        if self.index.contains_key(&node.id) {
            return Err(GraphError::DuplicateNode(node.id.to_string()));
        }
        let id = node.id.clone();
        let idx = self.graph.add_node(node);
        self.index.insert(id, idx);
        Ok(idx)
    }

    /// Declare `parent` as the container of `child`
    pub fn add_containment(&mut self, parent: &NodeId, child: &NodeId) -> Result<()> {
        let parent_idx = self.index_of(parent)?;
        let child_idx = self.index_of(child)?;

        if self
            .graph
            .neighbors_directed(child_idx, Direction::Incoming)
            .next()
            .is_some()
        {
            return Err(GraphError::MultipleParents(child.to_string()));
        }

        // child already reaching parent means the new edge closes a loop
        if has_path_connecting(&self.graph, child_idx, parent_idx, None) {
            return Err(GraphError::CycleDetected(child.to_string()));
        }

        self.graph.add_edge(parent_idx, child_idx, ());
        Ok(())
    }

    pub fn get(&self, id: &NodeId) -> Option<&Node> {
        self.index.get(id).and_then(|&idx| self.graph.node_weight(idx))
    }

    pub fn parent(&self, id: &NodeId) -> Option<&Node> {
        let idx = *self.index.get(id)?;
        self.graph
            .neighbors_directed(idx, Direction::Incoming)
            .next()
            .and_then(|parent| self.graph.node_weight(parent))
    }

    /// Number of ancestors above the node (roots sit at depth 0)
    pub fn depth_of(&self, id: &NodeId) -> Option<usize> {
        let mut idx = *self.index.get(id)?;
        let mut depth = 0;
        while let Some(parent) = self
            .graph
            .neighbors_directed(idx, Direction::Incoming)
            .next()
        {
            depth += 1;
            idx = parent;
        }
        Some(depth)
    }

    /// Count of distinct hierarchy layers (deepest depth + 1, 0 when empty)
    pub fn layer_count(&self) -> usize {
        self.index
            .keys()
            .filter_map(|id| self.depth_of(id))
            .max()
            .map_or(0, |depth| depth + 1)
    }

    pub fn roots(&self) -> impl Iterator<Item = &Node> {
        self.graph.node_indices().filter_map(move |idx| {
            if self
                .graph
                .neighbors_directed(idx, Direction::Incoming)
                .next()
                .is_none()
            {
                self.graph.node_weight(idx)
            } else {
                None
            }
        })
    }

    pub fn nodes(&self) -> impl Iterator<Item = &Node> {
        self.graph.node_weights()
    }

    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    fn index_of(&self, id: &NodeId) -> Result<NodeIndex> {
        self.index
            .get(id)
            .copied()
            .ok_or_else(|| GraphError::NodeNotFound(id.to_string()))
    }
}

impl ParentLookup for Hierarchy {
    fn parent_of(&self, node: &Node) -> Option<Node> {
        self.parent(&node.id).cloned()
    }
}
