use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;

/// Opaque node identity (e.g., "app.payments.ledger")
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(String);

impl NodeId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for NodeId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for NodeId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

/// Node of the software-structure hierarchy (package, module, class, ...)
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Node {
    /// Unique identity
    pub id: NodeId,

    /// Display label; several nodes may share one
    #[serde(default)]
    pub label: String,
}

impl Node {
    pub fn new(id: impl Into<NodeId>, label: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
        }
    }
}

/// Dependency edge that breaks a reference architecture rule
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Violation {
    /// Edge id assigned by the conformance analysis
    #[serde(default)]
    pub id: String,

    pub source: NodeId,
    pub target: NodeId,

    /// Resolved source node, absent when the analysis could not map it
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_node: Option<Node>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_node: Option<Node>,

    /// Everything else the analysis attached; carried through lifting untouched
    #[serde(flatten)]
    pub metadata: Map<String, Value>,
}

impl Violation {
    /// Edge between two resolved nodes, without metadata
    pub fn between(id: impl Into<String>, source: Node, target: Node) -> Self {
        Self {
            id: id.into(),
            source: source.id.clone(),
            target: target.id.clone(),
            source_node: Some(source),
            target_node: Some(target),
            metadata: Map::new(),
        }
    }

    pub fn with_metadata(mut self, key: impl Into<String>, value: Value) -> Self {
        self.metadata.insert(key.into(), value);
        self
    }

    /// Label used as the grouping key (empty when the source is unresolved)
    pub fn source_label(&self) -> &str {
        self.source_node
            .as_ref()
            .map(|node| node.label.as_str())
            .unwrap_or("")
    }
}

/// Violations sharing the same source label
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Group {
    pub label: String,
    pub items: Vec<Violation>,
}

impl Group {
    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// Relative severity of a group compared to the mean group size
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PriorityClass {
    High,
    Medium,
    Low,
}

impl PriorityClass {
    pub fn as_str(&self) -> &'static str {
        match self {
            PriorityClass::High => "High Priority",
            PriorityClass::Medium => "Medium Priority",
            PriorityClass::Low => "Low Priority",
        }
    }
}

impl fmt::Display for PriorityClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Group ready for display: label decorated with its priority
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DisplayGroup {
    /// Decorated label, e.g. "Payments (High Priority)"
    pub label: String,

    /// Label the group was keyed by
    pub base_label: String,

    pub priority: PriorityClass,
    pub items: Vec<Violation>,
}

impl DisplayGroup {
    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}
