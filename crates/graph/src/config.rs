use crate::error::{GraphError, Result};
use crate::types::NodeId;
use serde::{Deserialize, Serialize};

/// Default display depth below the current drill-down position
pub const DEFAULT_LAYER_DEPTH: usize = 1;

/// Display settings that control how far violations are lifted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LayerSettings {
    /// Number of layers in the structure hierarchy
    pub total_layers: usize,

    /// User-configured number of layers shown below the current node
    pub layer_depth: usize,
}

impl Default for LayerSettings {
    fn default() -> Self {
        Self {
            total_layers: 0,
            layer_depth: DEFAULT_LAYER_DEPTH,
        }
    }
}

impl LayerSettings {
    pub fn new(total_layers: usize, layer_depth: usize) -> Self {
        Self {
            total_layers,
            layer_depth,
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.total_layers == 0 {
            return Err(GraphError::invalid_settings("total_layers must be > 0"));
        }
        Ok(())
    }
}

/// Where the user currently is in the drill-down hierarchy
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NavigationState {
    /// Node the view is focused on (`None` = whole system)
    #[serde(default)]
    pub current_node: Option<NodeId>,

    /// Depth of `current_node`, 0 at the top of the hierarchy
    #[serde(default)]
    pub current_node_depth: usize,
}

impl NavigationState {
    pub fn top() -> Self {
        Self::default()
    }

    pub fn at(node: impl Into<NodeId>, depth: usize) -> Self {
        Self {
            current_node: Some(node.into()),
            current_node_depth: depth,
        }
    }
}
