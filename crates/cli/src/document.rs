use anyhow::{anyhow, Context, Result};
use archlift_graph::{
    Hierarchy, LayerSettings, NavigationState, NodeId, NodeSpec, Violation, DEFAULT_LAYER_DEPTH,
};
use serde::Deserialize;
use std::fs;
use std::path::Path;

/// Input file: structure hierarchy, detected violations and the view to render
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ViolationDocument {
    #[serde(default)]
    pub nodes: Vec<NodeSpec>,

    #[serde(default)]
    pub violations: Vec<Violation>,

    #[serde(default)]
    pub navigation: NavigationSection,

    #[serde(default)]
    pub settings: SettingsSection,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct NavigationSection {
    #[serde(default)]
    pub current_node: Option<NodeId>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SettingsSection {
    #[serde(default)]
    pub layer_depth: Option<usize>,

    #[serde(default)]
    pub total_layers: Option<usize>,
}

/// Values given on the command line (or via environment), taking precedence
/// over the document
#[derive(Debug, Default, Clone)]
pub struct ViewOverrides {
    pub layer_depth: Option<usize>,
    pub total_layers: Option<usize>,
    pub current_node: Option<String>,
}

/// Everything the engine needs for one evaluation
pub struct LoadedView {
    pub hierarchy: Hierarchy,
    pub violations: Vec<Violation>,
    pub navigation: NavigationState,
    pub settings: LayerSettings,
}

impl ViolationDocument {
    pub fn load(path: &Path) -> Result<Self> {
        let data = fs::read(path)
            .with_context(|| format!("Failed to read violation document {}", path.display()))?;
        serde_json::from_slice(&data)
            .with_context(|| format!("Invalid violation document {}", path.display()))
    }

    /// Build the hierarchy, attach nodes to violations and resolve the view
    pub fn into_view(self, overrides: &ViewOverrides) -> Result<LoadedView> {
        let hierarchy = Hierarchy::from_specs(&self.nodes).context("Invalid node hierarchy")?;

        let mut unresolved = 0usize;
        let violations: Vec<Violation> = self
            .violations
            .into_iter()
            .map(|mut violation| {
                if violation.source_node.is_none() {
                    violation.source_node = hierarchy.get(&violation.source).cloned();
                }
                if violation.target_node.is_none() {
                    violation.target_node = hierarchy.get(&violation.target).cloned();
                }
                if violation.source_node.is_none() || violation.target_node.is_none() {
                    unresolved += 1;
                }
                violation
            })
            .collect();
        if unresolved > 0 {
            log::warn!("{unresolved} violations reference nodes missing from the hierarchy");
        }

        let current_node = overrides
            .current_node
            .clone()
            .map(NodeId::from)
            .or(self.navigation.current_node);
        let navigation = match current_node {
            Some(id) => {
                let depth = hierarchy
                    .depth_of(&id)
                    .ok_or_else(|| anyhow!("Unknown current node: {id}"))?;
                NavigationState::at(id, depth)
            }
            None => NavigationState::top(),
        };

        let settings = LayerSettings::new(
            overrides
                .total_layers
                .or(self.settings.total_layers)
                .unwrap_or_else(|| hierarchy.layer_count()),
            overrides
                .layer_depth
                .or(self.settings.layer_depth)
                .unwrap_or(DEFAULT_LAYER_DEPTH),
        );
        if hierarchy.node_count() > 0 {
            settings.validate()?;
        }

        log::debug!(
            "View: {} violations, {} layers, layer depth {}, current node {:?} at depth {}",
            violations.len(),
            settings.total_layers,
            settings.layer_depth,
            navigation.current_node,
            navigation.current_node_depth
        );

        Ok(LoadedView {
            hierarchy,
            violations,
            navigation,
            settings,
        })
    }
}
