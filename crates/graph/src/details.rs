use crate::types::{DisplayGroup, Violation};
use serde::{Deserialize, Serialize};
use std::fmt;

pub const EMPTY_DETAILS_MESSAGE: &str = "No reference architecture violations were found.";

/// Visibility of the violation overlay in the visualization
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VisibilityOption {
    #[default]
    Invisible,
    Visible,
    Highlighted,
}

/// Receiver of edge highlight requests (the graph renderer)
pub trait HighlightSink {
    fn highlight_edges(&mut self, edges: &[Violation]);
}

/// Records every highlighted edge
impl HighlightSink for Vec<Violation> {
    fn highlight_edges(&mut self, edges: &[Violation]) {
        self.extend_from_slice(edges);
    }
}

/// Ask the renderer to highlight one violation and make the overlay visible
///
/// An invisible overlay switches to highlighted; any other state is kept.
pub fn highlight_violation<S: HighlightSink + ?Sized>(
    violation: &Violation,
    sink: &mut S,
    visibility: &mut VisibilityOption,
) {
    sink.highlight_edges(std::slice::from_ref(violation));
    if *visibility == VisibilityOption::Invisible {
        log::debug!("Violation overlay switched to highlighted");
        *visibility = VisibilityOption::Highlighted;
    }
}

/// Find a group by its decorated or plain label
pub fn select_group<'a>(groups: &'a [DisplayGroup], label: &str) -> Option<&'a DisplayGroup> {
    groups
        .iter()
        .find(|group| group.label == label)
        .or_else(|| groups.iter().find(|group| group.base_label == label))
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DetailEntry {
    pub violation_id: String,
    pub source_label: String,
    pub target_label: String,
}

impl DetailEntry {
    fn from_violation(violation: &Violation) -> Self {
        Self {
            violation_id: violation.id.clone(),
            source_label: violation.source_label().to_string(),
            target_label: violation
                .target_node
                .as_ref()
                .map(|node| node.label.clone())
                .unwrap_or_default(),
        }
    }

    pub fn description(&self) -> String {
        format!("{} → {}", self.source_label, self.target_label)
    }
}

/// Detail view of one display group
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GroupDetails {
    pub title: String,
    pub count: usize,
    pub entries: Vec<DetailEntry>,
}

impl GroupDetails {
    pub fn from_group(group: &DisplayGroup) -> Self {
        Self {
            title: format!("Detected {} violations from {}", group.len(), group.label),
            count: group.len(),
            entries: group.items.iter().map(DetailEntry::from_violation).collect(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl fmt::Display for GroupDetails {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.title)?;
        if self.entries.is_empty() {
            return writeln!(f, "{EMPTY_DETAILS_MESSAGE}");
        }
        for (i, entry) in self.entries.iter().enumerate() {
            if i > 0 {
                writeln!(f, "---")?;
            }
            writeln!(f, "{}", entry.description())?;
        }
        Ok(())
    }
}
