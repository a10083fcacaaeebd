use archlift_graph::{DisplayGroup, GroupDetails, Violation, VisibilityOption};
use serde::Serialize;
use serde_json::Value;

pub const GROUPS_HEADER: &str = "Reference Architecture violations";

#[derive(Debug, Serialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum CommandStatus {
    Ok,
    Error,
}

/// JSON envelope printed on stdout in `--json` mode
#[derive(Debug, Serialize)]
pub struct CommandResponse {
    pub status: CommandStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    pub data: Value,
}

impl CommandResponse {
    pub fn ok(data: Value) -> Self {
        Self {
            status: CommandStatus::Ok,
            message: None,
            data,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            status: CommandStatus::Error,
            message: Some(message.into()),
            data: Value::Null,
        }
    }
}

pub fn render_groups(groups: &[DisplayGroup], lifting_index: i64) -> String {
    let mut out = String::new();
    out.push_str(&format!(
        "{GROUPS_HEADER} ({} groups, lifting index {lifting_index})\n",
        groups.len()
    ));
    if groups.is_empty() {
        out.push_str("  none\n");
        return out;
    }

    let width = groups
        .iter()
        .map(|g| g.len().to_string().len())
        .max()
        .unwrap_or(1);
    for group in groups {
        out.push_str(&format!("  {:>width$}  {}\n", group.len(), group.label));
    }
    out
}

pub fn render_details(
    details: &GroupDetails,
    highlighted: &[Violation],
    visibility: Option<VisibilityOption>,
) -> String {
    let mut out = details.to_string();
    for violation in highlighted {
        out.push_str(&format!(
            "Highlighted: {} -> {}\n",
            violation.source, violation.target
        ));
    }
    if let Some(name) = visibility.and_then(|v| serde_json::to_value(v).ok()) {
        // same spelling as the JSON envelope
        if let Some(name) = name.as_str() {
            out.push_str(&format!("Overlay: {name}\n"));
        }
    }
    out
}
