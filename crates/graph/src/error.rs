use thiserror::Error;

pub type Result<T> = std::result::Result<T, GraphError>;

/// Errors raised while building the hierarchy or validating settings.
///
/// The lifting pipeline itself never fails; bad input is skipped instead.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GraphError {
    #[error("Duplicate node id: {0}")]
    DuplicateNode(String),

    #[error("Node {node} references unknown parent {parent}")]
    UnknownParent { node: String, parent: String },

    #[error("Node {0} already has a parent")]
    MultipleParents(String),

    #[error("Containment cycle through node {0}")]
    CycleDetected(String),

    #[error("Node not found: {0}")]
    NodeNotFound(String),

    #[error("Invalid settings: {0}")]
    InvalidSettings(String),
}

impl GraphError {
    pub fn invalid_settings(msg: impl Into<String>) -> Self {
        Self::InvalidSettings(msg.into())
    }
}
