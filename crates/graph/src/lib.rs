//! # Archlift Graph
//!
//! Lifting and grouping of architecture violations over a software-structure hierarchy.
//!
//! ## Features
//!
//! - **Ancestry resolution** - nearest-first ancestor chains from a parent lookup
//! - **Ancestry cache** - one chain per node per violation set, rebuilt on change
//! - **Lifting** - re-project leaf-level violations onto ancestors for the current view
//! - **Grouping** - bucket violations by source label and rank them against the mean
//!
//! ## Architecture
//!
//! ```text
//! Violation[] (from conformance analysis)
//!     │
//!     ├──> Ancestry Cache (node id -> ancestor chain)
//!     │
//!     ├──> Lifting Engine
//!     │      ├─ lifting index from layers, navigation depth, layer depth
//!     │      └─ drop violations that cannot be lifted
//!     │
//!     ├──> Grouping (by source label, High/Medium/Low vs mean size)
//!     │
//!     └──> Present (largest groups first) -> DisplayGroup[]
//! ```
//!
//! ## Example
//!
//! ```rust
//! use archlift_graph::{
//!     compute_display_groups, Hierarchy, LayerSettings, NavigationState, Node, NodeId,
//!     NodeSpec, Violation,
//! };
//!
//! let spec = |id: &str, parent: Option<&str>| NodeSpec {
//!     id: NodeId::from(id),
//!     label: id.to_string(),
//!     parent: parent.map(NodeId::from),
//! };
//! let hierarchy = Hierarchy::from_specs(&[
//!     spec("root", None),
//!     spec("A", Some("root")),
//!     spec("a", Some("A")),
//!     spec("a1", Some("a")),
//!     spec("B", Some("root")),
//!     spec("b", Some("B")),
//!     spec("b1", Some("b")),
//! ])
//! .unwrap();
//!
//! let violations = vec![Violation::between("v1", Node::new("a1", "a1"), Node::new("b1", "b1"))];
//!
//! // (4 - 0) - (2 + 1) = 1: lift each endpoint to its grandparent
//! let settings = LayerSettings::new(hierarchy.layer_count(), 2);
//! let groups =
//!     compute_display_groups(&violations, &NavigationState::top(), &settings, &hierarchy);
//!
//! assert_eq!(groups[0].label, "A (Medium Priority)");
//! assert_eq!(groups[0].items[0].target, NodeId::from("B"));
//! ```

mod ancestry;
mod config;
mod details;
mod engine;
mod error;
mod fingerprint;
mod grouping;
mod hierarchy;
mod lifting;
mod present;
mod types;

pub use ancestry::{resolve_ancestors, AncestryCache, AncestryChain, ParentLookup};
pub use config::{LayerSettings, NavigationState, DEFAULT_LAYER_DEPTH};
pub use details::{
    highlight_violation, select_group, DetailEntry, GroupDetails, HighlightSink,
    VisibilityOption, EMPTY_DETAILS_MESSAGE,
};
pub use engine::{
    compute_display_groups, display_groups, CacheRefresh, EngineStats, ViolationEngine,
};
pub use error::{GraphError, Result};
pub use fingerprint::ViolationSetKey;
pub use grouping::{average_size, classify, decorate, group};
pub use hierarchy::{Hierarchy, NodeSpec};
pub use lifting::{lift, lifting_index};
pub use present::present;
pub use types::{DisplayGroup, Group, Node, NodeId, PriorityClass, Violation};
