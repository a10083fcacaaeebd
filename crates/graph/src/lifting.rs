use crate::ancestry::AncestryCache;
use crate::config::{LayerSettings, NavigationState};
use crate::types::Violation;

/// How many levels to lift violations for the given view
///
/// `(total_layers - current_node_depth) - (layer_depth + 1)`; zero or negative
/// means violations are shown unlifted. Saturates at the `i64` bounds.
pub fn lifting_index(settings: &LayerSettings, navigation: &NavigationState) -> i64 {
    // usize fits in i128 without loss, so the subtraction cannot overflow
    let total = settings.total_layers as i128;
    let current = navigation.current_node_depth as i128;
    let depth = settings.layer_depth as i128;
    let index = (total - current) - (depth + 1);
    i64::try_from(index).unwrap_or(if index < 0 { i64::MIN } else { i64::MAX })
}

/// Re-project every violation onto the ancestors `lifting_index` levels up
///
/// Violations that cannot be lifted (a node is missing, or its chain is too
/// short or not cached yet) are dropped. Input order is preserved.
pub fn lift(violations: &[Violation], lifting_index: i64, cache: &AncestryCache) -> Vec<Violation> {
    let Ok(index) = usize::try_from(lifting_index) else {
        return violations.to_vec();
    };
    if index == 0 {
        return violations.to_vec();
    }

    let lifted: Vec<Violation> = violations
        .iter()
        .filter_map(|violation| lift_one(violation, index, cache))
        .collect();

    if lifted.len() < violations.len() {
        log::debug!(
            "Lifting by {index} skipped {} of {} violations",
            violations.len() - lifted.len(),
            violations.len()
        );
    }

    lifted
}

fn lift_one(violation: &Violation, index: usize, cache: &AncestryCache) -> Option<Violation> {
    let (Some(source), Some(target)) = (&violation.source_node, &violation.target_node) else {
        log::trace!("Violation {} has an unresolved endpoint", violation.id);
        return None;
    };

    let lifted_source = cache.chain(&source.id).get(index)?;
    let lifted_target = cache.chain(&target.id).get(index)?;

    Some(Violation {
        source: lifted_source.id.clone(),
        target: lifted_target.id.clone(),
        source_node: Some(lifted_source.clone()),
        target_node: Some(lifted_target.clone()),
        ..violation.clone()
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Node, NodeId};
    use pretty_assertions::assert_eq;
    use serde_json::json;
    use std::collections::HashMap;

    // root > A > a > a1, root > B > b > b1
    fn lookup() -> HashMap<NodeId, Node> {
        HashMap::from([
            (NodeId::from("a1"), Node::new("a", "a")),
            (NodeId::from("a"), Node::new("A", "A")),
            (NodeId::from("A"), Node::new("root", "Root")),
            (NodeId::from("b1"), Node::new("b", "b")),
            (NodeId::from("b"), Node::new("B", "B")),
            (NodeId::from("B"), Node::new("root", "Root")),
        ])
    }

    fn violation() -> Violation {
        Violation::between("v1", Node::new("a1", "a1"), Node::new("b1", "b1"))
            .with_metadata("rule", json!("layering"))
    }

    #[test]
    fn computes_lifting_index() {
        let settings = LayerSettings::new(5, 1);
        assert_eq!(lifting_index(&settings, &NavigationState::top()), 3);
        assert_eq!(lifting_index(&settings, &NavigationState::at("A", 2)), 1);
        assert_eq!(lifting_index(&settings, &NavigationState::at("a", 4)), -1);
        assert_eq!(lifting_index(&LayerSettings::new(0, 3), &NavigationState::top()), -4);
    }

    #[test]
    fn lifting_index_saturates_on_extreme_settings() {
        let top = NavigationState::top();

        let deep_view = LayerSettings::new(4, i64::MAX as usize);
        assert_eq!(lifting_index(&deep_view, &top), 4 - i64::MAX - 1);
        assert_eq!(lifting_index(&LayerSettings::new(4, usize::MAX), &top), i64::MIN);

        assert_eq!(lifting_index(&LayerSettings::new(usize::MAX, 0), &top), i64::MAX);
        let drilled = NavigationState::at("a", usize::MAX);
        assert_eq!(lifting_index(&LayerSettings::new(usize::MAX, 0), &drilled), -1);
    }

    #[test]
    fn huge_index_drops_instead_of_passing_through() {
        let violations = vec![violation()];
        let cache = AncestryCache::build(&violations, &lookup());

        assert!(lift(&violations, i64::MAX, &cache).is_empty());
        assert_eq!(lift(&violations, i64::MIN, &cache), violations);
    }

    #[test]
    fn lifts_to_ancestor_and_keeps_metadata() {
        let violations = vec![violation()];
        let cache = AncestryCache::build(&violations, &lookup());

        let lifted = lift(&violations, 1, &cache);

        assert_eq!(lifted.len(), 1);
        let edge = &lifted[0];
        assert_eq!(edge.id, "v1");
        assert_eq!(edge.source, NodeId::from("A"));
        assert_eq!(edge.target, NodeId::from("B"));
        assert_eq!(edge.source_node, Some(Node::new("A", "A")));
        assert_eq!(edge.target_node, Some(Node::new("B", "B")));
        assert_eq!(edge.metadata["rule"], json!("layering"));
    }

    #[test]
    fn non_positive_index_passes_through() {
        let mut detached = violation();
        detached.target_node = None;
        let violations = vec![violation(), detached];

        assert_eq!(lift(&violations, 0, &AncestryCache::new()), violations);
        assert_eq!(lift(&violations, -3, &AncestryCache::new()), violations);
    }

    #[test]
    fn drops_violations_beyond_chain_length() {
        let violations = vec![violation()];
        let cache = AncestryCache::build(&violations, &lookup());

        assert_eq!(lift(&violations, 2, &cache).len(), 1);
        assert!(lift(&violations, 3, &cache).is_empty());
        assert!(lift(&violations, 10, &cache).is_empty());
    }

    #[test]
    fn drops_when_only_one_side_is_too_shallow() {
        let shallow = Violation::between("v2", Node::new("a1", "a1"), Node::new("B", "B"));
        let violations = vec![shallow];
        let cache = AncestryCache::build(&violations, &lookup());

        assert!(lift(&violations, 1, &cache).is_empty());
    }

    #[test]
    fn missing_cache_entries_are_skipped() {
        let violations = vec![violation()];
        assert!(lift(&violations, 1, &AncestryCache::new()).is_empty());
    }

    #[test]
    fn unresolved_endpoints_are_skipped() {
        let mut no_target = violation();
        no_target.target_node = None;
        let mut no_source = violation();
        no_source.source_node = None;
        let violations = vec![no_target, violation(), no_source];
        let cache = AncestryCache::build(&violations, &lookup());

        let lifted = lift(&violations, 1, &cache);
        assert_eq!(lifted.len(), 1);
        assert_eq!(lifted[0].source, NodeId::from("A"));
    }
}
