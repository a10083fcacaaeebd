use crate::types::{DisplayGroup, Group, PriorityClass, Violation};
use std::cmp::Ordering;
use std::collections::HashMap;

/// Partition violations by the label of their source node
///
/// Groups appear in first-seen order and keep items in input order. Distinct
/// nodes that share a label end up in the same group.
pub fn group(violations: &[Violation]) -> Vec<Group> {
    let mut groups: Vec<Group> = Vec::new();
    let mut positions: HashMap<&str, usize> = HashMap::new();

    for violation in violations {
        let label = violation.source_label();
        match positions.get(label) {
            Some(&pos) => groups[pos].items.push(violation.clone()),
            None => {
                positions.insert(label, groups.len());
                groups.push(Group {
                    label: label.to_string(),
                    items: vec![violation.clone()],
                });
            }
        }
    }

    groups
}

/// Mean group size (0 when there are no groups)
pub fn average_size(groups: &[Group]) -> f64 {
    if groups.is_empty() {
        return 0.0;
    }
    total_items(groups) as f64 / groups.len() as f64
}

/// Classify a group of `size` items against the mean of `total_items / group_count`
///
/// Compares `size * group_count` with `total_items` so ties are exact.
pub fn classify(size: usize, total_items: usize, group_count: usize) -> PriorityClass {
    let scaled = (size as u128) * (group_count as u128);
    match scaled.cmp(&(total_items as u128)) {
        Ordering::Greater => PriorityClass::High,
        Ordering::Equal => PriorityClass::Medium,
        Ordering::Less => PriorityClass::Low,
    }
}

/// Attach a priority to every group and decorate its label for display
pub fn decorate(groups: Vec<Group>) -> Vec<DisplayGroup> {
    let total = total_items(&groups);
    let count = groups.len();

    groups
        .into_iter()
        .map(|group| {
            let priority = classify(group.len(), total, count);
            DisplayGroup {
                label: format!("{} ({})", group.label, priority),
                base_label: group.label,
                priority,
                items: group.items,
            }
        })
        .collect()
}

fn total_items(groups: &[Group]) -> usize {
    groups.iter().map(Group::len).sum()
}
