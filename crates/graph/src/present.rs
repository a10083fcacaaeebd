use crate::grouping::decorate;
use crate::types::{DisplayGroup, Group};
use std::cmp::Reverse;

/// Decorate groups and order them largest first
///
/// The sort is stable: equally sized groups keep their grouping order.
pub fn present(groups: Vec<Group>) -> Vec<DisplayGroup> {
    let mut display = decorate(groups);
    display.sort_by_key(|group| Reverse(group.len()));
    display
}
