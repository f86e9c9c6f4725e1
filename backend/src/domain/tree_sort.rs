//! Display ordering over the group hierarchy.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::group::GroupKind;

/// Kinds numbered after the root's direct children.
const TREE_KINDS: [GroupKind; 5] = [
    GroupKind::District,
    GroupKind::Noncomp,
    GroupKind::Chapter,
    GroupKind::Chorus,
    GroupKind::Quartet,
];

/// Fields the tree sort reads from each group.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TreeNode {
    /// Group id.
    pub id: Uuid,
    /// Display name.
    pub name: String,
    /// Kind.
    pub kind: Option<GroupKind>,
    /// Legacy code.
    pub code: String,
    /// Parent group.
    pub parent_id: Option<Uuid>,
}

/// Compute `(group id, tree_sort)` assignments.
///
/// The international root gets 1. Its direct children follow, ordered by
/// `(kind, code, name)`. Every other district, noncompetitive group,
/// chapter, chorus and quartet follows, ordered by `(kind, name)`. Groups not
/// listed are left without a value. Returns an empty list when there is no
/// root.
pub fn compute_tree_sort(nodes: &[TreeNode]) -> Vec<(Uuid, i32)> {
    let Some(root) = nodes
        .iter()
        .find(|node| node.kind == Some(GroupKind::International))
    else {
        return Vec::new();
    };

    let kind_code = |node: &TreeNode| node.kind.map_or(i32::MAX, |kind| kind.code());

    let mut children: Vec<&TreeNode> = nodes
        .iter()
        .filter(|node| node.parent_id == Some(root.id) && node.id != root.id)
        .collect();
    children.sort_by(|a, b| {
        (kind_code(a), &a.code, &a.name).cmp(&(kind_code(b), &b.code, &b.name))
    });

    let mut assigned: HashSet<Uuid> = HashSet::new();
    let mut order: Vec<Uuid> = Vec::with_capacity(nodes.len());
    for node in std::iter::once(root).chain(children) {
        if assigned.insert(node.id) {
            order.push(node.id);
        }
    }

    let mut rest: Vec<&TreeNode> = nodes
        .iter()
        .filter(|node| node.kind.is_some_and(|kind| TREE_KINDS.contains(&kind)))
        .filter(|node| !assigned.contains(&node.id))
        .collect();
    rest.sort_by(|a, b| (kind_code(a), &a.name).cmp(&(kind_code(b), &b.name)));
    order.extend(rest.into_iter().map(|node| node.id));

    order
        .into_iter()
        .zip(1..)
        .collect()
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use rstest::rstest;

    use super::*;

    fn node(id: u128, name: &str, kind: GroupKind, code: &str, parent: Option<u128>) -> TreeNode {
        TreeNode {
            id: Uuid::from_u128(id),
            name: name.to_owned(),
            kind: Some(kind),
            code: code.to_owned(),
            parent_id: parent.map(Uuid::from_u128),
        }
    }

    fn sample() -> Vec<TreeNode> {
        vec![
            node(5, "Zebra Quartet", GroupKind::Quartet, "", Some(3)),
            node(2, "Far Western", GroupKind::District, "FWD", Some(1)),
            node(3, "Cardinal", GroupKind::District, "CAR", Some(1)),
            node(1, "Society", GroupKind::International, "BHS", None),
            node(4, "Alpha Quartet", GroupKind::Quartet, "", Some(2)),
            node(6, "Harmony Foundation", GroupKind::Affiliate, "HF", None),
            node(7, "Downtown", GroupKind::Chorus, "", Some(8)),
            node(8, "Downtown Chapter", GroupKind::Chapter, "J001", Some(2)),
            node(9, "Youth Outreach", GroupKind::Noncomp, "", Some(1)),
        ]
    }

    #[rstest]
    fn orders_root_children_then_remaining_kinds() {
        let sorted: HashMap<Uuid, i32> = compute_tree_sort(&sample()).into_iter().collect();
        let position = |id: u128| sorted.get(&Uuid::from_u128(id)).copied();

        assert_eq!(position(1), Some(1));
        assert_eq!(position(3), Some(2), "CAR sorts before FWD");
        assert_eq!(position(2), Some(3));
        assert_eq!(position(9), Some(4), "noncomp child follows districts");
        assert_eq!(position(8), Some(5));
        assert_eq!(position(7), Some(6));
        assert_eq!(position(4), Some(7));
        assert_eq!(position(5), Some(8));
        assert_eq!(position(6), None, "affiliates are not numbered");
    }

    #[rstest]
    fn assignments_are_unique_and_dense() {
        let sorted = compute_tree_sort(&sample());
        let values: HashSet<i32> = sorted.iter().map(|(_, value)| *value).collect();
        assert_eq!(values.len(), sorted.len());
        assert_eq!(values.iter().max().copied(), i32::try_from(sorted.len()).ok());
    }

    #[rstest]
    fn missing_root_yields_nothing() {
        let nodes = vec![node(4, "Alpha Quartet", GroupKind::Quartet, "", None)];
        assert!(compute_tree_sort(&nodes).is_empty());
    }
}
