//! Coagulation: cut every tie beyond a node's own family.
//!
//! Families are applied in order. A family with any member already claimed
//! by an earlier family is skipped and causes no edge changes. Otherwise
//! each member loses its edges to non-members (in both directions) and all
//! members become claimed.

use crate::graph::{Graph, NodeId};
use rustc_hash::FxHashSet;
use tracing::{debug, trace};

/// Restrict `graph` to the internal edges of the accepted `families`.
///
/// `families` is usually the output of [`crate::families`]; order is
/// precedence.
pub fn coagulate<K, V>(graph: &mut Graph<K, V>, families: &[Vec<NodeId>]) {
    let mut claimed: FxHashSet<NodeId> = FxHashSet::default();
    let mut accepted = 0usize;
    let mut removed = 0usize;

    for (index, family) in families.iter().enumerate() {
        if family.iter().any(|id| claimed.contains(id)) {
            trace!("Skipping family {}: member already claimed", index);
            continue;
        }

        let members: FxHashSet<NodeId> = family.iter().copied().collect();
        for &member in family {
            let outsiders: Vec<NodeId> = graph[member]
                .peers()
                .keys()
                .filter(|peer| !members.contains(peer))
                .copied()
                .collect();
            for peer in outsiders {
                if graph.remove_edge(member, peer) {
                    removed += 1;
                }
            }
        }

        claimed.extend(members);
        accepted += 1;
    }

    debug!(
        "Coagulated {} of {} families, removed {} edges",
        accepted,
        families.len(),
        removed
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::connect;
    use crate::families::families;
    use crate::prune::prune_by_key;

    fn ids(raw: &[usize]) -> Vec<NodeId> {
        raw.iter().copied().map(NodeId::new).collect()
    }

    /// 0-1-2 triangle, 2-3-4 triangle, 4-5 edge
    fn chain() -> Graph<usize, ()> {
        let edges = [(0, 1), (0, 2), (1, 2), (2, 3), (2, 4), (3, 4), (4, 5)];
        let mut graph = connect((0..6).collect::<Vec<_>>(), |_, _| ((), ()));
        prune_by_key(&mut graph, |a, b| {
            edges.contains(&(*a, *b)) || edges.contains(&(*b, *a))
        });
        graph
    }

    #[test]
    fn test_first_family_claims_shared_node() {
        let mut graph = chain();
        let found = families(&graph).unwrap();
        assert_eq!(found, vec![ids(&[0, 1, 2]), ids(&[2, 3, 4]), ids(&[4, 5])]);

        coagulate(&mut graph, &found);

        assert!(graph.validate().is_ok());
        // {0,1,2} accepted, {2,3,4} skipped, {4,5} accepted: 3 loses
        // 2 to the first family and 4 to the last one
        assert_eq!(graph.group(NodeId::new(2)), ids(&[0, 1, 2]));
        assert_eq!(graph.group(NodeId::new(4)), ids(&[4, 5]));
        assert_eq!(graph[NodeId::new(3)].degree(), 0);
        assert_eq!(graph.edge_count(), 3 + 1);
    }

    #[test]
    fn test_order_is_precedence() {
        let mut graph = chain();
        coagulate(&mut graph, &[ids(&[2, 3, 4]), ids(&[0, 1, 2]), ids(&[4, 5])]);

        assert!(graph.validate().is_ok());
        assert_eq!(graph.group(NodeId::new(2)), ids(&[2, 3, 4]));
        assert_eq!(graph.group(NodeId::new(4)), ids(&[2, 3, 4]));
        // 0-1 survives: its family was skipped, and neither node was claimed
        assert!(graph.is_related(NodeId::new(0), NodeId::new(1)).unwrap());
        assert_eq!(graph[NodeId::new(5)].degree(), 0);
    }

    #[test]
    fn test_empty_family_list_is_noop() {
        let mut graph = chain();
        let before = graph.edge_count();
        coagulate(&mut graph, &[]);
        assert_eq!(graph.edge_count(), before);
    }
}
