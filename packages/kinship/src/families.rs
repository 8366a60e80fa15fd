//! Family (maximal clique) discovery
//!
//! Brute force over index combinations, largest size first:
//!
//! ```text
//! members 0 1 2 3 4
//!
//! size 5: 0 1 2 3 4
//! size 4: 0 1 2 3 | 0 1 2 4 | 0 1 3 4 | 0 2 3 4 | 1 2 3 4
//! size 3: 0 1 2 | 0 1 3 | ...
//! ```
//!
//! If `1 2 3 4` was accepted there is no need to test `1 2 3` or `2 3 4`:
//! a combination contained in an accepted family is skipped, which is also
//! what keeps every result maximal. Families may overlap.
//!
//! Cost is exponential in family size. Shrink the graph with
//! [`crate::prune::prune`] first, or split it with [`families_by_group`].

use crate::error::Result;
use crate::graph::{Graph, NodeId};
use crate::pairs::{Combinations, PairEnumerator};
#[cfg(feature = "parallel")]
use rayon::prelude::*;
use tracing::{debug, trace};

/// Maximal families among all nodes of `graph`
pub fn families<K, V>(graph: &Graph<K, V>) -> Result<Vec<Vec<NodeId>>> {
    let members: Vec<NodeId> = graph.ids().collect();
    families_of(graph, &members)
}

/// Maximal families among `members` (edges to other nodes are ignored).
///
/// Each family lists its members in ascending `NodeId` order. Families come
/// largest first, then in lexicographic order. Nodes without any related
/// member form no family.
pub fn families_of<K, V>(graph: &Graph<K, V>, members: &[NodeId]) -> Result<Vec<Vec<NodeId>>> {
    let mut members = members.to_vec();
    members.sort_unstable();
    members.dedup();

    let related = RelationMatrix::new(graph, &members)?;
    let max_size = related.max_family_size();

    let mut accepted: Vec<Vec<usize>> = Vec::new();
    for size in (2..=max_size).rev() {
        let mut combinations = Combinations::new(members.len(), size);
        while let Some(combo) = combinations.advance() {
            if accepted.iter().any(|family| is_subset(combo, family.as_slice())) {
                continue;
            }
            if related.is_family(combo) {
                trace!("Accepted family of {} at {:?}", size, combo);
                accepted.push(combo.to_vec());
            }
        }
    }

    debug!(
        "Found {} families among {} nodes",
        accepted.len(),
        members.len()
    );

    Ok(accepted
        .into_iter()
        .map(|family| family.into_iter().map(|i| members[i]).collect())
        .collect())
}

/// Maximal families of `graph`, searched group by group.
///
/// Every node's [`Graph::group`] (itself plus its direct peers) is searched
/// independently, then the results are merged: duplicates collapse and
/// families contained in another are dropped. Same families as
/// [`families`], usually much cheaper on sparse graphs.
pub fn families_by_group<K, V>(graph: &Graph<K, V>) -> Result<Vec<Vec<NodeId>>>
where
    K: Sync,
    V: Sync,
{
    let groups = graph.groups();

    #[cfg(feature = "parallel")]
    let found = groups
        .par_iter()
        .map(|group| families_of(graph, group))
        .collect::<Result<Vec<_>>>()?;

    #[cfg(not(feature = "parallel"))]
    let found = groups
        .iter()
        .map(|group| families_of(graph, group))
        .collect::<Result<Vec<_>>>()?;

    let merged = merge_families(found.into_iter().flatten().collect());
    debug!(
        "Merged {} groups into {} families",
        groups.len(),
        merged.len()
    );
    Ok(merged)
}

/// Dedupe and drop families contained in a larger one. Members must be
/// sorted. Output is largest first, then lexicographic.
fn merge_families(mut families: Vec<Vec<NodeId>>) -> Vec<Vec<NodeId>> {
    families.sort_unstable_by(|a, b| b.len().cmp(&a.len()).then_with(|| a.cmp(b)));
    families.dedup();

    let mut merged: Vec<Vec<NodeId>> = Vec::with_capacity(families.len());
    for family in families {
        if !merged.iter().any(|kept| is_subset(family.as_slice(), kept.as_slice())) {
            merged.push(family);
        }
    }
    merged
}

/// Whether sorted `small` is contained in sorted `big`
fn is_subset<T: Ord>(small: &[T], big: &[T]) -> bool {
    if small.len() > big.len() {
        return false;
    }
    let mut rest = big.iter();
    small.iter().all(|x| rest.by_ref().any(|y| y == x))
}

/// Pairwise relatedness of a member list, computed once
struct RelationMatrix {
    n: usize,
    related: Vec<bool>,
}

impl RelationMatrix {
    fn new<K, V>(graph: &Graph<K, V>, members: &[NodeId]) -> Result<Self> {
        let n = members.len();
        let mut related = vec![false; n * n];
        for (i, j) in PairEnumerator::new(n) {
            if graph.is_related(members[i], members[j])? {
                related[i * n + j] = true;
                related[j * n + i] = true;
            }
        }
        Ok(Self { n, related })
    }

    fn get(&self, i: usize, j: usize) -> bool {
        self.related[i * self.n + j]
    }

    /// Upper bound on family size: highest degree + 1
    fn max_family_size(&self) -> usize {
        (0..self.n)
            .map(|i| (0..self.n).filter(|&j| self.get(i, j)).count() + 1)
            .max()
            .unwrap_or(0)
    }

    fn is_family(&self, combo: &[usize]) -> bool {
        combo
            .iter()
            .enumerate()
            .all(|(x, &i)| combo[x + 1..].iter().all(|&j| self.get(i, j)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::connect;
    use crate::prune::prune_by_key;

    fn ids(raw: &[usize]) -> Vec<NodeId> {
        raw.iter().copied().map(NodeId::new).collect()
    }

    /// Graph over `0..n` with the given undirected edges
    fn graph_with_edges(n: usize, edges: &[(usize, usize)]) -> Graph<usize, ()> {
        let mut graph = connect((0..n).collect::<Vec<_>>(), |_, _| ((), ()));
        prune_by_key(&mut graph, |a, b| {
            edges.contains(&(*a, *b)) || edges.contains(&(*b, *a))
        });
        graph
    }

    #[test]
    fn test_complete_graph_is_one_family() {
        let graph = connect(vec![1, 2, 3, 4], |_, _| ((), ()));
        assert_eq!(families(&graph).unwrap(), vec![ids(&[0, 1, 2, 3])]);
    }

    #[test]
    fn test_overlapping_triangles() {
        // 0-1-2 and 1-2-3 share the edge 1-2
        let graph = graph_with_edges(4, &[(0, 1), (0, 2), (1, 2), (1, 3), (2, 3)]);
        assert_eq!(
            families(&graph).unwrap(),
            vec![ids(&[0, 1, 2]), ids(&[1, 2, 3])]
        );
    }

    #[test]
    fn test_first_and_last_combinations_are_tested() {
        // first size-2 combination
        let graph = graph_with_edges(4, &[(0, 1)]);
        assert_eq!(families(&graph).unwrap(), vec![ids(&[0, 1])]);

        // last size-2 combination
        let graph = graph_with_edges(4, &[(2, 3)]);
        assert_eq!(families(&graph).unwrap(), vec![ids(&[2, 3])]);
    }

    #[test]
    fn test_isolated_nodes_form_no_family() {
        let graph = graph_with_edges(3, &[]);
        assert!(families(&graph).unwrap().is_empty());
        let empty = graph_with_edges(0, &[]);
        assert!(families(&empty).unwrap().is_empty());
    }

    #[test]
    fn test_families_of_subset_ignores_outsiders() {
        let graph = graph_with_edges(4, &[(0, 1), (0, 2), (1, 2), (2, 3)]);
        let found = families_of(&graph, &ids(&[2, 1, 3])).unwrap();
        assert_eq!(found, vec![ids(&[1, 2]), ids(&[2, 3])]);
    }

    #[test]
    fn test_families_by_group_matches_families() {
        let graph = graph_with_edges(
            7,
            &[(0, 1), (0, 2), (1, 2), (2, 3), (3, 4), (4, 5), (3, 5), (2, 4), (6, 0)],
        );
        assert_eq!(
            families_by_group(&graph).unwrap(),
            families(&graph).unwrap()
        );
    }

    #[test]
    fn test_one_way_edge_is_reported() {
        let mut graph = graph_with_edges(3, &[(0, 1)]);
        graph
            .node_mut(NodeId::new(2))
            .unwrap()
            .peers_mut()
            .insert(NodeId::new(1), ());
        assert!(families(&graph).unwrap_err().is_fatal());
    }

    #[test]
    fn test_is_subset() {
        assert!(is_subset(&[1, 3], &[1, 2, 3]));
        assert!(is_subset::<u8>(&[], &[1]));
        assert!(!is_subset(&[1, 4], &[1, 2, 3]));
        assert!(!is_subset(&[1, 2, 3], &[1, 2]));
    }

    #[test]
    fn test_merge_families_drops_contained() {
        let merged = merge_families(vec![
            ids(&[1, 2]),
            ids(&[0, 1, 2]),
            ids(&[0, 1, 2]),
            ids(&[3, 4]),
        ]);
        assert_eq!(merged, vec![ids(&[0, 1, 2]), ids(&[3, 4])]);
    }
}
