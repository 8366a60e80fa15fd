//! Custom assertions for graph invariants

use kinship::{Graph, NodeId};

/// Assert the mutuality invariant over the whole graph
pub fn assert_mutual<K, V>(graph: &Graph<K, V>) {
    if let Err(err) = graph.validate() {
        panic!("Expected mutual edges, got: {err}");
    }
}

/// Assert every family is a clique and none is contained in another
pub fn assert_maximal_families<K, V>(graph: &Graph<K, V>, families: &[Vec<NodeId>]) {
    for family in families {
        assert!(
            graph.is_family(family).unwrap(),
            "Expected a clique, got {family:?}"
        );
    }
    for (i, a) in families.iter().enumerate() {
        for (j, b) in families.iter().enumerate() {
            if i != j {
                assert!(
                    !a.iter().all(|id| b.contains(id)),
                    "Family {a:?} is contained in {b:?}"
                );
            }
        }
    }
}

/// Assert `a` and `b` have identical keys, order and weights
pub fn assert_same_graph<K, V>(a: &Graph<K, V>, b: &Graph<K, V>)
where
    K: PartialEq + std::fmt::Debug,
    V: PartialEq + std::fmt::Debug,
{
    assert_eq!(a.keys().collect::<Vec<_>>(), b.keys().collect::<Vec<_>>());
    pretty_assertions::assert_eq!(a.edges(), b.edges());
}
