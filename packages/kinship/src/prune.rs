//! Edge removal
//!
//! Edge filter ([`prune`] and its weight/key forms) and degree limiter
//! ([`limit_degree`]). Both only delete edges, always in both directions.

use crate::graph::{Graph, Node, NodeId, Peer};
use crate::pairs::PairEnumerator;
use std::cmp::Ordering;
use tracing::debug;

/// Disconnect nodes that don't "belong" together.
///
/// `belongs(a, b)` is asked about every existing direction of every pair
/// (`a -> b` and `b -> a` separately). If either answer is `false` the
/// edge is removed in both directions.
pub fn prune<K, V, F>(graph: &mut Graph<K, V>, mut belongs: F)
where
    F: FnMut(&Node<K, V>, &Node<K, V>) -> bool,
{
    let mut removed = 0usize;

    for (i, j) in PairEnumerator::new(graph.len()) {
        let (a, b) = (NodeId::new(i), NodeId::new(j));
        let (node_a, node_b) = (&graph[a], &graph[b]);
        let forward = node_a.peers().contains_key(&b);
        let backward = node_b.peers().contains_key(&a);
        if !forward && !backward {
            continue;
        }

        let keep = (!forward || belongs(node_a, node_b)) && (!backward || belongs(node_b, node_a));
        if !keep && graph.remove_edge(a, b) {
            removed += 1;
        }
    }

    debug!("Pruned {} edges, {} remain", removed, graph.edge_count());
}

/// [`prune`] on the weight of each direction
pub fn prune_by_weight<K, V, F>(graph: &mut Graph<K, V>, mut belongs: F)
where
    F: FnMut(&V) -> bool,
{
    prune(graph, |a, b| a.weight_to(b.id()).map_or(true, &mut belongs));
}

/// [`prune`] on the keys of each direction
pub fn prune_by_key<K, V, F>(graph: &mut Graph<K, V>, mut belongs: F)
where
    F: FnMut(&K, &K) -> bool,
{
    prune(graph, |a, b| belongs(a.key(), b.key()));
}

/// Cap the degree of `id` at `limit`.
///
/// Peers are ranked by `cmp` (peers ordering first rank highest, equal
/// peers keep `NodeId` order); the edges to every peer past `limit` are
/// removed in both directions.
pub fn limit_degree<K, V, F>(graph: &mut Graph<K, V>, id: NodeId, limit: usize, mut cmp: F)
where
    F: FnMut(&Peer<'_, K, V>, &Peer<'_, K, V>) -> Ordering,
{
    let excess: Vec<NodeId> = {
        let mut peers = graph.peers(id);
        if peers.len() <= limit {
            return;
        }
        peers.sort_by(|a, b| cmp(a, b));
        peers[limit..].iter().map(|p| p.id).collect()
    };

    for &peer in &excess {
        graph.remove_edge(id, peer);
    }
    debug!("Limited {} to {} peers, dropped {}", id, limit, excess.len());
}

/// [`limit_degree`] on every node, in graph order.
///
/// Edges dropped for an earlier node no longer count toward later ones.
pub fn limit_degrees<K, V, F>(graph: &mut Graph<K, V>, limit: usize, mut cmp: F)
where
    F: FnMut(&Peer<'_, K, V>, &Peer<'_, K, V>) -> Ordering,
{
    for i in 0..graph.len() {
        limit_degree(graph, NodeId::new(i), limit, &mut cmp);
    }
}
