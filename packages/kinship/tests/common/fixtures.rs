//! Test fixtures

use kinship::{connect, prune_by_key, Graph, NodeId};

/// Keys of the shared-character scenario
pub const SCENARIO_KEYS: [&str; 7] = ["a", "ab", "abc", "bce", "ca", "d", "e"];

/// First character of `x` that also appears in `y`, 0 if none
fn first_shared(x: &str, y: &str) -> u8 {
    x.bytes().find(|c| y.as_bytes().contains(c)).unwrap_or(0)
}

/// Derive for the scenario: first shared character in each direction
pub fn shared_char(x: &&str, y: &&str) -> (u8, u8) {
    (first_shared(x, y), first_shared(y, x))
}

/// Graph over keys `0..n` keeping only the edges `edges[i * n + j]` marks
/// (either orientation). Weights are `i * 100 + j` for `i -> j`.
pub fn graph_from_mask(n: usize, mask: &[bool]) -> Graph<usize, usize> {
    let mut graph = connect((0..n).collect::<Vec<_>>(), |a, b| (a * 100 + b, b * 100 + a));
    prune_by_key(&mut graph, |a, b| mask[a * n + b] || mask[b * n + a]);
    graph
}

/// Family members as sorted key lists, families sorted
pub fn key_sets<'a>(graph: &Graph<&'a str, u8>, families: &[Vec<NodeId>]) -> Vec<Vec<&'a str>> {
    let mut sets: Vec<Vec<&str>> = families
        .iter()
        .map(|family| {
            let mut keys: Vec<&str> = graph.keys_of(family).into_iter().copied().collect();
            keys.sort_unstable();
            keys
        })
        .collect();
    sets.sort();
    sets
}

/// Install a test subscriber honoring `RUST_LOG` (idempotent)
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}
