//! Graph construction
//!
//! - [`connect`] / [`connect_async`]: fully connected graph from keys
//! - [`map`] / [`map_async`]: same keys and topology, new weights
//!
//! Both visit pairs in [`PairEnumerator`] order. The async forms run the
//! derive callback on an [`OrderedPipeline`]; the collector writes each
//! result into the new graph on the calling thread, in pair order, as it
//! arrives.

use crate::config::PipelineConfig;
use crate::error::{BoxError, KinshipError, Result};
use crate::graph::{Graph, NodeId, PeerMap};
use crate::pairs::{pair_count, PairEnumerator};
use crate::pipeline::OrderedPipeline;
use tokio_util::sync::CancellationToken;
use tracing::debug;

/// Build a fully connected graph.
///
/// `derive(a, b)` returns the weights of `a -> b` and `b -> a`. It is
/// called once per pair, in pair order.
pub fn connect<K, V, I, D>(keys: I, mut derive: D) -> Graph<K, V>
where
    I: IntoIterator<Item = K>,
    D: FnMut(&K, &K) -> (V, V),
{
    let mut graph = Graph::from_keys(keys);
    debug!(
        "Connecting {} keys ({} pairs)",
        graph.len(),
        pair_count(graph.len())
    );

    for (i, j) in PairEnumerator::new(graph.len()) {
        let (a, b) = (NodeId::new(i), NodeId::new(j));
        let (ab, ba) = derive(graph.key(a), graph.key(b));
        graph.insert_edge_pair(a, b, ab, ba);
    }
    graph
}

/// Build a fully connected graph, running `derive` on `jobs` workers.
///
/// The first derive failure aborts the build; no partial graph is returned.
pub fn connect_async<K, V, E, D>(
    cancel: &CancellationToken,
    jobs: usize,
    keys: Vec<K>,
    derive: D,
) -> Result<Graph<K, V>>
where
    K: Sync,
    V: Send,
    E: Into<BoxError>,
    D: Fn(&K, &K) -> std::result::Result<(V, V), E> + Sync,
{
    GraphBuilder::new(PipelineConfig::default().with_jobs(jobs))?
        .with_cancellation(cancel.clone())
        .connect(keys, derive)
}

/// Rebuild `source` with new weights.
///
/// Only pairs connected in `source` are derived; every other pair stays
/// disconnected.
pub fn map<K, V1, V2, D>(source: &Graph<K, V1>, mut derive: D) -> Result<Graph<K, V2>>
where
    K: Clone,
    D: FnMut(&K, &K) -> (V2, V2),
{
    let mut graph = Graph::from_keys(source.keys().cloned());
    let mut derived = 0usize;

    for (i, j) in PairEnumerator::new(source.len()) {
        let (a, b) = (NodeId::new(i), NodeId::new(j));
        if source.is_related(a, b)? {
            let (ab, ba) = derive(source.key(a), source.key(b));
            graph.insert_edge_pair(a, b, ab, ba);
            derived += 1;
        }
    }

    debug!("Mapped {} nodes, {} edges", graph.len(), derived);
    Ok(graph)
}

/// [`map`] with `derive` running on `jobs` workers
pub fn map_async<K, V1, V2, E, D>(
    cancel: &CancellationToken,
    jobs: usize,
    source: &Graph<K, V1>,
    derive: D,
) -> Result<Graph<K, V2>>
where
    K: Clone + Sync,
    V1: Sync,
    V2: Send,
    E: Into<BoxError>,
    D: Fn(&K, &K) -> std::result::Result<(V2, V2), E> + Sync,
{
    GraphBuilder::new(PipelineConfig::default().with_jobs(jobs))?
        .with_cancellation(cancel.clone())
        .map(source, derive)
}

/// Concurrent builder bound to one pipeline configuration and
/// cancellation token
#[derive(Debug, Clone)]
pub struct GraphBuilder {
    pipeline: OrderedPipeline,
}

impl GraphBuilder {
    pub fn new(config: PipelineConfig) -> Result<Self> {
        Ok(Self {
            pipeline: OrderedPipeline::new(config)?,
        })
    }

    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.pipeline = self.pipeline.with_cancellation(token);
        self
    }

    /// Concurrent [`connect`]
    pub fn connect<K, V, E, D>(&self, keys: Vec<K>, derive: D) -> Result<Graph<K, V>>
    where
        K: Sync,
        V: Send,
        E: Into<BoxError>,
        D: Fn(&K, &K) -> std::result::Result<(V, V), E> + Sync,
    {
        let n = keys.len();
        debug!(
            "Connecting {} keys ({} pairs) on {} workers",
            n,
            pair_count(n),
            self.pipeline.config().jobs
        );

        // the workers borrow `keys`, so edges land in bare peer tables
        let mut peers: Vec<PeerMap<V>> = (0..n).map(|_| PeerMap::default()).collect();
        self.pipeline.run_with(
            PairEnumerator::new(n),
            |(i, j)| {
                derive(&keys[i], &keys[j])
                    .map(|(ab, ba)| (i, j, ab, ba))
                    .map_err(|e| KinshipError::derive(i, j, e))
            },
            |(i, j, ab, ba)| {
                peers[i].insert(NodeId::new(j), ab);
                peers[j].insert(NodeId::new(i), ba);
            },
        )?;

        Ok(Graph::from_parts(keys, peers))
    }

    /// Concurrent [`map`]. Disconnected pairs are never dispatched.
    pub fn map<K, V1, V2, E, D>(&self, source: &Graph<K, V1>, derive: D) -> Result<Graph<K, V2>>
    where
        K: Clone + Sync,
        V1: Sync,
        V2: Send,
        E: Into<BoxError>,
        D: Fn(&K, &K) -> std::result::Result<(V2, V2), E> + Sync,
    {
        let mut connected = Vec::new();
        for (i, j) in PairEnumerator::new(source.len()) {
            if source.is_related(NodeId::new(i), NodeId::new(j))? {
                connected.push((NodeId::new(i), NodeId::new(j)));
            }
        }
        debug!(
            "Mapping {} nodes, {} connected pairs on {} workers",
            source.len(),
            connected.len(),
            self.pipeline.config().jobs
        );

        let mut graph = Graph::from_keys(source.keys().cloned());
        self.pipeline.run_with(
            connected,
            |(a, b)| {
                derive(source.key(a), source.key(b))
                    .map(|(ab, ba)| (a, b, ab, ba))
                    .map_err(|e| KinshipError::derive(a.index(), b.index(), e))
            },
            |(a, b, ab, ba)| graph.insert_edge_pair(a, b, ab, ba),
        )?;
        Ok(graph)
    }
}
