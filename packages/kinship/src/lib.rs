/*
 * Kinship - Peer Graphs and Family Discovery
 *
 * Builds a weighted graph over caller-chosen keys from a pairwise derive
 * function, then finds the maximal fully-connected groups ("families").
 *
 * Flow:
 * - builder/   : keys + derive -> fully connected graph (sync or pipelined)
 * - prune/     : drop edges by predicate, cap node degrees
 * - families/  : maximal clique enumeration
 * - coagulate/ : trim every node down to its own family
 * - builder/   : remap weights over the final topology
 *
 * Concurrency:
 * - OrderedPipeline: bounded workers, results in input order
 * - First failure wins, cancellation through CancellationToken
 */

pub mod builder;
pub mod coagulate;
pub mod config;
pub mod error;
pub mod families;
pub mod graph;
pub mod pairs;
pub mod pipeline;
pub mod prune;

// Re-exports
pub use builder::{connect, connect_async, map, map_async, GraphBuilder};
pub use coagulate::coagulate;
pub use config::PipelineConfig;
pub use error::{BoxError, ErrorKind, KinshipError, Result};
pub use families::{families, families_by_group, families_of};
pub use graph::{Graph, Node, NodeId, Peer, PeerMap};
pub use pairs::{pair_count, Combinations, PairEnumerator};
pub use pipeline::{ordered_map, OrderedPipeline};
pub use prune::{limit_degree, limit_degrees, prune, prune_by_key, prune_by_weight};

pub use tokio_util::sync::CancellationToken;
