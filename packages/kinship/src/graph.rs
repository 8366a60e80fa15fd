//! Graph model
//!
//! Nodes live in one arena (`Graph::nodes`) and are addressed by [`NodeId`].
//! Edges are stored on the source node as `NodeId -> weight`, so the edge
//! A->B is `graph[a].peers()[&b]`.
//!
//! Invariant: A->B exists iff B->A exists. Every operation in this crate
//! keeps it; raw access through [`Node::peers_mut`] can break it, and
//! [`Graph::validate`] / [`Graph::is_related`] report the breakage as
//! [`KinshipError::ConsistencyViolation`].

use crate::error::{KinshipError, Result};
use rustc_hash::FxHashMap;
use std::fmt;
use std::hash::Hash;
use std::ops::Index;

/// Position of a node inside its graph
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(transparent)]
pub struct NodeId(usize);

impl NodeId {
    pub const fn new(index: usize) -> Self {
        Self(index)
    }

    pub const fn index(self) -> usize {
        self.0
    }
}

impl From<usize> for NodeId {
    fn from(index: usize) -> Self {
        Self(index)
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Outgoing edges of a node
pub type PeerMap<V> = FxHashMap<NodeId, V>;

/// A graph participant and its outgoing edges
#[derive(Debug, Clone)]
pub struct Node<K, V> {
    id: NodeId,
    key: K,
    peers: PeerMap<V>,
}

impl<K, V> Node<K, V> {
    fn new(id: NodeId, key: K) -> Self {
        Self {
            id,
            key,
            peers: PeerMap::default(),
        }
    }

    pub fn id(&self) -> NodeId {
        self.id
    }

    pub fn key(&self) -> &K {
        &self.key
    }

    pub fn peers(&self) -> &PeerMap<V> {
        &self.peers
    }

    /// Raw edge access. Does not maintain mutuality.
    pub fn peers_mut(&mut self) -> &mut PeerMap<V> {
        &mut self.peers
    }

    /// Weight of the edge `self -> to`
    pub fn weight_to(&self, to: NodeId) -> Option<&V> {
        self.peers.get(&to)
    }

    pub fn degree(&self) -> usize {
        self.peers.len()
    }
}

/// Borrowed view of one outgoing edge
#[derive(Debug)]
pub struct Peer<'a, K, V> {
    pub id: NodeId,
    pub key: &'a K,
    pub weight: &'a V,
}

impl<K, V> Clone for Peer<'_, K, V> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<K, V> Copy for Peer<'_, K, V> {}

/// Ordered node arena produced by one build or transform call
#[derive(Debug, Clone)]
pub struct Graph<K, V> {
    nodes: Vec<Node<K, V>>,
}

impl<K, V> Graph<K, V> {
    /// Edge-less graph, one node per key, in key order
    pub(crate) fn from_keys<I>(keys: I) -> Self
    where
        I: IntoIterator<Item = K>,
    {
        let nodes = keys
            .into_iter()
            .enumerate()
            .map(|(i, key)| Node::new(NodeId(i), key))
            .collect();
        Self { nodes }
    }

    /// Assemble a graph from keys and their already-mutual peer tables
    pub(crate) fn from_parts(keys: Vec<K>, peers: Vec<PeerMap<V>>) -> Self {
        let nodes = keys
            .into_iter()
            .zip(peers)
            .enumerate()
            .map(|(i, (key, peers))| Node {
                id: NodeId(i),
                key,
                peers,
            })
            .collect();
        Self { nodes }
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn nodes(&self) -> &[Node<K, V>] {
        &self.nodes
    }

    pub fn get(&self, id: NodeId) -> Option<&Node<K, V>> {
        self.nodes.get(id.0)
    }

    /// Raw node access. Edge changes made here do not maintain mutuality.
    pub fn node_mut(&mut self, id: NodeId) -> Option<&mut Node<K, V>> {
        self.nodes.get_mut(id.0)
    }

    pub fn ids(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.nodes.iter().map(|n| n.id)
    }

    pub fn keys(&self) -> impl Iterator<Item = &K> + '_ {
        self.nodes.iter().map(|n| &n.key)
    }

    /// Number of mutual edges (each counted once)
    pub fn edge_count(&self) -> usize {
        self.nodes.iter().map(|n| n.peers.len()).sum::<usize>() / 2
    }

    /// All directed edges as `(from, to, weight)`, sorted by `(from, to)`
    pub fn edges(&self) -> Vec<(NodeId, NodeId, &V)> {
        let mut edges: Vec<_> = self
            .nodes
            .iter()
            .flat_map(|n| n.peers.iter().map(move |(&to, w)| (n.id, to, w)))
            .collect();
        edges.sort_unstable_by_key(|&(from, to, _)| (from, to));
        edges
    }

    /// Record both directions of the pair `a`/`b`
    pub(crate) fn insert_edge_pair(&mut self, a: NodeId, b: NodeId, ab: V, ba: V) {
        self.nodes[a.0].peers.insert(b, ab);
        self.nodes[b.0].peers.insert(a, ba);
    }

    /// Delete both directions of the edge between `a` and `b`.
    /// Returns whether anything was removed.
    pub(crate) fn remove_edge(&mut self, a: NodeId, b: NodeId) -> bool {
        let forward = self.nodes[a.0].peers.remove(&b).is_some();
        let backward = self.nodes[b.0].peers.remove(&a).is_some();
        forward || backward
    }

    /// Whether `a` and `b` point at each other.
    ///
    /// An edge in only one direction is a [`KinshipError::ConsistencyViolation`].
    pub fn is_related(&self, a: NodeId, b: NodeId) -> Result<bool> {
        let forward = self.nodes[a.0].peers.contains_key(&b);
        let backward = self.nodes[b.0].peers.contains_key(&a);
        match (forward, backward) {
            (true, true) => Ok(true),
            (false, false) => Ok(false),
            (true, false) => Err(KinshipError::ConsistencyViolation { from: a, to: b }),
            (false, true) => Err(KinshipError::ConsistencyViolation { from: b, to: a }),
        }
    }

    /// Whether every pair of `members` is related (a clique)
    pub fn is_family(&self, members: &[NodeId]) -> Result<bool> {
        for (i, &a) in members.iter().enumerate() {
            for &b in &members[i + 1..] {
                if !self.is_related(a, b)? {
                    return Ok(false);
                }
            }
        }
        Ok(true)
    }

    /// Full-graph mutuality check
    pub fn validate(&self) -> Result<()> {
        for node in &self.nodes {
            for &peer in node.peers.keys() {
                let reverse = self
                    .nodes
                    .get(peer.0)
                    .map_or(false, |p| p.peers.contains_key(&node.id));
                if !reverse {
                    return Err(KinshipError::ConsistencyViolation {
                        from: node.id,
                        to: peer,
                    });
                }
            }
        }
        Ok(())
    }

    /// Outgoing edges of `id` in `NodeId` order
    pub fn peers(&self, id: NodeId) -> Vec<Peer<'_, K, V>> {
        let mut peers: Vec<_> = self.nodes[id.0]
            .peers
            .iter()
            .map(|(&peer, weight)| Peer {
                id: peer,
                key: &self.nodes[peer.0].key,
                weight,
            })
            .collect();
        peers.sort_unstable_by_key(|p| p.id);
        peers
    }

    /// Fold over the outgoing edges of `id`, in `NodeId` order
    pub fn fold_peers<A, F>(&self, id: NodeId, init: A, f: F) -> A
    where
        F: FnMut(A, Peer<'_, K, V>) -> A,
    {
        self.peers(id).into_iter().fold(init, f)
    }

    /// `id` together with its direct peers, ascending
    pub fn group(&self, id: NodeId) -> Vec<NodeId> {
        let node = &self.nodes[id.0];
        let mut group = Vec::with_capacity(node.peers.len() + 1);
        group.push(id);
        group.extend(node.peers.keys().copied());
        group.sort_unstable();
        group
    }

    /// One [`Graph::group`] per node, in graph order
    pub fn groups(&self) -> Vec<Vec<NodeId>> {
        self.ids().map(|id| self.group(id)).collect()
    }

    /// Key of `id`
    pub fn key(&self, id: NodeId) -> &K {
        &self.nodes[id.0].key
    }

    /// Keys of `members`, in the given order
    pub fn keys_of(&self, members: &[NodeId]) -> Vec<&K> {
        members.iter().map(|&id| self.key(id)).collect()
    }
}

impl<K: Eq + Hash, V> Graph<K, V> {
    /// Key -> node lookup table
    pub fn as_map(&self) -> FxHashMap<&K, NodeId> {
        self.nodes.iter().map(|n| (&n.key, n.id)).collect()
    }

    /// Peer key -> weight table for the outgoing edges of `id`
    pub fn peer_weights(&self, id: NodeId) -> FxHashMap<&K, &V> {
        self.nodes[id.0]
            .peers
            .iter()
            .map(|(&peer, weight)| (&self.nodes[peer.0].key, weight))
            .collect()
    }
}

impl<K, V> Index<NodeId> for Graph<K, V> {
    type Output = Node<K, V>;

    fn index(&self, id: NodeId) -> &Self::Output {
        &self.nodes[id.0]
    }
}
