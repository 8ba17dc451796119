//! Weighted adjacency-list graph with breadth-first, depth-first and
//! shortest-path searches.
//!
//! Vertices keep their insertion order, which fixes the neighbour order seen
//! by the traversals and the tie-break used by Dijkstra's minimum selection.

use std::collections::VecDeque;

use serde::{Serialize, Serializer, ser::SerializeMap};

use crate::{
    engine::Engine,
    error::{Error, Result},
    registry::EngineKind,
};

/// Weight used when an edge is added without one.
pub const DEFAULT_WEIGHT: f64 = 1.0;

/// One outgoing adjacency entry.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Edge {
    /// Neighbour vertex.
    pub node: String,
    /// Non-negative weight.
    pub weight: f64,
}

/// A vertex and its outgoing edges.
#[derive(Debug, Clone)]
struct Vertex {
    /// Identifier.
    id: String,
    /// Outgoing edges in insertion order. Parallel edges are kept.
    edges: Vec<Edge>,
}

/// An edge as exported in the flat edge list.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct EdgeView {
    /// Source vertex.
    pub from: String,
    /// Target vertex.
    pub to: String,
    /// Weight.
    pub weight: f64,
}

/// A tree edge followed by a traversal.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct Step {
    /// Vertex the edge leaves.
    pub from: String,
    /// Newly discovered vertex.
    pub to: String,
}

/// Result of a breadth- or depth-first traversal.
#[derive(Debug, Clone, Serialize, PartialEq, Eq, Default)]
pub struct Traversal {
    /// Vertices in visiting order.
    pub visited: Vec<String>,
    /// Discovery edges in the order they were taken.
    pub path: Vec<Step>,
}

/// Shortest-path outcome for one vertex.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ShortestPath {
    /// The vertex.
    pub vertex: String,
    /// Distance from the start; `None` (`null`) when unreachable.
    pub distance: Option<f64>,
    /// Predecessor on the shortest path, if any.
    pub previous: Option<String>,
    /// Vertices from the start to this one; empty when unreachable.
    pub path: Vec<String>,
}

/// Query view of a graph.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct GraphSnapshot {
    /// Vertex identifiers in insertion order.
    pub vertices: Vec<String>,
    /// Flat edge list; undirected edges appear once with `from <= to`.
    pub edges: Vec<EdgeView>,
    /// Whether edges are one-way.
    pub directed: bool,
    /// Adjacency lists keyed by vertex, in insertion order.
    #[serde(serialize_with = "ordered_map")]
    pub adjacency_list: Vec<(String, Vec<Edge>)>,
}

/// Serialize pairs as a JSON object without reordering keys.
fn ordered_map<S: Serializer>(
    pairs: &[(String, Vec<Edge>)],
    serializer: S,
) -> std::result::Result<S::Ok, S::Error> {
    let mut map = serializer.serialize_map(Some(pairs.len()))?;
    for (k, v) in pairs {
        map.serialize_entry(k, v)?;
    }
    map.end()
}

/// A directed or undirected weighted graph.
///
/// Undirected edges are stored in both endpoints' lists, except self-loops,
/// which are stored once.
#[derive(Debug, Clone, Default)]
pub struct Graph {
    /// Vertices in insertion order.
    vertices: Vec<Vertex>,
    /// Fixed at creation.
    directed: bool,
}

impl Graph {
    /// An empty graph.
    pub fn new(directed: bool) -> Self {
        Self {
            vertices: Vec::new(),
            directed,
        }
    }

    /// Whether edges are one-way.
    pub fn is_directed(&self) -> bool {
        self.directed
    }

    /// Position of a vertex.
    fn index_of(&self, id: &str) -> Option<usize> {
        self.vertices.iter().position(|v| v.id == id)
    }

    /// Position of a vertex, adding it if absent.
    fn ensure(&mut self, id: &str) -> usize {
        self.index_of(id).unwrap_or_else(|| {
            self.vertices.push(Vertex {
                id: id.to_string(),
                edges: Vec::new(),
            });
            self.vertices.len() - 1
        })
    }

    /// Add a vertex. Returns `false` if it already existed.
    pub fn add_vertex(&mut self, id: &str) -> bool {
        let before = self.vertices.len();
        self.ensure(id);
        self.vertices.len() > before
    }

    /// Add an edge, creating missing endpoints.
    pub fn add_edge(&mut self, from: &str, to: &str, weight: f64) -> Result<()> {
        if !weight.is_finite() || weight < 0.0 {
            return Err(Error::invalid(format!(
                "edge weight must be a finite non-negative number, got {weight}"
            )));
        }
        let a = self.ensure(from);
        let b = self.ensure(to);
        self.vertices[a].edges.push(Edge {
            node: to.to_string(),
            weight,
        });
        if !self.directed && a != b {
            self.vertices[b].edges.push(Edge {
                node: from.to_string(),
                weight,
            });
        }
        Ok(())
    }

    /// Remove a vertex and every edge touching it. Returns `false` if absent.
    pub fn remove_vertex(&mut self, id: &str) -> bool {
        let Some(i) = self.index_of(id) else {
            return false;
        };
        self.vertices.remove(i);
        for v in &mut self.vertices {
            v.edges.retain(|e| e.node != id);
        }
        true
    }

    /// Remove every edge between two vertices (both directions when undirected).
    /// Returns whether anything was removed.
    pub fn remove_edge(&mut self, from: &str, to: &str) -> bool {
        let mut removed = self.drop_edges(from, to);
        if !self.directed {
            removed |= self.drop_edges(to, from);
        }
        removed
    }

    /// Drop the one-way edges `from -> to`.
    fn drop_edges(&mut self, from: &str, to: &str) -> bool {
        let Some(i) = self.index_of(from) else {
            return false;
        };
        let edges = &mut self.vertices[i].edges;
        let before = edges.len();
        edges.retain(|e| e.node != to);
        edges.len() < before
    }

    /// Outgoing neighbour positions of vertex `i`, in edge order.
    fn neighbours(&self, i: usize) -> impl Iterator<Item = (usize, f64)> + '_ {
        self.vertices[i]
            .edges
            .iter()
            .filter_map(|e| self.index_of(&e.node).map(|j| (j, e.weight)))
    }

    /// Step record between two vertex positions.
    fn step(&self, from: usize, to: usize) -> Step {
        Step {
            from: self.vertices[from].id.clone(),
            to: self.vertices[to].id.clone(),
        }
    }

    /// Breadth-first traversal. Vertices are marked on discovery, so each
    /// appears once in both `visited` and the discovery edges.
    pub fn bfs(&self, start: &str) -> Traversal {
        let Some(s) = self.index_of(start) else {
            return Traversal::default();
        };
        let mut seen = vec![false; self.vertices.len()];
        let mut out = Traversal::default();
        let mut queue = VecDeque::from([s]);
        seen[s] = true;
        while let Some(v) = queue.pop_front() {
            out.visited.push(self.vertices[v].id.clone());
            for (w, _) in self.neighbours(v) {
                if !seen[w] {
                    seen[w] = true;
                    out.path.push(self.step(v, w));
                    queue.push_back(w);
                }
            }
        }
        out
    }

    /// Depth-first traversal in recursive pre-order, driven by an explicit
    /// stack of `(vertex, next edge)` frames.
    pub fn dfs(&self, start: &str) -> Traversal {
        let Some(s) = self.index_of(start) else {
            return Traversal::default();
        };
        let mut seen = vec![false; self.vertices.len()];
        let mut out = Traversal::default();
        let mut frames = vec![(s, 0usize)];
        seen[s] = true;
        out.visited.push(self.vertices[s].id.clone());
        while let Some(frame) = frames.last_mut() {
            let (v, next) = *frame;
            let Some(edge) = self.vertices[v].edges.get(next) else {
                frames.pop();
                continue;
            };
            frame.1 += 1;
            let Some(w) = self.index_of(&edge.node) else {
                continue;
            };
            if !seen[w] {
                seen[w] = true;
                out.visited.push(self.vertices[w].id.clone());
                out.path.push(self.step(v, w));
                frames.push((w, 0));
            }
        }
        out
    }

    /// Single-source shortest paths with *O*(V²) minimum selection.
    ///
    /// Ties in the minimum go to the earliest-inserted vertex. An unknown
    /// start leaves every vertex unreachable.
    pub fn dijkstra(&self, start: &str) -> Vec<ShortestPath> {
        let n = self.vertices.len();
        let mut dist: Vec<Option<f64>> = vec![None; n];
        let mut prev: Vec<Option<usize>> = vec![None; n];
        let mut done = vec![false; n];
        if let Some(s) = self.index_of(start) {
            dist[s] = Some(0.0);
        }

        loop {
            let mut current: Option<(usize, f64)> = None;
            for (i, d) in dist.iter().enumerate() {
                let Some(d) = *d else { continue };
                if !done[i] && current.is_none_or(|(_, best)| d < best) {
                    current = Some((i, d));
                }
            }
            let Some((u, du)) = current else {
                break;
            };
            done[u] = true;
            for (w, weight) in self.neighbours(u) {
                if done[w] {
                    continue;
                }
                let candidate = du + weight;
                if dist[w].is_none_or(|dw| candidate < dw) {
                    dist[w] = Some(candidate);
                    prev[w] = Some(u);
                }
            }
        }

        (0..n)
            .map(|i| ShortestPath {
                vertex: self.vertices[i].id.clone(),
                distance: dist[i],
                previous: prev[i].map(|p| self.vertices[p].id.clone()),
                path: self.path_to(i, &dist, &prev),
            })
            .collect()
    }

    /// Walk predecessors back from `target` to the start.
    fn path_to(&self, target: usize, dist: &[Option<f64>], prev: &[Option<usize>]) -> Vec<String> {
        if dist[target].is_none() {
            return Vec::new();
        }
        let mut path = vec![self.vertices[target].id.clone()];
        let mut cursor = prev[target];
        while let Some(p) = cursor {
            path.push(self.vertices[p].id.clone());
            cursor = prev[p];
        }
        path.reverse();
        path
    }

    /// Vertex identifiers in insertion order.
    pub fn vertex_ids(&self) -> Vec<String> {
        self.vertices.iter().map(|v| v.id.clone()).collect()
    }

    /// Flat edge list, each undirected edge once.
    pub fn edge_list(&self) -> Vec<EdgeView> {
        self.vertices
            .iter()
            .flat_map(|v| {
                v.edges
                    .iter()
                    .filter(|e| self.directed || v.id <= e.node)
                    .map(|e| EdgeView {
                        from: v.id.clone(),
                        to: e.node.clone(),
                        weight: e.weight,
                    })
            })
            .collect()
    }
}

impl Engine for Graph {
    const KIND: EngineKind = EngineKind::Graph;
    type Snapshot = GraphSnapshot;

    fn snapshot(&self) -> GraphSnapshot {
        GraphSnapshot {
            vertices: self.vertex_ids(),
            edges: self.edge_list(),
            directed: self.directed,
            adjacency_list: self
                .vertices
                .iter()
                .map(|v| (v.id.clone(), v.edges.clone()))
                .collect(),
        }
    }

    fn clear(&mut self) {
        self.vertices.clear();
    }
}
