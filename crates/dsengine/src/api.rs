//! HTTP-shaped request router over a [`Registry`].
//!
//! [`handle`] takes a method, a path under `/api` and a JSON body, runs the
//! addressed operation and returns a status code with a JSON body. It does no
//! I/O, so the same router serves the HTTP transport, request scripts and
//! tests.
//!
//! Successful mutations answer `success: true`, the engine's state under the
//! engine's field name (`stack`, `queue`, `list`, `tree`, `graph`,
//! `hashTable`) and a `message`. Failures answer `success: false` and an
//! `error` message with the status from [`Error::status`].

use std::{fmt, str::FromStr};

use serde_json::{Value as Json, json};
use tracing::debug;

use crate::{
    engine::Instance,
    engines::{
        bst::{BinarySearchTree, TraversalOrder},
        graph::{DEFAULT_WEIGHT, Graph},
        huffman::Huffman,
        queue::Queue,
        stack::Stack,
        tsp::{Algorithm, City, Tsp},
    },
    error::{Error, Result},
    registry::{CreateOptions, EngineKind, Registry},
    value::Value,
};

/// Request methods the router understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    /// Read-only query.
    Get,
    /// Create or mutate.
    Post,
    /// Remove a graph vertex or edge.
    Delete,
}

impl Method {
    /// Upper-case method name.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Delete => "DELETE",
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Method {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_uppercase().as_str() {
            "GET" => Ok(Self::Get),
            "POST" => Ok(Self::Post),
            "DELETE" => Ok(Self::Delete),
            _ => Err(Error::invalid(format!("unsupported method '{s}'"))),
        }
    }
}

/// Status code and JSON body of a handled request.
#[derive(Debug, Clone, PartialEq)]
pub struct Response {
    /// HTTP-style status code.
    pub status: u16,
    /// Response body.
    pub body: Json,
}

impl Response {
    /// Whether the status is 200.
    pub fn is_success(&self) -> bool {
        self.status == 200
    }
}

impl From<Error> for Response {
    fn from(err: Error) -> Self {
        Self {
            status: err.status(),
            body: json!({ "success": false, "error": err.to_string() }),
        }
    }
}

/// Per-kind response vocabulary.
struct Surface {
    /// Field carrying the engine state in responses.
    field: &'static str,
    /// Whether a plain query returns the snapshot's fields at top level.
    flat_query: bool,
    /// Message after a reset.
    cleared: &'static str,
}

/// Response vocabulary of an engine kind.
fn surface(kind: EngineKind) -> Surface {
    let (field, flat_query, cleared) = match kind {
        EngineKind::Stack => ("stack", true, "Stack cleared"),
        EngineKind::Queue => ("queue", true, "Queue cleared"),
        EngineKind::SinglyList | EngineKind::DoublyList => ("list", true, "List cleared"),
        EngineKind::PriorityQueue => ("queue", true, "Priority queue cleared"),
        EngineKind::HeapPriorityQueue => ("queue", true, "Heap priority queue cleared"),
        EngineKind::Bst => ("tree", true, "Tree cleared"),
        EngineKind::Graph => ("graph", false, "Graph cleared"),
        EngineKind::ChainingTable | EngineKind::ProbingTable => {
            ("hashTable", false, "Hash table cleared")
        }
        EngineKind::Huffman => ("huffman", false, "Huffman tree cleared"),
        EngineKind::Tsp => ("tsp", false, "TSP instance cleared"),
    };
    Surface {
        field,
        flat_query,
        cleared,
    }
}

/// State reported under the engine's field after a mutation.
fn state(instance: &Instance) -> Json {
    match instance {
        Instance::Stack(s) => json!(s.items()),
        Instance::Queue(q) => json!(q.items()),
        Instance::SinglyList(l) => json!(l.values()),
        Instance::DoublyList(l) => json!(l.linked_nodes()),
        Instance::PriorityQueue(pq) => json!(pq.entries()),
        Instance::HeapPriorityQueue(pq) => json!(pq.entries()),
        Instance::Bst(t) => json!(t.structure()),
        other => other.snapshot(),
    }
}

/// Standard success body: state under the engine's field plus a message.
fn mutated(kind: EngineKind, instance: &Instance, message: String) -> Json {
    let mut body = json!({ "success": true, "message": message });
    body[surface(kind).field] = state(instance);
    body
}

/// One request in flight.
struct Request<'a> {
    /// Method used.
    method: Method,
    /// Full request path.
    path: &'a str,
    /// Parsed body; `Null` when absent.
    body: &'a Json,
}

impl Request<'_> {
    /// Reject the request unless it used `method`.
    fn require(&self, method: Method) -> Result<()> {
        if self.method == method {
            Ok(())
        } else {
            Err(Error::MethodNotAllowed {
                method: self.method.to_string(),
                path: self.path.to_string(),
            })
        }
    }

    /// Error for a path no route matches.
    fn unknown_route(&self) -> Error {
        Error::not_found("Route", self.path)
    }

    /// A body field that must be present and non-null.
    fn field(&self, name: &str) -> Result<&Json> {
        self.body
            .get(name)
            .filter(|v| !v.is_null())
            .ok_or_else(|| Error::invalid(format!("missing field '{name}'")))
    }

    /// A number-or-string payload field.
    fn value(&self, name: &str) -> Result<Value> {
        Value::from_json(self.field(name)?)
    }

    /// A number-or-string field used as an identifier, e.g. a key or vertex.
    fn name(&self, name: &str) -> Result<String> {
        Ok(self.value(name)?.to_string())
    }

    /// An integral field.
    fn integer(&self, name: &str) -> Result<i64> {
        let v = self.field(name)?;
        v.as_i64()
            .or_else(|| {
                v.as_f64()
                    .filter(|f| f.fract() == 0.0 && f.abs() < 9.0e15)
                    .map(|f| f as i64)
            })
            .ok_or_else(|| Error::invalid(format!("field '{name}' must be an integer, got {v}")))
    }

    /// An optional string field; absent or null reads as empty.
    fn text(&self, name: &str) -> Result<&str> {
        match self.body.get(name) {
            None | Some(Json::Null) => Ok(""),
            Some(Json::String(s)) => Ok(s),
            Some(other) => Err(Error::invalid(format!(
                "field '{name}' must be a string, got {other}"
            ))),
        }
    }
}

/// Parse a raw request body. Blank input reads as `null`.
pub fn parse_body(raw: &str) -> Result<Json> {
    if raw.trim().is_empty() {
        return Ok(Json::Null);
    }
    serde_json::from_str(raw).map_err(|e| Error::invalid(format!("malformed JSON body: {e}")))
}

/// Route one request against `registry`.
pub fn handle(registry: &mut Registry, method: Method, path: &str, body: &Json) -> Response {
    let req = Request { method, path, body };
    let response = match route(registry, &req) {
        Ok(body) => Response { status: 200, body },
        Err(err) => Response::from(err),
    };
    debug!(%method, path, status = response.status, "request handled");
    response
}

/// Match the path to an engine namespace.
fn route(reg: &mut Registry, req: &Request<'_>) -> Result<Json> {
    let path = req.path.split('?').next().unwrap_or_default();
    let segs: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();
    let (kind, rest) = match segs.as_slice() {
        ["api", "health"] => {
            req.require(Method::Get)?;
            return Ok(json!({ "status": "Server is running!" }));
        }
        ["api", "stack", rest @ ..] => (EngineKind::Stack, rest),
        ["api", "queue", rest @ ..] => (EngineKind::Queue, rest),
        ["api", "linked-list", "singly", rest @ ..] => (EngineKind::SinglyList, rest),
        ["api", "linked-list", "doubly", rest @ ..] => (EngineKind::DoublyList, rest),
        ["api", "priority-queue", "heap", rest @ ..] if !rest.is_empty() => {
            (EngineKind::HeapPriorityQueue, rest)
        }
        ["api", "priority-queue", rest @ ..] => (EngineKind::PriorityQueue, rest),
        ["api", "binary-tree", rest @ ..] => (EngineKind::Bst, rest),
        ["api", "graph", rest @ ..] => (EngineKind::Graph, rest),
        ["api", "hash-table", "linear-probing", rest @ ..] if !rest.is_empty() => {
            (EngineKind::ProbingTable, rest)
        }
        ["api", "hash-table", rest @ ..] => (EngineKind::ChainingTable, rest),
        ["api", "huffman", rest @ ..] => (EngineKind::Huffman, rest),
        ["api", "tsp", rest @ ..] => (EngineKind::Tsp, rest),
        _ => return Err(req.unknown_route()),
    };

    match rest {
        ["create", id] => {
            req.require(Method::Post)?;
            create(reg, req, kind, id)
        }
        [id] => {
            req.require(Method::Get)?;
            query(reg, kind, id)
        }
        [id, "clear"] => {
            req.require(Method::Post)?;
            let instance = reg.get_mut(kind, id)?;
            instance.clear();
            Ok(mutated(kind, instance, surface(kind).cleared.to_string()))
        }
        [id, op @ ..] => match kind {
            EngineKind::Stack => stack(reg, req, id, op),
            EngineKind::Queue => queue(reg, req, id, op),
            EngineKind::SinglyList | EngineKind::DoublyList => list(reg, req, kind, id, op),
            EngineKind::PriorityQueue | EngineKind::HeapPriorityQueue => {
                priority_queue(reg, req, kind, id, op)
            }
            EngineKind::Bst => tree(reg, req, id, op),
            EngineKind::Graph => graph(reg, req, id, op),
            EngineKind::ChainingTable | EngineKind::ProbingTable => {
                hash_table(reg, req, kind, id, op)
            }
            EngineKind::Huffman => huffman(reg, req, id, op),
            EngineKind::Tsp => tsp(reg, req, id, op),
        },
        [] => Err(req.unknown_route()),
    }
}

/// Create (or replace) an instance.
fn create(reg: &mut Registry, req: &Request<'_>, kind: EngineKind, id: &str) -> Result<Json> {
    let mut options = CreateOptions::default();
    if let Some(directed) = req.body.get("directed").and_then(Json::as_bool) {
        options.directed = directed;
    }
    if req.body.get("size").is_some_and(|v| !v.is_null()) {
        let size = req.integer("size")?;
        options.table_size = usize::try_from(size)
            .map_err(|_| Error::invalid(format!("table size must be positive, got {size}")))?;
    }
    let message = match kind {
        EngineKind::Stack => "Stack created".to_string(),
        EngineKind::Queue => "Queue created".to_string(),
        EngineKind::SinglyList => "Singly linked list created".to_string(),
        EngineKind::DoublyList => "Doubly linked list created".to_string(),
        EngineKind::PriorityQueue => "Priority queue created".to_string(),
        EngineKind::HeapPriorityQueue => "Heap priority queue created".to_string(),
        EngineKind::Bst => "Binary tree created".to_string(),
        EngineKind::Graph => format!(
            "{} graph created",
            if options.directed { "Directed" } else { "Undirected" }
        ),
        EngineKind::ChainingTable => format!(
            "Hash table created with chaining ({} buckets)",
            options.table_size
        ),
        EngineKind::ProbingTable => format!(
            "Hash table created with linear probing ({} slots)",
            options.table_size
        ),
        EngineKind::Huffman => "Huffman coding instance created".to_string(),
        EngineKind::Tsp => "TSP instance created".to_string(),
    };
    let instance = reg.create(kind, id, &options)?;
    Ok(mutated(kind, instance, message))
}

/// Full snapshot of an instance.
fn query(reg: &Registry, kind: EngineKind, id: &str) -> Result<Json> {
    let snapshot = reg.get(kind, id)?.snapshot();
    let surface = surface(kind);
    match snapshot {
        Json::Object(mut fields) if surface.flat_query => {
            fields.insert("success".into(), Json::Bool(true));
            Ok(Json::Object(fields))
        }
        other => Ok(json!({ "success": true, surface.field: other })),
    }
}

/// Stack operations.
fn stack(reg: &mut Registry, req: &Request<'_>, id: &str, op: &[&str]) -> Result<Json> {
    match op {
        ["push"] => {
            req.require(Method::Post)?;
            let stack = reg.engine_mut::<Stack>(id)?;
            let value = req.value("value")?;
            let message = format!("Pushed {value}");
            let items = stack.push(value)?;
            Ok(json!({
                "success": true,
                "stack": items,
                "message": message,
                "operation": "push",
            }))
        }
        ["pop"] => {
            req.require(Method::Post)?;
            let stack = reg.engine_mut::<Stack>(id)?;
            let popped = stack.pop()?;
            Ok(json!({
                "success": true,
                "stack": stack.items(),
                "message": format!("Popped {popped}"),
                "poppedValue": popped,
                "operation": "pop",
            }))
        }
        ["peek"] => {
            req.require(Method::Get)?;
            let top = reg.engine::<Stack>(id)?.peek()?;
            Ok(json!({
                "success": true,
                "topValue": top,
                "message": format!("Top element: {top}"),
            }))
        }
        _ => Err(req.unknown_route()),
    }
}

/// Queue operations.
fn queue(reg: &mut Registry, req: &Request<'_>, id: &str, op: &[&str]) -> Result<Json> {
    match op {
        ["enqueue"] => {
            req.require(Method::Post)?;
            let queue = reg.engine_mut::<Queue>(id)?;
            let value = req.value("value")?;
            let message = format!("Enqueued {value}");
            let items = queue.enqueue(value)?;
            Ok(json!({
                "success": true,
                "queue": items,
                "message": message,
                "operation": "enqueue",
            }))
        }
        ["dequeue"] => {
            req.require(Method::Post)?;
            let queue = reg.engine_mut::<Queue>(id)?;
            let value = queue.dequeue()?;
            Ok(json!({
                "success": true,
                "queue": queue.items(),
                "message": format!("Dequeued {value}"),
                "dequeuedValue": value,
                "operation": "dequeue",
            }))
        }
        ["front"] => {
            req.require(Method::Get)?;
            let front = reg.engine::<Queue>(id)?.front()?;
            Ok(json!({
                "success": true,
                "frontValue": front,
                "message": format!("Front element: {front}"),
            }))
        }
        _ => Err(req.unknown_route()),
    }
}

/// Linked-list operations, shared by both variants.
fn list(
    reg: &mut Registry,
    req: &Request<'_>,
    kind: EngineKind,
    id: &str,
    op: &[&str],
) -> Result<Json> {
    let [op] = op else {
        return Err(req.unknown_route());
    };
    if !matches!(*op, "append" | "prepend" | "delete" | "find") {
        return Err(req.unknown_route());
    }
    req.require(Method::Post)?;
    let instance = reg.get_mut(kind, id)?;
    let value = req.value("value")?;

    if *op == "find" {
        let found = match &*instance {
            Instance::SinglyList(l) => l.find(&value),
            Instance::DoublyList(l) => l.find(&value),
            _ => return Err(Error::not_found(kind.display(), id)),
        };
        let message = match found.index {
            Some(i) => format!("Found {value} at index {i}"),
            None => format!("{value} not found"),
        };
        return Ok(json!({
            "success": true,
            "found": found.found,
            "index": found.index,
            "message": message,
        }));
    }

    let message = match (*op, &mut *instance) {
        ("append", Instance::SinglyList(l)) => {
            l.append(value.clone());
            format!("Appended {value}")
        }
        ("append", Instance::DoublyList(l)) => {
            l.append(value.clone());
            format!("Appended {value}")
        }
        ("prepend", Instance::SinglyList(l)) => {
            l.prepend(value.clone());
            format!("Prepended {value}")
        }
        ("prepend", Instance::DoublyList(l)) => {
            l.prepend(value.clone());
            format!("Prepended {value}")
        }
        ("delete", Instance::SinglyList(l)) => deleted_message(l.delete(&value), &value),
        ("delete", Instance::DoublyList(l)) => deleted_message(l.delete(&value), &value),
        _ => return Err(Error::not_found(kind.display(), id)),
    };
    Ok(mutated(kind, instance, message))
}

/// Message after a delete that may have found nothing.
fn deleted_message(removed: bool, what: &dyn fmt::Display) -> String {
    if removed {
        format!("Deleted {what}")
    } else {
        format!("{what} not found")
    }
}

/// Priority-queue operations, shared by both variants.
fn priority_queue(
    reg: &mut Registry,
    req: &Request<'_>,
    kind: EngineKind,
    id: &str,
    op: &[&str],
) -> Result<Json> {
    let missing = || Error::not_found(kind.display(), id);
    match op {
        ["enqueue"] => {
            req.require(Method::Post)?;
            let instance = reg.get_mut(kind, id)?;
            let value = req.value("value")?;
            let priority = req.integer("priority")?;
            let message = format!("Enqueued {value} with priority {priority}");
            match &mut *instance {
                Instance::PriorityQueue(pq) => {
                    pq.enqueue(value, priority)?;
                }
                Instance::HeapPriorityQueue(pq) => {
                    pq.enqueue(value, priority)?;
                }
                _ => return Err(missing()),
            }
            Ok(mutated(kind, instance, message))
        }
        ["dequeue"] => {
            req.require(Method::Post)?;
            let instance = reg.get_mut(kind, id)?;
            let entry = match &mut *instance {
                Instance::PriorityQueue(pq) => pq.dequeue()?,
                Instance::HeapPriorityQueue(pq) => pq.dequeue()?,
                _ => return Err(missing()),
            };
            let message = format!("Dequeued {} (priority: {})", entry.data, entry.priority);
            let mut body = mutated(kind, instance, message);
            body["dequeuedValue"] = json!(entry);
            Ok(body)
        }
        ["peek"] => {
            req.require(Method::Get)?;
            let entry = match reg.get(kind, id)? {
                Instance::PriorityQueue(pq) => pq.peek()?,
                Instance::HeapPriorityQueue(pq) => pq.peek()?,
                _ => return Err(missing()),
            };
            Ok(json!({
                "success": true,
                "front": entry,
                "message": format!("Front element: {} (priority: {})", entry.data, entry.priority),
            }))
        }
        _ => Err(req.unknown_route()),
    }
}

/// Binary-search-tree operations.
fn tree(reg: &mut Registry, req: &Request<'_>, id: &str, op: &[&str]) -> Result<Json> {
    match op {
        ["insert" | "delete" | "search"] => {
            req.require(Method::Post)?;
            let tree = reg.engine_mut::<BinarySearchTree>(id)?;
            let value = req.integer("value")?;
            let message = match op {
                ["insert"] => {
                    if tree.insert(value) {
                        format!("Inserted {value}")
                    } else {
                        format!("{value} is already in the tree")
                    }
                }
                ["delete"] => deleted_message(tree.delete(value), &value),
                _ => {
                    let result = tree.search(value);
                    let message = if result.found {
                        format!("Found {value}")
                    } else {
                        format!("{value} not found")
                    };
                    return Ok(json!({
                        "success": true,
                        "searchResult": result,
                        "message": message,
                    }));
                }
            };
            Ok(json!({
                "success": true,
                "tree": tree.structure(),
                "message": message,
            }))
        }
        ["traversal", order] => {
            req.require(Method::Get)?;
            let tree = reg.engine::<BinarySearchTree>(id)?;
            let order: TraversalOrder = order.parse()?;
            Ok(json!({
                "success": true,
                "traversal": tree.traverse(order),
                "type": order.name(),
            }))
        }
        _ => Err(req.unknown_route()),
    }
}

/// Graph operations.
fn graph(reg: &mut Registry, req: &Request<'_>, id: &str, op: &[&str]) -> Result<Json> {
    let message = match op {
        ["vertex"] => {
            req.require(Method::Post)?;
            let graph = reg.engine_mut::<Graph>(id)?;
            let vertex = req.name("vertex")?;
            graph.add_vertex(&vertex);
            format!("Added vertex {vertex}")
        }
        ["vertex", vertex] => {
            req.require(Method::Delete)?;
            let graph = reg.engine_mut::<Graph>(id)?;
            graph.remove_vertex(vertex);
            format!("Removed vertex {vertex}")
        }
        ["remove-vertex"] => {
            req.require(Method::Post)?;
            let graph = reg.engine_mut::<Graph>(id)?;
            let vertex = req.name("vertex")?;
            graph.remove_vertex(&vertex);
            format!("Removed vertex {vertex}")
        }
        ["edge"] => {
            req.require(Method::Post)?;
            let graph = reg.engine_mut::<Graph>(id)?;
            let from = req.name("from")?;
            let to = req.name("to")?;
            let weight = match req.body.get("weight") {
                None | Some(Json::Null) => DEFAULT_WEIGHT,
                Some(w) => w
                    .as_f64()
                    .ok_or_else(|| Error::invalid(format!("weight must be a number, got {w}")))?,
            };
            graph.add_edge(&from, &to, weight)?;
            format!("Added edge from {from} to {to} with weight {weight}")
        }
        ["edge", from, to] => {
            req.require(Method::Delete)?;
            let graph = reg.engine_mut::<Graph>(id)?;
            graph.remove_edge(from, to);
            format!("Removed edge from {from} to {to}")
        }
        ["remove-edge"] => {
            req.require(Method::Post)?;
            let graph = reg.engine_mut::<Graph>(id)?;
            let from = req.name("from")?;
            let to = req.name("to")?;
            graph.remove_edge(&from, &to);
            format!("Removed edge from {from} to {to}")
        }
        ["bfs" | "dfs" | "dijkstra"] => {
            req.require(Method::Post)?;
            let graph = reg.engine::<Graph>(id)?;
            let start = req.name("startVertex")?;
            return Ok(match op {
                ["bfs"] => json!({
                    "success": true,
                    "traversal": graph.bfs(&start),
                    "message": format!("BFS traversal from {start}"),
                }),
                ["dfs"] => json!({
                    "success": true,
                    "traversal": graph.dfs(&start),
                    "message": format!("DFS traversal from {start}"),
                }),
                _ => json!({
                    "success": true,
                    "shortestPaths": graph.dijkstra(&start),
                    "message": format!("Shortest paths from {start}"),
                }),
            });
        }
        _ => return Err(req.unknown_route()),
    };
    let instance = reg.get(EngineKind::Graph, id)?;
    Ok(mutated(EngineKind::Graph, instance, message))
}

/// Hash-table operations, shared by both variants.
fn hash_table(
    reg: &mut Registry,
    req: &Request<'_>,
    kind: EngineKind,
    id: &str,
    op: &[&str],
) -> Result<Json> {
    let [op @ ("set" | "get" | "delete")] = op else {
        return Err(req.unknown_route());
    };
    req.require(Method::Post)?;
    let instance = reg.get_mut(kind, id)?;
    let key = req.name("key")?;
    let missing = || Error::not_found(kind.display(), id);

    let message = match *op {
        "set" => {
            let value = req.value("value")?;
            let message = format!("Set {key} = {value}");
            match &mut *instance {
                Instance::ChainingTable(t) => {
                    t.set(&key, value);
                }
                Instance::ProbingTable(t) => {
                    t.set(&key, value)?;
                }
                _ => return Err(missing()),
            }
            message
        }
        "get" => {
            let value = match &*instance {
                Instance::ChainingTable(t) => t.get(&key),
                Instance::ProbingTable(t) => t.get(&key),
                _ => return Err(missing()),
            };
            let message = match value {
                Some(v) => format!("Found {key} = {v}"),
                None => format!("Key {key} not found"),
            };
            return Ok(json!({
                "success": true,
                "key": key,
                "value": value,
                "found": value.is_some(),
                "message": message,
            }));
        }
        _ => {
            let removed = match &mut *instance {
                Instance::ChainingTable(t) => t.delete(&key),
                Instance::ProbingTable(t) => t.delete(&key),
                _ => return Err(missing()),
            };
            deleted_message(removed.is_some(), &key)
        }
    };
    Ok(mutated(kind, instance, message))
}

/// Huffman operations.
fn huffman(reg: &mut Registry, req: &Request<'_>, id: &str, op: &[&str]) -> Result<Json> {
    match op {
        ["encode"] => {
            req.require(Method::Post)?;
            let coder = reg.engine_mut::<Huffman>(id)?;
            let encoding = coder.encode(req.text("text")?);
            Ok(json!({
                "success": true,
                "message": format!(
                    "Text encoded successfully. Compression ratio: {:.1}%",
                    encoding.compression_ratio
                ),
                "result": encoding,
            }))
        }
        ["decode"] => {
            req.require(Method::Post)?;
            let coder = reg.engine::<Huffman>(id)?;
            let decoded = coder.decode(req.text("encoded")?)?;
            Ok(json!({
                "success": true,
                "decoded": decoded,
                "message": "Text decoded successfully",
            }))
        }
        _ => Err(req.unknown_route()),
    }
}

/// TSP operations.
fn tsp(reg: &mut Registry, req: &Request<'_>, id: &str, op: &[&str]) -> Result<Json> {
    let ["solve"] = op else {
        return Err(req.unknown_route());
    };
    req.require(Method::Post)?;
    let solver = reg.engine_mut::<Tsp>(id)?;
    let cities: Vec<City> = serde_json::from_value(req.field("cities")?.clone())
        .map_err(|e| Error::invalid(format!("cities: {e}")))?;
    let algorithm: Algorithm = match req.text("algorithm")? {
        "" => Algorithm::NearestNeighbor,
        name => name.parse()?,
    };
    let seed = match req.body.get("seed") {
        None | Some(Json::Null) => None,
        Some(s) => Some(
            s.as_u64()
                .ok_or_else(|| Error::invalid(format!("seed must be a non-negative integer, got {s}")))?,
        ),
    };
    let solution = solver.solve(cities, algorithm, seed)?;
    Ok(json!({
        "success": true,
        "message": format!(
            "TSP solved using {}! Distance: {:.2}",
            solution.algorithm, solution.best_distance
        ),
        "result": solution,
    }))
}
