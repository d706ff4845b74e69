//! The diagram intermediate representation.
//!
//! A [`Diagram`] is an ordered collection of [`Node`]s and [`Edge`]s plus
//! free-form metadata. External format parsers build instances of this
//! model; the analyzer, validator, diff engine, and layout engines all
//! borrow it read-only.
//!
//! The model enforces nothing. `add_node` does not deduplicate ids and
//! `add_edge` does not check that its endpoints exist, so partially
//! correct input (for example from a lossy text parser) flows through the
//! pipeline and the validator can report on it meaningfully instead of
//! the constructor panicking.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::identifier::Id;

/// The kind of a diagram node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeKind {
    /// Entry point of a flow.
    Start,
    /// Terminal point of a flow.
    End,
    /// A processing step.
    Process,
    /// A branching decision.
    Decision,
    /// A data store or payload.
    Data,
}

/// The kind of a diagram edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EdgeKind {
    /// An unconditional transition.
    Normal,
    /// A transition taken only when some condition holds.
    Conditional,
}

/// Open key-value metadata attached to nodes, edges, and diagrams.
///
/// A `BTreeMap` keeps iteration (and therefore serialization and deep
/// equality) deterministic.
pub type Metadata = BTreeMap<String, String>;

/// A diagram node.
///
/// Identity is the `id` alone: two nodes are the same entity across
/// diagram versions iff their ids match, regardless of label, kind, or
/// metadata.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    pub id: Id,
    pub label: String,
    pub kind: NodeKind,
    #[serde(default)]
    pub metadata: Metadata,
}

impl Node {
    /// Creates a node with empty metadata.
    pub fn new(id: impl Into<Id>, label: impl Into<String>, kind: NodeKind) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            kind,
            metadata: Metadata::new(),
        }
    }

    /// Adds a metadata entry, consuming and returning the node.
    pub fn with_metadata(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.metadata.insert(key.into(), value.into());
        self
    }
}

/// A directed diagram edge.
///
/// Edges are not required to be unique; several edges may share the same
/// `(source, target)` pair with different labels.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Edge {
    pub source: Id,
    pub target: Id,
    #[serde(default)]
    pub label: Option<String>,
    pub kind: EdgeKind,
    #[serde(default)]
    pub metadata: Metadata,
}

impl Edge {
    /// Creates an unlabeled [`EdgeKind::Normal`] edge.
    pub fn new(source: impl Into<Id>, target: impl Into<Id>) -> Self {
        Self {
            source: source.into(),
            target: target.into(),
            label: None,
            kind: EdgeKind::Normal,
            metadata: Metadata::new(),
        }
    }

    /// Sets the edge label, consuming and returning the edge.
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    /// Sets the edge kind, consuming and returning the edge.
    pub fn with_kind(mut self, kind: EdgeKind) -> Self {
        self.kind = kind;
        self
    }

    /// The identity tuple used by the diff engine.
    ///
    /// Two edges are "the same" iff `(source, target, label-or-empty,
    /// kind)` match exactly. Edges with the same endpoints but different
    /// labels are distinct edges, not modifications of one another.
    pub fn identity(&self) -> (Id, Id, String, EdgeKind) {
        (
            self.source,
            self.target,
            self.label.clone().unwrap_or_default(),
            self.kind,
        )
    }

    /// Whether source and target are the same node.
    pub fn is_self_loop(&self) -> bool {
        self.source == self.target
    }
}

/// A diagram: ordered nodes, ordered edges, and free-form metadata.
///
/// Insertion order is preserved for both collections and is meaningful
/// downstream (diff output ordering, layout tie-breaks).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Diagram {
    pub nodes: Vec<Node>,
    pub edges: Vec<Edge>,
    #[serde(default)]
    pub metadata: Metadata,
}

impl Diagram {
    /// Creates an empty diagram.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty diagram with a `title` metadata entry.
    pub fn with_title(title: impl Into<String>) -> Self {
        let mut diagram = Self::default();
        diagram.metadata.insert("title".to_string(), title.into());
        diagram
    }

    /// Appends a node. Duplicate ids are legal at this layer; the
    /// `unique-node-ids` validation rule reports them.
    pub fn add_node(&mut self, node: Node) {
        self.nodes.push(node);
    }

    /// Appends an edge without checking that its endpoints exist; the
    /// `valid-edges` validation rule reports dangling endpoints.
    pub fn add_edge(&mut self, edge: Edge) {
        self.edges.push(edge);
    }

    /// Looks up the first node with the given id.
    pub fn node(&self, id: Id) -> Option<&Node> {
        self.nodes.iter().find(|n| n.id == id)
    }

    /// The diagram title, if any.
    pub fn title(&self) -> Option<&str> {
        self.metadata.get("title").map(String::as_str)
    }
}
