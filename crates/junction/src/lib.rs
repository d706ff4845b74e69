//! Junction - structural analysis, validation, diffing, merging, and
//! layout for diagram graphs.
//!
//! The diagram IR itself lives in `junction-core` and is re-exported
//! here. Everything in this crate is a pure, synchronous function over an
//! immutable borrowed [`model::Diagram`]: callers own the diagram, each
//! operation owns only its output (issue lists, change sets, coordinate
//! maps), and re-invoking with the same input yields the same result
//! (force-directed layout excepted, which seeds random start positions).
//!
//! # Examples
//!
//! ```
//! use junction::model::{Diagram, Edge, Node, NodeKind};
//! use junction::validate::Validator;
//! use junction::layout::{Algorithm, LayoutEngine};
//!
//! let mut diagram = Diagram::with_title("checkout");
//! diagram.add_node(Node::new("start", "Start", NodeKind::Start));
//! diagram.add_node(Node::new("pay", "Take payment", NodeKind::Process));
//! diagram.add_edge(Edge::new("start", "pay"));
//!
//! let result = Validator::new().validate(&diagram, None);
//! assert!(result.is_valid);
//!
//! let positions = LayoutEngine::new(Algorithm::Hierarchical).apply(&diagram);
//! assert_eq!(positions.len(), 2);
//! ```

pub mod analysis;
pub mod diff;
pub mod history;
pub mod layout;
pub mod validate;

mod error;

pub use junction_core::{geometry, identifier, issue, model};

pub use error::JunctionError;
