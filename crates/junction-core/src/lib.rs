//! Junction Core Types and Definitions
//!
//! This crate provides the foundational types for the Junction diagram
//! intermediate representation. It includes:
//!
//! - **Identifiers**: Efficient string-interned identifiers ([`identifier::Id`])
//! - **Geometry**: Basic geometric types ([`geometry`] module)
//! - **Model**: The diagram IR itself ([`model`] module)
//! - **Issues**: Validation finding types ([`issue`] module)
//!
//! The model is a deliberately dumb container: construction never fails,
//! duplicate ids and dangling edge endpoints are legal at this layer, and
//! correctness questions are answered by the validator in the `junction`
//! crate.

pub mod geometry;
pub mod identifier;
pub mod issue;
pub mod model;
