//! kith-core: Shared domain types for the Kith personal social graph.
//!
//! This crate provides the types used across the Kith services:
//! - Person nodes and the KNOWS relationship
//! - View types computed per request (connections, graph projections)
//! - Input types for mutations, with their validation rules

pub mod error;
pub mod types;

pub use error::ValidationError;
pub use types::{
    Connection, ConnectionInput, GraphData, Person, PersonInput, PersonNode, RelationshipEdge,
    SecondDegreeConnection,
};
