//! kith-graph: Neo4j data access layer for the Kith social graph.
//!
//! The sole owner of query construction and result mapping. Every
//! operation is one or more fixed parameterized Cypher templates
//! executed through a shared connection pool; all traversal, filtering
//! and ordering is delegated to Neo4j.

pub mod client;
pub mod mutations;
pub mod queries;

pub use client::{GraphClient, GraphConfig, GraphError};
