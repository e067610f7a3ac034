//! kith-api: HTTP API service for the Kith social graph.
//!
//! A thin layer over kith-graph: a single graph-operation endpoint
//! (`POST /graph`) dispatching typed operations one-to-one onto data
//! access calls, plus an always-200 health endpoint.

pub mod config;
pub mod http;
pub mod ops;
pub mod seed;
