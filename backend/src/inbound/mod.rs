//! Inbound adapters translating external requests into domain service calls.
//!
//! The REST API lives under [`http`]; framework details stay at this edge.

pub mod http;
