//! Outbound adapters implementing the domain's driven ports.
//!
//! - **persistence**: PostgreSQL entity store via Diesel.
//! - **memory**: in-process entity store and the development login service.
//!
//! Adapters translate between domain types and storage representations and
//! hold no business rules.

pub mod memory;
pub mod persistence;
