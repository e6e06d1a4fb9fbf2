//! v1 API Data Transfer Objects.
//!
//! Wire types for the v1 REST API, kept apart from the extraction domain
//! types in `crate::extraction`.

pub mod invoices;

pub use invoices::*;
