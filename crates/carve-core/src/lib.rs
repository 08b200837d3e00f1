//! Core types and order arithmetic for the Carve buddy allocator.
//!
//! This is the leaf crate with zero internal dependencies. It defines the
//! vocabulary shared by the rest of the workspace: block orders, the
//! power-of-two size arithmetic behind them, and the opaque handle type
//! returned to callers.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod id;
pub mod order;

pub use id::{BlockHandle, Generation, Order};
pub use order::{buddy_of, normalize, order_of, size_of_order};
