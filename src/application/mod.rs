//! Application services (use cases).
//!
//! These services orchestrate domain logic and drive the outbound ports to
//! implement the client's operations.

pub mod actions;
pub mod invoker;
pub mod tracker;

pub use invoker::{ActionInvoker, ProcedureResult};
pub use tracker::TransactionTracker;
