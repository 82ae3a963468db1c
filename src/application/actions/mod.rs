//! Per-domain facades over the [`ActionInvoker`](super::invoker::ActionInvoker).
//!
//! Each operation validates its input offline, marshals it, invokes the
//! named procedure and decodes the rows. No I/O happens before validation
//! succeeds.

pub mod attestation;
pub mod order_book;
pub mod role;
pub mod stream;
pub mod taxonomy;

pub use attestation::AttestationActions;
pub use order_book::OrderBookActions;
pub use role::RoleActions;
pub use stream::StreamActions;
pub use taxonomy::TaxonomyActions;
