//! Engine-agnostic domain types and offline validation.
//!
//! Nothing in this module performs I/O: inputs are validated and marshaled
//! here, then handed to the [`application`](crate::application) layer.

pub mod args;
pub mod attestation;
pub mod cache;
pub mod error;
pub mod id;
pub mod order_book;
pub mod result;
pub mod role;
pub mod stream;
pub mod taxonomy;
pub mod tx;
pub mod value;

pub use args::{ArgField, ArgsBuilder, FieldMode, FieldSpec, MarshalArgs, MarshalError};
pub use cache::{aggregate_cache_metadata, CacheAggregate, CacheMetadata};
pub use error::ValidationError;
pub use id::{EthAddress, QueryHash, StreamId, StreamLocator, TxHash};
pub use result::{DecodeError, QueryResult, Row};
pub use tx::{TxHandle, TxReceipt, TxStatus, CODE_OK};
pub use value::{ArgValue, Scalar};
