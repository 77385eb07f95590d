//! Outbound row-insertion client for the data-store API.
//!
//! Each extracted tracking record becomes one synchronous POST to the
//! data-store's row-insertion endpoint. Calls are issued strictly
//! sequentially by the caller; there is no retry, batching, or concurrent
//! fan-out.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod client;
pub mod error;

pub use client::{ClientConfig, DataStoreClient, ForwardOutcome};
pub use error::{ForwardError, Result};

/// Default HTTP request timeout in seconds.
pub const DEFAULT_TIMEOUT_SECONDS: u64 = 30;
