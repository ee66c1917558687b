//! One-shot typed JSON requests over HTTP.
//!
//! # Overview
//! `get` and `post` perform a single HTTP exchange with optional extra
//! headers and a round-trip timeout, then decode the JSON response into any
//! `DeserializeOwned` type. `get_into` / `post_into` write the result into a
//! caller-owned destination instead.
//!
//! # Design
//! - Stateless: each call builds and drops its own transport agent.
//! - `JsonRequest` describes the exchange as plain data; `execute` is the
//!   only function that performs I/O.
//! - Only `200..300` is success. Other statuses never reach the decoder.
//! - No retries, no redirect tuning, no streaming. Callers own retry policy.

pub mod client;
pub mod error;
pub mod http;

pub use client::{check_status, execute, get, get_into, post, post_into};
pub use error::{ErrorKind, FetchError, Result};
pub use http::{Headers, HttpMethod, JsonRequest};
