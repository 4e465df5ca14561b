//! HTTP access to the remote service.
//!
//! - [`client`] - middleware stack shared by every request
//! - [`decode`] - decoding of JSON-RPC style response envelopes
//! - [`remote`] - [`RemoteClient`], the [`Transport`](crate::transport::Transport)
//!   over HTTP

pub mod client;
pub mod decode;
pub mod remote;

pub use client::{create_http_client, HttpClientConfig};
pub use decode::{decode_response, DecodeError, DecodeErrorKind};
pub use remote::{RemoteClient, RemoteClientBuilder};
