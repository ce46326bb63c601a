//! Native JSON-RPC client for btcwallet compatible endpoints.
//!
//! Implements [`RpcTransport`](super::RpcTransport) over HTTP(S) using
//! `reqwest`, with basic auth, optional pinned certificate, and optional
//! SOCKS5 proxy.

mod client;
mod connection;
mod protocol;

pub use client::HttpRpcClient;
