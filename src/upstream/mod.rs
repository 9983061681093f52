//! Upstream API client module
//!
//! This module owns all network I/O against the public
//! `verkehr.autobahn.de` REST service: request timeboxing, failure
//! classification, and the single-retry policy for transient faults.

pub mod client;

pub use client::{UpstreamClient, UpstreamConfig, DEFAULT_BASE_URL};
