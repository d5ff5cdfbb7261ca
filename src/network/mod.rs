//! HTTP networking module
//!
//! Provides the reqwest-backed implementation of the search backend and
//! saved search source.

mod client;

pub use client::HttpClient;
