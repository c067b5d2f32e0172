//! HTTP client with retry/backoff for upstream APIs

pub mod client;

pub use client::{read_json, HttpClient, HttpClientBuilder};
