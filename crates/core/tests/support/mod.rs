//! Shared test helpers for `zipcast-core` integration tests.
//!
//! In-memory store and scripted providers that count their calls, so tests
//! can assert exactly how often the store and upstream were touched.

#![allow(dead_code)]

pub mod fixtures;
pub mod providers;
pub mod repositories;
