//! Core types and trait definitions for the Secret Santa exchange.
//!
//! This crate is deliberately free of HTTP and database dependencies.
//! All other crates depend on it; the assignment generator lives here so it
//! can be exercised without a store.

// We intentionally use native `async fn` in traits (stabilised in Rust 1.75).
// Suppress the advisory lint about `Send` bounds on the returned futures.
#![allow(async_fn_in_trait)]

pub mod assignment;
pub mod email;
pub mod error;
pub mod generator;
pub mod person;
pub mod slug;
pub mod store;

pub use error::{Error, Result};
