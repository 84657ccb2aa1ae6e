//! End-to-end verification scenarios over the in-memory gateway.
//!
//! ## Running Tests
//!
//! ```bash
//! # Fixture-backed scenarios
//! cargo test --test scenarios
//!
//! # Live endpoint smoke test (needs AGENT_VERIFY_* contract addresses)
//! cargo test --test scenarios live -- --ignored
//! ```

#![allow(clippy::unwrap_used, clippy::expect_used)]

mod harness;
mod live;
mod verification;

pub use harness::Harness;
