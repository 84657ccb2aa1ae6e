//! # agent-verify
//!
//! Read-only identity verification for an on-chain agent birth certificate
//! registry.
//!
//! Given a wallet address or a certificate identifier, the client resolves
//! the certificate, assembles its licenses and lineage, derives a trust
//! level, and caches the answer for a bounded window. It never sends
//! transactions.
//!
//! ## Trust levels
//!
//! | Level | Meaning |
//! |-------|---------|
//! | 0 | Unverified |
//! | 1 | Co-signed by a human principal or flagged verified |
//! | 2 | Holds at least one active license |
//!
//! ## Example
//!
//! ```rust,ignore
//! use agent_verify::{AgentVerifier, VerifierConfig};
//!
//! let verifier = AgentVerifier::connect(&VerifierConfig::load_default()?)?;
//! let result = verifier.verify_by_address("0x…".parse()?).await;
//! if result.verified {
//!     println!("trust level {}", result.trust_level);
//! }
//! ```

pub mod config;
pub mod error;
pub mod gateway;
pub mod registry;
pub mod types;
pub mod units;
pub mod verifier;

pub use config::{ContractAddresses, SchemaVersion, VerifierConfig};
pub use error::{Error, Result};
pub use types::{
    AgentId, AgentRecord, License, Lineage, ProtocolStats, TokenBalance, TrustLevel,
    VerificationResult,
};
pub use verifier::{default_verifier, AgentVerifier};
