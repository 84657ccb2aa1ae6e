//! Remote read gateway.
//!
//! [`ReadGateway`] is the only path from the client to the chain. Each method
//! is one read-only contract call; the client never signs or sends
//! transactions.
//!
//! Two implementations ship with the crate:
//!
//! - [`RpcGateway`]: `eth_call` over JSON-RPC through `alloy`.
//! - [`FixtureGateway`]: in-memory data with call counters and failure
//!   injection.

mod contracts;
mod fixture;
mod rows;
mod rpc;

pub use fixture::{FixtureCall, FixtureGateway};
pub use rows::{AgentRowV1, AgentRowV2, LicenseRowV1, LicenseRowV2};
pub use rpc::RpcGateway;

use crate::error::{Error, Result};
use crate::types::{AgentId, Lineage};
use alloy::primitives::{Address, U256};
use async_trait::async_trait;
use std::future::Future;
use std::time::Duration;
use tracing::warn;

/// Read-only access to the registry, token and faucet contracts.
#[async_trait]
pub trait ReadGateway: Send + Sync {
    // Registry, shared by all schema versions.

    /// Number of certificates issued so far.
    async fn total_records(&self) -> Result<u64>;

    /// Holder of certificate `id`.
    async fn owner_of(&self, id: AgentId) -> Result<Address>;

    /// Number of certificates held by `owner`.
    async fn records_held(&self, owner: Address) -> Result<u64>;

    /// Metadata URI of certificate `id`.
    async fn metadata_uri(&self, id: AgentId) -> Result<String>;

    /// Identifiers of certificates minted by `creator`.
    async fn agents_by_creator(&self, creator: Address) -> Result<Vec<AgentId>>;

    /// Whether certificate `id` holds a license of `license_type`.
    async fn has_license(&self, id: AgentId, license_type: &str) -> Result<bool>;

    // Registry, schema V1.

    /// Core record in the V1 layout.
    async fn agent_v1(&self, id: AgentId) -> Result<AgentRowV1>;

    /// Batched license list in the V1 layout.
    async fn licenses_v1(&self, id: AgentId) -> Result<Vec<LicenseRowV1>>;

    // Registry, schema V2.

    /// Core record in the V2 layout.
    async fn agent_v2(&self, id: AgentId) -> Result<AgentRowV2>;

    /// Explicit verified flag.
    async fn is_verified(&self, id: AgentId) -> Result<bool>;

    /// Parent and depth.
    async fn lineage(&self, id: AgentId) -> Result<Lineage>;

    /// Number of licenses attached to `id`.
    async fn license_count(&self, id: AgentId) -> Result<u64>;

    /// License at `index` for `id`.
    async fn license_at(&self, id: AgentId, index: u64) -> Result<LicenseRowV2>;

    // Token.

    /// CLAMS balance of `owner` in base units.
    async fn token_balance(&self, owner: Address) -> Result<U256>;

    /// CLAMS total supply in base units.
    async fn token_supply(&self) -> Result<U256>;

    /// CLAMS decimal precision.
    async fn token_decimals(&self) -> Result<u8>;

    // Faucet.

    /// Whether `owner` has claimed from the faucet.
    async fn has_claimed(&self, owner: Address) -> Result<bool>;

    /// Total faucet claims.
    async fn total_claims(&self) -> Result<u64>;
}

/// Run one remote read under a deadline.
///
/// # Errors
///
/// Returns the read's own error, or [`Error::Timeout`] when `deadline`
/// elapses first.
pub async fn with_deadline<T, F>(deadline: Duration, call: &'static str, read: F) -> Result<T>
where
    F: Future<Output = Result<T>>,
{
    match tokio::time::timeout(deadline, read).await {
        Ok(result) => result,
        Err(_) => {
            warn!("{call} read timed out after {deadline:?}");
            Err(Error::Timeout {
                call,
                after: deadline,
            })
        }
    }
}

/// Narrow a `uint256` to `u64`.
///
/// # Errors
///
/// Returns [`Error::Decode`] if `value` exceeds `u64::MAX`.
pub fn to_u64(value: U256, field: &str) -> Result<u64> {
    u64::try_from(value).map_err(|_| Error::Decode(format!("{field} {value} exceeds u64")))
}
