//! In-memory gateway for tests and offline runs.
//!
//! Holds a registry, token and faucet in plain maps, counts every call, and
//! can be told to fail or hang a call globally or for a single identifier.

use super::rows::{AgentRowV1, AgentRowV2, LicenseRowV1, LicenseRowV2};
use super::ReadGateway;
use crate::error::{Error, Result};
use crate::types::{AgentId, Lineage};
use alloy::primitives::{Address, U256};
use async_trait::async_trait;
use parking_lot::{Mutex, MutexGuard};
use std::collections::{HashMap, HashSet};

/// One [`ReadGateway`] method, for counting and failure injection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FixtureCall {
    /// [`ReadGateway::total_records`]
    TotalRecords,
    /// [`ReadGateway::owner_of`]
    OwnerOf,
    /// [`ReadGateway::records_held`]
    RecordsHeld,
    /// [`ReadGateway::metadata_uri`]
    MetadataUri,
    /// [`ReadGateway::agents_by_creator`]
    AgentsByCreator,
    /// [`ReadGateway::has_license`]
    HasLicense,
    /// [`ReadGateway::agent_v1`]
    AgentV1,
    /// [`ReadGateway::licenses_v1`]
    LicensesV1,
    /// [`ReadGateway::agent_v2`]
    AgentV2,
    /// [`ReadGateway::is_verified`]
    IsVerified,
    /// [`ReadGateway::lineage`]
    Lineage,
    /// [`ReadGateway::license_count`]
    LicenseCount,
    /// [`ReadGateway::license_at`]
    LicenseAt,
    /// [`ReadGateway::token_balance`]
    TokenBalance,
    /// [`ReadGateway::token_supply`]
    TokenSupply,
    /// [`ReadGateway::token_decimals`]
    TokenDecimals,
    /// [`ReadGateway::has_claimed`]
    HasClaimed,
    /// [`ReadGateway::total_claims`]
    TotalClaims,
}

#[derive(Default)]
struct FixtureState {
    total_records: u64,
    owners: HashMap<AgentId, Address>,
    uris: HashMap<AgentId, String>,
    agents_v1: HashMap<AgentId, AgentRowV1>,
    licenses_v1: HashMap<AgentId, Vec<LicenseRowV1>>,
    agents_v2: HashMap<AgentId, AgentRowV2>,
    verified: HashSet<AgentId>,
    lineages: HashMap<AgentId, Lineage>,
    licenses_v2: HashMap<AgentId, Vec<LicenseRowV2>>,
    license_counts: HashMap<AgentId, u64>,
    created: HashMap<Address, Vec<AgentId>>,
    balances: HashMap<Address, U256>,
    supply: U256,
    decimals: u8,
    claimed: HashSet<Address>,
    total_claims: u64,
    failing: HashSet<FixtureCall>,
    failing_ids: HashSet<(FixtureCall, AgentId)>,
    hanging: HashSet<FixtureCall>,
    hanging_ids: HashSet<(FixtureCall, AgentId)>,
    calls: HashMap<FixtureCall, usize>,
    owner_probes: Vec<AgentId>,
}

impl FixtureState {
    fn hangs(&self, call: FixtureCall, id: Option<AgentId>) -> bool {
        self.hanging.contains(&call) || id.is_some_and(|id| self.hanging_ids.contains(&(call, id)))
    }

    fn fails(&self, call: FixtureCall, id: Option<AgentId>) -> bool {
        self.failing.contains(&call) || id.is_some_and(|id| self.failing_ids.contains(&(call, id)))
    }
}

/// In-memory [`ReadGateway`].
pub struct FixtureGateway {
    state: Mutex<FixtureState>,
}

impl FixtureGateway {
    /// Create an empty registry with an 18-decimal token.
    #[must_use]
    pub fn new() -> Self {
        Self {
            state: Mutex::new(FixtureState {
                decimals: 18,
                ..FixtureState::default()
            }),
        }
    }

    /// Insert a V1 certificate held by `owner`.
    ///
    /// Raises the total record count to at least `id` and indexes the
    /// certificate under its creator.
    pub fn insert_agent_v1(
        &self,
        id: AgentId,
        owner: Address,
        agent: AgentRowV1,
        licenses: Vec<LicenseRowV1>,
    ) {
        let mut state = self.state.lock();
        state.total_records = state.total_records.max(id);
        state.owners.insert(id, owner);
        state.uris.insert(id, format!("ipfs://agents/{id}"));
        state.created.entry(agent.creator).or_default().push(id);
        state.agents_v1.insert(id, agent);
        state.licenses_v1.insert(id, licenses);
    }

    /// Insert a V2 certificate held by `owner`.
    pub fn insert_agent_v2(
        &self,
        id: AgentId,
        owner: Address,
        agent: AgentRowV2,
        licenses: Vec<LicenseRowV2>,
        verified: bool,
        lineage: Lineage,
    ) {
        let mut state = self.state.lock();
        state.total_records = state.total_records.max(id);
        state.owners.insert(id, owner);
        state.uris.insert(id, format!("ipfs://agents/{id}"));
        state.agents_v2.insert(id, agent);
        state.licenses_v2.insert(id, licenses);
        state.lineages.insert(id, lineage);
        if verified {
            state.verified.insert(id);
        } else {
            state.verified.remove(&id);
        }
    }

    /// Override the total record count.
    pub fn set_total_records(&self, total: u64) {
        self.state.lock().total_records = total;
    }

    /// Reassign the holder of `id`.
    pub fn set_owner(&self, id: AgentId, owner: Address) {
        self.state.lock().owners.insert(id, owner);
    }

    /// Index `id` under `creator`.
    pub fn add_created(&self, creator: Address, id: AgentId) {
        self.state.lock().created.entry(creator).or_default().push(id);
    }

    /// Report `count` licenses for `id` regardless of how many are stored.
    pub fn set_license_count(&self, id: AgentId, count: u64) {
        self.state.lock().license_counts.insert(id, count);
    }

    /// Set the token supply and decimals.
    pub fn set_token_supply(&self, supply: U256, decimals: u8) {
        let mut state = self.state.lock();
        state.supply = supply;
        state.decimals = decimals;
    }

    /// Set the token balance of `owner`.
    pub fn set_balance(&self, owner: Address, amount: U256) {
        self.state.lock().balances.insert(owner, amount);
    }

    /// Mark `owner` as having claimed from the faucet.
    pub fn set_claimed(&self, owner: Address) {
        let mut state = self.state.lock();
        if state.claimed.insert(owner) {
            state.total_claims += 1;
        }
    }

    /// Make every call of `call` fail.
    pub fn fail(&self, call: FixtureCall) {
        self.state.lock().failing.insert(call);
    }

    /// Make `call` fail for identifier `id` only.
    pub fn fail_for(&self, call: FixtureCall, id: AgentId) {
        self.state.lock().failing_ids.insert((call, id));
    }

    /// Make every call of `call` wait forever.
    pub fn hang(&self, call: FixtureCall) {
        self.state.lock().hanging.insert(call);
    }

    /// Make `call` wait forever for identifier `id` only.
    pub fn hang_for(&self, call: FixtureCall, id: AgentId) {
        self.state.lock().hanging_ids.insert((call, id));
    }

    /// Stop failing or hanging `call`, globally and per identifier.
    pub fn recover(&self, call: FixtureCall) {
        let mut state = self.state.lock();
        state.failing.remove(&call);
        state.failing_ids.retain(|(failing, _)| *failing != call);
        state.hanging.remove(&call);
        state.hanging_ids.retain(|(hanging, _)| *hanging != call);
    }

    /// Number of times `call` was issued.
    #[must_use]
    pub fn calls(&self, call: FixtureCall) -> usize {
        self.state.lock().calls.get(&call).copied().unwrap_or(0)
    }

    /// Total number of calls of any kind.
    #[must_use]
    pub fn total_calls(&self) -> usize {
        self.state.lock().calls.values().sum()
    }

    /// Identifiers passed to `owner_of`, in call order.
    #[must_use]
    pub fn owner_probes(&self) -> Vec<AgentId> {
        self.state.lock().owner_probes.clone()
    }

    /// Reset call counters and the probe log.
    pub fn reset_counts(&self) {
        let mut state = self.state.lock();
        state.calls.clear();
        state.owner_probes.clear();
    }

    async fn begin(
        &self,
        call: FixtureCall,
        id: Option<AgentId>,
    ) -> Result<MutexGuard<'_, FixtureState>> {
        let stalled = {
            let mut state = self.state.lock();
            *state.calls.entry(call).or_insert(0) += 1;
            state.hangs(call, id)
        };
        if stalled {
            std::future::pending::<()>().await;
        }

        let state = self.state.lock();
        if state.fails(call, id) {
            return Err(Error::Rpc(format!("injected failure for {call:?}")));
        }
        Ok(state)
    }
}

impl Default for FixtureGateway {
    fn default() -> Self {
        Self::new()
    }
}

fn missing(what: &str, id: AgentId) -> Error {
    Error::NotFound(format!("{what} for id {id}"))
}

#[async_trait]
impl ReadGateway for FixtureGateway {
    async fn total_records(&self) -> Result<u64> {
        Ok(self.begin(FixtureCall::TotalRecords, None).await?.total_records)
    }

    async fn owner_of(&self, id: AgentId) -> Result<Address> {
        self.state.lock().owner_probes.push(id);
        let state = self.begin(FixtureCall::OwnerOf, Some(id)).await?;
        state.owners.get(&id).copied().ok_or_else(|| missing("owner", id))
    }

    async fn records_held(&self, owner: Address) -> Result<u64> {
        let state = self.begin(FixtureCall::RecordsHeld, None).await?;
        Ok(state.owners.values().filter(|held| **held == owner).count() as u64)
    }

    async fn metadata_uri(&self, id: AgentId) -> Result<String> {
        let state = self.begin(FixtureCall::MetadataUri, Some(id)).await?;
        state.uris.get(&id).cloned().ok_or_else(|| missing("metadata uri", id))
    }

    async fn agents_by_creator(&self, creator: Address) -> Result<Vec<AgentId>> {
        let state = self.begin(FixtureCall::AgentsByCreator, None).await?;
        Ok(state.created.get(&creator).cloned().unwrap_or_default())
    }

    async fn has_license(&self, id: AgentId, license_type: &str) -> Result<bool> {
        let state = self.begin(FixtureCall::HasLicense, Some(id)).await?;
        let in_v1 = state
            .licenses_v1
            .get(&id)
            .is_some_and(|licenses| licenses.iter().any(|l| l.license_type == license_type));
        let in_v2 = state
            .licenses_v2
            .get(&id)
            .is_some_and(|licenses| licenses.iter().any(|l| l.license_type == license_type));
        Ok(in_v1 || in_v2)
    }

    async fn agent_v1(&self, id: AgentId) -> Result<AgentRowV1> {
        let state = self.begin(FixtureCall::AgentV1, Some(id)).await?;
        state.agents_v1.get(&id).cloned().ok_or_else(|| missing("agent", id))
    }

    async fn licenses_v1(&self, id: AgentId) -> Result<Vec<LicenseRowV1>> {
        let state = self.begin(FixtureCall::LicensesV1, Some(id)).await?;
        Ok(state.licenses_v1.get(&id).cloned().unwrap_or_default())
    }

    async fn agent_v2(&self, id: AgentId) -> Result<AgentRowV2> {
        let state = self.begin(FixtureCall::AgentV2, Some(id)).await?;
        state.agents_v2.get(&id).cloned().ok_or_else(|| missing("agent", id))
    }

    async fn is_verified(&self, id: AgentId) -> Result<bool> {
        Ok(self.begin(FixtureCall::IsVerified, Some(id)).await?.verified.contains(&id))
    }

    async fn lineage(&self, id: AgentId) -> Result<Lineage> {
        let state = self.begin(FixtureCall::Lineage, Some(id)).await?;
        Ok(state.lineages.get(&id).copied().unwrap_or_default())
    }

    async fn license_count(&self, id: AgentId) -> Result<u64> {
        let state = self.begin(FixtureCall::LicenseCount, Some(id)).await?;
        if let Some(count) = state.license_counts.get(&id) {
            return Ok(*count);
        }
        Ok(state.licenses_v2.get(&id).map_or(0, |licenses| licenses.len() as u64))
    }

    async fn license_at(&self, id: AgentId, index: u64) -> Result<LicenseRowV2> {
        let state = self.begin(FixtureCall::LicenseAt, Some(id)).await?;
        state
            .licenses_v2
            .get(&id)
            .and_then(|licenses| licenses.get(usize::try_from(index).ok()?))
            .cloned()
            .ok_or_else(|| missing("license", id))
    }

    async fn token_balance(&self, owner: Address) -> Result<U256> {
        let state = self.begin(FixtureCall::TokenBalance, None).await?;
        Ok(state.balances.get(&owner).copied().unwrap_or_default())
    }

    async fn token_supply(&self) -> Result<U256> {
        Ok(self.begin(FixtureCall::TokenSupply, None).await?.supply)
    }

    async fn token_decimals(&self) -> Result<u8> {
        Ok(self.begin(FixtureCall::TokenDecimals, None).await?.decimals)
    }

    async fn has_claimed(&self, owner: Address) -> Result<bool> {
        Ok(self.begin(FixtureCall::HasClaimed, None).await?.claimed.contains(&owner))
    }

    async fn total_claims(&self) -> Result<u64> {
        Ok(self.begin(FixtureCall::TotalClaims, None).await?.total_claims)
    }
}
