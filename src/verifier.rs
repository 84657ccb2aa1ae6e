//! Verification facade combining the record assembler, owner resolver and
//! TTL cache.
//!
//! Every record-shaped answer comes back as a [`VerificationResult`] and every
//! boolean answer degrades to `false`; remote failures never escape as errors
//! from those calls. Only [`AgentVerifier::stats`] and
//! [`AgentVerifier::balance`] return `Result`, because their mandatory reads
//! have no meaningful default.

use crate::config::VerifierConfig;
use crate::error::Result;
use crate::gateway::{with_deadline, ReadGateway, RpcGateway};
use crate::registry::{
    adapter_for, CacheKey, CacheStats, CachedValue, OwnerLookup, OwnerResolver, RecordAssembler,
    RegistryCache,
};
use crate::types::{AgentId, AgentRecord, ProtocolStats, TokenBalance, VerificationResult};
use crate::units::{approximate, format_units};
use alloy::primitives::Address;
use std::sync::{Arc, OnceLock};
use std::time::Duration;
use tracing::{debug, info, warn};

/// Read-only verification client for the birth certificate registry.
pub struct AgentVerifier {
    gateway: Arc<dyn ReadGateway>,
    assembler: RecordAssembler,
    resolver: OwnerResolver,
    cache: RegistryCache,
    call_timeout: Duration,
}

impl AgentVerifier {
    /// Connect to the JSON-RPC endpoint and contracts named in `config`.
    ///
    /// # Errors
    ///
    /// Returns an error if the endpoint or a contract address is malformed.
    pub fn connect(config: &VerifierConfig) -> Result<Self> {
        let gateway = RpcGateway::connect(config)?;
        Ok(Self::with_gateway(config, Arc::new(gateway)))
    }

    /// Build a verifier over an existing gateway.
    #[must_use]
    pub fn with_gateway(config: &VerifierConfig, gateway: Arc<dyn ReadGateway>) -> Self {
        let call_timeout = config.call_timeout();
        let cache = RegistryCache::with_ttl(config.cache_ttl(), config.cache_capacity);
        let assembler = RecordAssembler::new(
            Arc::clone(&gateway),
            adapter_for(config.schema),
            cache.clone(),
            call_timeout,
        );
        let resolver = OwnerResolver::new(Arc::clone(&gateway), assembler.clone(), call_timeout);

        info!(
            "Agent verifier initialized (schema={:?}, cache_ttl={:?}, call_timeout={:?})",
            config.schema,
            cache.ttl(),
            call_timeout
        );

        Self {
            gateway,
            assembler,
            resolver,
            cache,
            call_timeout,
        }
    }

    /// Verify the certificate held by `address`.
    ///
    /// The ownership count is checked first so unregistered addresses never
    /// pay for an owner scan.
    pub async fn verify_by_address(&self, address: Address) -> VerificationResult {
        let held = match self.records_held(address).await {
            Ok(held) => held,
            Err(e) => {
                warn!("Ownership count for {address} unavailable: {e}");
                return VerificationResult::failed(format!("registry lookup failed: {e}"));
            }
        };

        if held == 0 {
            debug!("{address} holds no certificate");
            return VerificationResult::failed(format!("{address} is not registered"));
        }

        match self.resolver.lookup(address).await {
            OwnerLookup::Found(agent) => VerificationResult::verified(agent),
            OwnerLookup::Unreadable { id, error } => VerificationResult::failed(format!(
                "record {id} held by {address} could not be read: {error}"
            )),
            OwnerLookup::NotFound => {
                warn!("{address} holds {held} certificate(s) but the owner scan found none");
                VerificationResult::failed(format!(
                    "inconsistent registry state: {address} holds {held} record(s) but no owning record was found"
                ))
            }
        }
    }

    /// Verify certificate `id`.
    pub async fn verify_by_id(&self, id: AgentId) -> VerificationResult {
        match self.assembler.resolve_by_id(id).await {
            Some(agent) => VerificationResult::verified(agent),
            None => VerificationResult::failed(format!("no record at id {id}")),
        }
    }

    /// Whether `address` holds at least one certificate. `false` when the
    /// registry cannot be read.
    pub async fn is_registered(&self, address: Address) -> bool {
        match self.records_held(address).await {
            Ok(held) => held > 0,
            Err(e) => {
                debug!("Registration check for {address} failed: {e}");
                false
            }
        }
    }

    /// Whether `address` has claimed from the faucet. `false` when the faucet
    /// cannot be read.
    pub async fn has_claimed(&self, address: Address) -> bool {
        with_deadline(self.call_timeout, "has claimed", self.gateway.has_claimed(address))
            .await
            .unwrap_or_else(|e| {
                debug!("Faucet claim check for {address} failed: {e}");
                false
            })
    }

    /// Resolve certificate `id`, from cache when fresh.
    pub async fn resolve_by_id(&self, id: AgentId) -> Option<AgentRecord> {
        self.assembler.resolve_by_id(id).await
    }

    /// Resolve the certificate held by `owner` by scanning the registry.
    pub async fn resolve_by_owner(&self, owner: Address) -> Option<AgentRecord> {
        self.resolver.resolve_by_owner(owner).await
    }

    /// Identifiers of certificates minted by `creator`. Empty when the
    /// registry cannot be read.
    pub async fn agents_by_creator(&self, creator: Address) -> Vec<AgentId> {
        with_deadline(
            self.call_timeout,
            "agents by creator",
            self.gateway.agents_by_creator(creator),
        )
        .await
        .unwrap_or_else(|e| {
            debug!("Creator lookup for {creator} failed: {e}");
            Vec::new()
        })
    }

    /// Whether certificate `id` holds a license of `license_type`. `false`
    /// when the registry cannot be read.
    pub async fn has_license(&self, id: AgentId, license_type: &str) -> bool {
        with_deadline(
            self.call_timeout,
            "has license",
            self.gateway.has_license(id, license_type),
        )
        .await
        .unwrap_or_else(|e| {
            debug!("License check for agent {id} ({license_type}) failed: {e}");
            false
        })
    }

    /// Aggregate protocol counters, cached for one TTL.
    ///
    /// Claims and supply fall back to zero when unreadable.
    ///
    /// # Errors
    ///
    /// Returns an error if the total certificate count cannot be read.
    pub async fn stats(&self) -> Result<ProtocolStats> {
        if let Some(CachedValue::Stats(stats)) = self.cache.get(&CacheKey::Stats) {
            return Ok(stats);
        }

        let deadline = self.call_timeout;
        let gateway = self.gateway.as_ref();
        let (total_agents, total_claims, supply, decimals) = tokio::join!(
            with_deadline(deadline, "total records", gateway.total_records()),
            with_deadline(deadline, "total claims", gateway.total_claims()),
            with_deadline(deadline, "token supply", gateway.token_supply()),
            with_deadline(deadline, "token decimals", gateway.token_decimals()),
        );

        let total_agents = total_agents?;
        let total_faucet_claims = total_claims.unwrap_or_else(|e| {
            warn!("Faucet claim count unavailable, reporting 0: {e}");
            0
        });
        let total_clams_supply = supply
            .and_then(|supply| format_units(supply, decimals?))
            .unwrap_or_else(|e| {
                warn!("Token supply unavailable, reporting 0: {e}");
                "0".to_string()
            });

        let stats = ProtocolStats {
            total_agents,
            total_faucet_claims,
            total_clams_supply,
        };
        self.cache.insert(CacheKey::Stats, CachedValue::Stats(stats.clone()));
        Ok(stats)
    }

    /// CLAMS balance of `owner`. Never cached.
    ///
    /// # Errors
    ///
    /// Returns an error if the balance or the token decimals cannot be read,
    /// or the token declares more decimals than a unit can express.
    pub async fn balance(&self, owner: Address) -> Result<TokenBalance> {
        let deadline = self.call_timeout;
        let (raw, decimals) = tokio::join!(
            with_deadline(deadline, "token balance", self.gateway.token_balance(owner)),
            with_deadline(deadline, "token decimals", self.gateway.token_decimals()),
        );
        let raw = raw?;
        let formatted = format_units(raw, decimals?)?;

        Ok(TokenBalance {
            raw,
            approx: approximate(&formatted),
            formatted,
        })
    }

    /// Drop every cached record and the cached stats.
    pub fn clear_cache(&self) {
        self.cache.clear();
        debug!("Verifier cache cleared");
    }

    /// Get cache statistics.
    #[must_use]
    pub fn cache_stats(&self) -> CacheStats {
        self.cache.stats()
    }

    async fn records_held(&self, address: Address) -> Result<u64> {
        with_deadline(
            self.call_timeout,
            "ownership count",
            self.gateway.records_held(address),
        )
        .await
    }
}

static DEFAULT_VERIFIER: OnceLock<AgentVerifier> = OnceLock::new();

/// Process-wide verifier built from [`VerifierConfig::load_default`] on first
/// use. Later calls return the same instance and share its cache.
///
/// # Errors
///
/// Returns an error if the default configuration cannot be loaded or names a
/// malformed endpoint or contract address. Nothing is stored in that case, so
/// a later call retries.
pub fn default_verifier() -> Result<&'static AgentVerifier> {
    shared_verifier(&DEFAULT_VERIFIER, VerifierConfig::load_default)
}

fn shared_verifier(
    slot: &'static OnceLock<AgentVerifier>,
    load: impl FnOnce() -> Result<VerifierConfig>,
) -> Result<&'static AgentVerifier> {
    if let Some(verifier) = slot.get() {
        return Ok(verifier);
    }
    let verifier = AgentVerifier::connect(&load()?)?;
    Ok(slot.get_or_init(|| verifier))
}
