//! JSON-RPC gateway backed by `alloy` providers.

use super::contracts::{
    IAgentRegistry, IAgentRegistryV1, IAgentRegistryV2, IClamsFaucet, IClamsToken,
};
use super::rows::{AgentRowV1, AgentRowV2, LicenseRowV1, LicenseRowV2};
use super::{to_u64, ReadGateway};
use crate::config::VerifierConfig;
use crate::error::{Error, Result};
use crate::types::{AgentId, Lineage};
use alloy::primitives::{Address, U256};
use alloy::providers::{DynProvider, Provider, ProviderBuilder};
use alloy::transports::http::reqwest::Url;
use async_trait::async_trait;
use tracing::{debug, info};

/// Gateway issuing `eth_call`s against a JSON-RPC endpoint.
pub struct RpcGateway {
    registry: IAgentRegistry::IAgentRegistryInstance<DynProvider>,
    registry_v1: IAgentRegistryV1::IAgentRegistryV1Instance<DynProvider>,
    registry_v2: IAgentRegistryV2::IAgentRegistryV2Instance<DynProvider>,
    token: IClamsToken::IClamsTokenInstance<DynProvider>,
    faucet: IClamsFaucet::IClamsFaucetInstance<DynProvider>,
}

impl RpcGateway {
    /// Build a gateway from the endpoint and contract addresses in `config`.
    ///
    /// No request is sent here; an unreachable endpoint surfaces on the
    /// first read.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] if the endpoint URL or a contract address
    /// is malformed or missing.
    pub fn connect(config: &VerifierConfig) -> Result<Self> {
        let endpoint = config.endpoint();
        let url: Url = endpoint
            .parse()
            .map_err(|e| Error::Config(format!("invalid rpc url {endpoint}: {e}")))?;

        let registry = parse_contract("registry", &config.contracts.registry)?;
        let token = parse_contract("token", &config.contracts.token)?;
        let faucet = parse_contract("faucet", &config.contracts.faucet)?;

        let provider = ProviderBuilder::new().connect_http(url).erased();

        info!("RPC gateway targeting {endpoint} (registry={registry}, token={token}, faucet={faucet})");

        Ok(Self {
            registry: IAgentRegistry::new(registry, provider.clone()),
            registry_v1: IAgentRegistryV1::new(registry, provider.clone()),
            registry_v2: IAgentRegistryV2::new(registry, provider.clone()),
            token: IClamsToken::new(token, provider.clone()),
            faucet: IClamsFaucet::new(faucet, provider),
        })
    }
}

fn parse_contract(name: &str, value: &str) -> Result<Address> {
    if value.trim().is_empty() {
        return Err(Error::Config(format!("{name} contract address not configured")));
    }
    value
        .trim()
        .parse()
        .map_err(|e| Error::Config(format!("invalid {name} contract address {value}: {e}")))
}

fn rpc(call: &'static str) -> impl Fn(alloy::contract::Error) -> Error {
    move |e| {
        debug!("{call} call failed: {e}");
        Error::Rpc(format!("{call}: {e}"))
    }
}

#[async_trait]
impl ReadGateway for RpcGateway {
    async fn total_records(&self) -> Result<u64> {
        let total = self
            .registry
            .totalSupply()
            .call()
            .await
            .map_err(rpc("totalSupply"))?;
        to_u64(total, "total supply")
    }

    async fn owner_of(&self, id: AgentId) -> Result<Address> {
        self.registry
            .ownerOf(U256::from(id))
            .call()
            .await
            .map_err(rpc("ownerOf"))
    }

    async fn records_held(&self, owner: Address) -> Result<u64> {
        let held = self
            .registry
            .balanceOf(owner)
            .call()
            .await
            .map_err(rpc("balanceOf"))?;
        to_u64(held, "balance")
    }

    async fn metadata_uri(&self, id: AgentId) -> Result<String> {
        self.registry
            .tokenURI(U256::from(id))
            .call()
            .await
            .map_err(rpc("tokenURI"))
    }

    async fn agents_by_creator(&self, creator: Address) -> Result<Vec<AgentId>> {
        let ids = self
            .registry
            .getAgentsByCreator(creator)
            .call()
            .await
            .map_err(rpc("getAgentsByCreator"))?;
        ids.into_iter().map(|id| to_u64(id, "agent id")).collect()
    }

    async fn has_license(&self, id: AgentId, license_type: &str) -> Result<bool> {
        self.registry
            .hasLicense(U256::from(id), license_type.to_string())
            .call()
            .await
            .map_err(rpc("hasLicense"))
    }

    async fn agent_v1(&self, id: AgentId) -> Result<AgentRowV1> {
        let agent = self
            .registry_v1
            .getAgent(U256::from(id))
            .call()
            .await
            .map_err(rpc("getAgent"))?;
        Ok(AgentRowV1 {
            name: agent.name,
            agent_type: agent.agentType,
            creator: agent.creator,
            human_principal: agent.humanPrincipal,
            parent_id: to_u64(agent.parentId, "parent id")?,
            lineage_depth: to_u64(agent.lineageDepth, "lineage depth")?,
            created_at: to_u64(agent.createdAt, "created at")?,
            active: agent.active,
        })
    }

    async fn licenses_v1(&self, id: AgentId) -> Result<Vec<LicenseRowV1>> {
        let licenses = self
            .registry_v1
            .getLicenses(U256::from(id))
            .call()
            .await
            .map_err(rpc("getLicenses"))?;
        licenses
            .into_iter()
            .map(|license| {
                Ok(LicenseRowV1 {
                    license_type: license.licenseType,
                    license_number: license.licenseNumber,
                    jurisdiction: license.jurisdiction,
                    issued_at: to_u64(license.issuedAt, "issued at")?,
                })
            })
            .collect()
    }

    async fn agent_v2(&self, id: AgentId) -> Result<AgentRowV2> {
        let agent = self
            .registry_v2
            .getAgent(U256::from(id))
            .call()
            .await
            .map_err(rpc("getAgent"))?;
        Ok(AgentRowV2 {
            name: agent.name,
            agent_type: agent.agentType,
            created_at: to_u64(agent.birthTimestamp, "birth timestamp")?,
            active: agent.active,
        })
    }

    async fn is_verified(&self, id: AgentId) -> Result<bool> {
        self.registry_v2
            .isVerified(U256::from(id))
            .call()
            .await
            .map_err(rpc("isVerified"))
    }

    async fn lineage(&self, id: AgentId) -> Result<Lineage> {
        let lineage = self
            .registry_v2
            .getLineage(U256::from(id))
            .call()
            .await
            .map_err(rpc("getLineage"))?;
        Ok(Lineage {
            parent_id: to_u64(lineage.parentId, "parent id")?,
            depth: to_u64(lineage.depth, "lineage depth")?,
        })
    }

    async fn license_count(&self, id: AgentId) -> Result<u64> {
        let count = self
            .registry_v2
            .getLicenseCount(U256::from(id))
            .call()
            .await
            .map_err(rpc("getLicenseCount"))?;
        to_u64(count, "license count")
    }

    async fn license_at(&self, id: AgentId, index: u64) -> Result<LicenseRowV2> {
        let license = self
            .registry_v2
            .getLicense(U256::from(id), U256::from(index))
            .call()
            .await
            .map_err(rpc("getLicense"))?;
        Ok(LicenseRowV2 {
            license_type: license.licenseType,
            identifier: license.identifier,
            holder: license.holder,
            issued_at: to_u64(license.issuedAt, "issued at")?,
            active: license.active,
        })
    }

    async fn token_balance(&self, owner: Address) -> Result<U256> {
        self.token
            .balanceOf(owner)
            .call()
            .await
            .map_err(rpc("balanceOf"))
    }

    async fn token_supply(&self) -> Result<U256> {
        self.token
            .totalSupply()
            .call()
            .await
            .map_err(rpc("totalSupply"))
    }

    async fn token_decimals(&self) -> Result<u8> {
        self.token
            .decimals()
            .call()
            .await
            .map_err(rpc("decimals"))
    }

    async fn has_claimed(&self, owner: Address) -> Result<bool> {
        self.faucet
            .hasClaimed(owner)
            .call()
            .await
            .map_err(rpc("hasClaimed"))
    }

    async fn total_claims(&self) -> Result<u64> {
        let claims = self
            .faucet
            .totalClaims()
            .call()
            .await
            .map_err(rpc("totalClaims"))?;
        to_u64(claims, "total claims")
    }
}
