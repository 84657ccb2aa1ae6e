//! Fixture registry plus a verifier wired to it.

use agent_verify::gateway::{AgentRowV1, AgentRowV2, FixtureGateway, LicenseRowV1, LicenseRowV2};
use agent_verify::{AgentVerifier, Lineage, SchemaVersion, VerifierConfig};
use alloy::primitives::Address;
use std::sync::Arc;

/// A verifier over a [`FixtureGateway`] the test can keep mutating.
pub struct Harness {
    /// The in-memory chain.
    pub gateway: Arc<FixtureGateway>,
    /// The verifier under test.
    pub verifier: AgentVerifier,
}

impl Harness {
    /// V2-schema harness with default TTL.
    pub fn new() -> Self {
        Self::with_config(VerifierConfig::default())
    }

    /// V1-schema harness with default TTL.
    pub fn v1() -> Self {
        Self::with_config(VerifierConfig {
            schema: SchemaVersion::V1,
            ..Default::default()
        })
    }

    /// Harness with an explicit configuration.
    pub fn with_config(config: VerifierConfig) -> Self {
        let gateway = Arc::new(FixtureGateway::new());
        let verifier = AgentVerifier::with_gateway(&config, gateway.clone());
        Self { gateway, verifier }
    }

    /// Insert a V2 certificate with the given licenses.
    pub fn add_agent(&self, id: u64, owner: Address, licenses: Vec<LicenseRowV2>, verified: bool) {
        self.gateway.insert_agent_v2(
            id,
            owner,
            AgentRowV2 {
                name: format!("agent-{id}"),
                agent_type: "assistant".to_string(),
                created_at: 1_700_000_000 + id,
                active: true,
            },
            licenses,
            verified,
            Lineage::default(),
        );
    }

    /// Insert a V1 certificate.
    pub fn add_agent_v1(
        &self,
        id: u64,
        owner: Address,
        human_principal: Address,
        licenses: Vec<LicenseRowV1>,
    ) {
        self.gateway.insert_agent_v1(
            id,
            owner,
            AgentRowV1 {
                name: format!("agent-{id}"),
                agent_type: "assistant".to_string(),
                creator: creator(),
                human_principal,
                parent_id: 0,
                lineage_depth: 0,
                created_at: 18_000_000 + id,
                active: true,
            },
            licenses,
        );
    }
}

/// Address that minted every fixture certificate.
pub fn creator() -> Address {
    Address::repeat_byte(0xc0)
}

/// Unrelated holder for padding certificates.
pub fn stranger(n: u8) -> Address {
    Address::with_last_byte(n)
}

/// An active V2 MLO license.
pub fn mlo_license() -> LicenseRowV2 {
    LicenseRowV2 {
        license_type: "MLO".to_string(),
        identifier: "154083".to_string(),
        holder: "Jordan Reyes".to_string(),
        issued_at: 1_690_000_000,
        active: true,
    }
}
