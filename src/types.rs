//! Value types returned by the registry client.
//!
//! Every type here is an immutable snapshot: a refresh always produces a new
//! instance, cached copies are handed out by clone.

use alloy::primitives::{Address, U256};
use serde::{Serialize, Serializer};
use std::fmt;

/// Registry identifier of a birth certificate. Valid identifiers start at 1.
pub type AgentId = u64;

/// Coarse trust classification derived from a resolved record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub enum TrustLevel {
    /// No verification evidence and no active license.
    #[default]
    Unverified = 0,
    /// Co-signed by a human principal or explicitly flagged verified.
    Verified = 1,
    /// Holds at least one active license.
    Licensed = 2,
}

impl TrustLevel {
    /// Derive the level for a record.
    ///
    /// Licensure outranks verification: a record with any active license is
    /// [`TrustLevel::Licensed`] whatever its verification evidence says.
    #[must_use]
    pub fn derive(verified: bool, licenses: &[License]) -> Self {
        if licenses.iter().any(|license| license.active) {
            Self::Licensed
        } else if verified {
            Self::Verified
        } else {
            Self::Unverified
        }
    }

    /// Numeric form (0, 1 or 2).
    #[must_use]
    pub const fn as_u8(self) -> u8 {
        self as u8
    }
}

impl fmt::Display for TrustLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_u8())
    }
}

impl Serialize for TrustLevel {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u8(self.as_u8())
    }
}

/// Parent relationship of a record. `parent_id == 0` means a root record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Lineage {
    /// Identifier of the parent record, 0 when there is none.
    pub parent_id: AgentId,
    /// Distance from the human-originated root.
    pub depth: u64,
}

impl Lineage {
    /// Returns true when the record has no parent.
    #[must_use]
    pub fn is_root(&self) -> bool {
        self.parent_id == 0
    }
}

/// A professional credential attached to a record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct License {
    /// Credential type, e.g. `MLO`.
    #[serde(rename = "type")]
    pub license_type: String,
    /// Credential number issued by the licensing body.
    pub identifier: String,
    /// Issue time as reported by the registry.
    pub issued_at: u64,
    /// Whether the credential is currently active.
    pub active: bool,
    /// Named holder, when the schema records one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub holder: Option<String>,
    /// Issuing jurisdiction, when the schema records one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub jurisdiction: Option<String>,
}

/// A fully resolved birth certificate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AgentRecord {
    /// Registry identifier.
    pub id: AgentId,
    /// Display name.
    pub name: String,
    /// Agent type label.
    pub agent_type: String,
    /// Current holder of the certificate.
    pub owner: Address,
    /// Address that minted the certificate, when the schema records it.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub creator: Option<Address>,
    /// Human co-signer, when the schema records one and it is set.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub human_principal: Option<Address>,
    /// Birth marker: block number or unix timestamp depending on schema.
    pub created_at: u64,
    /// Registry active flag.
    pub active: bool,
    /// Whether the record carries verification evidence.
    pub verified: bool,
    /// Parent relationship.
    pub lineage: Lineage,
    /// Licenses in registry order.
    pub licenses: Vec<License>,
    /// Derived trust classification.
    pub trust_level: TrustLevel,
    /// Metadata URI, possibly empty.
    #[serde(rename = "metadataURI")]
    pub metadata_uri: String,
}

impl AgentRecord {
    /// Returns the active licenses in registry order.
    pub fn active_licenses(&self) -> impl Iterator<Item = &License> {
        self.licenses.iter().filter(|license| license.active)
    }
}

/// Outcome of a verification query.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VerificationResult {
    /// Whether a valid record backs the query.
    pub verified: bool,
    /// Trust level of the record, 0 when unverified.
    pub trust_level: TrustLevel,
    /// The resolved record.
    pub agent: Option<AgentRecord>,
    /// Human-readable failure cause.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl VerificationResult {
    /// A successful verification backed by `agent`.
    #[must_use]
    pub fn verified(agent: AgentRecord) -> Self {
        Self {
            verified: true,
            trust_level: agent.trust_level,
            agent: Some(agent),
            error: None,
        }
    }

    /// A failed verification with a human-readable cause.
    #[must_use]
    pub fn failed(error: impl Into<String>) -> Self {
        Self {
            verified: false,
            trust_level: TrustLevel::Unverified,
            agent: None,
            error: Some(error.into()),
        }
    }
}

/// Aggregate protocol counters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProtocolStats {
    /// Total birth certificates issued.
    pub total_agents: u64,
    /// Total faucet claims.
    pub total_faucet_claims: u64,
    /// CLAMS total supply, formatted with the token's decimals.
    pub total_clams_supply: String,
}

/// CLAMS balance of an address.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TokenBalance {
    /// Amount in base units.
    #[serde(serialize_with = "serialize_decimal")]
    pub raw: U256,
    /// Amount as a fixed-point decimal string.
    pub formatted: String,
    /// `formatted` as a float. Lossy for large balances.
    pub approx: f64,
}

fn serialize_decimal<S: Serializer>(value: &U256, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.collect_str(value)
}
