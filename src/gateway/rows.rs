//! Decoded registry tuples, one struct per schema layout.
//!
//! These mirror the contract return values field for field. Normalization
//! into [`crate::AgentRecord`] happens in the schema adapters.

use alloy::primitives::Address;

/// V1 core record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AgentRowV1 {
    /// Display name.
    pub name: String,
    /// Agent type label.
    pub agent_type: String,
    /// Minting address.
    pub creator: Address,
    /// Human co-signer, zero when unsigned.
    pub human_principal: Address,
    /// Parent certificate, 0 for roots.
    pub parent_id: u64,
    /// Depth from the human-originated root.
    pub lineage_depth: u64,
    /// Block number at mint.
    pub created_at: u64,
    /// Registry active flag.
    pub active: bool,
}

/// V1 license entry. The layout has no active flag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LicenseRowV1 {
    /// Credential type.
    pub license_type: String,
    /// Credential number.
    pub license_number: String,
    /// Issuing jurisdiction.
    pub jurisdiction: String,
    /// Issue time.
    pub issued_at: u64,
}

/// V2 core record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AgentRowV2 {
    /// Display name.
    pub name: String,
    /// Agent type label.
    pub agent_type: String,
    /// Unix timestamp at mint.
    pub created_at: u64,
    /// Registry active flag.
    pub active: bool,
}

/// V2 license entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LicenseRowV2 {
    /// Credential type.
    pub license_type: String,
    /// Credential number.
    pub identifier: String,
    /// Named holder.
    pub holder: String,
    /// Issue time.
    pub issued_at: u64,
    /// Whether the credential is active.
    pub active: bool,
}
