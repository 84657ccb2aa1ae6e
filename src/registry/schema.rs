//! Schema adapters: normalize each registry layout into one record shape.
//!
//! The assembler only talks to [`SchemaAdapter`]; which calls a layout needs
//! and how its tuples map onto [`AgentRecord`](crate::AgentRecord) fields
//! stays in here.

use crate::config::SchemaVersion;
use crate::error::{Error, Result};
use crate::gateway::{LicenseRowV1, LicenseRowV2, ReadGateway};
use crate::types::{AgentId, License, Lineage};
use alloy::primitives::Address;
use async_trait::async_trait;
use futures::stream::{self, StreamExt, TryStreamExt};
use std::sync::Arc;
use tracing::warn;

/// Largest license count a V2 record may report. A higher count is treated
/// as a decode failure rather than a list to fetch.
pub const MAX_LICENSES: u64 = 256;

/// Per-index license reads kept in flight at once.
pub const LICENSE_READS_IN_FLIGHT: usize = 8;

/// Core fields every layout provides.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CoreRecord {
    /// Display name.
    pub name: String,
    /// Agent type label.
    pub agent_type: String,
    /// Minting address, if the layout records it.
    pub creator: Option<Address>,
    /// Human co-signer, if the layout records it and it is set.
    pub human_principal: Option<Address>,
    /// Birth marker.
    pub created_at: u64,
    /// Registry active flag.
    pub active: bool,
    /// Lineage, if the layout carries it inline.
    pub lineage: Option<Lineage>,
}

/// Verification and lineage fields read outside the core record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Auxiliary {
    /// Explicit verified flag.
    pub verified: bool,
    /// Lineage, if read separately.
    pub lineage: Option<Lineage>,
}

/// Reads and normalizes one registry layout.
#[async_trait]
pub trait SchemaAdapter: Send + Sync {
    /// The layout this adapter reads.
    fn version(&self) -> SchemaVersion;

    /// Read the core record. Failure aborts assembly.
    async fn fetch_core(&self, gateway: &dyn ReadGateway, id: AgentId) -> Result<CoreRecord>;

    /// Read the licenses in registry order.
    async fn fetch_licenses(&self, gateway: &dyn ReadGateway, id: AgentId)
        -> Result<Vec<License>>;

    /// Read the auxiliary fields. Each field falls back to its default on
    /// its own, so this never fails.
    async fn fetch_auxiliary(&self, gateway: &dyn ReadGateway, id: AgentId) -> Auxiliary;
}

/// Adapter for the configured schema version.
#[must_use]
pub fn adapter_for(version: SchemaVersion) -> Arc<dyn SchemaAdapter> {
    match version {
        SchemaVersion::V1 => Arc::new(SchemaV1),
        SchemaVersion::V2 => Arc::new(SchemaV2),
    }
}

/// Co-signed layout: verification evidence is a non-zero human principal.
#[derive(Debug, Clone, Copy, Default)]
pub struct SchemaV1;

#[async_trait]
impl SchemaAdapter for SchemaV1 {
    fn version(&self) -> SchemaVersion {
        SchemaVersion::V1
    }

    async fn fetch_core(&self, gateway: &dyn ReadGateway, id: AgentId) -> Result<CoreRecord> {
        let row = gateway.agent_v1(id).await?;
        Ok(CoreRecord {
            name: row.name,
            agent_type: row.agent_type,
            creator: non_zero(row.creator),
            human_principal: non_zero(row.human_principal),
            created_at: row.created_at,
            active: row.active,
            lineage: Some(Lineage {
                parent_id: row.parent_id,
                depth: row.lineage_depth,
            }),
        })
    }

    async fn fetch_licenses(
        &self,
        gateway: &dyn ReadGateway,
        id: AgentId,
    ) -> Result<Vec<License>> {
        let rows = gateway.licenses_v1(id).await?;
        Ok(rows.into_iter().map(license_from_v1).collect())
    }

    async fn fetch_auxiliary(&self, _gateway: &dyn ReadGateway, _id: AgentId) -> Auxiliary {
        // Everything auxiliary is inline in the core record.
        Auxiliary::default()
    }
}

/// Verified-flag layout with separate lineage and per-index licenses.
#[derive(Debug, Clone, Copy, Default)]
pub struct SchemaV2;

#[async_trait]
impl SchemaAdapter for SchemaV2 {
    fn version(&self) -> SchemaVersion {
        SchemaVersion::V2
    }

    async fn fetch_core(&self, gateway: &dyn ReadGateway, id: AgentId) -> Result<CoreRecord> {
        let row = gateway.agent_v2(id).await?;
        Ok(CoreRecord {
            name: row.name,
            agent_type: row.agent_type,
            creator: None,
            human_principal: None,
            created_at: row.created_at,
            active: row.active,
            lineage: None,
        })
    }

    async fn fetch_licenses(
        &self,
        gateway: &dyn ReadGateway,
        id: AgentId,
    ) -> Result<Vec<License>> {
        let count = gateway.license_count(id).await?;
        if count > MAX_LICENSES {
            return Err(Error::Decode(format!(
                "agent {id} reports {count} licenses, more than {MAX_LICENSES}"
            )));
        }

        stream::iter(0..count)
            .map(|index| gateway.license_at(id, index))
            .buffered(LICENSE_READS_IN_FLIGHT)
            .map_ok(license_from_v2)
            .try_collect()
            .await
    }

    async fn fetch_auxiliary(&self, gateway: &dyn ReadGateway, id: AgentId) -> Auxiliary {
        let (verified, lineage) = tokio::join!(gateway.is_verified(id), gateway.lineage(id));

        let verified = verified.unwrap_or_else(|e| {
            warn!("Verified flag unavailable for agent {id}, treating as unverified: {e}");
            false
        });
        let lineage = lineage.unwrap_or_else(|e| {
            warn!("Lineage unavailable for agent {id}, treating as root: {e}");
            Lineage::default()
        });

        Auxiliary {
            verified,
            lineage: Some(lineage),
        }
    }
}

fn non_zero(address: Address) -> Option<Address> {
    (!address.is_zero()).then_some(address)
}

fn license_from_v1(row: LicenseRowV1) -> License {
    License {
        license_type: row.license_type,
        identifier: row.license_number,
        issued_at: row.issued_at,
        // The V1 layout has no active flag
        active: true,
        holder: None,
        jurisdiction: Some(row.jurisdiction).filter(|j| !j.is_empty()),
    }
}

fn license_from_v2(row: LicenseRowV2) -> License {
    License {
        license_type: row.license_type,
        identifier: row.identifier,
        issued_at: row.issued_at,
        active: row.active,
        holder: Some(row.holder).filter(|h| !h.is_empty()),
        jurisdiction: None,
    }
}
