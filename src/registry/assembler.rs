//! Record assembler: one identifier in, one complete record out.
//!
//! All reads for a record are issued together and joined before anything is
//! assembled. Only the core record and the owner are mandatory; licenses,
//! verification, lineage and the metadata URI fall back to defaults.

use super::cache::{CacheKey, CachedValue, RegistryCache};
use super::schema::{Auxiliary, CoreRecord, SchemaAdapter};
use crate::error::{Error, Result};
use crate::gateway::{with_deadline, ReadGateway};
use crate::types::{AgentId, AgentRecord, License, TrustLevel};
use alloy::primitives::Address;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

/// Builds [`AgentRecord`]s through a schema adapter and caches them.
#[derive(Clone)]
pub struct RecordAssembler {
    gateway: Arc<dyn ReadGateway>,
    schema: Arc<dyn SchemaAdapter>,
    cache: RegistryCache,
    call_timeout: Duration,
}

impl RecordAssembler {
    /// Create an assembler.
    #[must_use]
    pub fn new(
        gateway: Arc<dyn ReadGateway>,
        schema: Arc<dyn SchemaAdapter>,
        cache: RegistryCache,
        call_timeout: Duration,
    ) -> Self {
        Self {
            gateway,
            schema,
            cache,
            call_timeout,
        }
    }

    /// Resolve certificate `id`, from cache when fresh.
    ///
    /// Returns `None` when the core record or owner cannot be read; a
    /// partial record is never returned.
    pub async fn resolve_by_id(&self, id: AgentId) -> Option<AgentRecord> {
        self.fetch(id)
            .await
            .map_err(|e| debug!("Agent {id} could not be assembled: {e}"))
            .ok()
    }

    /// Like [`Self::resolve_by_id`], but keeps the reason a record could not
    /// be assembled.
    ///
    /// # Errors
    ///
    /// Returns an error if `id` is 0 or the core record or owner cannot be
    /// read. Nothing is cached in that case.
    pub async fn fetch(&self, id: AgentId) -> Result<AgentRecord> {
        if id == 0 {
            return Err(Error::NotFound("agent id 0 is never issued".to_string()));
        }

        let key = CacheKey::Agent(id);
        if let Some(CachedValue::Agent(record)) = self.cache.get(&key) {
            debug!("Agent {id} served from cache");
            return Ok(record);
        }

        let record = self.assemble(id).await?;
        debug!(
            "Agent {id} assembled (owner={}, trust_level={}, licenses={})",
            record.owner,
            record.trust_level,
            record.licenses.len()
        );
        self.cache.insert(key, CachedValue::Agent(record.clone()));
        Ok(record)
    }

    async fn assemble(&self, id: AgentId) -> Result<AgentRecord> {
        let gateway = self.gateway.as_ref();
        let deadline = self.call_timeout;

        let (core, owner, licenses, auxiliary, metadata_uri) = tokio::join!(
            with_deadline(deadline, "core record", self.schema.fetch_core(gateway, id)),
            with_deadline(deadline, "owner", gateway.owner_of(id)),
            async {
                with_deadline(deadline, "licenses", self.schema.fetch_licenses(gateway, id))
                    .await
                    .unwrap_or_else(|e| {
                        warn!("Licenses unavailable for agent {id}, using none: {e}");
                        Vec::new()
                    })
            },
            async {
                with_deadline(deadline, "auxiliary", async {
                    Ok::<_, Error>(self.schema.fetch_auxiliary(gateway, id).await)
                })
                .await
                .unwrap_or_default()
            },
            async {
                with_deadline(deadline, "metadata uri", gateway.metadata_uri(id))
                    .await
                    .unwrap_or_else(|e| {
                        debug!("Metadata URI unavailable for agent {id}: {e}");
                        String::new()
                    })
            },
        );

        let core = core?;
        let owner = owner?;
        if owner.is_zero() {
            return Err(Error::NotFound(format!("agent {id} has no owner")));
        }

        Ok(build_record(id, owner, core, licenses, auxiliary, metadata_uri))
    }
}

fn build_record(
    id: AgentId,
    owner: Address,
    core: CoreRecord,
    licenses: Vec<License>,
    auxiliary: Auxiliary,
    metadata_uri: String,
) -> AgentRecord {
    let verified = auxiliary.verified || core.human_principal.is_some();
    let lineage = core.lineage.or(auxiliary.lineage).unwrap_or_default();
    let trust_level = TrustLevel::derive(verified, &licenses);

    AgentRecord {
        id,
        name: core.name,
        agent_type: core.agent_type,
        owner,
        creator: core.creator,
        human_principal: core.human_principal,
        created_at: core.created_at,
        active: core.active,
        verified,
        lineage,
        licenses,
        trust_level,
        metadata_uri,
    }
}
