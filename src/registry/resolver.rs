//! Owner resolver: find the certificate held by a wallet address.
//!
//! There is no owner index on-chain, so resolution is a linear scan over
//! identifiers from the newest down to 1. Cost grows with the registry size
//! and with how old the match is: a match at `k` among `N` certificates
//! takes `N - k + 1` ownership probes. Probes run one at a time so the scan
//! can stop at the first match.

use super::assembler::RecordAssembler;
use crate::error::Error;
use crate::gateway::{with_deadline, ReadGateway};
use crate::types::{AgentId, AgentRecord};
use alloy::primitives::Address;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

/// Outcome of an owner scan.
#[derive(Debug)]
pub enum OwnerLookup {
    /// The owner holds this certificate.
    Found(AgentRecord),
    /// The scan matched certificate `id`, but its record could not be read.
    Unreadable {
        /// The matched identifier.
        id: AgentId,
        /// Why assembly failed.
        error: Error,
    },
    /// No probed certificate belongs to the owner.
    NotFound,
}

impl OwnerLookup {
    /// The record, if one was found and assembled.
    #[must_use]
    pub fn into_record(self) -> Option<AgentRecord> {
        match self {
            Self::Found(record) => Some(record),
            Self::Unreadable { .. } | Self::NotFound => None,
        }
    }
}

/// Resolves wallet addresses to certificates.
#[derive(Clone)]
pub struct OwnerResolver {
    gateway: Arc<dyn ReadGateway>,
    assembler: RecordAssembler,
    call_timeout: Duration,
}

impl OwnerResolver {
    /// Create a resolver delegating matches to `assembler`.
    #[must_use]
    pub fn new(
        gateway: Arc<dyn ReadGateway>,
        assembler: RecordAssembler,
        call_timeout: Duration,
    ) -> Self {
        Self {
            gateway,
            assembler,
            call_timeout,
        }
    }

    /// Resolve the most recently issued certificate held by `owner`.
    ///
    /// A failed probe counts as "not a match" and the scan moves on.
    pub async fn resolve_by_owner(&self, owner: Address) -> Option<AgentRecord> {
        self.lookup(owner).await.into_record()
    }

    /// Scan for `owner` and report whether the matched record could be read.
    pub async fn lookup(&self, owner: Address) -> OwnerLookup {
        let total = match with_deadline(
            self.call_timeout,
            "total records",
            self.gateway.total_records(),
        )
        .await
        {
            Ok(total) => total,
            Err(e) => {
                warn!("Cannot scan for {owner}: total record count unavailable: {e}");
                return OwnerLookup::NotFound;
            }
        };

        if total == 0 {
            debug!("Registry is empty, {owner} holds nothing");
            return OwnerLookup::NotFound;
        }

        debug!("Scanning {total} certificates for owner {owner}");
        for id in (1..=total).rev() {
            match with_deadline(self.call_timeout, "owner probe", self.gateway.owner_of(id)).await {
                Ok(holder) if holder == owner => {
                    debug!("Owner {owner} holds agent {id}");
                    return match self.assembler.fetch(id).await {
                        Ok(record) => OwnerLookup::Found(record),
                        Err(error) => {
                            warn!("Agent {id} held by {owner} could not be assembled: {error}");
                            OwnerLookup::Unreadable { id, error }
                        }
                    };
                }
                Ok(_) => {}
                Err(e) => debug!("Ownership probe for agent {id} failed, skipping: {e}"),
            }
        }

        debug!("No certificate held by {owner} among {total}");
        OwnerLookup::NotFound
    }
}
