//! Record resolution engine.
//!
//! ```text
//! resolve_by_owner(addr)          resolve_by_id(id)
//!        │                               │
//!        ▼                               │
//! ┌─────────────────────┐                │
//! │ total_records()     │                │
//! │ probe owner_of(N..1)│                │
//! └─────────┬───────────┘                │
//!           │ first match k              │
//!           └──────────────┬─────────────┘
//!                          ▼
//!               ┌─────────────────────┐
//!               │ Check TTL cache     │
//!               └─────────┬───────────┘
//!                         │
//!                  ┌──────┴──────┐
//!                  │             │
//!                 HIT          MISS
//!                  │             │
//!                  ▼             ▼
//!               Return     Fan out reads via
//!                          the schema adapter
//!                                │
//!                                ▼
//!                      Derive trust level,
//!                      cache, return
//! ```

mod assembler;
mod cache;
mod resolver;
mod schema;

pub use assembler::RecordAssembler;
pub use cache::{CacheKey, CacheStats, CachedValue, RegistryCache, TtlCache, DEFAULT_TTL};
pub use resolver::{OwnerLookup, OwnerResolver};
pub use schema::{
    adapter_for, Auxiliary, CoreRecord, SchemaAdapter, SchemaV1, SchemaV2, MAX_LICENSES,
};
