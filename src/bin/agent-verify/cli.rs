//! Command-line interface definition.

use agent_verify::{SchemaVersion, VerifierConfig};
use alloy::primitives::Address;
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Read-only verification of agent birth certificates.
#[derive(Parser, Debug)]
#[command(name = "agent-verify")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// JSON-RPC endpoint.
    #[arg(long, global = true, env = "AGENT_VERIFY_RPC_URL")]
    pub rpc_url: Option<String>,

    /// Registry contract address.
    #[arg(long, global = true, env = "AGENT_VERIFY_REGISTRY")]
    pub registry: Option<String>,

    /// CLAMS token contract address.
    #[arg(long, global = true, env = "AGENT_VERIFY_TOKEN")]
    pub token: Option<String>,

    /// CLAMS faucet contract address.
    #[arg(long, global = true, env = "AGENT_VERIFY_FAUCET")]
    pub faucet: Option<String>,

    /// Registry schema version.
    #[arg(long, global = true, value_enum, env = "AGENT_VERIFY_SCHEMA")]
    pub schema: Option<CliSchema>,

    /// Cache TTL in milliseconds.
    #[arg(long, global = true, env = "AGENT_VERIFY_CACHE_TTL_MS")]
    pub cache_ttl_ms: Option<u64>,

    /// Deadline for each remote read, in seconds.
    #[arg(long, global = true, env = "AGENT_VERIFY_TIMEOUT_SECS")]
    pub timeout_secs: Option<u64>,

    /// Log level.
    #[arg(long, global = true, default_value = "warn", env = "RUST_LOG")]
    pub log_level: String,

    /// Emit logs as JSON.
    #[arg(long, global = true)]
    pub json_logs: bool,

    /// Path to configuration file.
    #[arg(long, short, global = true)]
    pub config: Option<PathBuf>,

    /// Query to run.
    #[command(subcommand)]
    pub command: Command,
}

/// Queries.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Verify the certificate held by an address.
    Address {
        /// Wallet address.
        #[arg(value_parser = parse_address)]
        address: Address,
    },
    /// Verify a certificate by identifier.
    Id {
        /// Certificate identifier.
        id: u64,
    },
    /// Check whether an address holds a certificate.
    Registered {
        /// Wallet address.
        #[arg(value_parser = parse_address)]
        address: Address,
    },
    /// Check whether an address has claimed from the faucet.
    Claimed {
        /// Wallet address.
        #[arg(value_parser = parse_address)]
        address: Address,
    },
    /// List certificates minted by an address.
    Creator {
        /// Creator address.
        #[arg(value_parser = parse_address)]
        address: Address,
    },
    /// Check whether a certificate holds a license type.
    HasLicense {
        /// Certificate identifier.
        id: u64,
        /// License type, e.g. MLO.
        license_type: String,
    },
    /// Show protocol counters.
    Stats,
    /// Show the CLAMS balance of an address.
    Balance {
        /// Wallet address.
        #[arg(value_parser = parse_address)]
        address: Address,
    },
}

/// Schema version CLI enum.
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum CliSchema {
    /// Co-signed layout.
    V1,
    /// Verified-flag layout.
    V2,
}

fn parse_address(value: &str) -> Result<Address, String> {
    value
        .parse()
        .map_err(|e| format!("invalid address {value}: {e}"))
}

impl Cli {
    /// Build the verifier configuration: config file (or the default
    /// location) first, then CLI overrides.
    ///
    /// # Errors
    ///
    /// Returns an error if a config file is specified but cannot be loaded.
    pub fn to_config(&self) -> color_eyre::Result<VerifierConfig> {
        let mut config = if let Some(ref path) = self.config {
            VerifierConfig::from_file(path)?
        } else {
            VerifierConfig::load_default()?
        };

        if let Some(ref rpc_url) = self.rpc_url {
            config.rpc_url = Some(rpc_url.clone());
        }
        if let Some(ref registry) = self.registry {
            config.contracts.registry.clone_from(registry);
        }
        if let Some(ref token) = self.token {
            config.contracts.token.clone_from(token);
        }
        if let Some(ref faucet) = self.faucet {
            config.contracts.faucet.clone_from(faucet);
        }
        if let Some(schema) = self.schema {
            config.schema = schema.into();
        }
        if let Some(ttl) = self.cache_ttl_ms {
            config.cache_ttl_ms = ttl;
        }
        if let Some(timeout) = self.timeout_secs {
            config.call_timeout_secs = timeout;
        }
        config.log_level.clone_from(&self.log_level);

        Ok(config)
    }
}

impl From<CliSchema> for SchemaVersion {
    fn from(s: CliSchema) -> Self {
        match s {
            CliSchema::V1 => Self::V1,
            CliSchema::V2 => Self::V2,
        }
    }
}
