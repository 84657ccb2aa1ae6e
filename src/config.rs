//! Configuration for agent-verify.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Public JSON-RPC endpoint used when no override is configured.
pub const DEFAULT_RPC_URL: &str = "https://sepolia.base.org";

/// Registry record layout deployed at the configured registry address.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SchemaVersion {
    /// Records carry creator, human principal and lineage depth inline;
    /// licenses come back as one batched list.
    V1,
    /// Records carry an explicit verified flag; lineage and licenses are
    /// separate per-call accessors.
    #[default]
    V2,
}

/// Addresses of the contracts the client reads from.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContractAddresses {
    /// Birth certificate registry.
    #[serde(default)]
    pub registry: String,

    /// CLAMS token.
    #[serde(default)]
    pub token: String,

    /// CLAMS faucet.
    #[serde(default)]
    pub faucet: String,
}

/// Client configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VerifierConfig {
    /// JSON-RPC endpoint override. `None` uses [`DEFAULT_RPC_URL`].
    #[serde(default)]
    pub rpc_url: Option<String>,

    /// Lifetime of cached records and stats, in milliseconds.
    #[serde(default = "default_cache_ttl_ms")]
    pub cache_ttl_ms: u64,

    /// Maximum number of cached entries.
    #[serde(default = "default_cache_capacity")]
    pub cache_capacity: usize,

    /// Deadline for each remote read, in seconds.
    #[serde(default = "default_call_timeout_secs")]
    pub call_timeout_secs: u64,

    /// Registry schema version.
    #[serde(default)]
    pub schema: SchemaVersion,

    /// Log level.
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Contract addresses.
    #[serde(default)]
    pub contracts: ContractAddresses,
}

impl Default for VerifierConfig {
    fn default() -> Self {
        Self {
            rpc_url: None,
            cache_ttl_ms: default_cache_ttl_ms(),
            cache_capacity: default_cache_capacity(),
            call_timeout_secs: default_call_timeout_secs(),
            schema: SchemaVersion::default(),
            log_level: default_log_level(),
            contracts: ContractAddresses::default(),
        }
    }
}

const fn default_cache_ttl_ms() -> u64 {
    30_000
}

const fn default_cache_capacity() -> usize {
    10_000
}

const fn default_call_timeout_secs() -> u64 {
    30
}

fn default_log_level() -> String {
    "info".to_string()
}

impl VerifierConfig {
    /// The endpoint the client connects to.
    #[must_use]
    pub fn endpoint(&self) -> &str {
        self.rpc_url.as_deref().unwrap_or(DEFAULT_RPC_URL)
    }

    /// Cache TTL as a [`Duration`].
    #[must_use]
    pub fn cache_ttl(&self) -> Duration {
        Duration::from_millis(self.cache_ttl_ms)
    }

    /// Per-read deadline as a [`Duration`].
    #[must_use]
    pub fn call_timeout(&self) -> Duration {
        Duration::from_secs(self.call_timeout_secs)
    }

    /// Default config file location (`<platform config dir>/config.toml`).
    #[must_use]
    pub fn default_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("", "", "agent-verify")
            .map(|dirs| dirs.config_dir().join("config.toml"))
    }

    /// Load the config file at [`Self::default_path`], falling back to
    /// defaults when no such file exists.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn load_default() -> crate::Result<Self> {
        match Self::default_path() {
            Some(path) if path.exists() => Self::from_file(&path),
            _ => Ok(Self::default()),
        }
    }

    /// Load configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn from_file(path: &Path) -> crate::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        toml::from_str(&content).map_err(|e| crate::Error::Config(e.to_string()))
    }

    /// Save configuration to a TOML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be written.
    pub fn to_file(&self, path: &Path) -> crate::Result<()> {
        let content =
            toml::to_string_pretty(self).map_err(|e| crate::Error::Config(e.to_string()))?;
        std::fs::write(path, content)?;
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = VerifierConfig::default();
        assert_eq!(config.cache_ttl(), Duration::from_millis(30_000));
        assert_eq!(config.call_timeout(), Duration::from_secs(30));
        assert_eq!(config.endpoint(), DEFAULT_RPC_URL);
        assert_eq!(config.schema, SchemaVersion::V2);
    }

    #[test]
    fn test_endpoint_override() {
        let config = VerifierConfig {
            rpc_url: Some("http://127.0.0.1:8545".to_string()),
            ..Default::default()
        };
        assert_eq!(config.endpoint(), "http://127.0.0.1:8545");
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("config.toml");
        std::fs::write(
            &path,
            "schema = \"v1\"\ncache_ttl_ms = 500\n\n[contracts]\nregistry = \"0x01\"\n",
        )
        .expect("write");

        let config = VerifierConfig::from_file(&path).expect("parse");
        assert_eq!(config.schema, SchemaVersion::V1);
        assert_eq!(config.cache_ttl_ms, 500);
        assert_eq!(config.cache_capacity, 10_000);
        assert_eq!(config.contracts.registry, "0x01");
        assert!(config.contracts.token.is_empty());
    }

    #[test]
    fn test_save_and_reload() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("config.toml");
        let config = VerifierConfig {
            rpc_url: Some("http://localhost:8545".to_string()),
            call_timeout_secs: 5,
            ..Default::default()
        };
        config.to_file(&path).expect("save");

        let loaded = VerifierConfig::from_file(&path).expect("load");
        assert_eq!(loaded.rpc_url, config.rpc_url);
        assert_eq!(loaded.call_timeout_secs, 5);
    }

    #[test]
    fn test_malformed_file_is_config_error() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "cache_ttl_ms = \"soon\"").expect("write");

        let err = VerifierConfig::from_file(&path).unwrap_err();
        assert!(matches!(err, crate::Error::Config(_)));
    }
}
