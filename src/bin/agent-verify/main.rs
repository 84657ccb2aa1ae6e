//! agent-verify CLI entry point.

mod cli;

use agent_verify::AgentVerifier;
use clap::Parser;
use cli::{Cli, Command};
use serde_json::json;
use tracing::debug;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[tokio::main]
async fn main() -> color_eyre::Result<()> {
    // Initialize error handling
    color_eyre::install()?;

    let cli = Cli::parse();

    // Logs go to stderr so stdout stays machine-readable
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&cli.log_level));
    let registry = tracing_subscriber::registry().with(filter);
    if cli.json_logs {
        registry
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        registry.with(fmt::layer().with_writer(std::io::stderr)).init();
    }

    debug!("agent-verify v{}", env!("CARGO_PKG_VERSION"));

    let config = cli.to_config()?;
    let verifier = AgentVerifier::connect(&config)?;

    let output = match cli.command {
        Command::Address { address } => json!(verifier.verify_by_address(address).await),
        Command::Id { id } => json!(verifier.verify_by_id(id).await),
        Command::Registered { address } => json!({
            "address": address,
            "registered": verifier.is_registered(address).await,
        }),
        Command::Claimed { address } => json!({
            "address": address,
            "claimed": verifier.has_claimed(address).await,
        }),
        Command::Creator { address } => json!({
            "creator": address,
            "agents": verifier.agents_by_creator(address).await,
        }),
        Command::HasLicense { id, license_type } => json!({
            "id": id,
            "type": license_type,
            "hasLicense": verifier.has_license(id, &license_type).await,
        }),
        Command::Stats => json!(verifier.stats().await?),
        Command::Balance { address } => json!(verifier.balance(address).await?),
    };

    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}
