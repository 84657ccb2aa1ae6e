//! Smoke test against a real endpoint.
//!
//! Reads the endpoint and contract addresses from the `AGENT_VERIFY_*`
//! environment variables the CLI uses.

use agent_verify::{AgentVerifier, ContractAddresses, VerifierConfig};

fn live_config() -> Option<VerifierConfig> {
    let var = |name: &str| std::env::var(name).ok().filter(|v| !v.is_empty());
    Some(VerifierConfig {
        rpc_url: var("AGENT_VERIFY_RPC_URL"),
        contracts: ContractAddresses {
            registry: var("AGENT_VERIFY_REGISTRY")?,
            token: var("AGENT_VERIFY_TOKEN")?,
            faucet: var("AGENT_VERIFY_FAUCET")?,
        },
        ..Default::default()
    })
}

#[tokio::test]
#[ignore = "Requires a live JSON-RPC endpoint - run with --ignored"]
async fn live_stats_and_first_record() {
    let Some(config) = live_config() else {
        eprintln!("AGENT_VERIFY_REGISTRY/TOKEN/FAUCET not set, skipping");
        return;
    };
    let verifier = AgentVerifier::connect(&config).expect("connect");

    let stats = verifier.stats().await.expect("stats");
    if stats.total_agents > 0 {
        let result = verifier.verify_by_id(1).await;
        assert!(result.verified, "certificate 1 should resolve: {:?}", result.error);
    }
}
