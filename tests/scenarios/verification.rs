//! Facade behaviour across the documented scenarios.

use super::harness::{creator, mlo_license, stranger, Harness};
use agent_verify::gateway::{FixtureCall, LicenseRowV1};
use agent_verify::{TrustLevel, VerifierConfig};
use alloy::primitives::{Address, U256};
use std::str::FromStr;
use std::time::Duration;

/// Registry of 3; certificate 2 belongs to X and carries an active MLO license.
#[tokio::test]
async fn test_licensed_holder_verifies_by_address() {
    let harness = Harness::new();
    let x = Address::repeat_byte(0x42);
    harness.add_agent(1, stranger(1), Vec::new(), false);
    harness.add_agent(2, x, vec![mlo_license()], false);
    harness.add_agent(3, stranger(3), Vec::new(), true);

    let result = harness.verifier.verify_by_address(x).await;

    assert!(result.verified);
    assert_eq!(result.trust_level, TrustLevel::Licensed);
    let agent = result.agent.expect("agent");
    assert_eq!(agent.id, 2);
    assert_eq!(agent.licenses[0].license_type, "MLO");
    assert_eq!(agent.licenses[0].identifier, "154083");
    assert!(result.error.is_none());
}

#[tokio::test]
async fn test_unregistered_address_skips_scan() {
    let harness = Harness::new();
    harness.add_agent(1, stranger(1), Vec::new(), true);
    harness.add_agent(2, stranger(2), Vec::new(), true);

    let result = harness
        .verifier
        .verify_by_address(Address::repeat_byte(0x77))
        .await;

    assert!(!result.verified);
    assert!(result.agent.is_none());
    assert!(result.error.expect("error").contains("not registered"));
    assert_eq!(harness.gateway.calls(FixtureCall::TotalRecords), 0);
    assert_eq!(harness.gateway.calls(FixtureCall::OwnerOf), 0);
}

#[tokio::test]
async fn test_unknown_id_is_not_verified() {
    let harness = Harness::new();
    harness.add_agent(1, stranger(1), Vec::new(), true);

    let result = harness.verifier.verify_by_id(999).await;

    assert!(!result.verified);
    assert!(result.agent.is_none());
    assert_eq!(result.trust_level, TrustLevel::Unverified);
    assert_eq!(result.error.as_deref(), Some("no record at id 999"));
}

#[tokio::test]
async fn test_stats_formats_whole_supply() {
    let harness = Harness::new();
    harness.add_agent(1, stranger(1), Vec::new(), true);
    let supply = U256::from(1_000_000u64) * U256::from(10u64).pow(U256::from(18u64));
    harness.gateway.set_token_supply(supply, 18);
    harness.gateway.set_claimed(stranger(1));

    let stats = harness.verifier.stats().await.expect("stats");

    assert_eq!(stats.total_clams_supply, "1000000");
    assert_eq!(stats.total_agents, 1);
    assert_eq!(stats.total_faucet_claims, 1);
}

#[tokio::test]
async fn test_faucet_failure_reads_as_unclaimed() {
    let harness = Harness::new();
    let claimant = Address::repeat_byte(0x55);
    harness.gateway.set_claimed(claimant);
    harness.gateway.fail(FixtureCall::HasClaimed);

    assert!(!harness.verifier.has_claimed(claimant).await);

    harness.gateway.recover(FixtureCall::HasClaimed);
    assert!(harness.verifier.has_claimed(claimant).await);
}

#[tokio::test]
async fn test_is_registered_tracks_ownership_count() {
    let harness = Harness::new();
    let holder = Address::repeat_byte(0x10);
    harness.add_agent(1, holder, Vec::new(), false);

    assert!(harness.verifier.is_registered(holder).await);
    assert!(!harness.verifier.is_registered(stranger(9)).await);

    harness.gateway.fail(FixtureCall::RecordsHeld);
    assert!(!harness.verifier.is_registered(holder).await);
}

#[tokio::test]
async fn test_owner_scan_read_budget() {
    let harness = Harness::new();
    let target = Address::repeat_byte(0x42);
    let (total, at) = (12u64, 5u64);
    for id in 1..=total {
        let owner = if id == at {
            target
        } else {
            stranger(u8::try_from(id).expect("small"))
        };
        harness.add_agent(id, owner, Vec::new(), false);
    }

    let record = harness.verifier.resolve_by_owner(target).await.expect("match");

    assert_eq!(record.id, at);
    // N - k + 1 scan probes, then the single ownership read inside the assembly
    let scan = usize::try_from(total - at + 1).expect("fits");
    assert_eq!(harness.gateway.calls(FixtureCall::OwnerOf), scan + 1);
    let descending: Vec<u64> = (at..=total).rev().collect();
    assert_eq!(harness.gateway.owner_probes()[..scan], descending[..]);
    assert_eq!(harness.gateway.calls(FixtureCall::AgentV2), 1);
}

#[tokio::test]
async fn test_inconsistent_state_is_distinguishable() {
    let harness = Harness::new();
    let holder = Address::repeat_byte(0x42);
    harness.add_agent(1, holder, Vec::new(), false);
    harness.add_agent(2, stranger(2), Vec::new(), false);
    // Ownership count says 1, but the only probe that would match fails
    harness.gateway.fail_for(FixtureCall::OwnerOf, 1);

    let result = harness.verifier.verify_by_address(holder).await;

    assert!(!result.verified);
    let error = result.error.expect("error");
    assert!(error.contains("inconsistent registry state"));
    assert!(!error.contains("not registered"));
}

#[tokio::test]
async fn test_unreadable_match_names_the_record() {
    let harness = Harness::new();
    let holder = Address::repeat_byte(0x42);
    harness.add_agent(1, stranger(1), Vec::new(), false);
    harness.add_agent(2, holder, Vec::new(), false);
    harness.gateway.fail_for(FixtureCall::AgentV2, 2);

    let result = harness.verifier.verify_by_address(holder).await;

    assert!(!result.verified);
    let error = result.error.expect("error");
    assert!(error.starts_with("record 2 held by"), "{error}");
    assert!(!error.contains("inconsistent registry state"));
    assert_eq!(harness.gateway.owner_probes()[0], 2);
}

#[tokio::test(start_paused = true)]
async fn test_stalled_reads_are_bounded() {
    let harness = Harness::with_config(VerifierConfig {
        call_timeout_secs: 2,
        ..Default::default()
    });
    let holder = Address::repeat_byte(0x42);
    harness.add_agent(1, stranger(1), Vec::new(), false);
    harness.add_agent(2, holder, vec![mlo_license()], false);
    harness.add_agent(3, stranger(3), Vec::new(), false);
    harness.gateway.set_claimed(holder);
    harness.gateway.hang(FixtureCall::HasClaimed);
    harness.gateway.hang_for(FixtureCall::OwnerOf, 3);

    let started = tokio::time::Instant::now();
    assert!(!harness.verifier.has_claimed(holder).await);
    assert!(started.elapsed() >= Duration::from_secs(2));

    let result = harness.verifier.verify_by_address(holder).await;
    assert!(result.verified);
    assert_eq!(result.agent.expect("agent").id, 2);

    harness.gateway.hang(FixtureCall::TotalRecords);
    let stats = harness.verifier.stats().await;
    assert!(matches!(stats, Err(agent_verify::Error::Timeout { .. })));
}

#[tokio::test]
async fn test_address_lookup_ignores_case() {
    let harness = Harness::new();
    let lower = Address::from_str("0x00000000000000000000000000000000000abcde").expect("addr");
    harness.add_agent(1, lower, vec![mlo_license()], false);

    let upper = Address::from_str("0x00000000000000000000000000000000000ABCDE").expect("addr");
    let result = harness.verifier.verify_by_address(upper).await;

    assert!(result.verified);
    assert_eq!(result.agent.expect("agent").owner, lower);
}

#[tokio::test]
async fn test_clear_cache_then_reresolve_is_identical() {
    let harness = Harness::new();
    harness.add_agent(4, stranger(4), vec![mlo_license()], true);

    let before = harness.verifier.resolve_by_id(4).await.expect("before");
    harness.verifier.clear_cache();
    let after = harness.verifier.resolve_by_id(4).await.expect("after");

    assert_eq!(before, after);
    assert_eq!(harness.gateway.calls(FixtureCall::AgentV2), 2);
}

#[tokio::test(start_paused = true)]
async fn test_resolution_cached_until_ttl() {
    let harness = Harness::with_config(VerifierConfig {
        cache_ttl_ms: 1_000,
        ..Default::default()
    });
    harness.add_agent(1, stranger(1), Vec::new(), true);

    harness.verifier.resolve_by_id(1).await.expect("first");
    harness.gateway.reset_counts();
    harness.verifier.resolve_by_id(1).await.expect("cached");
    assert_eq!(harness.gateway.total_calls(), 0);

    tokio::time::advance(Duration::from_millis(1_000)).await;
    harness.verifier.resolve_by_id(1).await.expect("refreshed");
    assert_eq!(harness.gateway.calls(FixtureCall::AgentV2), 1);
    assert_eq!(harness.gateway.calls(FixtureCall::OwnerOf), 1);
}

#[tokio::test]
async fn test_refresh_replaces_license_list() {
    let harness = Harness::new();
    harness.add_agent(1, stranger(1), vec![mlo_license()], false);
    let first = harness.verifier.resolve_by_id(1).await.expect("first");
    assert_eq!(first.trust_level, TrustLevel::Licensed);

    let mut revoked = mlo_license();
    revoked.active = false;
    harness.add_agent(1, stranger(1), vec![revoked], false);
    harness.verifier.clear_cache();

    let second = harness.verifier.resolve_by_id(1).await.expect("second");
    assert_eq!(second.trust_level, TrustLevel::Unverified);
    // The earlier snapshot is untouched
    assert!(first.licenses[0].active);
}

#[tokio::test]
async fn test_stats_cached_and_supply_tolerant() {
    let harness = Harness::new();
    harness.add_agent(1, stranger(1), Vec::new(), false);
    harness.gateway.fail(FixtureCall::TokenSupply);
    harness.gateway.fail(FixtureCall::TotalClaims);

    let stats = harness.verifier.stats().await.expect("stats");
    assert_eq!(stats.total_clams_supply, "0");
    assert_eq!(stats.total_faucet_claims, 0);

    harness.verifier.stats().await.expect("cached");
    assert_eq!(harness.gateway.calls(FixtureCall::TotalRecords), 1);
}

#[tokio::test]
async fn test_stats_fail_without_total_count() {
    let harness = Harness::new();
    harness.gateway.fail(FixtureCall::TotalRecords);

    assert!(harness.verifier.stats().await.is_err());
}

#[tokio::test]
async fn test_balance_is_formatted_and_uncached() {
    let harness = Harness::new();
    let holder = Address::repeat_byte(0x42);
    harness.gateway.set_token_supply(U256::ZERO, 6);
    harness.gateway.set_balance(holder, U256::from(2_500_000u64));

    let balance = harness.verifier.balance(holder).await.expect("balance");
    assert_eq!(balance.raw, U256::from(2_500_000u64));
    assert_eq!(balance.formatted, "2.5");
    assert!((balance.approx - 2.5).abs() < f64::EPSILON);

    harness.verifier.balance(holder).await.expect("again");
    assert_eq!(harness.gateway.calls(FixtureCall::TokenBalance), 2);
}

#[tokio::test]
async fn test_creator_and_license_passthroughs() {
    let harness = Harness::v1();
    let license = LicenseRowV1 {
        license_type: "RIA".to_string(),
        license_number: "88-1234".to_string(),
        jurisdiction: "SEC".to_string(),
        issued_at: 1,
    };
    harness.add_agent_v1(1, stranger(1), Address::ZERO, vec![license]);
    harness.add_agent_v1(2, stranger(2), Address::ZERO, Vec::new());

    assert_eq!(harness.verifier.agents_by_creator(creator()).await, vec![1, 2]);
    assert!(harness.verifier.has_license(1, "RIA").await);
    assert!(!harness.verifier.has_license(2, "RIA").await);
}

#[tokio::test]
async fn test_v1_cosigned_record_trust() {
    let harness = Harness::v1();
    let holder = Address::repeat_byte(0x42);
    harness.add_agent_v1(1, holder, Address::repeat_byte(0x99), Vec::new());

    let result = harness.verifier.verify_by_address(holder).await;

    assert!(result.verified);
    assert_eq!(result.trust_level, TrustLevel::Verified);
    let agent = result.agent.expect("agent");
    assert_eq!(agent.human_principal, Some(Address::repeat_byte(0x99)));
    assert_eq!(agent.creator, Some(creator()));
}

#[tokio::test]
async fn test_cache_stats_track_hits() {
    let harness = Harness::new();
    harness.add_agent(1, stranger(1), Vec::new(), false);

    harness.verifier.resolve_by_id(1).await.expect("miss");
    harness.verifier.resolve_by_id(1).await.expect("hit");

    let stats = harness.verifier.cache_stats();
    assert_eq!(stats.hits, 1);
    assert_eq!(stats.misses, 1);
    assert_eq!(stats.insertions, 1);
}
