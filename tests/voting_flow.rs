//! End-to-end flows through the coordinator over the in-memory ledger.

use std::sync::Arc;

use chrono::Utc;
use votegate::config::ExecutionConfig;
use votegate::ledger::MemoryLedger;
use votegate::VotingCoordinator;

fn execution() -> ExecutionConfig {
    ExecutionConfig {
        confirmation_timeout_ms: 5_000,
        poll_interval_ms: 5,
    }
}

fn coordinator(ledger: &MemoryLedger) -> VotingCoordinator {
    VotingCoordinator::new(Arc::new(ledger.clone()), &execution())
}

#[tokio::test]
async fn full_scenario_from_creation_to_tally() {
    let ledger = MemoryLedger::new();
    let coordinator = coordinator(&ledger);
    let now = Utc::now().timestamp();

    let org = coordinator.create_organization("Civic Club").await.unwrap();
    assert_eq!(org.organization_id, Some(1));
    assert!(org.block_reference.is_some());

    let read = coordinator.organization(1).await.unwrap();
    assert_eq!(read.name, "Civic Club");
    assert!(read.exists);

    let poll = coordinator
        .create_poll(
            1,
            "Accept the charter?",
            "Founding vote",
            vec!["Yes".into(), "No".into()],
            vec!["QmYes".into(), "QmNo".into()],
            now,
            now + 3600,
        )
        .await
        .unwrap();
    assert_eq!(poll.poll_id, Some(1));

    let summary = coordinator.poll(1).await.unwrap();
    assert_eq!(summary.org_id, 1);
    assert_eq!(summary.title, "Accept the charter?");

    // Freshly created poll tallies at zero for every option.
    let results = coordinator.results(1).await.unwrap();
    assert_eq!(results.counts, vec![0, 0]);

    let vote = coordinator.vote(1, 0).await.unwrap();
    assert_eq!(vote.poll_id, 1);
    assert!(vote.voter.is_some());

    let results = coordinator.results(1).await.unwrap();
    assert_eq!(results.counts, vec![1, 0]);
    assert_eq!(results.total(), 1);
}

#[tokio::test]
async fn voting_increments_exactly_one_option() {
    let ledger = MemoryLedger::new();
    let coordinator = coordinator(&ledger);
    let now = Utc::now().timestamp();

    coordinator.create_organization("Club").await.unwrap();
    coordinator
        .create_poll(
            1,
            "Pick a color",
            "",
            vec!["Red".into(), "Green".into(), "Blue".into()],
            vec!["h1".into(), "h2".into(), "h3".into()],
            now - 10,
            now + 3600,
        )
        .await
        .unwrap();

    coordinator.vote(1, 1).await.unwrap();

    let results = coordinator.results(1).await.unwrap();
    assert_eq!(results.counts, vec![0, 1, 0]);
}

#[tokio::test]
async fn distinct_voters_tally_independently() {
    let ledger = MemoryLedger::new();
    let first = coordinator(&ledger);
    let second = VotingCoordinator::new(
        Arc::new(ledger.as_sender("0x00000000000000000000000000000000000000b2")),
        &execution(),
    );
    let now = Utc::now().timestamp();

    first.create_organization("Club").await.unwrap();
    first
        .create_poll(
            1,
            "Quorum?",
            "",
            vec!["Yes".into(), "No".into()],
            vec!["h1".into(), "h2".into()],
            now - 10,
            now + 3600,
        )
        .await
        .unwrap();

    first.vote(1, 0).await.unwrap();
    second.vote(1, 1).await.unwrap();

    let results = first.results(1).await.unwrap();
    assert_eq!(results.counts, vec![1, 1]);
}
