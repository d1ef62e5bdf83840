use proptest::prelude::*;
use seqchain_controller::{index_accepted, ActionMetrics};
use seqchain_storage::{get_transaction, KeyValueStore, MemoryStore};
use seqchain_types::{Action, ActionKind, Auth, ExecutionResult, StatelessBlock, Transaction};

/// (action tag, success, units). Tags past the known range exercise the
/// unknown-kind branch.
fn outcome() -> impl Strategy<Value = (u8, bool, u64)> {
    (0u8..12, any::<bool>(), 0u64..1_000)
}

fn build_block(outcomes: &[(u8, bool, u64)], timestamp: i64) -> StatelessBlock {
    let mut txs = Vec::with_capacity(outcomes.len());
    let mut results = Vec::with_capacity(outcomes.len());
    for (nonce, (tag, success, units)) in outcomes.iter().enumerate() {
        txs.push(Transaction::new(
            timestamp,
            [0u8; 32],
            1,
            Action::raw(*tag, (nonce as u64).to_be_bytes().to_vec()),
            Auth::ed25519([5u8; 32]),
        ));
        results.push(if *success {
            ExecutionResult::success(*units)
        } else {
            ExecutionResult::failure(*units, Vec::new())
        });
    }
    StatelessBlock::new([0u8; 32], 1, timestamp, txs, results)
}

proptest! {
    #[test]
    fn counters_match_successful_known_actions(
        outcomes in prop::collection::vec(outcome(), 0..40),
        timestamp in any::<i64>(),
    ) {
        let store = MemoryStore::new();
        let metrics = ActionMetrics::new();
        let block = build_block(&outcomes, timestamp);

        let indexed = index_accepted(&store, &metrics, &block).unwrap();
        prop_assert_eq!(indexed.records, outcomes.len());
        prop_assert_eq!(store.len(), outcomes.len());

        for kind in ActionKind::ALL {
            let expected = outcomes
                .iter()
                .filter(|(tag, success, _)| *success && *tag == kind.type_id())
                .count() as u64;
            prop_assert_eq!(metrics.get(kind), expected);
        }
        let known_successes = outcomes
            .iter()
            .filter(|(tag, success, _)| *success && ActionKind::from_type_id(*tag).is_some())
            .count() as u64;
        prop_assert_eq!(metrics.total(), known_successes);

        for (tx, (_, success, units)) in block.txs.iter().zip(outcomes.iter()) {
            let record = get_transaction(&store, &tx.id()).unwrap().unwrap();
            prop_assert_eq!(record.timestamp, timestamp);
            prop_assert_eq!(record.success, *success);
            prop_assert_eq!(record.units, *units);
        }
    }

    #[test]
    fn failed_write_leaves_no_records(
        outcomes in prop::collection::vec(outcome(), 1..20),
        fail_at in any::<prop::sample::Index>(),
    ) {
        let store = MemoryStore::new();
        let metrics = ActionMetrics::new();
        let block = build_block(&outcomes, 10);
        let faulty = store.failing_put_at(fail_at.index(outcomes.len()));

        prop_assert!(index_accepted(&faulty, &metrics, &block).is_err());
        prop_assert!(store.is_empty());
    }

    #[test]
    fn failed_commit_leaves_no_records(outcomes in prop::collection::vec(outcome(), 1..20)) {
        let store = MemoryStore::new();
        let metrics = ActionMetrics::new();
        let block = build_block(&outcomes, 10);

        prop_assert!(index_accepted(&store.failing_commit(), &metrics, &block).is_err());
        prop_assert!(store.is_empty());
    }
}
