//! Concurrency properties of the transfer engine
//!
//! These tests hammer a shared ledger from many OS threads and check the
//! invariants that must hold whatever the interleaving:
//! - the sum of all balances never changes
//! - no balance ever drops below zero
//! - every transfer is applied entirely or not at all
//! - opposite-direction transfers between the same pair never deadlock

use ledger_transfer_engine::{Ledger, RecordingNotifier, TransferError};
use rust_decimal::Decimal;
use std::sync::{Arc, Barrier};
use std::thread;

fn ledger_with(accounts: &[(&str, i64)]) -> (Arc<Ledger>, Arc<RecordingNotifier>) {
    let notifier = Arc::new(RecordingNotifier::new());
    let ledger = Arc::new(Ledger::new(notifier.clone()));
    for (id, balance) in accounts {
        ledger
            .store()
            .open_account(*id, Decimal::new(*balance, 0))
            .expect("open account");
    }
    (ledger, notifier)
}

fn balance(ledger: &Ledger, id: &str) -> Decimal {
    ledger.store().get_account(id).expect("account exists").balance()
}

#[test]
fn test_literal_transfer_scenario() {
    let (ledger, notifier) = ledger_with(&[("A", 1000), ("B", 0)]);

    ledger
        .engine()
        .transfer("A", "B", Decimal::new(200, 0))
        .unwrap();

    assert_eq!(balance(&ledger, "A"), Decimal::new(800, 0));
    assert_eq!(balance(&ledger, "B"), Decimal::new(200, 0));
    assert_eq!(notifier.for_account("A").len(), 1);
    assert_eq!(notifier.for_account("B").len(), 1);
}

#[test]
fn test_rejections_leave_ledger_untouched() {
    let (ledger, notifier) = ledger_with(&[("A", 1000), ("B", 0)]);
    let engine = ledger.engine();

    assert!(matches!(
        engine.transfer("A", "B", Decimal::new(1500, 0)),
        Err(TransferError::NegativeBalance { .. })
    ));
    assert!(matches!(
        engine.transfer("A", "A", Decimal::new(10, 0)),
        Err(TransferError::SameAccount { .. })
    ));
    assert!(matches!(
        engine.transfer("A", "B", Decimal::new(-500, 0)),
        Err(TransferError::NegativeAmount { .. })
    ));
    assert!(matches!(
        engine.transfer("Z", "Z", Decimal::new(-1, 0)),
        Err(TransferError::NonexistentAccount { .. })
    ));

    assert_eq!(balance(&ledger, "A"), Decimal::new(1000, 0));
    assert_eq!(balance(&ledger, "B"), Decimal::ZERO);
    assert!(notifier.is_empty());
}

#[test]
fn test_parallel_identical_transfers_apply_atomically() {
    const THREADS: usize = 8;
    const PER_THREAD: usize = 250;

    let (ledger, notifier) = ledger_with(&[("X", 100_000), ("Y", 0)]);
    let barrier = Arc::new(Barrier::new(THREADS));

    let handles: Vec<_> = (0..THREADS)
        .map(|_| {
            let ledger = Arc::clone(&ledger);
            let barrier = Arc::clone(&barrier);
            thread::spawn(move || {
                barrier.wait();
                for _ in 0..PER_THREAD {
                    ledger
                        .engine()
                        .transfer("X", "Y", Decimal::new(3, 0))
                        .expect("transfer succeeds");
                }
            })
        })
        .collect();

    for handle in handles {
        handle.join().expect("worker panicked");
    }

    let moved = Decimal::new(3 * (THREADS * PER_THREAD) as i64, 0);
    assert_eq!(balance(&ledger, "X"), Decimal::new(100_000, 0) - moved);
    assert_eq!(balance(&ledger, "Y"), moved);
    assert_eq!(notifier.len(), 2 * THREADS * PER_THREAD);
}

#[test]
fn test_opposite_directions_do_not_deadlock() {
    const ROUNDS: usize = 5_000;

    let (ledger, _) = ledger_with(&[("A", 1_000), ("B", 1_000)]);
    let barrier = Arc::new(Barrier::new(2));

    let spawn_direction = |from: &'static str, to: &'static str| {
        let ledger = Arc::clone(&ledger);
        let barrier = Arc::clone(&barrier);
        thread::spawn(move || {
            barrier.wait();
            for _ in 0..ROUNDS {
                let _ = ledger.engine().transfer(from, to, Decimal::ONE);
            }
        })
    };

    let forward = spawn_direction("A", "B");
    let backward = spawn_direction("B", "A");

    forward.join().expect("forward worker panicked");
    backward.join().expect("backward worker panicked");

    assert_eq!(ledger.store().total_balance(), Decimal::new(2_000, 0));
    assert!(balance(&ledger, "A") >= Decimal::ZERO);
    assert!(balance(&ledger, "B") >= Decimal::ZERO);
}

#[test]
fn test_random_mesh_conserves_total_and_never_overdraws() {
    const THREADS: usize = 8;
    const PER_THREAD: usize = 1_000;
    let ids = ["A", "B", "C", "D", "E"];

    let (ledger, _) = ledger_with(&ids.map(|id| (id, 50_i64)));
    let barrier = Arc::new(Barrier::new(THREADS + 1));

    let handles: Vec<_> = (0..THREADS)
        .map(|t| {
            let ledger = Arc::clone(&ledger);
            let barrier = Arc::clone(&barrier);
            thread::spawn(move || {
                barrier.wait();
                let mut state = (t as u64 + 1).wrapping_mul(0x9E37_79B9_7F4A_7C15);
                for _ in 0..PER_THREAD {
                    // xorshift
                    state ^= state << 13;
                    state ^= state >> 7;
                    state ^= state << 17;
                    let from = ids[(state % 5) as usize];
                    let to = ids[((state >> 8) % 5) as usize];
                    let amount = Decimal::new(((state >> 16) % 40) as i64, 0);
                    match ledger.engine().transfer(from, to, amount) {
                        Ok(_) => {}
                        Err(e) => assert!(e.is_rejection(), "unexpected fault: {}", e),
                    }
                }
            })
        })
        .collect();

    barrier.wait();
    // Observe while transfers are in flight.
    for _ in 0..200 {
        for snapshot in ledger.balances() {
            assert!(snapshot.balance >= Decimal::ZERO, "{:?}", snapshot);
        }
    }

    for handle in handles {
        handle.join().expect("worker panicked");
    }

    assert_eq!(ledger.store().total_balance(), Decimal::new(250, 0));
    assert!(ledger
        .balances()
        .iter()
        .all(|snapshot| snapshot.balance >= Decimal::ZERO));
}

#[test]
fn test_concurrent_overdraft_admits_exactly_what_fits() {
    const THREADS: usize = 10;

    let (ledger, _) = ledger_with(&[("S", 300), ("T", 0)]);
    let barrier = Arc::new(Barrier::new(THREADS));

    let handles: Vec<_> = (0..THREADS)
        .map(|_| {
            let ledger = Arc::clone(&ledger);
            let barrier = Arc::clone(&barrier);
            thread::spawn(move || {
                barrier.wait();
                ledger.engine().transfer("S", "T", Decimal::new(100, 0))
            })
        })
        .collect();

    let results: Vec<_> = handles
        .into_iter()
        .map(|h| h.join().expect("worker panicked"))
        .collect();

    assert_eq!(results.iter().filter(|r| r.is_ok()).count(), 3);
    assert!(results
        .iter()
        .filter_map(|r| r.as_ref().err())
        .all(|e| matches!(e, TransferError::NegativeBalance { .. })));
    assert_eq!(balance(&ledger, "S"), Decimal::ZERO);
    assert_eq!(balance(&ledger, "T"), Decimal::new(300, 0));
}

#[test]
fn test_same_account_rejected_under_concurrency() {
    let (ledger, _) = ledger_with(&[("A", 10)]);

    let handles: Vec<_> = (0..4)
        .map(|_| {
            let ledger = Arc::clone(&ledger);
            thread::spawn(move || ledger.engine().transfer("A", "A", Decimal::ONE))
        })
        .collect();

    for handle in handles {
        assert!(matches!(
            handle.join().expect("worker panicked"),
            Err(TransferError::SameAccount { .. })
        ));
    }
    assert_eq!(balance(&ledger, "A"), Decimal::new(10, 0));
}
