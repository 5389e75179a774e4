//! Racing transfers and withdraws on shared accounts.

mod common;

use std::sync::{Arc, Barrier};
use std::thread;

use common::{retrying, Harness, TOKEN};
use levy_fee::FeeError;
use levy_ledger::LedgerClient;

#[test]
fn double_spend_of_one_balance_admits_one_winner() {
    for _ in 0..50 {
        let h = Arc::new(Harness::standard());
        let (owner, source) = h.funded_owner(100 * TOKEN);
        let recipients = [h.keys.generate(), h.keys.generate()];
        let barrier = Arc::new(Barrier::new(2));

        let handles: Vec<_> = recipients
            .into_iter()
            .map(|recipient| {
                let h = Arc::clone(&h);
                let barrier = Arc::clone(&barrier);
                thread::spawn(move || {
                    barrier.wait();
                    h.transfer(&owner, source, &recipient, 100 * TOKEN)
                })
            })
            .collect();
        let results: Vec<_> = handles.into_iter().map(|t| t.join().unwrap()).collect();

        let wins = results.iter().filter(|r| r.is_ok()).count();
        assert_eq!(wins, 1, "results: {results:?}");
        let loser = results.into_iter().find_map(Result::err).unwrap();
        assert!(
            matches!(loser, FeeError::InsufficientFunds { .. } | FeeError::Conflict(_)),
            "unexpected error: {loser:?}"
        );
        assert_eq!(h.ledger.get_account(&source).unwrap().amount, 0);
    }
}

#[test]
fn retried_transfers_from_one_source_lose_no_updates() {
    const THREADS: usize = 8;
    const PER_THREAD: u64 = 25;

    let h = Arc::new(Harness::standard());
    let (owner, source) = h.funded_owner(1_000_000 * TOKEN);
    let barrier = Arc::new(Barrier::new(THREADS));

    let handles: Vec<_> = (0..THREADS)
        .map(|_| {
            let h = Arc::clone(&h);
            let barrier = Arc::clone(&barrier);
            let recipient = h.keys.generate();
            thread::spawn(move || {
                barrier.wait();
                let mut fees = 0u128;
                for _ in 0..PER_THREAD {
                    let result =
                        retrying(|| h.transfer(&owner, source, &recipient, 10 * TOKEN)).unwrap();
                    fees += u128::from(result.fee);
                }
                fees
            })
        })
        .collect();
    let fees: u128 = handles.into_iter().map(|t| t.join().unwrap()).sum();

    let moved = THREADS as u64 * PER_THREAD * 10 * TOKEN;
    assert_eq!(h.ledger.get_account(&source).unwrap().amount, 1_000_000 * TOKEN - moved);
    assert_eq!(fees, u128::from(THREADS as u64 * PER_THREAD * TOKEN / 10));
    assert_eq!(h.withheld_in_accounts(), fees);
}

#[test]
fn withdraw_racing_credits_keeps_every_fee() {
    const ROUNDS: usize = 200;

    let h = Arc::new(Harness::standard());
    let (owner, source) = h.funded_owner(1_000_000 * TOKEN);
    let recipient = h.keys.generate();
    let dest = h.transfer(&owner, source, &recipient, 100 * TOKEN).unwrap().destination;
    let vault = h.vault();

    let sender = {
        let h = Arc::clone(&h);
        thread::spawn(move || {
            let mut fees = 0u128;
            for _ in 0..ROUNDS {
                let result = retrying(|| h.transfer(&owner, source, &recipient, 100 * TOKEN)).unwrap();
                fees += u128::from(result.fee);
            }
            fees
        })
    };
    let withdrawer = {
        let h = Arc::clone(&h);
        thread::spawn(move || {
            let mut withdrawn = 0u128;
            for _ in 0..ROUNDS {
                match retrying(|| {
                    h.engine
                        .harvest()
                        .withdraw_from_accounts(&h.mint, &vault, &h.withdraw_authority, &[dest])
                }) {
                    Ok(batch) => withdrawn += batch.total,
                    Err(e) if e.is_soft() => {}
                    Err(e) => panic!("withdraw failed: {e}"),
                }
            }
            withdrawn
        })
    };

    // The first transfer's fee predates both threads.
    let fees = sender.join().unwrap() + u128::from(TOKEN);
    let withdrawn = withdrawer.join().unwrap();

    let remaining = u128::from(h.ledger.get_account(&dest).unwrap().withheld_amount());
    assert_eq!(withdrawn + remaining, fees);
    assert_eq!(u128::from(h.ledger.get_account(&vault).unwrap().amount), withdrawn);
}

#[test]
fn injected_conflicts_are_retryable_and_atomic() {
    let h = Harness::standard();
    let (owner, source) = h.funded_owner(100 * TOKEN);
    let recipient = h.keys.generate();

    h.ledger.inject_conflicts(3);
    let mut attempts = 0;
    let result = retrying(|| {
        attempts += 1;
        h.transfer(&owner, source, &recipient, 10 * TOKEN)
    })
    .unwrap();

    assert_eq!(attempts, 4);
    assert_eq!(h.ledger.get_account(&source).unwrap().amount, 90 * TOKEN);
    assert_eq!(h.ledger.get_account(&result.destination).unwrap().withheld_amount(), TOKEN / 10);
}
