use std::sync::Arc;

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use levy_fee::{compute_fee, CreateMint, FeeEngine, TransferRequest};
use levy_nullables::NullLedger;
use levy_types::TransferFeeConfig;
use levy_wallet_core::MemoryCredentialStore;

const TOKEN: u64 = 1_000_000_000;

fn bench_compute_fee(c: &mut Criterion) {
    c.bench_function("compute_fee", |b| {
        b.iter(|| compute_fee(black_box(1_000 * TOKEN), black_box(100), black_box(9 * TOKEN)))
    });
}

fn bench_transfer(c: &mut Criterion) {
    let ledger = Arc::new(NullLedger::new());
    let keys = Arc::new(MemoryCredentialStore::new());
    let engine = FeeEngine::new(Arc::clone(&ledger), Arc::clone(&keys));

    let authority = keys.generate();
    let mint = engine
        .mints()
        .create_mint(&CreateMint {
            mint: keys.generate(),
            mint_authority: authority,
            decimals: 9,
            transfer_fee_config: TransferFeeConfig {
                fee_basis_points: 100,
                maximum_fee: 9 * TOKEN,
                config_authority: authority,
                withdraw_authority: authority,
            },
        })
        .unwrap()
        .address;
    let owner = keys.generate();
    let source = engine
        .mints()
        .mint_to(&mint, &authority, &owner, u64::MAX / 2)
        .unwrap()
        .destination;
    let request = TransferRequest {
        mint,
        source,
        destination_owner: keys.generate(),
        owner,
        amount: TOKEN,
        decimals: 9,
        expected_fee: None,
    };

    c.bench_function("transfer_signed", |b| {
        b.iter(|| engine.transfers().transfer(black_box(&request)).unwrap())
    });
}

criterion_group!(benches, bench_compute_fee, bench_transfer);
criterion_main!(benches);
