#![no_main]

use std::sync::Arc;

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;

use levy_fee::{CreateMint, FeeEngine, TransferRequest};
use levy_ledger::LedgerClient;
use levy_nullables::NullLedger;
use levy_types::TransferFeeConfig;
use levy_wallet_core::MemoryCredentialStore;

const HOLDERS: usize = 4;

#[derive(Debug, Arbitrary)]
enum Step {
    Transfer { from: u8, to: u8, amount: u64 },
    Harvest { holder: u8 },
    WithdrawAccounts { members: Vec<u8> },
    WithdrawMint,
}

#[derive(Debug, Arbitrary)]
struct Scenario {
    fee_basis_points: u16,
    maximum_fee: u64,
    funding: [u32; HOLDERS],
    steps: Vec<Step>,
}

// Random transfers, harvests and withdraws never create or destroy value:
// everything minted sits in some balance, some withheld field or the mint pool.
fuzz_target!(|scenario: Scenario| {
    let ledger = Arc::new(NullLedger::new());
    let keys = Arc::new(MemoryCredentialStore::new());
    let engine = FeeEngine::new(Arc::clone(&ledger), Arc::clone(&keys));

    let authority = keys.generate();
    let Ok(mint) = engine.mints().create_mint(&CreateMint {
        mint: keys.generate(),
        mint_authority: authority,
        decimals: 0,
        transfer_fee_config: TransferFeeConfig {
            fee_basis_points: scenario.fee_basis_points,
            maximum_fee: scenario.maximum_fee,
            config_authority: authority,
            withdraw_authority: authority,
        },
    }) else {
        assert!(scenario.fee_basis_points > 10_000);
        return;
    };

    let holders: Vec<_> = scenario
        .funding
        .iter()
        .map(|&amount| {
            let owner = keys.generate();
            let account = engine
                .mints()
                .mint_to(&mint.address, &authority, &owner, u64::from(amount))
                .unwrap()
                .destination;
            (owner, account)
        })
        .collect();
    let vault = ledger.create_account_if_absent(&authority, &mint.address).unwrap().address;
    let pick = |i: u8| holders[usize::from(i) % HOLDERS];

    let mut fees: u128 = 0;
    let mut withdrawn: u128 = 0;
    for step in scenario.steps.iter().take(64) {
        match *step {
            Step::Transfer { from, to, amount } => {
                let (owner, source) = pick(from);
                let request = TransferRequest {
                    mint: mint.address,
                    source,
                    destination_owner: pick(to).0,
                    owner,
                    amount,
                    decimals: 0,
                    expected_fee: None,
                };
                if let Ok(result) = engine.transfers().transfer(&request) {
                    assert_eq!(result.fee + result.net_amount, amount);
                    fees += u128::from(result.fee);
                }
            }
            Step::Harvest { holder } => {
                engine.harvest().harvest_to_mint(&mint.address, &[pick(holder).1]).unwrap();
            }
            Step::WithdrawAccounts { ref members } => {
                let sources: Vec<_> = members.iter().take(8).map(|&h| pick(h).1).collect();
                if let Ok(batch) = engine
                    .harvest()
                    .withdraw_from_accounts(&mint.address, &vault, &authority, &sources)
                {
                    withdrawn += batch.total;
                }
            }
            Step::WithdrawMint => {
                if let Ok(batch) = engine.harvest().withdraw_from_mint(&mint.address, &vault, &authority) {
                    withdrawn += batch.total;
                }
            }
        }
    }

    let totals = engine.withheld().total_withheld(&mint.address).unwrap();
    assert_eq!(totals.total() + withdrawn, fees);

    let current = ledger.get_mint(&mint.address).unwrap();
    let held: u128 = ledger
        .scan_accounts_by_mint(&mint.address)
        .unwrap()
        .iter()
        .map(|a| u128::from(a.amount) + u128::from(a.withheld_amount()))
        .sum::<u128>()
        + u128::from(current.withheld_amount);
    assert_eq!(held, u128::from(current.supply));
});
