//! The CLI flows, each one run against the ledger state file.

use std::sync::Arc;

use anyhow::Context;
use levy_crypto::{derive_token_account_address, generate_keypair};
use levy_fee::{
    compute_fee, CreateMint, FeeEngine, FeeError, FeePolicy, TransferRequest, TransferResult,
    WithdrawBatch,
};
use levy_ledger::LedgerClient;
use levy_nullables::NullLedger;
use levy_types::amount::to_raw;
use levy_types::{Address, PublicKey, TransferFeeConfig};
use levy_wallet_core::MemoryCredentialStore;

use crate::config::CliConfig;
use crate::session::{Role, Session};

type Engine = FeeEngine<NullLedger, MemoryCredentialStore>;

#[derive(Debug)]
pub struct SetupReport {
    pub mint: Address,
    pub decimals: u8,
    pub minted: u64,
    pub transfer: TransferResult,
    pub withdraw: Option<WithdrawBatch>,
}

#[derive(Debug, PartialEq, Eq)]
pub struct Quote {
    pub amount: u64,
    pub fee: u64,
    pub net_amount: u64,
    pub decimals: u8,
}

/// Create every role's key pair, the mint, and run one mint/transfer/withdraw round.
pub fn setup(config: &CliConfig, password: &str) -> anyhow::Result<SetupReport> {
    let mut session = Session::open(config)?;
    if session.keystore.contains_name(Role::Mint.name()) {
        anyhow::bail!(
            "keystore {} already holds a mint; setup runs once per keystore",
            config.keystore_path.display()
        );
    }

    let store = MemoryCredentialStore::new();
    let mut enrol = |role| session.enrol(role, generate_keypair(), password, &store);
    let mint_authority = enrol(Role::MintAuthority)?;
    let mint_key = enrol(Role::Mint)?;
    let config_authority = enrol(Role::ConfigAuthority)?;
    let withdraw_authority = enrol(Role::WithdrawAuthority)?;
    let owner = enrol(Role::Owner)?;
    let destination_owner = enrol(Role::DestinationOwner)?;
    let fee_vault = enrol(Role::FeeVault)?;
    let engine = Engine::new(Arc::clone(&session.ledger), Arc::new(store));

    let mint = engine.mints().create_mint(&CreateMint {
        mint: mint_key,
        mint_authority,
        decimals: config.decimals,
        transfer_fee_config: TransferFeeConfig {
            fee_basis_points: config.fee_basis_points,
            maximum_fee: config.maximum_fee_raw()?,
            config_authority,
            withdraw_authority,
        },
    })?;

    let minted = engine.mints().mint_to(
        &mint.address,
        &mint_authority,
        &owner,
        config.mint_amount_raw()?,
    )?;

    let amount = config.transfer_amount_raw()?;
    let transfer = engine.transfers().transfer(&TransferRequest {
        mint: mint.address,
        source: minted.destination,
        destination_owner,
        owner,
        amount,
        decimals: mint.decimals,
        expected_fee: Some(mint.transfer_fee_config.calculate_fee(amount)?),
    })?;

    let vault = session
        .ledger
        .create_account_if_absent(&fee_vault, &mint.address)?
        .address;
    let withdraw = withdraw_listed(&engine, &mint.address, &vault, &withdraw_authority)?;

    session.save()?;
    Ok(SetupReport {
        mint: mint.address,
        decimals: mint.decimals,
        minted: minted.amount,
        transfer,
        withdraw,
    })
}

/// Transfer `amount` whole tokens (default `transfer_amount`) from the owner
/// to the destination owner, declaring the fee computed client-side.
pub fn transfer(
    config: &CliConfig,
    password: &str,
    amount: Option<u64>,
) -> anyhow::Result<TransferResult> {
    let session = Session::open_existing(config)?;
    let mint = session.ledger.get_mint(&session.mint_address()?)?;
    let owner = session.key(Role::Owner)?;
    let whole = amount.unwrap_or(config.transfer_amount);
    let raw = to_raw(whole, mint.decimals)
        .with_context(|| format!("{whole} tokens overflow at {} decimals", mint.decimals))?;

    let engine = Engine::new(
        Arc::clone(&session.ledger),
        Arc::new(session.unlock(&[Role::Owner], password)?),
    );
    let result = engine.transfers().transfer(&TransferRequest {
        mint: mint.address,
        source: derive_token_account_address(&owner, &mint.address),
        destination_owner: session.key(Role::DestinationOwner)?,
        owner,
        amount: raw,
        decimals: mint.decimals,
        expected_fee: Some(mint.transfer_fee_config.calculate_fee(raw)?),
    })?;

    session.save()?;
    Ok(result)
}

/// Sweep withheld fees to the fee vault, directly from the accounts or by
/// harvesting into the mint first. `None` when there was nothing to move.
pub fn withdraw(
    config: &CliConfig,
    password: &str,
    via_mint: bool,
) -> anyhow::Result<Option<WithdrawBatch>> {
    let session = Session::open_existing(config)?;
    let mint = session.mint_address()?;
    let authority = session.key(Role::WithdrawAuthority)?;
    let vault = session
        .ledger
        .create_account_if_absent(&session.key(Role::FeeVault)?, &mint)?
        .address;

    let engine = Engine::new(
        Arc::clone(&session.ledger),
        Arc::new(session.unlock(&[Role::WithdrawAuthority], password)?),
    );
    let batch = if via_mint {
        let listed = engine.withheld().withheld_account_addresses(&mint)?;
        engine.harvest().harvest_to_mint(&mint, &listed)?;
        soft(engine.harvest().withdraw_from_mint(&mint, &vault, &authority))?
    } else {
        withdraw_listed(&engine, &mint, &vault, &authority)?
    };

    session.save()?;
    Ok(batch)
}

/// Fee and net amount for a transfer of `amount` whole tokens under `config`.
pub fn quote(config: &CliConfig, amount: u64) -> anyhow::Result<Quote> {
    let raw = config.raw("amount", amount)?;
    let fee = compute_fee(raw, config.fee_basis_points, config.maximum_fee_raw()?)?;
    Ok(Quote {
        amount: raw,
        fee,
        net_amount: raw - fee,
        decimals: config.decimals,
    })
}

fn withdraw_listed(
    engine: &Engine,
    mint: &Address,
    vault: &Address,
    authority: &PublicKey,
) -> anyhow::Result<Option<WithdrawBatch>> {
    let listed = engine.withheld().withheld_account_addresses(mint)?;
    if listed.is_empty() {
        tracing::warn!(mint = %mint, "no accounts hold withheld fees");
        return Ok(None);
    }
    soft(engine.harvest().withdraw_from_accounts(mint, vault, authority, &listed))
}

/// Treat soft fee errors as "nothing happened".
fn soft<T>(result: Result<T, FeeError>) -> anyhow::Result<Option<T>> {
    match result {
        Ok(value) => Ok(Some(value)),
        Err(e) if e.is_soft() => Ok(None),
        Err(e) => Err(e.into()),
    }
}
