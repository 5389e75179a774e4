//! Wiring of the fee components over one ledger and credential store.

use std::sync::Arc;

use levy_crypto::CredentialStore;
use levy_ledger::LedgerClient;

use crate::harvest::HarvestWithdrawOrchestrator;
use crate::lifecycle::MintLifecycle;
use crate::transfer::TransferOrchestrator;
use crate::withheld::WithheldLedger;

pub struct FeeEngine<L, C> {
    ledger: Arc<L>,
    mints: MintLifecycle<L, C>,
    transfers: TransferOrchestrator<L, C>,
    withheld: WithheldLedger<L>,
    harvest: HarvestWithdrawOrchestrator<L, C>,
}

impl<L: LedgerClient, C: CredentialStore> FeeEngine<L, C> {
    pub fn new(ledger: Arc<L>, credentials: Arc<C>) -> Self {
        Self {
            mints: MintLifecycle::new(Arc::clone(&ledger), Arc::clone(&credentials)),
            transfers: TransferOrchestrator::new(Arc::clone(&ledger), Arc::clone(&credentials)),
            withheld: WithheldLedger::new(Arc::clone(&ledger)),
            harvest: HarvestWithdrawOrchestrator::new(Arc::clone(&ledger), credentials),
            ledger,
        }
    }

    pub fn mints(&self) -> &MintLifecycle<L, C> {
        &self.mints
    }

    pub fn transfers(&self) -> &TransferOrchestrator<L, C> {
        &self.transfers
    }

    pub fn withheld(&self) -> &WithheldLedger<L> {
        &self.withheld
    }

    pub fn harvest(&self) -> &HarvestWithdrawOrchestrator<L, C> {
        &self.harvest
    }

    pub fn ledger(&self) -> &Arc<L> {
        &self.ledger
    }
}
