//! State shared between invocations: the ledger snapshot and the keystore.

use std::fmt;
use std::sync::Arc;

use anyhow::{bail, Context};
use levy_nullables::{LedgerSnapshot, NullLedger};
use levy_types::{Address, KeyPair, PublicKey};
use levy_wallet_core::{FileCredentialStore, MemoryCredentialStore};

use crate::config::CliConfig;

/// Key pairs `setup` generates, by keystore entry name.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Role {
    MintAuthority,
    Mint,
    ConfigAuthority,
    WithdrawAuthority,
    Owner,
    DestinationOwner,
    FeeVault,
}

impl Role {
    pub fn name(self) -> &'static str {
        match self {
            Role::MintAuthority => "mint_authority",
            Role::Mint => "mint",
            Role::ConfigAuthority => "config_authority",
            Role::WithdrawAuthority => "withdraw_authority",
            Role::Owner => "owner",
            Role::DestinationOwner => "destination_owner",
            Role::FeeVault => "fee_vault",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

pub struct Session {
    pub ledger: Arc<NullLedger>,
    pub keystore: FileCredentialStore,
    config: CliConfig,
}

impl Session {
    /// Restore the ledger from `state_path` if present, otherwise start empty.
    pub fn open(config: &CliConfig) -> anyhow::Result<Self> {
        let ledger = if config.state_path.exists() {
            let snapshot = LedgerSnapshot::load(&config.state_path)
                .with_context(|| format!("loading {}", config.state_path.display()))?;
            NullLedger::from_snapshot(snapshot)?
        } else {
            NullLedger::new()
        };
        let keystore = FileCredentialStore::open(&config.keystore_path, config.kdf)
            .with_context(|| format!("opening {}", config.keystore_path.display()))?;
        Ok(Self {
            ledger: Arc::new(ledger),
            keystore,
            config: config.clone(),
        })
    }

    /// Like [`open`](Self::open), but fails unless `setup` has already run.
    pub fn open_existing(config: &CliConfig) -> anyhow::Result<Self> {
        if !config.state_path.exists() {
            bail!(
                "no ledger state at {}; run `levy setup` first",
                config.state_path.display()
            );
        }
        let session = Self::open(config)?;
        if !session.keystore.contains_name(Role::Mint.name()) {
            bail!(
                "keystore {} has no mint; run `levy setup` first",
                config.keystore_path.display()
            );
        }
        Ok(session)
    }

    pub fn key(&self, role: Role) -> anyhow::Result<PublicKey> {
        Ok(self.keystore.public_key(role.name())?)
    }

    pub fn mint_address(&self) -> anyhow::Result<Address> {
        Ok(Address::from(self.key(Role::Mint)?))
    }

    /// Decrypt only the key pairs `roles` need to sign with.
    pub fn unlock(&self, roles: &[Role], password: &str) -> anyhow::Result<MemoryCredentialStore> {
        let store = MemoryCredentialStore::new();
        for role in roles {
            let keypair = self
                .keystore
                .load_keypair(role.name(), password)
                .with_context(|| format!("unlocking {role}"))?;
            store.insert(keypair);
        }
        Ok(store)
    }

    /// Seal `keypair` into the keystore under `role` and hold it in `store`.
    pub fn enrol(
        &mut self,
        role: Role,
        keypair: KeyPair,
        password: &str,
        store: &MemoryCredentialStore,
    ) -> anyhow::Result<PublicKey> {
        self.keystore.save_keypair(role.name(), &keypair, password)?;
        Ok(store.insert(keypair))
    }

    pub fn save(&self) -> anyhow::Result<()> {
        self.ledger
            .snapshot()?
            .save(&self.config.state_path)
            .with_context(|| format!("writing {}", self.config.state_path.display()))?;
        tracing::debug!(path = %self.config.state_path.display(), "saved ledger state");
        Ok(())
    }
}
