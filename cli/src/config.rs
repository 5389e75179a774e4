//! CLI configuration with TOML file support.
//!
//! Amounts in the file are whole tokens; they are scaled by `decimals`
//! before reaching the fee engine.

use std::path::{Path, PathBuf};

use levy_types::amount::to_raw;
use levy_types::MAX_FEE_BASIS_POINTS;
use levy_utils::LogFormat;
use levy_wallet_core::KdfParams;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("invalid config TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("config cannot be rendered as TOML: {0}")]
    Render(#[from] toml::ser::Error),

    #[error("invalid config: {0}")]
    Invalid(String),
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CliConfig {
    /// Decimals of the mint created by `setup`.
    #[serde(default = "default_decimals")]
    pub decimals: u8,

    /// Transfer fee in basis points (100 = 1%).
    #[serde(default = "default_fee_basis_points")]
    pub fee_basis_points: u16,

    /// Per-transfer fee cap, in whole tokens.
    #[serde(default = "default_maximum_fee")]
    pub maximum_fee: u64,

    /// Tokens minted to the owner during `setup`.
    #[serde(default = "default_mint_amount")]
    pub mint_amount: u64,

    /// Tokens moved by `setup` and by `transfer` without `--amount`.
    #[serde(default = "default_transfer_amount")]
    pub transfer_amount: u64,

    /// Ledger snapshot shared between invocations.
    #[serde(default = "default_state_path")]
    pub state_path: PathBuf,

    /// Encrypted key pairs, one entry per role.
    #[serde(default = "default_keystore_path")]
    pub keystore_path: PathBuf,

    #[serde(default)]
    pub log_format: LogFormat,

    /// Filter directive used when `RUST_LOG` is unset.
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Argon2id cost for newly sealed keys.
    #[serde(default)]
    pub kdf: KdfParams,
}

fn default_decimals() -> u8 {
    9
}

fn default_fee_basis_points() -> u16 {
    100
}

fn default_maximum_fee() -> u64 {
    9
}

fn default_mint_amount() -> u64 {
    1_000_000
}

fn default_transfer_amount() -> u64 {
    1_000
}

fn default_state_path() -> PathBuf {
    PathBuf::from("levy_state.json")
}

fn default_keystore_path() -> PathBuf {
    PathBuf::from("data.json")
}

fn default_log_level() -> String {
    "info".to_string()
}

impl CliConfig {
    pub fn from_toml_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(s)?)
    }

    pub fn to_toml_string(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Reject settings the engine would refuse later, before any ledger work.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.fee_basis_points > MAX_FEE_BASIS_POINTS {
            return Err(ConfigError::Invalid(format!(
                "fee_basis_points {} exceeds {MAX_FEE_BASIS_POINTS}",
                self.fee_basis_points
            )));
        }
        self.maximum_fee_raw()?;
        self.mint_amount_raw()?;
        self.transfer_amount_raw()?;
        if self.transfer_amount > self.mint_amount {
            return Err(ConfigError::Invalid(format!(
                "transfer_amount {} exceeds mint_amount {}",
                self.transfer_amount, self.mint_amount
            )));
        }
        self.kdf
            .validate()
            .map_err(|e| ConfigError::Invalid(format!("kdf: {e}")))
    }

    pub fn maximum_fee_raw(&self) -> Result<u64, ConfigError> {
        self.raw("maximum_fee", self.maximum_fee)
    }

    pub fn mint_amount_raw(&self) -> Result<u64, ConfigError> {
        self.raw("mint_amount", self.mint_amount)
    }

    pub fn transfer_amount_raw(&self) -> Result<u64, ConfigError> {
        self.raw("transfer_amount", self.transfer_amount)
    }

    /// Scale `whole` tokens to smallest units at the configured decimals.
    pub fn raw(&self, field: &str, whole: u64) -> Result<u64, ConfigError> {
        to_raw(whole, self.decimals).ok_or_else(|| {
            ConfigError::Invalid(format!(
                "{field} = {whole} overflows at {} decimals",
                self.decimals
            ))
        })
    }
}

impl Default for CliConfig {
    fn default() -> Self {
        Self {
            decimals: default_decimals(),
            fee_basis_points: default_fee_basis_points(),
            maximum_fee: default_maximum_fee(),
            mint_amount: default_mint_amount(),
            transfer_amount: default_transfer_amount(),
            state_path: default_state_path(),
            keystore_path: default_keystore_path(),
            log_format: LogFormat::default(),
            log_level: default_log_level(),
            kdf: KdfParams::default(),
        }
    }
}
