//! [`CredentialStore`] implementations.

use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};
use std::sync::{PoisonError, RwLock};

use levy_crypto::{
    generate_keypair, keypair_from_private, sign_message, CredentialError, CredentialStore,
};
use levy_types::{Credential, KeyPair, PrivateKey, PublicKey};
use serde::{Deserialize, Serialize};

use crate::error::WalletError;
use crate::keystore::{decrypt_keystore, encrypt_keystore, KdfParams, KeystoreFile};

const DOCUMENT_VERSION: u32 = 1;

/// Unlocked private keys, indexed by public key.
#[derive(Default)]
pub struct MemoryCredentialStore {
    keys: RwLock<HashMap<PublicKey, PrivateKey>>,
}

impl MemoryCredentialStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Take ownership of `keypair`; returns its identity.
    pub fn insert(&self, keypair: KeyPair) -> PublicKey {
        let KeyPair { public, private } = keypair;
        self.keys
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(public, private);
        public
    }

    /// Generate and hold a fresh key pair.
    pub fn generate(&self) -> PublicKey {
        self.insert(generate_keypair())
    }

    pub fn len(&self) -> usize {
        self.keys.read().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl CredentialStore for MemoryCredentialStore {
    fn sign(&self, identity: &PublicKey, digest: [u8; 32]) -> Result<Credential, CredentialError> {
        let keys = self
            .keys
            .read()
            .map_err(|_| CredentialError::Unavailable("key map lock poisoned".into()))?;
        let private = keys
            .get(identity)
            .ok_or(CredentialError::UnknownIdentity(*identity))?;
        Ok(Credential {
            signer: *identity,
            digest,
            signature: sign_message(&digest, private),
        })
    }

    fn contains(&self, identity: &PublicKey) -> bool {
        self.keys
            .read()
            .map(|keys| keys.contains_key(identity))
            .unwrap_or(false)
    }
}

/// One named, encrypted key pair.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct StoredKey {
    /// Hex-encoded public key, readable without the password.
    pub public_key: String,
    pub keystore: KeystoreFile,
}

#[derive(Debug, Serialize, Deserialize)]
struct KeystoreDocument {
    version: u32,
    entries: BTreeMap<String, StoredKey>,
}

impl Default for KeystoreDocument {
    fn default() -> Self {
        Self {
            version: DOCUMENT_VERSION,
            entries: BTreeMap::new(),
        }
    }
}

/// A JSON file of named key pairs (`mint`, `withdraw_authority`, ...), each
/// sealed with its own salt and nonce.
///
/// The file is rewritten on every [`save_keypair`](Self::save_keypair).
pub struct FileCredentialStore {
    path: PathBuf,
    kdf: KdfParams,
    document: KeystoreDocument,
}

impl FileCredentialStore {
    /// Open the store at `path`, starting empty if the file does not exist yet.
    pub fn open(path: impl Into<PathBuf>, kdf: KdfParams) -> Result<Self, WalletError> {
        kdf.validate()?;
        let path = path.into();
        let document = if path.exists() {
            let document: KeystoreDocument =
                serde_json::from_str(&std::fs::read_to_string(&path)?)?;
            if document.version != DOCUMENT_VERSION {
                return Err(WalletError::Key(format!(
                    "unsupported keystore document version: {}",
                    document.version
                )));
            }
            document
        } else {
            KeystoreDocument::default()
        };
        tracing::debug!(path = %path.display(), entries = document.entries.len(), "opened keystore");
        Ok(Self {
            path,
            kdf,
            document,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.document.entries.keys().map(String::as_str)
    }

    pub fn contains_name(&self, name: &str) -> bool {
        self.document.entries.contains_key(name)
    }

    /// The public key stored under `name`. Needs no password.
    pub fn public_key(&self, name: &str) -> Result<PublicKey, WalletError> {
        let entry = self.entry(name)?;
        parse_public_key(&entry.public_key)
    }

    /// Encrypt `keypair` under `password`, store it as `name` and write the file.
    pub fn save_keypair(
        &mut self,
        name: &str,
        keypair: &KeyPair,
        password: &str,
    ) -> Result<PublicKey, WalletError> {
        if self.contains_name(name) {
            return Err(WalletError::DuplicateEntry(name.to_string()));
        }
        let keystore = encrypt_keystore(&keypair.private.0, password, self.kdf)?;
        self.document.entries.insert(
            name.to_string(),
            StoredKey {
                public_key: hex::encode(keypair.public.as_bytes()),
                keystore,
            },
        );
        self.persist()?;
        tracing::info!(name, public_key = %keypair.public, path = %self.path.display(), "saved key pair");
        Ok(keypair.public)
    }

    /// Decrypt the key pair stored as `name`.
    pub fn load_keypair(&self, name: &str, password: &str) -> Result<KeyPair, WalletError> {
        let entry = self.entry(name)?;
        let expected = parse_public_key(&entry.public_key)?;
        let secret = decrypt_keystore(&entry.keystore, password)?;
        let keypair = keypair_from_private(PrivateKey(*secret));
        if keypair.public != expected {
            return Err(WalletError::Key(format!(
                "entry {name:?} decrypts to a different public key"
            )));
        }
        Ok(keypair)
    }

    /// Decrypt every entry into a [`MemoryCredentialStore`].
    pub fn unlock(&self, password: &str) -> Result<MemoryCredentialStore, WalletError> {
        let store = MemoryCredentialStore::new();
        for name in self.names() {
            store.insert(self.load_keypair(name, password)?);
        }
        tracing::debug!(entries = store.len(), "unlocked keystore");
        Ok(store)
    }

    fn entry(&self, name: &str) -> Result<&StoredKey, WalletError> {
        self.document
            .entries
            .get(name)
            .ok_or_else(|| WalletError::UnknownEntry(name.to_string()))
    }

    fn persist(&self) -> Result<(), WalletError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&self.path, serde_json::to_string_pretty(&self.document)?)?;
        Ok(())
    }
}

fn parse_public_key(value: &str) -> Result<PublicKey, WalletError> {
    let bytes = hex::decode(value)
        .map_err(|e| WalletError::Key(format!("invalid public key hex: {e}")))?;
    let bytes: [u8; 32] = bytes
        .try_into()
        .map_err(|_| WalletError::Key("public key must be 32 bytes".into()))?;
    Ok(PublicKey(bytes))
}
