//! Argon2id encrypted keystore for Ed25519 private keys.
//!
//! 1. Argon2id derives a 32-byte key from the password and a random salt
//! 2. AES-256-GCM encrypts the private key under a random nonce
//! 3. The file records the KDF parameters it was sealed with, so a key sealed
//!    under one configuration still opens after the defaults change

use std::path::Path;

use aes_gcm::aead::{Aead, KeyInit};
use aes_gcm::{Aes256Gcm, Nonce};
use argon2::{Algorithm, Argon2, Params, Version};
use rand::RngCore;
use serde::{Deserialize, Serialize};
use zeroize::Zeroizing;

use crate::error::WalletError;

const KEYSTORE_VERSION: u32 = 1;
const CIPHER: &str = "aes-256-gcm";
const KDF: &str = "argon2id";
const SALT_LEN: usize = 32;
/// AES-GCM nonce length (96 bits).
const NONCE_LEN: usize = 12;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeystoreFile {
    pub version: u32,
    pub crypto: KeystoreCrypto,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeystoreCrypto {
    pub cipher: String,
    pub kdf: String,
    pub kdf_params: KdfParams,
    /// Hex-encoded salt.
    pub salt: String,
    /// Hex-encoded nonce.
    pub nonce: String,
    /// Hex-encoded ciphertext.
    pub ciphertext: String,
}

/// Argon2id cost parameters.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct KdfParams {
    /// Memory in KiB.
    pub memory: u32,
    pub iterations: u32,
    pub parallelism: u32,
}

impl Default for KdfParams {
    /// 64 MiB, 3 passes, 1 lane.
    fn default() -> Self {
        Self {
            memory: 65_536,
            iterations: 3,
            parallelism: 1,
        }
    }
}

impl KdfParams {
    /// Check the parameters against Argon2's limits.
    pub fn validate(&self) -> Result<(), WalletError> {
        self.argon2().map(|_| ())
    }

    fn argon2(&self) -> Result<Argon2<'static>, WalletError> {
        let params = Params::new(self.memory, self.iterations, self.parallelism, Some(32))
            .map_err(|e| WalletError::Key(format!("Argon2 params error: {e}")))?;
        Ok(Argon2::new(Algorithm::Argon2id, Version::V0x13, params))
    }
}

/// Encrypt a 32-byte private key under `password`.
pub fn encrypt_keystore(
    secret_key: &[u8; 32],
    password: &str,
    kdf_params: KdfParams,
) -> Result<KeystoreFile, WalletError> {
    let mut rng = rand::thread_rng();
    let mut salt = [0u8; SALT_LEN];
    rng.fill_bytes(&mut salt);
    let mut nonce_bytes = [0u8; NONCE_LEN];
    rng.fill_bytes(&mut nonce_bytes);

    let derived_key = derive_key(password, &salt, &kdf_params)?;
    let cipher = Aes256Gcm::new_from_slice(&derived_key[..])
        .map_err(|e| WalletError::Key(format!("AES key init failed: {e}")))?;
    let ciphertext = cipher
        .encrypt(Nonce::from_slice(&nonce_bytes), secret_key.as_ref())
        .map_err(|e| WalletError::Key(format!("encryption failed: {e}")))?;

    Ok(KeystoreFile {
        version: KEYSTORE_VERSION,
        crypto: KeystoreCrypto {
            cipher: CIPHER.to_string(),
            kdf: KDF.to_string(),
            kdf_params,
            salt: hex::encode(salt),
            nonce: hex::encode(nonce_bytes),
            ciphertext: hex::encode(ciphertext),
        },
    })
}

/// Decrypt a keystore with `password`, returning the 32-byte private key.
pub fn decrypt_keystore(
    keystore: &KeystoreFile,
    password: &str,
) -> Result<Zeroizing<[u8; 32]>, WalletError> {
    if keystore.version != KEYSTORE_VERSION {
        return Err(WalletError::Key(format!(
            "unsupported keystore version: {}",
            keystore.version
        )));
    }
    if keystore.crypto.cipher != CIPHER || keystore.crypto.kdf != KDF {
        return Err(WalletError::Key(format!(
            "unsupported scheme: {} / {}",
            keystore.crypto.cipher, keystore.crypto.kdf
        )));
    }

    let salt = decode_field("salt", &keystore.crypto.salt)?;
    let nonce_bytes = decode_field("nonce", &keystore.crypto.nonce)?;
    let ciphertext = decode_field("ciphertext", &keystore.crypto.ciphertext)?;
    if nonce_bytes.len() != NONCE_LEN {
        return Err(WalletError::Key(format!(
            "invalid nonce length: expected {NONCE_LEN}, got {}",
            nonce_bytes.len()
        )));
    }

    let derived_key = derive_key(password, &salt, &keystore.crypto.kdf_params)?;
    let cipher = Aes256Gcm::new_from_slice(&derived_key[..])
        .map_err(|e| WalletError::Key(format!("AES key init failed: {e}")))?;
    let plaintext = Zeroizing::new(
        cipher
            .decrypt(Nonce::from_slice(&nonce_bytes), ciphertext.as_ref())
            .map_err(|_| WalletError::Key("decryption failed: wrong password or corrupted data".into()))?,
    );

    let key: [u8; 32] = plaintext.as_slice().try_into().map_err(|_| {
        WalletError::Key(format!(
            "decrypted key has wrong length: expected 32, got {}",
            plaintext.len()
        ))
    })?;
    Ok(Zeroizing::new(key))
}

pub fn save_keystore(keystore: &KeystoreFile, path: &Path) -> Result<(), WalletError> {
    std::fs::write(path, serde_json::to_string_pretty(keystore)?)?;
    Ok(())
}

pub fn load_keystore(path: &Path) -> Result<KeystoreFile, WalletError> {
    let json = std::fs::read_to_string(path)?;
    Ok(serde_json::from_str(&json)?)
}

fn derive_key(
    password: &str,
    salt: &[u8],
    params: &KdfParams,
) -> Result<Zeroizing<[u8; 32]>, WalletError> {
    let mut output = Zeroizing::new([0u8; 32]);
    params
        .argon2()?
        .hash_password_into(password.as_bytes(), salt, &mut output[..])
        .map_err(|e| WalletError::Key(format!("Argon2 hashing failed: {e}")))?;
    Ok(output)
}

fn decode_field(name: &str, value: &str) -> Result<Vec<u8>, WalletError> {
    hex::decode(value).map_err(|e| WalletError::Key(format!("invalid {name} hex: {e}")))
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    /// Cheap parameters so tests do not spend 64 MiB per key.
    pub(crate) const FAST: KdfParams = KdfParams {
        memory: 64,
        iterations: 1,
        parallelism: 1,
    };

    #[test]
    fn encrypt_decrypt_roundtrip() {
        let keystore = encrypt_keystore(&[42u8; 32], "test-password-123", FAST).unwrap();
        let decrypted = decrypt_keystore(&keystore, "test-password-123").unwrap();
        assert_eq!(*decrypted, [42u8; 32]);
    }

    #[test]
    fn wrong_password_fails() {
        let keystore = encrypt_keystore(&[42u8; 32], "correct-password", FAST).unwrap();
        assert!(matches!(
            decrypt_keystore(&keystore, "wrong-password"),
            Err(WalletError::Key(_))
        ));
    }

    #[test]
    fn records_the_parameters_it_was_sealed_with() {
        let keystore = encrypt_keystore(&[0u8; 32], "pass", FAST).unwrap();
        assert_eq!(keystore.version, 1);
        assert_eq!(keystore.crypto.cipher, "aes-256-gcm");
        assert_eq!(keystore.crypto.kdf, "argon2id");
        assert_eq!(keystore.crypto.kdf_params, FAST);
    }

    #[test]
    fn default_params_are_interactive_strength() {
        let params = KdfParams::default();
        assert_eq!(params.memory, 65_536);
        assert_eq!(params.iterations, 3);
        assert!(params.validate().is_ok());
    }

    #[test]
    fn rejects_params_below_argon2_minimum() {
        let params = KdfParams {
            memory: 1,
            iterations: 1,
            parallelism: 1,
        };
        assert!(params.validate().is_err());
        assert!(encrypt_keystore(&[0u8; 32], "pass", params).is_err());
    }

    #[test]
    fn save_and_load_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("keystore.json");
        let keystore = encrypt_keystore(&[99u8; 32], "file-test", FAST).unwrap();

        save_keystore(&keystore, &path).unwrap();
        let loaded = load_keystore(&path).unwrap();
        assert_eq!(*decrypt_keystore(&loaded, "file-test").unwrap(), [99u8; 32]);
    }

    #[test]
    fn fresh_salt_per_encryption() {
        let ks1 = encrypt_keystore(&[7u8; 32], "password", FAST).unwrap();
        let ks2 = encrypt_keystore(&[7u8; 32], "password", FAST).unwrap();
        assert_ne!(ks1.crypto.salt, ks2.crypto.salt);
        assert_ne!(ks1.crypto.ciphertext, ks2.crypto.ciphertext);
    }

    #[test]
    fn load_missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let result = load_keystore(&dir.path().join("missing.json"));
        assert!(matches!(result, Err(WalletError::Io(_))));
    }

    #[test]
    fn unsupported_version_rejected() {
        let mut keystore = encrypt_keystore(&[0u8; 32], "pass", FAST).unwrap();
        keystore.version = 99;
        assert!(decrypt_keystore(&keystore, "pass").is_err());
    }

    #[test]
    fn tampered_ciphertext_rejected() {
        let mut keystore = encrypt_keystore(&[5u8; 32], "pass", FAST).unwrap();
        let mut bytes = hex::decode(&keystore.crypto.ciphertext).unwrap();
        bytes[0] ^= 0xFF;
        keystore.crypto.ciphertext = hex::encode(bytes);
        assert!(decrypt_keystore(&keystore, "pass").is_err());
    }
}
