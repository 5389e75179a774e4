//! Ed25519 message signing, and credentials built on top of it.

use ed25519_dalek::{Signer, SigningKey, Verifier, VerifyingKey};
use levy_types::{Credential, KeyPair, PrivateKey, PublicKey, Signature};

/// Sign a message with a private key, returning the signature.
pub fn sign_message(message: &[u8], private_key: &PrivateKey) -> Signature {
    let signing_key = SigningKey::from_bytes(&private_key.0);
    let sig = signing_key.sign(message);
    Signature(sig.to_bytes())
}

/// Verify a signature against a message and public key.
///
/// Returns `true` if the signature is valid, `false` otherwise.
pub fn verify_signature(message: &[u8], signature: &Signature, public_key: &PublicKey) -> bool {
    let Ok(verifying_key) = VerifyingKey::from_bytes(&public_key.0) else {
        return false;
    };
    let dalek_sig = ed25519_dalek::Signature::from_bytes(&signature.0);
    verifying_key.verify(message, &dalek_sig).is_ok()
}

/// Sign an operation digest, producing a credential for `keypair.public`.
pub fn sign_credential(keypair: &KeyPair, digest: [u8; 32]) -> Credential {
    Credential {
        signer: keypair.public,
        digest,
        signature: sign_message(&digest, &keypair.private),
    }
}

/// Check that `credential` was issued by `expected_signer` over its digest.
pub fn verify_credential(credential: &Credential, expected_signer: &PublicKey) -> bool {
    credential.signer == *expected_signer
        && verify_signature(&credential.digest, &credential.signature, expected_signer)
}
