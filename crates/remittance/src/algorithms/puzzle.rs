//! # Puzzle Derivation
//!
//! A puzzle binds a secret, the recipient allowed to release, and the
//! instance holding the value:
//!
//! ```text
//! puzzle = keccak256(secret[32] || recipient[20] || instance[20])
//! ```
//!
//! Binding the instance address keeps a puzzle from one spoke useless on
//! any other.

use crate::domain::{invariant_nonzero_address, RemittanceError, SecureSecret};
use rand::RngCore;
use sha3::{Digest, Keccak256};
use shared_types::{Address, Hash};

/// Keccak-256 over the packed inputs. No validation.
pub fn puzzle_hash(secret: &[u8; 32], recipient: &Address, instance: &Address) -> Hash {
    let mut hasher = Keccak256::new();
    hasher.update(secret);
    hasher.update(recipient);
    hasher.update(instance);
    hasher.finalize().into()
}

/// Validated puzzle generation.
///
/// Rejects an all-zero secret and the zero recipient.
pub fn generate_puzzle(
    secret: &SecureSecret,
    recipient: &Address,
    instance: &Address,
) -> Result<Hash, RemittanceError> {
    if secret.is_zero() {
        return Err(RemittanceError::ZeroSecret);
    }
    invariant_nonzero_address(recipient)?;
    Ok(puzzle_hash(secret.as_bytes(), recipient, instance))
}

/// Fresh random secret for senders that do not bring their own.
pub fn generate_random_secret() -> SecureSecret {
    let mut bytes = [0u8; 32];
    rand::thread_rng().fill_bytes(&mut bytes);
    SecureSecret::new(bytes)
}

/// Deterministic instance address: last 20 bytes of
/// `keccak256(hub || nonce_be)`.
pub fn derive_instance_address(hub: &Address, nonce: u64) -> Address {
    let mut hasher = Keccak256::new();
    hasher.update(hub);
    hasher.update(nonce.to_be_bytes());
    let digest: Hash = hasher.finalize().into();
    let mut address = [0u8; 20];
    address.copy_from_slice(&digest[12..]);
    address
}
