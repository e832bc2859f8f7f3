//! Passphrase based unlocking of located secret keys.

use std::fmt;

use log::debug;
use pgp::packet;
use pgp::types::*;

use crate::errors::{Error, Result};

/// A secret key located in a [`SecretKeyStore`](crate::SecretKeyStore),
/// bundled with its role in the ring. The private material is still in its
/// at rest form, usually encrypted under a passphrase derived key.
#[derive(Debug, Clone, Copy)]
pub enum LockedSecretKey<'a> {
    /// The primary key of a ring.
    Primary(&'a packet::SecretKey),
    /// A subkey of a ring.
    Subkey(&'a packet::SecretSubkey),
}

impl<'a> LockedSecretKey<'a> {
    /// The id of the located key.
    pub fn key_id(&self) -> KeyId {
        match self {
            LockedSecretKey::Primary(key) => key.key_id(),
            LockedSecretKey::Subkey(key) => key.key_id(),
        }
    }

    /// Whether the private material is passphrase protected at rest.
    pub fn is_protected(&self) -> bool {
        let params = match self {
            LockedSecretKey::Primary(key) => key.secret_params(),
            LockedSecretKey::Subkey(key) => key.secret_params(),
        };
        params.is_encrypted()
    }

    /// Decrypts the private key material with `passphrase`.
    ///
    /// The symmetric key is derived with the S2K parameters embedded in the
    /// secret key packet, the material is decrypted and its integrity check
    /// verified. An incorrect passphrase surfaces as
    /// [`Error::WrongPassphrase`]; protection parameters we can not process
    /// surface as [`Error::MalformedSecretKey`]. Key material is never
    /// handed out without a passing integrity check.
    ///
    /// The passphrase is not retained. Every call re-derives and re-decrypts,
    /// nothing is cached.
    pub fn unlock(&self, passphrase: &Password) -> Result<UnlockedPrivateKey> {
        let key_id = self.key_id();
        debug!("unlocking secret key {}", hex::encode(key_id.as_ref()));

        let unlocked = match self {
            LockedSecretKey::Primary(key) => key.unlock(passphrase, |public_params, plain| {
                Ok(UnlockedPrivateKey {
                    key_id: key_id.clone(),
                    public_params: public_params.clone(),
                    secret_params: plain.clone(),
                })
            }),
            LockedSecretKey::Subkey(key) => key.unlock(passphrase, |public_params, plain| {
                Ok(UnlockedPrivateKey {
                    key_id: key_id.clone(),
                    public_params: public_params.clone(),
                    secret_params: plain.clone(),
                })
            }),
        };

        unlocked
            .and_then(|inner| inner)
            .map_err(|source| classify_unlock_error(source, &key_id))
    }
}

/// Decrypted private key material, tied to the id of the key it came from.
///
/// The handle is owned exclusively by the caller; the crate keeps no copy.
/// The secret parameters are zeroed on drop by the underlying types.
#[derive(Clone, PartialEq)]
pub struct UnlockedPrivateKey {
    key_id: KeyId,
    public_params: PublicParams,
    secret_params: PlainSecretParams,
}

impl UnlockedPrivateKey {
    /// The id of the key this material belongs to.
    pub fn key_id(&self) -> &KeyId {
        &self.key_id
    }

    pub fn public_params(&self) -> &PublicParams {
        &self.public_params
    }

    /// The decrypted private key material.
    pub fn secret_params(&self) -> &PlainSecretParams {
        &self.secret_params
    }
}

impl fmt::Debug for UnlockedPrivateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UnlockedPrivateKey")
            .field("key_id", &self.key_id)
            .field("secret_params", &"***")
            .finish()
    }
}

/// Tells a wrong passphrase apart from key material we can not process.
///
/// Unusable protection metadata is reported by the parser as unsupported or
/// unimplemented; everything else that goes wrong while unlocking a
/// structurally sound packet is the passphrase failing its integrity check.
fn classify_unlock_error(source: pgp::errors::Error, key_id: &KeyId) -> Error {
    let key_id = hex::encode(key_id.as_ref());
    if matches!(
        source,
        pgp::errors::Error::Unsupported { .. } | pgp::errors::Error::Unimplemented { .. }
    ) {
        Error::MalformedSecretKey { key_id, source }
    } else {
        Error::WrongPassphrase { key_id, source }
    }
}
