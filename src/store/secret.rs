use std::io::{BufRead, Read};

use log::debug;
use pgp::composed::{Deserializable, SignedSecretKey};
use pgp::types::*;
use snafu::ResultExt;

use crate::errors::{MalformedKeyRingSnafu, Result};
use crate::unlock::{LockedSecretKey, UnlockedPrivateKey};

/// An immutable collection of secret key rings.
///
/// Logically parallel to [`PublicKeyStore`](crate::PublicKeyStore), but the
/// keys carry (usually passphrase protected) private material and are looked
/// up by key id rather than by identity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SecretKeyStore {
    rings: Vec<SignedSecretKey>,
}

impl SecretKeyStore {
    /// Parses a store from binary OpenPGP data.
    ///
    /// Construction is all or nothing, exactly as for
    /// [`PublicKeyStore::from_bytes`](crate::PublicKeyStore::from_bytes).
    pub fn from_bytes<R: BufRead>(source: R) -> Result<Self> {
        let rings = SignedSecretKey::from_bytes_many(source)
            .context(MalformedKeyRingSnafu)?
            .collect::<pgp::errors::Result<Vec<_>>>()
            .context(MalformedKeyRingSnafu)?;
        debug!("parsed {} secret key rings", rings.len());
        Ok(SecretKeyStore { rings })
    }

    /// Parses a store from ASCII armored OpenPGP data.
    pub fn from_armor<R: Read>(source: R) -> Result<Self> {
        let (rings, _headers) =
            SignedSecretKey::from_armor_many(source).context(MalformedKeyRingSnafu)?;
        let rings = rings
            .collect::<pgp::errors::Result<Vec<_>>>()
            .context(MalformedKeyRingSnafu)?;
        debug!("parsed {} secret key rings", rings.len());
        Ok(SecretKeyStore { rings })
    }

    /// Iterates over the contained rings in store order.
    pub fn rings(&self) -> impl Iterator<Item = &SignedSecretKey> {
        self.rings.iter()
    }

    pub fn len(&self) -> usize {
        self.rings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rings.is_empty()
    }

    /// Locates the secret key with the given id, primary keys and subkeys
    /// alike.
    ///
    /// The returned handle is still encrypted, unlocking it is a separate
    /// step. A missing key is `None`, not an error: callers must be able to
    /// tell "this key does not exist here" apart from "the passphrase for it
    /// was wrong".
    pub fn find_key(&self, key_id: &KeyId) -> Option<LockedSecretKey<'_>> {
        for ring in &self.rings {
            if ring.primary_key.key_id() == *key_id {
                return Some(LockedSecretKey::Primary(&ring.primary_key));
            }
            for subkey in &ring.secret_subkeys {
                if subkey.key.key_id() == *key_id {
                    return Some(LockedSecretKey::Subkey(&subkey.key));
                }
            }
        }
        debug!("no secret key {}", hex::encode(key_id.as_ref()));
        None
    }

    /// Locates a secret key and unlocks it in one step.
    ///
    /// A key that is not in the store is `Ok(None)`; a key that is present
    /// but fails to unlock is an error, see [`LockedSecretKey::unlock`].
    pub fn unlock_key(
        &self,
        key_id: &KeyId,
        passphrase: &Password,
    ) -> Result<Option<UnlockedPrivateKey>> {
        match self.find_key(key_id) {
            Some(key) => key.unlock(passphrase).map(Some),
            None => Ok(None),
        }
    }
}
