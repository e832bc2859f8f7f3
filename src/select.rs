//! Capability based key selection within a single key ring.
//!
//! A ring bundles one primary key with any number of subkeys, and the key
//! that is actually allowed to sign (or encrypt, or certify) is declared
//! through the key flags on the self and binding signatures. Selection scans
//! the primary key first and then the subkeys in declaration order, so that
//! repeated calls on the same ring always pick the same key.

use std::fmt;

use log::debug;
use pgp::composed::{SignedPublicKey, SignedPublicSubKey};
use pgp::packet::KeyFlags;
use pgp::types::*;

use crate::errors::{NoCapableKeySnafu, Result};

/// A declared permitted use of a key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Capability {
    /// Certification of other keys and user ids.
    Certify,
    /// Signing of data.
    Sign,
    /// Encryption, of communications or of storage.
    Encrypt,
    /// Authentication.
    Authenticate,
}

impl Capability {
    /// Whether the given flag set grants this capability.
    ///
    /// `Encrypt` is satisfied by either of the two OpenPGP encryption flags,
    /// a key marked for only one of them is still an encryption key.
    pub fn granted_by(self, flags: &KeyFlags) -> bool {
        match self {
            Capability::Certify => flags.certify(),
            Capability::Sign => flags.sign(),
            Capability::Encrypt => flags.encrypt_comms() || flags.encrypt_storage(),
            Capability::Authenticate => flags.authentication(),
        }
    }
}

impl fmt::Display for Capability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Capability::Certify => write!(f, "certify"),
            Capability::Sign => write!(f, "sign"),
            Capability::Encrypt => write!(f, "encrypt"),
            Capability::Authenticate => write!(f, "authenticate"),
        }
    }
}

/// The key picked out of a ring, either the primary key or one of its
/// subkeys.
#[derive(Debug, Clone, Copy)]
pub enum SelectedKey<'a> {
    /// The ring's primary key.
    Primary(&'a pgp::packet::PublicKey),
    /// A subkey bound to the primary key.
    Subkey(&'a SignedPublicSubKey),
}

impl SelectedKey<'_> {
    /// The id of the selected key.
    pub fn key_id(&self) -> KeyId {
        match self {
            SelectedKey::Primary(key) => key.key_id(),
            SelectedKey::Subkey(subkey) => subkey.key.key_id(),
        }
    }

    pub fn is_primary(&self) -> bool {
        matches!(self, SelectedKey::Primary(_))
    }
}

/// Picks the single key in `ring` that carries `capability`.
///
/// The primary key is considered first, with the flags from the primary
/// user's self signature, then each subkey in declaration order with the
/// flags from its binding signature. The first key whose flags grant the
/// capability is returned.
///
/// A v4 ring that declares no key flags at all falls back to the convention
/// that the primary key certifies and signs; the fallback never applies to
/// subkeys or to other capabilities.
pub fn select_key<'a>(
    ring: &'a SignedPublicKey,
    capability: Capability,
) -> Result<SelectedKey<'a>> {
    let primary_flags = primary_key_flags(ring);
    if capability.granted_by(&primary_flags) {
        return Ok(SelectedKey::Primary(&ring.primary_key));
    }

    for subkey in &ring.public_subkeys {
        if capability.granted_by(&subkey_flags(subkey)) {
            debug!(
                "selected subkey {} of ring {} for {}",
                hex::encode(subkey.key.key_id()),
                hex::encode(ring.primary_key.key_id()),
                capability
            );
            return Ok(SelectedKey::Subkey(subkey));
        }
    }

    // No key in the ring is flagged for the capability. If the ring carries
    // no flags anywhere, the primary key is assumed to certify and sign.
    if primary_flags == KeyFlags::default()
        && ring
            .public_subkeys
            .iter()
            .all(|subkey| subkey_flags(subkey) == KeyFlags::default())
        && matches!(capability, Capability::Certify | Capability::Sign)
    {
        return Ok(SelectedKey::Primary(&ring.primary_key));
    }

    NoCapableKeySnafu {
        capability,
        ring: hex::encode(ring.primary_key.key_id()),
    }
    .fail()
}

/// Flags of the primary key, taken from the primary user's self signature.
fn primary_key_flags(ring: &SignedPublicKey) -> KeyFlags {
    let users = &ring.details.users;
    users
        .iter()
        .find(|user| user.is_primary())
        .or_else(|| users.first())
        .and_then(|user| user.signatures.first())
        .map(|sig| sig.key_flags())
        .unwrap_or_default()
}

fn subkey_flags(subkey: &SignedPublicSubKey) -> KeyFlags {
    subkey
        .signatures
        .first()
        .map(|sig| sig.key_flags())
        .unwrap_or_default()
}
