use std::io::{BufRead, Read};

use log::debug;
use pgp::composed::{Deserializable, SignedPublicKey};
use snafu::ResultExt;

use crate::errors::{IdentityNotFoundSnafu, MalformedKeyRingSnafu, Result};

/// An immutable collection of public key rings.
///
/// Each ring holds one primary key together with its subkeys and the user
/// identities bound to it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublicKeyStore {
    rings: Vec<SignedPublicKey>,
}

impl PublicKeyStore {
    /// Parses a store from binary OpenPGP data.
    ///
    /// The whole stream must parse, a malformed or truncated ring anywhere
    /// in it fails the construction and no partial store is returned.
    pub fn from_bytes<R: BufRead>(source: R) -> Result<Self> {
        let rings = SignedPublicKey::from_bytes_many(source)
            .context(MalformedKeyRingSnafu)?
            .collect::<pgp::errors::Result<Vec<_>>>()
            .context(MalformedKeyRingSnafu)?;
        debug!("parsed {} public key rings", rings.len());
        Ok(PublicKeyStore { rings })
    }

    /// Parses a store from ASCII armored OpenPGP data.
    pub fn from_armor<R: Read>(source: R) -> Result<Self> {
        let (rings, _headers) =
            SignedPublicKey::from_armor_many(source).context(MalformedKeyRingSnafu)?;
        let rings = rings
            .collect::<pgp::errors::Result<Vec<_>>>()
            .context(MalformedKeyRingSnafu)?;
        debug!("parsed {} public key rings", rings.len());
        Ok(PublicKeyStore { rings })
    }

    /// Iterates over the contained rings in store order.
    pub fn rings(&self) -> impl Iterator<Item = &SignedPublicKey> {
        self.rings.iter()
    }

    pub fn len(&self) -> usize {
        self.rings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rings.is_empty()
    }

    /// Returns the first ring that binds `identity` as one of its user ids.
    ///
    /// The identity is compared for exact equality against the canonical
    /// user id text of every ring, in store order. Absence is a normal
    /// outcome for callers that probe optimistically.
    pub fn find_ring(&self, identity: &str) -> Option<&SignedPublicKey> {
        self.rings
            .iter()
            .find(|ring| ring_has_identity(ring, identity))
    }

    /// Like [`find_ring`](Self::find_ring), but absence is an
    /// [`IdentityNotFound`](crate::errors::Error::IdentityNotFound) error.
    pub fn resolve_ring(&self, identity: &str) -> Result<&SignedPublicKey> {
        self.find_ring(identity)
            .ok_or_else(|| IdentityNotFoundSnafu { identity }.build())
    }
}

fn ring_has_identity(ring: &SignedPublicKey, identity: &str) -> bool {
    ring.details.users.iter().any(|user| user.id.id() == identity.as_bytes())
}
