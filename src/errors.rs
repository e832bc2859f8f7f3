use snafu::Snafu;

use crate::select::Capability;

pub type Result<T, E = Error> = ::std::result::Result<T, E>;

/// Error types
#[derive(Debug, Snafu)]
#[snafu(visibility(pub(crate)))]
pub enum Error {
    /// The input bytes did not parse as an OpenPGP transferable key
    /// collection. Construction is all or nothing, a failure anywhere in the
    /// stream fails the whole store.
    #[snafu(display("malformed key ring collection"))]
    MalformedKeyRing { source: pgp::errors::Error },

    /// No ring in the store carries the requested user identity.
    #[snafu(display("no key ring found for identity {identity:?}"))]
    IdentityNotFound { identity: String },

    /// No key in the ring is flagged for the requested capability.
    #[snafu(display("no key with {capability} capability in ring {ring}"))]
    NoCapableKey { capability: Capability, ring: String },

    /// The passphrase derived key did not decrypt the secret key material to
    /// something that passes its integrity check.
    #[snafu(display("wrong passphrase for secret key {key_id}"))]
    WrongPassphrase {
        key_id: String,
        source: pgp::errors::Error,
    },

    /// The secret key packet declares protection parameters we can not use.
    #[snafu(display("unusable protection parameters on secret key {key_id}"))]
    MalformedSecretKey {
        key_id: String,
        source: pgp::errors::Error,
    },
}

impl Error {
    /// Whether this error signals an absent identity, the expected negative
    /// outcome of an optimistic lookup.
    pub fn is_identity_not_found(&self) -> bool {
        matches!(self, Error::IdentityNotFound { .. })
    }

    /// Whether this error means the supplied passphrase was wrong, as opposed
    /// to the key material being damaged.
    pub fn is_wrong_passphrase(&self) -> bool {
        matches!(self, Error::WrongPassphrase { .. })
    }
}
