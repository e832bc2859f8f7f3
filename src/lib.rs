//! Key ring lookup and secret key unlocking for OpenPGP based pipelines,
//! built on top of [rPGP](https://crates.io/crates/pgp).
//!
//! The crate answers three questions for a message security pipeline:
//!
//! - which public key ring belongs to a user identity
//!   ([`PublicKeyStore::find_ring`] / [`PublicKeyStore::resolve_ring`]),
//! - which key inside a ring is the one to use for a given capability
//!   ([`select_key`]),
//! - and how to get from a key id plus passphrase to usable private key
//!   material ([`SecretKeyStore::find_key`], [`LockedSecretKey::unlock`]).
//!
//! Stores are parsed once from byte streams (binary or ASCII armored
//! transferable keys) and never mutated; every lookup is a pure read and
//! stores can be shared across threads. Decrypted private key material is
//! returned to the caller and never cached, so its lifetime is exactly the
//! lifetime of the returned [`UnlockedPrivateKey`].
//!
//! Loading key ring bytes, passphrase acquisition and the actual message
//! encryption, decryption and signing are deliberately out of scope; this
//! crate only resolves and unlocks keys for such a pipeline.

pub mod errors;
mod select;
mod store;
mod unlock;

pub use crate::select::{select_key, Capability, SelectedKey};
pub use crate::store::{PublicKeyStore, SecretKeyStore};
pub use crate::unlock::{LockedSecretKey, UnlockedPrivateKey};

// The rPGP types that appear in this crate's API surface.
pub use pgp::composed::{SignedPublicKey, SignedSecretKey};
pub use pgp::types::{KeyId, Password};
