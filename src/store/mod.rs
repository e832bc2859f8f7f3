//! In-memory collections of parsed key rings.
//!
//! A store is constructed once from a byte stream holding a serialized
//! collection of transferable keys and is never mutated afterwards. All
//! lookups are pure reads, a store can be shared freely between threads.

mod public;
mod secret;

pub use self::public::PublicKeyStore;
pub use self::secret::SecretKeyStore;
