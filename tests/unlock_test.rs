use std::fs::File;
use std::path::Path;

use pgp::types::*;
use pgp_keyring::errors::Error;
use pgp_keyring::{select_key, Capability, Password, PublicKeyStore, SecretKeyStore};
use pretty_assertions::assert_eq;

const RECIPIENT: &str = "recipient@example.com";
const PASSPHRASE: &str = "correct horse battery staple";

// Key ids of the recipient ring, the only ring in the secret fixture.
const RECIPIENT_PRIMARY: &str = "94cf4d20c06d846c";
const RECIPIENT_SIGNING_SUBKEY: &str = "22c5b8da0eb8c416";
const RECIPIENT_ENCRYPTION_SUBKEY: &str = "1e85bfaf30b06d2e";

fn fixture(name: &str) -> File {
    let path = Path::new("./tests/fixtures").join(name);
    File::open(&path).unwrap_or_else(|err| panic!("couldn't open {:?}: {}", path, err))
}

fn secret_store() -> SecretKeyStore {
    SecretKeyStore::from_armor(fixture("secring.asc")).expect("parse secret store")
}

fn public_store() -> PublicKeyStore {
    PublicKeyStore::from_armor(fixture("pubring.asc")).expect("parse public store")
}

fn subkey_id(store: &SecretKeyStore, id: &str) -> KeyId {
    store
        .rings()
        .flat_map(|ring| &ring.secret_subkeys)
        .map(|subkey| subkey.key.key_id())
        .find(|key_id| hex::encode(key_id.as_ref()) == id)
        .unwrap_or_else(|| panic!("fixture is missing subkey {}", id))
}

#[test]
fn secret_fixture_has_the_expected_shape() {
    let store = secret_store();
    assert_eq!(store.len(), 1);

    let ring = store.rings().next().unwrap();
    assert_eq!(hex::encode(ring.primary_key.key_id()), RECIPIENT_PRIMARY);

    let mut subkeys: Vec<_> = ring
        .secret_subkeys
        .iter()
        .map(|subkey| hex::encode(subkey.key.key_id()))
        .collect();
    subkeys.sort();
    let mut expected = vec![
        RECIPIENT_SIGNING_SUBKEY.to_string(),
        RECIPIENT_ENCRYPTION_SUBKEY.to_string(),
    ];
    expected.sort();
    assert_eq!(subkeys, expected);
}

#[test]
fn locating_a_key_we_only_have_publicly_returns_none() {
    let _ = pretty_env_logger::try_init();

    let secret = secret_store();
    let public = public_store();

    // The sender's encryption subkey exists in the public store only.
    let ring = public.resolve_ring("sender@example.com").unwrap();
    let absent = select_key(ring, Capability::Encrypt).unwrap().key_id();

    assert!(secret.find_key(&absent).is_none());
    let unlocked = secret
        .unlock_key(&absent, &Password::from("wrong password"))
        .expect("absence is not an error, whatever the passphrase");
    assert!(unlocked.is_none());
}

#[test]
fn locating_the_primary_key_finds_it_protected() {
    let store = secret_store();
    let primary_id = store.rings().next().unwrap().primary_key.key_id();

    let located = store.find_key(&primary_id).expect("primary key is present");
    assert_eq!(located.key_id(), primary_id);
    assert!(located.is_protected());
}

#[test]
fn unlocking_the_primary_key_with_the_right_passphrase_works() {
    let store = secret_store();
    let primary_id = store.rings().next().unwrap().primary_key.key_id();

    let located = store.find_key(&primary_id).unwrap();
    let unlocked = located
        .unlock(&Password::from(PASSPHRASE))
        .expect("passphrase is correct");
    assert_eq!(unlocked.key_id(), &primary_id);
}

#[test]
fn unlocking_a_subkey_with_the_right_passphrase_works() {
    let store = secret_store();
    let signing_id = subkey_id(&store, RECIPIENT_SIGNING_SUBKEY);

    let located = store.find_key(&signing_id).expect("subkey is present");
    assert!(located.is_protected());

    let unlocked = located
        .unlock(&Password::from(PASSPHRASE))
        .expect("passphrase is correct");
    assert_eq!(unlocked.key_id(), &signing_id);
}

#[test]
fn unlocking_with_a_wrong_passphrase_fails() {
    let store = secret_store();
    let signing_id = subkey_id(&store, RECIPIENT_SIGNING_SUBKEY);

    let located = store.find_key(&signing_id).unwrap();
    let err = located
        .unlock(&Password::from("wrong password"))
        .expect_err("the wrong passphrase must not unlock anything");
    assert!(err.is_wrong_passphrase());
    assert!(matches!(err, Error::WrongPassphrase { .. }));
}

#[test]
fn unlocking_twice_yields_the_same_material() {
    let store = secret_store();
    let primary_id = store.rings().next().unwrap().primary_key.key_id();
    let located = store.find_key(&primary_id).unwrap();

    let first = located.unlock(&Password::from(PASSPHRASE)).unwrap();
    let second = located.unlock(&Password::from(PASSPHRASE)).unwrap();
    assert_eq!(first, second);
}

#[test]
fn resolve_select_locate_unlock_end_to_end() {
    let _ = pretty_env_logger::try_init();

    let public = public_store();
    let secret = secret_store();

    // The pipeline's signing path: resolve the identity in the public store,
    // pick its signing key, then fetch and unlock our secret half of it.
    let ring = public.resolve_ring(RECIPIENT).expect("recipient is bound");
    let signing = select_key(ring, Capability::Sign).expect("ring has a signing key");
    assert_eq!(hex::encode(signing.key_id()), RECIPIENT_SIGNING_SUBKEY);

    let unlocked = secret
        .unlock_key(&signing.key_id(), &Password::from(PASSPHRASE))
        .expect("correct passphrase")
        .expect("we hold the secret half");
    assert_eq!(unlocked.key_id(), &signing.key_id());
}
