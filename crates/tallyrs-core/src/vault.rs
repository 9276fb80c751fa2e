//! Encrypted save file operations.

use std::path::Path;

use crate::cipher::{derive_key, Key};
use crate::error::Result;
use crate::ledger::Ledger;
use crate::store::{ByteStore, FileStore};
use crate::{codec, envelope, validate};

/// An unlocked ledger together with the key and store it is saved with.
///
/// This is the whole session state a frontend needs to hold: mutate the
/// ledger through [`Vault::ledger_mut`] and call [`Vault::save`] to persist.
pub struct Vault<S: ByteStore = FileStore> {
    ledger: Ledger,
    store: S,
    key: Key,
}

impl Vault<FileStore> {
    /// Start a new account saved at `path`. Nothing is written until [`Vault::save`].
    pub fn create(
        path: impl AsRef<Path>,
        password: &str,
        initial_amount: Option<&str>,
    ) -> Result<Self> {
        Self::create_in(FileStore::new(path.as_ref()), password, initial_amount)
    }

    /// Open and decrypt the save file at `path`.
    pub fn unlock(path: impl AsRef<Path>, password: &str) -> Result<Self> {
        Self::unlock_in(FileStore::new(path.as_ref()), password)
    }

    pub fn path(&self) -> &Path {
        self.store.path()
    }
}

impl<S: ByteStore> Vault<S> {
    /// Start a new account kept in `store`.
    pub fn create_in(store: S, password: &str, initial_amount: Option<&str>) -> Result<Self> {
        validate::password(password)?;
        let ledger = Ledger::create(initial_amount)?;

        tracing::info!("Created new ledger");
        Ok(Self {
            ledger,
            store,
            key: derive_key(password),
        })
    }

    /// Decrypt the ledger kept in `store`.
    pub fn unlock_in(store: S, password: &str) -> Result<Self> {
        validate::password(password)?;
        let key = derive_key(password);
        let ledger = load_from(&store, &key)?;

        tracing::info!("Unlocked ledger with {} records", ledger.raw_records().len());
        Ok(Self { ledger, store, key })
    }

    pub fn ledger(&self) -> &Ledger {
        &self.ledger
    }

    pub fn ledger_mut(&mut self) -> &mut Ledger {
        &mut self.ledger
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Encrypt and write the ledger. A failed save leaves the previous save intact.
    pub fn save(&self) -> Result<()> {
        save_to(&self.store, &self.ledger, &self.key)?;
        tracing::info!("Saved ledger");
        Ok(())
    }
}

/// Encrypt `ledger` under `key` and write it to `store`.
pub fn save_to(store: &impl ByteStore, ledger: &Ledger, key: &Key) -> Result<()> {
    let sealed = envelope::seal(&codec::encode(ledger), key)?;
    store.write_all(&sealed)
}

/// Read, decrypt and decode the ledger in `store`.
pub fn load_from(store: &impl ByteStore, key: &Key) -> Result<Ledger> {
    let sealed = store.read_all()?;
    let text = envelope::open(&sealed, key)?;
    codec::decode(&text)
}

/// Encrypt `ledger` with `password` into the file at `path`.
pub fn save(ledger: &Ledger, password: &str, path: impl AsRef<Path>) -> Result<()> {
    validate::password(password)?;
    save_to(&FileStore::new(path.as_ref()), ledger, &derive_key(password))
}

/// Decrypt the ledger in the file at `path` with `password`.
pub fn load(password: &str, path: impl AsRef<Path>) -> Result<Ledger> {
    validate::password(password)?;
    load_from(&FileStore::new(path.as_ref()), &derive_key(password))
}

/// Whether a save file exists at `path`. If not, offer to create an account.
pub fn exists(path: impl AsRef<Path>) -> bool {
    FileStore::new(path.as_ref()).exists()
}

/// Delete the save file at `path`.
pub fn reset(path: impl AsRef<Path>) -> Result<()> {
    FileStore::new(path.as_ref()).remove()?;
    tracing::info!("Removed save file {}", path.as_ref().display());
    Ok(())
}
