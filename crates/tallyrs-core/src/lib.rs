//! Ledger core for tallyrs.
//!
//! This crate holds everything below the user interface: exact decimal
//! amounts, the ledger model and its flat text form, and the encrypted save
//! file those are persisted to.

pub mod amount;
pub mod cipher;
pub mod codec;
pub mod envelope;
pub mod error;
pub mod ledger;
pub mod store;
pub mod validate;
pub mod vault;

pub use amount::{Amount, AmountError};
pub use error::{Error, Result};
pub use ledger::{Direction, Flow, Ledger, Record, Standing};
pub use store::{ByteStore, FileStore, MemoryStore};
pub use vault::{exists, load, reset, save, Vault};
