//! The in-memory ledger: balances, note and borrower/lender records.

use std::collections::{BTreeMap, HashSet};

use crate::amount::Amount;
use crate::error::{Error, Result};
use crate::validate;

/// Field holding the current balance.
pub const TOTAL_MONEY: &str = "Total Money";
/// Field holding the signed amount of the most recent transaction.
pub const LAST_TRANSACTION: &str = "Last Transaction";
/// Field holding the free-text note.
pub const SHORT_NOTE: &str = "Short Note";
/// The fields every ledger carries, in display order.
pub const FIXED_FIELDS: [&str; 3] = [TOTAL_MONEY, LAST_TRANSACTION, SHORT_NOTE];
/// Stored in place of a missing last transaction or note.
pub const NONE: &str = "-";

/// Which way a transaction moves the balance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Income,
    Expense,
}

/// Which way money moved between the owner and another person.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// The owner borrowed from the person: the balance grows, the owner owes them.
    Borrowed,
    /// The owner lent to the person: the balance shrinks, they owe the owner.
    Lent,
}

/// Who owes whom for a single record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Standing {
    /// The owner owes this person.
    YouOwe,
    /// This person owes the owner.
    OwesYou,
    Settled,
}

/// A borrower/lender record as shown to the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record<'a> {
    pub name: &'a str,
    /// Signed balance: negative means the person owes the owner.
    pub amount: Amount,
}

impl Record<'_> {
    pub fn standing(&self) -> Standing {
        if self.amount.is_zero() {
            Standing::Settled
        } else if self.amount.is_negative() {
            Standing::OwesYou
        } else {
            Standing::YouOwe
        }
    }
}

/// Balances, note and borrower/lender records of one account.
///
/// Fields and records are kept sorted by key so the save format is
/// deterministic; the display order is kept separately and always starts
/// with [`FIXED_FIELDS`], followed by every record name in insertion order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ledger {
    fields: BTreeMap<String, String>,
    records: BTreeMap<String, String>,
    order: Vec<String>,
}

impl Default for Ledger {
    fn default() -> Self {
        Self::new()
    }
}

impl Ledger {
    /// A fresh account with a zero balance.
    pub fn new() -> Self {
        let fields = [(TOTAL_MONEY, "0"), (LAST_TRANSACTION, NONE), (SHORT_NOTE, NONE)]
            .into_iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();

        Self {
            fields,
            records: BTreeMap::new(),
            order: FIXED_FIELDS.iter().map(|s| s.to_string()).collect(),
        }
    }

    /// A fresh account starting at `initial_amount`.
    ///
    /// `None` or an empty string starts at zero.
    pub fn create(initial_amount: Option<&str>) -> Result<Self> {
        let mut ledger = Self::new();
        if let Some(text) = initial_amount.filter(|s| !s.is_empty()) {
            let total = parse_user_amount(text)?;
            ledger.set_field(TOTAL_MONEY, total.to_string());
        }
        Ok(ledger)
    }

    /// Rebuild a ledger from decoded parts, checking every structural invariant.
    ///
    /// Amount values are not part of the structure: one that cannot be read
    /// counts as zero, the same way [`Amount::parse_or_zero`] treats it.
    pub(crate) fn from_parts(
        fields: BTreeMap<String, String>,
        records: BTreeMap<String, String>,
        order: Vec<String>,
    ) -> Result<Self> {
        for key in FIXED_FIELDS {
            if !fields.contains_key(key) {
                return Err(Error::CorruptData(format!("missing field {key:?}")));
            }
        }
        if let Err(e) = Amount::parse_stored(&fields[TOTAL_MONEY]) {
            tracing::warn!("Unreadable total money ({e}), reading it as zero");
        }

        if order.len() < FIXED_FIELDS.len() || order[..FIXED_FIELDS.len()] != FIXED_FIELDS {
            return Err(Error::CorruptData(
                "display order does not start with the fixed fields".into(),
            ));
        }

        let names = &order[FIXED_FIELDS.len()..];
        let mut seen = HashSet::with_capacity(names.len());
        for name in names {
            if !seen.insert(name.as_str()) {
                return Err(Error::CorruptData(format!("{name:?} listed twice")));
            }
            match records.get(name) {
                None => return Err(Error::CorruptData(format!("no record for {name:?}"))),
                Some(value) => {
                    if let Err(e) = Amount::parse_stored(value) {
                        tracing::warn!("Unreadable amount for record {name:?} ({e}), reading it as zero");
                    }
                }
            }
        }
        if records.len() != names.len() {
            return Err(Error::CorruptData(
                "records missing from display order".into(),
            ));
        }

        Ok(Self {
            fields,
            records,
            order,
        })
    }

    /// Apply an income or expense of `amount` to the balance.
    ///
    /// The ledger is left untouched when `amount` is invalid.
    pub fn apply_transaction(&mut self, amount: &str, flow: Flow) -> Result<()> {
        let value = parse_user_amount(amount)?;
        let signed = match flow {
            Flow::Income => value,
            Flow::Expense => -value,
        };

        let total = &self.total() + &signed;
        self.set_field(TOTAL_MONEY, total.to_string());
        self.set_field(LAST_TRANSACTION, signed.to_string());
        Ok(())
    }

    /// Record money borrowed from or lent to `name`.
    ///
    /// An existing record for `name` accumulates; a new one is appended to
    /// the display order. The balance moves by the same amount.
    pub fn upsert_record(&mut self, name: &str, amount: &str, direction: Direction) -> Result<()> {
        validate::name(name)?;
        let value = parse_user_amount(amount)?;
        let signed = match direction {
            Direction::Borrowed => value,
            Direction::Lent => -value,
        };

        let balance = match self.records.get(name) {
            Some(existing) => &Amount::parse_or_zero(existing) + &signed,
            None => {
                self.order.push(name.to_string());
                signed.clone()
            }
        };
        self.records.insert(name.to_string(), balance.to_string());

        let total = &self.total() + &signed;
        self.set_field(TOTAL_MONEY, total.to_string());
        Ok(())
    }

    /// Replace the note. An empty `text` clears it.
    pub fn set_note(&mut self, text: &str) -> Result<()> {
        validate::note(text)?;
        let stored = if text.is_empty() { NONE } else { text };
        self.set_field(SHORT_NOTE, stored.to_string());
        Ok(())
    }

    /// The current balance.
    pub fn total(&self) -> Amount {
        self.fields
            .get(TOTAL_MONEY)
            .map(|s| Amount::parse_or_zero(s))
            .unwrap_or_default()
    }

    /// The most recent transaction, signed.
    pub fn last_transaction(&self) -> Option<&str> {
        self.optional_field(LAST_TRANSACTION)
    }

    pub fn note(&self) -> Option<&str> {
        self.optional_field(SHORT_NOTE)
    }

    /// The signed balance recorded for `name`.
    pub fn record(&self, name: &str) -> Option<Amount> {
        self.records.get(name).map(|s| Amount::parse_or_zero(s))
    }

    /// Records in the order they were first added.
    pub fn records(&self) -> impl Iterator<Item = Record<'_>> {
        self.order[FIXED_FIELDS.len()..].iter().map(|name| Record {
            name,
            amount: self.record(name).unwrap_or_default(),
        })
    }

    /// Raw field values, sorted by key.
    pub fn fields(&self) -> &BTreeMap<String, String> {
        &self.fields
    }

    /// Raw record amounts, sorted by name.
    pub fn raw_records(&self) -> &BTreeMap<String, String> {
        &self.records
    }

    /// Fixed field names followed by record names.
    pub fn display_order(&self) -> &[String] {
        &self.order
    }

    fn optional_field(&self, key: &str) -> Option<&str> {
        self.fields
            .get(key)
            .map(String::as_str)
            .filter(|v| *v != NONE)
    }

    fn set_field(&mut self, key: &str, value: String) {
        self.fields.insert(key.to_string(), value);
    }
}

/// Validate user input and parse it as an amount.
fn parse_user_amount(text: &str) -> Result<Amount> {
    validate::amount(text)?;
    text.parse().map_err(|e| Error::invalid_amount(text, e))
}
