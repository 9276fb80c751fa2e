//! Flat text form of a [`Ledger`].
//!
//! ```text
//! field:value,field:value|name:amount,name:amount|field,field,field,name,name
//! ```
//!
//! Fields and records are written sorted by key; the last section is the
//! display order as stored. Nothing is escaped, validation keeps the
//! separators out of names and values.

use std::collections::BTreeMap;

use crate::error::{Error, Result};
use crate::ledger::Ledger;

const SECTION_SEP: char = '|';
const PAIR_SEP: char = ',';
const KEY_SEP: char = ':';

/// Flatten `ledger` into its save string.
pub fn encode(ledger: &Ledger) -> String {
    let mut out = String::new();
    push_pairs(&mut out, ledger.fields());
    out.push(SECTION_SEP);
    push_pairs(&mut out, ledger.raw_records());
    out.push(SECTION_SEP);
    out.push_str(&ledger.display_order().join(&PAIR_SEP.to_string()));

    tracing::debug!("Encoded ledger into {} bytes", out.len());
    out
}

fn push_pairs(out: &mut String, map: &BTreeMap<String, String>) {
    for (i, (key, value)) in map.iter().enumerate() {
        if i > 0 {
            out.push(PAIR_SEP);
        }
        out.push_str(key);
        out.push(KEY_SEP);
        out.push_str(value);
    }
}

/// Parse a save string back into a ledger.
///
/// Pairs without a `:` are skipped. Missing sections and broken ledger
/// invariants are reported as [`Error::CorruptData`].
pub fn decode(data: &str) -> Result<Ledger> {
    let mut sections = data.splitn(3, SECTION_SEP);
    let (Some(fields), Some(records), Some(order)) =
        (sections.next(), sections.next(), sections.next())
    else {
        return Err(Error::CorruptData(format!(
            "expected three sections separated by {SECTION_SEP:?}"
        )));
    };

    let order = order
        .split(PAIR_SEP)
        .filter(|name| !name.is_empty())
        .map(str::to_string)
        .collect();

    Ledger::from_parts(parse_pairs(fields), parse_pairs(records), order)
}

fn parse_pairs(section: &str) -> BTreeMap<String, String> {
    section
        .split(PAIR_SEP)
        .filter(|pair| !pair.is_empty())
        .filter_map(|pair| match pair.split_once(KEY_SEP) {
            Some((key, value)) => Some((key.to_string(), value.to_string())),
            None => {
                tracing::warn!("Skipping malformed pair without {KEY_SEP:?}");
                None
            }
        })
        .collect()
}
