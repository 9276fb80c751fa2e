//! Input validation applied before anything reaches the ledger.
//!
//! The save format has no escaping, so these checks are what keep the codec
//! delimiters (`,` `:` `|`) out of stored names and values.

use crate::error::{Error, Result};

/// Longest accepted amount, in characters.
pub const MAX_AMOUNT_LEN: usize = 50;
/// Longest accepted borrower/lender name, in characters.
pub const MAX_NAME_LEN: usize = 50;
/// Longest accepted password, in bytes. Longer ones would not fit the key.
pub const MAX_PASSWORD_LEN: usize = 32;
/// Longest accepted note, in characters.
pub const MAX_NOTE_LEN: usize = 1000;

/// Characters the save format reserves as separators.
pub const RESERVED: [char; 3] = [',', ':', '|'];

/// Check that `text` is a decimal amount a user may enter.
///
/// Accepts an optional leading `-` followed by digits with at most one
/// decimal point, which may be neither the first nor the last character.
pub fn amount(text: &str) -> Result<()> {
    if text.is_empty() {
        return Err(Error::invalid_amount(text, "amount is empty"));
    }
    if text.chars().count() > MAX_AMOUNT_LEN {
        return Err(Error::invalid_amount(
            text,
            format!("longer than {MAX_AMOUNT_LEN} characters"),
        ));
    }

    let digits = text.strip_prefix('-').unwrap_or(text);
    if digits.is_empty() {
        return Err(Error::invalid_amount(text, "no digits after the sign"));
    }
    if digits.starts_with('.') || digits.ends_with('.') {
        return Err(Error::invalid_amount(
            text,
            "decimal point must sit between digits",
        ));
    }

    // The strict parser covers characters and repeated points.
    text.parse::<crate::Amount>()
        .map(|_| ())
        .map_err(|e| Error::invalid_amount(text, e))
}

/// Check that `text` is a usable borrower/lender name.
pub fn name(text: &str) -> Result<()> {
    if text.is_empty() {
        return Err(Error::invalid_name(text, "name is empty"));
    }
    if text.chars().count() > MAX_NAME_LEN {
        return Err(Error::invalid_name(
            text,
            format!("longer than {MAX_NAME_LEN} characters"),
        ));
    }
    if let Some(bad) = text
        .chars()
        .find(|c| !c.is_ascii_alphanumeric() && !matches!(c, ' ' | '-' | '_' | '.'))
    {
        return Err(Error::invalid_name(text, format!("character {bad:?} is not allowed")));
    }
    Ok(())
}

/// Check that `text` can be used as a password.
pub fn password(text: &str) -> Result<()> {
    if text.is_empty() {
        return Err(Error::InvalidPassword("password is empty".into()));
    }
    if text.len() > MAX_PASSWORD_LEN {
        return Err(Error::InvalidPassword(format!(
            "longer than {MAX_PASSWORD_LEN} bytes"
        )));
    }
    Ok(())
}

/// Check that `text` can be stored as the short note. Empty means "no note".
pub fn note(text: &str) -> Result<()> {
    if text.chars().count() > MAX_NOTE_LEN {
        return Err(Error::InvalidNote(format!(
            "longer than {MAX_NOTE_LEN} characters"
        )));
    }
    if let Some(bad) = text.chars().find(|c| RESERVED.contains(c)) {
        return Err(Error::InvalidNote(format!("character {bad:?} is not allowed")));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_amounts() {
        for ok in ["0", "12", "-12", "12.5", "-0.01", "007.50"] {
            assert!(amount(ok).is_ok(), "{ok} should be accepted");
        }
        for bad in ["", "-", ".5", "12.", "-.5", "1.2.3", "1,000", "12a", "1|2", "+3"] {
            assert!(
                matches!(amount(bad), Err(Error::InvalidAmount { .. })),
                "{bad} should be rejected"
            );
        }
        assert!(amount(&"9".repeat(MAX_AMOUNT_LEN)).is_ok());
        assert!(amount(&"9".repeat(MAX_AMOUNT_LEN + 1)).is_err());
    }

    #[test]
    fn test_names() {
        for ok in ["Alice", "Bob Smith", "j.doe", "x_y-z", "Total Money"] {
            assert!(name(ok).is_ok(), "{ok} should be accepted");
        }
        for bad in ["", "a:b", "a,b", "a|b", "Zoë", "tab\there"] {
            assert!(
                matches!(name(bad), Err(Error::InvalidName { .. })),
                "{bad:?} should be rejected"
            );
        }
        assert!(name(&"n".repeat(MAX_NAME_LEN + 1)).is_err());
    }

    #[test]
    fn test_passwords() {
        assert!(password("hunter2").is_ok());
        assert!(password(&"p".repeat(32)).is_ok());
        assert!(matches!(password(""), Err(Error::InvalidPassword(_))));
        assert!(matches!(password(&"p".repeat(33)), Err(Error::InvalidPassword(_))));
    }

    #[test]
    fn test_notes() {
        assert!(note("").is_ok());
        assert!(note("rent due friday\nbring receipts").is_ok());
        assert!(matches!(note("a, b"), Err(Error::InvalidNote(_))));
        assert!(matches!(note("time: 5pm"), Err(Error::InvalidNote(_))));
        assert!(note(&"n".repeat(MAX_NOTE_LEN)).is_ok());
        assert!(note(&"n".repeat(MAX_NOTE_LEN + 1)).is_err());
    }
}
