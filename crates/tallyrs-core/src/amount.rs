//! Arbitrary-precision signed decimal amounts.
//!
//! Amounts are kept as decimal digit strings, so every addition and
//! subtraction is exact no matter how many digits the operands carry.

use std::cmp::Ordering;
use std::fmt;
use std::ops::{Add, AddAssign, Neg, Sub, SubAssign};
use std::str::FromStr;
use thiserror::Error;

/// Why a string is not a decimal amount.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AmountError {
    #[error("amount is empty")]
    Empty,
    #[error("amount has no digits")]
    MissingDigits,
    #[error("amount starts with a decimal point")]
    LeadingPoint,
    #[error("amount has more than one decimal point")]
    MultiplePoints,
    #[error("amount contains invalid character {0:?}")]
    InvalidCharacter(char),
}

/// A signed decimal number of unbounded length.
///
/// The integer part never has leading zeros (a lone `0` is kept) and zero is
/// never negative. Fractional digits are kept as written, so `1.50` keeps its
/// scale of two; use [`Amount::trim`] to drop trailing fractional zeros.
///
/// Equality and ordering compare numeric value: `1.5 == 1.50`.
#[derive(Debug, Clone)]
pub struct Amount {
    negative: bool,
    /// Digit values (0..=9), most significant first. Never empty.
    integer: Vec<u8>,
    /// Digit values (0..=9) after the decimal point.
    fraction: Vec<u8>,
}

impl Amount {
    /// The value `0`.
    pub fn zero() -> Self {
        Self {
            negative: false,
            integer: vec![0],
            fraction: Vec::new(),
        }
    }

    /// Build an amount, stripping leading zeros and clearing the sign of zero.
    fn normalized(negative: bool, mut integer: Vec<u8>, fraction: Vec<u8>) -> Self {
        let leading = integer.iter().take_while(|&&d| d == 0).count();
        integer.drain(..leading.min(integer.len().saturating_sub(1)));
        if integer.is_empty() {
            integer.push(0);
        }

        let mut amount = Self {
            negative,
            integer,
            fraction,
        };
        if amount.is_zero() {
            amount.negative = false;
        }
        amount
    }

    /// Parse `text`, falling back to zero when it is not a decimal number.
    ///
    /// This is the lenient constructor used when re-reading stored values; it
    /// accepts what [`Amount::parse_stored`] accepts. Use
    /// `text.parse::<Amount>()` to find out whether user input was valid.
    pub fn parse_or_zero(text: &str) -> Self {
        Self::parse_stored(text).unwrap_or_default()
    }

    /// Parse a value read back from a save file.
    ///
    /// Older save files drop the integer zero of values below one (`.5`,
    /// `-.25`), so unlike [`FromStr`] a leading point is accepted here.
    pub fn parse_stored(text: &str) -> Result<Self, AmountError> {
        match text.parse() {
            Err(AmountError::LeadingPoint) => {
                let (sign, magnitude) = match text.strip_prefix('-') {
                    Some(rest) => ("-", rest),
                    None => ("", text),
                };
                format!("{sign}0{magnitude}").parse()
            }
            parsed => parsed,
        }
    }

    /// Whether the value is zero, whatever its scale.
    pub fn is_zero(&self) -> bool {
        self.integer.iter().chain(&self.fraction).all(|&d| d == 0)
    }

    /// Whether the value is strictly below zero.
    pub fn is_negative(&self) -> bool {
        self.negative && !self.is_zero()
    }

    /// Number of digits after the decimal point.
    pub fn scale(&self) -> usize {
        self.fraction.len()
    }

    /// The absolute value.
    pub fn abs(&self) -> Self {
        Self {
            negative: false,
            ..self.clone()
        }
    }

    /// Drop trailing fractional zeros: `12.500` becomes `12.5`, `3.0` becomes `3`.
    pub fn trim(&self) -> Self {
        let keep = self.fraction.len()
            - self.fraction.iter().rev().take_while(|&&d| d == 0).count();
        Self {
            negative: self.negative,
            integer: self.integer.clone(),
            fraction: self.fraction[..keep].to_vec(),
        }
    }

    /// Compare absolute values.
    fn cmp_magnitude(&self, other: &Self) -> Ordering {
        self.integer
            .len()
            .cmp(&other.integer.len())
            .then_with(|| self.integer.cmp(&other.integer))
            .then_with(|| {
                let scale = self.scale().max(other.scale());
                (0..scale)
                    .map(|i| frac_digit(&self.fraction, i).cmp(&frac_digit(&other.fraction, i)))
                    .find(|ord| ord.is_ne())
                    .unwrap_or(Ordering::Equal)
            })
    }

    /// Signed addition of `self` and `rhs` with `rhs`'s sign replaced by `rhs_negative`.
    fn combine(&self, rhs: &Self, rhs_negative: bool) -> Self {
        if self.negative == rhs_negative {
            let (integer, fraction) = add_magnitudes(self, rhs);
            return Self::normalized(self.negative, integer, fraction);
        }

        match self.cmp_magnitude(rhs) {
            Ordering::Equal => Self {
                fraction: vec![0; self.scale().max(rhs.scale())],
                ..Self::zero()
            },
            Ordering::Greater => {
                let (integer, fraction) = sub_magnitudes(self, rhs);
                Self::normalized(self.negative, integer, fraction)
            }
            Ordering::Less => {
                let (integer, fraction) = sub_magnitudes(rhs, self);
                Self::normalized(rhs_negative, integer, fraction)
            }
        }
    }
}

fn frac_digit(fraction: &[u8], index: usize) -> u8 {
    fraction.get(index).copied().unwrap_or(0)
}

/// Digit `index` counted from the least significant end, zero past the front.
fn int_digit(integer: &[u8], index: usize) -> u8 {
    integer
        .len()
        .checked_sub(index + 1)
        .map_or(0, |pos| integer[pos])
}

/// `|a| + |b|`, fractions right-aligned and zero-padded to the wider scale.
fn add_magnitudes(a: &Amount, b: &Amount) -> (Vec<u8>, Vec<u8>) {
    let scale = a.scale().max(b.scale());
    let mut carry = 0;

    let mut fraction = vec![0; scale];
    for i in (0..scale).rev() {
        let sum = frac_digit(&a.fraction, i) + frac_digit(&b.fraction, i) + carry;
        fraction[i] = sum % 10;
        carry = sum / 10;
    }

    let width = a.integer.len().max(b.integer.len());
    let mut integer = Vec::with_capacity(width + 1);
    for i in 0..width {
        let sum = int_digit(&a.integer, i) + int_digit(&b.integer, i) + carry;
        integer.push(sum % 10);
        carry = sum / 10;
    }
    if carry > 0 {
        integer.push(carry);
    }
    integer.reverse();

    (integer, fraction)
}

/// `|a| - |b|` for `|a| >= |b|`, borrowing from the fraction into the integer part.
fn sub_magnitudes(a: &Amount, b: &Amount) -> (Vec<u8>, Vec<u8>) {
    let scale = a.scale().max(b.scale());
    let mut borrow = 0;

    let mut fraction = vec![0; scale];
    for i in (0..scale).rev() {
        let mut diff = frac_digit(&a.fraction, i) as i8 - frac_digit(&b.fraction, i) as i8 - borrow;
        borrow = 0;
        if diff < 0 {
            diff += 10;
            borrow = 1;
        }
        fraction[i] = diff as u8;
    }

    let mut integer = Vec::with_capacity(a.integer.len());
    for i in 0..a.integer.len() {
        let mut diff = int_digit(&a.integer, i) as i8 - int_digit(&b.integer, i) as i8 - borrow;
        borrow = 0;
        if diff < 0 {
            diff += 10;
            borrow = 1;
        }
        integer.push(diff as u8);
    }
    integer.reverse();

    (integer, fraction)
}

impl Default for Amount {
    fn default() -> Self {
        Self::zero()
    }
}

impl FromStr for Amount {
    type Err = AmountError;

    /// Strict parse. A trailing point (`"12."`) is read as having no
    /// fractional digits.
    fn from_str(text: &str) -> Result<Self, Self::Err> {
        if text.is_empty() {
            return Err(AmountError::Empty);
        }

        let (negative, magnitude) = match text.strip_prefix('-') {
            Some(rest) => (true, rest),
            None => (false, text),
        };
        if magnitude.is_empty() {
            return Err(AmountError::MissingDigits);
        }

        let (int_part, frac_part) = magnitude.split_once('.').unwrap_or((magnitude, ""));
        if frac_part.contains('.') {
            return Err(AmountError::MultiplePoints);
        }
        if let Some(bad) = magnitude.chars().find(|c| !c.is_ascii_digit() && *c != '.') {
            return Err(AmountError::InvalidCharacter(bad));
        }
        if int_part.is_empty() {
            return Err(if frac_part.is_empty() {
                AmountError::MissingDigits
            } else {
                AmountError::LeadingPoint
            });
        }

        let digits = |s: &str| s.bytes().map(|b| b - b'0').collect::<Vec<u8>>();
        Ok(Self::normalized(negative, digits(int_part), digits(frac_part)))
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut out = String::with_capacity(self.integer.len() + self.fraction.len() + 2);
        if self.is_negative() {
            out.push('-');
        }
        out.extend(self.integer.iter().map(|&d| char::from(b'0' + d)));
        if !self.fraction.is_empty() {
            out.push('.');
            out.extend(self.fraction.iter().map(|&d| char::from(b'0' + d)));
        }
        f.pad(&out)
    }
}

impl From<i64> for Amount {
    fn from(n: i64) -> Self {
        let integer = n.unsigned_abs().to_string().bytes().map(|b| b - b'0').collect();
        Self::normalized(n < 0, integer, Vec::new())
    }
}

impl PartialEq for Amount {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Amount {}

impl PartialOrd for Amount {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Amount {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self.is_negative(), other.is_negative()) {
            (false, true) => Ordering::Greater,
            (true, false) => Ordering::Less,
            (false, false) => self.cmp_magnitude(other),
            (true, true) => other.cmp_magnitude(self),
        }
    }
}

impl Neg for &Amount {
    type Output = Amount;

    fn neg(self) -> Amount {
        Amount::normalized(!self.negative, self.integer.clone(), self.fraction.clone())
    }
}

impl Neg for Amount {
    type Output = Amount;

    fn neg(self) -> Amount {
        -&self
    }
}

impl Add<&Amount> for &Amount {
    type Output = Amount;

    fn add(self, rhs: &Amount) -> Amount {
        self.combine(rhs, rhs.negative)
    }
}

impl Add for Amount {
    type Output = Amount;

    fn add(self, rhs: Amount) -> Amount {
        &self + &rhs
    }
}

impl Sub<&Amount> for &Amount {
    type Output = Amount;

    fn sub(self, rhs: &Amount) -> Amount {
        self.combine(rhs, !rhs.negative)
    }
}

impl Sub for Amount {
    type Output = Amount;

    fn sub(self, rhs: Amount) -> Amount {
        &self - &rhs
    }
}

impl AddAssign<&Amount> for Amount {
    fn add_assign(&mut self, rhs: &Amount) {
        *self = &*self + rhs;
    }
}

impl SubAssign<&Amount> for Amount {
    fn sub_assign(&mut self, rhs: &Amount) {
        *self = &*self - rhs;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn amt(s: &str) -> Amount {
        s.parse().unwrap()
    }

    #[test]
    fn test_parse_canonical_forms() {
        assert_eq!(amt("0").to_string(), "0");
        assert_eq!(amt("007").to_string(), "7");
        assert_eq!(amt("-0042.10").to_string(), "-42.10");
        assert_eq!(amt("0.5").to_string(), "0.5");
        assert_eq!(amt("100.50").to_string(), "100.50");
        assert_eq!(amt("-0").to_string(), "0");
        assert_eq!(amt("-0.000").to_string(), "0.000");
        assert!(!amt("-0.000").is_negative());
    }

    #[test]
    fn test_trailing_point_means_no_fraction() {
        assert_eq!(amt("12.").to_string(), "12");
        assert_eq!(amt("-12.").to_string(), "-12");
    }

    #[test]
    fn test_parse_rejections() {
        assert_eq!("".parse::<Amount>(), Err(AmountError::Empty));
        assert_eq!("-".parse::<Amount>(), Err(AmountError::MissingDigits));
        assert_eq!(".".parse::<Amount>(), Err(AmountError::MissingDigits));
        assert_eq!(".5".parse::<Amount>(), Err(AmountError::LeadingPoint));
        assert_eq!("1.2.3".parse::<Amount>(), Err(AmountError::MultiplePoints));
        assert_eq!("12a".parse::<Amount>(), Err(AmountError::InvalidCharacter('a')));
        assert_eq!("+5".parse::<Amount>(), Err(AmountError::InvalidCharacter('+')));
        assert_eq!("--5".parse::<Amount>(), Err(AmountError::InvalidCharacter('-')));
    }

    #[test]
    fn test_parse_or_zero_is_lenient() {
        assert!(Amount::parse_or_zero("abc").is_zero());
        assert!(Amount::parse_or_zero("-").is_zero());
        assert!(Amount::parse_or_zero("1.2.3").is_zero());
        assert!(!Amount::parse_or_zero("-x").is_negative());
        assert_eq!(Amount::parse_or_zero("-3.25").to_string(), "-3.25");
    }

    #[test]
    fn test_stored_values_may_omit_integer_zero() {
        assert_eq!(Amount::parse_stored(".5").unwrap().to_string(), "0.5");
        assert_eq!(Amount::parse_stored("-.50").unwrap().to_string(), "-0.50");
        assert_eq!(Amount::parse_or_zero(".5").to_string(), "0.5");
        assert_eq!(Amount::parse_stored("."), Err(AmountError::MissingDigits));
        assert!(Amount::parse_stored("--5").is_err());
        assert!(Amount::parse_or_zero("--5").is_zero());
        // User input stays strict.
        assert_eq!(".5".parse::<Amount>(), Err(AmountError::LeadingPoint));
    }

    #[test]
    fn test_from_integer() {
        assert_eq!(Amount::from(0).to_string(), "0");
        assert_eq!(Amount::from(-250).to_string(), "-250");
        assert_eq!(Amount::from(i64::MIN).to_string(), "-9223372036854775808");
    }

    #[test]
    fn test_addition_with_carry_across_point() {
        assert_eq!((amt("0.75") + amt("0.25")).to_string(), "1.00");
        assert_eq!((amt("999.9") + amt("0.1")).to_string(), "1000.0");
        assert_eq!((amt("100.50") + amt("25")).to_string(), "125.50");
    }

    #[test]
    fn test_mixed_sign_uses_numeric_magnitude() {
        // Longer digit strings are not necessarily larger once a point is involved.
        assert_eq!((amt("10") + amt("-9.5")).to_string(), "0.5");
        assert_eq!((amt("-10") + amt("9.5")).to_string(), "-0.5");
        assert_eq!((amt("9.99") - amt("10")).to_string(), "-0.01");
    }

    #[test]
    fn test_subtraction_keeps_scale() {
        assert_eq!((amt("125.50") - amt("200")).to_string(), "-74.50");
        assert_eq!((amt("1.5") - amt("0.5")).to_string(), "1.0");
        assert_eq!((amt("1.5") - amt("0.5")).trim().to_string(), "1");
    }

    #[test]
    fn test_equal_magnitudes_cancel_to_positive_zero() {
        let zero = amt("-1.50") + amt("1.5");
        assert!(zero.is_zero());
        assert!(!zero.is_negative());
        assert_eq!(zero.to_string(), "0.00");
        assert_eq!((amt("7") - amt("7")).to_string(), "0");
    }

    #[test]
    fn test_long_operands_are_exact() {
        let a = amt("123456789012345678901234567890.123456789");
        let b = amt("987654321098765432109876543210.987654321");
        assert_eq!((&a + &b).to_string(), "1111111110111111111011111111101.111111110");
        assert_eq!((&b - &a).to_string(), "864197532086419753208641975320.864197532");
    }

    #[test]
    fn test_ordering_by_value() {
        assert_eq!(amt("1.5"), amt("1.50"));
        assert!(amt("-2") < amt("-1.5"));
        assert!(amt("10") > amt("9.99"));
        assert_eq!(amt("0"), amt("-0.00"));
    }

    #[test]
    fn test_assign_ops_and_neg() {
        let mut total = amt("10");
        total += &amt("2.5");
        total -= &amt("20");
        assert_eq!(total.to_string(), "-7.5");
        assert_eq!((-total).to_string(), "7.5");
        assert_eq!((-amt("0")).to_string(), "0");
    }

    #[test]
    fn test_display_honours_width() {
        assert_eq!(format!("{:>6}", amt("-1.5")), "  -1.5");
    }
}
