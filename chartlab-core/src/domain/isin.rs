//! ISIN identifiers (ISO 6166).
//!
//! An ISIN is two uppercase country letters, nine alphanumeric characters,
//! and one decimal check digit. The check digit is a Luhn checksum over the
//! base-36 digit expansion of the code (letters expand to two decimal
//! digits, A=10 .. Z=35). Parsing is pure and side-effect free; invalid
//! codes never enter the pipeline.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum IsinError {
    #[error("ISIN must be 12 characters, got {0}")]
    Length(usize),

    #[error("ISIN must start with a two-letter country code: {0}")]
    CountryCode(String),

    #[error("invalid character '{0}' in ISIN")]
    Character(char),

    #[error("ISIN checksum failed: {0}")]
    Checksum(String),
}

/// A validated ISIN. Construction via [`Isin::parse`] is the only way to
/// obtain one, so every `Isin` in the system has passed the checksum.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Isin(String);

impl Isin {
    /// Parse and validate a candidate code. Leading/trailing whitespace is
    /// trimmed and the code is uppercased before validation.
    pub fn parse(input: &str) -> Result<Self, IsinError> {
        let code = input.trim().to_ascii_uppercase();

        if code.len() != 12 {
            return Err(IsinError::Length(code.len()));
        }

        let bytes = code.as_bytes();
        for &b in bytes {
            if !b.is_ascii_alphanumeric() {
                return Err(IsinError::Character(b as char));
            }
        }
        if !bytes[0].is_ascii_uppercase() || !bytes[1].is_ascii_uppercase() {
            return Err(IsinError::CountryCode(code));
        }
        // The check digit is always numeric.
        if !bytes[11].is_ascii_digit() {
            return Err(IsinError::Checksum(code));
        }
        if !luhn_valid(&code) {
            return Err(IsinError::Checksum(code));
        }

        Ok(Self(code))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Isin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for Isin {
    type Err = IsinError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

/// Luhn check over the base-36 digit expansion of the full code,
/// check digit included. Valid codes sum to a multiple of ten.
fn luhn_valid(code: &str) -> bool {
    let mut digits: Vec<u32> = Vec::with_capacity(24);
    for c in code.chars() {
        let Some(v) = c.to_digit(36) else {
            return false;
        };
        if v >= 10 {
            digits.push(v / 10);
            digits.push(v % 10);
        } else {
            digits.push(v);
        }
    }

    let mut sum = 0u32;
    for (i, &d) in digits.iter().rev().enumerate() {
        let mut d = d;
        if i % 2 == 1 {
            d *= 2;
            if d > 9 {
                d -= 9;
            }
        }
        sum += d;
    }
    sum % 10 == 0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_known_valid_isins() {
        for code in [
            "US0378331005",
            "US5949181045",
            "US02079K3059",
            "GB0002634946",
            "DE0007164600",
            "IE00B4L5Y983",
        ] {
            assert!(Isin::parse(code).is_ok(), "{code} should be valid");
        }
    }

    #[test]
    fn rejects_bad_check_digit() {
        assert_eq!(
            Isin::parse("US0378331004"),
            Err(IsinError::Checksum("US0378331004".into()))
        );
    }

    #[test]
    fn rejects_wrong_length() {
        assert_eq!(Isin::parse("US03783"), Err(IsinError::Length(7)));
        assert_eq!(Isin::parse(""), Err(IsinError::Length(0)));
    }

    #[test]
    fn rejects_numeric_country_code() {
        assert!(matches!(
            Isin::parse("120378331005"),
            Err(IsinError::CountryCode(_))
        ));
    }

    #[test]
    fn rejects_non_alphanumeric() {
        assert_eq!(Isin::parse("US03783-1005"), Err(IsinError::Character('-')));
    }

    #[test]
    fn lowercase_and_whitespace_are_normalized() {
        let isin = Isin::parse("  us0378331005\n").unwrap();
        assert_eq!(isin.as_str(), "US0378331005");
    }

    #[test]
    fn from_str_roundtrip() {
        let isin: Isin = "US5949181045".parse().unwrap();
        assert_eq!(isin.to_string(), "US5949181045");
    }
}
