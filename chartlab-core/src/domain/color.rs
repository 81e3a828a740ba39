//! Deterministic identifier-to-color mapping.
//!
//! The identifier is decoded as a base-36 integer (case-insensitive,
//! most-significant character first) and the low three bytes become the
//! RGB channels. The decode wraps at 64 bits; wrapping leaves the low
//! 24 bits exact, so colors are stable for identifiers of any length.
//!
//! Collision behavior: two identifiers sharing their trailing characters
//! can map to the same color, since only the low 24 bits (just under five
//! base-36 characters) contribute. ISINs end in a varied body plus check
//! digit, so collisions are rare in practice; they degrade legend
//! readability, nothing else.

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ColorError {
    #[error("cannot derive a color from an empty identifier")]
    Empty,

    #[error("character '{0}' is not in the base-36 alphabet")]
    InvalidCharacter(char),
}

/// An RGB display color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    /// Derive the stable color for an identifier. Pure: the result depends
    /// only on the identifier, never on which other identifiers are present.
    pub fn for_identifier(id: &str) -> Result<Self, ColorError> {
        if id.is_empty() {
            return Err(ColorError::Empty);
        }

        let mut acc: u64 = 0;
        for c in id.chars() {
            let digit = c.to_digit(36).ok_or(ColorError::InvalidCharacter(c))? as u64;
            acc = acc.wrapping_mul(36).wrapping_add(digit);
        }

        Ok(Self {
            r: ((acc >> 16) & 0xFF) as u8,
            g: ((acc >> 8) & 0xFF) as u8,
            b: (acc & 0xFF) as u8,
        })
    }

    /// CSS hex form, e.g. `#1a2b3c`.
    pub fn hex(&self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}
