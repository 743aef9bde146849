use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};

use crate::ValidationError;

const MAX_SYMBOL_LEN: usize = 15;

/// Regional suffix of the B3 exchange as used by Yahoo Finance.
pub const DEFAULT_REGIONAL_SUFFIX: &str = ".SA";

/// Maps a raw user-entered ticker to its provider-qualified form.
///
/// Tickers that already carry a market delimiter (`.`) are kept as-is so
/// foreign listings such as `AAPL.MX` pass through; everything else gets the
/// regional suffix appended exactly once.
pub fn qualify(raw: &str, suffix: &str) -> String {
    let normalized = raw.trim().to_uppercase();
    let suffix = suffix.trim().to_uppercase();

    if normalized.is_empty()
        || normalized.contains('.')
        || suffix.is_empty()
        || normalized.ends_with(&suffix)
    {
        return normalized;
    }

    format!("{normalized}{suffix}")
}

/// Strips the regional suffix for presentation.
pub fn display(symbol: &str, suffix: &str) -> String {
    let suffix = suffix.trim().to_uppercase();
    if suffix.is_empty() {
        return symbol.to_owned();
    }

    symbol
        .strip_suffix(suffix.as_str())
        .unwrap_or(symbol)
        .to_owned()
}

/// Normalized market symbol/ticker.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Symbol(String);

impl Symbol {
    /// Parse and normalize a symbol to uppercase.
    pub fn parse(input: &str) -> Result<Self, ValidationError> {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            return Err(ValidationError::EmptySymbol);
        }

        let normalized = trimmed.to_ascii_uppercase();
        let len = normalized.chars().count();
        if len > MAX_SYMBOL_LEN {
            return Err(ValidationError::SymbolTooLong {
                len,
                max: MAX_SYMBOL_LEN,
            });
        }

        if let Some(first) = normalized.chars().next() {
            if !(first.is_ascii_alphabetic() || first == '^') {
                return Err(ValidationError::SymbolInvalidStart { ch: first });
            }
        }

        for (index, ch) in normalized.chars().enumerate().skip(1) {
            let valid = ch.is_ascii_alphanumeric() || ch == '.' || ch == '-';
            if !valid {
                return Err(ValidationError::SymbolInvalidChar { ch, index });
            }
        }

        Ok(Self(normalized))
    }

    /// Qualify with the regional suffix, then validate.
    pub fn qualified(raw: &str, suffix: &str) -> Result<Self, ValidationError> {
        Self::parse(&qualify(raw, suffix))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Display form without the regional suffix.
    pub fn display(&self, suffix: &str) -> String {
        display(&self.0, suffix)
    }
}

impl Display for Symbol {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<String> for Symbol {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl TryFrom<&str> for Symbol {
    type Error = ValidationError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::parse(value)
    }
}

impl From<Symbol> for String {
    fn from(value: Symbol) -> Self {
        value.0
    }
}
