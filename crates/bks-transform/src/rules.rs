//! Coercion settings for one run.

use std::sync::LazyLock;

use regex::Regex;

/// Identifiers: non-empty, no whitespace.
pub const DEFAULT_IDENTIFIER_PATTERN: &str = r"^\S+$";

/// Decimal places kept for currency amounts.
pub const DEFAULT_CURRENCY_SCALE: u32 = 2;

static DEFAULT_IDENTIFIER_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(DEFAULT_IDENTIFIER_PATTERN).expect("Invalid identifier regex")
});

/// Settings the coercion engine applies to every row.
#[derive(Debug, Clone)]
pub struct CoercionRules {
    pub currency_scale: u32,
    pub identifier: Regex,
}

impl CoercionRules {
    pub fn new(currency_scale: u32, identifier_pattern: &str) -> Result<Self, regex::Error> {
        Ok(Self {
            currency_scale,
            identifier: Regex::new(identifier_pattern)?,
        })
    }
}

impl Default for CoercionRules {
    fn default() -> Self {
        Self {
            currency_scale: DEFAULT_CURRENCY_SCALE,
            identifier: DEFAULT_IDENTIFIER_REGEX.clone(),
        }
    }
}
