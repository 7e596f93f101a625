//! Settings shared by the normalizers of one run.

use rust_decimal::Decimal;

/// Per-run normalization settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizeOptions {
    /// Read ambiguous numeric dates as day/month instead of month/day.
    pub day_first: bool,
    /// USD per EUR, applied to amounts quoted in euros.
    pub eur_to_usd: Decimal,
}

impl Default for NormalizeOptions {
    fn default() -> Self {
        Self {
            day_first: false,
            eur_to_usd: Decimal::new(12, 1),
        }
    }
}
