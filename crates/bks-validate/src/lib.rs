//! Validation and deduplication of normalized book sales rows.
//!
//! Checks run fail-fast per row: required-field presence, then per-field
//! type and range, then cross-field consistency. The first failure decides
//! the rejection reason. Valid rows are then collapsed on their identity key.

pub mod checks;
pub mod dedup;
pub mod rules;
pub mod validator;
pub mod violation;

pub use dedup::{DedupOutcome, deduplicate};
pub use rules::ValidationRules;
pub use validator::{ValidationOutcome, validate_all, validate_record};
pub use violation::Violation;
