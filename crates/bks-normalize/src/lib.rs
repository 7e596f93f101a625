//! Field normalizers for book sales records.
//!
//! Every canonical [`Field`](bks_model::Field) has exactly one rule, chosen
//! by its [`FieldKind`](bks_model::FieldKind). Rules are pure and
//! idempotent: normalizing an already-normalized value returns it unchanged.
//!
//! # Rules
//!
//! - identifiers: trimmed
//! - titles and other text: whitespace collapsed, case kept
//! - person names: whitespace collapsed, title-cased
//! - emails: whitespace removed, lower-cased
//! - authors: split, inverted names reordered, deduplicated
//! - dates: many encodings in, ISO `YYYY-MM-DD` out
//! - money: currency stripped, euros converted, plain decimal out
//! - integers: integral text or numbers

pub mod author;
pub mod columns;
pub mod date;
pub mod error;
pub mod numeric;
pub mod options;
pub mod record;
pub mod text;

pub use author::split_authors;
pub use columns::{clean_column_name, resolve_field};
pub use date::{normalize_date, parse_date};
pub use error::{FieldError, ValueError};
pub use numeric::{normalize_integer, normalize_money};
pub use options::NormalizeOptions;
pub use record::{normalize_record, normalize_value, renormalize};
pub use text::{collapse_whitespace, title_case};
