//! Book sales data model.
//!
//! Rows move through three representations, one per pipeline phase:
//!
//! - [`RawRecord`]: untyped cells from a source reader
//! - [`NormalizedRecord`]: cleaned values keyed by canonical [`Field`]
//! - [`CanonicalRecord`] / [`SalesRow`]: fully typed rows of the target schema
//!
//! Rows that fail along the way become [`RejectedRow`]s and are counted in
//! [`Diagnostics`].

pub mod canonical;
pub mod diagnostics;
pub mod error;
pub mod field;
pub mod record;
pub mod rejection;
pub mod source;
pub mod state;

pub use canonical::{Book, CanonicalRecord, Dataset, Order, SalesRow, User};
pub use diagnostics::{Diagnostics, SourceDiagnostics};
pub use error::{ModelError, Result};
pub use field::{Field, FieldKind};
pub use record::{NormalizedRecord, NormalizedValue, RawRecord, RawValue};
pub use rejection::{RejectReason, RejectedRow};
pub use source::{FieldSpec, SourceFormat, SourceKind};
pub use state::{PipelineState, RunStatus};
