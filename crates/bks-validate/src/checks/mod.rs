//! Row checks, run in order: presence, then field values, then cross-field.

pub mod consistency;
pub mod presence;
pub mod values;
