//! CLI library components for the book sales pipeline.

pub mod logging;
pub mod summary;
