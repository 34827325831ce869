//! Structured field extraction from article pages.
//!
//! - [`resolver`]: Ordered locator resolution over a [`resolver::Lookup`] document
//! - [`fields`]: Per-field candidate lists, postprocessing, and fallbacks
//! - [`dates`]: Date pattern detection and ISO-8601 normalization

pub mod dates;
pub mod fields;
pub mod resolver;
