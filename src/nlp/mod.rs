//! Natural language interpretation of report commands
//!
//! A command goes through the [`RequestSplitter`] first, then every segment is
//! turned into a [`ReportSpecification`] by the [`IntentExtractor`], which uses
//! the [`TemporalResolver`] for date phrases. Everything here is pure text
//! processing with no access to the data source.

pub mod extractor;
pub mod splitter;
pub mod temporal;
pub mod text;
pub mod types;


pub use extractor::IntentExtractor;
pub use splitter::RequestSplitter;
pub use temporal::TemporalResolver;
pub use types::*;

use crate::error::{ReportError, ReportResult};

/// Split a command and extract one specification per segment.
///
/// Blank commands are rejected before any parsing happens.
pub fn interpret(text: &str, resolver: TemporalResolver) -> ReportResult<Vec<ReportSpecification>> {
    if text.trim().is_empty() {
        return Err(ReportError::EmptyInput);
    }

    let extractor = IntentExtractor::new(resolver);
    Ok(RequestSplitter::split(text)
        .iter()
        .map(|segment| extractor.extract(segment))
        .collect())
}
