//! Calendar dates as they appear in `dublin_core.issued` and `dublin_core.modified`.

use chrono::NaiveDate;
use thiserror::Error;

/// Zero-padded `YYYY-MM-DD`, the only layout written to or accepted from manifests.
pub const ISO_DATE_FORMAT: &str = "%Y-%m-%d";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DateError {
    #[error("{0}")]
    Parse(#[from] chrono::ParseError),
    #[error("expected zero-padded YYYY-MM-DD")]
    NotCanonical,
}

/// Parses a manifest date, rejecting anything that would not format back to the same text.
///
/// chrono alone accepts `2023-5-1` and surrounding whitespace; a manifest date must
/// survive a load and save unchanged, so the formatted result has to match the input.
pub fn parse_iso_date(value: &str) -> Result<NaiveDate, DateError> {
    let date = NaiveDate::parse_from_str(value, ISO_DATE_FORMAT)?;
    if format_iso_date(date) != value {
        return Err(DateError::NotCanonical);
    }
    Ok(date)
}

pub fn format_iso_date(date: NaiveDate) -> String {
    date.format(ISO_DATE_FORMAT).to_string()
}
