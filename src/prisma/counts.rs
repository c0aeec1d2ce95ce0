//! Review-stage counts and their validation.
//!
//! A [`ReviewCounts`] can only be obtained through a validating constructor,
//! so every value the layout engine sees already satisfies the PRISMA
//! invariants. Inconsistent input is rejected, never clamped.

use serde::Deserialize;

/// Reasons a set of counts cannot be drawn.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum InvalidCounts {
    /// The payload was not a JSON object with the six required integer fields.
    #[error("malformed counts payload: {0}")]
    Malformed(String),

    /// A count was below zero.
    #[error("{field} must be non-negative (got {value})")]
    Negative { field: &'static str, value: i128 },

    /// A count does not fit in 64 unsigned bits.
    #[error("{field} is too large (got {value})")]
    TooLarge { field: &'static str, value: i128 },

    /// More duplicates were removed than records were identified.
    #[error("duplicates ({duplicates}) exceed totalVolume ({total})")]
    DuplicatesExceedTotal { duplicates: u64, total: u64 },

    /// `postDeduplication` disagrees with `totalVolume - duplicates`.
    #[error("postDeduplication ({actual}) must equal totalVolume - duplicates ({expected})")]
    DeduplicationMismatch { expected: u64, actual: u64 },

    /// More records passed full-text screening than were screened.
    #[error("hundredPercentMatch ({matched}) exceeds postDeduplication ({deduplicated})")]
    MatchExceedsDeduplicated { matched: u64, deduplicated: u64 },
}

/// Wire form of the export request. Wider than `u64` and signed so negative
/// and oversized values reach validation instead of failing deserialization
/// with a generic message.
#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct CountsPayload {
    pub total_volume: i128,
    pub pubmed_volume: i128,
    pub semantic_scholar_volume: i128,
    pub duplicates: i128,
    pub post_deduplication: i128,
    pub hundred_percent_match: i128,
}

/// Record counts at each stage of a systematic review.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReviewCounts {
    total_volume: u64,
    pubmed_volume: u64,
    semantic_scholar_volume: u64,
    duplicates: u64,
    post_deduplication: u64,
    hundred_percent_match: u64,
}

impl ReviewCounts {
    /// Build validated counts.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidCounts`] when duplicates exceed the total, when
    /// `post_deduplication != total_volume - duplicates`, or when
    /// `hundred_percent_match > post_deduplication`.
    pub fn new(
        total_volume: u64,
        pubmed_volume: u64,
        semantic_scholar_volume: u64,
        duplicates: u64,
        post_deduplication: u64,
        hundred_percent_match: u64,
    ) -> Result<Self, InvalidCounts> {
        let Some(expected) = total_volume.checked_sub(duplicates) else {
            return Err(InvalidCounts::DuplicatesExceedTotal { duplicates, total: total_volume });
        };
        if post_deduplication != expected {
            return Err(InvalidCounts::DeduplicationMismatch { expected, actual: post_deduplication });
        }
        if hundred_percent_match > post_deduplication {
            return Err(InvalidCounts::MatchExceedsDeduplicated {
                matched: hundred_percent_match,
                deduplicated: post_deduplication,
            });
        }
        Ok(Self {
            total_volume,
            pubmed_volume,
            semantic_scholar_volume,
            duplicates,
            post_deduplication,
            hundred_percent_match,
        })
    }

    /// Parse and validate the JSON body of an export request.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidCounts::Malformed`] for missing, unknown or
    /// non-integer fields, and the other variants for invariant violations.
    pub fn from_json_slice(body: &[u8]) -> Result<Self, InvalidCounts> {
        let payload: CountsPayload =
            serde_json::from_slice(body).map_err(|e| InvalidCounts::Malformed(e.to_string()))?;
        Self::try_from(payload)
    }

    #[must_use]
    pub fn total_volume(&self) -> u64 {
        self.total_volume
    }

    #[must_use]
    pub fn pubmed_volume(&self) -> u64 {
        self.pubmed_volume
    }

    #[must_use]
    pub fn semantic_scholar_volume(&self) -> u64 {
        self.semantic_scholar_volume
    }

    #[must_use]
    pub fn duplicates(&self) -> u64 {
        self.duplicates
    }

    #[must_use]
    pub fn post_deduplication(&self) -> u64 {
        self.post_deduplication
    }

    #[must_use]
    pub fn hundred_percent_match(&self) -> u64 {
        self.hundred_percent_match
    }

    /// Records screened out before full-text assessment.
    #[must_use]
    pub fn excluded(&self) -> u64 {
        self.post_deduplication - self.hundred_percent_match
    }

    /// Studies included. Every full-text-assessed record counts as included.
    #[must_use]
    pub fn included(&self) -> u64 {
        self.hundred_percent_match
    }
}

impl TryFrom<CountsPayload> for ReviewCounts {
    type Error = InvalidCounts;

    fn try_from(p: CountsPayload) -> Result<Self, Self::Error> {
        Self::new(
            non_negative("totalVolume", p.total_volume)?,
            non_negative("pubmedVolume", p.pubmed_volume)?,
            non_negative("semanticScholarVolume", p.semantic_scholar_volume)?,
            non_negative("duplicates", p.duplicates)?,
            non_negative("postDeduplication", p.post_deduplication)?,
            non_negative("hundredPercentMatch", p.hundred_percent_match)?,
        )
    }
}

fn non_negative(field: &'static str, value: i128) -> Result<u64, InvalidCounts> {
    if value < 0 {
        return Err(InvalidCounts::Negative { field, value });
    }
    u64::try_from(value).map_err(|_| InvalidCounts::TooLarge { field, value })
}
