use std::fmt;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Ifrs16Error {
    #[error("Validation failed: {0}")]
    Validation(ValidationErrors),

    #[error("Degenerate rate: {context} (per-period rate {per_period_rate}, {periods} periods)")]
    DegenerateRate {
        context: String,
        per_period_rate: Decimal,
        periods: u32,
    },

    #[error("Schedule divergence: {schedule} leaves {residual} after period {period} (threshold {threshold})")]
    ScheduleDivergence {
        schedule: String,
        period: u32,
        residual: Decimal,
        threshold: Decimal,
    },

    #[error("Invalid input: {field} — {reason}")]
    InvalidInput { field: String, reason: String },

    #[error("Date error: {0}")]
    DateError(String),

    #[error("Serialization error: {0}")]
    SerializationError(String),
}

impl From<serde_json::Error> for Ifrs16Error {
    fn from(e: serde_json::Error) -> Self {
        Ifrs16Error::SerializationError(e.to_string())
    }
}

impl From<ValidationErrors> for Ifrs16Error {
    fn from(e: ValidationErrors) -> Self {
        Ifrs16Error::Validation(e)
    }
}

/// Category of a single offending input field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum IssueKind {
    MissingField,
    InvalidNumber,
    InvalidDate,
    OutOfRangeRate,
    OutOfRange,
    InvalidChoice,
}

/// One offending field in a raw lease record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldIssue {
    pub field: String,
    pub kind: IssueKind,
    pub detail: String,
}

/// Every field problem found in one normalization pass.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationErrors {
    pub issues: Vec<FieldIssue>,
}

impl ValidationErrors {
    pub fn push(&mut self, field: &str, kind: IssueKind, detail: impl Into<String>) {
        self.issues.push(FieldIssue {
            field: field.to_string(),
            kind,
            detail: detail.into(),
        });
    }

    pub fn is_empty(&self) -> bool {
        self.issues.is_empty()
    }

    pub fn len(&self) -> usize {
        self.issues.len()
    }

    /// Issues reported against `field`.
    pub fn for_field<'a>(&'a self, field: &'a str) -> impl Iterator<Item = &'a FieldIssue> + 'a {
        self.issues.iter().filter(move |i| i.field == field)
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} invalid field(s)", self.issues.len())?;
        for issue in &self.issues {
            write!(f, "; {} ({:?}): {}", issue.field, issue.kind, issue.detail)?;
        }
        Ok(())
    }
}
