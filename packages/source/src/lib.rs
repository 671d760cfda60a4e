#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Record sources for the intervention dashboard.
//!
//! Yields the two record shapes — tabular CSV rows and document-store
//! documents — as typed record sequences for the aggregation pipeline.
//! All string→number and string→time coercion happens here: malformed
//! values become an explicit marker ([`FieldValue::Invalid`] /
//! [`FieldValue::Missing`]), never a parse error that aborts the run.
//! Only structural failures (unreadable file, missing column,
//! collection connection failure) surface as [`SourceError`], and each
//! of those degrades a single dashboard section.
//!
//! [`FieldValue::Invalid`]: soccorso_map_intervention_models::FieldValue::Invalid
//! [`FieldValue::Missing`]: soccorso_map_intervention_models::FieldValue::Missing

pub mod documents;
pub mod parsing;
pub mod tables;

use thiserror::Error;

/// Errors from reading a record source.
#[derive(Debug, Error)]
pub enum SourceError {
    /// File could not be opened or read.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// CSV structure could not be read.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// HTTP request to the document collection failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// A column the aggregation depends on is absent from the header.
    #[error("column '{column}' missing from {table}")]
    MissingColumn {
        /// The absent column name.
        column: &'static str,
        /// Which extract was being read.
        table: &'static str,
    },

    /// The document collection payload was structurally unusable.
    #[error("document collection error: {message}")]
    Collection {
        /// Description of what was wrong with the payload.
        message: String,
    },
}
