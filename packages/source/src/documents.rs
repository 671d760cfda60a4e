//! Document-collection reader for intervention records.
//!
//! The document store itself is an external collaborator; this module
//! consumes either a local export of the collection (JSON array or
//! NDJSON) or an HTTP endpoint returning a bare JSON array of
//! documents. Field coercion is total: a wrong-typed field is treated
//! as absent, a malformed document is skipped with a warning, and only
//! a connection/read failure is an error.

use std::path::PathBuf;

use soccorso_map_intervention_models::InterventionDocument;

use crate::SourceError;
use crate::parsing;

/// `citta` field of an intervention document.
pub const FIELD_CITY: &str = "citta";
/// `decesso_sul_posto` field of an intervention document.
pub const FIELD_DEATH: &str = "decesso_sul_posto";
/// `sintomi` field of an intervention document.
pub const FIELD_SYMPTOMS: &str = "sintomi";
/// `eta` field of an intervention document.
pub const FIELD_AGE: &str = "eta";

/// Where the intervention collection lives.
#[derive(Debug, Clone)]
pub enum DocumentStore {
    /// Local collection export: a JSON array or NDJSON file.
    File(PathBuf),
    /// HTTP endpoint returning a bare JSON array of documents.
    Http(String),
}

impl DocumentStore {
    /// Fetches and coerces the whole collection.
    ///
    /// # Errors
    ///
    /// Returns [`SourceError`] if the file cannot be read, the HTTP
    /// request fails, or the payload is not a document collection at
    /// all. Individual malformed documents are skipped, not errors.
    pub async fn fetch(
        &self,
        client: &reqwest::Client,
    ) -> Result<Vec<InterventionDocument>, SourceError> {
        match self {
            Self::File(path) => {
                let text = std::fs::read_to_string(path)?;
                parse_collection(&text)
            }
            Self::Http(url) => {
                log::info!("Fetching intervention collection from {url}");
                let body: serde_json::Value = client
                    .get(url)
                    .send()
                    .await?
                    .error_for_status()?
                    .json()
                    .await?;
                let documents = body.as_array().ok_or_else(|| SourceError::Collection {
                    message: "expected a JSON array of documents".to_string(),
                })?;
                Ok(coerce_all(documents.iter()))
            }
        }
    }
}

/// Parses a collection export: a JSON array if the payload starts with
/// `[`, NDJSON otherwise.
///
/// # Errors
///
/// Returns [`SourceError::Collection`] if a JSON-array payload is not
/// parseable at all. NDJSON lines that fail to parse are skipped.
pub fn parse_collection(text: &str) -> Result<Vec<InterventionDocument>, SourceError> {
    if text.trim_start().starts_with('[') {
        let value: serde_json::Value =
            serde_json::from_str(text).map_err(|e| SourceError::Collection {
                message: format!("unparsable collection export: {e}"),
            })?;
        let documents = value.as_array().ok_or_else(|| SourceError::Collection {
            message: "expected a JSON array of documents".to_string(),
        })?;
        return Ok(coerce_all(documents.iter()));
    }

    let documents: Vec<serde_json::Value> = text
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .filter_map(|line| match serde_json::from_str(line) {
            Ok(value) => Some(value),
            Err(e) => {
                log::warn!("skipping unparsable document line: {e}");
                None
            }
        })
        .collect();
    Ok(coerce_all(documents.iter()))
}

fn coerce_all<'a>(values: impl Iterator<Item = &'a serde_json::Value>) -> Vec<InterventionDocument> {
    let mut skipped = 0usize;
    let documents: Vec<InterventionDocument> = values
        .filter_map(|value| {
            let doc = coerce_document(value);
            if doc.is_none() {
                skipped += 1;
            }
            doc
        })
        .collect();
    if skipped > 0 {
        log::warn!("skipped {skipped} non-object documents in collection");
    }
    documents
}

/// Coerces one document. Returns `None` only for values that are not
/// JSON objects; every field-level problem degrades to an absent
/// field (or an empty symptom list).
#[must_use]
pub fn coerce_document(value: &serde_json::Value) -> Option<InterventionDocument> {
    let object = value.as_object()?;
    Some(InterventionDocument {
        city: object.get(FIELD_CITY).and_then(parsing::json_string),
        death_on_scene: object.get(FIELD_DEATH).and_then(parsing::json_bool),
        symptoms: object
            .get(FIELD_SYMPTOMS)
            .map(parsing::json_string_array)
            .unwrap_or_default(),
        age: object.get(FIELD_AGE).and_then(parsing::json_non_negative),
    })
}
