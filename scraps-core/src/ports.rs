//! Traits describing storage and animation collaborators and shared helper types.

use std::io::Error as IoError;

use async_trait::async_trait;
use reqwest::Error as ReqwestError;
use serde::Deserialize;
use serde_json::Value;

use crate::model::{EntryRecord, ValidationError};

#[derive(thiserror::Error, Debug)]
/// Errors that can occur while appending to or loading a ledger.
pub enum LedgerError {
    /// Input was refused before reaching the ledger.
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
    /// The backing record file could not be read or written.
    #[error("Storage error: {0}")]
    Io(#[from] IoError),
    /// A stored record could not be decoded or failed validation.
    #[error("Corrupt record on line {line}: {reason}")]
    Corrupt {
        /// One-based line number inside the record file.
        line: usize,
        /// What went wrong with the line.
        reason: String,
    },
    /// Every id has been handed out.
    #[error("No entry ids left")]
    IdsExhausted,
}

#[derive(thiserror::Error, Debug)]
/// Errors that can occur while fetching the decorative animation.
pub enum FetchError {
    /// Network layer failed or timed out.
    #[error("Network error: {0}")]
    Network(#[from] ReqwestError),
    /// The server answered with a non-success status code.
    #[error("Unexpected status: {0}")]
    Status(u16),
    /// The body was not a JSON document.
    #[error("Decode error: {0}")]
    Decode(String),
}

/// Durable backing for a ledger.
///
/// Stores are append-only: records are written once, in id order, and never
/// rewritten.
pub trait EntryStore: Send + Sync {
    /// Read every stored record in the order it was written.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::Io`] when the store cannot be read and
    /// [`LedgerError::Corrupt`] when a record fails to decode or validate.
    fn load(&mut self) -> Result<Vec<EntryRecord>, LedgerError>;

    /// Persist one record. The record must be durable once this returns.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::Io`] when the write fails.
    fn append(&mut self, record: &EntryRecord) -> Result<(), LedgerError>;
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
/// Header fields of a Lottie document; all optional since only decoration depends on them.
pub struct AnimationMeta {
    /// Animation name.
    #[serde(default, rename = "nm")]
    pub name: Option<String>,
    /// Bodymovin version that exported the file.
    #[serde(default, rename = "v")]
    pub version: Option<String>,
    /// Frames per second.
    #[serde(default, rename = "fr")]
    pub frame_rate: Option<f64>,
    /// First frame.
    #[serde(default, rename = "ip")]
    pub in_point: Option<f64>,
    /// Last frame.
    #[serde(default, rename = "op")]
    pub out_point: Option<f64>,
    /// Canvas width in pixels.
    #[serde(default, rename = "w")]
    pub width: Option<u32>,
    /// Canvas height in pixels.
    #[serde(default, rename = "h")]
    pub height: Option<u32>,
}

impl AnimationMeta {
    /// Playback length in seconds when both the frame range and rate are known.
    #[must_use]
    pub fn duration_secs(&self) -> Option<f64> {
        let frames = self.out_point? - self.in_point.unwrap_or(0.0);
        let rate = self.frame_rate.filter(|rate| *rate > 0.0)?;
        Some(frames / rate)
    }
}

#[derive(Debug, Clone, PartialEq)]
/// A fetched animation document together with its parsed header.
pub struct Animation {
    /// Parsed header fields.
    pub meta: AnimationMeta,
    /// The raw JSON document as served.
    pub document: Value,
}

impl Animation {
    /// Wrap a JSON document, reading whatever header fields it carries.
    #[must_use]
    pub fn from_document(document: Value) -> Self {
        let meta = AnimationMeta::deserialize(&document).unwrap_or_default();
        Self { meta, document }
    }
}

#[async_trait]
/// Trait for backends that fetch the decorative header animation.
pub trait AnimationPort: Send + Sync {
    /// Fetch the animation document.
    ///
    /// # Errors
    ///
    /// Returns a [`FetchError`] when the request fails, times out, or returns a
    /// non-success status.
    async fn fetch(&self) -> Result<Animation, FetchError>;
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn animation_reads_lottie_header() {
        let animation = Animation::from_document(json!({
            "v": "5.5.7",
            "fr": 30,
            "ip": 0,
            "op": 90,
            "w": 900,
            "h": 400,
            "nm": "bread",
            "layers": []
        }));
        assert_eq!(animation.meta.name.as_deref(), Some("bread"));
        assert_eq!(animation.meta.width, Some(900));
        assert_eq!(animation.meta.duration_secs(), Some(3.0));
    }

    #[test]
    fn animation_tolerates_unexpected_documents() {
        let animation = Animation::from_document(json!(["not", "an", "object"]));
        assert_eq!(animation.meta, AnimationMeta::default());
        assert_eq!(animation.meta.duration_secs(), None);
    }

    #[test]
    fn corrupt_error_names_the_line() {
        let err = LedgerError::Corrupt {
            line: 3,
            reason: "missing field `category`".to_owned(),
        };
        assert_eq!(
            err.to_string(),
            "Corrupt record on line 3: missing field `category`"
        );
    }
}
