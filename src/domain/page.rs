//! Schema validation for paginated list responses.
//!
//! Every Blockscout list endpoint answers with
//! `{ "items": [...], "next_page_params": {...} | null }`. This module checks
//! that shape explicitly at the API boundary: a missing or mistyped `items`
//! field is a [`ExplorerError::MalformedResponse`], never an empty list.

use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde_json::Value;

use super::cursor::PageCursor;
use super::error::ExplorerError;

// ============================================================================
// Timestamped
// ============================================================================

/// A list item that may carry a point in time.
///
/// The pagination fetcher treats items as opaque apart from this.
pub trait Timestamped {
    fn timestamp(&self) -> Option<DateTime<Utc>>;
}

impl Timestamped for Value {
    fn timestamp(&self) -> Option<DateTime<Utc>> {
        self.get("timestamp")
            .and_then(Value::as_str)
            .and_then(|raw| DateTime::parse_from_rfc3339(raw).ok())
            .map(|dt| dt.with_timezone(&Utc))
    }
}

// ============================================================================
// Page
// ============================================================================

/// One validated page of a list endpoint.
#[derive(Debug, Clone, PartialEq)]
pub struct Page<T> {
    pub items: Vec<T>,
    /// Cursor for the following page; `None` once the list is exhausted.
    pub next: Option<PageCursor>,
}

impl<T: DeserializeOwned> Page<T> {
    /// Validate a raw response body.
    ///
    /// # Errors
    ///
    /// Returns `MalformedResponse` if the body is not an object, `items` is
    /// missing or not an array, any item does not match `T`, or
    /// `next_page_params` is neither `null` nor an object.
    pub fn from_json(body: Value) -> Result<Self, ExplorerError> {
        let Value::Object(mut fields) = body else {
            return Err(ExplorerError::parse(format!(
                "expected a page object, got {}",
                json_kind(&body)
            )));
        };

        let items = match fields.remove("items") {
            Some(Value::Array(raw_items)) => parse_items(raw_items)?,
            Some(other) => {
                return Err(ExplorerError::parse(format!(
                    "'items' must be an array, got {}",
                    json_kind(&other)
                )));
            }
            None => return Err(ExplorerError::parse("page is missing 'items'")),
        };

        let next = match fields.remove("next_page_params") {
            None | Some(Value::Null) => None,
            Some(raw @ Value::Object(_)) => {
                let cursor: PageCursor = serde_json::from_value(raw)
                    .map_err(|e| ExplorerError::parse(format!("bad next_page_params: {e}")))?;
                // An empty object would request the same page forever.
                (!cursor.is_empty()).then_some(cursor)
            }
            Some(other) => {
                return Err(ExplorerError::parse(format!(
                    "'next_page_params' must be an object or null, got {}",
                    json_kind(&other)
                )));
            }
        };

        Ok(Self { items, next })
    }
}

/// Validate a bare JSON array of items (the `/main-page/*` endpoints).
///
/// # Errors
///
/// Returns `MalformedResponse` if the body is not an array or an item does
/// not match `T`.
pub fn items_from_array<T: DeserializeOwned>(body: Value) -> Result<Vec<T>, ExplorerError> {
    match body {
        Value::Array(raw_items) => parse_items(raw_items),
        other => Err(ExplorerError::parse(format!(
            "expected an array, got {}",
            json_kind(&other)
        ))),
    }
}

fn parse_items<T: DeserializeOwned>(raw_items: Vec<Value>) -> Result<Vec<T>, ExplorerError> {
    raw_items
        .into_iter()
        .enumerate()
        .map(|(index, raw)| {
            serde_json::from_value(raw)
                .map_err(|e| ExplorerError::parse(format!("item {index}: {e}")))
        })
        .collect()
}

pub(crate) fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

// ============================================================================
// Tests
// ============================================================================
