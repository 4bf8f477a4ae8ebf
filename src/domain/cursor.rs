//! Continuation cursors for paginated Blockscout endpoints.
//!
//! Blockscout answers list requests with a `next_page_params` object whose
//! fields must be echoed back as query parameters to get the next page. The
//! field set differs per endpoint, so the cursor is kept as an opaque map.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Opaque token identifying where the next page of a list begins.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PageCursor(BTreeMap<String, Value>);

impl PageCursor {
    /// Cursor shape used by address transaction listings.
    #[cfg(test)]
    #[must_use]
    pub fn block_index(block_number: u64, index: u64) -> Self {
        let mut fields = BTreeMap::new();
        fields.insert("block_number".to_string(), Value::from(block_number));
        fields.insert("index".to_string(), Value::from(index));
        Self(fields)
    }

    /// Add or replace a field.
    #[cfg(test)]
    #[must_use]
    pub fn with(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.0.insert(name.into(), value.into());
        self
    }

    #[cfg(test)]
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.0.get(name)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Query pairs to append to the next request.
    ///
    /// Strings are passed verbatim, other scalars use their JSON text and
    /// `null` fields are dropped.
    #[must_use]
    pub fn to_query(&self) -> Vec<(String, String)> {
        self.0
            .iter()
            .filter_map(|(name, value)| {
                let rendered = match value {
                    Value::Null => return None,
                    Value::String(s) => s.clone(),
                    other => other.to_string(),
                };
                Some((name.clone(), rendered))
            })
            .collect()
    }
}

// ============================================================================
// Tests
// ============================================================================
