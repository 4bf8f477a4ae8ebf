//! The seam between request-building code and the network.

use std::future::Future;

use serde_json::Value;

use crate::domain::ExplorerError;

/// Something that can answer a GET for a JSON document.
///
/// `path` is relative to the API base (`/addresses/0x.../transactions`),
/// `query` is appended in order. Implemented by [`super::HttpSource`]
/// over HTTP and by scripted sources in tests.
pub trait JsonSource {
    fn get_json(
        &self,
        path: &str,
        query: &[(String, String)],
    ) -> impl Future<Output = Result<Value, ExplorerError>> + Send;
}
