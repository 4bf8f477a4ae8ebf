//! The sequential page walker.

use serde::de::DeserializeOwned;
use tokio_util::sync::CancellationToken;

use super::{Accumulator, AggregateResult, FetchPolicy, ListEndpoint, StopReason};
use crate::client::JsonSource;
use crate::domain::{ExplorerError, Page, PageCursor, Timestamped};

/// Fetch up to `policy.max_pages` pages of `endpoint` and fold them together.
///
/// Requests are strictly sequential: request N+1 carries the cursor fields of
/// response N. The walk ends on the page ceiling, a missing cursor, or an
/// empty page. Items are not deduplicated.
///
/// # Errors
///
/// The first failed request or malformed page aborts the whole aggregation;
/// nothing accumulated so far is returned. Cancelling `cancel` aborts with
/// `ExplorerError::Cancelled`, including while a request is in flight.
pub async fn aggregate<S, T>(
    source: &S,
    endpoint: &ListEndpoint,
    policy: &FetchPolicy,
    cancel: &CancellationToken,
) -> Result<AggregateResult<T>, ExplorerError>
where
    S: JsonSource + Sync,
    T: DeserializeOwned + Timestamped,
{
    policy.validate()?;

    let path = endpoint.path();
    let mut cursor: Option<PageCursor> = None;
    let mut acc = Accumulator::new();

    loop {
        if cancel.is_cancelled() {
            return Err(ExplorerError::Cancelled);
        }

        let query = endpoint.request_query(policy, cursor.as_ref());
        tracing::debug!(
            "Fetching {} page {} ({path}, {} query params)",
            endpoint.label(),
            acc.pages_fetched() + 1,
            query.len()
        );

        let body = tokio::select! {
            biased;
            () = cancel.cancelled() => return Err(ExplorerError::Cancelled),
            body = source.get_json(&path, &query) => body?,
        };

        let page = Page::<T>::from_json(body)?;
        let page_was_empty = page.items.is_empty();
        acc.push_page(page.items);

        let stop = if page_was_empty {
            Some(StopReason::EmptyPage)
        } else if page.next.is_none() {
            Some(StopReason::Exhausted)
        } else if acc.pages_fetched() >= policy.max_pages {
            Some(StopReason::PageLimit)
        } else {
            None
        };

        if let Some(stop) = stop {
            tracing::debug!(
                "Finished {}: {} items over {} pages ({stop:?})",
                endpoint.label(),
                acc.item_count(),
                acc.pages_fetched()
            );
            return Ok(acc.finish(stop));
        }

        cursor = page.next;
    }
}
