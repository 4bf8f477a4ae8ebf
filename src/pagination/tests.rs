use std::time::Duration;

use chrono::{DateTime, Utc};
use rstest::rstest;
use serde_json::{Value, json};
use tokio_util::sync::CancellationToken;

use super::*;
use crate::domain::{Transaction, TransactionFilter, TransactionQuery, TransactionType};
use crate::test_utils::{JsonMother, ScriptedSource, StalledSource};

const TXS: &str = "/addresses/0x00000000000000000000000000000000000000aa/transactions";

fn address_txs() -> ListEndpoint {
    ListEndpoint::AddressTransactions {
        address: JsonMother::ADDRESS.to_string(),
    }
}

fn ts(raw: &str) -> DateTime<Utc> {
    DateTime::parse_from_rfc3339(raw).unwrap().with_timezone(&Utc)
}

fn hashes(result: &AggregateResult<Transaction>) -> Vec<&str> {
    result.items.iter().map(|t| t.hash.as_str()).collect()
}

async fn run(
    source: &ScriptedSource,
    policy: FetchPolicy,
) -> Result<AggregateResult<Transaction>, ExplorerError> {
    aggregate(source, &address_txs(), &policy, &CancellationToken::new()).await
}

// ========================================================================
// Endpoint Templates
// ========================================================================

#[rstest]
#[case::txs(address_txs(), TXS, vec![("filter", "to | from")])]
#[case::tokens(
    ListEndpoint::AddressTokens { address: "0x1".to_string() },
    "/addresses/0x1/tokens",
    vec![("type", "ERC-20,ERC-721,ERC-1155")]
)]
#[case::transfers(
    ListEndpoint::AddressTokenTransfers { address: "0x1".to_string() },
    "/addresses/0x1/token-transfers",
    vec![("type", "ERC-20,ERC-721,ERC-1155"), ("filter", "to | from")]
)]
#[case::internal(
    ListEndpoint::AddressInternalTransactions { address: "0x1".to_string() },
    "/addresses/0x1/internal-transactions",
    vec![]
)]
#[case::balance_history(
    ListEndpoint::AddressCoinBalanceHistory { address: "0x1".to_string() },
    "/addresses/0x1/coin-balance-history",
    vec![]
)]
#[case::blocks(ListEndpoint::Blocks { kind: BlockKind::Block }, "/blocks", vec![("type", "block")])]
#[case::pending(
    ListEndpoint::Transactions {
        query: TransactionQuery {
            filter: TransactionFilter::Pending,
            ..TransactionQuery::default()
        }
    },
    "/transactions",
    vec![("filter", "pending")]
)]
#[case::typed_and_method(
    ListEndpoint::Transactions {
        query: TransactionQuery {
            filter: TransactionFilter::Validated,
            types: vec![TransactionType::TokenTransfer, TransactionType::ContractCall],
            methods: vec!["approve".to_string(), "transfer".to_string()],
        }
    },
    "/transactions",
    vec![
        ("filter", "validated"),
        ("type", "token_transfer,contract_call"),
        ("method", "approve,transfer"),
    ]
)]
fn test_endpoint_templates(
    #[case] endpoint: ListEndpoint,
    #[case] path: &str,
    #[case] query: Vec<(&str, &str)>,
) {
    assert_eq!(endpoint.path(), path);
    let expected: Vec<(String, String)> = query
        .into_iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    assert_eq!(endpoint.base_query(), expected);
}

#[test]
fn test_request_query_appends_limit_then_cursor() {
    let policy = FetchPolicy {
        max_pages: 2,
        page_size: Some(25),
    };
    let cursor = PageCursor::block_index(100, 5);
    let query = address_txs().request_query(&policy, Some(&cursor));
    assert_eq!(
        query,
        vec![
            ("filter".to_string(), "to | from".to_string()),
            ("limit".to_string(), "25".to_string()),
            ("block_number".to_string(), "100".to_string()),
            ("index".to_string(), "5".to_string()),
        ]
    );
}

#[rstest]
#[case::zero_pages(FetchPolicy { max_pages: 0, page_size: None })]
#[case::zero_size(FetchPolicy { max_pages: 1, page_size: Some(0) })]
#[tokio::test]
async fn test_invalid_policy_issues_no_requests(#[case] policy: FetchPolicy) {
    let source = ScriptedSource::new();
    let err = run(&source, policy).await.unwrap_err();
    assert!(matches!(err, ExplorerError::InvalidInput(_)));
    assert!(source.requests().is_empty());
}

// ========================================================================
// Scenarios
// ========================================================================

#[tokio::test]
async fn test_two_pages_then_exhausted() {
    let source = ScriptedSource::new()
        .respond(
            TXS,
            JsonMother::page(
                vec![
                    JsonMother::transaction("0x1", "2024-03-02T00:00:00Z"),
                    JsonMother::transaction("0x2", "2024-03-01T00:00:00Z"),
                ],
                Some(JsonMother::cursor(100, 5)),
            ),
        )
        .respond(
            TXS,
            JsonMother::page(
                vec![JsonMother::transaction("0x3", "2024-02-28T00:00:00Z")],
                None,
            ),
        );

    let result = run(&source, FetchPolicy::default()).await.unwrap();

    assert_eq!(hashes(&result), vec!["0x1", "0x2", "0x3"]);
    assert_eq!(result.pages_fetched, 2);
    assert_eq!(result.stop, StopReason::Exhausted);
    assert!(result.is_complete());

    let requests = source.requests();
    assert_eq!(requests.len(), 2);
    assert_eq!(requests[0].param("block_number"), None);
    assert_eq!(requests[1].param("block_number"), Some("100"));
    assert_eq!(requests[1].param("index"), Some("5"));
    assert_eq!(requests[1].param("filter"), Some("to | from"));
}

#[tokio::test]
async fn test_empty_first_page() {
    let source = ScriptedSource::new().respond(
        TXS,
        JsonMother::page(vec![], Some(JsonMother::cursor(1, 0))),
    );

    let result = run(&source, FetchPolicy::default()).await.unwrap();

    assert!(result.is_empty());
    assert_eq!(result.earliest, None);
    assert_eq!(result.latest, None);
    assert_eq!(result.stop, StopReason::EmptyPage);
    assert_eq!(source.requests().len(), 1);
}

#[tokio::test]
async fn test_ceiling_is_only_backstop_for_endless_cursor() {
    let mut source = ScriptedSource::new();
    for i in 0..10u64 {
        source = source.respond(
            TXS,
            JsonMother::page(
                vec![JsonMother::transaction(&format!("0x{i}"), "2024-03-01T00:00:00Z")],
                Some(JsonMother::cursor(1_000 - i, i)),
            ),
        );
    }

    let result = run(&source, FetchPolicy::with_max_pages(5)).await.unwrap();

    assert_eq!(source.requests().len(), 5);
    assert_eq!(result.len(), 5);
    assert_eq!(result.pages_fetched, 5);
    assert_eq!(result.stop, StopReason::PageLimit);
    assert!(!result.is_complete());
}

// ========================================================================
// Properties
// ========================================================================

#[rstest]
#[case(1)]
#[case(3)]
#[case(7)]
#[tokio::test]
async fn test_request_count_never_exceeds_ceiling(#[case] max_pages: usize) {
    let mut source = ScriptedSource::new();
    for i in 0..(max_pages as u64 + 3) {
        source = source.respond(
            TXS,
            JsonMother::page(JsonMother::items("t", 2), Some(JsonMother::cursor(i, i))),
        );
    }

    let result = run(&source, FetchPolicy::with_max_pages(max_pages))
        .await
        .unwrap();

    assert_eq!(source.requests().len(), max_pages);
    assert_eq!(result.len(), max_pages * 2);
}

#[tokio::test]
async fn test_cursor_chaining_uses_previous_response_fields() {
    let cursors = [
        json!({"block_number": 500, "index": 9, "items_count": 50}),
        json!({"block_number": 420, "index": 0, "items_count": 100}),
    ];
    let source = ScriptedSource::new()
        .respond(TXS, JsonMother::page(JsonMother::items("a", 1), Some(cursors[0].clone())))
        .respond(TXS, JsonMother::page(JsonMother::items("b", 1), Some(cursors[1].clone())))
        .respond(TXS, JsonMother::page(JsonMother::items("c", 1), None));

    run(&source, FetchPolicy::default()).await.unwrap();

    let requests = source.requests();
    assert_eq!(requests.len(), 3);
    for (request, cursor) in requests[1..].iter().zip(cursors.iter()) {
        assert!(request.path.ends_with("/transactions"));
        for (field, value) in cursor.as_object().unwrap() {
            assert_eq!(request.param(field), Some(value.to_string().as_str()));
        }
    }
}

#[tokio::test]
async fn test_order_preserved_without_dedup() {
    let source = ScriptedSource::new()
        .respond(
            TXS,
            JsonMother::page(
                vec![
                    JsonMother::transaction("0xb", "2024-03-01T00:00:00Z"),
                    JsonMother::transaction("0xa", "2024-03-01T00:00:00Z"),
                ],
                Some(JsonMother::cursor(2, 0)),
            ),
        )
        .respond(
            TXS,
            JsonMother::page(
                vec![
                    JsonMother::transaction("0xa", "2024-03-01T00:00:00Z"),
                    JsonMother::transaction("0xc", "2024-03-01T00:00:00Z"),
                ],
                None,
            ),
        );

    let result = run(&source, FetchPolicy::default()).await.unwrap();
    assert_eq!(hashes(&result), vec!["0xb", "0xa", "0xa", "0xc"]);
}

#[tokio::test]
async fn test_empty_later_page_stops_early() {
    let source = ScriptedSource::new()
        .respond(TXS, JsonMother::page(JsonMother::items("p1", 3), Some(JsonMother::cursor(9, 1))))
        .respond(TXS, JsonMother::page(vec![], Some(JsonMother::cursor(8, 1))))
        .respond(TXS, JsonMother::page(JsonMother::items("p3", 3), None));

    let result = run(&source, FetchPolicy::default()).await.unwrap();

    assert_eq!(source.requests().len(), 2);
    assert_eq!(result.len(), 3);
    assert_eq!(result.pages_fetched, 2);
    assert_eq!(result.stop, StopReason::EmptyPage);
}

#[tokio::test]
async fn test_fail_fast_on_third_request() {
    let source = ScriptedSource::new()
        .respond(TXS, JsonMother::page(JsonMother::items("p1", 1), Some(JsonMother::cursor(5, 0))))
        .respond(TXS, JsonMother::page(JsonMother::items("p2", 1), Some(JsonMother::cursor(4, 0))))
        .status(TXS, 500)
        .respond(TXS, JsonMother::page(JsonMother::items("p4", 1), Some(JsonMother::cursor(3, 0))))
        .respond(TXS, JsonMother::page(JsonMother::items("p5", 1), None));

    let err = run(&source, FetchPolicy::with_max_pages(5))
        .await
        .unwrap_err();

    assert!(matches!(err, ExplorerError::HttpStatus { status: 500, .. }));
    assert_eq!(source.requests().len(), 3);
}

#[rstest]
#[case::missing_items(json!({"next_page_params": null}))]
#[case::items_object(json!({"items": {"hash": "0x1"}}))]
#[case::bad_item(json!({"items": [{"block_number": 1}]}))]
#[tokio::test]
async fn test_malformed_page_aborts(#[case] body: Value) {
    let source = ScriptedSource::new()
        .respond(TXS, JsonMother::page(JsonMother::items("ok", 1), Some(JsonMother::cursor(5, 0))))
        .respond(TXS, body);

    let err = run(&source, FetchPolicy::default()).await.unwrap_err();

    assert!(matches!(err, ExplorerError::MalformedResponse { .. }));
    assert_eq!(source.requests().len(), 2);
}

#[tokio::test]
async fn test_earliest_timestamp_spans_all_pages() {
    let source = ScriptedSource::new()
        .respond(
            TXS,
            JsonMother::page(
                vec![
                    JsonMother::transaction("0x1", "2024-05-01T00:00:00Z"),
                    JsonMother::transaction("0x2", "2024-04-01T00:00:00Z"),
                ],
                Some(JsonMother::cursor(3, 0)),
            ),
        )
        .respond(
            TXS,
            JsonMother::page(
                vec![
                    json!({"hash": "0xpending", "timestamp": null}),
                    JsonMother::transaction("0x3", "2023-12-31T23:59:59Z"),
                    JsonMother::transaction("0x4", "2024-06-01T00:00:00Z"),
                ],
                None,
            ),
        );

    let result = run(&source, FetchPolicy::default()).await.unwrap();

    assert_eq!(result.len(), 5);
    assert_eq!(result.earliest, Some(ts("2023-12-31T23:59:59Z")));
    assert_eq!(result.latest, Some(ts("2024-06-01T00:00:00Z")));
}

#[tokio::test]
async fn test_no_timestamps_yields_sentinel() {
    let source = ScriptedSource::new().respond(
        TXS,
        JsonMother::page(vec![json!({"hash": "0xp", "timestamp": null})], None),
    );

    let result = run(&source, FetchPolicy::default()).await.unwrap();
    assert_eq!(result.len(), 1);
    assert_eq!(result.earliest, None);
}

#[tokio::test]
async fn test_raw_json_items_are_opaque() {
    let source = ScriptedSource::new().respond(
        "/blocks",
        JsonMother::page(vec![json!({"anything": 1}), json!([1, 2])], None),
    );
    let endpoint = ListEndpoint::Blocks {
        kind: BlockKind::Block,
    };

    let result: AggregateResult<Value> = aggregate(
        &source,
        &endpoint,
        &FetchPolicy::default(),
        &CancellationToken::new(),
    )
    .await
    .unwrap();

    assert_eq!(result.len(), 2);
    assert_eq!(result.earliest, None);
}

// ========================================================================
// Cancellation
// ========================================================================

#[tokio::test]
async fn test_cancelled_before_start() {
    let source = ScriptedSource::new();
    let cancel = CancellationToken::new();
    cancel.cancel();

    let result: Result<AggregateResult<Transaction>, _> =
        aggregate(&source, &address_txs(), &FetchPolicy::default(), &cancel).await;

    assert!(matches!(result, Err(ExplorerError::Cancelled)));
    assert!(source.requests().is_empty());
}

#[tokio::test]
async fn test_cancel_interrupts_in_flight_request() {
    let source = StalledSource::default();
    let cancel = CancellationToken::new();
    let trigger = cancel.clone();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(20)).await;
        trigger.cancel();
    });

    let result: Result<AggregateResult<Transaction>, _> = tokio::time::timeout(
        Duration::from_secs(5),
        aggregate(&source, &address_txs(), &FetchPolicy::default(), &cancel),
    )
    .await
    .expect("cancellation should end the aggregation");

    assert!(matches!(result, Err(ExplorerError::Cancelled)));
    assert_eq!(source.request_count(), 1);
}
