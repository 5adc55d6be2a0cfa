//! Tests for the cache coordinator: hits, misses, writes and error surfacing

#[path = "testutils/mod.rs"]
mod testutils;

use graphcache::{
    CacheConfig, CacheError, ExecutorError, Parameters, Query, QueryKind, StoreError,
};
use serde_json::json;
use std::time::Duration;
use testutils::test_fixture::TestFixture;

const READ_USERS: &str = "MATCH (a:User) RETURN a";

#[tokio::test]
async fn test_read_miss_then_hit() {
    let fixture = TestFixture::new();
    fixture
        .executor
        .respond(READ_USERS, json!([{"a": {"data": {"name": "Joe"}}}]));

    let first = fixture
        .coordinator
        .execute_query(READ_USERS, Parameters::new())
        .await
        .unwrap();
    assert_eq!(first.data(), Some(json!({"a": [{"name": "Joe"}]})));

    let second = fixture
        .coordinator
        .execute_query(READ_USERS, Parameters::new())
        .await
        .unwrap();
    assert_eq!(second.uid(), first.uid());
    assert_eq!(second.data(), first.data());

    assert_eq!(fixture.executor.calls_for(READ_USERS), 1);
    let stats = fixture.coordinator.stats();
    assert_eq!(stats.misses, 1);
    assert_eq!(stats.hits, 1);
    assert_eq!(stats.executions, 1);
    assert_eq!(stats.hit_rate(), 0.5);
}

#[tokio::test]
async fn test_entry_records_query_and_kind() {
    let fixture = TestFixture::new();
    let params = Parameters::new().with("name", "Joe");
    let text = "MATCH (a:User {name: {name}}) RETURN a";

    let handle = fixture
        .coordinator
        .execute_query(text, params.clone())
        .await
        .unwrap();

    let entry = handle.entry().expect("entry cached");
    assert_eq!(entry.uid, Query::with_parameters(text, params.clone()).uid());
    assert_eq!(entry.query, text);
    assert_eq!(entry.parameters, params);
    assert_eq!(entry.kind, QueryKind::Read);
    assert!(entry.sensitivities.contains("name"));
    assert!(entry.sensitivities.contains("Joe"));
    assert_eq!(entry.data, Some(json!({"a": []})));
}

#[tokio::test]
async fn test_writes_always_execute() {
    let fixture = TestFixture::new();
    let write = "CREATE (a:User {name: 'Joe'})";

    for _ in 0..3 {
        let handle = fixture
            .coordinator
            .execute_query(write, Parameters::new())
            .await
            .unwrap();
        assert_eq!(handle.entry().unwrap().kind, QueryKind::Write);
    }

    assert_eq!(fixture.executor.calls_for(write), 3);
    assert_eq!(fixture.coordinator.stats().write_executions, 3);
    assert_eq!(fixture.store.len(), 1);
}

#[tokio::test]
async fn test_denied_query_never_reaches_executor() {
    let fixture = TestFixture::new();
    fixture.coordinator.rules().set_deny(["CREATE"]);

    let err = fixture
        .coordinator
        .execute_query("CREATE (n) RETURN n", Parameters::new())
        .await
        .unwrap_err();

    assert!(matches!(err, CacheError::OperatorDenied { ref keyword } if keyword == "CREATE"));
    assert_eq!(fixture.executor.total_calls(), 0);
    assert!(fixture.store.is_empty());
    assert_eq!(fixture.coordinator.stats().denied, 1);
}

#[tokio::test]
async fn test_execution_error_leaves_cache_untouched() {
    let fixture = TestFixture::new();
    fixture
        .executor
        .fail(READ_USERS, ExecutorError::Connection("refused".to_string()));

    let err = fixture
        .coordinator
        .execute_query(READ_USERS, Parameters::new())
        .await
        .unwrap_err();

    match err {
        CacheError::Execution { uid, source } => {
            assert_eq!(uid, Query::new(READ_USERS).uid());
            assert_eq!(source, ExecutorError::Connection("refused".to_string()));
        }
        other => panic!("unexpected error: {other}"),
    }
    assert!(fixture.store.is_empty());
    assert_eq!(fixture.coordinator.stats().execution_failures, 1);

    // Not cached, so the next call retries the engine
    fixture
        .executor
        .respond(READ_USERS, json!([{"a": {"data": {"name": "Joe"}}}]));
    let handle = fixture
        .coordinator
        .execute_query(READ_USERS, Parameters::new())
        .await
        .unwrap();
    assert_eq!(handle.data(), Some(json!({"a": [{"name": "Joe"}]})));
}

#[tokio::test]
async fn test_failed_rerun_keeps_previous_entry() {
    let fixture = TestFixture::new();
    let write = "MERGE (a:User {name: 'Joe'}) RETURN a";
    fixture
        .executor
        .respond(write, json!([{"a": {"data": {"name": "Joe"}}}]));

    let handle = fixture
        .coordinator
        .execute_query(write, Parameters::new())
        .await
        .unwrap();
    let before = handle.entry().unwrap();

    fixture
        .executor
        .fail(write, ExecutorError::Timeout(Duration::from_secs(30)));
    let err = fixture
        .coordinator
        .execute_query(write, Parameters::new())
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        CacheError::Execution {
            source: ExecutorError::Timeout(_),
            ..
        }
    ));

    assert_eq!(handle.entry().unwrap(), before);
}

#[tokio::test]
async fn test_store_rejection_surfaces_cache_write_error() {
    let fixture = TestFixture::with_config(CacheConfig {
        await_invalidation: true,
        max_entries: Some(1),
        ..CacheConfig::default()
    });

    fixture
        .coordinator
        .execute_query(READ_USERS, Parameters::new())
        .await
        .unwrap();
    let err = fixture
        .coordinator
        .execute_query("MATCH (b:Book) RETURN b", Parameters::new())
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        CacheError::CacheWrite(StoreError::CapacityExceeded { max_entries: 1 })
    ));
}

#[tokio::test]
async fn test_reexecution_with_same_data_only_advances_timestamp() {
    let fixture = TestFixture::new();
    let write = "MATCH (a:User) SET a.seen = true RETURN count(a)";
    fixture.executor.respond(write, json!([{"count(a)": 2}]));

    let handle = fixture
        .coordinator
        .execute_query(write, Parameters::new())
        .await
        .unwrap();
    let first = handle.entry().unwrap();
    assert_eq!(first.data, Some(json!({"count(a)": 2})));

    tokio::time::sleep(Duration::from_millis(5)).await;
    fixture
        .coordinator
        .execute_query(write, Parameters::new())
        .await
        .unwrap();
    let second = handle.entry().unwrap();

    assert_eq!(second.data, first.data);
    assert_eq!(second.sensitivities, first.sensitivities);
    assert!(second.created_at > first.created_at);
}

#[tokio::test]
async fn test_concurrent_identical_misses_share_one_entry() {
    let fixture = TestFixture::new();
    fixture.executor.set_delay(Duration::from_millis(20));
    fixture
        .executor
        .respond(READ_USERS, json!([{"a": {"data": {"name": "Joe"}}}]));

    let (a, b) = tokio::join!(
        fixture.coordinator.execute_query(READ_USERS, Parameters::new()),
        fixture.coordinator.execute_query(READ_USERS, Parameters::new()),
    );
    let (a, b) = (a.unwrap(), b.unwrap());

    assert_eq!(a.uid(), b.uid());
    assert_eq!(a.data(), b.data());
    assert_eq!(fixture.store.len(), 1);
    // No per-uid lock: both calls may reach the engine
    let calls = fixture.executor.calls_for(READ_USERS);
    assert!((1..=2).contains(&calls));
}

#[tokio::test]
async fn test_handle_before_execution_is_empty() {
    let fixture = TestFixture::new();
    let uid = Query::new(READ_USERS).uid();
    let handle = fixture.coordinator.handle(&uid);
    assert!(handle.data().is_none());
    assert!(fixture.coordinator.lookup(&uid).await.unwrap().is_none());
}

#[tokio::test]
async fn test_classify_without_executing() {
    let fixture = TestFixture::new();
    assert_eq!(fixture.coordinator.classify(READ_USERS), QueryKind::Read);
    assert_eq!(
        fixture.coordinator.classify("MATCH (a) DELETE a"),
        QueryKind::Write
    );
    assert_eq!(fixture.executor.total_calls(), 0);
}

#[tokio::test]
async fn test_config_file_rules_are_applied() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("graphcache.json");
    std::fs::write(
        &path,
        r#"{"rules": {"deny": ["delete", "DROP"]}, "await_invalidation": true}"#,
    )
    .unwrap();

    let config = CacheConfig::from_file(&path).unwrap();
    let fixture = TestFixture::with_config(config);

    let err = fixture
        .coordinator
        .execute_query("MATCH (a) DETACH DELETE a", Parameters::new())
        .await
        .unwrap_err();
    assert_eq!(err.denied_keyword(), Some("DELETE"));

    fixture.coordinator.rules().set_allow(["delete"]);
    assert!(fixture
        .coordinator
        .execute_query("MATCH (a) DETACH DELETE a", Parameters::new())
        .await
        .is_ok());
}
