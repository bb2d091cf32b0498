use super::*;
use tempfile::tempdir;

#[tokio::test]
async fn test_in_memory() {
    let db = DuckDbBackend::in_memory().unwrap();
    assert_eq!(db.db_type(), "duckdb");
    assert_eq!(db.ledger_table(), DEFAULT_LEDGER_TABLE);
}

#[tokio::test]
async fn test_execute_batch() {
    let db = DuckDbBackend::in_memory().unwrap();
    db.execute_batch("CREATE TABLE t1 (id INT); CREATE TABLE t2 (id INT); INSERT INTO t1 VALUES (1);")
        .await
        .unwrap();

    assert!(db.relation_exists("t1").await.unwrap());
    assert!(db.relation_exists("t2").await.unwrap());
    assert!(!db.relation_exists("nonexistent").await.unwrap());
}

#[tokio::test]
async fn test_execute_batch_error() {
    let db = DuckDbBackend::in_memory().unwrap();
    let err = db.execute_batch("CREATE TABLE (").await.unwrap_err();
    assert!(matches!(err, DbError::ExecutionError(_)));
}

#[tokio::test]
async fn test_empty_ledger_is_version_zero() {
    let db = DuckDbBackend::in_memory().unwrap();
    assert!(!db.relation_exists("migration").await.unwrap());

    assert_eq!(db.current_version().await.unwrap(), Version::NONE);

    // The ledger table is created on first use
    assert!(db.relation_exists("migration").await.unwrap());
    assert!(db.applied_versions().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_current_version_is_max() {
    let db = DuckDbBackend::in_memory().unwrap();
    db.record_applied(Version::new(3)).await.unwrap();
    db.record_applied(Version::new(1)).await.unwrap();
    db.record_applied(Version::new(2)).await.unwrap();

    assert_eq!(db.current_version().await.unwrap(), Version::new(3));

    let versions: Vec<Version> = db
        .applied_versions()
        .await
        .unwrap()
        .into_iter()
        .map(|e| e.version)
        .collect();
    assert_eq!(
        versions,
        vec![Version::new(1), Version::new(2), Version::new(3)]
    );
}

#[tokio::test]
async fn test_record_reverted() {
    let db = DuckDbBackend::in_memory().unwrap();
    db.record_applied(Version::new(1)).await.unwrap();
    db.record_applied(Version::new(2)).await.unwrap();

    db.record_reverted(Version::new(2)).await.unwrap();
    assert_eq!(db.current_version().await.unwrap(), Version::new(1));

    // Removing an absent entry is tolerated
    db.record_reverted(Version::new(9)).await.unwrap();
    assert_eq!(db.current_version().await.unwrap(), Version::new(1));
}

#[tokio::test]
async fn test_duplicate_entry_rejected() {
    let db = DuckDbBackend::in_memory().unwrap();
    db.record_applied(Version::new(1)).await.unwrap();
    let err = db.record_applied(Version::new(1)).await.unwrap_err();
    assert!(matches!(err, DbError::LedgerError(_)));
}

#[tokio::test]
async fn test_version_out_of_bigint_range() {
    let db = DuckDbBackend::in_memory().unwrap();
    let err = db
        .record_applied(Version::new(u64::MAX))
        .await
        .unwrap_err();
    assert!(matches!(err, DbError::LedgerError(_)));
}

#[tokio::test]
async fn test_applied_at_is_recent() {
    let db = DuckDbBackend::in_memory().unwrap();
    db.record_applied(Version::new(1)).await.unwrap();

    let entries = db.applied_versions().await.unwrap();
    let age = chrono::Utc::now() - entries[0].applied_at;
    assert!(age.num_hours().abs() < 24);
}

#[tokio::test]
async fn test_schema_qualified_ledger_table() {
    let db = DuckDbBackend::in_memory()
        .unwrap()
        .with_ledger_table("meta.schema_versions")
        .unwrap();

    db.record_applied(Version::new(5)).await.unwrap();
    assert!(db.relation_exists("meta.schema_versions").await.unwrap());
    assert!(!db.relation_exists("migration").await.unwrap());
    assert_eq!(db.current_version().await.unwrap(), Version::new(5));
}

#[tokio::test]
async fn test_invalid_ledger_table_rejected() {
    let result = DuckDbBackend::in_memory()
        .unwrap()
        .with_ledger_table("migration; DROP TABLE users");
    assert!(matches!(result, Err(DbError::InvalidTableName(_))));
}

#[tokio::test]
async fn test_rollback_discards_schema_and_ledger_changes() {
    let db = DuckDbBackend::in_memory().unwrap();
    db.record_applied(Version::new(1)).await.unwrap();

    db.begin().await.unwrap();
    db.execute_batch("CREATE TABLE users (id INTEGER)").await.unwrap();
    db.record_applied(Version::new(2)).await.unwrap();
    assert_eq!(db.current_version().await.unwrap(), Version::new(2));
    db.rollback().await.unwrap();

    assert!(!db.relation_exists("users").await.unwrap());
    assert_eq!(db.current_version().await.unwrap(), Version::new(1));
}

#[tokio::test]
async fn test_commit_keeps_changes() {
    let db = DuckDbBackend::in_memory().unwrap();

    db.begin().await.unwrap();
    db.execute_batch("CREATE TABLE users (id INTEGER)").await.unwrap();
    db.record_applied(Version::new(1)).await.unwrap();
    db.commit().await.unwrap();

    assert!(db.relation_exists("users").await.unwrap());
    assert_eq!(db.current_version().await.unwrap(), Version::new(1));
}

#[tokio::test]
async fn test_commit_without_transaction_fails() {
    let db = DuckDbBackend::in_memory().unwrap();
    let err = db.commit().await.unwrap_err();
    assert!(matches!(err, DbError::TransactionError(_)));
}

#[tokio::test]
async fn test_ledger_persists_across_connections() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("app.duckdb");

    {
        let db = DuckDbBackend::from_path(&path).unwrap();
        db.record_applied(Version::new(4)).await.unwrap();
    }

    let db = DuckDbBackend::new(path.to_str().unwrap()).unwrap();
    assert_eq!(db.current_version().await.unwrap(), Version::new(4));
}
