use super::*;
use std::fs;
use tempfile::tempdir;

const USERS_SQL: &str = "--up\nCREATE TABLE users (id INTEGER);\n\n--down\nDROP TABLE users;\n";
const ORDERS_SQL: &str = "--up\nCREATE TABLE orders (id INTEGER);\n\n--down\nDROP TABLE orders;\n";

#[test]
fn test_parse_file_name() {
    assert_eq!(
        parse_file_name("12_add_orders.sql").unwrap(),
        (Version::new(12), Some("add_orders".to_string()))
    );
    assert_eq!(parse_file_name("7.sql").unwrap(), (Version::new(7), None));
    assert_eq!(parse_file_name("3_").unwrap(), (Version::new(3), None));
}

#[test]
fn test_parse_file_name_rejects_non_numeric_prefix() {
    assert!(parse_file_name("users.sql").is_err());
    assert!(parse_file_name("_users.sql").is_err());
    assert!(parse_file_name("v1_users.sql").is_err());
    assert!(parse_file_name("99999999999999999999999_big.sql").is_err());
}

#[test]
fn test_directory_source_walks_recursively() {
    let dir = tempdir().unwrap();
    let nested = dir.path().join("2024").join("March").join("5");
    fs::create_dir_all(&nested).unwrap();
    fs::write(dir.path().join("1_users.sql"), USERS_SQL).unwrap();
    fs::write(nested.join("2_orders.sql"), ORDERS_SQL).unwrap();
    fs::write(dir.path().join("README.md"), "not a migration").unwrap();

    let mut migrations = DirectorySource::new(dir.path()).load().unwrap();
    migrations.sort_by_key(|m| m.version);

    assert_eq!(migrations.len(), 2);
    assert_eq!(migrations[0].version, Version::new(1));
    assert_eq!(migrations[0].name.as_deref(), Some("users"));
    assert_eq!(migrations[0].up, "CREATE TABLE users (id INTEGER);");
    assert_eq!(migrations[1].version, Version::new(2));
    assert_eq!(migrations[1].down, "DROP TABLE orders;");
}

#[test]
fn test_directory_source_missing_dir() {
    let dir = tempdir().unwrap();
    let err = DirectorySource::new(dir.path().join("nope"))
        .load()
        .unwrap_err();
    assert!(matches!(err, CoreError::MigrationsDirNotFound { .. }));
}

#[test]
fn test_directory_source_bad_file_name() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("users.sql"), USERS_SQL).unwrap();

    let err = DirectorySource::new(dir.path()).load().unwrap_err();
    match err {
        CoreError::InvalidFileName { path, .. } => assert!(path.ends_with("users.sql")),
        other => panic!("expected InvalidFileName, got {other:?}"),
    }
}

#[test]
fn test_directory_source_keeps_invalid_records_for_validation() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("1_empty.sql"), "--up\n--down\n").unwrap();

    let migrations = DirectorySource::new(dir.path()).load().unwrap();
    assert_eq!(migrations.len(), 1);
    assert!(migrations[0].up.is_empty());
}

static EMBEDDED: &[(&str, &str)] = &[("2_orders.sql", ORDERS_SQL), ("1_users.sql", USERS_SQL)];

#[test]
fn test_static_source_matches_directory_source() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("1_users.sql"), USERS_SQL).unwrap();
    fs::write(dir.path().join("2_orders.sql"), ORDERS_SQL).unwrap();

    let mut from_dir = DirectorySource::new(dir.path()).load().unwrap();
    let mut from_static = StaticSource::new(EMBEDDED).load().unwrap();
    from_dir.sort_by_key(|m| m.version);
    from_static.sort_by_key(|m| m.version);

    assert_eq!(from_dir, from_static);
}

#[test]
fn test_vec_source() {
    let set = vec![Migration::new(1, "SELECT 1", "SELECT 1")];
    assert_eq!(set.load().unwrap(), set);
}
