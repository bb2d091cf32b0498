use super::*;
use std::fs;
use tempfile::tempdir;

#[test]
fn test_parse_minimal_config() {
    let config: Config = serde_yaml::from_str("{}").unwrap();
    assert_eq!(config.migrations_dir, "migrations");
    assert_eq!(config.database.path, ":memory:");
    assert_eq!(config.ledger.table, DEFAULT_LEDGER_TABLE);
    assert!(config.timeout().is_none());

    let root = PathBuf::from("/tmp/project");
    assert_eq!(
        config.migrations_dir_absolute(&root),
        root.join("migrations")
    );
}

#[test]
fn test_parse_full_config() {
    let yaml = r#"
migrations_dir: db/migrations
database:
  path: "./app.duckdb"
ledger:
  table: meta.schema_migrations
timeout_secs: 30
"#;
    let config: Config = serde_yaml::from_str(yaml).unwrap();
    config.validate().unwrap();
    assert_eq!(config.migrations_dir, "db/migrations");
    assert_eq!(config.database.path, "./app.duckdb");
    assert_eq!(config.ledger.table, "meta.schema_migrations");
    assert_eq!(config.timeout(), Some(Duration::from_secs(30)));
}

#[test]
fn test_unknown_field_rejected() {
    let result: Result<Config, _> = serde_yaml::from_str("migration_dir: typo");
    assert!(result.is_err());
}

#[test]
fn test_table_name_validation() {
    assert!(is_valid_table_name("migration"));
    assert!(is_valid_table_name("_ledger2"));
    assert!(is_valid_table_name("meta.ledger"));
    assert!(!is_valid_table_name(""));
    assert!(!is_valid_table_name("2fast"));
    assert!(!is_valid_table_name("a.b.c"));
    assert!(!is_valid_table_name("ledger; DROP TABLE users"));
    assert!(!is_valid_table_name("meta."));
}

#[test]
fn test_validate_rejects_bad_values() {
    let mut config = Config::default();
    config.ledger.table = "bad name".to_string();
    assert!(matches!(
        config.validate(),
        Err(CoreError::ConfigInvalid { .. })
    ));

    let mut config = Config::default();
    config.timeout_secs = Some(0);
    assert!(matches!(
        config.validate(),
        Err(CoreError::ConfigInvalid { .. })
    ));

    let mut config = Config::default();
    config.migrations_dir = "  ".to_string();
    assert!(matches!(
        config.validate(),
        Err(CoreError::ConfigInvalid { .. })
    ));
}

#[test]
fn test_load_from_dir_prefers_yml() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("verso.yml"), "migrations_dir: from_yml\n").unwrap();
    fs::write(dir.path().join("verso.yaml"), "migrations_dir: from_yaml\n").unwrap();

    let config = Config::load_from_dir(dir.path()).unwrap();
    assert_eq!(config.migrations_dir, "from_yml");
}

#[test]
fn test_load_from_dir_without_file_uses_defaults() {
    let dir = tempdir().unwrap();
    let config = Config::load_from_dir(dir.path()).unwrap();
    assert_eq!(config.migrations_dir, "migrations");
}

#[test]
fn test_load_missing_file() {
    let dir = tempdir().unwrap();
    let err = Config::load(&dir.path().join("absent.yml")).unwrap_err();
    assert!(matches!(err, CoreError::ConfigNotFound { .. }));
}

#[test]
fn test_load_invalid_yaml() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("verso.yml");
    fs::write(&path, "database: [not, a, map]\n").unwrap();
    assert!(matches!(
        Config::load(&path),
        Err(CoreError::YamlParse(_))
    ));
}
