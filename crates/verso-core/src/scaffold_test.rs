use super::*;
use std::fs;
use tempfile::tempdir;

fn date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 3, 5).unwrap()
}

#[test]
fn test_create_first_migration() {
    let dir = tempdir().unwrap();
    let root = dir.path().join("migrations");

    let created = create_migration(&root, "create_users", date()).unwrap();

    assert_eq!(created.version, Version::new(1));
    assert_eq!(
        created.path,
        root.join("2024").join("March").join("5").join("1_create_users.sql")
    );
    let text = fs::read_to_string(&created.path).unwrap();
    let body = format::decode(&text);
    assert_eq!(body.up, TEMPLATE_UP);
    assert_eq!(body.down, TEMPLATE_DOWN);
}

#[test]
fn test_create_takes_next_version() {
    let dir = tempdir().unwrap();
    let root = dir.path();
    fs::create_dir_all(root.join("old")).unwrap();
    fs::write(root.join("old").join("41_a.sql"), "--up\nSELECT 1;\n--down\nSELECT 1;").unwrap();
    fs::write(root.join("7_b.sql"), "--up\nSELECT 1;\n--down\nSELECT 1;").unwrap();

    let created = create_migration(root, "next", date()).unwrap();
    assert_eq!(created.version, Version::new(42));
    assert!(created.path.ends_with("42_next.sql"));
}

#[test]
fn test_created_file_loads_and_validates() {
    let dir = tempdir().unwrap();
    create_migration(dir.path(), "first", date()).unwrap();
    create_migration(dir.path(), "second", date()).unwrap();

    let migrations = DirectorySource::new(dir.path()).load().unwrap();
    assert_eq!(migrations.len(), 2);
    assert!(crate::validate::validate_migrations(&migrations).is_ok());
}

#[test]
fn test_create_rejects_bad_names() {
    let dir = tempdir().unwrap();
    for name in ["", "../escape", "a/b", ".hidden", "-flag", "two words"] {
        let err = create_migration(dir.path(), name, date()).unwrap_err();
        assert!(
            matches!(err, CoreError::InvalidMigrationName { .. }),
            "name {name:?} should be rejected"
        );
    }
}

#[test]
fn test_create_after_highest_version_fails() {
    let body = "--up\nSELECT 1;\n--down\nSELECT 1;";
    for latest in [u64::MAX, i64::MAX as u64] {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join(format!("{latest}_top.sql")), body).unwrap();

        let err = create_migration(dir.path(), "next", date()).unwrap_err();
        match err {
            CoreError::VersionsExhausted { latest: found } => {
                assert_eq!(found, Version::new(latest))
            }
            other => panic!("expected VersionsExhausted, got {other:?}"),
        }
        // Nothing was written besides the existing file
        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 1);
    }
}

#[test]
fn test_create_just_below_highest_version() {
    let dir = tempdir().unwrap();
    let below = i64::MAX as u64 - 1;
    fs::write(
        dir.path().join(format!("{below}_almost.sql")),
        "--up\nSELECT 1;\n--down\nSELECT 1;",
    )
    .unwrap();

    let created = create_migration(dir.path(), "last", date()).unwrap();
    assert_eq!(created.version, Version::MAX);
}
