use super::*;

#[test]
fn test_from_parts_all_names() {
    for name in Command::NAMES {
        let target = name.ends_with("-to").then_some(Version::new(3));
        let cmd = Command::from_parts(name, target).unwrap();
        assert_eq!(cmd.name(), name);
        assert_eq!(cmd.target(), target);
    }
}

#[test]
fn test_from_parts_targets() {
    assert_eq!(
        Command::from_parts("up-to", Some(Version::new(5))).unwrap(),
        Command::UpTo(Version::new(5))
    );
    assert_eq!(
        Command::from_parts("down-to", Some(Version::new(2))).unwrap(),
        Command::DownTo(Version::new(2))
    );
}

#[test]
fn test_from_parts_unexpected_target() {
    for name in ["up", "up-one", "down", "reset"] {
        let err = Command::from_parts(name, Some(Version::new(9))).unwrap_err();
        match err {
            CoreError::UnexpectedTarget { command, target } => {
                assert_eq!(command, name);
                assert_eq!(target, Version::new(9));
            }
            other => panic!("expected UnexpectedTarget for {name}, got {other:?}"),
        }
    }
}

#[test]
fn test_from_parts_missing_target() {
    let err = Command::from_parts("up-to", None).unwrap_err();
    assert!(matches!(err, CoreError::MissingTarget { ref command } if command == "up-to"));
}

#[test]
fn test_from_parts_unknown_command() {
    let err = Command::from_parts("sideways", None).unwrap_err();
    match err {
        CoreError::UnknownCommand { name, valid } => {
            assert_eq!(name, "sideways");
            assert!(valid.contains("up-one"));
        }
        other => panic!("expected UnknownCommand, got {other:?}"),
    }
}

#[test]
fn test_direction() {
    assert_eq!(Command::Up.direction(), Direction::Up);
    assert_eq!(Command::UpOne.direction(), Direction::Up);
    assert_eq!(Command::UpTo(Version::new(1)).direction(), Direction::Up);
    assert_eq!(Command::Down.direction(), Direction::Down);
    assert_eq!(Command::DownTo(Version::new(1)).direction(), Direction::Down);
    assert_eq!(Command::Reset.direction(), Direction::Down);
}

#[test]
fn test_display() {
    assert_eq!(Command::UpTo(Version::new(4)).to_string(), "up-to 4");
    assert_eq!(Command::Reset.to_string(), "reset");
}
