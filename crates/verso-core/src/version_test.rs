use super::*;

#[test]
fn test_usable_range() {
    assert!(!Version::NONE.is_usable());
    assert!(Version::new(1).is_usable());
    assert!(Version::MAX.is_usable());
    assert!(!Version::new(Version::MAX.get() + 1).is_usable());
}

#[test]
fn test_next() {
    assert_eq!(Version::NONE.next(), Some(Version::new(1)));
    assert_eq!(Version::new(41).next(), Some(Version::new(42)));
    assert_eq!(Version::MAX.next(), None);
    assert_eq!(Version::new(u64::MAX).next(), None);
}

#[test]
fn test_from_str_trims() {
    assert_eq!(" 7 ".parse::<Version>().unwrap(), Version::new(7));
    assert!("seven".parse::<Version>().is_err());
}
