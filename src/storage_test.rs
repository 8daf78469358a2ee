use super::*;

#[test]
fn memory_storage_missing_key_is_none() {
    let s = MemoryStorage::new();
    assert_eq!(s.get_item("k"), Ok(None));
    assert_eq!(s.writes(), 0);
}

#[test]
fn memory_storage_set_then_get() {
    let mut s = MemoryStorage::new();
    s.set_item("k", "v1").unwrap();
    s.set_item("k", "v2").unwrap();
    assert_eq!(s.get_item("k"), Ok(Some("v2".to_owned())));
    assert_eq!(s.get("k"), Some("v2"));
    assert_eq!(s.writes(), 2);
}

#[test]
fn memory_storage_seed_is_not_a_write() {
    let s = MemoryStorage::with_item("k", "seeded");
    assert_eq!(s.get("k"), Some("seeded"));
    assert_eq!(s.writes(), 0);
}

#[test]
fn boxed_storage_delegates() {
    let mut s: Box<dyn Storage> = Box::new(MemoryStorage::new());
    s.set_item("k", "v").unwrap();
    assert_eq!(s.get_item("k"), Ok(Some("v".to_owned())));
}

#[test]
fn storage_error_messages() {
    assert_eq!(StorageError::Unavailable.to_string(), "storage is unavailable");
    assert_eq!(
        StorageError::Backend("QuotaExceededError".into()).to_string(),
        "storage backend rejected the operation: QuotaExceededError"
    );
}
