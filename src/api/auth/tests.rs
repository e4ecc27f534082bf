use std::sync::Arc;

use super::*;

#[test]
fn test_revocation_lifecycle() {
    let list = RevocationList::new();

    assert!(!list.is_revoked("abc"));

    list.revoke("abc");
    assert!(list.is_revoked("abc"));
    assert!(!list.is_revoked("def"));

    // Revoking twice is a no-op.
    list.revoke("abc".to_string());
    assert!(list.is_revoked("abc"));
}

#[test]
fn test_revocation_is_shared_across_threads() {
    let list = Arc::new(RevocationList::new());

    let handles = (0..8)
        .map(|i| {
            let list = list.clone();
            std::thread::spawn(move || list.revoke(format!("jti-{i}")))
        })
        .collect::<Vec<_>>();

    for handle in handles {
        handle.join().expect("revoking thread panicked");
    }

    for i in 0..8 {
        assert!(list.is_revoked(&format!("jti-{i}")));
    }
}
