use pack_fs::{NormalizedPath, fingerprint_bytes};
use proptest::prelude::*;

proptest! {
    #[test]
    fn fingerprint_is_deterministic(bytes in proptest::collection::vec(any::<u8>(), 0..512)) {
        prop_assert_eq!(fingerprint_bytes(&bytes), fingerprint_bytes(&bytes));
        prop_assert_eq!(fingerprint_bytes(&bytes).as_str().len(), 16);
    }

    #[test]
    fn single_byte_change_changes_fingerprint(
        bytes in proptest::collection::vec(any::<u8>(), 1..512),
        index in any::<prop::sample::Index>(),
        delta in 1u8..=255,
    ) {
        let mut changed = bytes.clone();
        let i = index.index(changed.len());
        changed[i] = changed[i].wrapping_add(delta);
        prop_assert_ne!(fingerprint_bytes(&bytes), fingerprint_bytes(&changed));
    }

    #[test]
    fn normalization_removes_backslashes(s in "\\PC*") {
        let path = NormalizedPath::new(&s);
        prop_assert!(!path.as_str().contains('\\'));
        let roundtripped = NormalizedPath::new(path.to_native());
        prop_assert_eq!(path, roundtripped);
    }
}
