//! Property-based tests for the validation boundary.

use proptest::prelude::*;

use driftcheck::core::types::{BranchRef, Oid};

/// Strategy for strings made only of reference-safe characters.
fn safe_reference() -> impl Strategy<Value = String> {
    proptest::string::string_regex("[A-Za-z0-9._/-]{1,64}").unwrap()
}

proptest! {
    #[test]
    fn safe_references_are_accepted(name in safe_reference()) {
        let r = BranchRef::new(&name).unwrap();
        prop_assert_eq!(r.as_str(), name);
    }

    #[test]
    fn references_with_unsafe_characters_are_rejected(
        prefix in safe_reference(),
        bad in "[^A-Za-z0-9._/-]",
        suffix in safe_reference(),
    ) {
        let name = format!("{prefix}{bad}{suffix}");
        prop_assert!(BranchRef::new(&name).is_err());
    }

    #[test]
    fn origin_stripping_never_panics(name in safe_reference()) {
        let r = BranchRef::new(&name).unwrap();
        let stripped = r.without_origin_prefix();
        prop_assert!(name.ends_with(stripped));
    }

    #[test]
    fn remote_like_iff_slash(name in safe_reference()) {
        let r = BranchRef::new(&name).unwrap();
        prop_assert_eq!(r.is_remote_like(), name.contains('/'));
    }

    #[test]
    fn valid_oids_roundtrip(hex in "[0-9a-f]{40}") {
        let oid = Oid::new(&hex).unwrap();
        prop_assert_eq!(oid.as_str(), hex.as_str());
    }

    #[test]
    fn wrong_length_oids_are_rejected(hex in "[0-9a-f]{1,39}") {
        prop_assert!(Oid::new(&hex).is_err());
    }

    #[test]
    fn short_never_exceeds_the_oid(hex in "[0-9a-f]{40}", len in 0usize..100) {
        let oid = Oid::new(&hex).unwrap();
        prop_assert!(oid.short(len).len() <= 40);
        prop_assert!(oid.as_str().starts_with(oid.short(len)));
    }
}
