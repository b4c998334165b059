//! Property tests for `--watch CONNECTION/PATTERN` parsing.

use proptest::prelude::*;

use indirector::companion::parse_watch;

fn ident() -> impl Strategy<Value = String> {
    proptest::string::string_regex("[a-z][a-z0-9_]{0,15}").unwrap()
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 64,
        .. ProptestConfig::default()
    })]

    /// PROPERTY: Parsing never panics, whatever the argument.
    #[test]
    fn property_parse_watch_never_panics(spec in ".{0,40}") {
        let _ = parse_watch(&spec);
    }

    /// PROPERTY: A prefix pattern matches exactly the names starting with it.
    #[test]
    fn property_prefix_pattern_matches_extensions(
        connection in ident(),
        prefix in ident(),
        rest in ident(),
    ) {
        let watch = parse_watch(&format!("{}/{}*", connection, prefix)).unwrap();
        prop_assert_eq!(&watch.connection, &connection);
        let extended = format!("{}{}", prefix, rest);
        let unrelated = format!("x{}", prefix);
        prop_assert!(watch.matcher.matches(&prefix));
        prop_assert!(watch.matcher.matches(&extended));
        prop_assert!(!watch.matcher.matches(&unrelated));
    }

    /// PROPERTY: A bare name only matches itself.
    #[test]
    fn property_exact_pattern_matches_only_itself(
        connection in ident(),
        name in ident(),
        suffix in ident(),
    ) {
        let watch = parse_watch(&format!("{}/{}", connection, name)).unwrap();
        let longer = format!("{}{}", name, suffix);
        prop_assert!(watch.matcher.matches(&name));
        prop_assert!(!watch.matcher.matches(&longer));
    }
}
