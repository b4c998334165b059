//! Property tests for Tailscale login output classification.

use proptest::prelude::*;

use indirector::domain::services::{classify_login_output, extract_login_url, TailscaleState};

fn filler() -> impl Strategy<Value = String> {
    // No `https://login` inside the noise, so the only URL is the one we place.
    proptest::string::string_regex("[A-Za-z0-9 ,.:\n\t]{0,60}").unwrap()
}

fn token() -> impl Strategy<Value = String> {
    proptest::string::string_regex("[A-Za-z0-9]{1,16}").unwrap()
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 96,
        .. ProptestConfig::default()
    })]

    /// PROPERTY: An embedded login URL is extracted exactly, up to the next whitespace.
    #[test]
    fn property_login_url_is_extracted(
        before in filler(),
        id in token(),
        after in filler(),
    ) {
        let url = format!("https://login.tailscale.com/a/{}", id);
        let output = format!("{} {}\n{}", before, url, after);

        prop_assert_eq!(extract_login_url(&output), Some(url.as_str()));
        prop_assert_eq!(
            classify_login_output(&output),
            TailscaleState::AwaitingAuth { url: url.clone() }
        );
    }

    /// PROPERTY: Output without the login prefix is never mistaken for a URL.
    #[test]
    fn property_no_prefix_means_unexpected_output(output in filler()) {
        prop_assert_eq!(extract_login_url(&output), None);
        let classified = classify_login_output(&output);
        prop_assert!(
            matches!(classified, TailscaleState::UnexpectedOutput { .. }),
            "got {:?}",
            classified
        );
    }
}
