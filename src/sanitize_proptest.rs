//! Property-based tests for secret redaction.
//!
//! These tests use proptest to generate random text and token-shaped secrets
//! and verify that no secret survives sanitization.

#[cfg(test)]
mod proptest_tests {
    use crate::models::Repository;
    use crate::sanitize::{redact_clone_url, Sanitizer, REDACTED};
    use proptest::prelude::*;

    fn token() -> impl Strategy<Value = String> {
        "ghs_[A-Za-z0-9]{8,36}"
    }

    proptest! {
        /// Property: a registered secret never appears in sanitized output
        #[test]
        fn sanitize_never_contains_secret(
            prefix in ".*",
            suffix in ".*",
            secret in token(),
            repeats in 1usize..4,
        ) {
            let text = format!("{}{}", prefix, format!("{}{}", secret, suffix).repeat(repeats));
            let sanitized = Sanitizer::new().with_secret(secret.clone()).sanitize(&text);
            prop_assert!(
                !sanitized.contains(&secret),
                "secret {:?} survived in {:?}",
                secret,
                sanitized
            );
        }

        /// Property: sanitizing twice gives the same result as sanitizing once
        #[test]
        fn sanitize_is_idempotent(text in ".*", secret in token()) {
            let sanitizer = Sanitizer::new().with_secret(secret);
            let once = sanitizer.sanitize(&text);
            let twice = sanitizer.sanitize(&once);
            prop_assert_eq!(once, twice);
        }

        /// Property: text without the secret passes through untouched
        #[test]
        fn sanitize_leaves_clean_text_alone(text in "[a-z ]*", secret in token()) {
            let sanitized = Sanitizer::new().with_secret(secret).sanitize(&text);
            prop_assert_eq!(sanitized, text);
        }

        /// Property: the token injected into a clone URL is stripped by the
        /// sanitizer built from that repository
        #[test]
        fn authenticated_repo_secret_is_sanitized(
            owner in "[a-z][a-z0-9-]{0,15}",
            name in "[a-z][a-z0-9-]{0,15}",
            secret in token(),
        ) {
            let repo = Repository::github("github.com", &format!("{}/{}", owner, name))
                .unwrap()
                .with_token(&secret);
            let sanitizer = Sanitizer::for_repos(&repo, &repo);
            let sanitized = sanitizer.sanitize(&format!("git clone {}", repo.clone_url));
            prop_assert!(!sanitized.contains(&secret));
            prop_assert!(!repo.sanitized_clone_url.contains(&secret));
            prop_assert!(sanitized.contains(REDACTED));
        }

        /// Property: redacting a URL never keeps its password
        #[test]
        fn redact_clone_url_drops_password(
            user in "[a-z-]{0,12}",
            secret in token(),
            path in "[a-z/]{0,20}",
        ) {
            let url = format!("https://{}:{}@github.com/{}", user, secret, path);
            let redacted = redact_clone_url(&url);
            prop_assert!(!redacted.contains(&secret));
            prop_assert_eq!(redact_clone_url(&redacted), redacted.clone());
        }
    }
}
