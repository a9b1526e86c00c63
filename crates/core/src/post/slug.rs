//! Slug generation for post URLs.

/// Derives a URL-friendly slug from a post title.
///
/// Lowercases, collapses every run of non-alphanumeric characters into a
/// single hyphen, and trims hyphens from both ends. Titles with no
/// alphanumeric content fall back to `post`.
#[must_use]
pub fn generate_slug(title: &str) -> String {
    let mut slug = String::with_capacity(title.len());
    let mut last_was_hyphen = true; // suppress a leading hyphen

    for c in title.chars() {
        if c.is_ascii_alphanumeric() {
            slug.push(c.to_ascii_lowercase());
            last_was_hyphen = false;
        } else if !last_was_hyphen {
            slug.push('-');
            last_was_hyphen = true;
        }
    }

    while slug.ends_with('-') {
        slug.pop();
    }

    if slug.is_empty() {
        "post".to_string()
    } else {
        slug
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("Hello World", "hello-world")]
    #[case("  Spaces  everywhere  ", "spaces-everywhere")]
    #[case("Rust & Axum: a love story!", "rust-axum-a-love-story")]
    #[case("already-a-slug", "already-a-slug")]
    #[case("MiXeD CaSe 123", "mixed-case-123")]
    #[case("...", "post")]
    #[case("", "post")]
    fn test_generate_slug(#[case] title: &str, #[case] expected: &str) {
        assert_eq!(generate_slug(title), expected);
    }

    #[test]
    fn test_slug_is_idempotent() {
        let once = generate_slug("A Post, Revisited");
        assert_eq!(generate_slug(&once), once);
    }
}

#[cfg(test)]
mod property_tests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn prop_slug_is_url_safe(title in ".{0,80}") {
            let slug = generate_slug(&title);
            prop_assert!(!slug.is_empty());
            prop_assert!(!slug.starts_with('-'));
            prop_assert!(!slug.ends_with('-'));
            for c in slug.chars() {
                prop_assert!(c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-');
            }
        }
    }

    proptest! {
        #[test]
        fn prop_slug_is_idempotent(title in ".{0,80}") {
            let once = generate_slug(&title);
            prop_assert_eq!(generate_slug(&once), once);
        }
    }
}
