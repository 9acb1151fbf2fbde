/// Characters that are not allowed in a file or directory name on common filesystems.
const FORBIDDEN: &[char] = &['/', '\\', '*', '?', ':', '"', '<', '>', '|'];

/// Makes a free-text field safe to use as a single path segment.
///
/// Only the forbidden characters are dropped, everything else
/// (case, whitespace, unicode) is kept as is.
pub fn sanitize(text: &str) -> String {
    text.chars().filter(|c| !FORBIDDEN.contains(c)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn removes_all_forbidden_characters() {
        assert_eq!(sanitize(r#"a/b\c*d?e:f"g<h>i|j"#), "abcdefghij");
    }

    #[test]
    fn keeps_case_spacing_and_unicode() {
        assert_eq!(sanitize("  Sigur Rós: Ágætis byrjun "), "  Sigur Rós Ágætis byrjun ");
        assert_eq!(sanitize("AC/DC"), "ACDC");
    }

    #[test]
    fn sanitize_is_idempotent_and_never_grows() {
        let samples = [
            "",
            "plain title",
            "What's Up? (Remix)",
            "<<>>||**",
            r#"C:\Users\me\"quoted""#,
            "日本語/タイトル",
        ];

        for s in samples {
            let once = sanitize(s);
            assert_eq!(sanitize(&once), once);
            assert!(once.len() <= s.len());
            assert!(!once.chars().any(|c| FORBIDDEN.contains(&c)));
        }
    }
}
