//! Title → filename stem.
//!
//! Drops characters that are illegal in Windows/Linux filenames, rejects reserved
//! device names, and bounds the length so `title + extension` fits common filesystems.

use uuid::Uuid;

/// Characters removed from titles. Dropped, not replaced.
const FORBIDDEN_CHARS: &[char] = &['<', '>', ':', '"', '/', '\\', '|', '?', '*'];

/// Windows reserved device names (compared against the upper-cased title).
const RESERVED_NAMES: &[&str] = &[
    "CON", "PRN", "AUX", "NUL", "COM1", "COM2", "COM3", "COM4", "COM5", "COM6", "COM7", "COM8",
    "COM9", "LPT1", "LPT2", "LPT3", "LPT4", "LPT5", "LPT6", "LPT7", "LPT8", "LPT9",
];

/// Max stem length in characters (not bytes, not graphemes).
pub const MAX_TITLE_CHARS: usize = 240;

pub const FALLBACK_PREFIX: &str = "random title ";

/// Sanitize a raw display title into a filesystem-safe, non-empty stem.
pub fn sanitize_title(raw: &str) -> String {
    sanitize_title_with(raw, Uuid::new_v4)
}

/// Same as [`sanitize_title`], with the fallback id source injected.
pub fn sanitize_title_with(raw: &str, fallback_id: impl FnOnce() -> Uuid) -> String {
    let stripped: String = raw.chars().filter(|c| !FORBIDDEN_CHARS.contains(c)).collect();
    let trimmed = stripped.trim();

    let title = if trimmed.is_empty() || is_reserved_name(trimmed) {
        format!("{}{}", FALLBACK_PREFIX, fallback_id().hyphenated())
    } else {
        trimmed.to_string()
    };

    truncate_chars(title, MAX_TITLE_CHARS)
}

fn is_reserved_name(title: &str) -> bool {
    let upper = title.to_uppercase();
    RESERVED_NAMES.contains(&upper.as_str())
}

fn truncate_chars(s: String, max: usize) -> String {
    match s.char_indices().nth(max) {
        Some((byte_idx, _)) => s[..byte_idx].to_string(),
        None => s,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_fallback(out: &str) {
        let id = out
            .strip_prefix(FALLBACK_PREFIX)
            .unwrap_or_else(|| panic!("expected fallback title, got {out:?}"));
        assert_eq!(id.len(), 36);
        assert!(Uuid::parse_str(id).is_ok());
    }

    #[test]
    fn removes_forbidden_characters_without_substitution() {
        assert_eq!(sanitize_title("AC/DC: live?"), "ACDC live");
        assert_eq!(sanitize_title(r#"a<b>c"d\e|f*g"#), "abcdefg");
    }

    #[test]
    fn trims_surrounding_whitespace() {
        assert_eq!(sanitize_title("  sunset over the bay \t"), "sunset over the bay");
    }

    #[test]
    fn only_forbidden_chars_yields_fallback() {
        assert_fallback(&sanitize_title("<<>>"));
        assert_fallback(&sanitize_title(" ? * | "));
        assert_fallback(&sanitize_title(""));
    }

    #[test]
    fn reserved_names_yield_fallback_in_any_case() {
        for name in ["CON", "con", "Con", "nul", "COM9", "lpt1", "LPT9"] {
            assert_fallback(&sanitize_title(name));
        }
    }

    #[test]
    fn reserved_name_detected_after_stripping() {
        assert_fallback(&sanitize_title("  A:U:X  "));
    }

    #[test]
    fn reserved_name_as_part_of_title_is_kept() {
        assert_eq!(sanitize_title("CON artist"), "CON artist");
        assert_eq!(sanitize_title("COM10"), "COM10");
    }

    #[test]
    fn fallback_uses_injected_id() {
        let id = Uuid::nil();
        assert_eq!(
            sanitize_title_with("", || id),
            "random title 00000000-0000-0000-0000-000000000000"
        );
    }

    #[test]
    fn long_titles_truncate_to_prefix() {
        let input: String = "abcde".repeat(100);
        let out = sanitize_title(&input);
        assert_eq!(out.chars().count(), MAX_TITLE_CHARS);
        assert_eq!(out, &input[..MAX_TITLE_CHARS]);
    }

    #[test]
    fn truncation_counts_chars_not_bytes() {
        let input: String = "é".repeat(300);
        let out = sanitize_title(&input);
        assert_eq!(out.chars().count(), MAX_TITLE_CHARS);
        assert!(out.chars().all(|c| c == 'é'));
    }

    #[test]
    fn idempotent_on_clean_titles() {
        for s in ["hello world", "a.b.c", "Sunset (1080p) [OC]"] {
            let once = sanitize_title(s);
            assert_eq!(sanitize_title(&once), once);
        }
    }
}
