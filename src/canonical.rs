//! Header key canonicalization.

use std::borrow::Cow;

/// Returns the canonical form of a header key.
///
/// Leading and trailing whitespace is trimmed, every interior run of
/// whitespace collapses to a single ASCII space and all other characters are
/// lower-cased. Whitespace follows the Unicode `White_Space` property, so tabs,
/// vertical tabs, carriage returns and non-breaking spaces all count.
/// Lower-casing maps each character to exactly one character, so `"İD"`
/// becomes `"id"`.
///
/// For example, the canonical key for `" User\t  Id  "` is `"user id"`.
///
/// Keys that are already canonical are returned borrowed.
///
/// ```
/// use csvd::canonical_header_key;
///
/// assert_eq!(canonical_header_key(" User\t  Id  "), "user id");
/// assert_eq!(canonical_header_key(" 用户名 "), "用户名");
/// assert_eq!(canonical_header_key(" \r\x0b\t "), "");
/// ```
pub fn canonical_header_key(key: &str) -> Cow<'_, str> {
    let key = key.trim_matches(char::is_whitespace);

    if is_canonical_ascii(key) {
        return Cow::Borrowed(key);
    }

    let mut canonical = String::with_capacity(key.len());
    let mut pending_space = false;

    for c in key.chars() {
        if c.is_whitespace() {
            pending_space = true;
            continue;
        }
        if pending_space {
            canonical.push(' ');
            pending_space = false;
        }
        // one char per char: 'İ' lowers to 'i', not "i\u{307}"
        canonical.extend(c.to_lowercase().next());
    }

    Cow::Owned(canonical)
}

/// Fast path for the common case of an already canonical ASCII key.
/// Expects a trimmed key.
#[inline]
fn is_canonical_ascii(key: &str) -> bool {
    let mut prev_space = false;
    for b in key.bytes() {
        match b {
            b' ' => {
                if prev_space {
                    return false;
                }
                prev_space = true;
            }
            b if !b.is_ascii() || b.is_ascii_uppercase() || b.is_ascii_whitespace() => {
                return false;
            }
            // \x0b is White_Space but not ascii_whitespace
            0x0b => return false,
            _ => prev_space = false,
        }
    }
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_left_space() {
        assert_eq!(canonical_header_key("   \t\x0b\ruser id"), "user id");
    }

    #[test]
    fn test_middle_space() {
        assert_eq!(canonical_header_key("user\r \x0b\tid"), "user id");
    }

    #[test]
    fn test_right_space() {
        assert_eq!(canonical_header_key("user id\r \x0b \t"), "user id");
    }

    #[test]
    fn test_all_spaces() {
        assert_eq!(canonical_header_key(" \r\x0b \x0b\r \t\t    "), "");
        assert_eq!(canonical_header_key(""), "");
    }

    #[test]
    fn test_non_latin_passthrough() {
        assert_eq!(canonical_header_key(" 用户名 "), "用户名");
    }

    #[test]
    fn test_case_folding() {
        assert_eq!(canonical_header_key("User  \tName "), "user name");
        assert_eq!(canonical_header_key("ÄRGER Straße"), "ärger straße");
        assert_eq!(canonical_header_key("ΣΟΦΙΑ"), "σοφια");
    }

    #[test]
    fn test_lowercase_is_one_to_one() {
        assert_eq!(canonical_header_key("İD"), "id");
        assert_eq!(canonical_header_key(" \u{130}stanbul "), "istanbul");
    }

    #[test]
    fn test_unicode_whitespace() {
        // no-break space, em space, ideographic space
        assert_eq!(
            canonical_header_key("\u{a0}first\u{2003}\u{3000}last\u{85}"),
            "first last"
        );
    }

    #[test]
    fn test_borrowed_when_canonical() {
        assert!(matches!(canonical_header_key("user id"), Cow::Borrowed(_)));
        assert!(matches!(canonical_header_key("  user id "), Cow::Borrowed(_)));
        assert!(matches!(canonical_header_key("user  id"), Cow::Owned(_)));
        assert!(matches!(canonical_header_key("User id"), Cow::Owned(_)));
        assert!(matches!(canonical_header_key("user\x0bid"), Cow::Owned(_)));
    }

    #[test]
    fn test_idempotent() {
        for key in ["  A\tB  C ", "用户 名", "\u{130}stanbul", "x\u{2028}Y", ""] {
            let once = canonical_header_key(key).into_owned();
            assert_eq!(canonical_header_key(&once), once);
        }
    }
}
