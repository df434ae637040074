//! URL scheme checks for `href`/`src` attribute values.
//!
//! This is a deny-list: only the configured schemes are rejected, and any
//! other scheme (including ones a browser may treat as active content) is
//! let through. It is narrower than the tag allow-list by necessity since
//! URLs are open-ended.

/// Schemes rejected by default.
pub const DEFAULT_BLOCKED_SCHEMES: [&str; 3] = ["javascript:", "vbscript:", "data:text/html"];

/// Check whether `value` starts with one of `blocked_schemes`.
///
/// Comparison is ASCII case-insensitive. Whitespace and control characters
/// are ignored and numeric character references (`&#106;`, `&#x6A;`) plus
/// `&colon;`/`&tab;`/`&newline;` are decoded first, since browsers do the
/// same before resolving the URL.
pub fn has_blocked_scheme<S: AsRef<str>>(value: &str, blocked_schemes: &[S]) -> bool {
    let normalized: String = decode_char_refs(value)
        .chars()
        .filter(|c| !c.is_whitespace() && !c.is_control())
        .flat_map(char::to_lowercase)
        .collect();

    blocked_schemes.iter().any(|scheme| {
        let scheme = scheme.as_ref().trim().to_ascii_lowercase();
        !scheme.is_empty() && normalized.starts_with(&scheme)
    })
}

/// Decode the character references that can hide a scheme.
fn decode_char_refs(value: &str) -> String {
    if !value.contains('&') {
        return value.to_string();
    }

    let mut decoded = String::with_capacity(value.len());
    let mut rest = value;
    while let Some(amp) = rest.find('&') {
        decoded.push_str(&rest[..amp]);
        rest = &rest[amp..];
        match decode_one(rest) {
            Some((ch, consumed)) => {
                decoded.push(ch);
                rest = &rest[consumed..];
            }
            None => {
                decoded.push('&');
                rest = &rest[1..];
            }
        }
    }
    decoded.push_str(rest);
    decoded
}

/// Decode one reference at the start of `input` (which begins with `&`).
///
/// Returns the character and the number of bytes consumed.
fn decode_one(input: &str) -> Option<(char, usize)> {
    const NAMED: [(&str, char); 3] = [("&colon;", ':'), ("&tab;", '\t'), ("&newline;", '\n')];
    for (name, ch) in NAMED {
        if input
            .get(..name.len())
            .is_some_and(|prefix| prefix.eq_ignore_ascii_case(name))
        {
            return Some((ch, name.len()));
        }
    }

    let body = input.strip_prefix("&#")?;
    let (radix, digits_start) = match body.as_bytes().first() {
        Some(b'x' | b'X') => (16, 3),
        _ => (10, 2),
    };
    let digits: &str = &input[digits_start..];
    let len = digits
        .bytes()
        .take_while(|b| match radix {
            16 => b.is_ascii_hexdigit(),
            _ => b.is_ascii_digit(),
        })
        .count();
    if len == 0 {
        return None;
    }
    let code = u32::from_str_radix(&digits[..len], radix).ok()?;
    let ch = char::from_u32(code)?;
    let mut consumed = digits_start + len;
    if input[consumed..].starts_with(';') {
        consumed += 1;
    }
    Some((ch, consumed))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn blocked(value: &str) -> bool {
        has_blocked_scheme(value, &DEFAULT_BLOCKED_SCHEMES)
    }

    #[test]
    fn test_safe_urls() {
        assert!(!blocked("https://example.com"));
        assert!(!blocked("/relative/path.png"));
        assert!(!blocked("data:image/png;base64,AAAA"));
        assert!(!blocked("#anchor"));
        assert!(!blocked(""));
    }

    #[test]
    fn test_default_schemes_blocked() {
        assert!(blocked("javascript:alert(1)"));
        assert!(blocked("vbscript:msgbox"));
        assert!(blocked("data:text/html,<script>x</script>"));
    }

    #[test]
    fn test_case_insensitive() {
        assert!(blocked("JavaScript:alert(1)"));
        assert!(blocked("DATA:TEXT/HTML;base64,PHA+"));
    }

    #[test]
    fn test_whitespace_and_controls_ignored() {
        assert!(blocked("  javascript:alert(1)"));
        assert!(blocked("java\tscript:alert(1)"));
        assert!(blocked("\u{0001}javascript:x"));
    }

    #[test]
    fn test_char_refs_decoded() {
        assert!(blocked("&#106;avascript:alert(1)"));
        assert!(blocked("&#x6A;avascript:alert(1)"));
        assert!(blocked("javascript&colon;alert(1)"));
        assert!(!blocked("https://example.com/?a=1&b=2"));
    }

    #[test]
    fn test_extra_scheme() {
        let schemes = ["javascript:", "file:"];
        assert!(has_blocked_scheme("file:///etc/passwd", &schemes));
        assert!(!blocked("file:///etc/passwd"));
    }

    #[test]
    fn test_decode_one() {
        assert_eq!(decode_one("&#65;rest"), Some(('A', 5)));
        assert_eq!(decode_one("&#x41rest"), Some(('A', 5)));
        assert_eq!(decode_one("&amp;"), None);
        assert_eq!(decode_one("&#;"), None);
    }
}
