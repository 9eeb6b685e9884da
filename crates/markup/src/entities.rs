//! Character references: a deliberately small decoder and the escapers used by the
//! serializer.
//!
//! Decoding contract:
//! - Named references decoded: `&amp;`, `&lt;`, `&gt;`, `&quot;`, `&apos;`, `&nbsp;`.
//! - Numeric references decode only when semicolon-terminated and a valid scalar:
//!   `&#215;`, `&#xD7;`.
//! - Anything else (unknown names, missing `;`, surrogates, overlong digit runs)
//!   is left byte-for-byte unchanged.

use memchr::memchr;

const NAMED: &[(&[u8], char)] = &[
    (b"&amp;", '&'),
    (b"&lt;", '<'),
    (b"&gt;", '>'),
    (b"&quot;", '"'),
    (b"&apos;", '\''),
    (b"&nbsp;", '\u{00A0}'),
];

const MAX_HEX_DIGITS: usize = 6;
const MAX_DEC_DIGITS: usize = 7;

pub(crate) fn decode_entities(s: &str) -> String {
    let bytes = s.as_bytes();
    let Some(first) = memchr(b'&', bytes) else {
        return s.to_string();
    };

    let mut out = String::with_capacity(s.len());
    out.push_str(&s[..first]);
    let mut i = first;

    while i < bytes.len() {
        let Some(rel) = memchr(b'&', &bytes[i..]) else {
            out.push_str(&s[i..]);
            break;
        };
        out.push_str(&s[i..i + rel]);
        i += rel;

        if let Some((pattern, ch)) = NAMED.iter().find(|(p, _)| bytes[i..].starts_with(p)) {
            out.push(*ch);
            i += pattern.len();
            continue;
        }

        match numeric_reference(bytes, i) {
            Some((ch, len)) => {
                out.push(ch);
                i += len;
            }
            None => {
                out.push('&');
                i += 1;
            }
        }
    }

    out
}

/// Decode `&#...;` / `&#x...;` starting at `start`; returns the scalar and the
/// reference length in bytes.
fn numeric_reference(bytes: &[u8], start: usize) -> Option<(char, usize)> {
    let rest = bytes.get(start..)?;
    let (digits_at, is_hex) = match rest {
        [b'&', b'#', b'x' | b'X', ..] => (3, true),
        [b'&', b'#', ..] => (2, false),
        _ => return None,
    };
    let max_digits = if is_hex { MAX_HEX_DIGITS } else { MAX_DEC_DIGITS };

    let digits = rest[digits_at..]
        .iter()
        .take_while(|b| if is_hex { b.is_ascii_hexdigit() } else { b.is_ascii_digit() })
        .count();
    if digits == 0 || digits > max_digits {
        return None;
    }
    let end = digits_at + digits;
    if rest.get(end) != Some(&b';') {
        return None;
    }

    // Digits are ASCII, so this slice is valid UTF-8.
    let text = std::str::from_utf8(&rest[digits_at..end]).ok()?;
    let radix = if is_hex { 16 } else { 10 };
    let ch = u32::from_str_radix(text, radix).ok().and_then(char::from_u32)?;
    Some((ch, end + 1))
}

/// Escape character data for element content.
pub fn escape_text(s: &str, out: &mut String) {
    for ch in s.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            _ => out.push(ch),
        }
    }
}

/// Escape an attribute value for a double-quoted attribute.
pub fn escape_attr(s: &str, out: &mut String) {
    for ch in s.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(ch),
        }
    }
}
