use crate::format::FORMAT_NAME;
use configapi_rs_core::FormatError;

/// Escape `text` for writing. Keys also escape every space; values only a
/// leading one.
pub(crate) fn escape(text: &str, is_key: bool) -> String {
    let mut escaped = String::with_capacity(text.len());
    for (index, ch) in text.chars().enumerate() {
        match ch {
            '\\' => escaped.push_str("\\\\"),
            '>'..='~' => escaped.push(ch),
            ' ' => {
                if index == 0 || is_key {
                    escaped.push('\\');
                }
                escaped.push(' ');
            }
            '\t' => escaped.push_str("\\t"),
            '\n' => escaped.push_str("\\n"),
            '\r' => escaped.push_str("\\r"),
            '\x0c' => escaped.push_str("\\f"),
            '=' | ':' | '#' | '!' => {
                escaped.push('\\');
                escaped.push(ch);
            }
            _ => escaped.push(ch),
        }
    }
    escaped
}

/// Resolve `\t \n \r \f \uXXXX`; any other escaped char stands for itself.
pub(crate) fn unescape(text: &str) -> Result<String, FormatError> {
    let mut value = String::with_capacity(text.len());
    let mut chars = text.chars();
    while let Some(ch) = chars.next() {
        if ch != '\\' {
            value.push(ch);
            continue;
        }
        match chars.next() {
            Some('t') => value.push('\t'),
            Some('n') => value.push('\n'),
            Some('r') => value.push('\r'),
            Some('f') => value.push('\x0c'),
            Some('u') => value.push(unicode_escape(&mut chars)?),
            Some(other) => value.push(other),
            None => {}
        }
    }
    Ok(value)
}

/// Decode the four hex digits after `\u`. A high surrogate followed by an
/// escaped low surrogate decodes as one char.
fn unicode_escape(chars: &mut std::str::Chars<'_>) -> Result<char, FormatError> {
    let digits: String = chars.by_ref().take(4).collect();
    let unit = (digits.len() == 4)
        .then(|| u16::from_str_radix(&digits, 16).ok())
        .flatten()
        .ok_or_else(|| {
            FormatError::parse(FORMAT_NAME, format!("malformed \\uxxxx encoding: \\u{digits}"))
        })?;

    if (0xD800..0xDC00).contains(&unit) {
        let rest = chars.as_str();
        if let Some(low) = rest
            .strip_prefix("\\u")
            .and_then(|rest| rest.get(..4))
            .and_then(|hex| u16::from_str_radix(hex, 16).ok())
            .filter(|low| (0xDC00..0xE000).contains(low))
        {
            for _ in 0..6 {
                chars.next();
            }
            if let Some(Ok(ch)) = char::decode_utf16([unit, low]).next() {
                return Ok(ch);
            }
        }
    }

    char::from_u32(u32::from(unit)).ok_or_else(|| {
        FormatError::parse(FORMAT_NAME, format!("unpaired surrogate \\u{digits}"))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn escaping_matches_properties_rules() {
        assert_eq!(escape("2=3", false), "2\\=3");
        assert_eq!(escape("a b", true), "a\\ b");
        assert_eq!(escape(" a b", false), "\\ a b");
        assert_eq!(escape("c:\\dir", false), "c\\:\\\\dir");
        assert_eq!(escape("#!\t\n\r\x0c", false), "\\#\\!\\t\\n\\r\\f");
        assert_eq!(escape("ünïcode", false), "ünïcode");
    }

    #[test]
    fn unescaping_resolves_escapes() {
        assert_eq!(unescape("a\\ b\\=c").expect("plain"), "a b=c");
        assert_eq!(unescape("\\u0041\\t\\q").expect("unicode"), "A\tq");
        assert_eq!(unescape("\\ud83d\\ude00").expect("pair"), "😀");
        assert!(unescape("\\u12").is_err());
    }
}
