use crate::error::MalformedInput;

/// Punctuation the passage API escapes as `\uXXXX`.
const ESCAPE_TABLE: [(&str, char); 5] = [
    ("2014", '\u{2014}'),
    ("2018", '\u{2018}'),
    ("2019", '\u{2019}'),
    ("201c", '\u{201c}'),
    ("201d", '\u{201d}'),
];

fn lookup(code: &str) -> Option<char> {
    ESCAPE_TABLE
        .iter()
        .find(|(known, _)| known.eq_ignore_ascii_case(code))
        .map(|&(_, c)| c)
}

/// Resolve the literal escape markers embedded in raw chapter text.
///
/// `\uXXXX` becomes the punctuation character from the table, `\n` is dropped,
/// and every other backslash pair is copied through untouched. A code missing
/// from the table aborts the whole decode.
pub fn decode(raw: &str) -> Result<String, MalformedInput> {
    let mut out = String::with_capacity(raw.len());
    let mut rest = raw;

    while let Some(pos) = rest.find('\\') {
        out.push_str(&rest[..pos]);
        let offset = raw.len() - rest.len() + pos;
        let after = &rest[pos + 1..];

        match after.chars().next() {
            Some('u') => {
                let code: String = after[1..].chars().take(4).collect();
                let c = if code.chars().count() == 4 {
                    lookup(&code)
                } else {
                    None
                };
                let Some(c) = c else {
                    return Err(MalformedInput::UnknownEscape { code, offset });
                };
                out.push(c);
                rest = &after[1 + code.len()..];
            }
            Some('n') => {
                rest = &after[1..];
            }
            Some(other) => {
                out.push('\\');
                out.push(other);
                rest = &after[other.len_utf8()..];
            }
            None => {
                out.push('\\');
                rest = after;
            }
        }
    }

    out.push_str(rest);
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn esc(code: &str) -> String {
        format!("\\u{code}")
    }

    #[test]
    fn test_decode_known_codes() {
        let raw = format!("a{}b", esc("2014"));
        assert_eq!(decode(&raw).unwrap(), "a\u{2014}b");

        let raw = format!("{}x{}", esc("2018"), esc("2019"));
        assert_eq!(decode(&raw).unwrap(), "\u{2018}x\u{2019}");

        let raw = format!("{}Hi{}", esc("201c"), esc("201d"));
        assert_eq!(decode(&raw).unwrap(), "\u{201c}Hi\u{201d}");
    }

    #[test]
    fn test_decode_codes_ignore_hex_case() {
        let raw = format!("{}{}", esc("201C"), esc("201D"));
        assert_eq!(decode(&raw).unwrap(), "\u{201c}\u{201d}");
    }

    #[test]
    fn test_decode_removes_line_breaks() {
        assert_eq!(decode(r"one\n\ntwo\n").unwrap(), "onetwo");
    }

    #[test]
    fn test_decode_passes_other_escapes_through() {
        assert_eq!(decode(r#"say \"hi\" \t"#).unwrap(), r#"say \"hi\" \t"#);
        assert_eq!(decode(r"\\n").unwrap(), r"\\n");
    }

    #[test]
    fn test_decode_trailing_backslash() {
        assert_eq!(decode("end\\").unwrap(), "end\\");
    }

    #[test]
    fn test_decode_plain_text_unchanged() {
        assert_eq!(decode("[1] In the beginning").unwrap(), "[1] In the beginning");
        assert_eq!(decode("").unwrap(), "");
    }

    #[test]
    fn test_decode_unknown_code_reports_code_and_offset() {
        let raw = format!("ab{}cd", esc("00e9"));
        assert_eq!(
            decode(&raw),
            Err(MalformedInput::UnknownEscape {
                code: "00e9".to_string(),
                offset: 2,
            })
        );
    }

    #[test]
    fn test_decode_truncated_code() {
        assert_eq!(
            decode(r"x\u20"),
            Err(MalformedInput::UnknownEscape {
                code: "20".to_string(),
                offset: 1,
            })
        );
    }

    #[test]
    fn test_decode_keeps_non_ascii_text() {
        let raw = format!("\u{e9}{}\u{fc}", esc("2014"));
        assert_eq!(decode(&raw).unwrap(), "\u{e9}\u{2014}\u{fc}");
    }
}
