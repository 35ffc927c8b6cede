// SPDX-License-Identifier: MIT OR Apache-2.0

//! Properties file parser.
//!
//! This module provides a [`ConfigParser`] for the line oriented properties
//! format:
//!
//! ```text
//! # comment
//! ! also a comment
//! app.Server.HOST = localhost
//! app.Server.PORT: 8080
//! app.Server.NAME My Server
//! app.Server.MOTD = first line \
//!                   continued
//! ```

use crate::domain::{ConfigError, Result};
use crate::ports::ConfigParser;
use std::collections::BTreeMap;

/// Parser for properties files.
///
/// - `#` and `!` start comment lines
/// - a key ends at the first unescaped `=`, `:` or whitespace
/// - a line ending in an unescaped `\` continues on the next line, whose
///   leading whitespace is dropped
/// - `\t`, `\n`, `\r`, `\f`, `\uXXXX` and `\<char>` escapes are decoded
/// - when a key appears twice, the last value wins
///
/// # Examples
///
/// ```rust
/// use hexprop::adapters::PropertiesParser;
/// use hexprop::ports::ConfigParser;
///
/// let values = PropertiesParser::new().parse("a = 1\nb: two\\u0021").unwrap();
/// assert_eq!(values.get("a"), Some(&"1".to_string()));
/// assert_eq!(values.get("b"), Some(&"two!".to_string()));
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct PropertiesParser;

impl PropertiesParser {
    /// Creates a new properties parser.
    pub fn new() -> Self {
        PropertiesParser
    }
}

impl ConfigParser for PropertiesParser {
    fn parse(&self, content: &str) -> Result<BTreeMap<String, String>> {
        let mut result = BTreeMap::new();
        for (number, line) in logical_lines(content) {
            let (key, value) = split_entry(&line)
                .map_err(|message| parse_error(format!("line {}: {}", number, message)))?;
            result.insert(key, value);
        }
        Ok(result)
    }

    fn supported_extensions(&self) -> &[&str] {
        &["properties"]
    }
}

fn parse_error(message: String) -> ConfigError {
    ConfigError::ParseError {
        message,
        source: None,
    }
}

/// Joins continued lines and drops blanks and comments.
///
/// Each logical line is returned with the number of the physical line it
/// starts on.
fn logical_lines(content: &str) -> Vec<(usize, String)> {
    let mut lines = Vec::new();
    let mut current: Option<(usize, String)> = None;

    for (index, raw) in content.lines().enumerate() {
        let line = raw.trim_start();
        let (number, mut text) = match current.take() {
            Some((number, text)) => (number, text),
            None => {
                if line.is_empty() || line.starts_with('#') || line.starts_with('!') {
                    continue;
                }
                (index + 1, String::new())
            }
        };

        let trailing = line.chars().rev().take_while(|&c| c == '\\').count();
        if trailing % 2 == 1 {
            text.push_str(&line[..line.len() - 1]);
            current = Some((number, text));
        } else {
            text.push_str(line);
            lines.push((number, text));
        }
    }

    if let Some(pending) = current {
        lines.push(pending);
    }
    lines
}

/// Splits a logical line into a decoded key and value.
fn split_entry(line: &str) -> std::result::Result<(String, String), String> {
    let chars: Vec<char> = line.chars().collect();
    let mut i = 0;
    while i < chars.len() {
        match chars[i] {
            '\\' => i += 2,
            '=' | ':' => break,
            c if c.is_whitespace() => break,
            _ => i += 1,
        }
    }
    let key_end = i.min(chars.len());

    let mut j = key_end;
    while j < chars.len() && chars[j].is_whitespace() {
        j += 1;
    }
    if j < chars.len() && (chars[j] == '=' || chars[j] == ':') {
        j += 1;
        while j < chars.len() && chars[j].is_whitespace() {
            j += 1;
        }
    }

    Ok((unescape(&chars[..key_end])?, unescape(&chars[j..])?))
}

const UNPAIRED_SURROGATE: &str = "unpaired surrogate in \\u escape";

/// Decodes backslash escapes.
fn unescape(chars: &[char]) -> std::result::Result<String, String> {
    let mut out = String::with_capacity(chars.len());
    let mut pending_high: Option<u32> = None;
    let mut i = 0;

    while i < chars.len() {
        let c = chars[i];
        i += 1;
        if c != '\\' {
            if pending_high.is_some() {
                return Err(UNPAIRED_SURROGATE.to_string());
            }
            out.push(c);
            continue;
        }
        let Some(&escaped) = chars.get(i) else {
            break;
        };
        i += 1;
        match escaped {
            't' => out.push('\t'),
            'n' => out.push('\n'),
            'r' => out.push('\r'),
            'f' => out.push('\u{c}'),
            'u' => {
                let hex: String = chars.iter().skip(i).take(4).collect();
                if hex.len() != 4 {
                    return Err(format!("incomplete \\u escape '\\u{}'", hex));
                }
                let code = u32::from_str_radix(&hex, 16)
                    .map_err(|_| format!("malformed \\u escape '\\u{}'", hex))?;
                i += 4;

                let is_low = (0xDC00..0xE000).contains(&code);
                let code = match pending_high.take() {
                    Some(high) if is_low => 0x10000 + ((high - 0xD800) << 10) + (code - 0xDC00),
                    Some(_) => return Err(UNPAIRED_SURROGATE.to_string()),
                    None if (0xD800..0xDC00).contains(&code) => {
                        pending_high = Some(code);
                        continue;
                    }
                    None => code,
                };
                let decoded = char::from_u32(code)
                    .ok_or_else(|| format!("invalid character escape '\\u{}'", hex))?;
                out.push(decoded);
            }
            other => out.push(other),
        }
        if pending_high.is_some() {
            return Err(UNPAIRED_SURROGATE.to_string());
        }
    }

    if pending_high.is_some() {
        return Err(UNPAIRED_SURROGATE.to_string());
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(content: &str) -> BTreeMap<String, String> {
        PropertiesParser::new().parse(content).unwrap()
    }

    #[test]
    fn test_separators() {
        let result = parse("a=1\nb = 2\nc:3\nd 4\ne\t=\t5");
        assert_eq!(result.get("a"), Some(&"1".to_string()));
        assert_eq!(result.get("b"), Some(&"2".to_string()));
        assert_eq!(result.get("c"), Some(&"3".to_string()));
        assert_eq!(result.get("d"), Some(&"4".to_string()));
        assert_eq!(result.get("e"), Some(&"5".to_string()));
    }

    #[test]
    fn test_comments_and_blank_lines() {
        let result = parse("# comment\n  ! another\n\n   \nkey=value");
        assert_eq!(result.len(), 1);
    }

    #[test]
    fn test_key_without_value() {
        let result = parse("flag\nempty=");
        assert_eq!(result.get("flag"), Some(&String::new()));
        assert_eq!(result.get("empty"), Some(&String::new()));
    }

    #[test]
    fn test_value_keeps_inner_separators() {
        let result = parse("url = jdbc:db://host:5432/x?a=b");
        assert_eq!(result.get("url"), Some(&"jdbc:db://host:5432/x?a=b".to_string()));
    }

    #[test]
    fn test_line_continuation() {
        let result = parse("motd = first \\\n      second \\\n   third\nnext=1");
        assert_eq!(result.get("motd"), Some(&"first second third".to_string()));
        assert_eq!(result.get("next"), Some(&"1".to_string()));
    }

    #[test]
    fn test_escaped_backslash_does_not_continue() {
        let result = parse("path = c:\\\\temp\\\\\nnext=1");
        assert_eq!(result.get("path"), Some(&"c:\\temp\\".to_string()));
        assert_eq!(result.get("next"), Some(&"1".to_string()));
    }

    #[test]
    fn test_escapes() {
        let result = parse("k\\ ey\\=x = a\\tb\\nc\\u00e9\\\\");
        assert_eq!(result.get("k ey=x"), Some(&"a\tb\nc\u{e9}\\".to_string()));
    }

    #[test]
    fn test_surrogate_pair() {
        let result = parse("smile=\\ud83d\\ude00");
        assert_eq!(result.get("smile"), Some(&"\u{1F600}".to_string()));
    }

    #[test]
    fn test_last_duplicate_wins() {
        let result = parse("a=1\na=2");
        assert_eq!(result.get("a"), Some(&"2".to_string()));
    }

    #[test]
    fn test_malformed_unicode_escape() {
        let err = PropertiesParser::new().parse("ok=1\nbad=\\u12").unwrap_err();
        assert!(err.to_string().contains("line 2"));

        assert!(PropertiesParser::new().parse("bad=\\uZZZZ").is_err());
        assert!(PropertiesParser::new().parse("bad=\\ud83d").is_err());
    }

    #[test]
    fn test_high_surrogate_needs_a_low_one() {
        for bad in [
            "bad=\\uD800\\u0041",
            "bad=\\uD800A",
            "bad=\\uD800\\uD800\\uDC00",
            "bad=\\uD800\\t",
        ] {
            let err = PropertiesParser::new().parse(bad).unwrap_err();
            assert!(err.to_string().contains("unpaired surrogate"), "{}: {}", bad, err);
        }
    }
}
