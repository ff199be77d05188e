//! JSON text encoding
//!
//! Response bodies are single-line JSON with a space after every `,` and `:`
//! (`{"success": true, "message": "..."}`), which is what existing clients of
//! this endpoint receive. Stored documents use 2-space indentation. Both
//! escape every non-ASCII character as `\uXXXX` so the bytes stay 7-bit.

use serde::Serialize;
use serde_json::ser::Formatter;
use std::io;

const STORED_INDENT: &[u8] = b"  ";

struct TextFormatter {
    /// `None` writes one line with spaced separators
    indent: Option<&'static [u8]>,
    depth: usize,
    has_value: bool,
}

impl TextFormatter {
    const fn spaced() -> Self {
        Self {
            indent: None,
            depth: 0,
            has_value: false,
        }
    }

    const fn indented(indent: &'static [u8]) -> Self {
        Self {
            indent: Some(indent),
            depth: 0,
            has_value: false,
        }
    }

    fn begin_value<W>(&self, writer: &mut W, first: bool) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        match self.indent {
            Some(indent) => {
                writer.write_all(if first { b"\n" } else { b",\n" })?;
                write_indent(writer, indent, self.depth)
            }
            None if first => Ok(()),
            None => writer.write_all(b", "),
        }
    }

    fn end_container<W>(&mut self, writer: &mut W, close: &[u8]) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        self.depth -= 1;
        if let Some(indent) = self.indent {
            if self.has_value {
                writer.write_all(b"\n")?;
                write_indent(writer, indent, self.depth)?;
            }
        }
        writer.write_all(close)
    }
}

fn write_indent<W>(writer: &mut W, indent: &[u8], depth: usize) -> io::Result<()>
where
    W: ?Sized + io::Write,
{
    for _ in 0..depth {
        writer.write_all(indent)?;
    }
    Ok(())
}

impl Formatter for TextFormatter {
    fn begin_array<W>(&mut self, writer: &mut W) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        self.depth += 1;
        self.has_value = false;
        writer.write_all(b"[")
    }

    fn end_array<W>(&mut self, writer: &mut W) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        self.end_container(writer, b"]")
    }

    fn begin_array_value<W>(&mut self, writer: &mut W, first: bool) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        self.begin_value(writer, first)
    }

    fn end_array_value<W>(&mut self, _writer: &mut W) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        self.has_value = true;
        Ok(())
    }

    fn begin_object<W>(&mut self, writer: &mut W) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        self.depth += 1;
        self.has_value = false;
        writer.write_all(b"{")
    }

    fn end_object<W>(&mut self, writer: &mut W) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        self.end_container(writer, b"}")
    }

    fn begin_object_key<W>(&mut self, writer: &mut W, first: bool) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        self.begin_value(writer, first)
    }

    fn begin_object_value<W>(&mut self, writer: &mut W) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        writer.write_all(b": ")
    }

    fn end_object_value<W>(&mut self, _writer: &mut W) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        self.has_value = true;
        Ok(())
    }

    fn write_string_fragment<W>(&mut self, writer: &mut W, fragment: &str) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        let mut start = 0;
        for (idx, ch) in fragment.char_indices() {
            if ch.is_ascii() {
                continue;
            }
            writer.write_all(&fragment.as_bytes()[start..idx])?;
            let mut units = [0u16; 2];
            for unit in ch.encode_utf16(&mut units) {
                writer.write_all(format!("\\u{unit:04x}").as_bytes())?;
            }
            start = idx + ch.len_utf8();
        }
        writer.write_all(&fragment.as_bytes()[start..])
    }
}

fn to_string_with<T>(value: &T, formatter: TextFormatter) -> serde_json::Result<String>
where
    T: ?Sized + Serialize,
{
    let mut out = Vec::with_capacity(128);
    let mut serializer = serde_json::Serializer::with_formatter(&mut out, formatter);
    value.serialize(&mut serializer)?;
    // only ASCII is ever written
    Ok(String::from_utf8_lossy(&out).into_owned())
}

/// Serialize `value` as one line with spaced separators
pub fn to_spaced_string<T>(value: &T) -> serde_json::Result<String>
where
    T: ?Sized + Serialize,
{
    to_string_with(value, TextFormatter::spaced())
}

/// Serialize `value` with 2-space indentation, the stored document layout
pub fn to_indented_string<T>(value: &T) -> serde_json::Result<String>
where
    T: ?Sized + Serialize,
{
    to_string_with(value, TextFormatter::indented(STORED_INDENT))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Value};

    #[test]
    fn test_spaced_separators() {
        let body = json!({"success": false, "error": "bad", "list": [1, 2, {"a": null}]});
        assert_eq!(
            to_spaced_string(&body).unwrap(),
            r#"{"success": false, "error": "bad", "list": [1, 2, {"a": null}]}"#
        );
    }

    #[test]
    fn test_empty_containers() {
        assert_eq!(to_spaced_string(&json!({})).unwrap(), "{}");
        assert_eq!(to_spaced_string(&json!({"a": []})).unwrap(), r#"{"a": []}"#);
        assert_eq!(
            to_indented_string(&json!({"a": [], "b": {}})).unwrap(),
            "{\n  \"a\": [],\n  \"b\": {}\n}"
        );
    }

    #[test]
    fn test_strings_are_escaped() {
        let body = json!({"error": "line\n\"quoted\""});
        assert_eq!(
            to_spaced_string(&body).unwrap(),
            r#"{"error": "line\n\"quoted\""}"#
        );
    }

    #[test]
    fn test_indented_nesting() {
        let doc = json!({"a": [1, {"b": [true]}], "c": "x"});
        assert_eq!(
            to_indented_string(&doc).unwrap(),
            "{\n  \"a\": [\n    1,\n    {\n      \"b\": [\n        true\n      ]\n    }\n  ],\n  \"c\": \"x\"\n}"
        );
    }

    #[test]
    fn test_non_ascii_is_escaped() {
        let doc = json!({"café": "Zahlungsgerät €5 😀"});
        let text = to_indented_string(&doc).unwrap();
        assert_eq!(
            text,
            "{\n  \"caf\\u00e9\": \"Zahlungsger\\u00e4t \\u20ac5 \\ud83d\\ude00\"\n}"
        );
        assert!(text.is_ascii());

        let back: Value = serde_json::from_str(&text).unwrap();
        assert_eq!(back, doc);
        assert_eq!(to_spaced_string(&json!("ñ")).unwrap(), r#""\u00f1""#);
    }
}
