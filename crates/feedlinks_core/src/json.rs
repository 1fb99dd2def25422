use std::io;

use serde::Serialize;
use serde_json::ser::{CompactFormatter, Formatter, PrettyFormatter, Serializer};

use crate::FeedCollection;

const INDENT: &[u8] = b"    ";

/// Layout of the JSON document.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum JsonStyle {
    /// No whitespace between tokens.
    #[default]
    Compact,
    /// Four spaces per nesting level.
    Indented,
}

impl JsonStyle {
    pub fn from_indent_flag(indent: bool) -> Self {
        if indent {
            JsonStyle::Indented
        } else {
            JsonStyle::Compact
        }
    }
}

impl FeedCollection {
    /// Render as `{"rss": [...], "atom": [...]}` with ASCII-only output.
    pub fn to_json(&self, style: JsonStyle) -> Result<String, serde_json::Error> {
        match style {
            JsonStyle::Compact => render(self, CompactFormatter),
            JsonStyle::Indented => render(self, PrettyFormatter::with_indent(INDENT)),
        }
    }
}

fn render<T, F>(value: &T, formatter: F) -> Result<String, serde_json::Error>
where
    T: Serialize + ?Sized,
    F: Formatter,
{
    let mut buffer = Vec::with_capacity(128);
    let mut serializer = Serializer::with_formatter(&mut buffer, AsciiFormatter::new(formatter));
    value.serialize(&mut serializer)?;
    String::from_utf8(buffer).map_err(<serde_json::Error as serde::ser::Error>::custom)
}

/// Wraps another formatter and escapes every character outside printable
/// ASCII as `\uXXXX` (lowercase hex, UTF-16 surrogate pairs above U+FFFF).
pub struct AsciiFormatter<F> {
    inner: F,
}

impl<F: Formatter> AsciiFormatter<F> {
    pub fn new(inner: F) -> Self {
        Self { inner }
    }
}

impl<F: Formatter> Formatter for AsciiFormatter<F> {
    fn write_string_fragment<W>(&mut self, writer: &mut W, fragment: &str) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        let mut start = 0;
        for (index, ch) in fragment.char_indices() {
            if is_printable_ascii(ch) {
                continue;
            }
            if start < index {
                writer.write_all(&fragment.as_bytes()[start..index])?;
            }
            let mut units = [0u16; 2];
            for unit in ch.encode_utf16(&mut units) {
                write!(writer, "\\u{unit:04x}")?;
            }
            start = index + ch.len_utf8();
        }
        writer.write_all(&fragment.as_bytes()[start..])
    }

    fn begin_array<W>(&mut self, writer: &mut W) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        self.inner.begin_array(writer)
    }

    fn end_array<W>(&mut self, writer: &mut W) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        self.inner.end_array(writer)
    }

    fn begin_array_value<W>(&mut self, writer: &mut W, first: bool) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        self.inner.begin_array_value(writer, first)
    }

    fn end_array_value<W>(&mut self, writer: &mut W) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        self.inner.end_array_value(writer)
    }

    fn begin_object<W>(&mut self, writer: &mut W) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        self.inner.begin_object(writer)
    }

    fn end_object<W>(&mut self, writer: &mut W) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        self.inner.end_object(writer)
    }

    fn begin_object_key<W>(&mut self, writer: &mut W, first: bool) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        self.inner.begin_object_key(writer, first)
    }

    fn end_object_key<W>(&mut self, writer: &mut W) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        self.inner.end_object_key(writer)
    }

    fn begin_object_value<W>(&mut self, writer: &mut W) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        self.inner.begin_object_value(writer)
    }

    fn end_object_value<W>(&mut self, writer: &mut W) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        self.inner.end_object_value(writer)
    }
}

fn is_printable_ascii(ch: char) -> bool {
    (' '..='~').contains(&ch)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn compact_layout_is_exact() {
        let mut feeds = FeedCollection::new();
        feeds.add_rss("r");
        feeds.add_atom("a");
        assert_eq!(
            feeds.to_json(JsonStyle::Compact).unwrap(),
            r#"{"rss":["r"],"atom":["a"]}"#
        );
    }

    #[test]
    fn indented_layout_is_exact() {
        let mut feeds = FeedCollection::new();
        feeds.add_atom("a");
        assert_eq!(
            feeds.to_json(JsonStyle::Indented).unwrap(),
            "{\n    \"rss\": [],\n    \"atom\": [\n        \"a\"\n    ]\n}"
        );
    }

    #[test]
    fn astral_characters_become_surrogate_pairs() {
        let mut feeds = FeedCollection::new();
        feeds.add_rss("\u{1F600}");
        let json = feeds.to_json(JsonStyle::Compact).unwrap();
        assert!(json.contains(r#""\ud83d\ude00""#), "got {json}");
    }

    #[test]
    fn delete_and_controls_are_escaped() {
        let mut feeds = FeedCollection::new();
        feeds.add_rss("a\u{7f}b\tc\"d\\");
        let json = feeds.to_json(JsonStyle::Compact).unwrap();
        assert!(json.contains(r#""a\u007fb\tc\"d\\""#), "got {json}");
    }

    #[test]
    fn indent_flag_selects_style() {
        assert_eq!(JsonStyle::from_indent_flag(true), JsonStyle::Indented);
        assert_eq!(JsonStyle::from_indent_flag(false), JsonStyle::Compact);
        assert_eq!(JsonStyle::default(), JsonStyle::Compact);
    }
}
