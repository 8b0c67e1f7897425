//! Leaf element extraction.
//!
//! Matches every `<Tag ...>text</Tag>` where `Tag` is ASCII alphanumeric,
//! anything up to the first `>` after the name is ignored (attributes), and
//! `text` contains no `<`. Open and close names must be equal
//! (case-sensitive). Matches never overlap; scanning resumes after the close
//! tag of each match.
//!
//! The open-tag name may be shortened to find a matching close tag, so
//! `<ab>x</a>` yields `a = "x"`. This mirrors a backtracking
//! `<([a-zA-Z0-9]+)[^>]*>([^<]*)</\1>` search.

use std::collections::BTreeMap;
use std::ops::Range;

use crate::transcode::namespace::strip_namespace_prefixes;

/// Tag name → verbatim text of the last matching element.
pub type FlatFieldMap = BTreeMap<String, String>;

/// Turns an XML document into a flat field map.
pub trait FieldExtractor: Send + Sync + std::fmt::Debug {
    /// Extract fields from a raw (not yet namespace-normalized) document.
    fn extract(&self, xml: &str) -> FlatFieldMap;
}

/// Namespace stripping followed by `extract_flat_fields`.
#[derive(Debug, Clone, Copy, Default)]
pub struct SimpleTagExtractor;

impl FieldExtractor for SimpleTagExtractor {
    fn extract(&self, xml: &str) -> FlatFieldMap {
        extract_flat_fields(&strip_namespace_prefixes(xml))
    }
}

/// Collect every simple element of a namespace-normalized document.
///
/// Later elements overwrite earlier ones with the same name. Returns an
/// empty map when nothing matches.
pub fn extract_flat_fields(xml: &str) -> FlatFieldMap {
    let bytes = xml.as_bytes();
    let mut fields = FlatFieldMap::new();
    let mut pos = 0;

    while let Some(offset) = bytes[pos..].iter().position(|&b| b == b'<') {
        let start = pos + offset;
        match match_element(bytes, start) {
            Some(m) => {
                // All boundaries sit on ASCII bytes, so slicing is char-safe.
                fields.insert(xml[m.name].to_string(), xml[m.text].to_string());
                pos = m.end;
            }
            None => pos = start + 1,
        }
    }

    fields
}

struct ElementMatch {
    name: Range<usize>,
    text: Range<usize>,
    end: usize,
}

/// Try to match one element whose open tag begins at `start` (a `<`).
fn match_element(bytes: &[u8], start: usize) -> Option<ElementMatch> {
    let name_start = start + 1;
    let name_len = bytes[name_start..]
        .iter()
        .take_while(|b| b.is_ascii_alphanumeric())
        .count();
    if name_len == 0 {
        return None;
    }

    // The open tag runs to the first `>` after the name, whatever its length.
    let after_name = name_start + name_len;
    let text_start = after_name + bytes[after_name..].iter().position(|&b| b == b'>')? + 1;
    let text_end = text_start + bytes[text_start..].iter().position(|&b| b == b'<')?;

    let close = &bytes[text_end..];
    if close.get(1) != Some(&b'/') {
        return None;
    }
    let close_name = &close[2..];

    (1..=name_len).rev().find_map(|len| {
        let name = &bytes[name_start..name_start + len];
        let matches = close_name.len() > len
            && &close_name[..len] == name
            && close_name[len] == b'>';
        matches.then(|| ElementMatch {
            name: name_start..name_start + len,
            text: text_start..text_end,
            end: text_end + 2 + len + 1,
        })
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fields(pairs: &[(&str, &str)]) -> FlatFieldMap {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_single_element() {
        assert_eq!(extract_flat_fields("<Foo>bar</Foo>"), fields(&[("Foo", "bar")]));
    }

    #[test]
    fn test_last_occurrence_wins() {
        let xml = "<X>1</X><Y>a</Y><X>2</X>";
        assert_eq!(extract_flat_fields(xml), fields(&[("X", "2"), ("Y", "a")]));
    }

    #[test]
    fn test_parent_with_children_skipped() {
        assert_eq!(extract_flat_fields("<a><b>1</b></a>"), fields(&[("b", "1")]));
    }

    #[test]
    fn test_self_closing_and_empty() {
        assert!(extract_flat_fields("<x/>").is_empty());
        assert_eq!(extract_flat_fields("<x></x>"), fields(&[("x", "")]));
        assert_eq!(
            extract_flat_fields("<r><x/><y></y></r>"),
            fields(&[("y", "")])
        );
    }

    #[test]
    fn test_no_matches() {
        assert!(extract_flat_fields("").is_empty());
        assert!(extract_flat_fields("plain text").is_empty());
        assert!(extract_flat_fields("<open>never closed").is_empty());
        assert!(extract_flat_fields("<a>text</b>").is_empty());
    }

    #[test]
    fn test_case_sensitive_names() {
        assert!(extract_flat_fields("<Psc>11000</psc>").is_empty());
    }

    #[test]
    fn test_attributes_ignored() {
        let xml = r#"<Kod typ="ad" verze="2">21720487</Kod><Kod typ="so">1</Kod>"#;
        assert_eq!(extract_flat_fields(xml), fields(&[("Kod", "1")]));
    }

    #[test]
    fn test_text_kept_verbatim() {
        let xml = "<Nazev>Tom &amp; Jerry &lt;3</Nazev><Obec>Praha 1 – Staré Město</Obec>";
        assert_eq!(
            extract_flat_fields(xml),
            fields(&[("Nazev", "Tom &amp; Jerry &lt;3"), ("Obec", "Praha 1 – Staré Město")])
        );
    }

    #[test]
    fn test_multiline_text() {
        assert_eq!(
            extract_flat_fields("<Pos>\n  50.08 14.42\n</Pos>"),
            fields(&[("Pos", "\n  50.08 14.42\n")])
        );
    }

    #[test]
    fn test_name_shortened_to_close_tag() {
        assert_eq!(extract_flat_fields("<ab>x</a>"), fields(&[("a", "x")]));
    }

    #[test]
    fn test_non_alphanumeric_names_skipped() {
        assert!(extract_flat_fields("<my-tag>v</my-tag>").is_empty());
        assert!(extract_flat_fields("<ns:Foo>v</ns:Foo>").is_empty());
    }

    #[test]
    fn test_failed_candidate_does_not_hide_later_match() {
        // `<a <b>` fails to close as `a`, scanning restarts inside it
        assert_eq!(extract_flat_fields("<a <b>x</b>"), fields(&[("b", "x")]));
    }

    #[test]
    fn test_extractor_normalizes_first() {
        let map = SimpleTagExtractor.extract("<ns:Foo>bar</ns:Foo>");
        assert_eq!(map, fields(&[("Foo", "bar")]));
    }
}
