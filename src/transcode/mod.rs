//! XML → flat JSON transcoding for registry exports.
//!
//! # Data Flow
//! ```text
//! upstream XML body (fully buffered)
//!     → namespace.rs (strip `ns:` prefixes from tags)
//!     → extractor.rs (collect simple `<Tag>text</Tag>` elements)
//!     → FlatFieldMap
//!     → axum::Json (JSON object)
//! ```
//!
//! # Design Decisions
//! - Not an XML parser: only leaf elements are seen, parents with children are skipped
//! - Same-named leaves at different depths collapse, last one wins
//! - Text is kept verbatim, entities are not decoded
//! - Extraction sits behind `FieldExtractor` so a streaming tokenizer can replace it

pub mod extractor;
pub mod namespace;

pub use extractor::{extract_flat_fields, FieldExtractor, FlatFieldMap, SimpleTagExtractor};
pub use namespace::strip_namespace_prefixes;

/// Normalize namespaces, then extract leaf elements with the default extractor.
pub fn transcode(xml: &str) -> FlatFieldMap {
    SimpleTagExtractor.extract(xml)
}
