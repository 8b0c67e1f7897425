//! Namespace prefix removal.
//!
//! Purely textual: `<ns:Tag ...>` becomes `<Tag ...>` and `</ns:Tag>` becomes
//! `</Tag>`. A prefix is a run of characters other than `:`, `>` and
//! whitespace directly after `<` or `</`, terminated by a colon. Colons later
//! in the tag (attribute names and values) are left alone.

use std::borrow::Cow;
use std::sync::LazyLock;

use regex::Regex;

static TAG_PREFIX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"<(/?)(?:[^:>\s]*:)?([^>]+)>").expect("tag prefix pattern is valid")
});

/// Strip namespace prefixes from every opening and closing tag.
pub fn strip_namespace_prefixes(xml: &str) -> Cow<'_, str> {
    TAG_PREFIX.replace_all(xml, "<${1}${2}>")
}
