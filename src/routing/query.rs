//! Query string decoding.

use std::collections::HashMap;

/// Decoded query parameters of an inbound request.
///
/// Duplicate keys keep the last value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryParams {
    params: HashMap<String, String>,
}

impl QueryParams {
    /// Decode a raw query string (without the leading `?`).
    ///
    /// `+` decodes to a space and percent escapes are resolved, as in HTML forms.
    pub fn parse(query: Option<&str>) -> Self {
        let params = query
            .map(|q| {
                url::form_urlencoded::parse(q.as_bytes())
                    .into_owned()
                    .collect::<HashMap<_, _>>()
            })
            .unwrap_or_default();
        Self { params }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.params.get(key).map(String::as_str)
    }

    /// Value of `key` when present and not empty.
    pub fn non_empty(&self, key: &str) -> Option<&str> {
        self.get(key).filter(|v| !v.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decodes_values() {
        let q = QueryParams::parse(Some("adresa=Na%20P%C5%99%C3%ADkop%C4%9B+1&x=y"));
        assert_eq!(q.get("adresa"), Some("Na Příkopě 1"));
        assert_eq!(q.get("x"), Some("y"));
        assert_eq!(q.get("missing"), None);
    }

    #[test]
    fn test_last_value_wins() {
        let q = QueryParams::parse(Some("kod=1&kod=2&kod=3"));
        assert_eq!(q.get("kod"), Some("3"));
    }

    #[test]
    fn test_empty_values() {
        let q = QueryParams::parse(Some("kod=&adresa"));
        assert_eq!(q.get("kod"), Some(""));
        assert_eq!(q.non_empty("kod"), None);
        assert_eq!(q.non_empty("adresa"), None);
    }

    #[test]
    fn test_no_query() {
        assert_eq!(QueryParams::parse(None), QueryParams::default());
        assert_eq!(QueryParams::parse(Some("")).get("kod"), None);
    }
}
