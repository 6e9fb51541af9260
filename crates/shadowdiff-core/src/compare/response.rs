//! Captured HTTP responses as handed over by the forwarding component.

use serde::{Deserialize, Serialize};

/// Ordered header multimap with case-insensitive names.
///
/// Insertion order of names is preserved; values appended under a name that
/// differs only in case join the existing entry.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Headers {
    entries: Vec<(String, Vec<String>)>,
}

impl Headers {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn append(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        let value = value.into();
        match self
            .entries
            .iter_mut()
            .find(|(existing, _)| existing.eq_ignore_ascii_case(&name))
        {
            Some((_, values)) => values.push(value),
            None => self.entries.push((name, vec![value])),
        }
    }

    /// All values recorded for `name`, in arrival order
    pub fn get_all(&self, name: &str) -> Option<&[String]> {
        self.entries
            .iter()
            .find(|(existing, _)| existing.eq_ignore_ascii_case(name))
            .map(|(_, values)| values.as_slice())
    }

    /// Values for `name` joined with `", "`, the way they would fold onto one header line
    pub fn get_joined(&self, name: &str) -> Option<String> {
        self.get_all(name).map(|values| values.join(", "))
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.entries
            .iter()
            .map(|(name, values)| (name.as_str(), values.as_slice()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Headers {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut headers = Headers::new();
        for (name, value) in iter {
            headers.append(name, value);
        }
        headers
    }
}

/// One response captured from either the reference or the candidate system.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CapturedResponse {
    pub status_code: u16,
    pub headers: Headers,
    /// Falls back to the `content-type` header when unset
    pub content_type: Option<String>,
    /// `None` and an empty body are equivalent
    pub body: Option<Vec<u8>>,
    pub response_time_ms: u64,
}

impl CapturedResponse {
    pub fn new(status_code: u16) -> Self {
        Self {
            status_code,
            ..Self::default()
        }
    }

    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.append(name, value);
        self
    }

    pub fn with_content_type(mut self, content_type: impl Into<String>) -> Self {
        self.content_type = Some(content_type.into());
        self
    }

    pub fn with_body(mut self, body: impl Into<Vec<u8>>) -> Self {
        self.body = Some(body.into());
        self
    }

    pub fn with_json_body(self, body: &serde_json::Value) -> Self {
        self.with_content_type("application/json")
            .with_body(body.to_string())
    }

    pub fn with_response_time_ms(mut self, ms: u64) -> Self {
        self.response_time_ms = ms;
        self
    }

    /// Body bytes; empty when absent
    pub fn body_bytes(&self) -> &[u8] {
        self.body.as_deref().unwrap_or_default()
    }

    pub fn effective_content_type(&self) -> Option<String> {
        self.content_type
            .clone()
            .or_else(|| self.headers.get_joined("content-type"))
    }

    pub fn is_json(&self) -> bool {
        self.effective_content_type()
            .as_deref()
            .is_some_and(is_json_content_type)
    }
}

/// `application/json`, `text/json`, or any `+json` suffix type; parameters ignored.
pub fn is_json_content_type(content_type: &str) -> bool {
    let media_type = content_type
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase();
    media_type == "application/json" || media_type == "text/json" || media_type.ends_with("+json")
}
