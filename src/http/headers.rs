//! Ordered header store.
//!
//! A `HeaderSet` keeps `(name, value)` pairs in insertion order. Duplicate
//! names are retained and lookups return the first match at or after a given
//! position, so the first header written for a name is the one a lookup sees.

/// Default number of entries a `HeaderSet` accepts before `put` fails.
pub const DEFAULT_HEADER_CAPACITY: usize = 64;

/// Ordered collection of HTTP header name/value pairs for one message.
#[derive(Debug, Clone)]
pub struct HeaderSet {
    entries: Vec<(String, String)>,
    capacity: usize,
}

impl Default for HeaderSet {
    fn default() -> Self {
        Self::new()
    }
}

impl HeaderSet {
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_HEADER_CAPACITY)
    }

    /// Creates a store that holds at most `capacity` entries.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: Vec::new(),
            capacity,
        }
    }

    /// Appends a pair. Returns `false` and leaves the store untouched when it
    /// is already full.
    pub fn put(&mut self, name: impl Into<String>, value: impl Into<String>) -> bool {
        if self.entries.len() >= self.capacity {
            return false;
        }
        self.entries.push((name.into(), value.into()));
        true
    }

    /// Returns the pair at `index`, or `None` past the end.
    pub fn get(&self, index: usize) -> Option<(&str, &str)> {
        self.entries
            .get(index)
            .map(|(n, v)| (n.as_str(), v.as_str()))
    }

    /// Case-sensitive scan for `name` starting at `start`.
    pub fn find(&self, name: &str, start: usize) -> Option<&str> {
        self.position(name, start).map(|i| self.entries[i].1.as_str())
    }

    /// Index of the first entry named exactly `name` at or after `start`.
    pub fn position(&self, name: &str, start: usize) -> Option<usize> {
        self.entries
            .iter()
            .skip(start)
            .position(|(n, _)| n == name)
            .map(|i| i + start)
    }

    /// First value whose name matches `name` ignoring ASCII case. Use this for
    /// well-known HTTP header names, which are case-insensitive on the wire.
    pub fn find_ignore_case(&self, name: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(n, _)| n.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(n, v)| (n.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.entries.len() >= self.capacity
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn put_fails_when_full() {
        let mut headers = HeaderSet::with_capacity(2);
        assert!(headers.put("A", "1"));
        assert!(headers.put("B", "2"));
        assert!(!headers.put("C", "3"));
        assert_eq!(headers.len(), 2);
        assert_eq!(headers.find("C", 0), None);
    }

    #[test]
    fn find_resumes_from_start_index() {
        let mut headers = HeaderSet::new();
        headers.put("Accept", "text/html");
        headers.put("Host", "example.com");
        headers.put("Accept", "*/*");

        assert_eq!(headers.find("Accept", 0), Some("text/html"));
        assert_eq!(headers.find("Accept", 1), Some("*/*"));
        assert_eq!(headers.find("Accept", 3), None);
        assert_eq!(headers.position("Accept", 1), Some(2));
    }
}
