//! Mapping from canonical header keys to column indices.

use crate::canonical::canonical_header_key;
use foldhash::{HashMap, HashMapExt};

/// The key-index pairs of a CSV header record.
///
/// Keys are stored in canonical form (see [`canonical_header_key`]) and
/// every key passed to a method is canonicalized before use, so lookups are
/// insensitive to case and whitespace.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Header {
    indices: HashMap<String, usize>,
}

impl Header {
    /// Create an empty header.
    pub fn new() -> Self {
        Self {
            indices: HashMap::new(),
        }
    }

    /// Build a header from a header record.
    ///
    /// Each field maps to its zero-based position. When two fields share a
    /// canonical key the later column wins.
    pub fn from_record<S: AsRef<str>>(record: &[S]) -> Self {
        let mut header = Self {
            indices: HashMap::with_capacity(record.len()),
        };
        for (index, key) in record.iter().enumerate() {
            header.set(key.as_ref(), index);
        }
        header
    }

    /// Associate `key` with `index`, replacing any existing index.
    pub fn set(&mut self, key: &str, index: usize) {
        self.indices
            .insert(canonical_header_key(key).into_owned(), index);
    }

    /// Returns the column index associated with `key`, or `None`.
    pub fn get(&self, key: &str) -> Option<usize> {
        self.indices.get(canonical_header_key(key).as_ref()).copied()
    }

    /// Returns true if an index is associated with `key`.
    pub fn has(&self, key: &str) -> bool {
        self.indices.contains_key(canonical_header_key(key).as_ref())
    }

    /// Remove the index associated with `key`. No-op if there is none.
    pub fn remove(&mut self, key: &str) {
        self.indices.remove(canonical_header_key(key).as_ref());
    }

    /// Number of distinct canonical keys.
    #[inline]
    pub fn len(&self) -> usize {
        self.indices.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    /// Iterate over `(canonical key, index)` pairs in arbitrary order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, usize)> + '_ {
        self.indices.iter().map(|(key, &index)| (key.as_str(), index))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_is_case_and_space_insensitive() {
        let header = Header::from_record(&["User  \tName ", " Age"]);

        assert_eq!(header.get("user name"), Some(0));
        assert_eq!(header.get("USER NAME"), Some(0));
        assert_eq!(header.get(" User Name "), Some(0));
        assert_eq!(header.get("age"), Some(1));
        assert!(header.has("AGE"));
    }

    #[test]
    fn test_missing_key() {
        let header = Header::from_record(&["a", "b"]);
        assert_eq!(header.get("c"), None);
        assert!(!header.has("c"));
    }

    #[test]
    fn test_duplicate_last_column_wins() {
        let header = Header::from_record(&["id", "name", " ID "]);
        assert_eq!(header.get("id"), Some(2));
        assert_eq!(header.len(), 2);
    }

    #[test]
    fn test_set_and_remove() {
        let mut header = Header::new();
        assert!(header.is_empty());

        header.set("Email Address", 4);
        assert_eq!(header.get("email  address"), Some(4));

        header.set("EMAIL ADDRESS", 7);
        assert_eq!(header.get("email address"), Some(7));

        header.remove(" email\taddress");
        assert!(!header.has("email address"));

        // removing an absent key is a no-op
        header.remove("missing");
        assert!(header.is_empty());
    }

    #[test]
    fn test_iter_yields_canonical_keys() {
        let header = Header::from_record(&["First Name", "LAST"]);
        let mut pairs: Vec<_> = header.iter().collect();
        pairs.sort_by_key(|&(_, index)| index);
        assert_eq!(pairs, vec![("first name", 0), ("last", 1)]);
    }
}
