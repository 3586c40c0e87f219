/// Total image counts per category
///
/// The CDN publishes a small script that assigns an object literal to
/// `__picCounts`, e.g. `window.__picCounts = {h: 788, v: 995}`. This module
/// turns that script into a `CountTable` and answers count lookups with a
/// per-category fallback.

use std::collections::HashMap;

use super::category::Category;
use crate::error::CountError;

/// Name the script assigns the table to
const TABLE_NAME: &str = "__picCounts";

/// Count table keyed by the short category codes (h, v, ys, ...)
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CountTable {
    counts: HashMap<String, u32>,
}

/// Where a resolved count came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CountSource {
    /// Table already loaded earlier in this process
    Cached,
    /// Table downloaded for this request
    Remote,
    /// Static fallback
    Fallback,
}

impl CountTable {
    #[cfg(test)]
    pub fn from_counts(counts: HashMap<String, u32>) -> Self {
        Self { counts }
    }

    /// Parse the count script body.
    ///
    /// Every assignment to `__picCounts` is considered and the last literal
    /// that parses wins, matching the value the script leaves behind.
    pub fn parse_script(script: &str) -> Result<Self, CountError> {
        let mut table = None;
        let mut last_error = None;

        for literal in assigned_literals(script) {
            match json5::from_str::<HashMap<String, u32>>(literal) {
                Ok(counts) => table = Some(Self { counts }),
                Err(e) => last_error = Some(CountError::Malformed(e.to_string())),
            }
        }

        match (table, last_error) {
            (Some(table), _) => Ok(table),
            (None, Some(e)) => Err(e),
            (None, None) => Err(CountError::MissingTable),
        }
    }

    pub fn get(&self, key: &str) -> Option<u32> {
        self.counts.get(key).copied()
    }

    /// Count for a category, falling back when the key is missing
    pub fn count_for(&self, category: Category) -> u32 {
        self.get(category.count_key())
            .unwrap_or_else(|| category.fallback_count())
    }

    pub fn len(&self) -> usize {
        self.counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }
}

/// Object literals that follow an assignment to `__picCounts` within the
/// same statement, e.g. both `__picCounts = {..}` and
/// `__picCounts = __picCounts || {..}`
fn assigned_literals(script: &str) -> Vec<&str> {
    script
        .match_indices(TABLE_NAME)
        .filter_map(|(at, _)| {
            let rest = &script[at + TABLE_NAME.len()..];
            let open = rest.find('{')?;
            let lead = &rest[..open];
            if lead.contains(';') || !lead.contains('=') {
                return None;
            }
            balanced_literal(&rest[open..])
        })
        .collect()
}

/// Slice from the opening `{` to its matching `}`, skipping braces inside
/// strings and comments
fn balanced_literal(text: &str) -> Option<&str> {
    let bytes = text.as_bytes();
    let mut depth = 0usize;
    let mut quote: Option<u8> = None;
    let mut i = 0;

    while i < bytes.len() {
        let b = bytes[i];
        match quote {
            Some(q) => {
                if b == b'\\' {
                    i += 1;
                } else if b == q {
                    quote = None;
                }
            }
            None => match b {
                b'"' | b'\'' => quote = Some(b),
                b'/' if bytes.get(i + 1) == Some(&b'/') => {
                    i = text[i..].find('\n').map_or(bytes.len(), |n| i + n);
                }
                b'/' if bytes.get(i + 1) == Some(&b'*') => {
                    i = text[i + 2..].find("*/").map_or(bytes.len(), |n| i + 2 + n + 1);
                }
                b'{' => depth += 1,
                b'}' => {
                    depth = depth.saturating_sub(1);
                    if depth == 0 {
                        return Some(&text[..=i]);
                    }
                }
                _ => {}
            },
        }
        i += 1;
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_bare_keys() {
        let script = "window.__picCounts = {h: 800, v: 1000, ys: 750, tx: 900, mia: 250, a: 620};";
        let table = CountTable::parse_script(script).unwrap();
        assert_eq!(table.len(), 6);
        assert_eq!(table.count_for(Category::Horizontal), 800);
        assert_eq!(table.count_for(Category::Shitone), 620);
    }

    #[test]
    fn test_parse_quoted_keys_and_trailing_comma() {
        let script = "var x = 1;\nwindow.__picCounts={\"h\":10,'v':20,\n};\nconsole.log(x);";
        let table = CountTable::parse_script(script).unwrap();
        assert_eq!(table.get("h"), Some(10));
        assert_eq!(table.get("v"), Some(20));
    }

    #[test]
    fn test_missing_key_falls_back() {
        let table = CountTable::parse_script("window.__picCounts = {h: 5}").unwrap();
        assert_eq!(table.count_for(Category::Horizontal), 5);
        assert_eq!(table.count_for(Category::Mia), 248);
    }

    #[test]
    fn test_script_without_table() {
        let err = CountTable::parse_script("console.log('hello')").unwrap_err();
        assert!(matches!(err, CountError::MissingTable));
    }

    #[test]
    fn test_non_numeric_count_is_malformed() {
        let err = CountTable::parse_script("window.__picCounts = {h: 'many'}").unwrap_err();
        assert!(matches!(err, CountError::Malformed(_)));
    }

    #[test]
    fn test_keep_existing_table_idiom() {
        let script = "window.__picCounts = window.__picCounts || {h: 800, v: 1000};";
        let table = CountTable::parse_script(script).unwrap();
        assert_eq!(table.get("h"), Some(800));
        assert_eq!(table.get("v"), Some(1000));
    }

    #[test]
    fn test_comments_inside_literal() {
        let script = "window.__picCounts = {\n  h: 800, // horizontal\n  /* vertical } */ v: 1000\n};";
        let table = CountTable::parse_script(script).unwrap();
        assert_eq!(table.get("h"), Some(800));
        assert_eq!(table.get("v"), Some(1000));
    }

    #[test]
    fn test_reads_past_a_non_assignment_mention() {
        let script = "if (!window.__picCounts) { console.log('loading'); }\nwindow.__picCounts = {mia: 300};";
        let table = CountTable::parse_script(script).unwrap();
        assert_eq!(table.count_for(Category::Mia), 300);
    }

    #[test]
    fn test_last_assignment_wins() {
        let script = "window.__picCounts = {h: 1};\nwindow.__picCounts = {h: 2};";
        let table = CountTable::parse_script(script).unwrap();
        assert_eq!(table.get("h"), Some(2));
    }
}
