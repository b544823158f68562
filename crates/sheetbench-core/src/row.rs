//! Row mappings

use std::fmt;

use indexmap::IndexMap;

use crate::value::Value;

/// One data row: column name -> decoded value, in source column order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Row {
    cells: IndexMap<String, Value>,
}

impl Row {
    /// Create an empty row
    pub fn new() -> Self {
        Self::default()
    }

    /// Pair each header with the value at the same position.
    ///
    /// The shorter side wins: trailing values without a header are dropped,
    /// trailing headers without a value are absent from the row. A repeated
    /// header keeps its first position and its last value.
    pub fn zip<I>(headers: &[String], values: I) -> Self
    where
        I: IntoIterator<Item = Value>,
    {
        let mut cells = IndexMap::with_capacity(headers.len());
        for (header, value) in headers.iter().zip(values) {
            cells.insert(header.clone(), value);
        }
        Self { cells }
    }

    /// Insert or replace a cell
    pub fn insert<K: Into<String>, V: Into<Value>>(&mut self, key: K, value: V) {
        self.cells.insert(key.into(), value.into());
    }

    /// Look up a cell by column name
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.cells.get(key)
    }

    /// Column names in order
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.cells.keys().map(String::as_str)
    }

    /// Cells in order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.cells.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Number of cells
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// Check if the row has no cells
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }
}

impl fmt::Display for Row {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("{")?;
        for (i, (key, value)) in self.cells.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{key:?}: ")?;
            value.write_repr(f)?;
        }
        f.write_str("}")
    }
}

/// Turn a header row into column names.
///
/// Every cell goes through the value's display form; an empty header cell
/// becomes the empty string.
pub fn header_names<I>(cells: I) -> Vec<String>
where
    I: IntoIterator<Item = Value>,
{
    cells.into_iter().map(|v| v.to_string()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;

    fn headers(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_zip_keeps_column_order() {
        let row = Row::zip(
            &headers(&["b", "a", "c"]),
            vec![Value::Int(1), Value::Int(2), Value::Int(3)],
        );
        assert_eq!(row.keys().collect::<Vec<_>>(), vec!["b", "a", "c"]);
        assert_eq!(row.get("a"), Some(&Value::Int(2)));
    }

    #[test]
    fn test_zip_truncates_to_shorter_side() {
        let row = Row::zip(&headers(&["a", "b"]), vec![Value::Int(1)]);
        assert_eq!(row.len(), 1);
        assert_eq!(row.get("b"), None);

        let row = Row::zip(&headers(&["a"]), vec![Value::Int(1), Value::Int(2)]);
        assert_eq!(row.len(), 1);
    }

    #[test]
    fn test_duplicate_header_keeps_first_slot_last_value() {
        let row = Row::zip(
            &headers(&["x", "y", "x"]),
            vec![Value::Int(1), Value::Int(2), Value::Int(3)],
        );
        assert_eq!(row.keys().collect::<Vec<_>>(), vec!["x", "y"]);
        assert_eq!(row.get("x"), Some(&Value::Int(3)));
    }

    #[test]
    fn test_header_names_stringify_cells() {
        let names = header_names(vec![
            Value::from("number"),
            Value::Float(2.0),
            Value::Null,
            Value::Int(3),
        ]);
        assert_eq!(names, headers(&["number", "2.0", "", "3"]));
    }

    #[test]
    fn test_display() {
        let mut row = Row::new();
        row.insert("number", 1i64);
        row.insert("text", "CONTROL ROW");
        row.insert("blank", Value::Null);
        assert_eq!(
            row.to_string(),
            r#"{"number": 1, "text": "CONTROL ROW", "blank": null}"#
        );
    }

    proptest! {
        #[test]
        fn prop_keys_follow_unique_headers(
            names in proptest::collection::hash_set("[a-z]{1,6}", 1..8),
            fill in 0i64..1000,
        ) {
            let names: Vec<String> = names.into_iter().collect();
            let row = Row::zip(&names, names.iter().map(|_| Value::Int(fill)));
            let keys: Vec<&str> = row.keys().collect();
            let expected: Vec<&str> = names.iter().map(String::as_str).collect();
            prop_assert_eq!(keys, expected);
        }

        #[test]
        fn prop_key_set_is_stable_across_rows(
            names in proptest::collection::hash_set("[a-z]{1,6}", 1..8),
            a in proptest::collection::vec(any::<i64>(), 8),
            b in proptest::collection::vec(any::<bool>(), 8),
        ) {
            let names: Vec<String> = names.into_iter().collect();
            let first = Row::zip(&names, a.into_iter().map(Value::Int));
            let second = Row::zip(&names, b.into_iter().map(Value::Bool));
            prop_assert_eq!(first.keys().collect::<Vec<_>>(), second.keys().collect::<Vec<_>>());
        }
    }
}
