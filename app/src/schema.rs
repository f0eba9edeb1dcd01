// ==============================================================================
// schema.rs - Field Schema and Record Access
// ==============================================================================
// Description: Name-to-index lookup for tabular records and per-record field
//              access used by compiled templates
// Author: Matt Barham
// Created: 2026-10-16
// Modified: 2026-10-16
// Version: 1.0.0
// ==============================================================================
// The schema is consulted only while compiling a template. Once compiled, a
// template addresses record fields purely by index.
// ==============================================================================

use std::collections::HashMap;
use thiserror::Error;

use crate::template::ApplyError;

/// Field name could not be resolved against a schema
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("no field named '{0}'")]
pub struct FieldNotFound(pub String);

/// Compile-time name-to-index table for a tabular record source
pub trait FieldSchema {
    /// Resolve a field name to its position in every record of this source
    fn find_field(&self, name: &str) -> Result<usize, FieldNotFound>;
}

/// Column header of a delimited table
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Header {
    names: Vec<String>,
    index: HashMap<String, usize>,
}

impl Header {
    /// Build a header from column names in file order
    ///
    /// Duplicate column names resolve to their first occurrence.
    pub fn new<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let names: Vec<String> = names.into_iter().map(Into::into).collect();
        let mut index = HashMap::with_capacity(names.len());
        for (position, name) in names.iter().enumerate() {
            index.entry(name.clone()).or_insert(position);
        }
        Self { names, index }
    }

    /// Column names in file order
    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

impl FieldSchema for Header {
    fn find_field(&self, name: &str) -> Result<usize, FieldNotFound> {
        self.index
            .get(name)
            .copied()
            .ok_or_else(|| FieldNotFound(name.to_string()))
    }
}

impl FieldSchema for HashMap<String, usize> {
    fn find_field(&self, name: &str) -> Result<usize, FieldNotFound> {
        self.get(name)
            .copied()
            .ok_or_else(|| FieldNotFound(name.to_string()))
    }
}

/// Tokens that coerce to `false` (compared trimmed and lowercased)
const FALSE_TOKENS: &[&str] = &[
    "0", "false", "f", "no", "n", "off", "none", "null", "na", "n/a", ".", "-",
];

/// Canonical boolean coercion for a field value
///
/// A value is true when it is non-empty after trimming and is not one of the
/// recognized "false" tokens.
///
/// # Examples
/// ```
/// use line_template::schema::coerce_flag;
///
/// assert!(coerce_flag("yes"));
/// assert!(coerce_flag("1"));
/// assert!(!coerce_flag(""));
/// assert!(!coerce_flag(" False "));
/// assert!(!coerce_flag("N/A"));
/// ```
pub fn coerce_flag(value: &str) -> bool {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return false;
    }
    let lowered = trimmed.to_ascii_lowercase();
    !FALSE_TOKENS.contains(&lowered.as_str())
}

/// One row of field values presented to a compiled template
///
/// Indices handed to a record always come from the schema the template was
/// compiled against, so implementations may assume they are in range.
pub trait Record {
    /// Value of the field at `index`
    fn field(&self, index: usize) -> &str;

    /// Boolean reading of the field at `index`, used by `$if`
    fn flag(&self, index: usize) -> Result<bool, ApplyError> {
        Ok(coerce_flag(self.field(index)))
    }
}

impl Record for [String] {
    fn field(&self, index: usize) -> &str {
        self.get(index).map_or("", String::as_str)
    }
}

impl Record for Vec<String> {
    fn field(&self, index: usize) -> &str {
        self.as_slice().field(index)
    }
}

impl<'a> Record for [&'a str] {
    fn field(&self, index: usize) -> &str {
        self.get(index).copied().unwrap_or("")
    }
}

impl<'a> Record for Vec<&'a str> {
    fn field(&self, index: usize) -> &str {
        self.as_slice().field(index)
    }
}

impl<'a, const N: usize> Record for [&'a str; N] {
    fn field(&self, index: usize) -> &str {
        self.as_slice().field(index)
    }
}

impl Record for csv::StringRecord {
    fn field(&self, index: usize) -> &str {
        self.get(index).unwrap_or("")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_header_lookup() {
        let header = Header::new(["gene", "product", "type"]);

        assert_eq!(header.find_field("gene").unwrap(), 0);
        assert_eq!(header.find_field("type").unwrap(), 2);
        assert_eq!(header.len(), 3);
        assert_eq!(
            header.find_field("strand").unwrap_err(),
            FieldNotFound("strand".to_string())
        );
    }

    #[test]
    fn test_header_duplicate_names_resolve_to_first() {
        let header = Header::new(["id", "note", "note"]);
        assert_eq!(header.find_field("note").unwrap(), 1);
    }

    #[test]
    fn test_hashmap_schema() {
        let mut schema = HashMap::new();
        schema.insert("x".to_string(), 4usize);
        assert_eq!(schema.find_field("x").unwrap(), 4);
        assert!(schema.find_field("y").is_err());
    }

    #[test]
    fn test_coerce_flag_tokens() {
        for value in ["1", "true", "Yes", "plus", "anything"] {
            assert!(coerce_flag(value), "{value} should be true");
        }
        for value in ["", "   ", "0", "FALSE", "f", "no", "N", "off", "None", "null", "NA", "n/a", ".", "-"] {
            assert!(!coerce_flag(value), "{value:?} should be false");
        }
    }

    #[test]
    fn test_record_impls() {
        let owned = vec!["a".to_string(), "b".to_string()];
        assert_eq!(owned.field(1), "b");

        let borrowed = ["x", "0"];
        assert_eq!(borrowed.field(0), "x");
        assert!(!borrowed.flag(1).unwrap());

        let string_record = csv::StringRecord::from(vec!["p", "q"]);
        assert_eq!(string_record.field(1), "q");
        assert!(string_record.flag(0).unwrap());
    }
}
