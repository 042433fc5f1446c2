//! The plain-text `APKINDEX` record format.
//!
//! An index is a list of entries separated by blank lines. Every line of an
//! entry is a single-character key, a colon, and the value:
//!
//! ```text
//! C:Q1fAC5FUAUZuBpW1uE01XS4pCKcYg=
//! P:busybox
//! V:1.37.0-r8
//! ```

use miette::Diagnostic;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error, Diagnostic)]
pub enum RawIndexError {
    #[error("Malformed key-value pair on line {line}")]
    #[diagnostic(help("Every index line must look like `K:value` with a single-character key"))]
    BadPair { line: usize },
}

/// One `K:value` line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
    pub key: char,
    pub value: String,
}

/// The records of one package, in file order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawIndexEntry {
    pub fields: Vec<Record>,
}

impl RawIndexEntry {
    /// First value stored under `key`.
    pub fn lookup(&self, key: char) -> Option<&str> {
        self.fields
            .iter()
            .find(|record| record.key == key)
            .map(|record| record.value.as_str())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawIndex {
    pub entries: Vec<RawIndexEntry>,
}

impl RawIndex {
    /// Split `text` into entries of records. Line numbers in errors are 1-based.
    pub fn parse(text: &str) -> Result<Self, RawIndexError> {
        let mut entries = Vec::new();
        let mut current = RawIndexEntry::default();

        for (number, line) in text.lines().enumerate() {
            if line.trim().is_empty() {
                if !current.fields.is_empty() {
                    entries.push(std::mem::take(&mut current));
                }
                continue;
            }
            current.fields.push(parse_record(line).ok_or(RawIndexError::BadPair { line: number + 1 })?);
        }
        if !current.fields.is_empty() {
            entries.push(current);
        }

        Ok(Self { entries })
    }
}

fn parse_record(line: &str) -> Option<Record> {
    let mut chars = line.chars();
    let key = chars.next().filter(|&c| c != ':')?;
    let value = chars.as_str().strip_prefix(':')?;
    Some(Record {
        key,
        value: value.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn entries_split_on_blank_lines() {
        let text = "P:a\nV:1\n\n  \n\nP:b\nV:2\n";
        let index = RawIndex::parse(text).unwrap();
        assert_eq!(index.entries.len(), 2);
        assert_eq!(index.entries[1].lookup('P'), Some("b"));
    }

    #[test]
    fn value_may_contain_colons() {
        let index = RawIndex::parse("p:so:libc.musl-x86_64.so.1=1").unwrap();
        assert_eq!(index.entries[0].lookup('p'), Some("so:libc.musl-x86_64.so.1=1"));
    }

    #[test]
    fn empty_value_is_allowed() {
        let index = RawIndex::parse("D:").unwrap();
        assert_eq!(index.entries[0].lookup('D'), Some(""));
    }

    #[test]
    fn lookup_returns_first_value() {
        let index = RawIndex::parse("P:first\nP:second").unwrap();
        assert_eq!(index.entries[0].lookup('P'), Some("first"));
        assert_eq!(index.entries[0].lookup('Q'), None);
    }

    #[test]
    fn malformed_lines() {
        assert_eq!(
            RawIndex::parse("P:a\nbad line").unwrap_err(),
            RawIndexError::BadPair { line: 2 }
        );
        assert!(RawIndex::parse("PP:a").is_err());
        assert!(RawIndex::parse(":a").is_err());
        assert!(RawIndex::parse("P").is_err());
    }

    #[test]
    fn empty_text_has_no_entries() {
        assert!(RawIndex::parse("").unwrap().entries.is_empty());
        assert!(RawIndex::parse("\n\n").unwrap().entries.is_empty());
    }
}
