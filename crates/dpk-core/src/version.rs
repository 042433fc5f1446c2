//! APK version validation and comparison.
//!
//! Versions are compared token by token (see [`crate::version_reader`]):
//! - Numeric components compare as numbers, unless either side is
//!   zero-padded, in which case the digit runs compare as byte strings
//! - Suffixes rank `alpha` < `beta` < `pre` < `rc` < `cvs` < `svn` < `git` < `hg` < `p`
//! - A pre-release suffix sorts before the bare release: `1.0_rc1 < 1.0`
//! - Otherwise the side that runs out of components first is the lesser:
//!   `1.2 < 1.2.3`, `1.0 < 1.0-r1`

use std::cmp::Ordering;

use miette::Diagnostic;
use thiserror::Error;

use crate::version_reader::{LexError, Token, TokenKind, VersionReader};

/// How trailing components are treated when one side is a prefix of the other.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CompareMode {
    #[default]
    Normal,
    /// The right-hand version matches any version it is a prefix of,
    /// so `1.2.3` compares equal to `1.2`.
    Fuzzy,
}

#[derive(Debug, Clone, PartialEq, Eq, Error, Diagnostic)]
pub enum VersionError {
    #[error("Invalid version \"{version}\" (unexpected input at byte {offset})")]
    #[diagnostic(help(
        "APK versions look like 1.2.3, 1.2.3a, 1.2.3_rc1, 1.2.3~cafe or 1.2.3-r4"
    ))]
    Invalid { version: String, offset: usize },
}

impl VersionError {
    fn at(version: &str, err: LexError) -> Self {
        Self::Invalid {
            version: version.to_string(),
            offset: err.offset,
        }
    }
}

/// Returns `true` if the whole string is a well-formed version.
pub fn validate(version: &str) -> bool {
    VersionReader::new(version).finish().is_ok()
}

/// Compare two version strings.
///
/// Fails if either string is malformed anywhere, even past the point where
/// the comparison was decided.
pub fn compare(a: &str, b: &str, mode: CompareMode) -> Result<Ordering, VersionError> {
    if a == b {
        return Ok(Ordering::Equal);
    }

    let mut read_a = VersionReader::new(a);
    let mut read_b = VersionReader::new(b);

    let outcome = loop {
        let token_a = read_a.next_token().map_err(|e| VersionError::at(a, e))?;
        let token_b = read_b.next_token().map_err(|e| VersionError::at(b, e))?;
        match compare_tokens(&token_a, &token_b) {
            Some(Ordering::Equal) => continue,
            Some(ord) => break ord,
            None => break resolve_divergence(&token_a, &token_b, mode),
        }
    };

    read_a.finish().map_err(|e| VersionError::at(a, e))?;
    read_b.finish().map_err(|e| VersionError::at(b, e))?;
    Ok(outcome)
}

/// Order two same-kind tokens. `None` when the kinds differ or both are `End`.
fn compare_tokens(a: &Token<'_>, b: &Token<'_>) -> Option<Ordering> {
    match (a, b) {
        (
            Token::Digit {
                number: lhs,
                initial: lhs_initial,
            },
            Token::Digit {
                number: rhs,
                initial: rhs_initial,
            },
        ) => {
            let padded = lhs.digits().starts_with(b"0") || rhs.digits().starts_with(b"0");
            if padded && !lhs_initial && !rhs_initial {
                Some(lhs.digits().cmp(rhs.digits()))
            } else {
                Some(lhs.cmp_value(rhs))
            }
        }
        (Token::Letter(lhs), Token::Letter(rhs)) => Some(lhs.cmp(rhs)),
        (Token::Suffix(lhs), Token::Suffix(rhs)) => Some(lhs.cmp(rhs)),
        (Token::SuffixNumber(lhs), Token::SuffixNumber(rhs)) => Some(lhs.cmp_value(rhs)),
        (Token::CommitHash(lhs), Token::CommitHash(rhs)) => Some(lhs.cmp(rhs)),
        (Token::Revision(lhs), Token::Revision(rhs)) => Some(lhs.cmp_value(rhs)),
        _ => None,
    }
}

fn resolve_divergence(a: &Token<'_>, b: &Token<'_>, mode: CompareMode) -> Ordering {
    if a.kind() == b.kind() || (mode == CompareMode::Fuzzy && b.kind() == TokenKind::End) {
        return Ordering::Equal;
    }
    if a.is_pre_release() {
        Ordering::Less
    } else if b.is_pre_release() {
        Ordering::Greater
    } else {
        // Higher rank means fewer significant components left.
        b.kind().cmp(&a.kind())
    }
}
