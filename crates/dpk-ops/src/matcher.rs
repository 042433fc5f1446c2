//! Pattern matching for `dpk search`.

use globset::{GlobBuilder, GlobMatcher};
use regex::{Regex, RegexBuilder};

use dpk_util::errors::DpkError;

/// How search patterns are interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MatchMode {
    /// The whole field must equal a pattern.
    Exact,
    /// Shell-style wildcards. A pattern without `*?[]` matches as a substring.
    #[default]
    Glob,
    /// Regular expressions, matched anywhere in the field.
    Regex,
}

/// A compiled set of patterns. A field matches if any pattern matches it.
#[derive(Debug, Clone)]
pub enum Matcher {
    Exact {
        patterns: Vec<String>,
        ignore_case: bool,
    },
    Glob(Vec<GlobPattern>),
    Regex(Vec<Regex>),
}

#[derive(Debug, Clone)]
pub enum GlobPattern {
    Wildcard(GlobMatcher),
    /// Stored lowercased when matching ignores case.
    Substring { needle: String, ignore_case: bool },
}

const GLOB_CHARS: &[char] = &['*', '?', '[', ']'];

impl Matcher {
    pub fn new(patterns: &[String], mode: MatchMode, ignore_case: bool) -> miette::Result<Self> {
        let matcher = match mode {
            MatchMode::Exact => Self::Exact {
                patterns: patterns.to_vec(),
                ignore_case,
            },
            MatchMode::Glob => Self::Glob(
                patterns
                    .iter()
                    .map(|p| glob_pattern(p, ignore_case))
                    .collect::<miette::Result<_>>()?,
            ),
            MatchMode::Regex => Self::Regex(
                patterns
                    .iter()
                    .map(|p| {
                        RegexBuilder::new(p)
                            .case_insensitive(ignore_case)
                            .build()
                            .map_err(|e| bad_pattern(p, e))
                    })
                    .collect::<miette::Result<_>>()?,
            ),
        };
        Ok(matcher)
    }

    pub fn is_match(&self, field: &str) -> bool {
        match self {
            Self::Exact {
                patterns,
                ignore_case,
            } => patterns.iter().any(|p| {
                if *ignore_case {
                    p.to_lowercase() == field.to_lowercase()
                } else {
                    p == field
                }
            }),
            Self::Glob(patterns) => patterns.iter().any(|p| p.is_match(field)),
            Self::Regex(patterns) => patterns.iter().any(|re| re.is_match(field)),
        }
    }
}

impl GlobPattern {
    pub fn is_match(&self, field: &str) -> bool {
        match self {
            Self::Wildcard(glob) => glob.is_match(field),
            Self::Substring { needle, ignore_case } => {
                if *ignore_case {
                    field.to_lowercase().contains(needle.as_str())
                } else {
                    field.contains(needle.as_str())
                }
            }
        }
    }
}

fn glob_pattern(pattern: &str, ignore_case: bool) -> miette::Result<GlobPattern> {
    if !pattern.contains(GLOB_CHARS) {
        let needle = if ignore_case {
            pattern.to_lowercase()
        } else {
            pattern.to_string()
        };
        return Ok(GlobPattern::Substring {
            needle,
            ignore_case,
        });
    }
    let glob = GlobBuilder::new(pattern)
        .case_insensitive(ignore_case)
        .literal_separator(false)
        .build()
        .map_err(|e| bad_pattern(pattern, e))?;
    Ok(GlobPattern::Wildcard(glob.compile_matcher()))
}

fn bad_pattern(pattern: &str, err: impl std::fmt::Display) -> miette::Report {
    DpkError::Generic {
        message: format!("Bad pattern \"{pattern}\": {err}"),
    }
    .into()
}
