use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use miette::Diagnostic;
use serde::{Serialize, Serializer};
use thiserror::Error;

use crate::version::{self, CompareMode, VersionError};

/// Errors raised while parsing a requirement or a provided capability.
#[derive(Debug, Clone, PartialEq, Eq, Error, Diagnostic)]
pub enum RequirementError {
    #[error("Invalid version specification \"{token}\"")]
    #[diagnostic(help("Requirements look like name, !name, name=1.0, name>=1.2-r3 or name~1.2"))]
    BrokenSpec { token: String },

    #[error("Invalid provision \"{token}\", expected name or name=version")]
    BadProvision { token: String },
}

/// Version comparison operator of a constraint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operator {
    Equals,
    FuzzyEquals,
    Greater,
    Less,
    GreaterEqual,
    LessEqual,
    GreaterFuzzy,
    LessFuzzy,
}

const EQUALS: u8 = 1 << 0;
const LESS: u8 = 1 << 1;
const GREATER: u8 = 1 << 2;
const FUZZY: u8 = 1 << 3;

impl Operator {
    /// Map a set of comparator bits to an operator, if the combination is legal.
    fn from_bits(bits: u8) -> Option<Self> {
        match bits {
            EQUALS => Some(Self::Equals),
            LESS => Some(Self::Less),
            GREATER => Some(Self::Greater),
            b if b == EQUALS | LESS => Some(Self::LessEqual),
            b if b == EQUALS | GREATER => Some(Self::GreaterEqual),
            b if b == FUZZY | EQUALS || b == FUZZY => Some(Self::FuzzyEquals),
            b if b == FUZZY | EQUALS | LESS => Some(Self::LessFuzzy),
            b if b == FUZZY | EQUALS | GREATER => Some(Self::GreaterFuzzy),
            _ => None,
        }
    }

    /// Whether a comparison result (package version against constraint
    /// version) passes this operator.
    fn accepts(self, ordering: Ordering) -> bool {
        match self {
            Self::Equals | Self::FuzzyEquals => ordering == Ordering::Equal,
            Self::Less => ordering == Ordering::Less,
            Self::Greater => ordering == Ordering::Greater,
            Self::LessEqual | Self::LessFuzzy => ordering != Ordering::Greater,
            Self::GreaterEqual | Self::GreaterFuzzy => ordering != Ordering::Less,
        }
    }

    fn is_fuzzy(self) -> bool {
        matches!(self, Self::FuzzyEquals | Self::LessFuzzy | Self::GreaterFuzzy)
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Equals => "=",
            Self::FuzzyEquals => "~",
            Self::Greater => ">",
            Self::Less => "<",
            Self::GreaterEqual => ">=",
            Self::LessEqual => "<=",
            Self::GreaterFuzzy => ">~",
            Self::LessFuzzy => "<~",
        };
        f.write_str(s)
    }
}

/// The version part of a requirement.
///
/// `invert` marks a conflict (`!name`); it does not change which versions
/// match.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum VersionSpec {
    Any {
        invert: bool,
    },
    Constraint {
        invert: bool,
        op: Operator,
        version: String,
    },
}

impl VersionSpec {
    pub fn is_conflict(&self) -> bool {
        match self {
            Self::Any { invert } | Self::Constraint { invert, .. } => *invert,
        }
    }

    /// Check a package version against this specification.
    ///
    /// The package version is the left operand of the comparison.
    pub fn satisfied_by(&self, package_version: &str) -> Result<bool, VersionError> {
        match self {
            Self::Any { .. } => Ok(true),
            Self::Constraint { op, version, .. } => {
                let mode = if op.is_fuzzy() {
                    CompareMode::Fuzzy
                } else {
                    CompareMode::Normal
                };
                let ordering = version::compare(package_version, version, mode)?;
                Ok(op.accepts(ordering))
            }
        }
    }
}

impl fmt::Display for VersionSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Any { .. } => Ok(()),
            Self::Constraint { op, version, .. } => write!(f, "{op}{version}"),
        }
    }
}

/// A dependency, install-if condition or conflict: a package name plus a
/// version specification.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Requirement {
    pub name: String,
    pub spec: VersionSpec,
}

impl Requirement {
    /// A requirement on any version of `name`.
    pub fn any(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            spec: VersionSpec::Any { invert: false },
        }
    }

    /// Parse a token such as `so:libc.musl-x86_64.so.1`, `busybox>=1.36`,
    /// `!alsa-lib<1.2.14-r0` or `!doas`.
    pub fn parse(token: &str) -> Result<Self, RequirementError> {
        let broken = || RequirementError::BrokenSpec {
            token: token.to_string(),
        };

        let (invert, body) = match token.strip_prefix('!') {
            Some(rest) => (true, rest),
            None => (false, token),
        };

        let is_comparator = |c: char| matches!(c, '<' | '=' | '>' | '~');
        let Some(start) = body.find(is_comparator) else {
            if body.is_empty() {
                return Err(broken());
            }
            return Ok(Self {
                name: body.to_string(),
                spec: VersionSpec::Any { invert },
            });
        };

        let run = body[start..]
            .find(|c: char| !is_comparator(c))
            .map_or(body.len(), |len| start + len);
        let (name, comparators, version) = (&body[..start], &body[start..run], &body[run..]);
        if name.is_empty() || version.is_empty() {
            return Err(broken());
        }

        let bits = comparators.bytes().fold(0u8, |bits, c| {
            bits | match c {
                b'<' => LESS,
                b'=' => EQUALS,
                b'>' => GREATER,
                _ => FUZZY | EQUALS,
            }
        });
        let op = Operator::from_bits(bits).ok_or_else(broken)?;

        Ok(Self {
            name: name.to_string(),
            spec: VersionSpec::Constraint {
                invert,
                op,
                version: version.to_string(),
            },
        })
    }

    pub fn is_conflict(&self) -> bool {
        self.spec.is_conflict()
    }

    /// Check whether a package called `name` at `version` meets this requirement.
    pub fn matches(&self, name: &str, version: &str) -> Result<bool, VersionError> {
        if self.name != name {
            return Ok(false);
        }
        self.spec.satisfied_by(version)
    }
}

impl FromStr for Requirement {
    type Err = RequirementError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for Requirement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_conflict() {
            f.write_str("!")?;
        }
        write!(f, "{}{}", self.name, self.spec)
    }
}

impl Serialize for Requirement {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Something a package provides: either a bare name, or a name at a
/// specific version.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Capability {
    Any { name: String },
    Specific { name: String, version: String },
}

impl Capability {
    /// Parse a `p:` entry, which is either `name` or `name=version`.
    pub fn parse(token: &str) -> Result<Self, RequirementError> {
        let bad = || RequirementError::BadProvision {
            token: token.to_string(),
        };
        let requirement = Requirement::parse(token).map_err(|_| bad())?;
        match requirement.spec {
            VersionSpec::Any { invert: false } => Ok(Self::Any {
                name: requirement.name,
            }),
            VersionSpec::Constraint {
                invert: false,
                op: Operator::Equals,
                version,
            } => Ok(Self::Specific {
                name: requirement.name,
                version,
            }),
            _ => Err(bad()),
        }
    }

    pub fn name(&self) -> &str {
        match self {
            Self::Any { name } | Self::Specific { name, .. } => name,
        }
    }

    /// Whether this capability can stand in for `requirement`.
    ///
    /// An unversioned capability only satisfies unversioned requirements.
    pub fn satisfies(&self, requirement: &Requirement) -> Result<bool, VersionError> {
        if self.name() != requirement.name {
            return Ok(false);
        }
        match self {
            Self::Any { .. } => Ok(matches!(requirement.spec, VersionSpec::Any { .. })),
            Self::Specific { version, .. } => requirement.spec.satisfied_by(version),
        }
    }
}

impl FromStr for Capability {
    type Err = RequirementError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for Capability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Any { name } => f.write_str(name),
            Self::Specific { name, version } => write!(f, "{name}={version}"),
        }
    }
}

impl Serialize for Capability {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}
