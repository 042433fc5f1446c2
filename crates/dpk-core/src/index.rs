use std::fmt;

use miette::Diagnostic;
use thiserror::Error;

use crate::package::{Package, PackageParseError};
use crate::raw_index::{RawIndex, RawIndexError};
use crate::requirement::Requirement;
use crate::version::VersionError;

#[derive(Debug, Clone, PartialEq, Eq, Error, Diagnostic)]
pub enum IndexError {
    #[error(transparent)]
    #[diagnostic(transparent)]
    Raw(#[from] RawIndexError),

    #[error("Failed to parse index entry for \"{package}\": {source}")]
    Parse {
        package: String,
        #[source]
        source: PackageParseError,
    },
}

/// An ordered collection of packages from one or more repositories.
///
/// A package's position in [`PackageIndex::packages`] is its identity
/// throughout resolution.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PackageIndex {
    pub packages: Vec<Package>,
}

impl PackageIndex {
    pub fn new(packages: Vec<Package>) -> Self {
        Self { packages }
    }

    /// Parse the text of an extracted `APKINDEX` file.
    pub fn parse(text: &str) -> Result<Self, IndexError> {
        Self::from_raw(&RawIndex::parse(text)?)
    }

    pub fn from_raw(raw: &RawIndex) -> Result<Self, IndexError> {
        let packages = raw
            .entries
            .iter()
            .map(|entry| {
                Package::from_raw(entry).map_err(|source| IndexError::Parse {
                    package: entry.lookup('P').unwrap_or("UNKNOWN").to_string(),
                    source,
                })
            })
            .collect::<Result<Vec<_>, _>>()?;
        tracing::debug!("parsed {} package(s) from index", packages.len());
        Ok(Self { packages })
    }

    /// Concatenate indexes, keeping their order.
    pub fn merge<I: IntoIterator<Item = PackageIndex>>(indexes: I) -> Self {
        Self {
            packages: indexes.into_iter().flat_map(|index| index.packages).collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.packages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.packages.is_empty()
    }

    pub fn first(&self, name: &str) -> Option<&Package> {
        self.packages.iter().find(|package| package.name == name)
    }

    pub fn filter<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a Package> + 'a {
        self.packages.iter().filter(move |package| package.name == name)
    }

    /// Position of the first package named by `requirement` whose version satisfies it.
    pub fn resolve_index(&self, requirement: &Requirement) -> Result<Option<usize>, VersionError> {
        for (index, package) in self.packages.iter().enumerate() {
            if requirement.matches(&package.name, &package.version)? {
                return Ok(Some(index));
            }
        }
        Ok(None)
    }

    pub fn resolve(&self, requirement: &Requirement) -> Result<Option<&Package>, VersionError> {
        Ok(self
            .resolve_index(requirement)?
            .map(|index| &self.packages[index]))
    }
}

impl fmt::Display for PackageIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, package) in self.packages.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "{package}")?;
        }
        Ok(())
    }
}
