use std::fmt;

use miette::Diagnostic;
use serde::Serialize;
use thiserror::Error;

use crate::digest::IndexDigest;
use crate::raw_index::RawIndexEntry;
use crate::requirement::{Capability, Requirement};

/// Keys only found in the installed-package database, not in repository indexes.
const INSTALLED_DB_KEYS: &[char] = &['F', 'M', 'R', 'Z', 'r', 'q', 'a', 's', 'f'];

/// Errors raised while reading a package entry from an index.
#[derive(Debug, Clone, PartialEq, Eq, Error, Diagnostic)]
pub enum PackageParseError {
    #[error("Bad value for key \"{key}\": {cause}")]
    BadValue { key: char, cause: String },

    #[error("Unexpected key \"{key}\"")]
    UnexpectedKey { key: char },

    #[error("Missing required key \"{key}\"")]
    Required { key: char },
}

/// A package as described by a repository index.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Package {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub checksum: Option<IndexDigest>,
    pub name: String,
    pub version: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub architecture: Option<String>,
    pub size: u64,
    pub installed_size: u64,
    pub description: String,
    pub url: String,
    pub license: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub origin: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub maintainer: Option<String>,
    /// Build time in seconds since the Unix epoch.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub build_time: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub commit: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub provider_priority: Option<u16>,
    pub dependencies: Vec<Requirement>,
    pub provides: Vec<Capability>,
    pub install_if: Vec<Requirement>,
}

impl Package {
    /// A bare package with only a name and version.
    pub fn new(name: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            version: version.into(),
            ..Self::default()
        }
    }

    /// Build a package from the records of one index entry.
    pub fn from_raw(entry: &RawIndexEntry) -> Result<Self, PackageParseError> {
        let mut package = Self::default();
        let (mut checksum, mut name, mut version, mut description) = (None, None, None, None);
        let (mut url, mut license, mut size, mut installed_size) = (None, None, None, None);

        for record in &entry.fields {
            let key = record.key;
            let value = record.value.as_str();
            match key {
                'C' => {
                    checksum = Some(IndexDigest::decode(value).ok_or_else(|| {
                        bad_value(key, "invalid digest")
                    })?)
                }
                'P' => name = Some(value.to_string()),
                'V' => version = Some(value.to_string()),
                'T' => description = Some(value.to_string()),
                'U' => url = Some(value.to_string()),
                'L' => license = Some(value.to_string()),
                'S' => size = Some(parse_number(key, value, "invalid size")?),
                'I' => installed_size = Some(parse_number(key, value, "invalid installed size")?),
                'A' => package.architecture = Some(value.to_string()),
                'D' => package.dependencies = parse_list(key, value, Requirement::parse)?,
                'p' => package.provides = parse_list(key, value, Capability::parse)?,
                'i' => package.install_if = parse_list(key, value, Requirement::parse)?,
                'o' => package.origin = Some(value.to_string()),
                'm' => package.maintainer = Some(value.to_string()),
                't' => package.build_time = Some(parse_number(key, value, "invalid build time")?),
                'c' => package.commit = Some(value.to_string()),
                'k' => {
                    let priority = value
                        .parse::<u16>()
                        .ok()
                        .filter(|&priority| priority < u16::MAX)
                        .ok_or_else(|| bad_value(key, "invalid provider priority"))?;
                    package.provider_priority = Some(priority);
                }
                k if INSTALLED_DB_KEYS.contains(&k) => {}
                k if k.is_lowercase() => {}
                k => return Err(PackageParseError::UnexpectedKey { key: k }),
            }
        }

        package.checksum = Some(required('C', checksum)?);
        package.name = required('P', name)?;
        package.version = required('V', version)?;
        package.description = required('T', description)?;
        package.url = required('U', url)?;
        package.license = required('L', license)?;
        package.size = required('S', size)?;
        package.installed_size = required('I', installed_size)?;
        Ok(package)
    }

    /// `name-version arch`, as shown in search results.
    pub fn name_description(&self) -> String {
        format!(
            "{}-{} {}",
            self.name,
            self.version,
            self.architecture.as_deref().unwrap_or_default()
        )
    }

    /// [`Self::name_description`] followed by the package description.
    pub fn short_description(&self) -> String {
        format!("{}\n \\_ {}", self.name_description(), self.description)
    }
}

fn bad_value(key: char, cause: impl Into<String>) -> PackageParseError {
    PackageParseError::BadValue {
        key,
        cause: cause.into(),
    }
}

fn required<T>(key: char, value: Option<T>) -> Result<T, PackageParseError> {
    value.ok_or(PackageParseError::Required { key })
}

fn parse_number(key: char, value: &str, cause: &str) -> Result<u64, PackageParseError> {
    value.parse().map_err(|_| bad_value(key, cause))
}

fn parse_list<T, E: fmt::Display>(
    key: char,
    value: &str,
    parse: impl Fn(&str) -> Result<T, E>,
) -> Result<Vec<T>, PackageParseError> {
    value
        .split_whitespace()
        .map(|token| parse(token).map_err(|e| bad_value(key, e.to_string())))
        .collect()
}

/// Byte count in decimal units, e.g. `1.2 MB`.
fn human_size(bytes: u64) -> String {
    const UNITS: [&str; 5] = ["bytes", "KB", "MB", "GB", "TB"];
    if bytes < 1000 {
        return format!("{bytes} bytes");
    }
    let mut value = bytes as f64;
    let mut unit = 0;
    while value >= 1000.0 && unit < UNITS.len() - 1 {
        value /= 1000.0;
        unit += 1;
    }
    format!("{value:.1} {}", UNITS[unit])
}

fn joined<T: fmt::Display>(items: &[T]) -> String {
    items
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(" ")
}

impl fmt::Display for Package {
    /// The multi-line `info` block.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(checksum) = &self.checksum {
            writeln!(f, "index checksum: {checksum}")?;
        }
        writeln!(f, "name: --------- {}", self.name)?;
        writeln!(f, "version: ------ {}", self.version)?;
        if let Some(architecture) = &self.architecture {
            writeln!(f, "architecture: - {architecture}")?;
        }
        writeln!(f, "package size: - {} byte(s) ({})", self.size, human_size(self.size))?;
        writeln!(
            f,
            "installed size: {} byte(s) ({})",
            self.installed_size,
            human_size(self.installed_size)
        )?;
        writeln!(f, "description: -- {}", self.description)?;
        writeln!(f, "url: ---------- {}", self.url)?;
        writeln!(f, "license: ------ {}", self.license)?;
        if let Some(origin) = &self.origin {
            writeln!(f, "origin: ------- {origin}")?;
        }
        if let Some(maintainer) = &self.maintainer {
            writeln!(f, "maintainer: --- {maintainer}")?;
        }
        if let Some(build_time) = self.build_time {
            writeln!(f, "build time: --- {build_time}")?;
        }
        if let Some(commit) = &self.commit {
            writeln!(f, "commit: ------- {commit}")?;
        }
        if let Some(priority) = self.provider_priority {
            writeln!(f, "provider prio:  {priority}")?;
        }
        if !self.dependencies.is_empty() {
            writeln!(f, "dependencies: - {}", joined(&self.dependencies))?;
        }
        if !self.provides.is_empty() {
            writeln!(f, "provides: ----- {}", joined(&self.provides))?;
        }
        if !self.install_if.is_empty() {
            writeln!(f, "install if: --- {}", joined(&self.install_if))?;
        }
        Ok(())
    }
}
