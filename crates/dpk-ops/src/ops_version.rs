//! Operation: version comparison tools.

use std::cmp::Ordering;

use dpk_core::requirement::Requirement;
use dpk_core::version::{self, CompareMode};
use dpk_util::errors::DpkError;

/// `a < b`, `a = b` or `a > b`.
pub fn compare_line(a: &str, b: &str, fuzzy: bool) -> miette::Result<String> {
    let mode = if fuzzy {
        CompareMode::Fuzzy
    } else {
        CompareMode::Normal
    };
    let symbol = match version::compare(a, b, mode)? {
        Ordering::Less => '<',
        Ordering::Equal => '=',
        Ordering::Greater => '>',
    };
    Ok(format!("{a} {symbol} {b}"))
}

pub fn compare(a: &str, b: &str, fuzzy: bool) -> miette::Result<()> {
    println!("{}", compare_line(a, b, fuzzy)?);
    Ok(())
}

/// Print each version with its validity. Fails if any is invalid.
pub fn validate(versions: &[String]) -> miette::Result<()> {
    let mut invalid = 0;
    for v in versions {
        if version::validate(v) {
            println!("{v}: valid");
        } else {
            println!("{v}: invalid");
            invalid += 1;
        }
    }
    if invalid > 0 {
        return Err(DpkError::Generic {
            message: format!("{invalid} of {} version(s) invalid", versions.len()),
        }
        .into());
    }
    Ok(())
}

/// Whether a package at `package_version` satisfies the version part of
/// `requirement`. The requirement's name is not compared.
pub fn satisfies(package_version: &str, requirement: &str) -> miette::Result<bool> {
    let requirement = Requirement::parse(requirement)?;
    if !version::validate(package_version) {
        return Err(DpkError::Generic {
            message: format!("Invalid version \"{package_version}\""),
        }
        .into());
    }
    let satisfied = requirement.spec.satisfied_by(package_version)?;
    tracing::debug!("{package_version} against {requirement}: {satisfied}");
    Ok(satisfied)
}
