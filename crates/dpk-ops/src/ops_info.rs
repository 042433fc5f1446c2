//! Operation: show package details.

use std::path::PathBuf;

use dpk_core::index::PackageIndex;
use dpk_core::package::Package;
use dpk_util::errors::DpkError;

/// Options for `dpk info`.
#[derive(Debug, Clone, Default)]
pub struct InfoOptions {
    /// Print a JSON array instead of info blocks.
    pub json: bool,
}

/// Every package carrying one of `names`, grouped by name in argument order.
pub fn lookup<'a>(index: &'a PackageIndex, names: &[String]) -> Vec<&'a Package> {
    names
        .iter()
        .flat_map(|name| index.packages.iter().filter(move |p| &p.name == name))
        .collect()
}

pub async fn info(paths: &[PathBuf], names: &[String], opts: &InfoOptions) -> miette::Result<()> {
    let index = crate::ops_load::load_indexes(paths).await?;
    let packages = lookup(&index, names);

    for name in names {
        if index.first(name).is_none() {
            dpk_util::progress::status_warn("Missing", &format!("no package named {name}"));
        }
    }

    if opts.json {
        let json = serde_json::to_string_pretty(&packages).map_err(|e| DpkError::Generic {
            message: format!("Failed to serialize packages: {e}"),
        })?;
        println!("{json}");
    } else {
        for package in packages {
            println!("{package}");
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookup_keeps_argument_order_and_duplicates() {
        let index = PackageIndex::new(vec![
            Package::new("musl", "1.2.5-r8"),
            Package::new("busybox", "1.37.0-r8"),
            Package::new("musl", "1.2.4-r2"),
        ]);
        let names = vec!["busybox".to_string(), "musl".to_string(), "nope".to_string()];
        let found = lookup(&index, &names);
        let found: Vec<_> = found
            .iter()
            .map(|p| format!("{}-{}", p.name, p.version))
            .collect();
        assert_eq!(found, ["busybox-1.37.0-r8", "musl-1.2.5-r8", "musl-1.2.4-r2"]);
    }

    #[test]
    fn packages_serialize_to_json() {
        let mut package = Package::new("busybox", "1.37.0-r8");
        package.dependencies = vec!["so:libc.musl-x86_64.so.1".parse().unwrap()];
        let json = serde_json::to_value(vec![&package]).unwrap();
        assert_eq!(json[0]["name"], "busybox");
        assert_eq!(json[0]["dependencies"][0], "so:libc.musl-x86_64.so.1");
    }
}
