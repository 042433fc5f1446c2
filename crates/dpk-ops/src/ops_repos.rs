//! Operation: list configured repositories.

use std::path::Path;

use dpk_core::config::DpkConfig;
use dpk_core::repository::Repository;

/// One line per repository: its index URL and the local extracted index.
pub fn repos(config: &DpkConfig) -> miette::Result<()> {
    let repositories = config.repositories();
    if repositories.is_empty() {
        println!("No repositories configured.");
        return Ok(());
    }

    let dir = config.index_dir();
    for repo in &repositories {
        let local = dir.join(repo.index_name());
        println!("{}\n \\_ {}{}", repo.url(), local.display(), index_state(&dir, repo));
    }
    Ok(())
}

/// Marker for an index that can't be loaded yet. An archive that was
/// downloaded but not extracted is reported by name.
fn index_state(dir: &Path, repo: &Repository) -> String {
    if dir.join(repo.index_name()).is_file() {
        return String::new();
    }
    let archive = repo.archive_name();
    if dir.join(&archive).is_file() {
        format!(" (not extracted: {archive})")
    } else {
        " (missing)".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn index_state_follows_local_files() {
        let dir = TempDir::new().unwrap();
        let repo = Repository::new("https://example.org/main", "x86_64");
        assert_eq!(index_state(dir.path(), &repo), " (missing)");

        std::fs::write(dir.path().join(repo.archive_name()), b"").unwrap();
        assert_eq!(
            index_state(dir.path(), &repo),
            format!(" (not extracted: APKINDEX.{}.tar.gz)", repo.discriminator)
        );

        std::fs::write(dir.path().join(repo.index_name()), b"").unwrap();
        assert_eq!(index_state(dir.path(), &repo), "");
    }
}
