use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

#[allow(deprecated)]
fn dpk_cmd(home: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("dpk").unwrap();
    cmd.env("HOME", home.path()).env_remove("DPK_CONFIG");
    cmd
}

#[test]
fn test_repos_without_config() {
    let home = TempDir::new().unwrap();

    dpk_cmd(&home)
        .arg("repos")
        .assert()
        .success()
        .stdout("No repositories configured.\n");
}

#[test]
fn test_repos_lists_repository_arch_pairs() {
    let home = TempDir::new().unwrap();
    let config = home.path().join("dpk.toml");
    std::fs::write(
        &config,
        "repositories = [\"https://dl-cdn.alpinelinux.org/alpine/v3.21/main/\"]\n\
         architectures = [\"x86_64\", \"aarch64\"]\n",
    )
    .unwrap();

    dpk_cmd(&home)
        .arg("repos")
        .arg("--config")
        .arg(&config)
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "https://dl-cdn.alpinelinux.org/alpine/v3.21/main/x86_64/APKINDEX.tar.gz\n",
        ))
        .stdout(predicate::str::contains(
            "https://dl-cdn.alpinelinux.org/alpine/v3.21/main/aarch64/APKINDEX.tar.gz\n",
        ))
        .stdout(predicate::str::contains("(missing)"));
}

#[test]
fn test_repos_reads_legacy_property_files() {
    let home = TempDir::new().unwrap();
    let dpk_dir = home.path().join(".dpk");
    std::fs::create_dir_all(&dpk_dir).unwrap();
    std::fs::write(dpk_dir.join("repositories"), "# main\nhttps://example.org/main\n").unwrap();
    std::fs::write(dpk_dir.join("arch"), "riscv64\n").unwrap();

    dpk_cmd(&home)
        .arg("repos")
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "https://example.org/main/riscv64/APKINDEX.tar.gz",
        ));
}
