use assert_cmd::Command;
use predicates::prelude::*;
use std::path::PathBuf;
use tempfile::TempDir;

fn fixture(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests/fixtures")
        .join(name)
}

#[allow(deprecated)]
fn dpk_cmd(home: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("dpk").unwrap();
    cmd.env("HOME", home.path()).env_remove("DPK_CONFIG");
    cmd
}

#[test]
fn test_graph_prints_levels() {
    let home = TempDir::new().unwrap();

    dpk_cmd(&home)
        .arg("graph")
        .arg("--index")
        .arg(fixture("main.APKINDEX"))
        .arg("--index")
        .arg(fixture("community.APKINDEX"))
        .assert()
        .success()
        .stdout(predicate::str::contains("0: musl-1.2.5-r8\n"))
        .stdout(predicate::str::contains(
            "2: busybox-binsh-1.37.0-r8 busybox-doc-1.37.0-r8\n",
        ))
        .stdout(predicate::str::contains("4: ping-2.1-r3 pong-2.1-r3\n"))
        .stderr(predicate::str::contains("Unresolved"))
        .stderr(predicate::str::contains("install-if docs"));
}

#[test]
fn test_graph_linear_fails_on_cycle() {
    let home = TempDir::new().unwrap();

    dpk_cmd(&home)
        .args(["graph", "--linear"])
        .arg("--index")
        .arg(fixture("main.APKINDEX"))
        .arg("--index")
        .arg(fixture("community.APKINDEX"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("Cyclic dependencies"));
}

#[test]
fn test_graph_linear_without_cycles() {
    let home = TempDir::new().unwrap();

    dpk_cmd(&home)
        .args(["graph", "--linear"])
        .arg("--index")
        .arg(fixture("main.APKINDEX"))
        .assert()
        .success()
        .stdout(predicate::str::starts_with("musl-1.2.5-r8 x86_64\n"));
}

#[test]
fn test_graph_respects_break_cycles_config() {
    let home = TempDir::new().unwrap();
    let config = home.path().join("config.toml");
    std::fs::write(&config, "[resolve]\nbreak-cycles = false\n").unwrap();

    dpk_cmd(&home)
        .arg("graph")
        .arg("--config")
        .arg(&config)
        .arg("--index")
        .arg(fixture("main.APKINDEX"))
        .arg("--index")
        .arg(fixture("community.APKINDEX"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("Cyclic dependencies"));
}

#[test]
fn test_graph_writes_output_files() {
    let home = TempDir::new().unwrap();
    let out = home.path().join("out");

    dpk_cmd(&home)
        .arg("graph")
        .arg("--output")
        .arg(&out)
        .arg("--index")
        .arg(fixture("main.APKINDEX"))
        .assert()
        .success();

    for name in [
        "packages.txt",
        "shallowIsolates.txt",
        "deepIsolates.txt",
        "sorted.txt",
    ] {
        assert!(out.join(name).is_file(), "{name} not written");
    }
    let shallow = std::fs::read_to_string(out.join("shallowIsolates.txt")).unwrap();
    assert_eq!(shallow, "busybox-binsh-1.37.0-r8 x86_64\nbusybox-doc-1.37.0-r8 x86_64\n");
}

#[test]
fn test_graph_missing_index_names_file() {
    let home = TempDir::new().unwrap();

    dpk_cmd(&home)
        .args(["graph", "--index", "no-such-APKINDEX"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("no-such-APKINDEX"));
}

#[test]
fn test_graph_without_sources_fails() {
    let home = TempDir::new().unwrap();

    dpk_cmd(&home)
        .arg("graph")
        .assert()
        .failure()
        .stderr(predicate::str::contains("No index files given"));
}
