use assert_cmd::Command;
use predicates::prelude::*;

#[allow(deprecated)]
fn dpk_cmd() -> Command {
    Command::cargo_bin("dpk").unwrap()
}

#[test]
fn test_version_compare() {
    dpk_cmd()
        .args(["version", "compare", "1.0_alpha", "1.0"])
        .assert()
        .success()
        .stdout("1.0_alpha < 1.0\n");

    dpk_cmd()
        .args(["version", "compare", "--fuzzy", "1.2.3", "1.2"])
        .assert()
        .success()
        .stdout("1.2.3 = 1.2\n");
}

#[test]
fn test_version_compare_invalid() {
    dpk_cmd()
        .args(["version", "compare", "1.0", "1.0-100"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid version"));
}

#[test]
fn test_version_validate() {
    dpk_cmd()
        .args(["version", "validate", "1.2.3_rc1-r4", "0.0.0_git20210122-r0"])
        .assert()
        .success()
        .stdout("1.2.3_rc1-r4: valid\n0.0.0_git20210122-r0: valid\n");

    dpk_cmd()
        .args(["version", "validate", "1.0", "0r-10"])
        .assert()
        .failure()
        .stdout(predicate::str::contains("0r-10: invalid"));
}

#[test]
fn test_version_satisfies() {
    dpk_cmd()
        .args(["version", "satisfies", "1.2.3", "pkg~1.2"])
        .assert()
        .success()
        .stdout("1.2.3 satisfies pkg~1.2\n");

    dpk_cmd()
        .args(["version", "satisfies", "1.2.2", "pkg>=1.2.3-r1"])
        .assert()
        .success()
        .stdout("1.2.2 does not satisfy pkg>=1.2.3-r1\n");
}
