use std::fs;
use std::path::PathBuf;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::tempdir;

fn fixture(path: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("..")
        .join(path)
}

fn fwconv() -> Command {
    Command::new(assert_cmd::cargo::cargo_bin!("fwconv"))
}

#[test]
fn vendors_lists_catalogue() {
    fwconv()
        .arg("vendors")
        .assert()
        .success()
        .stdout(predicate::str::contains("cisco-asa"))
        .stdout(predicate::str::contains("cisco-ftd"))
        .stdout(predicate::str::contains("fortigate"))
        .stdout(predicate::str::contains("palo-alto"));
}

#[test]
fn vendors_json_carries_extensions() {
    fwconv()
        .args(["vendors", "--format", "json"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"id\": \"palo-alto\""))
        .stdout(predicate::str::contains("\".xml\""));
}

#[test]
fn targets_lists_complexity() {
    fwconv()
        .args(["targets", "cisco-asa"])
        .assert()
        .success()
        .stdout(predicate::str::contains("targets source=cisco-asa"))
        .stdout(predicate::str::contains(
            "cisco-ftd (Cisco FTD) supported=true complexity=medium",
        ))
        .stdout(predicate::str::contains("- cisco-asa (").not());
}

#[test]
fn targets_for_unknown_vendor_fail() {
    fwconv()
        .args(["targets", "checkpoint"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("unsupported vendor: checkpoint"));
}

#[test]
fn inspect_prints_category_counts() {
    fwconv()
        .arg("inspect")
        .arg(fixture("fixtures/ftd.cfg"))
        .args(["--from", "cisco-ftd"])
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "inspect vendor=cisco-ftd hostname=branch-ftd",
        ))
        .stdout(predicate::str::contains("- interfaces: 3"))
        .stdout(predicate::str::contains("- policies: 3"))
        .stdout(predicate::str::contains("- security_profiles: 2"));
}

#[test]
fn inspect_json_prints_model() {
    fwconv()
        .arg("inspect")
        .arg(fixture("fixtures/paloalto.xml"))
        .args(["--from", "palo-alto", "--format", "json"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"hostname\": \"PA-EDGE\""))
        .stdout(predicate::str::contains("\"zones\""));
}

#[test]
fn check_passes_for_fixture() {
    fwconv()
        .arg("check")
        .arg(fixture("fixtures/asa.cfg"))
        .args(["--from", "cisco-asa"])
        .assert()
        .success()
        .stdout(predicate::str::contains("result errors=0 warnings=0"));
}

#[test]
fn check_fails_on_dangling_group_member() {
    let dir = tempdir().expect("tempdir");
    let input = dir.path().join("groups.conf");
    fs::write(
        &input,
        "config firewall addrgrp\n    edit \"servers\"\n        set member \"db\"\n    next\nend\n",
    )
    .expect("write");

    fwconv()
        .arg("check")
        .arg(&input)
        .args(["--from", "fortigate"])
        .assert()
        .failure()
        .stdout(predicate::str::contains("missing_group_member"))
        .stderr(predicate::str::contains("check failed: 1 errors"));
}

#[test]
fn check_strict_fails_on_policy_warnings() {
    let dir = tempdir().expect("tempdir");
    let input = dir.path().join("acl.cfg");
    fs::write(
        &input,
        "access-list inside_in extended permit ip object-group branch any\n",
    )
    .expect("write");

    fwconv()
        .arg("check")
        .arg(&input)
        .args(["--from", "cisco-asa"])
        .assert()
        .success()
        .stdout(predicate::str::contains("missing_policy_reference"));

    fwconv()
        .arg("check")
        .arg(&input)
        .args(["--from", "cisco-asa", "--strict"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("strict mode"));
}
