use std::fs;
use std::path::{Path, PathBuf};

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

fn path_as_str(path: &Path) -> &str {
    path.to_str().expect("utf-8 path")
}

#[test]
fn convert_writes_output_and_prints_summary() {
    let dir = tempdir().expect("tempdir");
    let output = dir.path().join("edge.conf");

    fwconv()
        .arg("convert")
        .arg(fixture("fixtures/asa.cfg"))
        .args(["--from", "cisco-asa", "--to", "fortigate"])
        .arg("-o")
        .arg(path_as_str(&output))
        .assert()
        .success()
        .stdout(predicate::str::contains("converted Cisco ASA -> FortiGate"))
        .stdout(predicate::str::contains(
            "convert_summary interfaces=2 objects=2 object_groups=1",
        ))
        .stdout(predicate::str::contains("vpns=1 ldap=1"));

    let written = fs::read_to_string(&output).expect("read output");
    assert!(written.starts_with("# FortiGate Configuration"));
    assert!(written.contains("edit \"GigabitEthernet0/1\""));
    assert!(written.contains("set alias \"inside\""));
}

#[test]
fn convert_without_output_prints_generated_text() {
    fwconv()
        .arg("convert")
        .arg(fixture("fixtures/fortigate.conf"))
        .args(["--from", "fortigate", "--to", "cisco-ftd"])
        .assert()
        .success()
        .stdout(predicate::str::starts_with("! Cisco FTD Configuration"))
        .stdout(predicate::str::contains("hostname FGT-EDGE"))
        .stderr(predicate::str::contains("convert_summary interfaces=2"));
}

#[test]
fn convert_json_reports_success_and_stats() {
    fwconv()
        .arg("convert")
        .arg(fixture("fixtures/ftd.cfg"))
        .args(["--from", "cisco-ftd", "--to", "palo-alto", "--format", "json"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"success\": true"))
        .stdout(predicate::str::contains("\"complexity\": \"high\""))
        .stdout(predicate::str::contains("\"security_profiles\": 2"))
        .stdout(predicate::str::contains("<config version=\\\"10.0\\\">"));
}

#[test]
fn self_pair_is_rejected() {
    fwconv()
        .arg("convert")
        .arg(fixture("fixtures/fortigate.conf"))
        .args(["--from", "fortigate", "--to", "fortigate"])
        .assert()
        .failure()
        .stderr(predicate::str::contains(
            "conversion from fortigate to fortigate is not supported",
        ));
}

#[test]
fn self_pair_json_failure_keeps_vendor_names() {
    fwconv()
        .arg("convert")
        .arg(fixture("fixtures/fortigate.conf"))
        .args(["--from", "fortigate", "--to", "fortigate", "--format", "json"])
        .assert()
        .failure()
        .stdout(predicate::str::contains("\"success\": false"))
        .stdout(predicate::str::contains("\"source_vendor_name\": \"FortiGate\""));
}

#[test]
fn unknown_vendor_is_rejected() {
    fwconv()
        .arg("convert")
        .arg(fixture("fixtures/asa.cfg"))
        .args(["--from", "cisco-asa", "--to", "junos"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("unsupported vendor: junos"));
}

#[test]
fn refuses_to_overwrite_input() {
    let dir = tempdir().expect("tempdir");
    let input = dir.path().join("asa.cfg");
    fs::write(&input, "hostname fw1\n").expect("write");

    fwconv()
        .arg("convert")
        .arg(path_as_str(&input))
        .args(["--from", "cisco-asa", "--to", "cisco-ftd"])
        .arg("--output")
        .arg(path_as_str(&input))
        .assert()
        .failure()
        .stderr(predicate::str::contains("refusing to overwrite source file"));

    assert_eq!(fs::read_to_string(&input).expect("read"), "hostname fw1\n");
}

#[test]
fn matrix_file_can_enable_self_pair() {
    let dir = tempdir().expect("tempdir");
    let matrix = dir.path().join("matrix.toml");
    fs::write(
        &matrix,
        r#"
[[vendor]]
id = "fortigate"
name = "FortiGate"
extensions = [".conf"]

[[conversion]]
source = "fortigate"
target = "fortigate"
complexity = "low"
"#,
    )
    .expect("write matrix");

    fwconv()
        .arg("convert")
        .arg(fixture("fixtures/fortigate.conf"))
        .args(["--from", "fortigate", "--to", "fortigate"])
        .arg("--matrix-file")
        .arg(path_as_str(&matrix))
        .assert()
        .success()
        .stdout(predicate::str::contains("edit \"port1\""))
        .stderr(predicate::str::contains("complexity=low"));
}

#[test]
fn broken_matrix_file_fails() {
    let dir = tempdir().expect("tempdir");
    let matrix = dir.path().join("matrix.toml");
    fs::write(&matrix, "[[conversion]\nsource = ").expect("write matrix");

    fwconv()
        .arg("convert")
        .arg(fixture("fixtures/asa.cfg"))
        .args(["--from", "cisco-asa", "--to", "fortigate"])
        .arg("--matrix-file")
        .arg(path_as_str(&matrix))
        .assert()
        .failure()
        .stderr(predicate::str::contains("failed to load matrix file"));
}

#[test]
fn strict_references_reject_dangling_group_members() {
    let dir = tempdir().expect("tempdir");
    let input = dir.path().join("groups.cfg");
    fs::write(
        &input,
        "object-group network servers\n network-object object db\n!\n",
    )
    .expect("write");

    fwconv()
        .arg("convert")
        .arg(path_as_str(&input))
        .args(["--from", "cisco-asa", "--to", "fortigate"])
        .assert()
        .success();

    fwconv()
        .arg("convert")
        .arg(path_as_str(&input))
        .args(["--from", "cisco-asa", "--to", "fortigate", "--strict-references"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("unresolved address group reference"));
}
