use assert_cmd::Command;
use predicates::prelude::*;

fn javakey() -> Command {
    Command::new(assert_cmd::cargo::cargo_bin!("javakey"))
}

#[test]
fn parse_prints_the_production_sequence() {
    javakey()
        .args(["parse", "Ljava.lang.Object;"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Ljava.lang.Object;"))
        .stdout(predicate::str::contains("FullyQualifiedName"))
        .stdout(predicate::str::contains("TopLevelType"));
}

#[test]
fn parse_json_is_machine_readable() {
    let output = javakey()
        .args(["parse", "--json", "Lp.X;.foo()V#i"])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();
    let reports: serde_json::Value = serde_json::from_slice(&output).expect("valid JSON");
    let report = &reports[0];
    assert_eq!(report["key"], "Lp.X;.foo()V#i");
    assert_eq!(report["malformed"], false);
    assert_eq!(report["has_type_name"], true);
    let events = report["events"].as_array().expect("events array");
    assert_eq!(events.last().unwrap()["event"], "LocalVar");
}

#[test]
fn parse_exits_nonzero_on_a_malformed_key() {
    javakey()
        .args(["parse", "L;"])
        .assert()
        .code(1)
        .stdout(predicate::str::contains("Malformed"));
}

#[test]
fn validate_reports_each_key() {
    javakey()
        .args(["validate", "Ljava.lang.Object;", "L;"])
        .assert()
        .code(1)
        .stdout(predicate::str::contains("ok: Ljava.lang.Object;"))
        .stdout(predicate::str::contains("malformed binding key: L;"));
}
