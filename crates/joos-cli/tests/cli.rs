use std::path::{Path, PathBuf};

use assert_cmd::Command;
use joos_hir::builder::{expr, stmt, ty, CtorSpec, MethodSpec, StmtTree, TypeBuilder, UnitBuilder};
use joos_hir::{CompilationUnit, Program};
use predicates::prelude::*;
use pretty_assertions::assert_eq;
use tempfile::TempDir;

fn joosc() -> Command {
    Command::cargo_bin("joosc").expect("joosc binary")
}

fn write_json(dir: &Path, name: &str, value: &impl serde::Serialize) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, serde_json::to_string(value).expect("encode")).expect("write input");
    path
}

fn main_unit(body: Vec<StmtTree>) -> CompilationUnit {
    UnitBuilder::new()
        .decl(
            TypeBuilder::class("Main").constructor(CtorSpec::new()).method(
                MethodSpec::new("test")
                    .returns(ty::int())
                    .body(body),
            ),
        )
        .build()
}

fn valid_unit() -> CompilationUnit {
    main_unit(vec![stmt::ret(expr::int(123))])
}

fn ill_typed_unit() -> CompilationUnit {
    main_unit(vec![stmt::ret(expr::boolean(true))])
}

#[test]
fn help_describes_the_options() {
    joosc().arg("--help").assert().success().stdout(
        predicate::str::contains("--config")
            .and(predicate::str::contains("--format"))
            .and(predicate::str::contains("--no-stdlib")),
    );
}

#[test]
fn accepted_program_prints_ok() {
    let dir = TempDir::new().expect("tempdir");
    let input = write_json(dir.path(), "Main.json", &valid_unit());

    joosc()
        .arg(&input)
        .assert()
        .code(0)
        .stdout(predicate::str::diff("OK\n"));
}

#[test]
fn rejected_program_exits_with_42() {
    let dir = TempDir::new().expect("tempdir");
    let input = write_json(dir.path(), "Main.json", &ill_typed_unit());

    joosc()
        .arg(&input)
        .assert()
        .code(42)
        .stdout(predicate::str::starts_with("ASSIGN_TYPE: "));
}

#[test]
fn json_report_lists_errors() {
    let dir = TempDir::new().expect("tempdir");
    let input = write_json(dir.path(), "Main.json", &ill_typed_unit());

    let output = joosc()
        .arg("--format")
        .arg("json")
        .arg(&input)
        .output()
        .expect("run joosc");
    assert_eq!(output.status.code(), Some(42));

    let report: serde_json::Value = serde_json::from_slice(&output.stdout).expect("json report");
    assert_eq!(report["accepted"], serde_json::Value::Bool(false));
    let errors = report["errors"].as_array().expect("errors");
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0]["code"], "ASSIGN_TYPE");
    assert_eq!(errors[0]["phase"], "TYPE_CHECKING");
    assert_eq!(errors[0]["location"]["ty"], "Main");
}

#[test]
fn units_from_several_files_form_one_program() {
    let dir = TempDir::new().expect("tempdir");
    let base = UnitBuilder::new()
        .package("lib")
        .decl(TypeBuilder::class("Base").constructor(CtorSpec::new()))
        .build();
    let derived = UnitBuilder::new()
        .import("lib.Base")
        .decl(TypeBuilder::class("Derived").extends("Base").constructor(CtorSpec::new()))
        .build();
    let base = write_json(dir.path(), "Base.json", &base);
    let derived = write_json(dir.path(), "Derived.json", &derived);

    joosc().arg(&derived).arg(&base).assert().code(0);
    // Without Base the import cannot be resolved.
    joosc()
        .arg(&derived)
        .assert()
        .code(42)
        .stdout(predicate::str::contains("lib.Base"));
}

#[test]
fn program_files_are_accepted() {
    let dir = TempDir::new().expect("tempdir");
    let program = Program {
        units: vec![valid_unit()],
    };
    let input = write_json(dir.path(), "program.json", &program);
    joosc().arg(&input).assert().code(0);
}

#[test]
fn no_stdlib_drops_the_library() {
    let dir = TempDir::new().expect("tempdir");
    let input = write_json(dir.path(), "Main.json", &valid_unit());

    joosc()
        .arg("--no-stdlib")
        .arg(&input)
        .assert()
        .code(42)
        .stdout(predicate::str::contains("java.lang.Object"));
}

#[test]
fn config_file_is_honoured() {
    let dir = TempDir::new().expect("tempdir");
    let input = write_json(dir.path(), "Main.json", &valid_unit());
    let config = dir.path().join("joos.toml");

    std::fs::write(&config, "include_stdlib = false\n").expect("write config");
    joosc().arg("--config").arg(&config).arg(&input).assert().code(42);

    std::fs::write(&config, "unknown = 1\n").expect("write config");
    joosc()
        .arg("--config")
        .arg(&config)
        .arg(&input)
        .assert()
        .code(1)
        .stderr(predicate::str::contains("failed to parse toml config"));
}

#[test]
fn unreadable_input_is_an_infrastructure_error() {
    let dir = TempDir::new().expect("tempdir");
    joosc()
        .arg(dir.path().join("missing.json"))
        .assert()
        .code(1)
        .stderr(predicate::str::contains("failed to read"));

    let garbage = dir.path().join("garbage.json");
    std::fs::write(&garbage, "{\"not\": \"a unit\"}").expect("write input");
    joosc()
        .arg(&garbage)
        .assert()
        .code(1)
        .stderr(predicate::str::contains("failed to decode"));
}
