use super::*;
use clap::Parser;
use std::fs;
use std::path::Path;
use tsl_common::{NodeId, SourceRange};
use tsl_rules::{Binding, Expr, NodeKind, Parameter, ProgramDump, SourceFile};
use tsl_solver::TypeTable;

const TEXT: &str = "function f(xs: string[]) {\n  const y: string = xs as any;\n}\n";

/// One file with a mutable array parameter and an `any` initializer.
fn write_dump(dir: &Path, dump_name: &str, file_name: &str) -> PathBuf {
    let mut types = TypeTable::new();
    let string = types.string();
    let strings = types.array(string);
    let any = types.dynamic();
    types.bind_node(NodeId(2), strings);
    types.bind_node(NodeId(4), string);
    types.bind_node(NodeId(5), any);

    let mut file = SourceFile::new(file_name).with_text(TEXT);
    file.push(
        NodeId(1),
        SourceRange::new(0, 60),
        NodeKind::Function {
            parameters: vec![Parameter {
                id: NodeId(2),
                range: SourceRange::new(11, 23),
                has_annotation: true,
                is_parameter_property: false,
            }],
        },
    );
    file.push(
        NodeId(3),
        SourceRange::new(35, 56),
        NodeKind::VariableDeclarator {
            binding: Binding::annotated(NodeId(4), SourceRange::new(35, 44)),
            init: Some(Expr::new(NodeId(5), SourceRange::new(47, 56))),
        },
    );

    let dump = ProgramDump {
        files: vec![file],
        types,
    };
    let path = dir.join(dump_name);
    fs::write(&path, serde_json::to_string(&dump).unwrap()).unwrap();
    path
}

fn args(extra: &[&str]) -> CliArgs {
    CliArgs::try_parse_from(std::iter::once("tsl").chain(extra.iter().copied())).unwrap()
}

#[test]
fn lint_dumps_keeps_dump_and_file_order() {
    let dir = tempfile::tempdir().unwrap();
    let first = write_dump(dir.path(), "1.json", "src/b.ts");
    let second = write_dump(dir.path(), "2.json", "src/a.ts");

    let linter = Linter::new(tsl_rules::RuleSet::recommended());
    let report = lint_dumps(&linter, &[first, second]).unwrap();

    let names: Vec<_> = report.files.iter().map(|f| f.file_name.as_str()).collect();
    assert_eq!(names, vec!["src/b.ts", "src/a.ts"]);
    assert_eq!(report.error_count(), 4);
    assert_eq!(report.warning_count(), 0);
    assert!(report.has_errors());
    assert_eq!(report.sources.len(), 2);
    assert_eq!(report.sources[0].1, TEXT);
}

#[test]
fn run_renders_text_with_positions() {
    let dir = tempfile::tempdir().unwrap();
    write_dump(dir.path(), "program.json", "a.ts");
    let dir_arg = dir.path().to_str().unwrap();

    let outcome = run(&args(&[dir_arg]), false).unwrap();
    assert!(outcome.has_errors);
    assert_eq!(
        outcome.output,
        "a.ts(1,12): error prefer-readonly-parameter-types: Parameter should be a read only type.\n\
         a.ts(2,9): error no-unsafe-assignment: Unsafe assignment of an `any` value.\n\
         \n\
         Found 2 errors."
    );
}

#[test]
fn warnings_alone_do_not_fail_the_run() {
    let dir = tempfile::tempdir().unwrap();
    let dump = write_dump(dir.path(), "program.json", "a.ts");
    let config = dir.path().join("lint.txt");
    fs::write(&config, r#"{ "rules": { "no-unsafe-assignment": "warn" } }"#).unwrap();

    let outcome = run(
        &args(&[
            "--config",
            config.to_str().unwrap(),
            "--format",
            "json",
            "--threads",
            "2",
            dump.to_str().unwrap(),
        ]),
        false,
    )
    .unwrap();
    assert!(!outcome.has_errors);

    let value: serde_json::Value = serde_json::from_str(&outcome.output).unwrap();
    assert_eq!(value["errorCount"], 0);
    assert_eq!(value["warningCount"], 1);
    assert_eq!(
        value["files"][0]["diagnostics"][0]["messageId"],
        "anyAssignment"
    );
}

#[test]
fn clean_program_prints_nothing() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("empty.json");
    fs::write(&path, r#"{ "files": [{ "fileName": "a.ts" }] }"#).unwrap();

    let outcome = run(&args(&[path.to_str().unwrap()]), false).unwrap();
    assert!(!outcome.has_errors);
    assert_eq!(outcome.output, "");
}

#[test]
fn bad_config_is_fatal() {
    let dir = tempfile::tempdir().unwrap();
    let dump = write_dump(dir.path(), "program.json", "a.ts");
    let config = dir.path().join("lint.txt");
    fs::write(&config, r#"{ "rules": { "no-unsafe-return": "loud" } }"#).unwrap();

    let err = run(
        &args(&["-c", config.to_str().unwrap(), dump.to_str().unwrap()]),
        false,
    )
    .unwrap_err();
    assert!(format!("{err:#}").contains("invalid severity"));
}
