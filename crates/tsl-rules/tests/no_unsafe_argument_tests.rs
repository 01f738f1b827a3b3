use super::*;
use crate::config::RuleKind;
use crate::test_support::{Fixture, message_ids};

fn run(fixture: &Fixture) -> Vec<tsl_common::Diagnostic> {
    fixture.run(RuleKind::NoUnsafeArgument)
}

#[test]
fn any_argument_to_typed_parameter() {
    let mut f = Fixture::new();
    let any = f.table.dynamic();
    let string = f.table.string();
    let unknown = f.table.top();

    let typed = f.argument(any, string);
    let open = f.argument(any, unknown);
    let fine = f.argument(string, string);
    f.add(NodeKind::Call {
        arguments: vec![typed, open, fine],
    });

    let diagnostics = run(&f);
    assert_eq!(message_ids(&diagnostics), vec!["unsafeArgument"]);
    assert_eq!(diagnostics[0].range, typed.value.range);
    assert_eq!(
        diagnostics[0].message_text,
        "Unsafe argument of type `any` assigned to a parameter of type `string`."
    );
}

#[test]
fn nested_any_argument_names_outer_types() {
    let mut f = Fixture::new();
    let any = f.table.dynamic();
    let number = f.table.number();
    let promise = f.table.constructor("Promise");
    let promise_any = f.table.generic(promise, &[any]);
    let promise_number = f.table.generic(promise, &[number]);

    let argument = f.argument(promise_any, promise_number);
    f.add(NodeKind::Call {
        arguments: vec![argument],
    });

    let diagnostics = run(&f);
    assert_eq!(
        diagnostics[0].message_text,
        "Unsafe argument of type `Promise<any>` assigned to a parameter of type `Promise<number>`."
    );
}

#[test]
fn argument_without_parameter_is_skipped() {
    let mut f = Fixture::new();
    let any = f.table.dynamic();
    let value = f.expr(any);
    f.add(NodeKind::Call {
        arguments: vec![Argument {
            value,
            spread: false,
        }],
    });
    assert!(run(&f).is_empty());
}

#[test]
fn spread_of_any_or_any_array() {
    let mut f = Fixture::new();
    let any = f.table.dynamic();
    let any_array = f.table.array(any);
    let string = f.table.string();
    let strings = f.table.array(string);

    let arguments = vec![
        f.spread_argument(any),
        f.spread_argument(any_array),
        f.spread_argument(strings),
    ];
    f.add(NodeKind::Call { arguments });

    let diagnostics = run(&f);
    assert_eq!(message_ids(&diagnostics), vec!["unsafeSpread", "unsafeSpread"]);
    assert!(diagnostics.iter().all(|d| d.rule_id.as_str() == "no-unsafe-argument"));
}

#[test]
fn memo_is_shared_across_calls_in_one_file() {
    let mut f = Fixture::new();
    let any = f.table.dynamic();
    let string = f.table.string();
    let set = f.table.constructor("Set");
    let set_of_any = f.table.generic(set, &[any]);
    let set_of_string = f.table.generic(set, &[string]);
    for _ in 0..3 {
        let argument = f.argument(set_of_any, set_of_string);
        f.add(NodeKind::Call {
            arguments: vec![argument],
        });
    }

    let mut rule = NoUnsafeArgument::new();
    let mut ctx = RuleContext::new(
        "test.ts",
        &f.table,
        rule.id(),
        tsl_common::DiagnosticCategory::Warning,
    );
    for node in &f.file.nodes {
        rule.check(node, &mut ctx);
    }
    let diagnostics = ctx.into_diagnostics();
    assert_eq!(diagnostics.len(), 3);
    assert!(diagnostics.iter().all(|d| !d.is_error()));
    assert_eq!(rule.state.stats().cache_hits, 2);
}
