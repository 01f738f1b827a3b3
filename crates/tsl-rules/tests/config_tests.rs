use super::*;
use tsl_solver::TypeOrigin;

fn ids(rules: &RuleSet) -> Vec<&'static str> {
    rules
        .entries()
        .iter()
        .map(|entry| entry.kind.id().as_str())
        .collect()
}

#[test]
fn recommended_enables_every_rule_as_error() {
    let rules = RuleSet::recommended();
    assert_eq!(
        ids(&rules),
        vec![
            "prefer-readonly-parameter-types",
            "no-unsafe-assignment",
            "no-unsafe-argument",
            "no-unsafe-return",
        ]
    );
    assert!(
        rules
            .entries()
            .iter()
            .all(|entry| entry.category == DiagnosticCategory::Error)
    );
}

#[test]
fn severities_and_order_follow_the_file() {
    let rules = RuleSet::from_json(
        r#"{ "rules": {
            "no-unsafe-return": "warn",
            "no-unsafe-assignment": ["error"],
            "no-unsafe-argument": "off"
        } }"#,
    )
    .unwrap();
    assert_eq!(ids(&rules), vec!["no-unsafe-return", "no-unsafe-assignment"]);
    assert_eq!(rules.entries()[0].category, DiagnosticCategory::Warning);
    assert_eq!(rules.entries()[1].category, DiagnosticCategory::Error);
}

#[test]
fn empty_config_enables_nothing() {
    assert!(RuleSet::from_json("{}").unwrap().is_empty());
}

#[test]
fn prefer_readonly_options_are_resolved() {
    let rules = RuleSet::from_json(
        r#"{ "rules": { "prefer-readonly-parameter-types": ["warn", {
            "allow": [
                "Date",
                { "from": "file", "name": ["Matrix", "Vector"], "path": "src/math/**" },
                { "from": "lib", "name": "HTMLElement" },
                { "from": "package", "name": "Observable", "package": "rxjs" }
            ],
            "checkParameterProperties": false,
            "ignoreInferredTypes": true,
            "treatMethodsAsReadonly": true
        }] } }"#,
    )
    .unwrap();

    let RuleKind::PreferReadonlyParameterTypes(options) = &rules.entries()[0].kind else {
        panic!("expected prefer-readonly-parameter-types");
    };
    assert!(!options.check_parameter_properties);
    assert!(options.ignore_inferred_types);
    assert!(options.policy.treat_methods_as_immutable);
    assert_eq!(options.policy.allowlist.len(), 4);

    let policy = &options.policy;
    assert!(policy.is_allowlisted(&TypeOrigin::package("Date", "anything")));
    assert!(policy.is_allowlisted(&TypeOrigin::file("Vector", "src/math/vec.ts")));
    assert!(!policy.is_allowlisted(&TypeOrigin::file("Vector", "src/ui/vec.ts")));
    assert!(policy.is_allowlisted(&TypeOrigin::lib("HTMLElement", "lib.dom.d.ts")));
    assert!(policy.is_allowlisted(&TypeOrigin::package("Observable", "rxjs")));
}

#[test]
fn prefer_readonly_defaults() {
    let rules =
        RuleSet::from_json(r#"{ "rules": { "prefer-readonly-parameter-types": "error" } }"#)
            .unwrap();
    let RuleKind::PreferReadonlyParameterTypes(options) = &rules.entries()[0].kind else {
        panic!("expected prefer-readonly-parameter-types");
    };
    assert!(options.check_parameter_properties);
    assert!(!options.ignore_inferred_types);
    assert!(!options.policy.treat_methods_as_immutable);
    assert!(options.policy.allowlist.is_empty());
}

#[test]
fn errors_are_typed() {
    let unknown = RuleSet::from_json(r#"{ "rules": { "no-explicit-any": "error" } }"#);
    assert!(matches!(unknown, Err(ConfigError::UnknownRule(name)) if name == "no-explicit-any"));

    let severity = RuleSet::from_json(r#"{ "rules": { "no-unsafe-return": "fatal" } }"#);
    assert!(matches!(severity, Err(ConfigError::InvalidSeverity { .. })));

    let numeric = RuleSet::from_json(r#"{ "rules": { "no-unsafe-return": [2] } }"#);
    assert!(matches!(numeric, Err(ConfigError::InvalidSeverity { .. })));

    let options = RuleSet::from_json(
        r#"{ "rules": { "prefer-readonly-parameter-types": ["error", { "allowList": [] }] } }"#,
    );
    assert!(matches!(options, Err(ConfigError::InvalidOptions { .. })));

    let unexpected =
        RuleSet::from_json(r#"{ "rules": { "no-unsafe-argument": ["error", { "strict": true }] } }"#);
    assert!(matches!(unexpected, Err(ConfigError::UnexpectedOptions { .. })));

    let glob = RuleSet::from_json(
        r#"{ "rules": { "prefer-readonly-parameter-types": ["error", {
            "allow": [{ "from": "file", "name": "Foo", "path": "src/[" }]
        }] } }"#,
    );
    let Err(err) = glob else {
        panic!("expected a glob error");
    };
    assert!(matches!(err, ConfigError::InvalidGlob { .. }));
    assert!(err.to_string().contains("src/["));

    assert!(matches!(
        RuleSet::from_json("{ \"rules\": "),
        Err(ConfigError::Parse(_))
    ));
}

#[test]
fn with_replaces_an_existing_entry() {
    let rules = RuleSet::recommended().with(RuleKind::NoUnsafeReturn, DiagnosticCategory::Warning);
    assert_eq!(rules.entries().len(), 4);
    let last = &rules.entries()[3];
    assert_eq!(last.kind.id().as_str(), "no-unsafe-return");
    assert_eq!(last.category, DiagnosticCategory::Warning);
}
