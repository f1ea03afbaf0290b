use expect_test::expect;
use subflags::{Cli, ErrorKind, OptionDef, OptionRegistry};

use crate::fixture::{self, Simple};

fn colliding() -> Cli {
    let mut shared = OptionRegistry::new();
    shared.register(OptionDef::flag("verbose", "talk more").short('v')).unwrap();

    let mut a = Simple::new("a", "first");
    a.unique
        .register(OptionDef::flag("extra", "").short('x'))
        .unwrap()
        .register(OptionDef::flag("force", ""))
        .unwrap();
    let mut b = Simple::new("b", "second");
    b.unique
        .register(OptionDef::flag("exclude", "").short('x'))
        .unwrap()
        .register(OptionDef::flag("force", ""))
        .unwrap();
    a.shared = Some(shared.clone());
    b.shared = Some(shared);

    fixture::cli(vec![a, b], OptionRegistry::new())
}

#[test]
fn same_short_in_two_subcommands() {
    let err = colliding().parse(["a", "-x"]).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::AmbiguousOption);
    assert_eq!(err.option(), Some("-x"));
    expect![[r#"
        option '-x' is ambiguous and matches '-x [ --extra ]', '-x [ --exclude ]'
        NOTE: there is a current limitation where two subcommands cannot contain the same option name or shorthand unless they are specifically shared duplicate options."#]]
    .assert_eq(&err.to_string());
}

#[test]
fn same_long_in_two_subcommands() {
    let err = colliding().parse(["b", "--force"]).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::AmbiguousOption);
    assert!(err.to_string().starts_with("option '--force' is ambiguous and matches '--force', '--force'"));
}

#[test]
fn shared_options_do_not_collide() {
    let output = colliding().parse(["-v", "b"]).unwrap();
    assert_eq!(output.subcommand_used(), Some("b"));
    let values = output.values().unwrap();
    assert!(values.flag("verbose"));
    assert!(!values.flag("force"));
}

#[test]
fn unambiguous_prefix_of_colliding_names() {
    let values = colliding().parse(["a", "--ext"]).unwrap().values().unwrap();
    assert!(values.flag("extra"));
}
