mod collisions;
mod fixture;
mod help;

use std::fmt::Write;

use expect_test::{expect, Expect};
use subflags::{ErrorKind, OptionDef, OptionRegistry, ParseOutput, Subcommand};

use crate::fixture::Simple;

fn check(args: &str, expect: Expect) {
    let cli = fixture::users();
    let args = args.split_ascii_whitespace().collect::<Vec<_>>();
    let actual = match cli.parse(args).and_then(|output| render(&output)) {
        Ok(it) => it,
        Err(err) => format!("error: {err}"),
    };
    expect.assert_eq(&actual);
}

fn render(output: &ParseOutput) -> subflags::Result<String> {
    let values = output.values()?;
    let mut buf = format!("subcommand: {}\n", output.subcommand_used().unwrap_or("-"));
    for (name, values) in values.iter() {
        if values.is_empty() {
            writeln!(buf, "{name}").unwrap();
        } else {
            writeln!(buf, "{name} = {}", values.join(" ")).unwrap();
        }
    }
    Ok(buf)
}

#[test]
fn subcommand_with_positional() {
    check(
        "create abc123",
        expect![[r#"
            subcommand: create
            uuid-string = abc123
        "#]],
    );
}

#[test]
fn options_anywhere_on_the_line() {
    check(
        "-d Bob create abc123 --email=bob@example.com",
        expect![[r#"
            subcommand: create
            display-name = Bob
            email = bob@example.com
            uuid-string = abc123
        "#]],
    );
    check(
        "create abc --disp Bob",
        expect![[r#"
            subcommand: create
            display-name = Bob
            uuid-string = abc
        "#]],
    );
    check(
        "delete -p42 abc",
        expect![[r#"
            subcommand: delete
            pid = 42
            uuid-string = abc
        "#]],
    );
}

#[test]
fn no_subcommand() {
    check(
        "",
        expect![[r#"
            subcommand: -
        "#]],
    );
    check(
        "--version",
        expect![[r#"
            subcommand: -
            version
        "#]],
    );
}

#[test]
fn missing_required_positional() {
    check(
        "create",
        expect!["error: Subcommand 'create' used without required positional option: uuid-string."],
    );

    let err = fixture::users().parse(["create"]).unwrap().values().unwrap_err();
    assert_eq!(err.kind(), ErrorKind::MissingRequiredOption);
    assert_eq!(err.subcommand(), Some("create"));
    assert_eq!(err.option(), Some("uuid-string"));
    assert!(err.is_positional());
}

#[test]
fn unknown_subcommand() {
    check("frobnicate", expect!["error: Subcommand used: frobnicate, is not valid for this application"]);

    let err = fixture::users().parse(["frobnicate"]).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::UnknownSubcommand);
    assert_eq!(err.subcommand(), None);
}

#[test]
fn option_of_another_subcommand() {
    check("create abc --gid 5", expect!["error: Unknown option --gid specified"]);
    check("create abc -g 5", expect!["error: Unknown option -g specified"]);
    check("create abc --bogus", expect!["error: Unknown option --bogus specified"]);
}

#[test]
fn too_many_positionals() {
    check("create abc def", expect!["error: Too many positional options specified"]);
}

#[test]
fn invalid_value() {
    check(
        "delete abc -p nope",
        expect!["error: the argument ('nope') for option '--pid' is invalid: invalid digit found in string, likely the provided value can't be parsed into the desired type for the argument"],
    );
}

#[test]
fn repeated_scalar() {
    check(
        "create abc -d a -d b",
        expect!["error: option '--display-name' cannot be specified more than once"],
    );
}

#[test]
fn consistency_check() {
    check(
        "info abc --gid 3",
        expect![[r#"
            subcommand: info
            gid = 3
            uuid-string = abc
        "#]],
    );
    check("info abc --all --gid 3", expect!["error: Options --all and --gid cannot be used together"]);

    let err = fixture::users().parse(["info", "abc", "--all", "-g", "3"]).unwrap().values().unwrap_err();
    assert_eq!(err.kind(), ErrorKind::ConsistencyViolation);
    assert_eq!(err.subcommand(), Some("info"));
}

#[test]
fn help_topics() {
    check(
        "help create delete",
        expect![[r#"
            subcommand: help
            topic = create delete
        "#]],
    );
    check(
        "help",
        expect![[r#"
            subcommand: help
        "#]],
    );
}

#[test]
fn subcommand_parse_is_deferred() {
    let output = fixture::users().parse(["create", "-d", "Bob"]).unwrap();
    let pending = match &output {
        ParseOutput::Subcommand(it) => it,
        ParseOutput::NoSubcommand(_) => panic!("expected a subcommand"),
    };
    assert_eq!(pending.name(), "create");
    assert_eq!(pending.args(), ["-d", "Bob"]);
    assert!(pending.resolve().is_err());
    assert!(output.values().is_err());
}

#[test]
fn positionals_come_first_after_reconstruction() {
    let output = fixture::users().parse(["-e", "a@b.c", "create", "--display-name=Bob", "abc"]).unwrap();
    match &output {
        ParseOutput::Subcommand(it) => {
            assert_eq!(it.args(), ["abc", "-e", "a@b.c", "--display-name=Bob"])
        }
        ParseOutput::NoSubcommand(_) => panic!("expected a subcommand"),
    }
}

#[test]
fn required_app_option_without_subcommand() {
    let mut app = OptionRegistry::new();
    app.register(OptionDef::value::<String>("config", "Path to the configuration").required())
        .unwrap();
    let cli = fixture::cli(vec![Simple::new("x", "does nothing")], app);

    let err = cli.parse(Vec::<String>::new()).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::MissingRequiredOption);
    assert_eq!(err.subcommand(), None);
    assert_eq!(err.option(), Some("--config"));
    expect!["Application used without required option: --config."].assert_eq(&err.to_string());

    let output = cli.parse(["x"]).unwrap();
    assert_eq!(output.subcommand_used(), Some("x"));
    assert!(output.values().unwrap().is_empty());

    let values = cli.parse(["--config", "a.toml"]).unwrap().values().unwrap();
    assert_eq!(values.get_str("config"), Some("a.toml"));
}

#[test]
fn hidden_option_parses_but_is_not_shown() {
    let mut sync = Simple::new("sync", "synchronise users");
    sync.unique
        .register(OptionDef::flag("dry-run", "Only report changes"))
        .unwrap()
        .register(OptionDef::value::<u32>("debug-level", "Internal tracing level").hidden())
        .unwrap();
    let cli = fixture::cli(vec![sync.clone()], OptionRegistry::new());

    let values = cli.parse(["sync", "--debug-level", "3"]).unwrap().values().unwrap();
    assert_eq!(values.get::<u32>("debug-level").unwrap(), Some(3));

    let usage = sync.usage_description();
    assert!(usage.contains("--dry-run"));
    assert!(!usage.contains("debug-level"));
    assert!(!cli.help_text(&["sync"]).contains("debug-level"));
}

#[test]
fn subcommand_given_as_named_option() {
    check(
        "--subcommand help",
        expect![[r#"
            subcommand: help
        "#]],
    );

    let output = fixture::users().parse(["--sub", "create", "-d", "Bob"]).unwrap();
    match &output {
        ParseOutput::Subcommand(it) => assert_eq!(it.args(), ["-d", "Bob"]),
        ParseOutput::NoSubcommand(_) => panic!("expected a subcommand"),
    }
}
