use expect_test::expect;

use crate::fixture;

#[test]
fn application_usage() {
    let cli = fixture::users();
    expect![[r#"
        Application that is alternative to radosgw-admin
        USAGE: user-admin [--version] subcommand

          --version               Display the version information for the application

          subcommand              The subcommand to execute, see below:
            create                create a user from the provided string
            delete                delete user with uuid from the provided string
            help                  display help for other subcommand(s)
            info                  list user with uuid from the provided string

    "#]]
    .assert_eq(&cli.help_text::<&str>(&[]));
}

#[test]
fn subcommand_topics() {
    let cli = fixture::users();
    expect![[r#"
        Subcommand: create

        create a user from the provided string
        USAGE: create [-d ARG] [-e ARG] uuid-string

        Positional arguments:
          uuid-string             String for the uuid of the user

        Options:
          -d [ --display-name ] arg Display name of the user
          -e [ --email ] arg      Email of the user

        Topic requested: nope, does not exist and no help can be displayed

    "#]]
    .assert_eq(&cli.help_text(&["create", "nope"]));

    let mut out = Vec::new();
    cli.display_help(&["delete"], &mut out).unwrap();
    let out = String::from_utf8(out).unwrap();
    assert!(out.starts_with("Subcommand: delete\n"));
    assert!(out.contains("  -p [ --pid ] arg        This is the pid of the user\n"));
}

#[test]
fn help_lists_every_topic() {
    let cli = fixture::users();
    let help = cli.help_text(&["help"]);
    assert!(help.contains("USAGE: help [topic...]\n"));
    assert!(help.ends_with("\nAvailable Topics:\n  create\n  delete\n  info\n\n"));
}

#[test]
fn parsing_error_display() {
    let cli = fixture::users();
    let err = cli.parse(["create"]).unwrap().values().unwrap_err();

    let (mut out, mut err_out) = (Vec::new(), Vec::new());
    cli.display_parsing_error(&err, &mut out, &mut err_out).unwrap();
    let out = String::from_utf8(out).unwrap();
    assert!(out.starts_with("Subcommand: create\n"));
    expect![[r#"

        ERROR: Parsing command line options failed
        Subcommand 'create' used without required positional option: uuid-string.

    "#]]
    .assert_eq(&String::from_utf8(err_out).unwrap());

    let err = cli.parse(["--bogus"]).unwrap_err();
    let (mut out, mut err_out) = (Vec::new(), Vec::new());
    cli.display_parsing_error(&err, &mut out, &mut err_out).unwrap();
    assert!(String::from_utf8(out).unwrap().starts_with("Application that is alternative"));
}
