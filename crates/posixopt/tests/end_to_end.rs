use posixopt::{
    Command, Error, Filter, Flag, GetOpt, Param, Term, TypedValue, USAGE_EXIT_CODE,
    VALIDATION_EXIT_CODE,
};

fn users() -> GetOpt {
    let mut getopt = GetOpt::new();
    getopt.add_option(Command::new("add")).unwrap();
    getopt.add_option(Command::new("list").alias("ls")).unwrap();
    getopt.add_option(Term::new("username")).unwrap();
    getopt
        .add_option(Param::new("password").alias("p").required(true))
        .unwrap();
    getopt
        .add_option(
            Param::new("limit")
                .alias("n")
                .value_type("integer")
                .default_value(20i64),
        )
        .unwrap();
    getopt.add_option(Flag::new("verbose").alias("v")).unwrap();
    getopt
        .add_usage("add", ["username", "password", "verbose"])
        .unwrap();
    getopt.add_usage("list", ["limit", "verbose"]).unwrap();
    getopt
}

#[test]
fn add_user() {
    let input = users()
        .parse(["add", "alice", "-p", "secret", "-v"])
        .unwrap();
    assert_eq!(input.command(), Some("add"));
    assert_eq!(input.get_str("username"), Some("alice"));
    assert_eq!(input.get_str("password"), Some("secret"));
    assert_eq!(input.get_bool("verbose"), Some(true));
    assert_eq!(input.get("list"), Some(&TypedValue::Null));
    assert!(input.non_options().is_empty());
}

#[test]
fn missing_required_option() {
    let err = users().parse(["add", "alice"]).unwrap_err();
    assert!(matches!(err, Error::Usage(_)));
    assert_eq!(err.exit_code(), USAGE_EXIT_CODE);
    assert!(err.message().contains("password"));
}

#[test]
fn unknown_long_option() {
    let err = users().parse(["add", "alice", "-p", "x", "--bogus"]).unwrap_err();
    assert_eq!(err.message(), "Unknown option '--bogus'");
    assert!(err.is_client_error());
}

#[test]
fn requirement_follows_command() {
    let input = users().parse(["ls", "-n", "5"]).unwrap();
    assert_eq!(input.command(), Some("list"));
    assert_eq!(input.get_int("limit"), Some(5));
    assert_eq!(input.get("password"), Some(&TypedValue::Null));

    let input = users().parse(["list"]).unwrap();
    assert_eq!(input.get_int("n"), Some(20));
}

#[test]
fn option_outside_usage_is_rejected() {
    let err = users().parse(["list", "-p", "secret"]).unwrap_err();
    assert_eq!(
        err.message(),
        "Option 'password' is not allowed with command 'list'"
    );
}

#[test]
fn bad_integer_is_a_validation_error() {
    let err = users().parse(["list", "--limit=lots"]).unwrap_err();
    assert!(matches!(err, Error::Validation(_)));
    assert_eq!(err.exit_code(), VALIDATION_EXIT_CODE);
}

#[test]
fn two_commands_conflict() {
    let err = users().parse(["add", "--list"]).unwrap_err();
    assert_eq!(err.message(), "Multiple commands specified");

    // A second bare command word is just an operand.
    let input = users().parse(["add", "list", "-p", "x"]).unwrap();
    assert_eq!(input.get_str("username"), Some("list"));
}

#[test]
fn clustered_flags_and_terminator() {
    let mut getopt = GetOpt::new();
    getopt.add_option(Flag::new("all").alias("a")).unwrap();
    getopt.add_option(Flag::new("long").alias("l")).unwrap();
    getopt.add_option(Param::new("width").alias("w")).unwrap();
    getopt.add_option(Term::new("path").required(false)).unwrap();

    let input = getopt
        .parse(["-alw80", "src", "--", "-not-an-option", "--also"])
        .unwrap();
    assert_eq!(input.get_bool("all"), Some(true));
    assert_eq!(input.get_bool("long"), Some(true));
    assert_eq!(input.get_str("width"), Some("80"));
    assert_eq!(input.get_str("path"), Some("src"));
    assert_eq!(input.non_options(), ["-not-an-option", "--also"]);
}

#[test]
fn filter_rejection_is_wrapped() {
    let mut getopt = GetOpt::new();
    getopt
        .add_option(Param::new("greeting").filter(Filter::new(|value| {
            if value.as_str() == Some("hi") {
                Err("too short".to_string())
            } else {
                Ok(value)
            }
        })))
        .unwrap();

    let err = getopt.parse(["--greeting", "hi"]).unwrap_err();
    assert!(matches!(err, Error::Validation(_)));
    assert!(err.message().contains("greeting"));
    assert!(err.message().contains("too short"));

    let input = getopt.parse(["--greeting=hello"]).unwrap();
    assert_eq!(input.get_str("greeting"), Some("hello"));
}

#[test]
fn parsed_input_serializes() {
    let input = users()
        .parse(["add", "bob", "--password", "pw", "extra"])
        .unwrap();
    let json = serde_json::to_value(&input).unwrap();
    assert_eq!(json["command"], "add");
    assert_eq!(json["options"]["username"], "bob");
    assert_eq!(json["options"]["verbose"], false);
    assert_eq!(json["options"]["add"], true);
    assert_eq!(json["non-options"], serde_json::json!(["extra"]));
}
