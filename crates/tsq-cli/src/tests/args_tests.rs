use super::*;

#[test]
fn test_query_arguments() {
    let args = CliArgs::try_parse_from([
        "tsq",
        "query",
        "completions",
        "src/a.ts:10",
        "-p",
        "/work",
        "--trigger",
        ".",
        "--json",
    ])
    .unwrap();
    let Command::Query(query) = args.command else {
        panic!("expected a query command");
    };
    assert_eq!(query.kind, QueryKind::Completions);
    assert_eq!(query.location, "src/a.ts:10");
    assert_eq!(query.root, PathBuf::from("/work"));
    assert_eq!(query.trigger.as_deref(), Some("."));
    assert!(query.json);
}

#[test]
fn test_signature_help_spellings() {
    for spelling in ["signature-help", "signatureHelp"] {
        let args = CliArgs::try_parse_from(["tsq", "query", spelling, "a.ts:0"]).unwrap();
        assert!(matches!(
            args.command,
            Command::Query(QueryArgs {
                kind: QueryKind::SignatureHelp,
                ..
            })
        ));
    }
}

#[test]
fn test_serve_defaults_to_current_directory() {
    let args = CliArgs::try_parse_from(["tsq", "serve"]).unwrap();
    assert!(matches!(args.command, Command::Serve { root } if root == PathBuf::from(".")));
}

#[test]
fn test_unknown_query_kind_is_rejected() {
    assert!(CliArgs::try_parse_from(["tsq", "query", "rename", "a.ts:0"]).is_err());
}

#[test]
fn test_completion_details_takes_entry_label() {
    let args =
        CliArgs::try_parse_from(["tsq", "query", "completion-details", "a.ts:4", "--entry", "value"]).unwrap();
    let Command::Query(query) = args.command else {
        panic!("expected a query command");
    };
    assert_eq!(query.kind, QueryKind::CompletionDetails);
    assert_eq!(query.entry.as_deref(), Some("value"));
}
