use super::*;

#[test]
fn test_parse_offset_location() {
    let location = parse_location("src/main.ts:42").expect("valid location");
    assert_eq!(location, FileLocation::at_offset("/src/main.ts", 42));
}

#[test]
fn test_parse_line_character_location() {
    let location = parse_location("./src/main.ts:3:7").expect("valid location");
    assert_eq!(location.file, "/src/main.ts");
    assert_eq!(location.offset, None);
    assert_eq!(location.position, Some(Position::new(3, 7)));
}

#[test]
fn test_parse_location_errors() {
    assert!(parse_location("main.ts").is_err());
    assert!(parse_location("main.ts:abc").is_err());
    assert!(parse_location(":12").is_err());
}

#[test]
fn test_query_against_a_directory() {
    let dir = tempfile::TempDir::new().unwrap();
    std::fs::write(dir.path().join("main.ts"), "const answer = 42;\nanswer;").unwrap();
    let args = CliArgs {
        command: Command::Query(QueryArgs {
            kind: QueryKind::Hover,
            location: "main.ts:19".to_string(),
            root: dir.path().to_path_buf(),
            trigger: None,
            entry: None,
            json: true,
        }),
    };
    let mut out = Vec::new();
    run(args, &mut out).unwrap();
    let value: serde_json::Value = serde_json::from_slice(&out).unwrap();
    assert_eq!(value["command"], "hover");
    assert_eq!(value["body"]["kind"], "const");
}

#[test]
fn test_completion_details_query_needs_entry_label() {
    let dir = tempfile::TempDir::new().unwrap();
    std::fs::write(dir.path().join("main.ts"), "const answer = 42;\nans").unwrap();
    let query = |entry: Option<&str>| CliArgs {
        command: Command::Query(QueryArgs {
            kind: QueryKind::CompletionDetails,
            location: "main.ts:22".to_string(),
            root: dir.path().to_path_buf(),
            trigger: None,
            entry: entry.map(str::to_string),
            json: false,
        }),
    };
    let error = run(query(None), &mut Vec::new()).unwrap_err();
    assert!(format!("{error:#}").contains("--entry"));

    let mut out = Vec::new();
    run(query(Some("answer")), &mut out).unwrap();
    let text = String::from_utf8(out).unwrap();
    assert!(text.contains("const answer"), "{text}");
}

#[test]
fn test_query_for_unknown_file_fails() {
    let dir = tempfile::TempDir::new().unwrap();
    std::fs::write(dir.path().join("main.ts"), "let a = 1;").unwrap();
    let args = CliArgs {
        command: Command::Query(QueryArgs {
            kind: QueryKind::Definition,
            location: "other.ts:0".to_string(),
            root: dir.path().to_path_buf(),
            trigger: None,
            entry: None,
            json: false,
        }),
    };
    let error = run(args, &mut Vec::new()).unwrap_err();
    assert!(format!("{error:#}").contains("unknown file"));
}

#[test]
fn test_files_command_lists_virtual_paths() {
    let dir = tempfile::TempDir::new().unwrap();
    std::fs::create_dir_all(dir.path().join("src")).unwrap();
    std::fs::write(dir.path().join("src/a.ts"), "").unwrap();
    std::fs::write(dir.path().join("README.md"), "").unwrap();
    let mut out = Vec::new();
    run(
        CliArgs {
            command: Command::Files {
                root: dir.path().to_path_buf(),
            },
        },
        &mut out,
    )
    .unwrap();
    assert_eq!(String::from_utf8(out).unwrap(), "/src/a.ts\n");
}
