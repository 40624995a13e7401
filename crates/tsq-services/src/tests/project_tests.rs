use super::*;
use crate::display::ScriptElementKind;
use crate::fixture::Fixture;
use tsq_common::Position;

fn project(files: &[(&str, &str)]) -> Project {
    let mut vfs = Vfs::new();
    for (path, text) in files {
        vfs.insert(path, *text);
    }
    Project::new(vfs, ServiceOptions::default())
}

#[test]
fn test_edits_publish_new_versions() {
    let project = project(&[("/a.ts", "let a = 1;")]);
    let first = project.snapshot();
    assert_eq!(first.version(), 0);

    let second = project.update_file("/b.ts", "let b = 2;");
    assert_eq!(second.version(), 1);
    assert_eq!(project.snapshot().version(), 1);
    assert!(second.program().file_by_name("/b.ts").is_some());
    // Earlier snapshots keep answering from their own files.
    assert!(first.program().file_by_name("/b.ts").is_none());
}

#[test]
fn test_removing_a_missing_file_keeps_the_snapshot() {
    let project = project(&[("/a.ts", "")]);
    assert_eq!(project.remove_file("/missing.ts").version(), 0);
    let removed = project.remove_file("/a.ts");
    assert_eq!(removed.version(), 1);
    assert!(removed.program().file_by_name("/a.ts").is_none());
}

#[test]
fn test_set_options_rebuilds_with_same_files() {
    let project = project(&[("/a.ts", "let a = 1;")]);
    let options = ServiceOptions {
        max_reference_results: Some(1),
        ..ServiceOptions::default()
    };
    let next = project.set_options(options.clone());
    assert_eq!(next.version(), 1);
    assert_eq!(next.options(), &options);
    assert!(next.program().file_by_name("/a.ts").is_some());
}

#[test]
fn test_execute_dispatches_by_command() {
    let fixture = Fixture::new("const /*d*/value = 1;\n/*u*/value;");
    let (file, offset) = fixture.marker("u");
    let request = Request::Definition {
        location: FileLocation::at_offset(file, offset),
    };
    let Ok(Response::Definition(found)) = fixture.project.execute(&request, &fixture.cancel) else {
        panic!("definition response expected");
    };
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].text_span.start, fixture.marker("d").1);
}

#[test]
fn test_completion_details_describe_symbols_and_keywords() {
    let fixture = Fixture::new(
        "/** Adds one. */\nfunction increment(n: number): number { return n + 1; }\n/*m*/",
    );
    let (file, offset) = fixture.marker("m");
    let details = |entry_name: &str| {
        let request = Request::CompletionDetails {
            location: FileLocation::at_offset(file.clone(), offset),
            entry_name: entry_name.to_string(),
        };
        match fixture.project.execute(&request, &fixture.cancel) {
            Ok(Response::CompletionDetails(details)) => details,
            other => panic!("completion details response expected, got {other:?}"),
        }
    };
    let function = details("increment").expect("function entry");
    assert_eq!(function.kind, ScriptElementKind::Function);
    assert_eq!(function.display_string(), "function increment(n: number): number");
    assert_eq!(function.documentation.to_text(), "Adds one.");

    let keyword = details("function").expect("keyword entry");
    assert_eq!(keyword.kind, ScriptElementKind::Keyword);
    assert_eq!(keyword.display_string(), "function");

    assert!(details("notOffered").is_none());
}

#[test]
fn test_position_is_converted_to_offset() {
    let project = project(&[("/a.ts", "let a = 1;\nlet b = a;")]);
    let snapshot = project.snapshot();
    let location = FileLocation {
        file: "/a.ts".to_string(),
        offset: None,
        position: Some(Position::new(1, 8)),
    };
    assert_eq!(snapshot.resolve_offset(&location), Ok(19));

    let no_cursor = FileLocation {
        position: None,
        ..location.clone()
    };
    assert_eq!(snapshot.resolve_offset(&no_cursor), Ok(0));
}

#[test]
fn test_request_errors() {
    let project = project(&[("/a.ts", "let a = 1;")]);
    let cancel = CancellationToken::new();

    let unknown = Request::Hover {
        location: FileLocation::at_offset("/nope.ts", 0),
    };
    assert_eq!(
        project.execute(&unknown, &cancel),
        Err(RequestError::UnknownFile("/nope.ts".to_string()))
    );

    let out_of_range = Request::Hover {
        location: FileLocation {
            file: "/a.ts".to_string(),
            offset: None,
            position: Some(Position::new(40, 0)),
        },
    };
    assert!(matches!(
        project.execute(&out_of_range, &cancel),
        Err(RequestError::PositionOutOfRange { line: 40, .. })
    ));

    cancel.cancel();
    let hover = Request::Hover {
        location: FileLocation::at_offset("/a.ts", 4),
    };
    assert_eq!(project.execute(&hover, &cancel), Err(RequestError::Cancelled));
}

#[test]
fn test_panic_message_from_payloads() {
    let literal: Box<dyn Any + Send> = Box::new("boom");
    assert_eq!(panic_message(literal.as_ref()), "boom");
    let owned: Box<dyn Any + Send> = Box::new(String::from("bang"));
    assert_eq!(panic_message(owned.as_ref()), "bang");
    let other: Box<dyn Any + Send> = Box::new(7_u8);
    assert_eq!(panic_message(other.as_ref()), "panic with a non-string payload");
}

#[test]
fn test_snapshot_survives_concurrent_edits() {
    let project = Arc::new(project(&[("/a.ts", "let a = 1;")]));
    let handles: Vec<_> = (0..4)
        .map(|i| {
            let project = Arc::clone(&project);
            std::thread::spawn(move || {
                project.update_file(&format!("/f{i}.ts"), "let x = 1;");
            })
        })
        .collect();
    for handle in handles {
        handle.join().expect("edit thread");
    }
    let snapshot = project.snapshot();
    assert_eq!(snapshot.version(), 4);
    for i in 0..4 {
        assert!(snapshot.program().file_by_name(&format!("/f{i}.ts")).is_some());
    }
}
