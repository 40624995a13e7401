use super::*;
use serde_json::json;

#[test]
fn test_request_is_tagged_by_command_with_flattened_location() {
    let request: Request = serde_json::from_value(json!({
        "command": "completions",
        "file": "/a.ts",
        "offset": 12,
        "triggerCharacter": "."
    }))
    .expect("valid request");
    assert_eq!(
        request,
        Request::Completions {
            location: FileLocation::at_offset("/a.ts", 12),
            trigger_character: Some(".".to_string()),
        }
    );
    assert_eq!(request.command(), "completions");
}

#[test]
fn test_request_with_line_and_character() {
    let request: Request = serde_json::from_value(json!({
        "command": "signatureHelp",
        "file": "/a.ts",
        "position": { "line": 3, "character": 7 }
    }))
    .expect("valid request");
    let location = request.location();
    assert_eq!(location.offset, None);
    assert_eq!(location.position, Some(Position::new(3, 7)));
    assert!(matches!(
        request,
        Request::SignatureHelp {
            trigger_character: None,
            ..
        }
    ));
}

#[test]
fn test_completion_details_request_carries_entry_name() {
    let request: Request = serde_json::from_value(json!({
        "command": "completionDetails",
        "file": "/a.ts",
        "offset": 3,
        "entryName": "value"
    }))
    .expect("valid request");
    assert_eq!(request.command(), "completionDetails");
    assert_eq!(request.location(), &FileLocation::at_offset("/a.ts", 3));
    assert!(matches!(
        &request,
        Request::CompletionDetails { entry_name, .. } if entry_name == "value"
    ));
    assert!(
        serde_json::from_value::<Request>(json!({ "command": "completionDetails", "file": "/a.ts" })).is_err(),
        "entryName is required"
    );
}

#[test]
fn test_unknown_command_is_rejected() {
    let result = serde_json::from_value::<Request>(json!({ "command": "rename", "file": "/a.ts" }));
    assert!(result.is_err());
}

#[test]
fn test_request_serializes_without_empty_fields() {
    let request = Request::Hover {
        location: FileLocation::at_offset("/a.ts", 4),
    };
    let value = serde_json::to_value(&request).expect("serializes");
    assert_eq!(value, json!({ "command": "hover", "file": "/a.ts", "offset": 4 }));
}

#[test]
fn test_response_carries_command_and_body() {
    let value = serde_json::to_value(Response::Definition(Vec::new())).expect("serializes");
    assert_eq!(value, json!({ "command": "definition", "body": [] }));

    let value = serde_json::to_value(Response::Hover(None)).expect("serializes");
    assert_eq!(value, json!({ "command": "hover", "body": null }));

    let back: Response = serde_json::from_value(json!({ "command": "references", "body": [] }))
        .expect("deserializes");
    assert_eq!(back, Response::References(Vec::new()));
}
