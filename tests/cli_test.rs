mod common;

use common::TestContext;

#[test]
fn test_normalize_to_stdout() {
    let ctx = TestContext::new();
    let input = ctx.write("in.html", "<p>a</p><p></p><p>b</p>");

    let output = ctx.run(&["normalize", input.to_str().unwrap()]);
    assert!(output.status.success());
    assert_eq!(String::from_utf8_lossy(&output.stdout), "<p>a</p>\n<p>b</p>\n");
}

#[test]
fn test_normalize_minimal_preset_to_file() {
    let ctx = TestContext::new();
    let input = ctx.write("in.html", "plain\ntext");
    let out = ctx.path("out.html");

    let output = ctx.run(&[
        "normalize",
        input.to_str().unwrap(),
        "--preset",
        "minimal",
        "--output",
        out.to_str().unwrap(),
    ]);
    assert!(output.status.success());
    assert_eq!(common::read(&out), "plain text");
}

#[test]
fn test_export_text_file_as_json() {
    let ctx = TestContext::new();
    let input = ctx.write("notes.txt", "Hello\nWorld");

    let output = ctx.run(&["export", input.to_str().unwrap(), "--format", "json"]);
    assert!(output.status.success());
    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(value["type"], "doc");
    assert_eq!(value["content"][1]["content"][0]["text"], "World");
}

#[test]
fn test_export_html_default_format() {
    let ctx = TestContext::new();
    let input = ctx.write("notes.txt", "Hello\nWorld");

    let output = ctx.run(&["export", input.to_str().unwrap()]);
    assert!(output.status.success());
    assert_eq!(
        String::from_utf8_lossy(&output.stdout),
        "<p>Hello</p>\n<p>World</p>\n"
    );
}

#[test]
fn test_missing_file_fails() {
    let ctx = TestContext::new();
    let missing = ctx.path("nope.html");
    let output = ctx.run(&["normalize", missing.to_str().unwrap()]);
    assert!(!output.status.success());
}
