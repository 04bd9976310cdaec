use crate::ast::*;
use crate::{interpret, normalize, simulate, OutputFormat, SimOptions, NO_OUTPUT_NOTICE};

// ── Shared fixture runner ───────────────────────────────────────────

/// Embed fixture files at compile time.
const SIMULATE_FIXTURES: &str = include_str!("../test-data/fixtures/simulate.json");

fn html() -> SimOptions {
    SimOptions {
        format: OutputFormat::Html,
    }
}

#[test]
fn test_fixture_simulate() {
    let fixtures: Vec<serde_json::Value> = serde_json::from_str(SIMULATE_FIXTURES).unwrap();
    assert!(!fixtures.is_empty());

    for fixture in &fixtures {
        let name = fixture["name"].as_str().unwrap();
        let input = fixture["input"].as_str().unwrap();
        let expected = fixture["expected"].as_str().unwrap();

        let result = simulate(input, &SimOptions::default());
        assert_eq!(result.output, expected, "Fixture '{}': text output", name);

        if let Some(html_expected) = fixture.get("html").and_then(|v| v.as_str()) {
            let html_result = simulate(input, &html());
            assert_eq!(
                html_result.output, html_expected,
                "Fixture '{}': html output",
                name
            );
        }
        if let Some(count) = fixture.get("statements").and_then(|v| v.as_u64()) {
            assert_eq!(
                result.statements as u64, count,
                "Fixture '{}': statement count",
                name
            );
        }
        if let Some(count) = fixture.get("outputStatements").and_then(|v| v.as_u64()) {
            assert_eq!(
                result.output_statements as u64, count,
                "Fixture '{}': output statement count",
                name
            );
        }
        if let Some(display) = fixture.get("display").and_then(|v| v.as_str()) {
            assert_eq!(result.display(), display, "Fixture '{}': display", name);
        }
    }
}

// ── Normalizer ──────────────────────────────────────────────────────

#[test]
fn test_normalize_removes_delimiters() {
    let out = normalize("<?php X ?>");
    assert!(!out.contains("<?php"));
    assert!(!out.contains("?>"));
    assert_eq!(out.trim(), "X");
}

#[test]
fn test_normalize_strips_line_comment() {
    let out = normalize("echo 1; // drop me\necho 2;");
    assert!(!out.contains("drop me"));
    assert_eq!(interpret(&out), "12");
}

#[test]
fn test_normalize_empty() {
    assert_eq!(normalize(""), "");
    assert_eq!(interpret(""), "");
}

#[test]
fn test_normalize_already_normalized_is_noop() {
    let once = normalize("<?php echo 'a'; # note\n/* block */ echo 'b'; ?>");
    assert_eq!(normalize(&once), once);
}

// ── Statement interpreter ───────────────────────────────────────────

#[test]
fn test_statements_concatenate_without_separator() {
    assert_eq!(interpret("echo \"a\"; echo \"b\";"), "ab");
}

#[test]
fn test_newline_escape() {
    assert_eq!(interpret(r#"echo "Line1\nLine2";"#), "Line1\nLine2");
}

#[test]
fn test_variable_placeholder() {
    let out = interpret("echo $name;");
    assert_eq!(out, "[$name]");
}

#[test]
fn test_pass_through_is_trimmed_verbatim() {
    assert_eq!(interpret("  $x = 5  ;"), "$x = 5");
}

#[test]
fn test_case_insensitive_keyword() {
    assert_eq!(interpret("ECHO \"hi\";"), interpret("echo \"hi\";"));
    assert_eq!(interpret("Print 'hi';"), "hi");
}

#[test]
fn test_blank_statements_contribute_nothing() {
    assert_eq!(interpret(";;  ;\n\t; echo 'x' ;;"), "x");
}

#[test]
fn test_statement_order_preserved() {
    assert_eq!(interpret("echo 3; echo 1; $y; echo 2"), "31$y2");
}

#[test]
fn test_echo_without_fragments() {
    let stmts = crate::parser::parse("echo . ,");
    assert_eq!(
        stmts,
        vec![Statement::Output {
            keyword: Keyword::Echo,
            fragments: vec![],
        }]
    );
    assert_eq!(interpret("echo . ,"), "");
}

// ── Core API ────────────────────────────────────────────────────────

#[test]
fn test_simulate_counts() {
    let result = simulate("<?php $a = 1; echo $a; print 'b'; ?>", &SimOptions::default());
    assert_eq!(result.output, "$a = 1[$a]b");
    assert_eq!(result.statements, 3);
    assert_eq!(result.output_statements, 2);
    assert_eq!(result.display(), "$a = 1[$a]b");
}

#[test]
fn test_display_notice_without_output_statement() {
    let result = simulate("<?php print_r($arr); ?>", &SimOptions::default());
    assert_eq!(result.output, "print_r($arr)");
    assert_eq!(result.display(), NO_OUTPUT_NOTICE);
}

#[test]
fn test_simulate_is_repeatable() {
    let src = "<?php\n$a = 5; $b = 10;\nif ($a > $b) {\n  echo \"$a is greater\";\n}\n?>";
    let first = simulate(src, &html());
    let second = simulate(src, &html());
    assert_eq!(first, second);
}

#[test]
fn test_html_never_leaks_markup() {
    let result = simulate("<script>alert(1)</script>; echo '<img src=x>';", &html());
    assert!(!result.output.contains('<'));
    assert!(!result.output.contains('>'));
}

// ── JSON ────────────────────────────────────────────────────────────

#[test]
fn test_statements_json() {
    let stmts = crate::parser::parse("echo \"a\\n\" . $b . 3; $c = 1");
    let json = crate::json::statements_to_json(&stmts, crate::json::JsonStyle::Compact);
    let parsed: serde_json::Value = serde_json::from_str(&json).unwrap();
    assert_eq!(
        parsed,
        serde_json::json!([
            {
                "kind": "output",
                "keyword": "echo",
                "fragments": [
                    {"kind": "string", "text": "a\\n"},
                    {"kind": "variable", "text": "$b"},
                    {"kind": "raw", "text": "3"}
                ]
            },
            {"kind": "passThrough", "text": "$c = 1"}
        ])
    );
}

#[test]
fn test_statements_json_pretty_is_valid() {
    let stmts = crate::parser::parse("echo; print ,; echo 'x'");
    let json = crate::json::statements_to_json(&stmts, crate::json::JsonStyle::Pretty);
    let parsed: serde_json::Value = serde_json::from_str(&json).unwrap();
    assert_eq!(parsed.as_array().unwrap().len(), 3);
    assert_eq!(parsed[1]["fragments"], serde_json::json!([]));
    assert_eq!(crate::json::statements_to_json(&[], crate::json::JsonStyle::Pretty), "[]");
}

#[test]
fn test_statements_json_escapes_control_characters() {
    let stmts = vec![Statement::PassThrough("a\u{1}b".to_string())];
    let json = crate::json::statements_to_json(&stmts, crate::json::JsonStyle::Compact);
    assert_eq!(json, r#"[{"kind":"passThrough","text":"a\u0001b"}]"#);
}

// ── WASM FFI ────────────────────────────────────────────────────────

/// Copy a returned C string and free it the way a host would.
fn take_c_string(ptr: *const u8) -> String {
    let s = unsafe { std::ffi::CStr::from_ptr(ptr as *const std::os::raw::c_char) }
        .to_str()
        .unwrap()
        .to_string();
    unsafe { crate::dealloc(ptr as *mut u8, s.len() + 1) };
    s
}

fn take_json(ptr: *const u8) -> serde_json::Value {
    serde_json::from_str(&take_c_string(ptr)).unwrap()
}

#[test]
fn test_wasm_simulate() {
    let src = "echo 'a\\tb';";
    let text = take_json(unsafe { crate::wasm_simulate(src.as_ptr(), src.len(), false) });
    assert_eq!(text["output"], "a\u{2003}b");
    assert_eq!(text["display"], "a\u{2003}b");
    assert_eq!(text["statements"], 1);
    assert_eq!(text["outputStatements"], 1);

    let html = take_json(unsafe { crate::wasm_simulate(src.as_ptr(), src.len(), true) });
    assert_eq!(html["output"], "a&emsp;b");
}

#[test]
fn test_wasm_simulate_invalid_utf8() {
    let src = b"echo '\xff';";
    let result = take_json(unsafe { crate::wasm_simulate(src.as_ptr(), src.len(), false) });
    assert_eq!(result["output"], "\u{fffd}");
}

#[test]
fn test_wasm_session_lifecycle() {
    let id = crate::wasm_session_new();
    assert_eq!(take_json(crate::wasm_session_get_output(id)), serde_json::json!({}));

    let src = "<?php\necho \"Hello\" . \" \" . $who;\n?>";
    unsafe { crate::wasm_session_set_source(id, src.as_ptr(), src.len()) };
    let first = take_json(crate::wasm_session_run(id));
    assert_eq!(first["output"], "Hello [$who]");
    assert_eq!(take_json(crate::wasm_session_get_output(id)), first);

    // Clearing drops the output but keeps the snippet.
    crate::wasm_session_clear(id);
    assert_eq!(take_json(crate::wasm_session_get_output(id)), serde_json::json!({}));
    assert_eq!(take_json(crate::wasm_session_run(id)), first);

    crate::wasm_session_set_html(id, true);
    let html = take_json(crate::wasm_session_run(id));
    assert_eq!(html["output"], "Hello [$who]");

    crate::wasm_session_free(id);
    assert_eq!(take_json(crate::wasm_session_run(id)), serde_json::json!({}));
}

#[test]
fn test_wasm_session_no_output_notice() {
    let id = crate::wasm_session_new();
    let result = take_json(crate::wasm_session_run(id));
    assert_eq!(result["output"], "");
    assert_eq!(result["display"], NO_OUTPUT_NOTICE);
    crate::wasm_session_free(id);
}

#[test]
fn test_alloc_roundtrip() {
    let ptr = crate::alloc(16);
    assert!(!ptr.is_null());
    unsafe { crate::dealloc(ptr, 16) };
    unsafe { crate::dealloc(std::ptr::null_mut(), 0) };
}

// ── Errors ──────────────────────────────────────────────────────────

#[test]
fn test_sim_error_display() {
    let err = String::from_utf8(vec![b'a', 0xff]).unwrap_err();
    let sim = crate::error::SimError::invalid_utf8("snippet.php", &err);
    assert_eq!(sim.code, "invalid-utf8");
    assert_eq!(
        sim.to_string(),
        "snippet.php is not valid UTF-8 (at byte 1) (invalid-utf8)"
    );

    let io = std::io::Error::new(std::io::ErrorKind::NotFound, "missing");
    let sim = crate::error::SimError::read_failed("<stdin>", &io);
    assert_eq!(sim.to_string(), "cannot read <stdin>: missing (read-failed)");
}
