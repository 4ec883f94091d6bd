use std::path::{Path, PathBuf};

use json_proc::{
    NumberPolicy,
    cli::{
        CliError, EMPTY_MARKER, LoadOptions, QueryOptions, ShowOptions, execute_queries,
        execute_show, parse_script, run_script_file,
    },
};

fn fixtures() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("tests").join("fixtures")
}

const CLASSROOM: &str = include_str!("fixtures/classroom.json");

// ============================================================================
// Script parsing
// ============================================================================

#[test]
fn test_parse_script() {
    let script = parse_script(
        "data.json\nselect('a').count() // 3\n\n   \nselect('b').get('c')//  \"x\"  \nsum()\n",
    )
    .unwrap();

    assert_eq!(script.json_file, "data.json");
    assert_eq!(script.lines.len(), 3);

    assert_eq!(script.lines[0].number, 2);
    assert_eq!(script.lines[0].query, "select('a').count()");
    assert_eq!(script.lines[0].expected.as_deref(), Some("3"));

    assert_eq!(script.lines[1].number, 5);
    assert_eq!(script.lines[1].expected.as_deref(), Some("\"x\""));

    assert_eq!(script.lines[2].query, "sum()");
    assert_eq!(script.lines[2].expected, None);
}

#[test]
fn test_script_needs_json_target() {
    assert!(matches!(
        parse_script("select('a').count() // 1"),
        Err(CliError::MissingJsonTarget)
    ));
    assert!(matches!(parse_script(""), Err(CliError::MissingJsonTarget)));
}

#[test]
fn test_script_json_path() {
    let script = parse_script("classroom.json\n").unwrap();
    assert_eq!(script.json_path(&fixtures()), fixtures().join("classroom.json"));
}

// ============================================================================
// Running scripts
// ============================================================================

#[test]
fn test_classroom_script_passes() {
    let report = run_script_file(
        &fixtures().join("classroom.txt"),
        &fixtures(),
        &LoadOptions::default(),
    )
    .unwrap();

    let failures: Vec<_> = report
        .failures()
        .map(|o| format!("line {}: {:?}", o.line.number, o.actual))
        .collect();
    assert!(failures.is_empty(), "Unexpected failures: {:?}", failures);
    assert_eq!(report.outcomes.len(), 15);
    assert!(report.passed());
    assert!(report.into_result().is_ok());
}

#[test]
fn test_failing_script_reports_lines() {
    let report = run_script_file(
        &fixtures().join("failing.txt"),
        &fixtures(),
        &LoadOptions::default(),
    )
    .unwrap();

    assert!(!report.passed());
    let failed: Vec<usize> = report.failures().map(|o| o.line.number).collect();
    assert_eq!(failed, vec![3, 4]);
    assert_eq!(report.outcomes[1].actual.as_deref(), Some("5"));

    assert!(matches!(
        report.into_result(),
        Err(CliError::ScriptFailed { failed: 2, total: 3 })
    ));
}

#[test]
fn test_empty_marker_matches_no_result() {
    let text = format!("x.json\nselect('nope').get('x') // {}", EMPTY_MARKER);
    let script = parse_script(&text).unwrap();
    let doc = json_proc::Document::parse(CLASSROOM).unwrap();
    assert!(script.run(&doc).passed());
}

#[test]
fn test_comparison_ignores_whitespace() {
    let text = "x.json\nselect('instructor').get(*) // {\"name\":\"Rick\",\t\"rating\" :  4.5}";
    let script = parse_script(text).unwrap();
    let doc = json_proc::Document::parse(CLASSROOM).unwrap();
    assert!(script.run(&doc).passed());
}

#[test]
fn test_missing_json_file_is_io_error() {
    let dir = std::env::temp_dir().join("json-proc-script-test");
    std::fs::create_dir_all(&dir).unwrap();
    let script = dir.join("missing.txt");
    std::fs::write(&script, "does-not-exist.json\ncount() // 0\n").unwrap();

    let result = run_script_file(&script, &dir, &LoadOptions::default());
    assert!(matches!(result, Err(CliError::Io(_))));
}

// ============================================================================
// Query and show
// ============================================================================

#[test]
fn test_execute_queries() {
    let options = QueryOptions {
        queries: vec![
            "select('students').count()".to_string(),
            "select('students').explode()".to_string(),
            "select('instructor').get('rating')".to_string(),
        ],
        input: Some(CLASSROOM.to_string()),
        load: LoadOptions::default(),
    };

    assert_eq!(
        execute_queries(&options).unwrap(),
        vec![Some("4".to_string()), None, Some("4.5".to_string())]
    );
}

#[test]
fn test_execute_queries_lexical_numbers() {
    let options = QueryOptions {
        queries: vec!["get('a')".to_string()],
        input: Some(r#"{"a": 2.0}"#.to_string()),
        load: LoadOptions {
            policy: NumberPolicy::Lexical,
            strict: false,
        },
    };
    assert_eq!(execute_queries(&options).unwrap(), vec![Some("2.0".to_string())]);

    let options = QueryOptions {
        load: LoadOptions::default(),
        ..options
    };
    assert_eq!(execute_queries(&options).unwrap(), vec![Some("2".to_string())]);
}

#[test]
fn test_no_input() {
    let options = QueryOptions {
        queries: vec!["count()".to_string()],
        ..QueryOptions::default()
    };
    assert!(matches!(execute_queries(&options), Err(CliError::NoInput)));
    assert!(matches!(execute_show(&ShowOptions::default()), Err(CliError::NoInput)));
}

#[test]
fn test_strict_mode_rejects_malformed_input() {
    let input = r#"{"a": [1, 2}"#;

    let lenient = QueryOptions {
        queries: vec!["select('a').count()".to_string()],
        input: Some(input.to_string()),
        load: LoadOptions::default(),
    };
    assert!(execute_queries(&lenient).is_ok());

    let strict = QueryOptions {
        load: LoadOptions {
            strict: true,
            ..LoadOptions::default()
        },
        ..lenient
    };
    assert!(matches!(execute_queries(&strict), Err(CliError::Json(_))));
}

#[test]
fn test_non_object_input_is_parse_error() {
    let options = QueryOptions {
        queries: vec!["count()".to_string()],
        input: Some("[1, 2]".to_string()),
        load: LoadOptions::default(),
    };
    assert!(matches!(execute_queries(&options), Err(CliError::Parse(_))));
}

#[test]
fn test_execute_show() {
    let options = ShowOptions {
        path: "'instructor'".to_string(),
        input: Some(CLASSROOM.to_string()),
        ..ShowOptions::default()
    };
    assert_eq!(
        execute_show(&options).unwrap(),
        r#"{"name": "Rick", "rating": 4.5}"#
    );

    let pretty = ShowOptions {
        pretty: true,
        ..options
    };
    assert_eq!(
        execute_show(&pretty).unwrap(),
        "{\n  \"name\": \"Rick\",\n  \"rating\": 4.5\n}"
    );
}

#[test]
fn test_show_unresolved_path() {
    let options = ShowOptions {
        path: "students.7".to_string(),
        input: Some(CLASSROOM.to_string()),
        ..ShowOptions::default()
    };
    assert!(matches!(execute_show(&options), Err(CliError::Path(_))));
}
