use json_proc::{
    Command, CommandError, CommandProcessor, Document, QueryError,
    command::parse_chain,
};

fn classroom() -> Document {
    Document::parse(include_str!("fixtures/classroom.json")).unwrap()
}

// ============================================================================
// parse_chain
// ============================================================================

#[test]
fn test_parse_single_command() {
    assert_eq!(parse_chain("count()").unwrap(), vec![Command::Count]);
    assert_eq!(
        parse_chain("  get('name')").unwrap(),
        vec![Command::Get("'name'".into())]
    );
}

#[test]
fn test_parse_full_chain() {
    assert_eq!(
        parse_chain("select('scores').filter(contains('1')).sum()").unwrap(),
        vec![
            Command::Select("'scores'".into()),
            Command::Filter("contains('1')".into()),
            Command::Sum,
        ]
    );
}

#[test]
fn test_parentheses_inside_quotes_are_not_counted() {
    assert_eq!(
        parse_chain("select('a)b').count()").unwrap(),
        vec![Command::Select("'a)b'".into()), Command::Count]
    );
}

#[test]
fn test_apostrophe_in_key_ends_at_first_paren() {
    assert_eq!(
        parse_chain("select('it's').count()").unwrap(),
        vec![Command::Select("'it's'".into()), Command::Count]
    );

    let doc = Document::parse(r#"{"k": [1, 2, 3], "it's": 4}"#).unwrap();
    let processor = CommandProcessor::new(&doc);
    assert_eq!(processor.process("get('it's')"), Some("4".into()));
    assert_eq!(processor.process("select('it's').sum()"), Some("4".into()));
    assert_eq!(
        processor.process("select('k').filter(index > 0).get(*)"),
        Some("[2, 3]".into())
    );
}

#[test]
fn test_trailing_text_is_ignored() {
    assert_eq!(
        parse_chain("select('a').count() // 3").unwrap(),
        vec![Command::Select("'a'".into()), Command::Count]
    );
}

#[test]
fn test_parse_errors() {
    let cases = [
        ("explode()", CommandError::UnknownCommand("explode()".into())),
        ("select('a').size()", CommandError::UnknownCommand("size()".into())),
        ("count", CommandError::MissingArgument("count".into())),
        ("select 'a'", CommandError::MissingArgument("select".into())),
        ("get('a'", CommandError::UnclosedArgument("get".into())),
        ("filter(contains('a')", CommandError::UnclosedArgument("filter".into())),
    ];

    for (line, expected) in cases {
        assert_eq!(parse_chain(line), Err(expected), "Failed for line: {}", line);
    }
}

#[test]
fn test_empty_line_is_unknown() {
    assert!(matches!(parse_chain(""), Err(CommandError::UnknownCommand(_))));
}

// ============================================================================
// CommandProcessor
// ============================================================================

#[test]
fn test_processor_outputs() {
    let doc = classroom();
    let processor = CommandProcessor::new(&doc);

    let cases = [
        ("select('location').get('roomNumber')", Some("247")),
        ("select('students').filter(index>1).count()", Some("2")),
        ("select('scores').sum()", Some("60.25")),
        ("select('flags').sum()", Some("6.5")),
        ("select('location.roomNumber').sum()", Some("247")),
        ("select('instructor').get('name')", Some("\"Rick\"")),
        ("select('flags').filter(contains('oo')).get(*)", Some(r#"{"foo": 1, "boom": 3.5}"#)),
        ("select('students').get('3')", Some("null")),
        ("select('instructor.name').sum()", Some("0")),
        ("count()", Some("5")),
    ];

    for (line, expected) in cases {
        assert_eq!(
            processor.process(line),
            expected.map(str::to_string),
            "Failed for line: {}",
            line
        );
    }
}

#[test]
fn test_processor_yields_nothing() {
    let doc = classroom();
    let processor = CommandProcessor::new(&doc);

    for line in [
        "select('students')",
        "select('students').filter(index>1)",
        "select('students').3.get('grade')",
        "select('students.3').get('grade')",
        "select('location.uh_oh').get('nope')",
        "select('students').filter(size > 1).count()",
        "select('students').explode()",
    ] {
        assert_eq!(processor.process(line), None, "Failed for line: {}", line);
    }
}

#[test]
fn test_each_line_starts_fresh() {
    let doc = classroom();
    let processor = CommandProcessor::new(&doc);

    assert_eq!(processor.process("select('nowhere').count()"), Some("0".into()));
    assert_eq!(processor.process("select('scores').count()"), Some("5".into()));
}

#[test]
fn test_last_command_wins() {
    let doc = classroom();
    let processor = CommandProcessor::new(&doc);
    assert_eq!(
        processor.process("select('scores').count().sum()"),
        Some("60.25".into())
    );
}

#[test]
fn test_try_process_reports_filter_error() {
    let doc = classroom();
    let processor = CommandProcessor::new(&doc);
    assert_eq!(
        processor.try_process("filter(index).count()"),
        Err(CommandError::Filter(QueryError::InvalidFilter("index".into())))
    );
}
