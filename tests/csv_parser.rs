// Parser regression tests against realistic tracker exports.
use issue_import::error::FormatError;
use issue_import::model::{DEFAULT_PROJECT, calculate_stats, parse, parse_rows};

const YOUTRACK_EXPORT: &str = "\u{feff}Issue Id,Project,Summary,State,Tags,Description,Assignee\r\n\
SP-1,Super Project,Login page crashes,Open,\"bug, ui\",\"Steps:\r\n1. open\r\n2. crash\",alice\r\n\
SP-2,Super Project,\"Quote \"\"this\"\" title\",In Progress,,,\r\n\
SP-3,,Orphan issue,Done,backend,,\r\n\
,Other,Untracked idea,,\"ui,  ,ideas\",Plain text,bob\r\n\
SP-4\r\n";

#[test]
fn test_youtrack_export() {
    let records = parse(YOUTRACK_EXPORT).unwrap();
    assert_eq!(records.len(), 4);

    assert_eq!(records[0].title, "SP-1 - Login page crashes");
    assert_eq!(records[0].project, "Super Project");
    assert_eq!(records[0].state, "Open");
    assert_eq!(records[0].tags, vec!["bug", "ui"]);
    assert_eq!(records[0].description, "Steps:\r\n1. open\r\n2. crash");

    assert_eq!(records[1].title, "SP-2 - Quote \"this\" title");
    assert_eq!(records[1].state, "In Progress");
    assert!(records[1].tags.is_empty());
    assert_eq!(records[1].description, "");

    assert_eq!(records[2].project, DEFAULT_PROJECT);
    assert_eq!(records[2].tags, vec!["backend"]);

    assert_eq!(records[3].title, "Untracked idea");
    assert_eq!(records[3].tags, vec!["ui", "ideas"]);
}

#[test]
fn test_short_row_before_summary_is_dropped() {
    // "SP-4" alone has no Summary cell (column 2), so it is skipped without error.
    let rows = parse_rows(YOUTRACK_EXPORT);
    assert_eq!(rows.len(), 6);
    let records = parse(YOUTRACK_EXPORT).unwrap();
    assert!(records.len() <= rows.len() - 1);
    assert!(records.iter().all(|r| !r.title.starts_with("SP-4")));
}

#[test]
fn test_stats_for_export() {
    let stats = calculate_stats(&parse(YOUTRACK_EXPORT).unwrap());
    assert_eq!(stats.total_tasks, 4);
    assert_eq!(stats.project_count, 3);
    // bug, ui, backend, ideas
    assert_eq!(stats.tag_count, 4);
}

#[test]
fn test_one_record_per_data_row() {
    let mut text = String::from("Summary,Project\n");
    for i in 0..50 {
        text.push_str(&format!("\"Task {}, with comma\",P{}\n", i, i % 3));
    }
    let records = parse(&text).unwrap();
    assert_eq!(records.len(), 50);
    assert_eq!(records[7].title, "Task 7, with comma");
    assert_eq!(records[7].project, "P1");
}

#[test]
fn test_extra_and_missing_trailing_columns() {
    let text = "Summary,Project,Tags,State\nA,P,x,Open,unexpected,extra\nB\nC,P2";
    let records = parse(text).unwrap();
    assert_eq!(records.len(), 3);
    assert_eq!(records[0].state, "Open");
    assert_eq!(records[1].project, DEFAULT_PROJECT);
    assert_eq!(records[2].project, "P2");
    assert!(records[2].tags.is_empty());
}

#[test]
fn test_format_errors() {
    assert!(matches!(
        parse("Summary,Project\n"),
        Err(FormatError::TooFewRows { rows: 1 })
    ));
    assert!(matches!(
        parse("Issue Id,Summary\nA-1,x"),
        Err(FormatError::MissingColumns(_))
    ));
    assert!(matches!(
        parse("Issue Id,Project\nA-1,x"),
        Err(FormatError::MissingColumns(_))
    ));
}

#[test]
fn test_error_messages_are_readable() {
    let err = parse("Owner\nbob").unwrap_err();
    assert_eq!(err.to_string(), "missing required column(s): Summary, Project");
}
