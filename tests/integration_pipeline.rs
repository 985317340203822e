use assert_matches::assert_matches;

use typebetter::display::RecordingDisplay;
use typebetter::error::MalformedInput;
use typebetter::runtime::{NoPause, ScriptedClock, ScriptedLines};
use typebetter::session::{SessionPhase, TypingSession};
use typebetter::source::{FileSource, PassageSource};
use typebetter::verse::Segmenter;

const FIXTURE: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/tests/data/john3_1-3.json");

const VERSE_1: &str = "Now there was a man of the Pharisees named Nicodemus, a ruler of the Jews. ";
const VERSE_2: &str = "This man came to Jesus by night and said to him, \u{201c}Rabbi, we know that you are a teacher come from God, for no one can do these signs that you do unless God is with him.\u{201d} ";
const VERSE_3: &str = "Jesus answered him, \u{201c}Truly, truly, I say to you, unless one is born again he cannot see the kingdom of God.\u{201d}";

fn fixture_text() -> String {
    FileSource::new(FIXTURE).fetch().unwrap()
}

#[test]
fn api_response_splits_into_decoded_verses() {
    let verses = Segmenter::new().extract(&fixture_text()).unwrap();

    assert_eq!(verses.len(), 3);
    assert_eq!(verses[0].text, VERSE_1);
    assert_eq!(verses[1].text, VERSE_2);
    assert_eq!(verses[2].text, VERSE_3);
    for verse in &verses {
        assert!(!verse.text.contains('\\'));
        assert!(!verse.text.contains("\"]}"));
    }
}

#[test]
fn bracketed_sample_with_em_dash() {
    let raw = format!(
        "\"parsed\": [[1,2]] [1] In the beginning{} [2] the earth.[3] [14]",
        "\\u2014"
    );
    let verses = Segmenter::new().extract(&raw).unwrap();

    assert_eq!(verses.len(), 2);
    assert_eq!(verses[0].number, 1);
    assert_eq!(verses[0].text, "In the beginning\u{2014} ");
    assert_eq!(verses[1].number, 2);
    assert_eq!(verses[1].text, "the earth.");
}

#[test]
fn unknown_escape_aborts_before_segmentation() {
    let raw = format!("\"parsed\": [[1,1]] [1] caf{}", "\\u00e9");
    assert_matches!(
        Segmenter::new().extract(&raw),
        Err(MalformedInput::UnknownEscape { code, .. }) if code == "00e9"
    );
}

#[test]
fn full_session_over_fixture() {
    let verses = Segmenter::new().extract(&fixture_text()).unwrap();
    let typed = [
        format!("{VERSE_1}\n"),
        "This man came to Jesus by night.\n".to_string(),
        format!("{VERSE_3}\r\n"),
    ];

    let mut session = TypingSession::new(
        verses,
        ScriptedLines::new(typed),
        ScriptedClock::from_attempt_secs(&[12, 20, 15]),
        NoPause,
        RecordingDisplay::new(),
    )
    .with_passage("John 3:1-3");

    let report = session.run().unwrap();

    assert_eq!(session.phase(), SessionPhase::Done);
    assert!(report.completed);
    assert_eq!(report.totals.total_verses, 3);
    assert_eq!(report.totals.successes, 2);
    assert_eq!(report.totals.total_secs, 47);
    assert_eq!(report.totals.successful_secs, 27);
    assert_eq!(report.accuracy(), 67.0);

    let outcomes = session.display().outcomes();
    assert_eq!(outcomes.len(), 3);
    assert_eq!(
        outcomes.iter().map(|a| a.verse_number).collect::<Vec<_>>(),
        vec![1, 2, 3]
    );
}

#[test]
fn closed_input_reports_partial_totals() {
    let verses = Segmenter::new().extract(&fixture_text()).unwrap();

    let mut session = TypingSession::new(
        verses,
        ScriptedLines::new([format!("{VERSE_1}\n")]),
        ScriptedClock::from_attempt_secs(&[9]),
        NoPause,
        RecordingDisplay::new(),
    );

    let report = session.run().unwrap();

    assert_eq!(session.phase(), SessionPhase::Terminated(1));
    assert!(!report.completed);
    assert_eq!(report.totals.total_verses, 1);
    assert_eq!(report.totals.successes, 1);
    assert_eq!(report.totals.total_secs, 9);
    assert_eq!(report.verses_in_chapter, 3);
}
