//! Integration tests for the append-only results sink
//!
//! Every test writes into its own tempdir; nothing here touches the real
//! data/ directory.

use tempfile::tempdir;

use parleylab::condition::{BatnaStrength, Condition, Experience, ReplyTempo};
use parleylab::results::{submit_session, ResultRow, ResultsStore};
use parleylab::session::{ChatMessage, Phase, Session, Speaker};

fn sample_row() -> ResultRow {
    ResultRow {
        ts: "2026-08-30T12:00:00.000Z".to_string(),
        tempo: ReplyTempo::CounterOffer,
        batna: BatnaStrength::Weak,
        offer_eur: 500,
        response_time_ms: Some(14_300),
        satisfaction: 5,
        fairness: 6,
        regret: 2,
        age: 31,
        experience: Experience::Medium,
    }
}

/// Drive a session into the Survey phase, ready for submission.
fn session_ready_to_submit() -> Session {
    let mut session = Session::new(Condition {
        tempo: ReplyTempo::Immediate,
        batna: BatnaStrength::Strong,
    });
    session.advance().unwrap();
    session.send_offer(450).unwrap();
    session.push_message(ChatMessage::new(
        Speaker::Client,
        "That sounds great, I'll take your offer right away!",
    ));
    session.finish_chat().unwrap();
    session
}

#[test]
fn test_header_written_exactly_once() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("results.csv");
    let store = ResultsStore::new(&path);

    store.append(&sample_row()).unwrap();
    store.append(&sample_row()).unwrap();

    let content = std::fs::read_to_string(&path).unwrap();
    let lines: Vec<&str> = content.lines().collect();
    assert_eq!(lines.len(), 3);
    assert_eq!(
        lines[0],
        "ts,tempo,batna,offer_eur,response_time_ms,satisfaction,fairness,regret,age,experience"
    );
    assert!(lines[1].starts_with("2026-08-30T12:00:00.000Z,counteroffer,weak,500,"));
}

#[test]
fn test_parent_directory_is_created() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("nested").join("deep").join("results.csv");

    let store = ResultsStore::new(&path);
    store.append(&sample_row()).unwrap();
    assert!(path.exists());
}

#[test]
fn test_rows_read_back_intact() {
    let dir = tempdir().unwrap();
    let store = ResultsStore::new(dir.path().join("results.csv"));

    let mut missing_latency = sample_row();
    missing_latency.response_time_ms = None;

    store.append(&sample_row()).unwrap();
    store.append(&missing_latency).unwrap();

    let rows = store.read_rows().unwrap();
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0], sample_row());
    assert_eq!(rows[1].response_time_ms, None);
}

#[test]
fn test_submit_session_appends_one_row_and_finishes() {
    let dir = tempdir().unwrap();
    let store = ResultsStore::new(dir.path().join("results.csv"));

    let mut session = session_ready_to_submit();
    submit_session(&store, &mut session).unwrap();

    assert_eq!(session.phase(), Phase::Done);
    assert!(session.is_submitted());

    let rows = store.read_rows().unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].tempo, ReplyTempo::Immediate);
    assert_eq!(rows[0].offer_eur, 450);
    assert!(rows[0].response_time_ms.is_some());
}

#[test]
fn test_double_submission_writes_no_second_row() {
    let dir = tempdir().unwrap();
    let store = ResultsStore::new(dir.path().join("results.csv"));

    let mut session = session_ready_to_submit();
    submit_session(&store, &mut session).unwrap();
    assert!(submit_session(&store, &mut session).is_err());

    assert_eq!(store.read_rows().unwrap().len(), 1);
}

#[test]
fn test_submit_outside_survey_writes_nothing() {
    let dir = tempdir().unwrap();
    let store = ResultsStore::new(dir.path().join("results.csv"));

    // Still in Chat: the negotiation has not been left for the questionnaire
    let mut session = Session::new(Condition {
        tempo: ReplyTempo::Immediate,
        batna: BatnaStrength::Strong,
    });
    session.advance().unwrap();
    session.send_offer(450).unwrap();
    session.push_message(ChatMessage::new(
        Speaker::Client,
        "That sounds great, I'll take your offer right away!",
    ));

    assert!(submit_session(&store, &mut session).is_err());
    assert_eq!(session.phase(), Phase::Chat);
    assert!(!session.is_submitted());
    // The rejected submission must not have touched the file
    assert!(!store.path().exists());

    // Finishing the chat makes the same session submittable, with one row
    session.finish_chat().unwrap();
    submit_session(&store, &mut session).unwrap();
    assert_eq!(store.read_rows().unwrap().len(), 1);
}

#[test]
fn test_failed_write_leaves_session_submittable() {
    let dir = tempdir().unwrap();
    // A store pointed at a directory cannot append
    let broken = ResultsStore::new(dir.path());
    let good = ResultsStore::new(dir.path().join("results.csv"));

    let mut session = session_ready_to_submit();
    assert!(submit_session(&broken, &mut session).is_err());
    assert_eq!(session.phase(), Phase::Survey);
    assert!(!session.is_submitted());

    // Retrying against a working store succeeds
    submit_session(&good, &mut session).unwrap();
    assert_eq!(session.phase(), Phase::Done);
    assert_eq!(good.read_rows().unwrap().len(), 1);
}

#[test]
fn test_summary_aggregates_per_condition() {
    let dir = tempdir().unwrap();
    let store = ResultsStore::new(dir.path().join("results.csv"));

    let mut a = sample_row();
    a.satisfaction = 4;
    let mut b = sample_row();
    b.satisfaction = 6;
    let mut other = sample_row();
    other.tempo = ReplyTempo::Immediate;
    other.batna = BatnaStrength::Strong;
    other.response_time_ms = None;

    store.append(&a).unwrap();
    store.append(&b).unwrap();
    store.append(&other).unwrap();

    let summaries = store.summarize().unwrap();
    assert_eq!(summaries.len(), 2);

    let counter = summaries
        .iter()
        .find(|s| s.condition.tempo == ReplyTempo::CounterOffer)
        .unwrap();
    assert_eq!(counter.sessions, 2);
    assert!((counter.mean_satisfaction - 5.0).abs() < f64::EPSILON);
    assert_eq!(counter.mean_response_ms, Some(14_300.0));

    let immediate = summaries
        .iter()
        .find(|s| s.condition.tempo == ReplyTempo::Immediate)
        .unwrap();
    assert_eq!(immediate.sessions, 1);
    assert_eq!(immediate.mean_response_ms, None);
}

#[test]
fn test_fields_with_commas_survive_the_roundtrip() {
    let dir = tempdir().unwrap();
    let store = ResultsStore::new(dir.path().join("results.csv"));

    let mut row = sample_row();
    row.ts = "quoted, \"odd\" timestamp".to_string();
    store.append(&row).unwrap();

    let rows = store.read_rows().unwrap();
    assert_eq!(rows[0].ts, row.ts);
}

#[test]
fn test_fields_with_newlines_survive_the_roundtrip() {
    let dir = tempdir().unwrap();
    let store = ResultsStore::new(dir.path().join("results.csv"));

    let mut multiline = sample_row();
    multiline.ts = "line1\nline2".to_string();
    store.append(&multiline).unwrap();
    // A plain row after the multi-line one must still parse
    store.append(&sample_row()).unwrap();

    let rows = store.read_rows().unwrap();
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0].ts, "line1\nline2");
    assert_eq!(rows[1], sample_row());
}
