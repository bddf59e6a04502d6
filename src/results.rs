//! Result sink: one appended CSV row per completed session.
//!
//! The results file is append-only. The header is written iff the file does
//! not exist yet, fields containing commas, quotes, or newlines are quoted
//! with doubled quotes, and rows can be read back for the `summary`
//! subcommand and tests.

use crate::condition::{BatnaStrength, Condition, Experience, ReplyTempo};
use crate::session::{Phase, Session};
use anyhow::{Context, Result, bail};
use chrono::{SecondsFormat, Utc};
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// Default location of the results file, relative to the working directory
pub const DEFAULT_RESULTS_PATH: &str = "data/results.csv";

/// Column names, in row order
const HEADER: &str =
    "ts,tempo,batna,offer_eur,response_time_ms,satisfaction,fairness,regret,age,experience";

/// One result row — exactly the per-session fields, in column order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResultRow {
    /// ISO-8601 UTC timestamp of the submission
    pub ts: String,
    pub tempo: ReplyTempo,
    pub batna: BatnaStrength,
    pub offer_eur: u32,
    /// Empty in the CSV when the negotiation produced no measurement
    pub response_time_ms: Option<u64>,
    pub satisfaction: u8,
    pub fairness: u8,
    pub regret: u8,
    pub age: u8,
    pub experience: Experience,
}

impl ResultRow {
    /// Build the row for a session, stamped with the current time.
    pub fn from_session(session: &Session) -> Self {
        let survey = session.survey();
        Self {
            ts: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
            tempo: session.condition().tempo,
            batna: session.condition().batna,
            offer_eur: session.offer_eur(),
            response_time_ms: session.response_time_ms(),
            satisfaction: survey.satisfaction,
            fairness: survey.fairness,
            regret: survey.regret,
            age: survey.age,
            experience: survey.experience,
        }
    }

    /// Encode the row as one CSV line (without trailing newline).
    pub fn to_csv_line(&self) -> String {
        let fields = [
            quote_field(&self.ts),
            quote_field(&self.tempo.to_string()),
            quote_field(&self.batna.to_string()),
            self.offer_eur.to_string(),
            self.response_time_ms
                .map(|ms| ms.to_string())
                .unwrap_or_default(),
            self.satisfaction.to_string(),
            self.fairness.to_string(),
            self.regret.to_string(),
            self.age.to_string(),
            quote_field(&self.experience.to_string()),
        ];
        fields.join(",")
    }

    /// Parse one CSV line back into a row.
    pub fn from_csv_line(line: &str) -> Result<Self> {
        let fields = split_csv_line(line)?;
        if fields.len() != 10 {
            bail!("expected 10 fields, found {}: {:?}", fields.len(), line);
        }

        Ok(Self {
            ts: fields[0].clone(),
            tempo: ReplyTempo::from_str(&fields[1])
                .with_context(|| format!("invalid tempo {:?}", fields[1]))?,
            batna: BatnaStrength::from_str(&fields[2])
                .with_context(|| format!("invalid batna {:?}", fields[2]))?,
            offer_eur: fields[3]
                .parse()
                .with_context(|| format!("invalid offer {:?}", fields[3]))?,
            response_time_ms: if fields[4].is_empty() {
                None
            } else {
                Some(
                    fields[4]
                        .parse()
                        .with_context(|| format!("invalid response time {:?}", fields[4]))?,
                )
            },
            satisfaction: fields[5].parse().context("invalid satisfaction")?,
            fairness: fields[6].parse().context("invalid fairness")?,
            regret: fields[7].parse().context("invalid regret")?,
            age: fields[8].parse().context("invalid age")?,
            experience: Experience::from_str(&fields[9])
                .with_context(|| format!("invalid experience {:?}", fields[9]))?,
        })
    }

    pub fn condition(&self) -> Condition {
        Condition {
            tempo: self.tempo,
            batna: self.batna,
        }
    }
}

/// Quote a field for CSV if it contains a comma, quote, or newline.
fn quote_field(field: &str) -> String {
    if field.contains(',') || field.contains('"') || field.contains('\n') {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}

/// Reassemble physical lines into logical CSV records.
///
/// A quoted field may contain a newline, so a record only ends on a line
/// break that leaves an even number of quote characters behind (doubled
/// quotes contribute two and cancel out).
fn split_records(content: &str) -> Vec<String> {
    let mut records = Vec::new();
    let mut current = String::new();

    for line in content.lines() {
        if !current.is_empty() {
            current.push('\n');
        }
        current.push_str(line);
        if current.matches('"').count() % 2 == 0 {
            records.push(std::mem::take(&mut current));
        }
    }
    if !current.is_empty() {
        // Unterminated quote; from_csv_line reports it
        records.push(current);
    }
    records
}

/// Split one CSV line into fields, honoring quoted fields with doubled quotes.
fn split_csv_line(line: &str) -> Result<Vec<String>> {
    let mut fields = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;
    let mut chars = line.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '"' if in_quotes => {
                if chars.peek() == Some(&'"') {
                    chars.next();
                    current.push('"');
                } else {
                    in_quotes = false;
                }
            }
            '"' => in_quotes = true,
            ',' if !in_quotes => {
                fields.push(std::mem::take(&mut current));
            }
            _ => current.push(c),
        }
    }
    if in_quotes {
        bail!("unterminated quoted field in line {:?}", line);
    }
    fields.push(current);
    Ok(fields)
}

/// Append-only CSV store for result rows.
#[derive(Debug, Clone)]
pub struct ResultsStore {
    path: PathBuf,
}

impl ResultsStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Append one row, creating the parent directory and the header on first
    /// use.
    pub fn append(&self, row: &ResultRow) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).with_context(|| {
                    format!("Failed to create results directory {:?}", parent)
                })?;
            }
        }

        let header_needed = !self.path.exists();

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .with_context(|| format!("Failed to open results file {:?}", self.path))?;

        if header_needed {
            writeln!(file, "{HEADER}")
                .with_context(|| format!("Failed to write header to {:?}", self.path))?;
        }
        writeln!(file, "{}", row.to_csv_line())
            .with_context(|| format!("Failed to append row to {:?}", self.path))?;

        Ok(())
    }

    /// Read all rows back (skipping the header). Fails if the file is absent.
    pub fn read_rows(&self) -> Result<Vec<ResultRow>> {
        let content = fs::read_to_string(&self.path)
            .with_context(|| format!("Failed to read results file {:?}", self.path))?;

        split_records(&content)
            .into_iter()
            .skip(1) // header
            .filter(|record| !record.trim().is_empty())
            .map(|record| ResultRow::from_csv_line(&record))
            .collect()
    }

    /// Per-condition counts and means over the stored rows.
    pub fn summarize(&self) -> Result<Vec<ConditionSummary>> {
        let rows = self.read_rows()?;
        let mut summaries = Vec::new();

        for condition in Condition::all_combinations() {
            let matching: Vec<&ResultRow> = rows
                .iter()
                .filter(|r| r.condition() == condition)
                .collect();
            if matching.is_empty() {
                continue;
            }

            let n = matching.len();
            let mean_satisfaction =
                matching.iter().map(|r| r.satisfaction as f64).sum::<f64>() / n as f64;
            let timed: Vec<u64> = matching
                .iter()
                .filter_map(|r| r.response_time_ms)
                .collect();
            let mean_response_ms = if timed.is_empty() {
                None
            } else {
                Some(timed.iter().sum::<u64>() as f64 / timed.len() as f64)
            };

            summaries.push(ConditionSummary {
                condition,
                sessions: n,
                mean_satisfaction,
                mean_response_ms,
            });
        }

        Ok(summaries)
    }
}

/// Aggregates printed by the `summary` subcommand.
#[derive(Debug, Clone, PartialEq)]
pub struct ConditionSummary {
    pub condition: Condition,
    pub sessions: usize,
    pub mean_satisfaction: f64,
    pub mean_response_ms: Option<f64>,
}

/// Write the session's result row and finish the session.
///
/// The submitted flag flips only after a successful write: a failed append
/// returns the error, leaves the session in the Survey phase, and the
/// participant can submit again manually. Calling this on an already
/// submitted session, or on a session outside the Survey phase, is an error
/// before anything is written, which is what keeps repeated submission from
/// duplicating rows.
pub fn submit_session(store: &ResultsStore, session: &mut Session) -> Result<()> {
    if session.is_submitted() {
        bail!("results for this session were already submitted");
    }
    // Phase check precedes the append: no row may land on disk for a
    // session that cannot finish.
    if session.phase() != Phase::Survey {
        bail!("session is in {} and cannot be submitted", session.phase());
    }

    let row = ResultRow::from_session(session);
    store.append(&row)?;
    session
        .mark_submitted()
        .context("session left the Survey phase before submission")?;

    tracing::info!(
        condition = %row.condition(),
        offer_eur = row.offer_eur,
        response_time_ms = ?row.response_time_ms,
        "result row appended"
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_row() -> ResultRow {
        ResultRow {
            ts: "2026-08-30T12:00:00.000Z".to_string(),
            tempo: ReplyTempo::Deliberate,
            batna: BatnaStrength::Weak,
            offer_eur: 450,
            response_time_ms: Some(20_123),
            satisfaction: 5,
            fairness: 6,
            regret: 2,
            age: 31,
            experience: Experience::Medium,
        }
    }

    #[test]
    fn test_csv_line_field_order() {
        let line = sample_row().to_csv_line();
        assert_eq!(
            line,
            "2026-08-30T12:00:00.000Z,deliberate,weak,450,20123,5,6,2,31,medium"
        );
    }

    #[test]
    fn test_missing_latency_is_empty_field() {
        let mut row = sample_row();
        row.response_time_ms = None;
        let line = row.to_csv_line();
        assert!(line.contains(",weak,450,,5,"));

        let parsed = ResultRow::from_csv_line(&line).unwrap();
        assert_eq!(parsed.response_time_ms, None);
    }

    #[test]
    fn test_row_roundtrip() {
        let row = sample_row();
        let parsed = ResultRow::from_csv_line(&row.to_csv_line()).unwrap();
        assert_eq!(parsed, row);
    }

    #[test]
    fn test_quoting_special_characters() {
        assert_eq!(quote_field("plain"), "plain");
        assert_eq!(quote_field("a,b"), "\"a,b\"");
        assert_eq!(quote_field("say \"hi\""), "\"say \"\"hi\"\"\"");

        let fields = split_csv_line("\"a,b\",\"say \"\"hi\"\"\",rest").unwrap();
        assert_eq!(fields, vec!["a,b", "say \"hi\"", "rest"]);
    }

    #[test]
    fn test_unterminated_quote_is_an_error() {
        assert!(split_csv_line("\"never closed,1,2").is_err());
    }

    #[test]
    fn test_split_records_keeps_quoted_newlines_together() {
        let records = split_records("h1,h2\n\"line1\nline2\",x\nplain,y");
        assert_eq!(
            records,
            vec!["h1,h2", "\"line1\nline2\",x", "plain,y"]
        );
    }

    #[test]
    fn test_from_csv_line_rejects_wrong_arity() {
        assert!(ResultRow::from_csv_line("a,b,c").is_err());
    }
}
