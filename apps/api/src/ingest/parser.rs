//! Candidate CSV decoding.
//!
//! Header names map onto record fields through a fixed column table. Only
//! `Name` is mandatory; any other missing column decodes as an empty value.
//! Quoted fields are honoured. A row carrying more cells than there are
//! headers folds the surplus into the last column, so an unquoted list such
//! as `Go, SQL` in the final column survives intact.

use std::collections::HashMap;

use chrono::NaiveDate;
use thiserror::Error;
use tracing::warn;

use crate::models::candidate::{resume_url_for, CandidateRecord, Verdict};

#[derive(Debug, Error)]
pub enum CsvError {
    #[error("CSV source is empty")]
    Empty,

    #[error("missing required column '{0}'")]
    MissingColumn(&'static str),

    #[error("row {row}: '{value}' is not a valid integer for column '{column}'")]
    InvalidInteger {
        row: u64,
        column: &'static str,
        value: String,
    },

    #[error("row {row}: relevance score {value} is outside 0-100")]
    ScoreOutOfRange { row: u64, value: i64 },

    #[error("row {row}: unknown verdict '{value}'")]
    InvalidVerdict { row: u64, value: String },

    #[error("row {row}: '{value}' is not a YYYY-MM-DD date")]
    InvalidDate { row: u64, value: String },

    #[error("malformed CSV: {0}")]
    Malformed(#[from] csv::Error),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
enum Column {
    Name,
    Email,
    Phone,
    Location,
    Experience,
    JobRole,
    RelevanceScore,
    Verdict,
    Skills,
    AppliedDate,
    MissingSkills,
}

impl Column {
    const ALL: [Column; 11] = [
        Column::Name,
        Column::Email,
        Column::Phone,
        Column::Location,
        Column::Experience,
        Column::JobRole,
        Column::RelevanceScore,
        Column::Verdict,
        Column::Skills,
        Column::AppliedDate,
        Column::MissingSkills,
    ];

    fn header(self) -> &'static str {
        match self {
            Column::Name => "Name",
            Column::Email => "Email",
            Column::Phone => "Phone",
            Column::Location => "Location",
            Column::Experience => "Experience",
            Column::JobRole => "Job Role",
            Column::RelevanceScore => "Relevance Score",
            Column::Verdict => "Verdict",
            Column::Skills => "Skills",
            Column::AppliedDate => "Applied Date",
            Column::MissingSkills => "Missing Skills",
        }
    }
}

struct ColumnMap {
    positions: HashMap<Column, usize>,
    last: usize,
}

impl ColumnMap {
    fn from_headers(headers: &csv::StringRecord) -> Result<Self, CsvError> {
        let positions: HashMap<Column, usize> = Column::ALL
            .iter()
            .filter_map(|&col| {
                headers
                    .iter()
                    .position(|h| h == col.header())
                    .map(|idx| (col, idx))
            })
            .collect();

        if !positions.contains_key(&Column::Name) {
            return Err(CsvError::MissingColumn(Column::Name.header()));
        }

        Ok(Self {
            positions,
            last: headers.len().saturating_sub(1),
        })
    }

    fn value(&self, cells: &[&str], col: Column) -> String {
        let Some(&idx) = self.positions.get(&col) else {
            return String::new();
        };
        if idx == self.last && cells.len() > idx + 1 {
            return cells[idx..].join(",");
        }
        cells.get(idx).copied().unwrap_or_default().to_string()
    }
}

fn split_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect()
}

fn parse_score(row: u64, value: &str) -> Result<u8, CsvError> {
    if value.is_empty() {
        return Ok(0);
    }
    let parsed: i64 = value.parse().map_err(|_| CsvError::InvalidInteger {
        row,
        column: Column::RelevanceScore.header(),
        value: value.to_string(),
    })?;
    u8::try_from(parsed)
        .ok()
        .filter(|score| *score <= 100)
        .ok_or(CsvError::ScoreOutOfRange { row, value: parsed })
}

fn parse_verdict(row: u64, value: &str, score: u8) -> Result<Verdict, CsvError> {
    if value.is_empty() {
        return Ok(Verdict::from_score(score));
    }
    value.parse().map_err(|_| CsvError::InvalidVerdict {
        row,
        value: value.to_string(),
    })
}

fn parse_date(row: u64, value: &str) -> Result<Option<NaiveDate>, CsvError> {
    if value.is_empty() {
        return Ok(None);
    }
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .map(Some)
        .map_err(|_| CsvError::InvalidDate {
            row,
            value: value.to_string(),
        })
}

fn decode_row(
    columns: &ColumnMap,
    cells: &[&str],
    row: u64,
    resume_base: &str,
) -> Result<CandidateRecord, CsvError> {
    let field = |col| columns.value(cells, col);

    let name = field(Column::Name);
    let relevance_score = parse_score(row, &field(Column::RelevanceScore))?;

    Ok(CandidateRecord {
        id: row,
        resume_url: resume_url_for(resume_base, &name),
        name,
        email: field(Column::Email),
        phone: field(Column::Phone),
        location: field(Column::Location),
        experience: field(Column::Experience),
        job_role: field(Column::JobRole),
        relevance_score,
        verdict: parse_verdict(row, &field(Column::Verdict), relevance_score)?,
        skills: split_list(&field(Column::Skills)),
        missing_skills: split_list(&field(Column::MissingSkills)),
        applied_date: parse_date(row, &field(Column::AppliedDate))?,
        is_duplicate: false,
        is_shortlisted: None,
    })
}

/// Decodes every non-blank data row on its own. The outer error covers the
/// file as a whole (empty, no `Name` column, broken quoting); the inner one a
/// single row.
fn decode_rows(
    raw_text: &str,
    resume_base: &str,
) -> Result<Vec<Result<CandidateRecord, CsvError>>, CsvError> {
    let raw_text = raw_text.trim_start_matches('\u{feff}');
    if raw_text.trim().is_empty() {
        return Err(CsvError::Empty);
    }

    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(raw_text.as_bytes());

    let columns = ColumnMap::from_headers(reader.headers()?)?;

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record?;
        if record.iter().all(str::is_empty) {
            continue;
        }
        let row = rows.len() as u64 + 1;
        let cells: Vec<&str> = record.iter().collect();
        rows.push(decode_row(&columns, &cells, row, resume_base));
    }
    Ok(rows)
}

/// Decodes candidate rows. Ids are the 1-based position among non-blank data
/// rows, so re-ingesting an edited file renumbers every record. A row with an
/// undecodable cell is logged and skipped; its id is not reused.
pub fn parse_candidates_csv(
    raw_text: &str,
    resume_base: &str,
) -> Result<Vec<CandidateRecord>, CsvError> {
    let candidates = decode_rows(raw_text, resume_base)?
        .into_iter()
        .filter_map(|row| match row {
            Ok(candidate) => Some(candidate),
            Err(e) => {
                warn!(error = %e, "skipping candidate row");
                None
            }
        })
        .collect();
    Ok(candidates)
}

#[cfg(test)]
mod tests {
    use super::*;

    const FULL_CSV: &str = "\
Name,Email,Phone,Location,Experience,Job Role,Relevance Score,Verdict,Skills,Applied Date,Missing Skills
Priya Sharma,priya@mail.com,+91 9000000001,Bangalore,5+ years,Backend Developer,88,High,\"Rust, Go, SQL\",2024-03-11,\"Kafka\"
Rahul Verma,rahul@mail.com,+91 9000000002,Pune,2 years,Data Analyst,61,Low,\"Python,  Excel\",2024-03-12,\"SQL, Tableau\"
";

    #[test]
    fn test_header_subset_with_unquoted_trailing_list() {
        let csv = "Name,Email,Relevance Score,Skills\nAnn,ann@x.com,85,Go,  SQL \n";
        let records = parse_candidates_csv(csv, "/resumes").unwrap();

        assert_eq!(records.len(), 1);
        let ann = &records[0];
        assert_eq!(ann.id, 1);
        assert_eq!(ann.relevance_score, 85);
        assert_eq!(ann.skills, vec!["Go", "SQL"]);
        assert_eq!(ann.email, "ann@x.com");
        assert_eq!(ann.verdict, Verdict::High);
        assert_eq!(ann.phone, "");
        assert!(ann.missing_skills.is_empty());
        assert_eq!(ann.resume_url.as_deref(), Some("/resumes/ann.pdf"));
        assert!(!ann.is_duplicate);
        assert_eq!(ann.is_shortlisted, None);
    }

    #[test]
    fn test_full_row_decodes_every_field() {
        let records = parse_candidates_csv(FULL_CSV, "/resumes").unwrap();
        assert_eq!(records.len(), 2);

        let priya = &records[0];
        assert_eq!(priya.name, "Priya Sharma");
        assert_eq!(priya.job_role, "Backend Developer");
        assert_eq!(priya.skills, vec!["Rust", "Go", "SQL"]);
        assert_eq!(priya.missing_skills, vec!["Kafka"]);
        assert_eq!(priya.applied_date, NaiveDate::from_ymd_opt(2024, 3, 11));
        assert_eq!(priya.resume_url.as_deref(), Some("/resumes/priya_sharma.pdf"));

        let rahul = &records[1];
        assert_eq!(rahul.id, 2);
        assert_eq!(rahul.verdict, Verdict::Low);
        assert_eq!(rahul.skills, vec!["Python", "Excel"]);
    }

    #[test]
    fn test_verdict_column_is_trusted_over_score() {
        let csv = "Name,Relevance Score,Verdict\nKiran,95,Low\n";
        let records = parse_candidates_csv(csv, "/resumes").unwrap();
        assert_eq!(records[0].verdict, Verdict::Low);
    }

    #[test]
    fn test_ingestion_is_deterministic() {
        let first = parse_candidates_csv(FULL_CSV, "/resumes").unwrap();
        let second = parse_candidates_csv(FULL_CSV, "/resumes").unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_blank_rows_do_not_consume_ids() {
        let csv = "Name,Relevance Score\r\nA,10\r\n\r\n   \r\nB,20\r\n";
        let records = parse_candidates_csv(csv, "/resumes").unwrap();
        let ids: Vec<_> = records.iter().map(|r| (r.id, r.name.as_str())).collect();
        assert_eq!(ids, vec![(1, "A"), (2, "B")]);
    }

    #[test]
    fn test_missing_name_column_is_rejected() {
        let csv = "Email,Relevance Score\nx@y.com,50\n";
        assert!(matches!(
            parse_candidates_csv(csv, "/resumes"),
            Err(CsvError::MissingColumn("Name"))
        ));
    }

    #[test]
    fn test_empty_source() {
        assert!(matches!(parse_candidates_csv("  \n", "/r"), Err(CsvError::Empty)));
    }

    fn row_errors(csv: &str) -> Vec<CsvError> {
        decode_rows(csv, "/r")
            .unwrap()
            .into_iter()
            .filter_map(Result::err)
            .collect()
    }

    #[test]
    fn test_score_rules() {
        let empty = parse_candidates_csv("Name,Relevance Score\nA,\n", "/r").unwrap();
        assert_eq!(empty[0].relevance_score, 0);
        assert_eq!(empty[0].verdict, Verdict::Low);

        let errors = row_errors("Name,Relevance Score\nA,eighty\n");
        assert!(matches!(
            errors.as_slice(),
            [CsvError::InvalidInteger { row: 1, column: "Relevance Score", .. }]
        ));

        let errors = row_errors("Name,Relevance Score\nA,50\nB,140\n");
        assert!(matches!(
            errors.as_slice(),
            [CsvError::ScoreOutOfRange { row: 2, value: 140 }]
        ));
    }

    #[test]
    fn test_bad_verdict_and_date() {
        let errors = row_errors("Name,Verdict\nA,Maybe\n");
        assert!(matches!(errors.as_slice(), [CsvError::InvalidVerdict { row: 1, .. }]));

        let errors = row_errors("Name,Applied Date\nA,15/03/2024\n");
        assert!(matches!(errors.as_slice(), [CsvError::InvalidDate { row: 1, .. }]));
    }

    #[test]
    fn test_bad_row_is_skipped_not_fatal() {
        let csv = "\
Name,Relevance Score,Verdict,Applied Date
Asha,82,High,2024-01-14
Bilal,70,Medium,15/01/2024
Chen,55,Low,2024-01-16
Dev,101,,
";
        let records = parse_candidates_csv(csv, "/r").unwrap();
        let kept: Vec<_> = records.iter().map(|r| (r.id, r.name.as_str())).collect();
        assert_eq!(kept, vec![(1, "Asha"), (3, "Chen")]);
    }

    #[test]
    fn test_empty_name_has_no_resume_url() {
        let records = parse_candidates_csv("Name,Email\n,nobody@x.com\n", "/resumes").unwrap();
        assert_eq!(records[0].resume_url, None);
    }

    #[test]
    fn test_unknown_headers_are_ignored() {
        let csv = "Name,Favourite Colour,Relevance Score\nA,blue,70\n";
        let records = parse_candidates_csv(csv, "/r").unwrap();
        assert_eq!(records[0].relevance_score, 70);
        assert_eq!(records[0].verdict, Verdict::Medium);
    }
}
