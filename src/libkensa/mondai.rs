use log::debug;
use rusqlite::types::ValueRef;
use rusqlite::{Connection, Row};

use crate::libkensa::db;
use crate::libkensa::{KensaError, Result};

// Presentation cap for question bodies in sample listings.
pub(crate) const PREVIEW_LEN: usize = 100;

#[derive(Debug, Clone, PartialEq)]
pub struct Question {
    pub id: i32,
    pub question_type: String,
    pub text: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct QuestionOption {
    pub text: String,
    pub is_correct: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MatchPair {
    pub left: String,
    pub right: String,
}

impl Question {
    fn from_row(row: &Row) -> rusqlite::Result<Question> {
        let text: String = row.get(2)?;
        Ok(Question {
            id: row.get(0)?,
            question_type: row.get(1)?,
            text: preview(&text),
        })
    }

    pub(crate) fn sample(conn: &Connection, limit: u32) -> Result<Vec<Question>> {
        let mut statement = conn
            .prepare("SELECT id, question_type, question_text FROM questions LIMIT :limit")?;
        let rows = statement.query_map(&[(":limit", &limit)], |row| Self::from_row(row))?;

        Ok(rows.collect::<rusqlite::Result<Vec<Question>>>()?)
    }

    pub(crate) fn search(conn: &Connection, pattern: &str) -> Result<Vec<(i32, String)>> {
        let mut statement = conn
            .prepare("SELECT id, question_text FROM questions WHERE question_text LIKE :pattern")?;
        let rows = statement.query_map(&[(":pattern", &pattern)], |row| {
            Ok((row.get(0)?, row.get(1)?))
        })?;

        let found = rows.collect::<rusqlite::Result<Vec<(i32, String)>>>()?;
        debug!("[Bank] {} question(s) match {:?}", found.len(), pattern);
        Ok(found)
    }
}

impl QuestionOption {
    pub(crate) fn get_for_question(
        conn: &Connection,
        question_id: i32,
    ) -> Result<Vec<QuestionOption>> {
        let mut statement = conn.prepare(
            "SELECT option_text, is_correct FROM options WHERE question_id = :id ORDER BY id",
        )?;
        let rows = statement.query_map(&[(":id", &question_id)], |row| {
            Ok(QuestionOption {
                text: row.get(0)?,
                is_correct: row.get(1)?,
            })
        })?;

        Ok(rows.collect::<rusqlite::Result<Vec<QuestionOption>>>()?)
    }
}

impl MatchPair {
    pub(crate) fn get_for_question(conn: &Connection, question_id: i32) -> Result<Vec<MatchPair>> {
        let mut statement = conn.prepare(
            "SELECT left_text, right_text FROM match_pairs WHERE question_id = :id ORDER BY rowid",
        )?;
        let rows = statement.query_map(&[(":id", &question_id)], |row| {
            Ok(MatchPair {
                left: row.get(0)?,
                right: row.get(1)?,
            })
        })?;

        Ok(rows.collect::<rusqlite::Result<Vec<MatchPair>>>()?)
    }
}

pub(crate) fn distinct_values(conn: &Connection, column: &str) -> Result<Vec<Option<String>>> {
    if !db::has_column(conn, "questions", column)? {
        return Err(KensaError::ColumnNotFound {
            table: "questions".to_string(),
            column: column.to_string(),
        });
    }

    // `column` is vetted against the live schema above; it never comes from
    // anywhere but this crate's fixed report fields.
    let mut statement = conn.prepare(&format!("SELECT DISTINCT \"{}\" FROM questions", column))?;
    let rows = statement.query_map([], |row| row.get(0))?;

    Ok(rows.collect::<rusqlite::Result<Vec<Option<String>>>>()?)
}

pub(crate) fn count_by_type(conn: &Connection) -> Result<Vec<(String, i64)>> {
    let mut statement = conn.prepare(
        "SELECT question_type, COUNT(*) FROM questions \
         GROUP BY question_type ORDER BY question_type",
    )?;
    let rows = statement.query_map([], |row| Ok((row.get(0)?, row.get(1)?)))?;

    Ok(rows.collect::<rusqlite::Result<Vec<(String, i64)>>>()?)
}

pub(crate) fn raw_question(conn: &Connection, id: i32) -> Result<Option<Vec<(String, String)>>> {
    let mut statement = conn.prepare("SELECT * FROM questions WHERE id = :id")?;
    let columns: Vec<String> = statement
        .column_names()
        .iter()
        .map(|name| name.to_string())
        .collect();

    let mut rows = statement.query(&[(":id", &id)])?;
    let row = match rows.next()? {
        Some(row) => row,
        None => return Ok(None),
    };

    let mut fields = Vec::with_capacity(columns.len());
    for (idx, name) in columns.iter().enumerate() {
        fields.push((name.clone(), render_value(row.get_ref(idx)?)));
    }
    Ok(Some(fields))
}

fn render_value(value: ValueRef) -> String {
    match value {
        ValueRef::Null => "NULL".to_string(),
        ValueRef::Integer(int) => int.to_string(),
        ValueRef::Real(real) => real.to_string(),
        ValueRef::Text(text) => String::from_utf8_lossy(text).into_owned(),
        ValueRef::Blob(blob) => format!("<{} byte blob>", blob.len()),
    }
}

// Truncates on a char boundary so multi-byte text never tears mid-codepoint.
pub(crate) fn preview(text: &str) -> String {
    match text.char_indices().nth(PREVIEW_LEN) {
        Some((cut, _)) => format!("{}...", &text[..cut]),
        None => text.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::libkensa::fixtures;

    #[test]
    fn count_by_type_covers_every_question() {
        let conn = fixtures::leadership_bank();
        let counts = count_by_type(&conn).unwrap();
        assert_eq!(
            counts,
            [("MCQ".to_string(), 2), ("matching".to_string(), 1)]
        );

        let total: i64 = conn
            .query_row("SELECT COUNT(*) FROM questions", [], |row| row.get(0))
            .unwrap();
        assert_eq!(counts.iter().map(|(_, count)| count).sum::<i64>(), total);
    }

    #[test]
    fn distinct_values_surface_nulls_as_none() {
        let conn = fixtures::leadership_bank();
        let types = distinct_values(&conn, "question_type").unwrap();
        assert_eq!(types.len(), 2);
        assert!(types.contains(&Some("MCQ".to_string())));
        assert!(types.contains(&Some("matching".to_string())));

        let subtopics = distinct_values(&conn, "subtopic").unwrap();
        assert_eq!(subtopics.len(), 3);
        assert!(subtopics.contains(&None));
        assert!(subtopics.contains(&Some("Foundations".to_string())));
        assert!(subtopics.contains(&Some("Budgeting".to_string())));
    }

    #[test]
    fn distinct_values_reject_missing_column() {
        let conn = fixtures::legacy_bank();
        let err = distinct_values(&conn, "subtopic").unwrap_err();
        assert!(matches!(
            err,
            KensaError::ColumnNotFound { ref table, ref column }
                if table == "questions" && column == "subtopic"
        ));
    }

    #[test]
    fn distinct_values_restart_identically() {
        let conn = fixtures::leadership_bank();
        let first = distinct_values(&conn, "topic").unwrap();
        let second = distinct_values(&conn, "topic").unwrap();
        assert_eq!(first, second);
        assert_eq!(first.len(), 2);
    }

    #[test]
    fn sample_respects_limit_and_row_order() {
        let conn = fixtures::leadership_bank();
        let two = Question::sample(&conn, 2).unwrap();
        assert_eq!(two.len(), 2);
        assert_eq!(two[0].id, 1);
        assert_eq!(two[1].id, 2);

        let all = Question::sample(&conn, 10).unwrap();
        assert_eq!(all.len(), 3);
    }

    #[test]
    fn sample_truncates_long_bodies() {
        let conn = fixtures::leadership_bank();
        let all = Question::sample(&conn, 10).unwrap();
        let budget = &all[2];
        assert!(budget.text.ends_with("..."));
        assert_eq!(budget.text.chars().count(), PREVIEW_LEN + 3);
    }

    #[test]
    fn preview_cuts_on_char_boundaries() {
        let kanji = "問".repeat(PREVIEW_LEN + 20);
        let cut = preview(&kanji);
        assert_eq!(cut.chars().count(), PREVIEW_LEN + 3);
        assert!(cut.starts_with(&"問".repeat(PREVIEW_LEN)));
        assert!(cut.ends_with("..."));

        let short = "What is leadership?";
        assert_eq!(preview(short), short);

        let exact = "あ".repeat(PREVIEW_LEN);
        assert_eq!(preview(&exact), exact);
    }

    #[test]
    fn options_keep_insertion_order() {
        let conn = fixtures::legacy_bank();
        let options = QuestionOption::get_for_question(&conn, 1).unwrap();
        assert_eq!(
            options,
            [
                QuestionOption {
                    text: "Trait-based".to_string(),
                    is_correct: false,
                },
                QuestionOption {
                    text: "Situational".to_string(),
                    is_correct: true,
                },
            ]
        );
    }

    #[test]
    fn childless_questions_read_as_empty_not_error() {
        let conn = fixtures::leadership_bank();
        // a matching question has no options, an MCQ has no match pairs
        assert!(QuestionOption::get_for_question(&conn, 2).unwrap().is_empty());
        assert!(MatchPair::get_for_question(&conn, 1).unwrap().is_empty());
    }

    #[test]
    fn match_pairs_keep_insertion_order() {
        let conn = fixtures::leadership_bank();
        let pairs = MatchPair::get_for_question(&conn, 2).unwrap();
        assert_eq!(
            pairs,
            [
                MatchPair {
                    left: "Autocratic".to_string(),
                    right: "Leader decides alone".to_string(),
                },
                MatchPair {
                    left: "Democratic".to_string(),
                    right: "Group decides together".to_string(),
                },
            ]
        );
    }

    #[test]
    fn search_is_a_contains_match() {
        let conn = fixtures::leadership_bank();
        let found = Question::search(&conn, "%leadership%").unwrap();
        assert_eq!(found, [(1, "What is leadership?".to_string())]);

        let none = Question::search(&conn, "%flux capacitor%").unwrap();
        assert!(none.is_empty());
    }

    #[test]
    fn sample_and_options_round_trip_the_mcq_scenario() {
        let conn = fixtures::legacy_bank();
        let sampled = Question::sample(&conn, 1).unwrap();
        assert_eq!(
            sampled,
            [Question {
                id: 1,
                question_type: "MCQ".to_string(),
                text: "What is leadership?".to_string(),
            }]
        );

        let options = QuestionOption::get_for_question(&conn, 1).unwrap();
        assert_eq!(options.len(), 2);
        assert!(!options[0].is_correct);
        assert!(options[1].is_correct);
    }

    #[test]
    fn raw_question_reflects_every_column() {
        let conn = fixtures::leadership_bank();
        let fields = raw_question(&conn, 2).unwrap().unwrap();
        let names: Vec<&str> = fields.iter().map(|(name, _)| name.as_str()).collect();
        assert_eq!(
            names,
            ["id", "question_type", "topic", "subtopic", "question_text"]
        );
        assert_eq!(fields[0].1, "2");
        assert_eq!(fields[1].1, "matching");
        assert_eq!(fields[3].1, "NULL");

        assert!(raw_question(&conn, 999).unwrap().is_none());
    }
}
