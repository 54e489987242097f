use colored::Colorize;
use log::debug;
use rusqlite::Connection;

use crate::libkensa::db;
use crate::libkensa::mondai::{self, MatchPair, Question, QuestionOption};
use crate::libkensa::Result;

pub fn full_report(conn: &Connection, samples: u32) -> Result<()> {
    debug!("[Report] Building full report ({} samples)", samples);

    println!("{}", "=== DATABASE SCHEMA ===".cyan().bold());
    for table in db::table_defs(conn)? {
        if let Some(sql) = table.sql {
            println!("{}\n", sql);
        }
    }

    println!("{}", "=== QUESTION TYPES ===".cyan().bold());
    for value in mondai::distinct_values(conn, "question_type")? {
        println!("- {}", render_nullable(value));
    }

    println!("\n{}", "=== QUESTION COUNT BY TYPE ===".cyan().bold());
    for (question_type, count) in mondai::count_by_type(conn)? {
        println!("{}: {} questions", question_type, count);
    }

    println!("\n{}", "=== TOPICS ===".cyan().bold());
    for value in mondai::distinct_values(conn, "topic")? {
        println!("- {}", render_nullable(value));
    }

    println!("\n{}", "=== SUBTOPICS ===".cyan().bold());
    if db::has_column(conn, "questions", "subtopic")? {
        for value in mondai::distinct_values(conn, "subtopic")? {
            println!("- {}", render_nullable(value));
        }
    } else {
        println!("{}", "No subtopic column found".yellow());
    }

    println!("\n{}", "=== SAMPLE QUESTIONS ===".cyan().bold());
    for question in Question::sample(conn, samples)? {
        println!(
            "{} {}",
            format!("ID {} ({}):", question.id, question.question_type).bold(),
            question.text
        );
        print_options(conn, question.id)?;
        print_match_pairs(conn, question.id)?;
        println!();
    }

    Ok(())
}

pub fn search_report(conn: &Connection, pattern: &str) -> Result<()> {
    let like = format!("%{}%", pattern);
    let matches = Question::search(conn, &like)?;
    if matches.is_empty() {
        println!("{}", format!("No questions matching {:?}", pattern).yellow());
        return Ok(());
    }

    for (id, text) in matches {
        println!("{} {}", format!("ID {}:", id).bold(), text);
        for option in QuestionOption::get_for_question(conn, id)? {
            println!("  {} {}", correct_marker(option.is_correct), option.text);
        }
        println!();
    }

    Ok(())
}

pub fn question_report(conn: &Connection, id: i32) -> Result<()> {
    println!("{}", format!("=== QUESTION {} DATA ===", id).cyan().bold());
    let fields = match mondai::raw_question(conn, id)? {
        Some(fields) => fields,
        None => {
            println!("{}", format!("No question with id {}", id).yellow());
            return Ok(());
        }
    };
    for (column, value) in fields {
        println!("{}: {}", column.bold(), value);
    }

    println!("\n{}", format!("=== OPTIONS FOR QUESTION {} ===", id).cyan().bold());
    let options = QuestionOption::get_for_question(conn, id)?;
    if options.is_empty() {
        println!("(none)");
    }
    for option in options {
        println!("{} {}", correct_marker(option.is_correct), option.text);
    }

    println!("\n{}", format!("=== MATCH PAIRS FOR QUESTION {} ===", id).cyan().bold());
    let pairs = MatchPair::get_for_question(conn, id)?;
    if pairs.is_empty() {
        println!("(none)");
    }
    for pair in pairs {
        println!("{} → {}", pair.left, pair.right);
    }

    Ok(())
}

fn print_options(conn: &Connection, question_id: i32) -> Result<()> {
    let options = QuestionOption::get_for_question(conn, question_id)?;
    if options.is_empty() {
        return Ok(());
    }
    println!("  Options: {} found", options.len());
    for option in &options {
        println!("    {} {}", correct_marker(option.is_correct), option.text);
    }
    Ok(())
}

fn print_match_pairs(conn: &Connection, question_id: i32) -> Result<()> {
    let pairs = MatchPair::get_for_question(conn, question_id)?;
    if pairs.is_empty() {
        return Ok(());
    }
    println!("  Match pairs: {} found", pairs.len());
    for pair in &pairs {
        println!("    {} → {}", pair.left, pair.right);
    }
    Ok(())
}

fn correct_marker(is_correct: bool) -> colored::ColoredString {
    if is_correct {
        "✓".green()
    } else {
        " ".normal()
    }
}

fn render_nullable(value: Option<String>) -> String {
    value.unwrap_or_else(|| "(null)".to_string())
}
