use clap::Parser;
use colored::Colorize;
use env_logger::Env;
use log::debug;
use rusqlite::Connection;
use std::path::PathBuf;

mod libkensa;
mod report;

use crate::libkensa::db;
use crate::libkensa::KensaError;

#[derive(Parser, Debug)]
#[command(name = "問題検査 (Mondaikensa)")]
#[command(version, about, long_about = None)]
struct Args {
    #[arg(short, long, value_name = "FILE", default_value = "questions.db")]
    db: PathBuf,
    /// Search question text for this substring instead of printing the report.
    pattern: Option<String>,
    /// Dump one question raw, with its options and match pairs.
    #[arg(short, long, value_name = "ID")]
    question: Option<i32>,
    #[arg(short, long, default_value = "3")]
    samples: u32,
    #[arg(short, long, default_value = "error")]
    log_level: String,
}

fn main() -> Result<(), KensaError> {
    let args = Args::parse();
    env_logger::Builder::from_env(Env::default().default_filter_or(args.log_level.as_str())).init();

    let conn = match db::open_bank(&args.db) {
        Ok(conn) => conn,
        Err(KensaError::BankNotFound(path)) => {
            println!(
                "{}",
                format!("Database not found at: {}", path.display()).yellow()
            );
            return Ok(());
        }
        Err(err) => return Err(err),
    };
    debug!("[DB] Database Connection Successful!");

    let outcome = run(&conn, &args);
    finish(conn, outcome)
}

fn run(conn: &Connection, args: &Args) -> Result<(), KensaError> {
    if let Some(id) = args.question {
        return report::question_report(conn, id);
    }
    if let Some(pattern) = &args.pattern {
        return report::search_report(conn, pattern);
    }
    report::full_report(conn, args.samples)
}

fn finish(conn: Connection, outcome: Result<(), KensaError>) -> Result<(), KensaError> {
    db::close_db(conn)?;
    outcome
}
