use std::path::PathBuf;
use thiserror::Error;

pub mod db;
pub mod mondai;

#[derive(Debug, Error)]
pub enum KensaError {
    #[error("database not found at: {}", .0.display())]
    BankNotFound(PathBuf),
    #[error("no `{column}` column in `{table}`")]
    ColumnNotFound { table: String, column: String },
    #[error(transparent)]
    Sqlite(#[from] rusqlite::Error),
}

pub type Result<T> = std::result::Result<T, KensaError>;
