use log::{debug, error, info, warn};
use rusqlite::{params, Connection, OpenFlags};
use std::path::Path;
use std::time::Instant;

use crate::libkensa::{KensaError, Result};

#[derive(Debug, Clone)]
pub struct TableDef {
    pub name: String,
    pub sql: Option<String>,
}

pub(crate) fn open_bank(src: &Path) -> Result<Connection> {
    if !src.exists() {
        warn!("[DB] No database at {:?}", src);
        return Err(KensaError::BankNotFound(src.to_path_buf()));
    }
    info!("[DB] Opening existing Database");
    let now = Instant::now();
    let flags = OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_NO_MUTEX;
    let db = Connection::open_with_flags(src, flags)?;
    debug!("[DB] Opening took {} ms.", now.elapsed().as_millis());
    Ok(db)
}

pub(crate) fn close_db(connection: Connection) -> Result<()> {
    info!("[DB] Closing Database");
    let mut conn = connection;
    for retry in 1..=2 {
        match conn.close() {
            Ok(()) => return Ok(()),
            Err((failed, err)) => {
                error!("[DB] Cannot close connection: {}. Retrying {}/2...", err, retry);
                conn = failed;
            }
        }
    }
    match conn.close() {
        Ok(()) => Ok(()),
        Err((_, err)) => {
            error!("[DB] Cannot close connection: {}. Giving up.", err);
            Err(KensaError::Sqlite(err))
        }
    }
}

pub(crate) fn table_defs(conn: &Connection) -> Result<Vec<TableDef>> {
    let mut statement = conn.prepare("SELECT name, sql FROM sqlite_master WHERE type = 'table'")?;
    let rows = statement.query_map([], |row| {
        Ok(TableDef {
            name: row.get(0)?,
            sql: row.get(1)?,
        })
    })?;
    let defs = rows.collect::<rusqlite::Result<Vec<TableDef>>>()?;
    debug!("[DB] Bank declares {} table(s).", defs.len());
    Ok(defs)
}

pub(crate) fn has_column(conn: &Connection, table: &str, column: &str) -> Result<bool> {
    let mut statement =
        conn.prepare("SELECT COUNT(*) FROM pragma_table_info(?1) WHERE name = ?2")?;
    let hits: i64 = statement.query_row(params![table, column], |row| row.get(0))?;
    debug!("[DB] Column {}.{} present: {}", table, column, hits > 0);
    Ok(hits > 0)
}
