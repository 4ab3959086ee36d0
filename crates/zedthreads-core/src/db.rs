//! Read-only SQLite access to Zed's threads database.
//!
//! The archive lives at `<data dir>/Zed/threads/threads.db` with a single
//! `threads` table pairing searchable metadata with a zstd-compressed
//! thread blob. The store never writes: the connection is opened with
//! `SQLITE_OPEN_READ_ONLY` and exposes only fetch and search queries.

use crate::Result;
use rusqlite::{params, Connection, OpenFlags, OptionalExtension};
use std::path::Path;
use std::sync::Mutex;
use zedthreads_types::ThreadRecord;

const SELECT_COLUMNS: &str = "SELECT id, summary, updated_at, data_type, data FROM threads";

/// Read-only handle on the threads archive.
pub struct ThreadStore {
    conn: Mutex<Connection>,
}

impl ThreadStore {
    /// Open the database at the given path, read-only.
    pub fn open(path: &Path) -> Result<Self> {
        let conn = Connection::open_with_flags(
            path,
            OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_NO_MUTEX,
        )?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Fetch all thread records, most recently updated first.
    pub fn fetch_all(&self, limit: Option<usize>) -> Result<Vec<ThreadRecord>> {
        let conn = self.conn.lock().unwrap();
        let mut stmt = conn.prepare(&format!(
            "{SELECT_COLUMNS} ORDER BY updated_at DESC LIMIT ?1"
        ))?;
        // A negative LIMIT disables the cap in SQLite.
        let rows = stmt.query_map(params![limit_param(limit)], Self::row_to_record)?;
        collect_records(rows)
    }

    /// Fetch a single thread record by id.
    pub fn fetch_by_id(&self, id: &str) -> Result<Option<ThreadRecord>> {
        let conn = self.conn.lock().unwrap();
        let record = conn
            .query_row(
                &format!("{SELECT_COLUMNS} WHERE id = ?1"),
                params![id],
                Self::row_to_record,
            )
            .optional()?;
        Ok(record)
    }

    /// Fetch records whose summary contains `query`, case-insensitively,
    /// most recently updated first.
    pub fn search_summaries(&self, query: &str, limit: Option<usize>) -> Result<Vec<ThreadRecord>> {
        let conn = self.conn.lock().unwrap();
        let mut stmt = conn.prepare(&format!(
            "{SELECT_COLUMNS} WHERE summary LIKE ?1 ORDER BY updated_at DESC LIMIT ?2"
        ))?;
        let pattern = format!("%{query}%");
        let rows = stmt.query_map(params![pattern, limit_param(limit)], Self::row_to_record)?;
        collect_records(rows)
    }

    fn row_to_record(row: &rusqlite::Row) -> rusqlite::Result<ThreadRecord> {
        Ok(ThreadRecord {
            id: row.get("id")?,
            summary: row.get("summary")?,
            updated_at: row.get("updated_at")?,
            data_type: row.get("data_type")?,
            data: row.get("data")?,
        })
    }
}

fn limit_param(limit: Option<usize>) -> i64 {
    limit.map(|l| l as i64).unwrap_or(-1)
}

fn collect_records(
    rows: impl Iterator<Item = rusqlite::Result<ThreadRecord>>,
) -> Result<Vec<ThreadRecord>> {
    let mut records = Vec::new();
    for row in rows {
        records.push(row?);
    }
    Ok(records)
}
