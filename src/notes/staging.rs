use std::path::Path;

use anyhow::{Context, Result};
use rusqlite::{Connection, params};
use sha2::{Digest, Sha256};
use tracing::debug;

use super::load::{LoadedRecords, open_source, read_records};
use crate::model::RawRecord;

pub struct StagingStore {
    connection: Connection,
}

impl StagingStore {
    pub fn open(path: &Path) -> Result<Self> {
        let connection = Connection::open(path)
            .with_context(|| format!("failed to open staging db {}", path.display()))?;
        configure_connection(&connection)?;
        Self::with_connection(connection)
    }

    fn with_connection(connection: Connection) -> Result<Self> {
        ensure_schema(&connection)?;
        connection
            .execute("DELETE FROM staged_records", [])
            .context("failed to clear staged records")?;
        Ok(Self { connection })
    }

    pub fn stage_sources<P: AsRef<Path>>(
        &mut self,
        sources: &[P],
        field_names: &[&str],
    ) -> Result<usize> {
        let tx = self.connection.transaction()?;
        let mut rows_read = 0_usize;

        {
            let mut statement = tx.prepare(
                "INSERT OR IGNORE INTO staged_records (fingerprint, record_json) VALUES (?1, ?2)",
            )?;

            for source in sources {
                let path = source.as_ref();
                let file = open_source(path)?;

                read_records(file, path, field_names, |record| -> Result<()> {
                    let record_json = serde_json::to_string(&record)
                        .context("failed to serialize staged record")?;
                    statement
                        .execute(params![fingerprint(&record_json), record_json])
                        .with_context(|| {
                            format!("failed to stage record from {}", path.display())
                        })?;
                    rows_read += 1;
                    Ok(())
                })?;

                debug!(path = %path.display(), rows = rows_read, "staged export source");
            }
        }

        tx.commit().context("failed to commit staged records")?;
        Ok(rows_read)
    }

    pub fn records(&self) -> Result<Vec<RawRecord>> {
        let mut statement = self
            .connection
            .prepare("SELECT record_json FROM staged_records ORDER BY id")?;
        let rows = statement.query_map([], |row| row.get::<_, String>(0))?;

        let mut records = Vec::new();
        for row in rows {
            let raw = row.context("failed to read staged record")?;
            let record: RawRecord =
                serde_json::from_str(&raw).context("failed to decode staged record")?;
            records.push(record);
        }

        Ok(records)
    }

    pub fn load<P: AsRef<Path>>(
        &mut self,
        sources: &[P],
        field_names: &[&str],
    ) -> Result<LoadedRecords> {
        let rows_read = self.stage_sources(sources, field_names)?;
        Ok(LoadedRecords {
            records: self.records()?,
            rows_read,
        })
    }
}

fn configure_connection(connection: &Connection) -> Result<()> {
    connection
        .pragma_update(None, "journal_mode", "WAL")
        .context("failed to set journal_mode=WAL")?;
    connection
        .pragma_update(None, "synchronous", "NORMAL")
        .context("failed to set synchronous=NORMAL")?;
    Ok(())
}

fn ensure_schema(connection: &Connection) -> Result<()> {
    connection
        .execute_batch(
            "
            CREATE TABLE IF NOT EXISTS staged_records (
              id INTEGER PRIMARY KEY AUTOINCREMENT,
              fingerprint TEXT NOT NULL UNIQUE,
              record_json TEXT NOT NULL
            );
            ",
        )
        .context("failed to create staging schema")
}

fn fingerprint(record_json: &str) -> String {
    format!("{:x}", Sha256::digest(record_json.as_bytes()))
}
