// src/sink/relational.rs
//
// Relational output: one parameterized insert per record into a three-column
// table `(word, type, definition)`. No batching, no transaction, no dedup.

use std::{fs::File, io::{BufWriter, Write}, path::Path};

use crate::core::sanitize::{is_identifier, sql_literal};
use crate::error::SinkError;
use crate::extract::Record;
use crate::file::create_file;

use super::RecordSink;

/// Something that can take one row at a time.
pub trait Table {
    fn insert(&mut self, word: &str, kind: &str, definition: &str) -> Result<(), SinkError>;

    fn flush(&mut self) -> Result<(), SinkError> {
        Ok(())
    }
}

pub struct RelationalSink<T: Table> {
    table: T,
    name: &'static str,
    inserted: usize,
}

impl<T: Table> RelationalSink<T> {
    pub fn new(table: T) -> Self {
        Self { table, name: "relational", inserted: 0 }
    }

    /// Label used in logs and failure reports.
    pub fn with_name(mut self, name: &'static str) -> Self {
        self.name = name;
        self
    }

    pub fn inserted(&self) -> usize {
        self.inserted
    }

    pub fn into_table(self) -> T {
        self.table
    }
}

impl<T: Table> RecordSink for RelationalSink<T> {
    fn name(&self) -> &str { self.name }

    fn accept(&mut self, record: &Record) -> Result<(), SinkError> {
        self.table.insert(&record.word, &record.kind, &record.definition)?;
        self.inserted += 1;
        Ok(())
    }

    fn finish(&mut self) -> Result<(), SinkError> {
        logd!("relational: {} rows inserted", self.inserted);
        self.table.flush()
    }
}

fn checked_table(name: &str) -> Result<&str, SinkError> {
    if is_identifier(name) { Ok(name) } else { Err(SinkError::InvalidTable(name.to_string())) }
}

/* ---------------- In-memory ---------------- */

#[derive(Debug, Default)]
pub struct MemoryTable {
    pub rows: Vec<[String; 3]>,
}

impl Table for MemoryTable {
    fn insert(&mut self, word: &str, kind: &str, definition: &str) -> Result<(), SinkError> {
        self.rows.push([s!(word), s!(kind), s!(definition)]);
        Ok(())
    }
}

/* ---------------- SQL script ---------------- */

/// Writes a replayable script: `CREATE TABLE IF NOT EXISTS`, then one
/// `INSERT` per row with values as escaped string literals.
pub struct SqlScript<W: Write> {
    out: W,
    table: String,
}

impl SqlScript<BufWriter<File>> {
    pub fn create(path: &Path, table: &str) -> Result<Self, SinkError> {
        let table = checked_table(table)?;
        Self::new(BufWriter::new(create_file(path)?), table)
    }
}

impl<W: Write> SqlScript<W> {
    pub fn new(mut out: W, table: &str) -> Result<Self, SinkError> {
        let table = checked_table(table)?;
        writeln!(
            out,
            "CREATE TABLE IF NOT EXISTS {table} (word TEXT NOT NULL, type TEXT NOT NULL, definition TEXT NOT NULL);"
        )?;
        Ok(Self { out, table: s!(table) })
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> Table for SqlScript<W> {
    fn insert(&mut self, word: &str, kind: &str, definition: &str) -> Result<(), SinkError> {
        writeln!(
            self.out,
            "INSERT INTO {} (word, type, definition) VALUES ({}, {}, {});",
            self.table,
            sql_literal(word),
            sql_literal(kind),
            sql_literal(definition),
        )?;
        Ok(())
    }

    fn flush(&mut self) -> Result<(), SinkError> {
        self.out.flush()?;
        Ok(())
    }
}

/* ---------------- Postgres ---------------- */

#[cfg(feature = "postgres")]
pub use pg::PgTable;

#[cfg(feature = "postgres")]
mod pg {
    use sqlx::postgres::{PgPool, PgPoolOptions};
    use tokio::runtime::{Builder, Runtime};

    use super::{checked_table, Table};
    use crate::error::SinkError;

    /// Live table. Owns a current-thread runtime so the sync sink API can
    /// block on each insert.
    pub struct PgTable {
        rt: Runtime,
        pool: PgPool,
        insert_sql: String,
    }

    impl PgTable {
        pub fn connect(database_url: &str, table: &str) -> Result<Self, SinkError> {
            let table = checked_table(table)?;
            let rt = Builder::new_current_thread().enable_all().build()?;
            let pool = rt.block_on(async {
                let pool = PgPoolOptions::new().max_connections(1).connect(database_url).await?;
                sqlx::query(&format!(
                    "CREATE TABLE IF NOT EXISTS {table} (word TEXT NOT NULL, type TEXT NOT NULL, definition TEXT NOT NULL)"
                ))
                .execute(&pool)
                .await?;
                Ok::<_, sqlx::Error>(pool)
            })?;
            logf!("Connected to Postgres, table {table}");
            Ok(Self {
                rt,
                pool,
                insert_sql: format!("INSERT INTO {table} (word, type, definition) VALUES ($1, $2, $3)"),
            })
        }
    }

    impl Table for PgTable {
        fn insert(&mut self, word: &str, kind: &str, definition: &str) -> Result<(), SinkError> {
            self.rt.block_on(
                sqlx::query(&self.insert_sql)
                    .bind(word)
                    .bind(kind)
                    .bind(definition)
                    .execute(&self.pool),
            )?;
            Ok(())
        }

        fn flush(&mut self) -> Result<(), SinkError> {
            self.rt.block_on(self.pool.close());
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn one_insert_per_record_duplicates_kept() {
        let mut sink = RelationalSink::new(MemoryTable::default());
        let rec = Record::new("12", "noun", "police");
        sink.accept(&rec).unwrap();
        sink.accept(&rec).unwrap();
        sink.accept(&Record::new("lit", "adj", "great")).unwrap();
        sink.finish().unwrap();

        assert_eq!(sink.inserted(), 3);
        let table = sink.into_table();
        assert_eq!(table.rows.len(), 3);
        assert_eq!(table.rows[0], table.rows[1]);
        assert_eq!(table.rows[2], [s!("lit"), s!("adj"), s!("great")]);
    }

    #[test]
    fn script_escapes_literals() {
        let mut sink = RelationalSink::new(SqlScript::new(Vec::new(), "DawgSpeak").unwrap());
        sink.accept(&Record::new("it's", "noun", "a 'thing'")).unwrap();
        sink.finish().unwrap();

        let out = String::from_utf8(sink.into_table().into_inner()).unwrap();
        let lines: Vec<&str> = out.lines().collect();
        assert!(lines[0].starts_with("CREATE TABLE IF NOT EXISTS DawgSpeak ("));
        assert_eq!(
            lines[1],
            "INSERT INTO DawgSpeak (word, type, definition) VALUES ('it''s', 'noun', 'a ''thing''');"
        );
    }

    #[test]
    fn bad_table_name_rejected() {
        let err = SqlScript::new(Vec::new(), "x; DROP TABLE y").err().unwrap();
        assert!(matches!(err, SinkError::InvalidTable(_)));
    }
}
