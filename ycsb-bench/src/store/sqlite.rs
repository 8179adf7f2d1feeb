//! SQLite store (via rusqlite).
//!
//! Records live in a single table with the key as `INTEGER PRIMARY KEY` and one `BLOB` column per
//! field:
//!
//! ```sql
//! CREATE TABLE Ycsb (ycsb_key INTEGER PRIMARY KEY NOT NULL, v1 BLOB NOT NULL, ..., vN BLOB NOT NULL)
//! ```
//!
//! Values are always bound as parameters. Point queries use one cached prepared statement per
//! field, and every batch is inserted within its own transaction.

use std::fmt::Write;
use std::path::Path;

use rusqlite::types::{ToSqlOutput, Value, ValueRef};
use rusqlite::{Connection, Row, params_from_iter};

use super::{ScanRow, Store, sql_key};
use crate::dataset::{Batch, DatasetShape};
use crate::error::{StoreError, StoreResult};

/// A [`Store`] backed by an SQLite database.
#[derive(Debug)]
pub struct SqliteStore {
    conn: Connection,
    statements: Option<Statements>,
}

/// SQL text for a created table.
#[derive(Debug)]
struct Statements {
    shape: DatasetShape,
    insert: String,
    /// Point query per field.
    fields: Vec<String>,
    scan: String,
}

impl Statements {
    fn new(shape: DatasetShape) -> Self {
        let columns: Vec<_> = (1..=shape.field_count).map(|i| format!("v{i}")).collect();
        let placeholders = vec!["?"; shape.field_count + 1].join(", ");

        Self {
            shape,
            insert: format!("INSERT INTO Ycsb VALUES ({placeholders})"),
            fields: columns
                .iter()
                .map(|column| format!("SELECT {column} FROM Ycsb WHERE ycsb_key = ?1"))
                .collect(),
            scan: format!(
                "SELECT ycsb_key, {} FROM Ycsb ORDER BY ycsb_key",
                columns.join(", ")
            ),
        }
    }
}

impl SqliteStore {
    /// Opens a private in-memory database.
    pub fn in_memory() -> StoreResult<Self> {
        let conn = Connection::open_in_memory().map_err(StoreError::sqlite("open in-memory"))?;
        Ok(Self::with_connection(conn))
    }

    /// Opens or creates a database file.
    pub fn open(path: &Path) -> StoreResult<Self> {
        let conn = Connection::open(path).map_err(StoreError::sqlite("open database file"))?;

        // Tune for load throughput, durability is irrelevant for a benchmark table.
        conn.execute_batch(
            "PRAGMA journal_mode = WAL;
             PRAGMA synchronous = NORMAL;
             PRAGMA temp_store = MEMORY;",
        )
        .map_err(StoreError::sqlite("set pragmas"))?;

        Ok(Self::with_connection(conn))
    }

    fn with_connection(conn: Connection) -> Self {
        Self {
            conn,
            statements: None,
        }
    }

    fn statements(&self) -> StoreResult<&Statements> {
        self.statements.as_ref().ok_or(StoreError::SchemaMissing)
    }
}

impl Store for SqliteStore {
    fn name(&self) -> &'static str {
        "sqlite"
    }

    fn create_table(&mut self, shape: &DatasetShape) -> StoreResult<()> {
        let mut sql = String::from(
            "DROP TABLE IF EXISTS Ycsb;
             CREATE TABLE Ycsb (ycsb_key INTEGER PRIMARY KEY NOT NULL",
        );
        for i in 1..=shape.field_count {
            let _ = write!(sql, ", v{i} BLOB NOT NULL");
        }
        sql.push_str(");");

        self.conn
            .execute_batch(&sql)
            .map_err(StoreError::sqlite("create table"))?;

        // one statement per field, plus insert and scan
        self.conn
            .set_prepared_statement_cache_capacity(shape.field_count + 2);
        self.statements = Some(Statements::new(*shape));
        Ok(())
    }

    fn insert_batch(&mut self, batch: &Batch<'_>) -> StoreResult<()> {
        let statements = self
            .statements
            .as_ref()
            .ok_or(StoreError::SchemaMissing)?;
        let shape = batch.shape();
        if shape.field_count != statements.shape.field_count
            || shape.field_length != statements.shape.field_length
        {
            return Err(StoreError::malformed("batch does not match the table layout"));
        }

        let tx = self
            .conn
            .transaction()
            .map_err(StoreError::sqlite("begin batch"))?;
        {
            let mut stmt = tx
                .prepare_cached(&statements.insert)
                .map_err(StoreError::sqlite("prepare insert"))?;

            let mut values = Vec::with_capacity(shape.field_count + 1);
            for record in batch.records() {
                values.clear();
                values.push(ToSqlOutput::Owned(Value::Integer(sql_key(record.key())?)));
                values.extend(
                    record
                        .fields()
                        .map(|field| ToSqlOutput::Borrowed(ValueRef::Blob(field))),
                );

                stmt.execute(params_from_iter(values.iter()))
                    .map_err(StoreError::sqlite("insert record"))?;
            }
        }
        tx.commit().map_err(StoreError::sqlite("commit batch"))?;

        Ok(())
    }

    fn read_field(&mut self, key: u64, field: usize, out: &mut Vec<u8>) -> StoreResult<bool> {
        out.clear();

        let statements = self.statements()?;
        let Some(sql) = statements.fields.get(field) else {
            return Err(StoreError::malformed(format!("no column for field {field}")));
        };

        let mut stmt = self
            .conn
            .prepare_cached(sql)
            .map_err(StoreError::sqlite("prepare point query"))?;
        let mut rows = stmt
            .query([sql_key(key)?])
            .map_err(StoreError::sqlite("point query"))?;

        let Some(row) = rows.next().map_err(StoreError::sqlite("step point query"))? else {
            return Ok(false);
        };
        out.extend_from_slice(column_bytes(row, 0)?);

        if rows
            .next()
            .map_err(StoreError::sqlite("step point query"))?
            .is_some()
        {
            out.clear();
            return Err(StoreError::MultipleRows { key });
        }

        Ok(true)
    }

    fn scan(&mut self, visit: &mut dyn FnMut(&dyn ScanRow) -> StoreResult<()>) -> StoreResult<()> {
        let statements = self.statements()?;
        let field_count = statements.shape.field_count;

        let mut stmt = self
            .conn
            .prepare_cached(&statements.scan)
            .map_err(StoreError::sqlite("prepare scan"))?;
        let mut rows = stmt.query([]).map_err(StoreError::sqlite("scan"))?;

        while let Some(row) = rows.next().map_err(StoreError::sqlite("step scan"))? {
            visit(&SqliteRow { row, field_count })?;
        }

        Ok(())
    }
}

fn column_bytes<'a>(row: &'a Row<'_>, index: usize) -> StoreResult<&'a [u8]> {
    row.get_ref(index)
        .map_err(StoreError::sqlite("read column"))?
        .as_bytes()
        .map_err(|err| StoreError::malformed(format!("column {index}: {err}")))
}

struct SqliteRow<'a, 'stmt> {
    row: &'a Row<'stmt>,
    field_count: usize,
}

impl ScanRow for SqliteRow<'_, '_> {
    fn key(&self) -> StoreResult<u64> {
        let key: i64 = self.row.get(0).map_err(StoreError::sqlite("read key"))?;
        u64::try_from(key).map_err(|_| StoreError::malformed(format!("negative key {key}")))
    }

    fn field(&self, index: usize) -> StoreResult<&[u8]> {
        if index >= self.field_count {
            return Err(StoreError::malformed(format!("no column for field {index}")));
        }
        // column 0 holds the key
        column_bytes(self.row, index + 1)
    }
}
