use crate::calc::PERCENTAGE_DENOMINATOR;
use crate::model::{NewStudent, StudentRecord, Subject};
use anyhow::Context;
use rusqlite::types::Value;
use rusqlite::{params_from_iter, Connection, OptionalExtension, Row};
use std::path::Path;
use tracing::debug;
use uuid::Uuid;

pub const DB_FILE_NAME: &str = "examrec.sqlite3";

const STUDENT_COLUMNS: &str =
    "id, roll_no, name, c_marks, python_marks, java_marks, total_marks, percentage, created_at";

/// Record selection used by reads, bulk updates and bulk deletes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Filter {
    All,
    RollNumber(i64),
    /// All three subject scores equal 0. NULL scores never match.
    AllSubjectsZero,
}

impl Filter {
    fn where_clause(self) -> (&'static str, Vec<Value>) {
        match self {
            Filter::All => ("1 = 1", Vec::new()),
            Filter::RollNumber(roll) => ("roll_no = ?", vec![Value::Integer(roll)]),
            Filter::AllSubjectsZero => (
                "c_marks = 0 AND python_marks = 0 AND java_marks = 0",
                Vec::new(),
            ),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Update {
    /// `total_marks = c + python + java`; NULL if any score is NULL.
    ComputeTotal,
    /// `percentage = total_marks / 300 * 100`; NULL if the total is NULL.
    ComputePercentage,
    /// Adds to one subject; a NULL score counts as 0.
    Increment(Subject, i64),
}

impl Update {
    fn set_clause(self) -> (String, Vec<Value>) {
        match self {
            Update::ComputeTotal => (
                "total_marks = c_marks + python_marks + java_marks".to_string(),
                Vec::new(),
            ),
            Update::ComputePercentage => (
                "percentage = (total_marks / ?) * 100.0".to_string(),
                vec![Value::Real(PERCENTAGE_DENOMINATOR)],
            ),
            Update::Increment(subject, amount) => {
                let col = subject.column();
                (
                    format!("{col} = COALESCE({col}, 0) + ?"),
                    vec![Value::Integer(amount)],
                )
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortField {
    Subject(Subject),
    TotalMarks,
}

impl SortField {
    fn column(self) -> &'static str {
        match self {
            SortField::Subject(s) => s.column(),
            SortField::TotalMarks => "total_marks",
        }
    }
}

/// Explicitly constructed handle to the record store. Owned by the caller
/// and passed to the calc/query functions.
pub struct Store {
    conn: Connection,
}

impl Store {
    pub fn open(workspace: &Path) -> anyhow::Result<Store> {
        std::fs::create_dir_all(workspace).with_context(|| {
            format!("failed to create workspace {}", workspace.to_string_lossy())
        })?;
        let db_path = workspace.join(DB_FILE_NAME);
        let conn = Connection::open(&db_path)
            .with_context(|| format!("failed to open {}", db_path.to_string_lossy()))?;
        Store::from_connection(conn)
    }

    #[cfg(test)]
    pub(crate) fn open_in_memory() -> anyhow::Result<Store> {
        Store::from_connection(Connection::open_in_memory()?)
    }

    fn from_connection(conn: Connection) -> anyhow::Result<Store> {
        conn.execute(
            "CREATE TABLE IF NOT EXISTS students(
                id TEXT PRIMARY KEY,
                roll_no INTEGER,
                name TEXT NOT NULL,
                c_marks REAL,
                python_marks REAL,
                java_marks REAL,
                total_marks REAL,
                percentage REAL,
                created_at TEXT NOT NULL
            )",
            [],
        )?;
        conn.execute(
            "CREATE INDEX IF NOT EXISTS idx_students_roll_no ON students(roll_no)",
            [],
        )?;
        Ok(Store { conn })
    }

    pub fn create(&self, student: &NewStudent) -> rusqlite::Result<String> {
        let id = Uuid::new_v4().to_string();
        let created_at = chrono::Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Secs, true);
        self.conn.execute(
            "INSERT INTO students(id, roll_no, name, c_marks, python_marks, java_marks, created_at)
             VALUES(?, ?, ?, ?, ?, ?, ?)",
            (
                &id,
                student.roll_number,
                &student.name,
                student.c_marks,
                student.python_marks,
                student.java_marks,
                &created_at,
            ),
        )?;
        debug!(id = %id, roll = ?student.roll_number, "student inserted");
        Ok(id)
    }

    /// Every record in insertion order.
    pub fn find_all(&self) -> rusqlite::Result<Vec<StudentRecord>> {
        self.select(Filter::All, "rowid", None)
    }

    /// First matching record by insertion order.
    pub fn find_one(&self, filter: Filter) -> rusqlite::Result<Option<StudentRecord>> {
        let (clause, params) = filter.where_clause();
        let sql = format!(
            "SELECT {STUDENT_COLUMNS} FROM students WHERE {clause} ORDER BY rowid LIMIT 1"
        );
        self.conn
            .query_row(&sql, params_from_iter(params), student_from_row)
            .optional()
    }

    /// Descending by `field`; NULLs last, ties by insertion order.
    pub fn find_sorted(
        &self,
        field: SortField,
        limit: Option<usize>,
    ) -> rusqlite::Result<Vec<StudentRecord>> {
        let col = field.column();
        let order = format!("{col} IS NULL, {col} DESC, rowid");
        self.select(Filter::All, &order, limit)
    }

    /// Single statement inside a transaction: all matching rows change or none do.
    pub fn update_many(&self, filter: Filter, update: Update) -> rusqlite::Result<usize> {
        let (set, mut params) = update.set_clause();
        let (clause, where_params) = filter.where_clause();
        params.extend(where_params);
        let sql = format!("UPDATE students SET {set} WHERE {clause}");

        let tx = self.conn.unchecked_transaction()?;
        let n = tx.execute(&sql, params_from_iter(params))?;
        tx.commit()?;
        debug!(?filter, ?update, rows = n, "bulk update");
        Ok(n)
    }

    pub fn delete_many(&self, filter: Filter) -> rusqlite::Result<usize> {
        let (clause, params) = filter.where_clause();
        let sql = format!("DELETE FROM students WHERE {clause}");

        let tx = self.conn.unchecked_transaction()?;
        let n = tx.execute(&sql, params_from_iter(params))?;
        tx.commit()?;
        debug!(?filter, rows = n, "bulk delete");
        Ok(n)
    }

    pub fn count(&self) -> rusqlite::Result<i64> {
        self.conn
            .query_row("SELECT COUNT(*) FROM students", [], |r| r.get(0))
    }

    fn select(
        &self,
        filter: Filter,
        order_by: &str,
        limit: Option<usize>,
    ) -> rusqlite::Result<Vec<StudentRecord>> {
        let (clause, mut params) = filter.where_clause();
        // SQLite treats a negative LIMIT as "no limit".
        let limit = limit.map(|n| n as i64).unwrap_or(-1);
        params.push(Value::Integer(limit));
        let sql = format!(
            "SELECT {STUDENT_COLUMNS} FROM students WHERE {clause} ORDER BY {order_by} LIMIT ?"
        );
        let mut stmt = self.conn.prepare(&sql)?;
        let rows = stmt
            .query_map(params_from_iter(params), student_from_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(rows)
    }

    #[cfg(test)]
    pub(crate) fn connection(&self) -> &Connection {
        &self.conn
    }
}

fn student_from_row(row: &Row<'_>) -> rusqlite::Result<StudentRecord> {
    Ok(StudentRecord {
        id: row.get(0)?,
        roll_number: row.get(1)?,
        name: row.get(2)?,
        c_marks: row.get(3)?,
        python_marks: row.get(4)?,
        java_marks: row.get(5)?,
        total_marks: row.get(6)?,
        percentage: row.get(7)?,
        created_at: row.get(8)?,
    })
}
