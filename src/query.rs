use crate::db::{Filter, SortField, Store};
use crate::error::RecordResult;
use crate::model::{StudentRecord, Subject};

pub const DEFAULT_TOP_N: usize = 3;

pub fn list_all(store: &Store) -> RecordResult<Vec<StudentRecord>> {
    Ok(store.find_all()?)
}

/// Exact match on roll number; `None` when nothing matches.
pub fn find_by_roll_number(store: &Store, roll: i64) -> RecordResult<Option<StudentRecord>> {
    Ok(store.find_one(Filter::RollNumber(roll))?)
}

/// Up to `n` records, best `subject` score first. Absent scores sort last,
/// equal scores keep insertion order.
pub fn top_n(store: &Store, subject: Subject, n: usize) -> RecordResult<Vec<StudentRecord>> {
    Ok(store.find_sorted(SortField::Subject(subject), Some(n))?)
}

/// Every record by descending `total_marks`. Records never totalled sort last.
pub fn merit_list(store: &Store) -> RecordResult<Vec<StudentRecord>> {
    Ok(store.find_sorted(SortField::TotalMarks, None)?)
}
