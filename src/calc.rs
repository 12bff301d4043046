use crate::db::{Filter, Store, Update};
use crate::error::RecordResult;
use crate::model::Subject;
use tracing::info;

/// Three subjects, each scored out of 100. Fixed rather than derived from
/// the subject count; changing the grading scale means changing this.
pub const PERCENTAGE_DENOMINATOR: f64 = 300.0;

/// Snapshots `total_marks` on every record. Returns the number of records touched.
pub fn compute_total_marks(store: &Store) -> RecordResult<usize> {
    let n = store.update_many(Filter::All, Update::ComputeTotal)?;
    info!(records = n, "total marks computed");
    Ok(n)
}

/// Snapshots `percentage` from the stored `total_marks`; totals are not recomputed.
pub fn compute_percentage(store: &Store) -> RecordResult<usize> {
    let n = store.update_many(Filter::All, Update::ComputePercentage)?;
    info!(records = n, "percentage computed");
    Ok(n)
}

/// Adds `amount` to `subject` on every record. No range check: results may
/// exceed 100 or go negative.
pub fn apply_grace_marks(store: &Store, subject: Subject, amount: i64) -> RecordResult<usize> {
    let n = store.update_many(Filter::All, Update::Increment(subject, amount))?;
    info!(records = n, %subject, amount, "grace marks applied");
    Ok(n)
}

/// Deletes records whose three scores are all exactly 0. Irreversible.
pub fn delete_zero_score_records(store: &Store) -> RecordResult<usize> {
    let n = store.delete_many(Filter::AllSubjectsZero)?;
    info!(records = n, "zero-mark records deleted");
    Ok(n)
}
