mod memory;
mod sqlite;

use std::sync::Arc;

use crate::types::{RepositoryError, Run};

pub use memory::MemoryRepository;
pub use sqlite::SqliteRepository;

/// Sole mediator of reads and writes to the run collection. Each operation
/// is a single atomic step over the current snapshot; reads hand back
/// values, never references into live storage.
pub trait RunRepository {
    /// All current records. Insertion order for the memory backend, id
    /// order for SQLite. Never fails on an empty store.
    fn find_all(&self) -> Result<Vec<Run>, RepositoryError>;

    /// The record with that id, or `None` if absent.
    fn find_by_id(&self, id: i64) -> Result<Option<Run>, RepositoryError>;

    /// Inserts a new record. Fails with `DuplicateKey` if the id is taken
    /// and leaves the store unchanged on any failure.
    fn create(&self, run: Run) -> Result<(), RepositoryError>;

    /// Replaces the record stored at `id` wholesale. The id carried inside
    /// `run` is ignored in favor of the argument.
    fn update(&self, run: Run, id: i64) -> Result<(), RepositoryError>;

    /// Removes the record with that id.
    fn delete(&self, id: i64) -> Result<(), RepositoryError>;
}

impl<T: RunRepository + ?Sized> RunRepository for Arc<T> {
    fn find_all(&self) -> Result<Vec<Run>, RepositoryError> {
        (**self).find_all()
    }

    fn find_by_id(&self, id: i64) -> Result<Option<Run>, RepositoryError> {
        (**self).find_by_id(id)
    }

    fn create(&self, run: Run) -> Result<(), RepositoryError> {
        (**self).create(run)
    }

    fn update(&self, run: Run, id: i64) -> Result<(), RepositoryError> {
        (**self).update(run, id)
    }

    fn delete(&self, id: i64) -> Result<(), RepositoryError> {
        (**self).delete(id)
    }
}

/// Write-boundary checks shared by both backends. The entity itself stays
/// unvalidated so deserialized payloads can reach this single choke point.
fn validate(run: &Run) -> Result<(), RepositoryError> {
    if run.title.trim().is_empty() {
        return Err(RepositoryError::Validation(
            "title must not be empty".to_string(),
        ));
    }
    if run.miles < 0 {
        return Err(RepositoryError::Validation(format!(
            "miles must be non-negative, got {}",
            run.miles
        )));
    }
    if run.completed_on < run.started_on {
        return Err(RepositoryError::Validation(format!(
            "run completes at {} before it starts at {}",
            run.completed_on, run.started_on
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Location;
    use chrono::{Duration, TimeZone, Utc};

    fn sample_run(id: i64) -> Run {
        let started_on = Utc.with_ymd_and_hms(2024, 5, 6, 7, 0, 0).unwrap();
        Run {
            id,
            title: "Monday Run".to_string(),
            started_on,
            completed_on: started_on + Duration::minutes(30),
            miles: 3,
            location: Location::Indoor,
        }
    }

    #[test]
    fn validate_accepts_well_formed_run() {
        validate(&sample_run(1)).unwrap();
    }

    #[test]
    fn validate_accepts_zero_duration_and_zero_miles() {
        let mut run = sample_run(1);
        run.completed_on = run.started_on;
        run.miles = 0;
        validate(&run).unwrap();
    }

    #[test]
    fn validate_rejects_blank_title() {
        let mut run = sample_run(1);
        run.title = "   ".to_string();
        let err = validate(&run).unwrap_err();
        assert!(matches!(err, RepositoryError::Validation(_)));
    }

    #[test]
    fn validate_rejects_negative_miles() {
        let mut run = sample_run(1);
        run.miles = -2;
        let err = validate(&run).unwrap_err();
        assert!(matches!(err, RepositoryError::Validation(_)));
    }

    #[test]
    fn validate_rejects_completion_before_start() {
        let mut run = sample_run(1);
        run.completed_on = run.started_on - Duration::minutes(1);
        let err = validate(&run).unwrap_err();
        assert!(matches!(err, RepositoryError::Validation(_)));
    }
}
