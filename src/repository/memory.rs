use std::sync::{Arc, Mutex};

use crate::types::{RepositoryError, Run};

use super::{validate, RunRepository};

/// In-memory backend. The vector lives for the life of the process and is
/// only ever reached through the mutex, so concurrent writers to the same
/// id are serialized; callers get clones, never references into it.
#[derive(Clone, Default)]
pub struct MemoryRepository {
    runs: Arc<Mutex<Vec<Run>>>,
}

impl MemoryRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

impl RunRepository for MemoryRepository {
    fn find_all(&self) -> Result<Vec<Run>, RepositoryError> {
        Ok(self.runs.lock().unwrap().clone())
    }

    fn find_by_id(&self, id: i64) -> Result<Option<Run>, RepositoryError> {
        let runs = self.runs.lock().unwrap();
        Ok(runs.iter().find(|r| r.id == id).cloned())
    }

    fn create(&self, run: Run) -> Result<(), RepositoryError> {
        validate(&run)?;
        let mut runs = self.runs.lock().unwrap();
        if runs.iter().any(|r| r.id == run.id) {
            return Err(RepositoryError::DuplicateKey(run.id));
        }
        runs.push(run);
        Ok(())
    }

    fn update(&self, run: Run, id: i64) -> Result<(), RepositoryError> {
        validate(&run)?;
        let mut runs = self.runs.lock().unwrap();
        match runs.iter_mut().find(|r| r.id == id) {
            Some(slot) => {
                *slot = Run { id, ..run };
                Ok(())
            }
            None => Err(RepositoryError::NotFound(id)),
        }
    }

    fn delete(&self, id: i64) -> Result<(), RepositoryError> {
        let mut runs = self.runs.lock().unwrap();
        let before = runs.len();
        runs.retain(|r| r.id != id);
        if runs.len() == before {
            return Err(RepositoryError::NotFound(id));
        }
        Ok(())
    }
}
