//! In-memory stores for local use and tests.

use super::error::StoreError;
use super::ports::{AuditStore, RunStore};
use crate::core::{AuditEntry, RebalanceRun};
use std::collections::HashMap;
use std::sync::{PoisonError, RwLock};

fn poisoned<T>(_: PoisonError<T>) -> StoreError {
    StoreError::Unavailable("in-memory store lock poisoned".to_string())
}

/// Runs keyed by id.
#[derive(Debug, Default)]
pub struct InMemoryRunStore {
    runs: RwLock<HashMap<String, RebalanceRun>>,
}

impl InMemoryRunStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.runs
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl RunStore for InMemoryRunStore {
    fn find_by_id(&self, run_id: &str) -> Result<Option<RebalanceRun>, StoreError> {
        let runs = self.runs.read().map_err(poisoned)?;
        Ok(runs.get(run_id).cloned())
    }

    fn save(&self, run: &RebalanceRun) -> Result<(), StoreError> {
        let mut runs = self.runs.write().map_err(poisoned)?;
        runs.insert(run.run_id().to_string(), run.clone());
        Ok(())
    }
}

/// Audit entries grouped by run, in insertion order.
#[derive(Debug, Default)]
pub struct InMemoryAuditStore {
    entries: RwLock<HashMap<String, Vec<AuditEntry>>>,
}

impl InMemoryAuditStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of entries across all runs.
    pub fn total(&self) -> usize {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .values()
            .map(Vec::len)
            .sum()
    }
}

impl AuditStore for InMemoryAuditStore {
    fn append(&self, entry: &AuditEntry) -> Result<(), StoreError> {
        let mut entries = self.entries.write().map_err(poisoned)?;
        entries
            .entry(entry.run_id.clone())
            .or_default()
            .push(entry.clone());
        Ok(())
    }

    fn find_by_run_id(&self, run_id: &str) -> Result<Vec<AuditEntry>, StoreError> {
        let entries = self.entries.read().map_err(poisoned)?;
        Ok(entries.get(run_id).cloned().unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{RebalanceEvent, RebalanceState};
    use chrono::{NaiveDate, Utc};

    fn run(run_id: &str) -> RebalanceRun {
        RebalanceRun::new(run_id, "IDX", NaiveDate::from_ymd_opt(2025, 1, 31).unwrap())
    }

    fn entry(run_id: &str, event: RebalanceEvent) -> AuditEntry {
        AuditEntry {
            run_id: run_id.to_string(),
            index_code: "IDX".to_string(),
            effective_date: NaiveDate::from_ymd_opt(2025, 1, 31).unwrap(),
            occurred_at: Utc::now(),
            event,
            old_state: RebalanceState::Draft,
            new_state: RebalanceState::Draft,
            message: String::new(),
            effects: Vec::new(),
        }
    }

    #[test]
    fn save_overwrites_by_run_id() {
        let store = InMemoryRunStore::new();
        store.save(&run("run-1")).unwrap();

        let mut updated = run("run-1");
        updated.approvals = true;
        store.save(&updated).unwrap();

        assert_eq!(store.len(), 1);
        assert_eq!(store.find_by_id("run-1").unwrap(), Some(updated));
        assert_eq!(store.find_by_id("run-2").unwrap(), None);
    }

    #[test]
    fn audit_entries_keep_insertion_order_per_run() {
        let store = InMemoryAuditStore::new();
        store.append(&entry("run-1", RebalanceEvent::Start)).unwrap();
        store.append(&entry("run-2", RebalanceEvent::Cancel)).unwrap();
        store.append(&entry("run-1", RebalanceEvent::Fail)).unwrap();

        let events: Vec<_> = store
            .find_by_run_id("run-1")
            .unwrap()
            .iter()
            .map(|e| e.event)
            .collect();

        assert_eq!(events, vec![RebalanceEvent::Start, RebalanceEvent::Fail]);
        assert_eq!(store.total(), 3);
        assert!(store.find_by_run_id("run-3").unwrap().is_empty());
    }

    #[test]
    fn poisoned_store_still_counts_but_refuses_access() {
        let store = InMemoryRunStore::new();
        store.save(&run("run-1")).unwrap();

        let _ = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
            let _guard = store.runs.write().unwrap();
            panic!("poison the lock");
        }));

        assert_eq!(store.len(), 1);
        assert!(matches!(
            store.find_by_id("run-1"),
            Err(StoreError::Unavailable(_))
        ));
    }
}
