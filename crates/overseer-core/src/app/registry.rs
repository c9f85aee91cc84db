//! JobRegistry - the in-memory store of job records.
//!
//! Holds no lock of its own; the supervisor wraps it in a single mutex that
//! both completion writes and the eviction sweep take.

use std::collections::HashMap;

use chrono::{DateTime, Duration, Utc};

use crate::domain::{JobId, JobRecord};

/// id -> record map that remembers insertion order for listing.
#[derive(Debug, Default)]
pub struct JobRegistry {
    records: HashMap<JobId, JobRecord>,
    order: Vec<JobId>,
}

impl JobRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a new record. Returns `false` (and stores nothing) if the id is
    /// already taken, so a record is never silently replaced.
    pub fn insert(&mut self, record: JobRecord) -> bool {
        if self.records.contains_key(&record.id) {
            return false;
        }
        self.order.push(record.id);
        self.records.insert(record.id, record);
        true
    }

    pub fn get(&self, id: &JobId) -> Option<&JobRecord> {
        self.records.get(id)
    }

    pub fn get_mut(&mut self, id: &JobId) -> Option<&mut JobRecord> {
        self.records.get_mut(id)
    }

    /// Owned copies of every record, in insertion order.
    pub fn snapshot(&self) -> Vec<JobRecord> {
        self.order
            .iter()
            .filter_map(|id| self.records.get(id))
            .cloned()
            .collect()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Remove terminal records that finished more than `retention` before
    /// `now`. Returns the removed ids.
    pub fn evict_expired(&mut self, now: DateTime<Utc>, retention: Duration) -> Vec<JobId> {
        let expired: Vec<JobId> = self
            .order
            .iter()
            .filter(|id| {
                self.records
                    .get(*id)
                    .is_some_and(|record| record.is_expired(now, retention))
            })
            .copied()
            .collect();

        if expired.is_empty() {
            return expired;
        }

        for id in &expired {
            self.records.remove(id);
        }
        self.order.retain(|id| self.records.contains_key(id));
        expired
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{JobSpec, JobStatus};
    use chrono::TimeZone;
    use ulid::Ulid;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap()
    }

    fn record(name: &str, status: JobStatus, end_time: Option<DateTime<Utc>>) -> JobRecord {
        let started = now() - Duration::days(2);
        let mut record = JobRecord::new(JobId::from_ulid(Ulid::new()), JobSpec::new(name), 1, started);
        record.status = status;
        record.end_time = end_time;
        record
    }

    #[test]
    fn snapshot_keeps_insertion_order() {
        let mut registry = JobRegistry::new();
        let names = ["c", "a", "b"];
        for name in names {
            assert!(registry.insert(record(name, JobStatus::Running, None)));
        }

        let listed: Vec<String> = registry.snapshot().into_iter().map(|r| r.name).collect();
        assert_eq!(listed, names);
        assert_eq!(registry.len(), 3);
    }

    #[test]
    fn duplicate_id_is_rejected() {
        let mut registry = JobRegistry::new();
        let first = record("first", JobStatus::Running, None);
        let mut second = record("second", JobStatus::Running, None);
        second.id = first.id;

        assert!(registry.insert(first.clone()));
        assert!(!registry.insert(second));
        assert_eq!(registry.get(&first.id).map(|r| r.name.as_str()), Some("first"));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn eviction_respects_retention_and_state() {
        let mut registry = JobRegistry::new();
        let old = record("old", JobStatus::Completed, Some(now() - Duration::hours(2)));
        let recent = record("recent", JobStatus::RetryFailed, Some(now() - Duration::minutes(10)));
        let running = record("running", JobStatus::Running, None);
        let retrying = record("retrying", JobStatus::Retrying, Some(now() - Duration::hours(3)));
        let old_id = old.id;

        for r in [old, recent, running, retrying] {
            registry.insert(r);
        }

        let evicted = registry.evict_expired(now(), Duration::hours(1));

        assert_eq!(evicted, vec![old_id]);
        assert!(registry.get(&old_id).is_none());
        let left: Vec<String> = registry.snapshot().into_iter().map(|r| r.name).collect();
        assert_eq!(left, vec!["recent", "running", "retrying"]);
    }

    #[test]
    fn eviction_on_empty_registry_is_a_no_op() {
        let mut registry = JobRegistry::new();
        assert!(registry.evict_expired(now(), Duration::hours(1)).is_empty());
        assert!(registry.is_empty());
    }
}
