//! Bounded calculation history and point-in-time snapshots of it.

use crate::calculation::Calculation;
use std::collections::VecDeque;

/// An independent copy of the history at a point in time.
///
/// Snapshots own their records; mutating the live history never changes a
/// snapshot taken earlier.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Snapshot {
    records: Vec<Calculation>,
}

impl Snapshot {
    pub fn records(&self) -> &[Calculation] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn into_records(self) -> Vec<Calculation> {
        self.records
    }
}

impl From<Vec<Calculation>> for Snapshot {
    fn from(records: Vec<Calculation>) -> Self {
        Self { records }
    }
}

/// Ordered, bounded log of past calculations.
///
/// When full, adding a record evicts the oldest one.
#[derive(Clone, Debug)]
pub struct HistoryStore {
    records: VecDeque<Calculation>,
    capacity: usize,
}

impl HistoryStore {
    /// Create an empty store. A zero capacity is treated as one.
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            records: VecDeque::with_capacity(capacity.min(1024)),
            capacity,
        }
    }

    /// Append a record, returning the evicted oldest record if over capacity.
    pub fn add(&mut self, record: Calculation) -> Option<Calculation> {
        self.records.push_back(record);
        if self.records.len() > self.capacity {
            self.records.pop_front()
        } else {
            None
        }
    }

    /// Remove all records.
    pub fn clear(&mut self) {
        self.records.clear();
    }

    /// Independent copy of all records, oldest first.
    pub fn get_all(&self) -> Vec<Calculation> {
        self.records.iter().cloned().collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Calculation> {
        self.records.iter()
    }

    pub fn last(&self) -> Option<&Calculation> {
        self.records.back()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Capture the current contents.
    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            records: self.get_all(),
        }
    }

    /// Replace the contents with a snapshot, keeping the newest records if
    /// the snapshot exceeds capacity.
    pub fn restore(&mut self, snapshot: Snapshot) {
        self.replace(snapshot.into_records());
    }

    /// Replace the contents, keeping the newest `capacity` records.
    pub fn replace(&mut self, records: Vec<Calculation>) {
        let skip = records.len().saturating_sub(self.capacity);
        self.records = records.into_iter().skip(skip).collect();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::operations::OperationRegistry;

    fn calc(a: f64) -> Calculation {
        Calculation::new(&OperationRegistry::new(), "add", a, 0.0).unwrap()
    }

    fn operands(store: &HistoryStore) -> Vec<f64> {
        store.iter().map(|c| c.operand_a()).collect()
    }

    #[test]
    fn test_add_and_evict_oldest() {
        let mut store = HistoryStore::new(3);
        assert!(store.add(calc(1.0)).is_none());
        assert!(store.add(calc(2.0)).is_none());
        assert!(store.add(calc(3.0)).is_none());

        let evicted = store.add(calc(4.0)).unwrap();
        assert_eq!(evicted.operand_a(), 1.0);
        assert_eq!(operands(&store), vec![2.0, 3.0, 4.0]);
        assert_eq!(store.len(), 3);
        assert_eq!(store.last().unwrap().operand_a(), 4.0);
    }

    #[test]
    fn test_zero_capacity_clamped() {
        let mut store = HistoryStore::new(0);
        store.add(calc(1.0));
        store.add(calc(2.0));
        assert_eq!(store.capacity(), 1);
        assert_eq!(operands(&store), vec![2.0]);
    }

    #[test]
    fn test_get_all_is_independent() {
        let mut store = HistoryStore::new(5);
        store.add(calc(1.0));
        let copy = store.get_all();
        store.clear();
        assert_eq!(copy.len(), 1);
        assert!(store.is_empty());
    }

    #[test]
    fn test_snapshot_does_not_alias() {
        let mut store = HistoryStore::new(5);
        store.add(calc(1.0));
        let snap = store.snapshot();
        store.add(calc(2.0));
        assert_eq!(snap.len(), 1);

        store.restore(snap);
        assert_eq!(operands(&store), vec![1.0]);
    }

    #[test]
    fn test_replace_keeps_newest() {
        let mut store = HistoryStore::new(2);
        store.replace(vec![calc(1.0), calc(2.0), calc(3.0)]);
        assert_eq!(operands(&store), vec![2.0, 3.0]);
    }
}
