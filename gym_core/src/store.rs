use std::collections::HashMap;

use gym_proto::GymRecord;

/// Last observed record for every gym seen so far.
///
/// Records are only ever replaced wholesale by [`SnapshotStore::merge`].
#[derive(Debug, Default, Clone)]
pub struct SnapshotStore {
    gyms: HashMap<String, GymRecord>,
}

impl SnapshotStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, id: &str) -> Option<&GymRecord> {
        self.gyms.get(id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.gyms.contains_key(id)
    }

    /// Replace the stored entry of every gym in `batch`. Later duplicates win.
    pub fn merge<'a, I>(&mut self, batch: I)
    where
        I: IntoIterator<Item = &'a GymRecord>,
    {
        for record in batch {
            self.gyms.insert(record.id.clone(), record.clone());
        }
    }

    pub fn len(&self) -> usize {
        self.gyms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.gyms.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &GymRecord> {
        self.gyms.values()
    }
}
