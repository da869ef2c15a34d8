use std::collections::HashMap;

/// Group a flat record slice by entity id. One O(N) pass; records whose key
/// is missing or empty are dropped silently (a data-quality concern, not an
/// engine error). Input order is preserved within each group.
pub fn group_by_entity<'a, R>(
    records: &'a [R],
    key_of: impl Fn(&R) -> Option<&str>,
) -> HashMap<String, Vec<&'a R>> {
    let mut groups: HashMap<String, Vec<&'a R>> = HashMap::new();
    for record in records {
        match key_of(record) {
            Some(key) if !key.is_empty() => {
                groups.entry(key.to_string()).or_default().push(record);
            }
            _ => {}
        }
    }
    groups
}

/// Per-stream entity index, rebuilt fresh for every evaluation call.
/// Stream snapshots are read-only; nothing is updated incrementally.
pub struct EntityIndex<'a, R> {
    groups: HashMap<String, Vec<&'a R>>,
}

impl<'a, R> EntityIndex<'a, R> {
    pub fn from_records(records: &'a [R], key_of: impl Fn(&R) -> Option<&str>) -> Self {
        Self {
            groups: group_by_entity(records, key_of),
        }
    }

    /// All records for one entity, in input order. Unknown ids yield an
    /// empty slice.
    pub fn records_for(&self, entity_id: &str) -> &[&'a R] {
        self.groups.get(entity_id).map(|v| v.as_slice()).unwrap_or(&[])
    }

    pub fn entity_count(&self) -> usize {
        self.groups.len()
    }
}
