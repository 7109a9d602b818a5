//! Per-class object registries.
//!
//! Each object class owns exactly one `ObjectMap`; entities live in their
//! registry and everything else refers to them by OID. The map is ordered on
//! the OID so dump and iteration order is stable, and it never creates
//! entries implicitly: a lookup of an absent key is always `None`, never a
//! silently inserted default.

use sai_common::Oid;
use std::collections::BTreeMap;

/// An ordered, OID-keyed registry that never auto-creates entries.
#[derive(Debug, Clone)]
pub struct ObjectMap<V> {
    inner: BTreeMap<Oid, V>,
}

impl<V> ObjectMap<V> {
    pub fn new() -> Self {
        Self {
            inner: BTreeMap::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    pub fn contains(&self, oid: Oid) -> bool {
        self.inner.contains_key(&oid)
    }

    /// Lookup; never creates an entry.
    pub fn get(&self, oid: Oid) -> Option<&V> {
        self.inner.get(&oid)
    }

    /// Mutable lookup; never creates an entry.
    pub fn get_mut(&mut self, oid: Oid) -> Option<&mut V> {
        self.inner.get_mut(&oid)
    }

    /// Inserts, returning the previous occupant if the OID was live.
    pub fn insert(&mut self, oid: Oid, value: V) -> Option<V> {
        self.inner.insert(oid, value)
    }

    /// Removes, returning the entity so a failed multi-step delete can
    /// reinsert it.
    pub fn remove(&mut self, oid: Oid) -> Option<V> {
        self.inner.remove(&oid)
    }

    pub fn iter(&self) -> impl Iterator<Item = (Oid, &V)> {
        self.inner.iter().map(|(k, v)| (*k, v))
    }

    pub fn values(&self) -> impl Iterator<Item = &V> {
        self.inner.values()
    }

    pub fn values_mut(&mut self) -> impl Iterator<Item = &mut V> {
        self.inner.values_mut()
    }

    pub fn keys(&self) -> impl Iterator<Item = Oid> + '_ {
        self.inner.keys().copied()
    }
}

impl<V> Default for ObjectMap<V> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use sai_common::ObjectType;

    #[test]
    fn test_lookup_never_creates() {
        let mut map: ObjectMap<u32> = ObjectMap::new();
        let oid = Oid::new(ObjectType::AclTable, 1);

        assert!(map.get(oid).is_none());
        assert!(map.get_mut(oid).is_none());
        assert!(map.is_empty());
    }

    #[test]
    fn test_insert_remove_round_trip() {
        let mut map: ObjectMap<u32> = ObjectMap::new();
        let oid = Oid::new(ObjectType::AclTable, 1);

        assert!(map.insert(oid, 7).is_none());
        assert_eq!(map.get(oid), Some(&7));

        let removed = map.remove(oid);
        assert_eq!(removed, Some(7));
        assert!(map.is_empty());
    }

    #[test]
    fn test_iteration_is_oid_ordered() {
        let mut map: ObjectMap<u32> = ObjectMap::new();
        for idx in [5u32, 1, 3] {
            map.insert(Oid::new(ObjectType::AclEntry, idx), idx);
        }
        let order: Vec<u32> = map.values().copied().collect();
        assert_eq!(order, vec![1, 3, 5]);
    }
}
