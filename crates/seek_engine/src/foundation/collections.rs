//! Specialized collection types

pub use slotmap::SlotMap;

slotmap::new_key_type! {
    /// Generational handle to a node in the scene index arena
    ///
    /// Handles stay valid while the node lives and never alias a node inserted
    /// later into a reused slot.
    pub struct NodeHandle;
}

/// Handle-based map using slot map for stable references
pub type HandleMap<K, T> = SlotMap<K, T>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_removed_handle_is_not_reused() {
        let mut map: HandleMap<NodeHandle, &str> = HandleMap::with_key();
        let first = map.insert("rat");
        map.remove(first);
        let second = map.insert("camera");

        assert!(map.get(first).is_none());
        assert_eq!(map.get(second), Some(&"camera"));
        assert_ne!(first, second);
    }
}
