//! The sink-side routing table: a map from child node to its currently reported parent,
//! learned from piggybacked reverse-path data (§4.3).

use crate::addr::NodeAddr;
use crate::alloc::vec::Vec;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RoutingEntry {
    pub child: NodeAddr,
    pub parent: NodeAddr,
}

/// Unordered (insertion-order iteration), unique-`child` collection of [`RoutingEntry`] rows.
///
/// Mirrors the reference deployment's `rtable_*` family, fixed with the corrected growth
/// policy noted in `DESIGN.md`: growing reallocates into a fresh, larger `Vec`, so the old
/// backing storage is freed by ordinary `Vec` drop semantics instead of leaking.
pub struct RoutingTable {
    entries: Vec<RoutingEntry>,
    resize: bool,
}

impl RoutingTable {
    /// Open a table with room for `nodes` entries before any growth is needed.
    pub fn new(nodes: usize, resize: bool) -> Self {
        RoutingTable {
            entries: Vec::with_capacity(nodes),
            resize,
        }
    }

    pub fn capacity(&self) -> usize {
        self.entries.capacity()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Linear scan by `child` equality (§9: "match" means equality throughout).
    pub fn get(&self, child: NodeAddr) -> Option<(usize, RoutingEntry)> {
        self.entries
            .iter()
            .position(|e| e.child == child)
            .map(|idx| (idx, self.entries[idx]))
    }

    /// Insert `entry`. Fails if a row for `entry.child` already exists, or if the table is at
    /// capacity and was not opened with resizing permitted.
    pub fn add(&mut self, entry: RoutingEntry) -> bool {
        if self.get(entry.child).is_some() {
            return false;
        }
        if self.entries.len() == self.entries.capacity() {
            if !self.resize {
                return false;
            }
            let new_capacity = (self.entries.capacity() * 2).max(1);
            let mut grown = Vec::with_capacity(new_capacity);
            grown.extend_from_slice(&self.entries);
            self.entries = grown;
        }
        self.entries.push(entry);
        true
    }

    /// Overwrite the row matching `entry.child`. No-op if absent.
    pub fn update(&mut self, entry: RoutingEntry) {
        if let Some(row) = self.entries.iter_mut().find(|e| e.child == entry.child) {
            *row = entry;
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &RoutingEntry> {
        self.entries.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn addr(n: u8) -> NodeAddr {
        NodeAddr::new(0, n)
    }

    #[test]
    fn add_then_get_round_trips() {
        let mut table = RoutingTable::new(4, true);
        assert!(table.add(RoutingEntry { child: addr(2), parent: addr(1) }));
        let (idx, entry) = table.get(addr(2)).unwrap();
        assert_eq!(idx, 0);
        assert_eq!(entry.parent, addr(1));
    }

    #[test]
    fn add_twice_with_same_child_keeps_one_row() {
        let mut table = RoutingTable::new(4, true);
        assert!(table.add(RoutingEntry { child: addr(2), parent: addr(1) }));
        assert!(!table.add(RoutingEntry { child: addr(2), parent: addr(9) }));
        assert_eq!(table.len(), 1);
        assert_eq!(table.get(addr(2)).unwrap().1.parent, addr(1));
    }

    #[test]
    fn update_is_idempotent_and_skips_absent_children() {
        let mut table = RoutingTable::new(4, true);
        table.add(RoutingEntry { child: addr(2), parent: addr(1) });
        table.update(RoutingEntry { child: addr(2), parent: addr(3) });
        assert_eq!(table.len(), 1);
        assert_eq!(table.get(addr(2)).unwrap().1.parent, addr(3));

        table.update(RoutingEntry { child: addr(99), parent: addr(1) });
        assert_eq!(table.len(), 1);
        assert!(table.get(addr(99)).is_none());
    }

    #[test]
    fn grows_past_initial_capacity_when_resize_allowed() {
        let mut table = RoutingTable::new(1, true);
        assert!(table.add(RoutingEntry { child: addr(1), parent: addr(0) }));
        assert!(table.add(RoutingEntry { child: addr(2), parent: addr(0) }));
        assert_eq!(table.len(), 2);
    }

    #[test]
    fn rejects_add_past_capacity_without_resize() {
        let mut table = RoutingTable::new(1, false);
        assert!(table.add(RoutingEntry { child: addr(1), parent: addr(0) }));
        assert!(!table.add(RoutingEntry { child: addr(2), parent: addr(0) }));
        assert_eq!(table.len(), 1);
    }
}
