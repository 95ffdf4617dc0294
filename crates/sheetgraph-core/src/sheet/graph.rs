//! Dependency graph maintenance.
//!
//! Edges are stored on both ends, keyed by address: a cell's `parents` are
//! the cells its formula reads and its `children` are the cells that read
//! it. The two sets mirror each other at all times between operations.
//!
//! Every traversal here is an explicit worklist with a visited set, so deep
//! chains do not grow the call stack and diamond-shaped fans are walked once.

use std::collections::{HashMap, HashSet};

use sheetgraph_formula::{Address, Value};
use tracing::debug;

use super::Sheet;

impl Sheet {
    /// Check whether giving `target` the parents `candidates` would close a
    /// cycle. Only committed edges are followed; nothing is mutated.
    ///
    /// Returns the offending chain `target -> candidate -> ... -> target`.
    pub(crate) fn find_cycle(&self, target: Address, candidates: &[Address]) -> Option<Vec<Address>> {
        // Maps each reached cell to the cell whose parent list led to it.
        let mut via: HashMap<Address, Option<Address>> = HashMap::new();
        let mut stack = Vec::new();
        for &candidate in candidates {
            if via.insert(candidate, None).is_none() {
                stack.push(candidate);
            }
        }

        while let Some(current) = stack.pop() {
            if current == target {
                let mut path = vec![current];
                let mut cursor = current;
                while let Some(Some(prev)) = via.get(&cursor) {
                    path.push(*prev);
                    cursor = *prev;
                }
                path.push(target);
                path.reverse();
                return Some(path);
            }

            let Some(cell) = self.cell(current) else {
                continue;
            };
            for parent in cell.parents() {
                if !via.contains_key(&parent) {
                    via.insert(parent, Some(current));
                    stack.push(parent);
                }
            }
        }
        None
    }

    /// Drop the cached value of `start` and of every transitive dependent.
    /// Returns how many cells were visited.
    pub(crate) fn invalidate_from(&mut self, start: Address) -> usize {
        let mut visited = HashSet::new();
        let mut stack = vec![start];

        while let Some(current) = stack.pop() {
            if !visited.insert(current) {
                continue;
            }
            let Some(cell) = self.cell_mut(current) else {
                continue;
            };
            cell.invalidate();
            stack.extend(cell.children().filter(|child| !visited.contains(child)));
        }

        debug!(cell = %start, invalidated = visited.len(), "invalidated dependents");
        visited.len()
    }

    /// Remove every outgoing edge of `addr` and prune parents left as
    /// unreferenced blank placeholders.
    pub(crate) fn detach_parents(&mut self, addr: Address) {
        let Some(cell) = self.cell_mut(addr) else {
            return;
        };
        let parents = std::mem::take(&mut cell.parents);
        for parent in parents {
            if let Some(parent_cell) = self.cell_mut(parent) {
                parent_cell.children.remove(&addr);
            }
            self.prune_placeholder(parent);
        }
    }

    /// Link `addr` to each of `parents`, materializing blank cells for
    /// references that have nothing stored yet.
    pub(crate) fn attach_parents(&mut self, addr: Address, parents: &[Address]) {
        for &parent in parents {
            self.get_or_create_cell(parent).children.insert(addr);
        }
        if let Some(cell) = self.cell_mut(addr) {
            cell.parents = parents.iter().copied().collect();
        }
    }

    /// Remove `addr` from storage if it is blank and nothing reads it.
    pub(crate) fn prune_placeholder(&mut self, addr: Address) -> bool {
        let removable = self
            .cell(addr)
            .is_some_and(|cell| cell.content().is_blank() && !cell.is_referenced());
        if removable {
            debug!(cell = %addr, "pruned blank cell");
            self.remove_cell(addr);
        }
        removable
    }

    /// Value of the cell at `addr`, computing uncached ancestors first in
    /// dependency order so evaluation never recurses deeply.
    pub(crate) fn evaluate(&self, addr: Address) -> Value {
        let Some(cell) = self.cell(addr) else {
            return Value::empty();
        };
        if let Some(value) = cell.cached_value() {
            return value.clone();
        }

        for ancestor in self.uncached_ancestors(addr) {
            if let Some(ancestor_cell) = self.cell(ancestor) {
                ancestor_cell.compute(self);
            }
        }
        cell.compute(self)
    }

    /// Uncached ancestors of `addr`, parents before children. Stops at
    /// cells that already hold a value.
    fn uncached_ancestors(&self, addr: Address) -> Vec<Address> {
        let mut order = Vec::new();
        let mut visited = HashSet::new();
        let mut stack = vec![(addr, false)];

        while let Some((current, expanded)) = stack.pop() {
            if expanded {
                if current != addr {
                    order.push(current);
                }
                continue;
            }
            if !visited.insert(current) {
                continue;
            }
            let Some(cell) = self.cell(current) else {
                continue;
            };
            if current != addr && cell.cached_value().is_some() {
                continue;
            }
            stack.push((current, true));
            stack.extend(
                cell.parents()
                    .filter(|parent| !visited.contains(parent))
                    .map(|parent| (parent, false)),
            );
        }
        order
    }
}

#[cfg(test)]
mod tests {
    use crate::Sheet;
    use pretty_assertions::assert_eq;
    use sheetgraph_formula::{Address, Value};

    fn a(text: &str) -> Address {
        text.parse().unwrap()
    }

    #[test]
    fn test_edges_mirror_each_other() {
        let mut sheet = Sheet::new();
        sheet.set_content(a("C1"), "=A1 + B1").unwrap();

        let c1 = sheet.cell(a("C1")).unwrap();
        assert_eq!(c1.parents().collect::<Vec<_>>(), vec![a("A1"), a("B1")]);
        for parent in [a("A1"), a("B1")] {
            let cell = sheet.cell(parent).unwrap();
            assert_eq!(cell.children().collect::<Vec<_>>(), vec![a("C1")]);
        }
    }

    #[test]
    fn test_find_cycle_reports_path() {
        let mut sheet = Sheet::new();
        sheet.set_content(a("B1"), "=A1").unwrap();
        sheet.set_content(a("C1"), "=B1").unwrap();

        let path = sheet.find_cycle(a("A1"), &[a("C1")]).unwrap();
        assert_eq!(path, vec![a("A1"), a("C1"), a("B1"), a("A1")]);
        assert_eq!(sheet.find_cycle(a("D1"), &[a("C1")]), None);
    }

    #[test]
    fn test_find_cycle_self_reference() {
        let sheet = Sheet::new();
        assert_eq!(sheet.find_cycle(a("A1"), &[a("A1")]), Some(vec![a("A1"), a("A1")]));
    }

    #[test]
    fn test_invalidate_visits_diamond_once() {
        let mut sheet = Sheet::new();
        sheet.set_content(a("A1"), "1").unwrap();
        sheet.set_content(a("B1"), "=A1 + 1").unwrap();
        sheet.set_content(a("C1"), "=A1 + 2").unwrap();
        sheet.set_content(a("D1"), "=B1 + C1").unwrap();
        assert_eq!(sheet.value(a("D1")).unwrap(), Some(Value::Number(5.0)));

        assert_eq!(sheet.invalidate_from(a("A1")), 4);
        for name in ["A1", "B1", "C1", "D1"] {
            assert_eq!(sheet.cell(a(name)).unwrap().cached_value(), None, "{name}");
        }
    }

    #[test]
    fn test_evaluate_warms_ancestors() {
        let mut sheet = Sheet::new();
        sheet.set_content(a("A1"), "1").unwrap();
        sheet.set_content(a("A2"), "=A1 * 2").unwrap();
        sheet.set_content(a("A3"), "=A2 * 2").unwrap();

        assert_eq!(sheet.evaluate(a("A3")), Value::Number(4.0));
        assert_eq!(sheet.cell(a("A2")).unwrap().cached_value(), Some(&Value::Number(2.0)));
    }

    #[test]
    fn test_deep_chain_does_not_overflow() {
        let mut sheet = Sheet::new();
        sheet.set_content(Address::new(0, 0), "1").unwrap();
        for row in 1..2_000 {
            let text = format!("={} + 1", Address::new(row - 1, 0));
            sheet.set_content(Address::new(row, 0), &text).unwrap();
        }
        assert_eq!(
            sheet.value(Address::new(1_999, 0)).unwrap(),
            Some(Value::Number(2_000.0))
        );

        sheet.set_content(Address::new(0, 0), "2").unwrap();
        assert_eq!(
            sheet.value(Address::new(1_999, 0)).unwrap(),
            Some(Value::Number(2_001.0))
        );
    }

    #[test]
    fn test_rewiring_prunes_unused_placeholders() {
        let mut sheet = Sheet::new();
        sheet.set_content(a("A1"), "=B1").unwrap();
        assert!(sheet.cell(a("B1")).is_some());

        sheet.set_content(a("A1"), "=C1").unwrap();
        assert!(sheet.cell(a("B1")).is_none());
        assert!(sheet.cell(a("C1")).is_some());
    }
}
