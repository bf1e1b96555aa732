// Tape cell allocator.
//
// Purely compile-time bookkeeping: no target characters are ever
// emitted here. `allocate` hands out the smallest index that keeps the
// live set packed, reusing gaps left by `free` before growing the
// high-water mark.

use std::cell::RefCell;
use std::collections::BTreeSet;
use std::rc::Rc;

use crate::diagnostics::{Diagnostics, Event};
use crate::util::trace;

/// A tape cell index, as handed out by `Allocator::allocate`.
pub type CellIndex = usize;

/// Hands out and reclaims tape cell indices.
///
/// Live cells are exactly `{0 .. next_free} \ gaps`. A
/// `BTreeSet` is used for `gaps` so that gap reuse is deterministic
/// (smallest freed index first), which keeps compiled output
/// reproducible across runs.
#[derive(Debug, Default, Clone)]
pub struct Allocator {
    next_free: CellIndex,
    gaps: BTreeSet<CellIndex>,
    diagnostics: Option<Rc<RefCell<Diagnostics>>>,
}

impl Allocator {
    pub fn new() -> Allocator {
        Allocator { next_free: 0, gaps: BTreeSet::new(), diagnostics: None }
    }

    /// Attaches a shared diagnostics sink; every subsequent `allocate`
    /// and `free` also records a structured `Event` to it. Shared
    /// (rather than owned) so the same timeline can interleave events
    /// from the `Emitter` this allocator's caller is also driving.
    pub fn with_diagnostics(mut self, diagnostics: Rc<RefCell<Diagnostics>>) -> Allocator {
        self.diagnostics = Some(diagnostics);
        self
    }

    /// Returns a cell index not currently live, preferring the
    /// smallest previously-freed gap over growing the tape.
    pub fn allocate(&mut self) -> CellIndex {
        let index = if let Some(&gap) = self.gaps.iter().next() {
            self.gaps.remove(&gap);
            gap
        } else {
            let index = self.next_free;
            self.next_free += 1;
            index
        };
        trace!("allocator: allocate -> {}", index);
        if let Some(diag) = &self.diagnostics {
            diag.borrow_mut().record(Event::Allocate { cell: index });
        }
        index
    }

    /// Releases `index` back to the allocator. If it was the
    /// high-water cell, shrinks `next_free`; otherwise records it as
    /// a gap for a future `allocate` to reuse.
    ///
    /// Panics if `index` is not currently live: a double-free here is
    /// a compiler bug, not a user-facing fault.
    pub fn free(&mut self, index: CellIndex) {
        assert!(
            index < self.next_free && !self.gaps.contains(&index),
            "double free of cell {}",
            index
        );
        if index + 1 == self.next_free {
            self.next_free -= 1;
            // Freeing the high-water cell may make previously-isolated
            // gaps adjacent to the new high-water mark; shrink through
            // any run of trailing gaps too, so the tape stays packed.
            while self.next_free > 0 && self.gaps.remove(&(self.next_free - 1)) {
                self.next_free -= 1;
            }
        } else {
            self.gaps.insert(index);
        }
        trace!("allocator: free {}", index);
        if let Some(diag) = &self.diagnostics {
            diag.borrow_mut().record(Event::Free { cell: index });
        }
    }

    /// True if `index` is currently live (used by tests and by the
    /// allocator-injectivity property: no two live values ever alias a cell).
    pub fn is_live(&self, index: CellIndex) -> bool {
        index < self.next_free && !self.gaps.contains(&index)
    }

    /// The number of cells ever allocated that are still live.
    pub fn live_count(&self) -> usize {
        self.next_free - self.gaps.len()
    }
}
