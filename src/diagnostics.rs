// Structured, opt-in trace of allocator/emitter bookkeeping events.
//
// `util::trace!` gives a human a line of `println!` output under a
// debug build; this is the same information captured as data instead,
// so a test can assert on the exact allocate/free/goto/loop timeline
// of a compilation rather than just its final character output.
// Independent of the emitted program: a `Diagnostics` is never
// consulted by the compiler itself, only produced alongside it.

use serde::{Deserialize, Serialize};

use crate::allocator::CellIndex;

/// One bookkeeping event, in the order the compiler performed it.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum Event {
    Allocate { cell: CellIndex },
    Free { cell: CellIndex },
    Goto { from: CellIndex, to: CellIndex },
    LoopOpen { head: CellIndex },
    LoopClose { head: CellIndex },
}

/// An accumulated, time-ordered timeline of `Event`s.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Diagnostics {
    events: Vec<Event>,
}

impl Diagnostics {
    pub fn new() -> Diagnostics {
        Diagnostics { events: Vec::new() }
    }

    pub fn record(&mut self, event: Event) {
        self.events.push(event);
    }

    pub fn events(&self) -> &[Event] {
        &self.events
    }

    /// The net allocate/free count. Zero once every variable a
    /// compilation declared has gone out of scope and been freed;
    /// strictly positive for a program that leaks a cell (e.g. `!`,
    /// whose operand is zeroed in place but never returned to the
    /// allocator).
    pub fn live_cell_balance(&self) -> i64 {
        self.events
            .iter()
            .map(|e| match e {
                Event::Allocate { .. } => 1,
                Event::Free { .. } => -1,
                _ => 0,
            })
            .sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn records_events_in_order() {
        let mut d = Diagnostics::new();
        d.record(Event::Allocate { cell: 0 });
        d.record(Event::Goto { from: 0, to: 3 });
        d.record(Event::Free { cell: 0 });
        assert_eq!(
            d.events(),
            &[
                Event::Allocate { cell: 0 },
                Event::Goto { from: 0, to: 3 },
                Event::Free { cell: 0 },
            ]
        );
    }

    #[test]
    fn live_cell_balance_tracks_net_allocations() {
        let mut d = Diagnostics::new();
        d.record(Event::Allocate { cell: 0 });
        d.record(Event::Allocate { cell: 1 });
        d.record(Event::Free { cell: 0 });
        assert_eq!(d.live_cell_balance(), 1);
    }
}
