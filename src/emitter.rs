// Head-tracking emitter: the single sink of all target characters.
//
// The emitter never *decides* what to emit (that's the allocator's
// and intrinsic table's job); it just appends characters and keeps
// `head` an exact prediction of where the runtime tape pointer sits
// after the last emitted character. Every other component in this
// crate talks to the tape only through here.

use std::cell::RefCell;
use std::rc::Rc;

use crate::allocator::CellIndex;
use crate::diagnostics::{Diagnostics, Event};
use crate::error::{CompileFault, Result};
use crate::util::trace;

/// The alphabet of the target tape machine.
const ALPHABET: &[char] = &['+', '-', '<', '>', '[', ']', '.', ','];

/// Appends target characters and tracks the predicted head position.
#[derive(Debug, Default, Clone)]
pub struct Emitter {
    program: String,
    head: CellIndex,
    diagnostics: Option<Rc<RefCell<Diagnostics>>>,
}

impl Emitter {
    pub fn new() -> Emitter {
        Emitter { program: String::new(), head: 0, diagnostics: None }
    }

    /// Attaches a shared diagnostics sink (see `Allocator::with_diagnostics`);
    /// every subsequent `goto`, `open_loop` and `close_loop` also
    /// records a structured `Event` to it.
    pub fn with_diagnostics(mut self, diagnostics: Rc<RefCell<Diagnostics>>) -> Emitter {
        self.diagnostics = Some(diagnostics);
        self
    }

    /// The compiler's current prediction of the runtime head position.
    pub fn head(&self) -> CellIndex {
        self.head
    }

    /// The emitted program so far, as a borrowed slice.
    pub fn program(&self) -> &str {
        &self.program
    }

    /// Consumes the emitter, returning the finished program.
    pub fn into_program(self) -> String {
        self.program
    }

    /// Appends `chars` verbatim. Every character must be drawn from
    /// the target alphabet; `head` is left untouched. Callers that
    /// move the head (`goto`, `move_cell`) are responsible for
    /// updating it themselves.
    ///
    /// Debug assertion only: malformed alphabet use is a compiler bug,
    /// not a user-facing fault, so it panics rather than returning a
    /// `CompileFault`.
    pub fn emit(&mut self, chars: &str) {
        debug_assert!(
            chars.chars().all(|c| ALPHABET.contains(&c)),
            "emitted character outside the target alphabet: {:?}",
            chars
        );
        self.program.push_str(chars);
    }

    /// Moves the predicted head to `target`, emitting the run of `>`
    /// or `<` needed to get there. No-op (emits nothing) if already
    /// at `target`.
    pub fn goto(&mut self, target: CellIndex) {
        let from = self.head;
        if target > self.head {
            let steps = target - self.head;
            self.emit(&">".repeat(steps));
        } else if target < self.head {
            let steps = self.head - target;
            self.emit(&"<".repeat(steps));
        }
        trace!("emitter: goto {} -> {}", self.head, target);
        self.head = target;
        if let Some(diag) = &self.diagnostics {
            diag.borrow_mut().record(Event::Goto { from, to: target });
        }
    }

    /// Zeroes the cell at `index` with the canonical `[-]` idiom,
    /// leaving the head at `index`.
    pub fn zero(&mut self, index: CellIndex) {
        self.goto(index);
        self.loop_(|e| {
            e.emit("-");
            Ok(())
        }).expect("zeroing loop cannot be unbalanced");
    }

    /// The canonical destructive-move idiom: drains `src` into each of
    /// `dsts` (in order), `multiplier` times per source unit, leaving
    /// `src` at zero and the head back at `src`.
    ///
    /// `src` must not appear in `dsts`. Draining a cell into itself
    /// is not representable by this idiom and would panic via the
    /// debug assertion below rather than silently corrupt the tape.
    pub fn move_cell(&mut self, src: CellIndex, dsts: &[CellIndex], multiplier: u32) -> Result<()> {
        debug_assert!(!dsts.contains(&src), "move_cell: src {} appears in dsts", src);
        self.goto(src);
        self.loop_(|e| {
            e.emit("-");
            for &dst in dsts {
                e.goto(dst);
                e.emit(&"+".repeat(multiplier as usize));
            }
            e.goto(src);
            Ok(())
        })
    }

    /// Emits `[` and returns the head at which it was opened, the value
    /// a later `close_loop` call must see reproduced on exit. Exposed
    /// as a primitive (alongside `close_loop`) for callers that need to
    /// run a scoped loop body against more context than a bare
    /// `&mut Emitter`. The AST evaluator's `if`/`while` bodies also
    /// need the allocator, environment and intrinsic table in scope,
    /// which rules out capturing them in a closure passed to `loop_`.
    pub fn open_loop(&mut self) -> CellIndex {
        self.emit("[");
        trace!("emitter: loop open at {}", self.head);
        if let Some(diag) = &self.diagnostics {
            diag.borrow_mut().record(Event::LoopOpen { head: self.head });
        }
        self.head
    }

    /// Emits `]` and checks that the head has returned to `entry`. A
    /// mismatch is `CompileFault::UnbalancedLoop`: the target machine
    /// has no way to recover a data-dependent head position, so the
    /// compiler can no longer reason about any code emitted after an
    /// unbalanced loop.
    pub fn close_loop(&mut self, entry: CellIndex) -> Result<()> {
        let exit = self.head;
        self.emit("]");
        trace!("emitter: loop close, entry {} exit {}", entry, exit);
        if let Some(diag) = &self.diagnostics {
            diag.borrow_mut().record(Event::LoopClose { head: exit });
        }
        if entry != exit {
            return Err(CompileFault::UnbalancedLoop { entry, exit });
        }
        Ok(())
    }

    /// Convenience wrapper over `open_loop`/`close_loop` for a body that
    /// only needs the emitter itself.
    pub fn loop_<F>(&mut self, body: F) -> Result<()>
    where
        F: FnOnce(&mut Emitter) -> Result<()>,
    {
        let entry = self.open_loop();
        body(self)?;
        self.close_loop(entry)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn goto_moves_right_and_left() {
        let mut e = Emitter::new();
        e.goto(3);
        assert_eq!(e.program(), ">>>");
        assert_eq!(e.head(), 3);
        e.goto(1);
        assert_eq!(e.program(), ">>><<");
        assert_eq!(e.head(), 1);
    }

    #[test]
    fn goto_same_cell_is_noop() {
        let mut e = Emitter::new();
        e.goto(2);
        let before = e.program().to_string();
        e.goto(2);
        assert_eq!(e.program(), before);
    }

    #[test]
    fn loop_balances_head() {
        let mut e = Emitter::new();
        e.goto(0);
        let result = e.loop_(|e| {
            e.emit("-");
            Ok(())
        });
        assert!(result.is_ok());
        assert_eq!(e.program(), "[-]");
    }

    #[test]
    fn loop_detects_imbalance() {
        let mut e = Emitter::new();
        let result = e.loop_(|e| {
            e.goto(1);
            Ok(())
        });
        assert!(matches!(result, Err(CompileFault::UnbalancedLoop { entry: 0, exit: 1 })));
    }

    #[test]
    fn move_cell_drains_into_destinations() {
        let mut e = Emitter::new();
        e.move_cell(0, &[1, 2], 1).unwrap();
        assert_eq!(e.program(), "[->+>+<<]");
        assert_eq!(e.head(), 0);
    }

    #[test]
    fn move_cell_applies_multiplier() {
        let mut e = Emitter::new();
        e.move_cell(0, &[1], 3).unwrap();
        assert_eq!(e.program(), "[->+++<]");
    }
}
