// Fatal compiler faults. There are no recoverable errors:
// the compiler either succeeds and returns the emitted program, or
// raises one of these and compilation stops. Plain hand-rolled enum
// with manual `Display`/`std::error::Error` impls, matching the way
// this corpus's own parser crates model errors rather than reaching
// for a derive-macro error crate.

use std::fmt;

use crate::allocator::CellIndex;
use crate::value::Type;

#[derive(Clone, Debug, PartialEq)]
pub enum CompileFault {
    /// A loop body left the predicted head at a different index than
    /// it entered.
    UnbalancedLoop { entry: CellIndex, exit: CellIndex },
    /// A function call's `(name, type-tuple)` is not in the intrinsic
    /// table.
    UnknownIntrinsic { name: String, args: Vec<Type> },
    /// A `Get` names an identifier unbound in the current environment.
    UnknownVariable { name: String },
    /// A `Getitem` index is out of bounds, or not a compile-time
    /// integer.
    IndexOutOfRange { index: i64, len: usize },
    /// A context (e.g. an `if`/`while` condition) required one type
    /// but received another.
    TypeMismatch { expected: Type, got: Type },
}

pub type Result<T> = std::result::Result<T, CompileFault>;

impl fmt::Display for CompileFault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CompileFault::UnbalancedLoop { entry, exit } => write!(
                f,
                "unbalanced loop: entered at cell {}, left head at cell {}",
                entry, exit
            ),
            CompileFault::UnknownIntrinsic { name, args } => write!(
                f,
                "no intrinsic `{}` for argument types {:?}",
                name, args
            ),
            CompileFault::UnknownVariable { name } => {
                write!(f, "unbound variable `{}`", name)
            }
            CompileFault::IndexOutOfRange { index, len } => write!(
                f,
                "index {} out of range for a list of length {}",
                index, len
            ),
            CompileFault::TypeMismatch { expected, got } => write!(
                f,
                "expected a value of type {:?}, got {:?}",
                expected, got
            ),
        }
    }
}

impl std::error::Error for CompileFault {}
