// Value & type model.
//
// `Type` is the identity used for intrinsic-key matching and
// type-mismatch checks: two types are equal iff their variants match
// and, recursively, their element types match. List *sizes* are
// deliberately not part of `Type` (list sizes do not enter type
// identity, but list constructors know their fixed size), so the size
// lives on `TypeSpec`, the declaration-time descriptor that knows how
// to build a fresh `Value` of a given shape.

use crate::allocator::{Allocator, CellIndex};
use crate::emitter::Emitter;
use crate::error::Result;
use crate::options::CompilerOptions;

/// Type identity, used for intrinsic dispatch keys and type checks.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Type {
    Byte,
    List(Box<Type>),
    VirtualInteger,
    VirtualList,
}

/// A declaration-time type descriptor: everything `TypeSpec::new_value`
/// needs to construct a fresh `Value`, including list size (which is
/// not part of `Type` identity).
#[derive(Clone, Debug)]
pub enum TypeSpec {
    Byte,
    List(Box<TypeSpec>, usize),
    VirtualInteger,
    VirtualList,
}

impl TypeSpec {
    /// The `Type` this descriptor's constructed values carry.
    pub fn identity(&self) -> Type {
        match self {
            TypeSpec::Byte => Type::Byte,
            TypeSpec::List(elem, _) => Type::List(Box::new(elem.identity())),
            TypeSpec::VirtualInteger => Type::VirtualInteger,
            TypeSpec::VirtualList => Type::VirtualList,
        }
    }

    /// The `new()` contract: a fresh value of this
    /// type. For `Byte`, allocates one tape cell; for `List`,
    /// recursively `new`s `size` elements.
    pub fn new_value(&self, alloc: &mut Allocator) -> Value {
        match self {
            TypeSpec::Byte => Value::Byte(alloc.allocate()),
            TypeSpec::List(elem, size) => {
                let items = (0..*size).map(|_| elem.new_value(alloc)).collect();
                Value::List(elem.identity(), items)
            }
            TypeSpec::VirtualInteger => Value::VirtualInteger(0),
            TypeSpec::VirtualList => Value::VirtualList(Vec::new()),
        }
    }
}

/// A runtime value, tagged by which kind of storage backs it.
///
/// `PartialEq` here is structural equality on the Rust representation
/// (useful for asserting on `VirtualInteger`/`VirtualList` in tests);
/// it does *not* model the "copy produces an equal value"
/// contract for `Byte`, since two `Byte`s naming different cells are
/// never the same value by this derive even when the cells hold the
/// same runtime content.
#[derive(Clone, Debug, PartialEq)]
pub enum Value {
    Byte(CellIndex),
    List(Type, Vec<Value>),
    VirtualInteger(i64),
    VirtualList(Vec<Value>),
}

impl Value {
    pub fn type_of(&self) -> Type {
        match self {
            Value::Byte(_) => Type::Byte,
            Value::List(elem, _) => Type::List(Box::new(elem.clone())),
            Value::VirtualInteger(_) => Type::VirtualInteger,
            Value::VirtualList(_) => Type::VirtualList,
        }
    }

    /// `Byte.copy`: the canonical "copy via temporary".
    /// For virtual values, clones the compile-time payload at no
    /// tape cost.
    pub fn copy(&self, alloc: &mut Allocator, emitter: &mut Emitter, opts: &CompilerOptions) -> Result<Value> {
        match self {
            Value::Byte(src) => {
                let a1 = alloc.allocate();
                let a2 = alloc.allocate();
                if !opts.zero_on_free {
                    emitter.zero(a1);
                    emitter.zero(a2);
                }
                emitter.move_cell(*src, &[a1, a2], 1)?;
                emitter.move_cell(a2, &[*src], 1)?;
                alloc.free(a2);
                Ok(Value::Byte(a1))
            }
            Value::List(elem_ty, items) => {
                let copied: Vec<Value> = items
                    .iter()
                    .map(|item| item.copy(alloc, emitter, opts))
                    .collect::<Result<_>>()?;
                Ok(Value::List(elem_ty.clone(), copied))
            }
            Value::VirtualInteger(n) => Ok(Value::VirtualInteger(*n)),
            Value::VirtualList(items) => Ok(Value::VirtualList(items.clone())),
        }
    }

    /// `Byte.free` / `List.free`: releases any owned cells.
    /// A no-op for virtual values, which own no tape storage. Honors
    /// `CompilerOptions::zero_on_free` by zeroing a `Byte`
    /// cell before reclaiming its index, so a later `allocate` of the
    /// same index sees zero without every `new` site having to guard
    /// against stale content.
    pub fn free(self, alloc: &mut Allocator, emitter: &mut Emitter, opts: &CompilerOptions) {
        match self {
            Value::Byte(idx) => {
                if opts.zero_on_free {
                    emitter.zero(idx);
                }
                alloc.free(idx);
            }
            Value::List(_, items) => {
                for item in items {
                    item.free(alloc, emitter, opts);
                }
            }
            Value::VirtualInteger(_) | Value::VirtualList(_) => {}
        }
    }
}
