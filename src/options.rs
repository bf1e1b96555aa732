// Compiler options.
//
// The core has no on-disk configuration format to parse (it is a
// pure function of an AST plus an intrinsic table), but one
// allocation-policy question is left open: whether a cell recycled
// from a gap is zeroed eagerly when it is freed, or left for whoever
// allocates it next to zero on demand.

/// Tunables for the compiler's allocation policy.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CompilerOptions {
    /// When true (the default, and the documented preference),
    /// `Value::free` emits `[-]` at a `Byte`'s cell before reclaiming
    /// its index, so a later `allocate` of that index is guaranteed
    /// to see zero. When false, the cost is pushed onto callers that
    /// need a guaranteed-zero cell (`Byte::copy`'s two temporaries).
    pub zero_on_free: bool,
}

impl Default for CompilerOptions {
    fn default() -> CompilerOptions {
        CompilerOptions { zero_on_free: true }
    }
}
