// Compilation driver: the one public entry point that ties every
// component together. Given a `Program`, it locates `main`, evaluates
// its body against a fresh allocator, emitter and environment, and
// returns the finished target-language text.

use std::cell::RefCell;
use std::rc::Rc;

use crate::allocator::Allocator;
use crate::ast::Program;
use crate::diagnostics::Diagnostics;
use crate::emitter::Emitter;
use crate::env::Environment;
use crate::error::{CompileFault, Result};
use crate::eval::{eval_code, Ctx};
use crate::intrinsics::IntrinsicTable;
use crate::options::CompilerOptions;

/// Compiles `program` with the default intrinsic table and options.
pub fn compile(program: &Program) -> Result<String> {
    compile_with(program, &IntrinsicTable::with_builtins(), &CompilerOptions::default())
}

/// Compiles `program`, letting the caller supply its own intrinsic
/// table (e.g. with extra routines registered) and allocation policy.
pub fn compile_with(
    program: &Program,
    intrinsics: &IntrinsicTable,
    opts: &CompilerOptions,
) -> Result<String> {
    let mut alloc = Allocator::new();
    let mut emitter = Emitter::new();
    run(program, intrinsics, opts, &mut alloc, &mut emitter)
}

/// Compiles `program` exactly like `compile_with`, additionally
/// returning the full structured `Diagnostics` timeline of every
/// allocate/free/goto/loop event the compilation performed, in order.
/// Meant for tests that want to assert on compiler bookkeeping
/// directly rather than re-deriving it from the emitted characters.
pub fn compile_with_diagnostics(
    program: &Program,
    intrinsics: &IntrinsicTable,
    opts: &CompilerOptions,
) -> Result<(String, Diagnostics)> {
    let diagnostics = Rc::new(RefCell::new(Diagnostics::new()));
    let mut alloc = Allocator::new().with_diagnostics(diagnostics.clone());
    let mut emitter = Emitter::new().with_diagnostics(diagnostics.clone());
    let program_text = run(program, intrinsics, opts, &mut alloc, &mut emitter)?;
    // `alloc` and `emitter` each hold their own clone of the `Rc`; drop
    // both explicitly so the sink below is the last handle standing.
    drop(alloc);
    drop(emitter);
    let diagnostics = Rc::try_unwrap(diagnostics)
        .expect("no other diagnostics handle outlives a finished compilation")
        .into_inner();
    Ok((program_text, diagnostics))
}

fn run(
    program: &Program,
    intrinsics: &IntrinsicTable,
    opts: &CompilerOptions,
    alloc: &mut Allocator,
    emitter: &mut Emitter,
) -> Result<String> {
    let main = program
        .find("main")
        .ok_or_else(|| CompileFault::UnknownVariable { name: "main".to_string() })?;

    let mut env = Environment::new();
    let mut ctx = Ctx { alloc, emitter, intrinsics, program, opts };
    eval_code(&mut ctx, &mut env, &main.body)?;

    Ok(emitter.program().to_string())
}
