// AST evaluator: walks declarations, expressions and control flow,
// driving the allocator, emitter and intrinsic table as it goes. This
// is the one place that ties components together; everything it
// touches (`Allocator`, `Emitter`, `IntrinsicTable`, `Environment`,
// `Value`) is otherwise self-contained.

use crate::allocator::{Allocator, CellIndex};
use crate::ast::{Code, Expr, Function, Program, Statement};
use crate::emitter::Emitter;
use crate::env::Environment;
use crate::error::{CompileFault, Result};
use crate::intrinsics::IntrinsicTable;
use crate::options::CompilerOptions;
use crate::value::{Type, Value};

/// Everything a call to `eval_*` needs besides the statement/expression
/// it's evaluating and the environment it's evaluating it in. Bundled
/// so adding a new piece of shared context doesn't mean threading one
/// more parameter through every function in this module.
pub struct Ctx<'a> {
    pub alloc: &'a mut Allocator,
    pub emitter: &'a mut Emitter,
    pub intrinsics: &'a IntrinsicTable,
    pub program: &'a Program,
    pub opts: &'a CompilerOptions,
}

/// Runs `code` statement by statement against `env`.
pub fn eval_code(ctx: &mut Ctx, env: &mut Environment, code: &Code) -> Result<()> {
    for stmt in &code.0 {
        eval_statement(ctx, env, stmt)?;
    }
    Ok(())
}

fn eval_statement(ctx: &mut Ctx, env: &mut Environment, stmt: &Statement) -> Result<()> {
    match stmt {
        Statement::Declaration(type_spec, name) => {
            let value = type_spec.new_value(ctx.alloc);
            env.declare(name, value);
            Ok(())
        }
        Statement::Expr(expr) => {
            // Evaluated for effect: a void call result is simply
            // dropped, and a non-void one (e.g. a bare `x + 1;`) is
            // discarded too, same as the source language allows.
            eval_expr_opt(ctx, env, expr)?;
            Ok(())
        }
        Statement::If(cond, body) => eval_if(ctx, env, cond, body),
        Statement::While(cond, body) => eval_while(ctx, env, cond, body),
    }
}

/// `if (cond) { body }`: goto the condition's cell, open a loop, run
/// the body, return to the condition's cell, zero it (so the loop
/// fires at most once), and close. The zero is what turns the loop
/// into a one-shot `if`.
fn eval_if(ctx: &mut Ctx, env: &mut Environment, cond: &Expr, body: &Code) -> Result<()> {
    let cond_cell = eval_condition_cell(ctx, env, cond)?;
    ctx.emitter.goto(cond_cell);
    let entry = ctx.emitter.open_loop();
    eval_code(ctx, env, body)?;
    ctx.emitter.goto(cond_cell);
    ctx.emitter.zero(cond_cell);
    ctx.emitter.close_loop(entry)
}

/// `while (cond) { body }`: the condition is re-evaluated after every
/// iteration of the body, and the loop only closes cleanly if that
/// re-evaluation lands back on the same cell the loop opened at. In
/// practice this means the condition expression must alias the same
/// variable every time (e.g. `Get("n")`), not allocate a fresh cell.
/// A condition that can't satisfy that surfaces as `UnbalancedLoop`,
/// which is the correct diagnosis: the target machine has no way to
/// express "come back to a data-dependent cell".
fn eval_while(ctx: &mut Ctx, env: &mut Environment, cond: &Expr, body: &Code) -> Result<()> {
    let entry_cell = eval_condition_cell(ctx, env, cond)?;
    ctx.emitter.goto(entry_cell);
    let entry = ctx.emitter.open_loop();
    eval_code(ctx, env, body)?;
    let exit_cell = eval_condition_cell(ctx, env, cond)?;
    ctx.emitter.goto(exit_cell);
    ctx.emitter.close_loop(entry)
}

fn eval_condition_cell(ctx: &mut Ctx, env: &mut Environment, cond: &Expr) -> Result<CellIndex> {
    match eval_expr(ctx, env, cond)? {
        Value::Byte(cell) => Ok(cell),
        other => Err(CompileFault::TypeMismatch { expected: Type::Byte, got: other.type_of() }),
    }
}

/// Evaluates `expr` to a `Value`, requiring one. Used everywhere
/// except a bare expression statement, which is the only context that
/// tolerates a void call result.
fn eval_expr(ctx: &mut Ctx, env: &mut Environment, expr: &Expr) -> Result<Value> {
    match expr {
        Expr::Call(name, arg_exprs) => match eval_call(ctx, env, name, arg_exprs)? {
            Some(value) => Ok(value),
            None => panic!("`{}` returned no value but was used where one is required", name),
        },
        other => eval_expr_opt(ctx, env, other).map(|v| v.expect("non-Call expressions always produce a value")),
    }
}

/// Evaluates `expr`, tolerating a void result (only `Expr::Call` can
/// produce one).
fn eval_expr_opt(ctx: &mut Ctx, env: &mut Environment, expr: &Expr) -> Result<Option<Value>> {
    match expr {
        Expr::Int(n) => Ok(Some(Value::VirtualInteger(*n))),
        Expr::List(items) => {
            let values =
                items.iter().map(|item| eval_expr(ctx, env, item)).collect::<Result<Vec<_>>>()?;
            Ok(Some(Value::VirtualList(values)))
        }
        Expr::Get(name) => env.get(name).map(Some),
        Expr::Getitem(inner, index) => {
            let base = eval_expr(ctx, env, inner)?;
            let items = match base {
                Value::List(_, items) => items,
                Value::VirtualList(items) => items,
                other => {
                    return Err(CompileFault::TypeMismatch {
                        expected: Type::VirtualList,
                        got: other.type_of(),
                    })
                }
            };
            if *index < 0 || *index as usize >= items.len() {
                return Err(CompileFault::IndexOutOfRange { index: *index, len: items.len() });
            }
            Ok(Some(items[*index as usize].clone()))
        }
        Expr::Copy(inner) => {
            let value = eval_expr(ctx, env, inner)?;
            value.copy(ctx.alloc, ctx.emitter, ctx.opts).map(Some)
        }
        Expr::Call(name, arg_exprs) => eval_call(ctx, env, name, arg_exprs),
    }
}

/// Evaluates `name(arg_exprs...)`: arguments left-to-right, then
/// dispatch by exact `(name, arg types)` match. A user-defined function
/// in the program with a matching signature takes priority over a
/// built-in of the same name. Shadowing a builtin this way is
/// intentional, mirroring `IntrinsicTable::register`'s own override
/// behavior.
fn eval_call(
    ctx: &mut Ctx,
    env: &mut Environment,
    name: &str,
    arg_exprs: &[Expr],
) -> Result<Option<Value>> {
    let args = arg_exprs.iter().map(|a| eval_expr(ctx, env, a)).collect::<Result<Vec<_>>>()?;
    let arg_types: Vec<Type> = args.iter().map(Value::type_of).collect();

    if let Some(function) = ctx.program.functions.iter().find(|f| {
        f.name == name && f.params.iter().map(|(t, _)| t.identity()).collect::<Vec<_>>() == arg_types
    }) {
        call_function(ctx, function, args)
    } else {
        ctx.intrinsics.call(name, args, ctx.alloc, ctx.emitter, ctx.opts)
    }
}

/// Invokes a user-defined function: a fresh, non-chaining environment
/// with each parameter bound to its argument, the body run against it,
/// then the optional return expression evaluated in that same
/// environment. Cells the body declares and never frees simply stay
/// allocated: the source language has no automatic scope-exit
/// deallocation, only the explicit `free` a `Value` owner chooses to
/// call.
fn call_function(ctx: &mut Ctx, function: &Function, args: Vec<Value>) -> Result<Option<Value>> {
    let mut call_env = Environment::new();
    for ((_, param_name), value) in function.params.iter().zip(args) {
        call_env.declare(param_name, value);
    }
    eval_code(ctx, &mut call_env, &function.body)?;
    match &function.return_expr {
        Some(expr) => eval_expr(ctx, &mut call_env, expr).map(Some),
        None => Ok(None),
    }
}
