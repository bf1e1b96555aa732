// End-to-end scenarios: hand-built ASTs, compiled with the public
// driver, run through the tape simulator in `tests/common`, checked
// against the exact stdout bytes the source program should produce.

mod common;

use common::Simulator;
use tapecc::ast::{Code, Expr, Function, Program, Statement};
use tapecc::value::TypeSpec;

fn byte(name: &str) -> Statement {
    Statement::Declaration(TypeSpec::Byte, name.to_string())
}

fn call(name: &str, args: Vec<Expr>) -> Expr {
    Expr::Call(name.to_string(), args)
}

fn get(name: &str) -> Expr {
    Expr::Get(name.to_string())
}

fn main_with(body: Vec<Statement>) -> Program {
    Program::new(vec![Function {
        name: "main".to_string(),
        params: vec![],
        body: Code::new(body),
        return_expr: None,
    }])
}

fn run(program: &Program, input: &[u8]) -> Vec<u8> {
    let emitted = tapecc::compile(program).expect("compilation should succeed");
    let mut sim = Simulator::new(input.iter().copied());
    sim.run(&emitted);
    sim.output
}

// `main() { write(read()); }`
#[test]
fn echo_one_byte() {
    let program = main_with(vec![Statement::Expr(call("write", vec![call("read", vec![])]))]);
    assert_eq!(run(&program, &[0x41]), vec![0x41]);
}

// `main() { byte a; byte b; a = read(); b = read(); a += b; write(a); }`
#[test]
fn add_two() {
    let program = main_with(vec![
        byte("a"),
        byte("b"),
        Statement::Expr(call("=", vec![get("a"), call("read", vec![])])),
        Statement::Expr(call("=", vec![get("b"), call("read", vec![])])),
        Statement::Expr(call("+=", vec![get("a"), get("b")])),
        Statement::Expr(call("write", vec![get("a")])),
    ]);
    assert_eq!(run(&program, &[0x03, 0x04]), vec![0x07]);
}

// `main() { byte n; n = read(); while (n) { write(n); --n; } }`
#[test]
fn countdown() {
    let program = main_with(vec![
        byte("n"),
        Statement::Expr(call("=", vec![get("n"), call("read", vec![])])),
        Statement::While(
            get("n"),
            Code::new(vec![
                Statement::Expr(call("write", vec![get("n")])),
                Statement::Expr(call("--", vec![get("n")])),
            ]),
        ),
    ]);
    assert_eq!(run(&program, &[0x03]), vec![0x03, 0x02, 0x01]);
}

// `main() { byte a; byte b; a = read(); b = read(); byte eq; eq = (a == b); write(eq); }`
#[test]
fn equality_true() {
    let program = main_with(vec![
        byte("a"),
        byte("b"),
        Statement::Expr(call("=", vec![get("a"), call("read", vec![])])),
        Statement::Expr(call("=", vec![get("b"), call("read", vec![])])),
        byte("eq"),
        Statement::Expr(call("=", vec![get("eq"), call("==", vec![get("a"), get("b")])])),
        Statement::Expr(call("write", vec![get("eq")])),
    ]);
    assert_eq!(run(&program, &[5, 5]), vec![1]);
}

#[test]
fn equality_false() {
    let program = main_with(vec![
        byte("a"),
        byte("b"),
        Statement::Expr(call("=", vec![get("a"), call("read", vec![])])),
        Statement::Expr(call("=", vec![get("b"), call("read", vec![])])),
        byte("eq"),
        Statement::Expr(call("=", vec![get("eq"), call("==", vec![get("a"), get("b")])])),
        Statement::Expr(call("write", vec![get("eq")])),
    ]);
    assert_eq!(run(&program, &[5, 6]), vec![0]);
}

// `main() { byte x; x += 6; x *= 7; write(x); }`
#[test]
fn multiply_by_constant() {
    let program = main_with(vec![
        byte("x"),
        Statement::Expr(call("+=", vec![get("x"), Expr::Int(6)])),
        Statement::Expr(call("*=", vec![get("x"), Expr::Int(7)])),
        Statement::Expr(call("write", vec![get("x")])),
    ]);
    assert_eq!(run(&program, &[]), vec![0x2A]);
}

#[test]
fn not_flips_zero_and_nonzero() {
    let program = main_with(vec![
        byte("x"),
        Statement::Expr(call("=", vec![get("x"), Expr::Int(0)])),
        byte("y"),
        Statement::Expr(call("=", vec![get("y"), call("!", vec![get("x")])])),
        Statement::Expr(call("write", vec![get("y")])),
    ]);
    assert_eq!(run(&program, &[]), vec![1]);

    let program = main_with(vec![
        byte("x"),
        Statement::Expr(call("=", vec![get("x"), Expr::Int(5)])),
        byte("y"),
        Statement::Expr(call("=", vec![get("y"), call("!", vec![get("x")])])),
        Statement::Expr(call("write", vec![get("y")])),
    ]);
    assert_eq!(run(&program, &[]), vec![0]);
}

#[test]
fn copy_preserves_source_across_a_consuming_op() {
    // `byte a; a = read(); byte b; b = copy(a); a += 1; write(a); write(b);`
    let program = main_with(vec![
        byte("a"),
        Statement::Expr(call("=", vec![get("a"), call("read", vec![])])),
        byte("b"),
        Statement::Expr(call("=", vec![get("b"), Expr::Copy(Box::new(get("a")))])),
        Statement::Expr(call("+=", vec![get("a"), Expr::Int(1)])),
        Statement::Expr(call("write", vec![get("a")])),
        Statement::Expr(call("write", vec![get("b")])),
    ]);
    assert_eq!(run(&program, &[10]), vec![11, 10]);
}

#[test]
fn list_literal_indexing_is_compile_time_only() {
    // `byte x; x = [10, 20, 30][2]; write(x);`
    let program = main_with(vec![
        byte("x"),
        Statement::Expr(call(
            "=",
            vec![
                get("x"),
                Expr::Getitem(
                    Box::new(Expr::List(vec![Expr::Int(10), Expr::Int(20), Expr::Int(30)])),
                    2,
                ),
            ],
        )),
        Statement::Expr(call("write", vec![get("x")])),
    ]);
    assert_eq!(run(&program, &[]), vec![30]);
}

#[test]
fn byte_wraps_modulo_256_on_overflow() {
    // `byte x; x += 255; x += 1; write(x);` wraps back to 0.
    let program = main_with(vec![
        byte("x"),
        Statement::Expr(call("+=", vec![get("x"), Expr::Int(255)])),
        Statement::Expr(call("+=", vec![get("x"), Expr::Int(1)])),
        Statement::Expr(call("write", vec![get("x")])),
    ]);
    assert_eq!(run(&program, &[]), vec![0]);
}
