// Copyright (C) 2019  Brandon Lewis
//
// This program is free software: you can redistribute it and/or
// modify it under the terms of the GNU Lesser General Public License
// as published by the Free Software Foundation, either version 3 of
// the License, or (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the GNU
// Lesser General Public License for more details.
//
// You should have received a copy of the GNU Lesser General Public
// License along with this program.  If not, see
// <https://www.gnu.org/licenses/>.

//! Demo binary: hand-builds the "countdown" program from a handful of
//! AST nodes (this crate has no parser; feeding it source text isn't
//! one of its operations) and prints the target program it compiles
//! to.
//!
//! `main() { byte n; n = read(); while (n) { write(n); --n; } }`

use tapecc::ast::{Code, Expr, Function, Program, Statement};
use tapecc::value::TypeSpec;

fn countdown() -> Program {
    Program::new(vec![Function {
        name: "main".to_string(),
        params: vec![],
        body: Code::new(vec![
            Statement::Declaration(TypeSpec::Byte, "n".to_string()),
            Statement::Expr(Expr::Call(
                "=".to_string(),
                vec![Expr::Get("n".to_string()), Expr::Call("read".to_string(), vec![])],
            )),
            Statement::While(
                Expr::Get("n".to_string()),
                Code::new(vec![
                    Statement::Expr(Expr::Call(
                        "write".to_string(),
                        vec![Expr::Get("n".to_string())],
                    )),
                    Statement::Expr(Expr::Call("--".to_string(), vec![Expr::Get("n".to_string())])),
                ]),
            ),
        ]),
        return_expr: None,
    }])
}

fn main() {
    let program = countdown();
    match tapecc::compile(&program) {
        Ok(emitted) => println!("{}", emitted),
        Err(fault) => {
            eprintln!("compilation failed: {}", fault);
            std::process::exit(1);
        }
    }
}
