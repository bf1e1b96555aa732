// tapecc: a compiler from a small C-like source language to a minimal
// tape-machine target language.
//
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

extern crate serde;
#[macro_use]
extern crate lazy_static;

#[macro_use]
pub mod util;

pub mod allocator;
pub mod ast;
pub mod diagnostics;
pub mod driver;
pub mod emitter;
pub mod env;
pub mod error;
pub mod eval;
pub mod intrinsics;
pub mod options;
pub mod value;

pub use driver::{compile, compile_with, compile_with_diagnostics};
pub use error::{CompileFault, Result};

