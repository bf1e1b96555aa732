// A tiny tape-machine simulator, used only by this crate's tests to
// check that emitted programs actually do what the source program
// asked for. Modeled on the same wrapping-byte-tape, run-to-matching-
// bracket machine a Brainfuck interpreter implements (see
// `zenoamaro-rust-brainfuck`'s `Machine`), adapted to run over an
// in-memory stdin/stdout pair instead of the real streams.

use std::collections::VecDeque;

pub struct Simulator {
    tape: Vec<u8>,
    head: usize,
    input: VecDeque<u8>,
    pub output: Vec<u8>,
}

impl Simulator {
    pub fn new(input: impl IntoIterator<Item = u8>) -> Simulator {
        Simulator {
            tape: vec![0; 1],
            head: 0,
            input: input.into_iter().collect(),
            output: Vec::new(),
        }
    }

    fn cell(&mut self) -> &mut u8 {
        if self.head >= self.tape.len() {
            self.tape.resize(self.head + 1, 0);
        }
        &mut self.tape[self.head]
    }

    /// Runs `program` to completion. Panics on an unmatched bracket:
    /// every program this crate emits is statically loop-balanced, so
    /// a mismatch here means the emitted text itself was malformed.
    pub fn run(&mut self, program: &str) {
        let chars: Vec<char> = program.chars().collect();
        let matches = match_brackets(&chars);
        let mut pc = 0;
        while pc < chars.len() {
            match chars[pc] {
                '+' => {
                    let v = self.cell_value().wrapping_add(1);
                    *self.cell() = v;
                }
                '-' => {
                    let v = self.cell_value().wrapping_sub(1);
                    *self.cell() = v;
                }
                '>' => self.head += 1,
                '<' => self.head = self.head.checked_sub(1).expect("head ran off the left of the tape"),
                ',' => {
                    let byte = self.input.pop_front().unwrap_or(0);
                    *self.cell() = byte;
                }
                '.' => {
                    let byte = self.cell_value();
                    self.output.push(byte);
                }
                '[' => {
                    if self.cell_value() == 0 {
                        pc = matches[&pc];
                    }
                }
                ']' => {
                    if self.cell_value() != 0 {
                        pc = matches[&pc];
                    }
                }
                other => panic!("character outside the target alphabet: {:?}", other),
            }
            pc += 1;
        }
    }

    fn cell_value(&mut self) -> u8 {
        *self.cell()
    }
}

fn match_brackets(chars: &[char]) -> std::collections::HashMap<usize, usize> {
    let mut pairs = std::collections::HashMap::new();
    let mut stack = Vec::new();
    for (i, &c) in chars.iter().enumerate() {
        match c {
            '[' => stack.push(i),
            ']' => {
                let open = stack.pop().expect("unmatched ']' in emitted program");
                pairs.insert(open, i);
                pairs.insert(i, open);
            }
            _ => {}
        }
    }
    assert!(stack.is_empty(), "unmatched '[' in emitted program");
    pairs
}
