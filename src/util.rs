// Lightweight compile-time tracing, in the spirit of a debug-only
// `println!`: compiles away entirely in optimized release builds,
// fires under `cfg(test)` or `debug_assertions` so the emitter and
// allocator's allocate/free/goto/loop bookkeeping can be eyeballed
// without pulling in a logging framework.
#[macro_export]
macro_rules! trace(
    ( $($thing:expr),* ) => {
        if cfg!(any(test, debug_assertions)) {
            println! { $($thing),* }
        }
    };
);

pub(crate) use trace;
