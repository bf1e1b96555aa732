// Intrinsic table: dispatch by exact
// `(name, type-tuple)` match onto a code-emitting routine. The table
// itself is just a registry; every routine below talks only to the
// allocator, emitter and value model, never to each other.

use std::collections::HashMap;

use lazy_static::lazy_static;

use crate::allocator::{Allocator, CellIndex};
use crate::emitter::Emitter;
use crate::error::{CompileFault, Result};
use crate::options::CompilerOptions;
use crate::value::{Type, Value};

/// `(operator_name, (type0, type1, ...))`: the intrinsic table's key.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct IntrinsicKey(pub String, pub Vec<Type>);

impl IntrinsicKey {
    pub fn new(name: impl Into<String>, args: Vec<Type>) -> IntrinsicKey {
        IntrinsicKey(name.into(), args)
    }
}

type Routine =
    Box<dyn Fn(&mut Allocator, &mut Emitter, &CompilerOptions, Vec<Value>) -> Result<Option<Value>>>;

/// Registry mapping `IntrinsicKey` to an emitting routine.
#[derive(Default)]
pub struct IntrinsicTable {
    routines: HashMap<IntrinsicKey, Routine>,
}

impl IntrinsicTable {
    pub fn new() -> IntrinsicTable {
        IntrinsicTable { routines: HashMap::new() }
    }

    /// The table used by a fresh compilation: every required built-in
    /// intrinsic pre-registered.
    pub fn with_builtins() -> IntrinsicTable {
        let mut table = IntrinsicTable::new();
        register_builtins(&mut table);
        table
    }

    /// Registers a routine under `(name, args)`. Overwrites any
    /// existing routine for the same key, so callers can shadow a
    /// builtin if they need to.
    pub fn register<F>(&mut self, name: impl Into<String>, args: Vec<Type>, routine: F)
    where
        F: Fn(&mut Allocator, &mut Emitter, &CompilerOptions, Vec<Value>) -> Result<Option<Value>>
            + 'static,
    {
        self.routines.insert(IntrinsicKey::new(name, args), Box::new(routine));
    }

    /// Resolves `name` against the types of `args` and invokes the
    /// matching routine. `CompileFault::UnknownIntrinsic` if no
    /// routine is registered for the exact key.
    pub fn call(
        &self,
        name: &str,
        args: Vec<Value>,
        alloc: &mut Allocator,
        emitter: &mut Emitter,
        opts: &CompilerOptions,
    ) -> Result<Option<Value>> {
        let arg_types: Vec<Type> = args.iter().map(Value::type_of).collect();
        let key = IntrinsicKey::new(name, arg_types);
        match self.routines.get(&key) {
            Some(routine) => routine(alloc, emitter, opts, args),
            None => Err(CompileFault::UnknownIntrinsic { name: key.0, args: key.1 }),
        }
    }

    pub fn contains(&self, name: &str, args: &[Type]) -> bool {
        self.routines.contains_key(&IntrinsicKey::new(name, args.to_vec()))
    }
}

fn byte_idx(v: &Value) -> CellIndex {
    match v {
        Value::Byte(i) => *i,
        other => unreachable!("intrinsic dispatched on non-byte argument: {:?}", other),
    }
}

fn vint_value(v: &Value) -> i64 {
    match v {
        Value::VirtualInteger(n) => *n,
        other => unreachable!("intrinsic dispatched on non-virtual-integer argument: {:?}", other),
    }
}

fn register_builtins(table: &mut IntrinsicTable) {
    use Type::*;

    table.register("=", vec![Byte, Byte], |alloc, emitter, _opts, mut args| {
        let y = args.pop().unwrap();
        let x = args.pop().unwrap();
        let xi = byte_idx(&x);
        let yi = byte_idx(&y);
        emitter.zero(xi);
        emitter.move_cell(yi, &[xi], 1)?;
        alloc.free(yi);
        Ok(None)
    });

    table.register("=", vec![Byte, VirtualInteger], |_alloc, emitter, _opts, mut args| {
        let v = args.pop().unwrap();
        let x = args.pop().unwrap();
        let xi = byte_idx(&x);
        let n = vint_value(&v);
        emitter.zero(xi);
        emitter.emit(&"+".repeat(n as usize));
        Ok(None)
    });

    table.register("++", vec![Byte], |_alloc, emitter, _opts, mut args| {
        let x = args.pop().unwrap();
        emitter.goto(byte_idx(&x));
        emitter.emit("+");
        Ok(Some(x))
    });

    table.register("--", vec![Byte], |_alloc, emitter, _opts, mut args| {
        let x = args.pop().unwrap();
        emitter.goto(byte_idx(&x));
        emitter.emit("-");
        Ok(Some(x))
    });

    table.register("+=", vec![Byte, Byte], |alloc, emitter, _opts, mut args| {
        let y = args.pop().unwrap();
        let x = args.pop().unwrap();
        let xi = byte_idx(&x);
        let yi = byte_idx(&y);
        emitter.move_cell(yi, &[xi], 1)?;
        alloc.free(yi);
        Ok(Some(x))
    });

    table.register("+=", vec![Byte, VirtualInteger], |_alloc, emitter, _opts, mut args| {
        let v = args.pop().unwrap();
        let x = args.pop().unwrap();
        let n = vint_value(&v);
        emitter.goto(byte_idx(&x));
        emitter.emit(&"+".repeat(n as usize));
        Ok(Some(x))
    });

    table.register("-=", vec![Byte, Byte], |alloc, emitter, _opts, mut args| {
        let y = args.pop().unwrap();
        let x = args.pop().unwrap();
        let xi = byte_idx(&x);
        let yi = byte_idx(&y);
        emitter.goto(yi);
        emitter.loop_(|e| {
            e.emit("-");
            e.goto(xi);
            e.emit("-");
            e.goto(yi);
            Ok(())
        })?;
        alloc.free(yi);
        Ok(Some(x))
    });

    table.register("-=", vec![Byte, VirtualInteger], |_alloc, emitter, _opts, mut args| {
        let v = args.pop().unwrap();
        let x = args.pop().unwrap();
        let n = vint_value(&v);
        emitter.goto(byte_idx(&x));
        emitter.emit(&"-".repeat(n as usize));
        Ok(Some(x))
    });

    table.register("*=", vec![Byte, Byte], |alloc, emitter, opts, mut args| {
        let y = args.pop().unwrap();
        let x = args.pop().unwrap();
        let xi = byte_idx(&x);
        let yi = byte_idx(&y);

        let x_prime = x.copy(alloc, emitter, opts)?;
        let x_prime_i = byte_idx(&x_prime);

        emitter.zero(xi);
        emitter.goto(yi);
        emitter.loop_(|e| {
            e.emit("-");
            let x_double_prime = Value::Byte(x_prime_i).copy(alloc, e, opts)?;
            let xpp_i = byte_idx(&x_double_prime);
            e.move_cell(xpp_i, &[xi], 1)?;
            alloc.free(xpp_i);
            e.goto(yi);
            Ok(())
        })?;

        x_prime.free(alloc, emitter, opts);
        alloc.free(yi);
        Ok(Some(x))
    });

    table.register("*=", vec![Byte, VirtualInteger], |alloc, emitter, opts, mut args| {
        let v = args.pop().unwrap();
        let x = args.pop().unwrap();
        let xi = byte_idx(&x);
        let n = vint_value(&v);
        let tmp = alloc.allocate();
        if !opts.zero_on_free {
            emitter.zero(tmp);
        }
        emitter.move_cell(xi, &[tmp], n as u32)?;
        emitter.move_cell(tmp, &[xi], 1)?;
        alloc.free(tmp);
        Ok(Some(x))
    });

    table.register("!", vec![Byte], |alloc, emitter, _opts, mut args| {
        let x = args.pop().unwrap();
        let xi = byte_idx(&x);
        let yi = alloc.allocate();
        emitter.goto(yi);
        emitter.emit("[-]+");
        emitter.goto(xi);
        emitter.loop_(|e| {
            e.emit("[-]");
            e.goto(yi);
            e.emit("-");
            e.goto(xi);
            Ok(())
        })?;
        Ok(Some(Value::Byte(yi)))
    });

    table.register("==", vec![Byte, Byte], |alloc, emitter, _opts, mut args| {
        let y = args.pop().unwrap();
        let x = args.pop().unwrap();
        let xi = byte_idx(&x);
        let yi = byte_idx(&y);

        emitter.goto(yi);
        emitter.loop_(|e| {
            e.emit("-");
            e.goto(xi);
            e.emit("-");
            e.goto(yi);
            Ok(())
        })?;

        let zi = alloc.allocate();
        emitter.goto(zi);
        emitter.emit("[-]+");
        emitter.goto(xi);
        emitter.loop_(|e| {
            e.emit("[-]");
            e.goto(zi);
            e.emit("-");
            e.goto(xi);
            Ok(())
        })?;

        // The first loop above runs until y is zero (that's its exit
        // condition), and the second loop's body opens with `[-]`, so
        // x is zeroed before the loop exits on x == 0 too. Both cells
        // are already zero here, so there's nothing left to zero
        // before reclaiming them.
        alloc.free(xi);
        alloc.free(yi);
        Ok(Some(Value::Byte(zi)))
    });

    table.register("read", vec![], |alloc, emitter, _opts, args| {
        debug_assert!(args.is_empty());
        let i = alloc.allocate();
        emitter.goto(i);
        emitter.emit(",");
        Ok(Some(Value::Byte(i)))
    });

    table.register("write", vec![Byte], |_alloc, emitter, _opts, mut args| {
        let x = args.pop().unwrap();
        emitter.goto(byte_idx(&x));
        emitter.emit(".");
        Ok(None)
    });
}

lazy_static! {
    /// The full set of `(name, arg types)` keys this table must cover.
    /// Exercised by `tests::builtins_cover_required_keys` so a future
    /// edit can't silently drop an entry.
    static ref REQUIRED_BUILTINS: Vec<(&'static str, Vec<Type>)> = vec![
        ("=", vec![Type::Byte, Type::Byte]),
        ("=", vec![Type::Byte, Type::VirtualInteger]),
        ("++", vec![Type::Byte]),
        ("--", vec![Type::Byte]),
        ("+=", vec![Type::Byte, Type::Byte]),
        ("+=", vec![Type::Byte, Type::VirtualInteger]),
        ("-=", vec![Type::Byte, Type::Byte]),
        ("-=", vec![Type::Byte, Type::VirtualInteger]),
        ("*=", vec![Type::Byte, Type::Byte]),
        ("*=", vec![Type::Byte, Type::VirtualInteger]),
        ("!", vec![Type::Byte]),
        ("==", vec![Type::Byte, Type::Byte]),
        ("read", vec![]),
        ("write", vec![Type::Byte]),
    ];
}
