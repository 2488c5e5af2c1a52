//! The fixed function table available to formulas.
//!
//! Every function receives a [`CallContext`] naming the tree and the node
//! the formula sits on, which is what `lookup` resolves paths from.

use std::fmt;

use crate::outline::{NodeId, OutlineTree};

use super::error::EvalError;
use super::lookup::lookup;
use super::value::Value;

/// The node a formula is evaluated for.
#[derive(Debug, Clone, Copy)]
pub struct CallContext<'t> {
    pub tree: &'t OutlineTree,
    pub node: NodeId,
}

/// How many arguments a function takes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Arity {
    Exact(usize),
    Between(usize, usize),
    AtLeast(usize),
}

impl Arity {
    pub fn accepts(self, count: usize) -> bool {
        match self {
            Arity::Exact(n) => count == n,
            Arity::Between(min, max) => (min..=max).contains(&count),
            Arity::AtLeast(min) => count >= min,
        }
    }
}

impl fmt::Display for Arity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Arity::Exact(n) => write!(f, "{n}"),
            Arity::Between(min, max) => write!(f, "{min} to {max}"),
            Arity::AtLeast(min) => write!(f, "at least {min}"),
        }
    }
}

type BuiltinFn = fn(&CallContext<'_>, &[Value]) -> Result<Value, EvalError>;

pub struct Builtin {
    pub name: &'static str,
    pub arity: Arity,
    call: BuiltinFn,
}

pub static BUILTINS: &[Builtin] = &[
    Builtin {
        name: "lookup",
        arity: Arity::Exact(1),
        call: builtin_lookup,
    },
    Builtin {
        name: "sum",
        arity: Arity::AtLeast(0),
        call: sum,
    },
    Builtin {
        name: "min",
        arity: Arity::AtLeast(1),
        call: min,
    },
    Builtin {
        name: "max",
        arity: Arity::AtLeast(1),
        call: max,
    },
    Builtin {
        name: "avg",
        arity: Arity::AtLeast(1),
        call: avg,
    },
    Builtin {
        name: "count",
        arity: Arity::AtLeast(0),
        call: count,
    },
    Builtin {
        name: "abs",
        arity: Arity::Exact(1),
        call: abs,
    },
    Builtin {
        name: "round",
        arity: Arity::Between(1, 2),
        call: round,
    },
    Builtin {
        name: "floor",
        arity: Arity::Exact(1),
        call: floor,
    },
    Builtin {
        name: "ceil",
        arity: Arity::Exact(1),
        call: ceil,
    },
    Builtin {
        name: "sqrt",
        arity: Arity::Exact(1),
        call: sqrt,
    },
    Builtin {
        name: "pow",
        arity: Arity::Exact(2),
        call: pow,
    },
    Builtin {
        name: "random",
        arity: Arity::Exact(0),
        call: random,
    },
    Builtin {
        name: "len",
        arity: Arity::Exact(1),
        call: len,
    },
    Builtin {
        name: "upper",
        arity: Arity::Exact(1),
        call: upper,
    },
    Builtin {
        name: "lower",
        arity: Arity::Exact(1),
        call: lower,
    },
    Builtin {
        name: "concat",
        arity: Arity::AtLeast(0),
        call: concat,
    },
];

pub fn find_builtin(name: &str) -> Option<&'static Builtin> {
    BUILTINS.iter().find(|builtin| builtin.name == name)
}

/// Call the function `name` after checking it exists and its arity.
pub fn call_builtin(
    ctx: &CallContext<'_>,
    name: &str,
    args: &[Value],
) -> Result<Value, EvalError> {
    let builtin = find_builtin(name).ok_or_else(|| EvalError::UnknownFunction(name.to_string()))?;
    if !builtin.arity.accepts(args.len()) {
        return Err(EvalError::Arity {
            name: name.to_string(),
            expected: builtin.arity,
            found: args.len(),
        });
    }
    (builtin.call)(ctx, args)
}

fn invalid(function: &str, message: impl Into<String>) -> EvalError {
    EvalError::InvalidArgument {
        function: function.to_string(),
        message: message.into(),
    }
}

fn number_arg(function: &str, value: &Value) -> Result<f64, EvalError> {
    value
        .to_number()
        .ok_or_else(|| invalid(function, format!("expected a number, got {}", value.type_name())))
}

fn numbers(function: &str, args: &[Value]) -> Result<Vec<f64>, EvalError> {
    args.iter().map(|arg| number_arg(function, arg)).collect()
}

fn builtin_lookup(ctx: &CallContext<'_>, args: &[Value]) -> Result<Value, EvalError> {
    match &args[0] {
        Value::Str(path) => Ok(lookup(ctx.tree, ctx.node, path)),
        other => Err(invalid(
            "lookup",
            format!("expected a path string, got {}", other.type_name()),
        )),
    }
}

fn sum(_: &CallContext<'_>, args: &[Value]) -> Result<Value, EvalError> {
    Ok(Value::Number(numbers("sum", args)?.into_iter().sum()))
}

fn min(_: &CallContext<'_>, args: &[Value]) -> Result<Value, EvalError> {
    let values = numbers("min", args)?;
    Ok(Value::Number(values.into_iter().fold(f64::INFINITY, f64::min)))
}

fn max(_: &CallContext<'_>, args: &[Value]) -> Result<Value, EvalError> {
    let values = numbers("max", args)?;
    Ok(Value::Number(
        values.into_iter().fold(f64::NEG_INFINITY, f64::max),
    ))
}

fn avg(_: &CallContext<'_>, args: &[Value]) -> Result<Value, EvalError> {
    let values = numbers("avg", args)?;
    let total: f64 = values.iter().sum();
    Ok(Value::Number(total / values.len() as f64))
}

/// Number of arguments that are not undefined.
fn count(_: &CallContext<'_>, args: &[Value]) -> Result<Value, EvalError> {
    let defined = args.iter().filter(|arg| **arg != Value::Undefined).count();
    Ok(Value::Number(defined as f64))
}

fn abs(_: &CallContext<'_>, args: &[Value]) -> Result<Value, EvalError> {
    Ok(Value::Number(number_arg("abs", &args[0])?.abs()))
}

fn round(_: &CallContext<'_>, args: &[Value]) -> Result<Value, EvalError> {
    let x = number_arg("round", &args[0])?;
    let digits = match args.get(1) {
        Some(value) => number_arg("round", value)?,
        None => 0.0,
    };
    if digits.fract() != 0.0 || !(0.0..=15.0).contains(&digits) {
        return Err(invalid("round", "digits must be a whole number from 0 to 15"));
    }
    let factor = 10f64.powi(digits as i32);
    // Halves round up, towards positive infinity
    Ok(Value::Number((x * factor + 0.5).floor() / factor))
}

fn floor(_: &CallContext<'_>, args: &[Value]) -> Result<Value, EvalError> {
    Ok(Value::Number(number_arg("floor", &args[0])?.floor()))
}

fn ceil(_: &CallContext<'_>, args: &[Value]) -> Result<Value, EvalError> {
    Ok(Value::Number(number_arg("ceil", &args[0])?.ceil()))
}

fn sqrt(_: &CallContext<'_>, args: &[Value]) -> Result<Value, EvalError> {
    let x = number_arg("sqrt", &args[0])?;
    if x < 0.0 {
        return Err(invalid("sqrt", "negative number"));
    }
    Ok(Value::Number(x.sqrt()))
}

fn pow(_: &CallContext<'_>, args: &[Value]) -> Result<Value, EvalError> {
    let base = number_arg("pow", &args[0])?;
    let exponent = number_arg("pow", &args[1])?;
    Ok(Value::Number(base.powf(exponent)))
}

/// Uniform in `[0, 1)` from the random low half of a v4 UUID.
fn random(_: &CallContext<'_>, _: &[Value]) -> Result<Value, EvalError> {
    const MANTISSA_BITS: u32 = 53;
    let (_, low) = uuid::Uuid::new_v4().as_u64_pair();
    let bits = low & ((1u64 << MANTISSA_BITS) - 1);
    Ok(Value::Number(bits as f64 / (1u64 << MANTISSA_BITS) as f64))
}

fn len(_: &CallContext<'_>, args: &[Value]) -> Result<Value, EvalError> {
    match &args[0] {
        Value::Str(s) => Ok(Value::Number(s.chars().count() as f64)),
        other => Err(invalid(
            "len",
            format!("expected a string, got {}", other.type_name()),
        )),
    }
}

fn upper(_: &CallContext<'_>, args: &[Value]) -> Result<Value, EvalError> {
    Ok(Value::Str(args[0].to_string().to_uppercase()))
}

fn lower(_: &CallContext<'_>, args: &[Value]) -> Result<Value, EvalError> {
    Ok(Value::Str(args[0].to_string().to_lowercase()))
}

fn concat(_: &CallContext<'_>, args: &[Value]) -> Result<Value, EvalError> {
    Ok(Value::Str(args.iter().map(Value::to_string).collect()))
}
