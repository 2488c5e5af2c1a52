//! # Formula Evaluation
//!
//! Evaluates the `{...}` formulas of an outline with a small tree-walking
//! interpreter over the [`mapnotes_formula`] AST.
//!
//! A formula sees exactly two things: literal values and the built-in
//! function table ([`builtins`]). Names are never resolved against an
//! ambient scope; the node a formula belongs to is passed explicitly as a
//! [`CallContext`], which is how `lookup("a.b")` knows where to start.
//!
//! Failures are contained per formula: the error's `Display` text is
//! stored as the formula's value and the walk carries on.

pub mod builtins;
pub mod error;
pub mod lookup;
pub mod value;

use mapnotes_formula::ast::{BinaryOp, Expr, LiteralValue, PrefixOp};

use crate::outline::{NodeId, OutlineTree};

pub use builtins::{Arity, CallContext, call_builtin};
pub use error::EvalError;
pub use lookup::{lookup, resolve_path};
pub use value::Value;

/// Evaluate every formula in the tree, parents before children.
///
/// Only `Expression::value` and `Expression::failed` are written.
pub fn evaluate_tree(tree: &mut OutlineTree) {
    for id in tree.preorder() {
        let results: Vec<Option<Result<Value, EvalError>>> = tree
            .node(id)
            .expressions
            .iter()
            .map(|expr| (!expr.is_map_widget()).then(|| evaluate_formula(tree, id, &expr.source)))
            .collect();

        for (expr, result) in tree.node_mut(id).expressions.iter_mut().zip(results) {
            match result {
                None => {}
                Some(Ok(value)) => {
                    expr.value = Some(value.to_string());
                    expr.failed = false;
                }
                Some(Err(err)) => {
                    log::debug!("formula `{}` at {} failed: {err}", expr.source, expr.from);
                    expr.value = Some(err.to_string());
                    expr.failed = true;
                }
            }
        }
    }
}

/// Parse and evaluate one formula as if it sat on `node`.
pub fn evaluate_formula(tree: &OutlineTree, node: NodeId, source: &str) -> Result<Value, EvalError> {
    let parse = mapnotes_formula::parse(source);
    if let Some(error) = parse.errors().first() {
        log::trace!("formula `{source}` has {} parse errors", parse.errors().len());
        return Err(EvalError::Syntax(error.to_string()));
    }
    let expr = parse
        .expr()
        .ok_or_else(|| EvalError::Syntax("empty formula".to_string()))?;

    eval_expr(&CallContext { tree, node }, &expr)
}

fn incomplete() -> EvalError {
    EvalError::Syntax("incomplete expression".to_string())
}

fn eval_expr(ctx: &CallContext<'_>, expr: &Expr) -> Result<Value, EvalError> {
    match expr {
        Expr::Literal(literal) => match literal.value().ok_or_else(incomplete)? {
            LiteralValue::Number(n) => Ok(Value::Number(n)),
            LiteralValue::String(s) => Ok(Value::Str(s)),
            LiteralValue::Bool(b) => Ok(Value::Bool(b)),
        },
        Expr::NameRef(name) => {
            let name = name.name().ok_or_else(incomplete)?;
            constant(&name).ok_or(EvalError::UnknownName(name))
        }
        Expr::Paren(paren) => eval_expr(ctx, &paren.inner().ok_or_else(incomplete)?),
        Expr::Prefix(prefix) => {
            let op = prefix.op().ok_or_else(incomplete)?;
            let operand = eval_expr(ctx, &prefix.operand().ok_or_else(incomplete)?)?;
            eval_prefix(op, operand)
        }
        Expr::Binary(bin) => {
            let op = bin.op().ok_or_else(incomplete)?;
            let lhs = eval_expr(ctx, &bin.lhs().ok_or_else(incomplete)?)?;
            let rhs_expr = bin.rhs().ok_or_else(incomplete)?;
            match op {
                BinaryOp::And if !lhs.truthy() => Ok(lhs),
                BinaryOp::Or if lhs.truthy() => Ok(lhs),
                BinaryOp::And | BinaryOp::Or => eval_expr(ctx, &rhs_expr),
                _ => eval_binary(op, lhs, eval_expr(ctx, &rhs_expr)?),
            }
        }
        Expr::Conditional(cond) => {
            let condition = eval_expr(ctx, &cond.condition().ok_or_else(incomplete)?)?;
            let branch = if condition.truthy() {
                cond.then_branch()
            } else {
                cond.else_branch()
            };
            eval_expr(ctx, &branch.ok_or_else(incomplete)?)
        }
        Expr::Call(call) => {
            let name = call.name().ok_or_else(incomplete)?;
            let args = call
                .args()
                .iter()
                .map(|arg| eval_expr(ctx, arg))
                .collect::<Result<Vec<_>, _>>()?;
            call_builtin(ctx, &name, &args)
        }
    }
}

fn constant(name: &str) -> Option<Value> {
    let value = match name {
        "undefined" => Value::Undefined,
        "NaN" => Value::Number(f64::NAN),
        "Infinity" => Value::Number(f64::INFINITY),
        "PI" => Value::Number(std::f64::consts::PI),
        "E" => Value::Number(std::f64::consts::E),
        _ => return None,
    };
    Some(value)
}

fn eval_prefix(op: PrefixOp, operand: Value) -> Result<Value, EvalError> {
    match (op, &operand) {
        (PrefixOp::Not, _) => Ok(Value::Bool(!operand.truthy())),
        (PrefixOp::Neg, Value::Number(n)) => Ok(Value::Number(-n)),
        (PrefixOp::Plus, Value::Number(n)) => Ok(Value::Number(*n)),
        (PrefixOp::Neg | PrefixOp::Plus, _) => Err(EvalError::UnaryTypeMismatch {
            op: if op == PrefixOp::Neg { "-" } else { "+" },
            operand: operand.type_name(),
        }),
    }
}

fn op_symbol(op: BinaryOp) -> &'static str {
    match op {
        BinaryOp::Add => "+",
        BinaryOp::Sub => "-",
        BinaryOp::Mul => "*",
        BinaryOp::Div => "/",
        BinaryOp::Rem => "%",
        BinaryOp::Eq => "==",
        BinaryOp::NotEq => "!=",
        BinaryOp::Lt => "<",
        BinaryOp::LtEq => "<=",
        BinaryOp::Gt => ">",
        BinaryOp::GtEq => ">=",
        BinaryOp::And => "&&",
        BinaryOp::Or => "||",
    }
}

fn type_mismatch(op: BinaryOp, lhs: &Value, rhs: &Value) -> EvalError {
    EvalError::TypeMismatch {
        op: op_symbol(op),
        lhs: lhs.type_name(),
        rhs: rhs.type_name(),
    }
}

/// Numeric view of an operand for `- * / %` and mixed comparisons.
fn arithmetic_operand(value: &Value) -> Option<f64> {
    match value {
        Value::Number(_) | Value::Str(_) => value.to_number(),
        Value::Undefined | Value::Bool(_) => None,
    }
}

fn eval_binary(op: BinaryOp, lhs: Value, rhs: Value) -> Result<Value, EvalError> {
    match op {
        BinaryOp::Eq => Ok(Value::Bool(lhs == rhs)),
        BinaryOp::NotEq => Ok(Value::Bool(lhs != rhs)),
        BinaryOp::And => Ok(if lhs.truthy() { rhs } else { lhs }),
        BinaryOp::Or => Ok(if lhs.truthy() { lhs } else { rhs }),

        BinaryOp::Add => match (&lhs, &rhs) {
            (Value::Str(_), _) | (_, Value::Str(_)) => Ok(Value::Str(format!("{lhs}{rhs}"))),
            (Value::Number(a), Value::Number(b)) => Ok(Value::Number(a + b)),
            _ => Err(type_mismatch(op, &lhs, &rhs)),
        },

        BinaryOp::Sub | BinaryOp::Mul | BinaryOp::Div | BinaryOp::Rem => {
            let (Some(a), Some(b)) = (arithmetic_operand(&lhs), arithmetic_operand(&rhs)) else {
                return Err(type_mismatch(op, &lhs, &rhs));
            };
            match op {
                BinaryOp::Sub => Ok(Value::Number(a - b)),
                BinaryOp::Mul => Ok(Value::Number(a * b)),
                _ if b == 0.0 => Err(EvalError::DivisionByZero),
                BinaryOp::Div => Ok(Value::Number(a / b)),
                _ => Ok(Value::Number(a % b)),
            }
        }

        BinaryOp::Lt | BinaryOp::LtEq | BinaryOp::Gt | BinaryOp::GtEq => {
            let ordering = match (&lhs, &rhs) {
                (Value::Str(a), Value::Str(b)) => Some(a.cmp(b)),
                _ => match (arithmetic_operand(&lhs), arithmetic_operand(&rhs)) {
                    (Some(a), Some(b)) => a.partial_cmp(&b),
                    _ => return Err(type_mismatch(op, &lhs, &rhs)),
                },
            };
            // NaN compares false every way
            let result = ordering.is_some_and(|ordering| match op {
                BinaryOp::Lt => ordering.is_lt(),
                BinaryOp::LtEq => ordering.is_le(),
                BinaryOp::Gt => ordering.is_gt(),
                _ => ordering.is_ge(),
            });
            Ok(Value::Bool(result))
        }
    }
}
