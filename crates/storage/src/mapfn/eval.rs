//! Map function evaluation
//!
//! Values follow JavaScript semantics closely enough for view predicates:
//! missing members read as `null`, `&&`/`||` yield an operand, and
//! truthiness treats `null`, `false`, `0` and `""` as false. Equality is
//! strict (no cross-type coercion).

use super::parser::{number, BinOp, Expr, Root, Stmt};
use crate::collation::collate;
use serde_json::Value as JsonValue;
use std::cmp::Ordering;

pub(crate) struct Scope<'a> {
    pub doc: &'a JsonValue,
    pub meta: &'a JsonValue,
}

/// Run `body`, appending every `(key, value)` emitted
pub(crate) fn run(body: &[Stmt], scope: &Scope<'_>, out: &mut Vec<(JsonValue, JsonValue)>) {
    for stmt in body {
        match stmt {
            Stmt::If {
                cond,
                then,
                otherwise,
            } => {
                if truthy(&eval(cond, scope)) {
                    run(then, scope, out);
                } else {
                    run(otherwise, scope, out);
                }
            }
            Stmt::Emit { key, value } => out.push((eval(key, scope), eval(value, scope))),
        }
    }
}

pub(crate) fn eval(expr: &Expr, scope: &Scope<'_>) -> JsonValue {
    match expr {
        Expr::Literal(v) => v.clone(),
        Expr::Path { root, segments } => {
            let mut current = match root {
                Root::Doc => scope.doc,
                Root::Meta => scope.meta,
            };
            for segment in segments {
                let next = match current {
                    JsonValue::Object(map) => map.get(segment),
                    JsonValue::Array(items) => {
                        segment.parse::<usize>().ok().and_then(|i| items.get(i))
                    }
                    _ => None,
                };
                match next {
                    Some(v) => current = v,
                    None => return JsonValue::Null,
                }
            }
            current.clone()
        }
        Expr::Not(inner) => JsonValue::Bool(!truthy(&eval(inner, scope))),
        Expr::Neg(inner) => match eval(inner, scope).as_f64() {
            Some(n) => number(-n),
            None => JsonValue::Null,
        },
        Expr::Binary { op, lhs, rhs } => match op {
            BinOp::And => {
                let l = eval(lhs, scope);
                if truthy(&l) {
                    eval(rhs, scope)
                } else {
                    l
                }
            }
            BinOp::Or => {
                let l = eval(lhs, scope);
                if truthy(&l) {
                    l
                } else {
                    eval(rhs, scope)
                }
            }
            BinOp::Eq => JsonValue::Bool(strict_eq(&eval(lhs, scope), &eval(rhs, scope))),
            BinOp::NotEq => JsonValue::Bool(!strict_eq(&eval(lhs, scope), &eval(rhs, scope))),
            BinOp::Lt | BinOp::Le | BinOp::Gt | BinOp::Ge => {
                let ord = compare(&eval(lhs, scope), &eval(rhs, scope));
                JsonValue::Bool(match (op, ord) {
                    (_, None) => false,
                    (BinOp::Lt, Some(o)) => o == Ordering::Less,
                    (BinOp::Le, Some(o)) => o != Ordering::Greater,
                    (BinOp::Gt, Some(o)) => o == Ordering::Greater,
                    (_, Some(o)) => o != Ordering::Less,
                })
            }
        },
    }
}

pub(crate) fn truthy(value: &JsonValue) -> bool {
    match value {
        JsonValue::Null => false,
        JsonValue::Bool(b) => *b,
        JsonValue::Number(n) => n.as_f64().map_or(false, |f| f != 0.0 && !f.is_nan()),
        JsonValue::String(s) => !s.is_empty(),
        JsonValue::Array(_) | JsonValue::Object(_) => true,
    }
}

fn strict_eq(a: &JsonValue, b: &JsonValue) -> bool {
    match (a, b) {
        (JsonValue::Number(x), JsonValue::Number(y)) => x.as_f64() == y.as_f64(),
        // Object and array identity never holds between distinct values
        (JsonValue::Array(_), _) | (JsonValue::Object(_), _) => false,
        _ => a == b,
    }
}

/// Relational comparison; only numbers with numbers and strings with strings
fn compare(a: &JsonValue, b: &JsonValue) -> Option<Ordering> {
    match (a, b) {
        (JsonValue::Number(x), JsonValue::Number(y)) => x.as_f64()?.partial_cmp(&y.as_f64()?),
        (JsonValue::String(_), JsonValue::String(_)) => Some(collate(a, b)),
        _ => None,
    }
}
