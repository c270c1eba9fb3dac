//! View key collation
//!
//! Rows of a view are ordered by emitted key using the view engine's type
//! order:
//!
//! `null < false < true < numbers < strings < arrays < objects`
//!
//! Numbers compare numerically, strings by Unicode scalar value, arrays
//! element by element (shorter prefix first) and objects entry by entry in
//! key order.

use serde_json::Value as JsonValue;
use std::cmp::Ordering;

fn rank(value: &JsonValue) -> u8 {
    match value {
        JsonValue::Null => 0,
        JsonValue::Bool(false) => 1,
        JsonValue::Bool(true) => 2,
        JsonValue::Number(_) => 3,
        JsonValue::String(_) => 4,
        JsonValue::Array(_) => 5,
        JsonValue::Object(_) => 6,
    }
}

/// Total order over JSON values used to sort view rows
pub fn collate(a: &JsonValue, b: &JsonValue) -> Ordering {
    let by_rank = rank(a).cmp(&rank(b));
    if by_rank != Ordering::Equal {
        return by_rank;
    }

    match (a, b) {
        (JsonValue::Number(x), JsonValue::Number(y)) => {
            let x = x.as_f64().unwrap_or(0.0);
            let y = y.as_f64().unwrap_or(0.0);
            x.partial_cmp(&y).unwrap_or(Ordering::Equal)
        }
        (JsonValue::String(x), JsonValue::String(y)) => x.cmp(y),
        (JsonValue::Array(xs), JsonValue::Array(ys)) => {
            for (x, y) in xs.iter().zip(ys.iter()) {
                let ord = collate(x, y);
                if ord != Ordering::Equal {
                    return ord;
                }
            }
            xs.len().cmp(&ys.len())
        }
        (JsonValue::Object(xs), JsonValue::Object(ys)) => {
            for ((kx, vx), (ky, vy)) in xs.iter().zip(ys.iter()) {
                let ord = kx.cmp(ky).then_with(|| collate(vx, vy));
                if ord != Ordering::Equal {
                    return ord;
                }
            }
            xs.len().cmp(&ys.len())
        }
        _ => Ordering::Equal,
    }
}
