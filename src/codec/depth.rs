//! Container nesting measurement.
//!
//! Walks with an explicit stack so arbitrarily deep values cannot exhaust the
//! call stack.

use serde_json::Value;

/// Deepest container nesting in `value`. Scalars are 0, `[]` and `{}` are 1.
#[cfg(test)]
fn nesting_depth(value: &Value) -> usize {
    let mut deepest = 0;
    let mut stack = vec![(value, 0usize)];
    while let Some((node, depth)) = stack.pop() {
        let inner = depth + 1;
        match node {
            Value::Array(items) => {
                deepest = deepest.max(inner);
                stack.extend(items.iter().map(|item| (item, inner)));
            }
            Value::Object(map) => {
                deepest = deepest.max(inner);
                stack.extend(map.values().map(|item| (item, inner)));
            }
            _ => {}
        }
    }
    deepest
}

/// True once any container sits more than `limit` levels deep. Stops at the
/// first offending container.
pub(crate) fn exceeds_depth(value: &Value, limit: usize) -> bool {
    let mut stack = vec![(value, 0usize)];
    while let Some((node, depth)) = stack.pop() {
        let inner = depth + 1;
        match node {
            Value::Array(items) => {
                if inner > limit {
                    return true;
                }
                stack.extend(items.iter().map(|item| (item, inner)));
            }
            Value::Object(map) => {
                if inner > limit {
                    return true;
                }
                stack.extend(map.values().map(|item| (item, inner)));
            }
            _ => {}
        }
    }
    false
}
