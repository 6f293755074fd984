//! Filter evaluation against a payload's JSON form.

use serde_json::Value;

use atlas_core::models::{ChunkId, Condition, Filter, MatchValue};

/// Whether a point with the given id and payload passes the filter.
pub fn matches(filter: &Filter, id: &ChunkId, payload: &Value) -> bool {
    if filter.exclude_ids.iter().any(|excluded| excluded == id) {
        return false;
    }
    filter.must.iter().all(|c| condition_holds(c, payload))
        && filter.must_not.iter().all(|c| !condition_holds(c, payload))
}

fn condition_holds(condition: &Condition, payload: &Value) -> bool {
    match condition {
        Condition::Match { field, value } => match (payload.get(field), value) {
            (Some(Value::String(s)), MatchValue::Keyword(k)) => s == k,
            (Some(v), MatchValue::Integer(i)) => v.as_i64() == Some(*i),
            (Some(Value::Bool(b)), MatchValue::Bool(x)) => b == x,
            _ => false,
        },
        Condition::Range { field, gte, lte } => payload
            .get(field)
            .and_then(Value::as_f64)
            .is_some_and(|v| {
                gte.map_or(true, |g| v >= g) && lte.map_or(true, |l| v <= l)
            }),
        Condition::AnyOf { field, values } => payload
            .get(field)
            .and_then(Value::as_array)
            .is_some_and(|items| {
                items
                    .iter()
                    .filter_map(Value::as_str)
                    .any(|item| values.iter().any(|wanted| wanted == item))
            }),
        Condition::IsEmpty { field } => match payload.get(field) {
            None | Some(Value::Null) => true,
            Some(Value::String(s)) => s.is_empty(),
            Some(Value::Array(items)) => items.is_empty(),
            _ => false,
        },
    }
}
