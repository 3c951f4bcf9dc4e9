//! Flattens the search endpoint's response into recipe records.
//!
//! Deployed backends disagree on the envelope. Accepted shapes, first match wins:
//!
//! 1. `{ "hits": { "hits": [ { "_id", "_source" } ] } }` (raw Elasticsearch)
//! 2. `{ "hits": [ { "_id", "_source" } ] }`
//! 3. `{ "results": [ { "_id", ... } ] }` (already flat)
//!
//! Anything else is an empty result set. Every object entry yields a recipe;
//! only entries that are not objects are skipped.

use serde_json::{Map, Value};
use tracing::warn;

use crate::models::Recipe;

#[must_use]
pub fn normalize_response(body: &Value) -> Vec<Recipe> {
    if let Some(hits) = body.pointer("/hits/hits").and_then(Value::as_array) {
        return hits.iter().filter_map(flatten_hit).collect();
    }

    if let Some(hits) = body.get("hits").and_then(Value::as_array) {
        return hits.iter().filter_map(flatten_hit).collect();
    }

    if let Some(results) = body.get("results").and_then(Value::as_array) {
        return results
            .iter()
            .filter_map(|entry| entry.as_object().and_then(|o| to_recipe(o.clone())))
            .collect();
    }

    Vec::new()
}

/// `{_id, _source}` → flat record. `_source` fields win over the hit id.
fn flatten_hit(hit: &Value) -> Option<Recipe> {
    let hit = hit.as_object()?;

    let mut record = Map::new();
    if let Some(id) = hit.get("_id").and_then(id_string) {
        record.insert("_id".to_string(), Value::String(id));
    }
    if let Some(source) = hit.get("_source").and_then(Value::as_object) {
        record.extend(source.iter().map(|(k, v)| (k.clone(), v.clone())));
    }

    to_recipe(record)
}

fn id_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn to_recipe(record: Map<String, Value>) -> Option<Recipe> {
    match serde_json::from_value(Value::Object(record)) {
        Ok(recipe) => Some(recipe),
        Err(e) => {
            warn!(error = %e, "Skipping malformed recipe in search response");
            None
        }
    }
}
