// src/common/metadata.rs

use serde_json::{Map, Value};

// Colunas JSONB de metadata podem conter qualquer coisa (inclusive arrays ou null).
// Tudo que não for objeto é tratado como `{}`.
pub fn into_object(value: Value) -> Map<String, Value> {
    match value {
        Value::Object(map) => map,
        _ => Map::new(),
    }
}

/// Merge raso: chaves do `patch` sobrescrevem, as demais são preservadas.
pub fn merge_object(existing: Value, patch: Map<String, Value>) -> Value {
    let mut merged = into_object(existing);
    for (key, value) in patch {
        merged.insert(key, value);
    }
    Value::Object(merged)
}

/// Define apenas `tour`, sem mexer nas chaves irmãs.
pub fn with_tour(existing: Value, tour: &str) -> Value {
    let mut patch = Map::new();
    patch.insert("tour".to_string(), Value::String(tour.to_string()));
    merge_object(existing, patch)
}

pub fn tour_from_metadata(metadata: &Value) -> String {
    metadata
        .as_object()
        .and_then(|map| map.get("tour"))
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string()
}
