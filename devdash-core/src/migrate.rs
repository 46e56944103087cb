//! Legacy-record migration over loosely-typed state documents.
//!
//! Older clients stored a single `groupId` per project; current records
//! carry a `groupIds` list. The migration runs at the load boundary, over
//! the raw JSON document, before any typed decoding — the untyped-to-typed
//! boundary stays narrow and is tested in isolation here.

use serde_json::Value;

/// Structural check used by the load protocol: a candidate document is
/// adoptable if it is an object whose `projects` field is an array.
pub fn looks_like_state(value: &Value) -> bool {
    value
        .as_object()
        .and_then(|obj| obj.get("projects"))
        .map(Value::is_array)
        .unwrap_or(false)
}

/// Migrate every project record in `state` in place. Idempotent.
///
/// - `groupId: null` → `groupIds: []`, legacy field dropped
/// - `groupId: "g"` → `groupIds: ["g"]`, legacy field dropped
/// - missing `groupIds` → `groupIds: []`
///
/// A `groupId` alongside an existing `groupIds` is treated as already
/// migrated: the list wins and the stray field is dropped.
pub fn migrate_state_value(state: &mut Value) {
    let Some(projects) = state
        .get_mut("projects")
        .and_then(Value::as_array_mut)
    else {
        return;
    };

    for record in projects.iter_mut() {
        let Some(obj) = record.as_object_mut() else {
            continue;
        };

        if let Some(legacy) = obj.remove("groupId") {
            if !obj.contains_key("groupIds") {
                let ids = match legacy {
                    Value::Null => Vec::new(),
                    other => vec![other],
                };
                obj.insert("groupIds".to_string(), Value::Array(ids));
            }
        }

        obj.entry("groupIds")
            .or_insert_with(|| Value::Array(Vec::new()));
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
