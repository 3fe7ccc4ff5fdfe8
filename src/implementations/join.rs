use crate::implementation::{helper, ImplementationRef};
use crate::value::Value;

/// Joins `items` (or `$join`) with `separator`, flattening nested arrays.
pub fn join() -> ImplementationRef {
    helper(|config, _env| {
        let items = config
            .first_truthy(&["items", "$join"])
            .cloned()
            .unwrap_or_default()
            .into_items();
        let separator = config
            .first_truthy(&["separator"])
            .map(Value::to_string)
            .unwrap_or_default();

        let mut parts = Vec::new();
        flatten(&items, &mut parts);
        Ok(Value::from(parts.join(&separator)))
    })
}

fn flatten(items: &[Value], parts: &mut Vec<String>) {
    for item in items {
        match item {
            Value::Array(nested) => flatten(nested, parts),
            other => parts.push(other.to_string()),
        }
    }
}
