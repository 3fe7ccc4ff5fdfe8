use crate::implementation::{component, ImplementationRef};
use crate::value::{Map, Value};

use super::ensure_trailing_newline;

/// Renders `do` once per entry of `items` (or `$each`), with the entry bound
/// under the name given by `yield`. Each rendering ends up on its own line.
///
/// Children see a copy of the environment with the binding added; the
/// caller's environment is left as it was.
pub fn each() -> ImplementationRef {
    component(|config, env, render_child| {
        let items = config
            .first_truthy(&["items", "$each"])
            .cloned()
            .unwrap_or_default()
            .into_items();
        let binding = config
            .get("yield")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string();
        let child = config.get("do").cloned().unwrap_or_default();

        let mut scope = match env {
            Value::Object(map) => map.clone(),
            _ => Map::new(),
        };

        let mut out = String::new();
        for item in items {
            scope.insert(binding.clone(), item);
            let rendered = render_child(&child, &Value::Object(scope.clone()))?;
            out.push_str(&ensure_trailing_newline(&rendered.to_string()));
        }
        Ok(Value::from(out))
    })
}
