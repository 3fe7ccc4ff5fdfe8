use crate::implementation::{component, ImplementationRef};
use crate::value::{Map, Value};

/// Renders `do` with `bindings` (or `$let`) as its whole environment.
pub fn let_component() -> ImplementationRef {
    component(|config, _env, render_child| {
        let bindings = match config.first_truthy(&["bindings", "$let"]) {
            Some(Value::Object(map)) => map.clone(),
            _ => Map::new(),
        };
        let child = config.get("do").cloned().unwrap_or_default();
        Ok(render_child(&child, &Value::Object(bindings))?)
    })
}
