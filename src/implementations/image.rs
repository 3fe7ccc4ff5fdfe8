use crate::implementation::{component, ImplementationRef};
use crate::value::Value;

/// `<img>` tag from `source` (or the `$image` shorthand) and `alt`.
pub fn image() -> ImplementationRef {
    component(|config, _env, _render_child| {
        let source = config
            .first_truthy(&["source", "$image"])
            .cloned()
            .unwrap_or_default();
        let alt = config.get("alt").cloned().unwrap_or_default();
        Ok(Value::from(format!("<img src=\"{}\" alt=\"{}\">", source, alt)))
    })
}
