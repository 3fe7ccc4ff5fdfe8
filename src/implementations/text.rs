use crate::implementation::{component, ImplementationRef};

/// `{"$text": ...}` or `{"$component": "text", "content": ...}`: the content
/// value itself.
pub fn text() -> ImplementationRef {
    component(|config, _env, _render_child| {
        Ok(config
            .first_truthy(&["content", "$text"])
            .cloned()
            .unwrap_or_default())
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::Value;
    use serde_json::json;

    #[test]
    fn test_content_or_shorthand() {
        let text = text();
        let out = text
            .call(Value::from(json!({ "$text": "hello" })), &Value::Null, None)
            .unwrap();
        assert_eq!(out, Value::from("hello"));

        let out = text
            .call(Value::from(json!({ "content": "explicit" })), &Value::Null, None)
            .unwrap();
        assert_eq!(out, Value::from("explicit"));
    }
}
