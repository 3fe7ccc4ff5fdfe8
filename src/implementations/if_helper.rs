use crate::implementation::{helper, ImplementationRef};
use crate::value::Value;

/// Picks `then` or `else` depending on `condition`.
///
/// An explicit `condition` key wins even when it holds `false` or `null`; the
/// `$if` shorthand is only consulted when `condition` is absent.
pub fn if_helper() -> ImplementationRef {
    helper(|config, _env| {
        let condition = match config.get("condition") {
            Some(condition) => condition.is_truthy(),
            None => config.get("$if").is_some_and(Value::is_truthy),
        };
        let branch = if condition { "then" } else { "else" };
        Ok(config.get(branch).cloned().unwrap_or_default())
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn run(config: serde_json::Value) -> Value {
        if_helper().call(Value::from(config), &Value::Null, None).unwrap()
    }

    #[test]
    fn test_branches() {
        assert_eq!(run(json!({ "$if": true, "then": "yes", "else": "no" })), Value::from("yes"));
        assert_eq!(run(json!({ "$if": null, "then": "yes", "else": "no" })), Value::from("no"));
        assert_eq!(run(json!({ "$if": false, "then": "yes" })), Value::Null);
    }

    #[test]
    fn test_explicit_condition_wins_over_shorthand() {
        assert_eq!(
            run(json!({ "$if": true, "condition": false, "then": "yes", "else": "no" })),
            Value::from("no")
        );
    }
}
