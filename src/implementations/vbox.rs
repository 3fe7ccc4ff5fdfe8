use crate::implementation::{component, ImplementationRef};
use crate::value::Value;

use super::ensure_trailing_newline;

const INDENT: &str = "  ";

/// Vertical flex box. Each rendered child is indented one level, one line
/// per output line.
pub fn vbox() -> ImplementationRef {
    component(|config, env, render_child| {
        let children = config
            .first_truthy(&["children", "$vbox"])
            .cloned()
            .unwrap_or_default()
            .into_items();

        let mut lines = vec!["<div style=\"display: flex; flex-flow: column\">".to_string()];
        for child in &children {
            let rendered = render_child(child, env)?.to_string();
            lines.extend(
                rendered
                    .split_inclusive('\n')
                    .map(|line| format!("{}{}", INDENT, line)),
            );
        }
        lines.push("</div>".to_string());

        Ok(Value::from(
            lines
                .iter()
                .map(|line| ensure_trailing_newline(line))
                .collect::<String>(),
        ))
    })
}
