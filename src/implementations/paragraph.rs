use crate::implementation::{component, ImplementationRef};
use crate::value::Value;

/// Renders each of `sentences` (or `$paragraph`), makes sure each ends with a
/// period and joins them into a `<p>`.
pub fn paragraph() -> ImplementationRef {
    component(|config, env, render_child| {
        let sentences = config
            .first_truthy(&["sentences", "$paragraph"])
            .cloned()
            .unwrap_or_default()
            .into_items();

        let mut rendered = Vec::with_capacity(sentences.len());
        for sentence in &sentences {
            let sentence = render_child(sentence, env)?.to_string();
            if sentence.ends_with('.') {
                rendered.push(sentence);
            } else {
                rendered.push(format!("{}.", sentence));
            }
        }
        Ok(Value::from(format!("<p>{}</p>", rendered.join(" "))))
    })
}
