use std::fmt;

/// Escape the characters that are significant in HTML markup: `& < > " '`.
pub fn escape_html(input: &str) -> String {
    let mut escaped = String::with_capacity(input.len());
    for ch in input.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            other => escaped.push(other),
        }
    }
    escaped
}

/// Reverse [`escape_html`]. Implementations that trust a config value can use
/// this to restore the markup a declaration author wrote.
pub fn unescape_html(input: &str) -> String {
    const ENTITIES: &[(&str, char)] = &[
        ("&amp;", '&'),
        ("&lt;", '<'),
        ("&gt;", '>'),
        ("&quot;", '"'),
        ("&#39;", '\''),
        ("&#x27;", '\''),
    ];

    let mut out = String::with_capacity(input.len());
    let mut rest = input;
    while let Some(pos) = rest.find('&') {
        out.push_str(&rest[..pos]);
        rest = &rest[pos..];
        match ENTITIES.iter().find(|(entity, _)| rest.starts_with(entity)) {
            Some((entity, ch)) => {
                out.push(*ch);
                rest = &rest[entity.len()..];
            }
            None => {
                out.push('&');
                rest = &rest[1..];
            }
        }
    }
    out.push_str(rest);
    out
}

/// Markup a helper vouches for. Wrapped in [`crate::Value::Opaque`] it passes
/// through config escaping untouched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SafeHtml(String);

impl SafeHtml {
    pub fn new(html: impl Into<String>) -> Self {
        SafeHtml(html.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SafeHtml {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_markup_characters() {
        assert_eq!(
            escape_html(r#"<script>alert("Hi & 'bye'");</script>"#),
            "&lt;script&gt;alert(&quot;Hi &amp; &#39;bye&#39;&quot;);&lt;/script&gt;"
        );
    }

    #[test]
    fn test_escape_leaves_plain_text_alone() {
        assert_eq!(escape_html("Buenos Días"), "Buenos Días");
    }

    #[test]
    fn test_unescape_restores_escaped_markup() {
        let original = "<img src='a.png?x=1&y=2'>";
        assert_eq!(unescape_html(&escape_html(original)), original);
    }

    #[test]
    fn test_unescape_keeps_unknown_entities() {
        assert_eq!(unescape_html("&nbsp;&amp"), "&nbsp;&amp");
    }
}
