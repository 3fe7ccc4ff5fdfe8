//! Reference element implementations.
//!
//! These are ordinary users of the plug-in contract and double as examples of
//! how to write one. Components render to strings of HTML; `each` and `let`
//! show how to render children against a derived environment.

mod each;
mod if_helper;
mod image;
mod join;
mod let_component;
mod paragraph;
mod text;
mod vbox;

pub use each::each;
pub use if_helper::if_helper;
pub use image::image;
pub use join::join;
pub use let_component::let_component;
pub use paragraph::paragraph;
pub use text::text;
pub use vbox::vbox;

use crate::error::ExclaimResult;
use crate::registry::Registry;

/// Registry holding every reference implementation under its usual name.
pub fn example_registry() -> ExclaimResult<Registry> {
    Registry::new([
        ("each", each()),
        ("image", image()),
        ("if", if_helper()),
        ("join", join()),
        ("let", let_component()),
        ("paragraph", paragraph()),
        ("text", text()),
        ("vbox", vbox()),
    ])
}

/// Terminate every line with `\n`, leaving lines that already end in one.
pub(crate) fn ensure_trailing_newline(line: &str) -> String {
    if line.ends_with('\n') {
        line.to_string()
    } else {
        format!("{}\n", line)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::Role;

    #[test]
    fn test_example_registry_roles() {
        let registry = example_registry().unwrap();
        assert_eq!(
            registry.names(),
            vec!["each", "if", "image", "join", "let", "paragraph", "text", "vbox"]
        );
        for name in ["each", "image", "let", "paragraph", "text", "vbox"] {
            assert_eq!(registry.role(name), Some(Role::Component), "{}", name);
        }
        for name in ["if", "join"] {
            assert_eq!(registry.role(name), Some(Role::Helper), "{}", name);
        }
    }
}
