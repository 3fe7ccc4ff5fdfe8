//! # Exclaim
//!
//! Declare UIs as JSON-shaped data and render them through pluggable element
//! implementations.
//!
//! ## Features
//! - `$`-marked elements: components, helpers and `$bind` lookups
//! - Registry validation of implementation names, call signatures and roles
//! - HTML escaping of every string a component receives, on by default
//! - Parse once, render against any number of environments
//! - Tree queries: unique bind paths and a filtered element walk
//!
//! ## Example
//! ```ignore
//! use exclaim::{example_registry, Ui, Value};
//! use serde_json::json;
//!
//! let mut ui = Ui::new(example_registry()?);
//! ui.parse_ui(&json!({
//!     "$vbox": [
//!         { "$text": "Hello," },
//!         { "$text": { "$bind": "user.name" } }
//!     ]
//! }))?;
//!
//! let html = ui.render(&Value::from(json!({ "user": { "name": "<Ada>" } })))?;
//! assert!(html.to_string().contains("&lt;Ada&gt;"));
//! ```

pub mod bind;
pub mod diagnostics;
pub mod element;
pub mod error;
pub mod escape;
pub mod implementation;
pub mod implementations;
pub mod parser;
pub mod registry;
pub mod renderer;
pub mod ui;
pub mod value;

/// Prefix that marks a declaration key as an element.
pub const MARKER: char = '$';

// --- Core types ---
pub use bind::Bind;
pub use element::{Component, ElementRef, Elements, Helper, Node};
pub use error::{ConfigurationError, ExclaimError, ExclaimResult};
pub use registry::{Registry, RegistryEntry, Role};
pub use renderer::Renderer;
pub use ui::{EachElement, ElementFilter, Ui, UiOptions};
pub use value::{Map, Opaque, Value};

// --- Plug-in contract ---
pub use implementation::{component, helper, Implementation, ImplementationRef, RenderChild, Signature};
pub use implementations::example_registry;

// --- Parsing, escaping and diagnostics ---
pub use diagnostics::{Diagnostics, NoopDiagnostics, RecordingDiagnostics, TracingDiagnostics};
pub use escape::{escape_html, unescape_html, SafeHtml};
pub use parser::{element_name, parse_declaration};
