use std::any::Any;
use std::collections::HashSet;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::diagnostics::{Diagnostics, NoopDiagnostics};
use crate::element::{Component, ElementRef, Elements};
use crate::error::{ConfigurationError, ExclaimError, ExclaimResult};
use crate::parser::parse_declaration;
use crate::registry::Registry;
use crate::renderer::Renderer;
use crate::value::Value;
use crate::MARKER;

/// Construction options for [`Ui`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct UiOptions {
    /// Escape string config values before they reach a component.
    pub escape_html: bool,
}

impl Default for UiOptions {
    fn default() -> Self {
        UiOptions { escape_html: true }
    }
}

/// Which elements [`Ui::each_element`] yields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ElementFilter {
    All,
    /// Element names, stored without the `$` marker.
    Names(Vec<String>),
}

impl ElementFilter {
    pub fn names<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        ElementFilter::Names(
            names
                .into_iter()
                .map(|name| strip_marker(name.as_ref()).to_string())
                .collect(),
        )
    }

    pub fn matches(&self, name: &str) -> bool {
        match self {
            ElementFilter::All => true,
            ElementFilter::Names(names) => names.iter().any(|n| n == name),
        }
    }
}

fn strip_marker(name: &str) -> &str {
    name.strip_prefix(MARKER).unwrap_or(name)
}

impl From<&str> for ElementFilter {
    fn from(name: &str) -> Self {
        ElementFilter::names([name])
    }
}

impl From<String> for ElementFilter {
    fn from(name: String) -> Self {
        ElementFilter::names([name])
    }
}

impl From<Vec<&str>> for ElementFilter {
    fn from(names: Vec<&str>) -> Self {
        ElementFilter::names(names)
    }
}

impl From<Vec<String>> for ElementFilter {
    fn from(names: Vec<String>) -> Self {
        ElementFilter::names(names)
    }
}

impl<const N: usize> From<[&str; N]> for ElementFilter {
    fn from(names: [&str; N]) -> Self {
        ElementFilter::names(names)
    }
}

/// Parses a declaration once and renders it against any number of
/// environments.
///
/// Lifecycle: a new `Ui` is unconfigured; [`Ui::parse_ui`] moves it to
/// parsed, and parsing again replaces the tree. Rendering and querying an
/// unconfigured `Ui` is a configuration error.
pub struct Ui {
    registry: Registry,
    options: UiOptions,
    diagnostics: Arc<dyn Diagnostics>,
    renderer: Option<Renderer>,
}

impl std::fmt::Debug for Ui {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Ui")
            .field("registry", &self.registry)
            .field("options", &self.options)
            .field("renderer", &self.renderer)
            .finish_non_exhaustive()
    }
}

impl Ui {
    pub fn new(registry: Registry) -> Self {
        Self::with_options(registry, UiOptions::default())
    }

    pub fn with_options(registry: Registry, options: UiOptions) -> Self {
        Ui {
            registry,
            options,
            diagnostics: Arc::new(NoopDiagnostics),
            renderer: None,
        }
    }

    /// Sink for parse warnings. Defaults to [`NoopDiagnostics`].
    pub fn with_diagnostics(mut self, diagnostics: Arc<dyn Diagnostics>) -> Self {
        self.diagnostics = diagnostics;
        self
    }

    pub fn escape_html(mut self, escape_html: bool) -> Self {
        self.options.escape_html = escape_html;
        if let Some(renderer) = self.renderer.as_mut() {
            renderer.set_escape_html(escape_html);
        }
        self
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    pub fn options(&self) -> UiOptions {
        self.options
    }

    pub fn is_parsed(&self) -> bool {
        self.renderer.is_some()
    }

    /// Parse `declaration` and make it the tree this `Ui` renders.
    ///
    /// On failure the previously parsed tree, if any, is kept.
    pub fn parse_ui(&mut self, declaration: &serde_json::Value) -> ExclaimResult<&Component> {
        let root = guard(|| {
            parse_declaration(&self.registry, declaration, self.diagnostics.as_ref())
        })?;
        self.set_parsed_ui(root);
        self.renderer("parse_ui").map(Renderer::root)
    }

    pub fn parsed_ui(&self) -> Option<&Component> {
        self.renderer.as_ref().map(Renderer::root)
    }

    /// Mutable access to the parsed tree, e.g. to replace a config wholesale
    /// between renders.
    pub fn parsed_ui_mut(&mut self) -> Option<&mut Component> {
        self.renderer.as_mut().map(Renderer::root_mut)
    }

    /// Install an already built tree, bypassing the parser.
    pub fn set_parsed_ui(&mut self, root: Component) {
        self.renderer = Some(Renderer::new(root).with_escape_html(self.options.escape_html));
    }

    pub fn render(&self, env: &Value) -> ExclaimResult<Value> {
        let renderer = self
            .renderer
            .as_ref()
            .ok_or(ConfigurationError::RenderNotParsed)?;
        guard(|| renderer.render(env))
    }

    /// Paths of every bind in the parsed tree, first occurrence order, no
    /// duplicates. Only the declaration is inspected, never an environment.
    pub fn unique_bind_paths(&self) -> ExclaimResult<Vec<String>> {
        let root = self.renderer("unique_bind_paths")?.root();
        let mut seen = HashSet::new();
        Ok(root
            .elements()
            .filter_map(|element| match element {
                ElementRef::Bind(bind) => Some(bind.path()),
                _ => None,
            })
            .filter(|path| seen.insert(*path))
            .map(str::to_string)
            .collect())
    }

    /// Raw declarations of the parsed elements matching `filter`, in
    /// pre-order: an element comes before the elements nested in it.
    pub fn each_element(&self, filter: impl Into<ElementFilter>) -> ExclaimResult<EachElement<'_>> {
        let root = self.renderer("each_element")?.root();
        Ok(EachElement {
            elements: root.elements(),
            filter: filter.into(),
        })
    }

    /// Push-style form of [`Ui::each_element`].
    pub fn for_each_element<F>(
        &self,
        filter: impl Into<ElementFilter>,
        mut visitor: F,
    ) -> ExclaimResult<()>
    where
        F: FnMut(&serde_json::Value),
    {
        for declaration in self.each_element(filter)? {
            visitor(declaration);
        }
        Ok(())
    }

    fn renderer(&self, operation: &str) -> ExclaimResult<&Renderer> {
        self.renderer
            .as_ref()
            .ok_or_else(|| ConfigurationError::not_parsed(operation).into())
    }
}

/// Iterator returned by [`Ui::each_element`].
pub struct EachElement<'a> {
    elements: Elements<'a>,
    filter: ElementFilter,
}

impl<'a> Iterator for EachElement<'a> {
    type Item = &'a serde_json::Value;

    fn next(&mut self) -> Option<Self::Item> {
        let filter = &self.filter;
        self.elements
            .find(|element| filter.matches(element.name()))
            .map(|element| element.declaration())
    }
}

/// Run `f`, turning a panic into [`ExclaimError::Internal`].
fn guard<T>(f: impl FnOnce() -> ExclaimResult<T>) -> ExclaimResult<T> {
    panic::catch_unwind(AssertUnwindSafe(f)).unwrap_or_else(|payload| {
        let message = panic_message(payload.as_ref());
        tracing::error!(%message, "internal failure");
        Err(ExclaimError::Internal(message))
    })
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        message.to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic".to_string()
    }
}
