use std::sync::Arc;

use crate::element::{Component, Helper, Node};
use crate::error::{ExclaimError, ExclaimResult};
use crate::value::{Map, Value};

/// Walks a parsed element tree against an environment.
///
/// Component configs are resolved into fresh values (binds evaluated,
/// helpers invoked, nested components left for the implementation) and, with
/// escaping on, every string leaf is HTML-escaped before the implementation
/// sees it. Neither the tree nor the environment is modified.
#[derive(Debug, Clone)]
pub struct Renderer {
    root: Component,
    escape_html: bool,
}

impl Renderer {
    pub fn new(root: Component) -> Self {
        Renderer {
            root,
            escape_html: true,
        }
    }

    pub fn with_escape_html(mut self, escape_html: bool) -> Self {
        self.escape_html = escape_html;
        self
    }

    pub fn escape_html(&self) -> bool {
        self.escape_html
    }

    pub fn set_escape_html(&mut self, escape_html: bool) {
        self.escape_html = escape_html;
    }

    pub fn root(&self) -> &Component {
        &self.root
    }

    /// Mutable access so a host can swap configs between renders.
    pub fn root_mut(&mut self) -> &mut Component {
        &mut self.root
    }

    pub fn render(&self, env: &Value) -> ExclaimResult<Value> {
        self.render_component(&self.root, env)
    }

    /// Render any node of the tree.
    ///
    /// Components and helpers get their config resolved and escaped before
    /// their implementation is invoked; only components receive the
    /// render-child callback. Binds, collections and scalars resolve to plain
    /// values.
    pub fn render_element(&self, node: &Node, env: &Value) -> ExclaimResult<Value> {
        match node {
            Node::Component(component) => self.render_component(component, env),
            Node::Helper(helper) => {
                let config = self.prepare_config(&helper.config, env)?;
                self.invoke_helper(helper, config, env)
            }
            other => self.resolve(other, env),
        }
    }

    /// Callback target handed to component implementations.
    fn render_child(&self, child: &Value, env: &Value) -> ExclaimResult<Value> {
        match child {
            Value::Element(component) => self.render_component(component, env),
            other => Ok(other.clone()),
        }
    }

    fn render_component(&self, component: &Component, env: &Value) -> ExclaimResult<Value> {
        tracing::trace!(component = %component.name, "rendering component");
        let config = self.prepare_config(&component.config, env)?;
        let render_child = |child: &Value, env: &Value| self.render_child(child, env);
        component
            .implementation
            .call(config, env, Some(&render_child))
            .map_err(|err| rendering_error(&component.name, err))
    }

    fn invoke_helper(&self, helper: &Helper, config: Value, env: &Value) -> ExclaimResult<Value> {
        tracing::trace!(helper = %helper.name, "invoking helper");
        helper
            .implementation
            .call(config, env, None)
            .map_err(|err| rendering_error(&helper.name, err))
    }

    fn prepare_config(&self, config: &Node, env: &Value) -> ExclaimResult<Value> {
        let resolved = self.resolve(config, env)?;
        Ok(if self.escape_html {
            resolved.escape_html()
        } else {
            resolved
        })
    }

    /// Turn a config node into a value. Helper configs nested here are
    /// resolved but not escaped: escaping applies once, to what finally
    /// reaches a component.
    fn resolve(&self, node: &Node, env: &Value) -> ExclaimResult<Value> {
        match node {
            Node::Component(component) => Ok(Value::Element(Arc::clone(component))),
            Node::Bind(bind) => Ok(bind.evaluate(env)),
            Node::Helper(helper) => {
                let config = self.resolve(&helper.config, env)?;
                self.invoke_helper(helper, config, env)
            }
            Node::Map(map) => map
                .iter()
                .map(|(key, value)| -> ExclaimResult<(String, Value)> {
                    Ok((key.clone(), self.resolve(value, env)?))
                })
                .collect::<ExclaimResult<Map>>()
                .map(Value::Object),
            Node::Sequence(items) => items
                .iter()
                .map(|item| self.resolve(item, env))
                .collect::<ExclaimResult<Vec<_>>>()
                .map(Value::Array),
            Node::Scalar(scalar) => Ok(Value::from(scalar)),
        }
    }
}

/// Errors the core raised further down (for example from a nested
/// `render_child`) pass through; anything else came from the implementation.
fn rendering_error(element: &str, err: anyhow::Error) -> ExclaimError {
    match err.downcast::<ExclaimError>() {
        Ok(err) => err,
        Err(err) => {
            tracing::debug!(element, error = %err, "implementation failed");
            ExclaimError::Rendering {
                element: element.to_string(),
                message: err.to_string(),
            }
        }
    }
}
