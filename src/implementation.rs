use std::fmt;
use std::sync::Arc;

use crate::error::ExclaimResult;
use crate::value::Value;

/// Callback a component receives to render a nested config value against an
/// environment. Nested components ([`Value::Element`]) are rendered through
/// their own implementation; any other value comes back unchanged.
pub type RenderChild<'a> = dyn Fn(&Value, &Value) -> ExclaimResult<Value> + 'a;

/// Shared handle to a registered implementation.
pub type ImplementationRef = Arc<dyn Implementation>;

/// The plug-in contract every registered element implementation satisfies.
///
/// `call` receives the resolved (and, by default, HTML-escaped) config, the
/// environment, and for components a [`RenderChild`] callback.
///
/// An implementation declares its role through `is_component` / `is_helper`.
/// At least one must answer, and if both answer they must disagree. The role
/// is read once when the [`crate::Registry`] is built.
pub trait Implementation: Send + Sync {
    fn call(
        &self,
        config: Value,
        env: &Value,
        render_child: Option<&RenderChild<'_>>,
    ) -> anyhow::Result<Value>;

    /// Shape of the call surface. Native implementations keep the default;
    /// bridges to scripted functions report what the script declared.
    fn signature(&self) -> Signature {
        Signature::CONFIG_ENV
    }

    fn is_component(&self) -> Option<bool> {
        None
    }

    fn is_helper(&self) -> Option<bool> {
        None
    }
}

/// Parameters an implementation's call surface accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Signature {
    /// Required positional inputs.
    pub positional: usize,
    /// Whether a render-child callback is accepted.
    pub render_child: bool,
}

impl Signature {
    pub const CONFIG_ENV: Signature = Signature {
        positional: 2,
        render_child: false,
    };

    pub const CONFIG_ENV_RENDER_CHILD: Signature = Signature {
        positional: 2,
        render_child: true,
    };

    pub fn is_valid(&self) -> bool {
        self.positional == 2
    }
}

impl fmt::Display for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} positional parameter{}",
            self.positional,
            if self.positional == 1 { "" } else { "s" }
        )?;
        if self.render_child {
            f.write_str(" and a render_child callback")?;
        }
        Ok(())
    }
}

// ─── Closure-backed implementations ─────────────────────────────────────────

/// A component implemented by a closure taking `(config, env, render_child)`.
pub struct ComponentFn<F>(F);

impl<F> Implementation for ComponentFn<F>
where
    F: Fn(Value, &Value, &RenderChild<'_>) -> anyhow::Result<Value> + Send + Sync,
{
    fn call(
        &self,
        config: Value,
        env: &Value,
        render_child: Option<&RenderChild<'_>>,
    ) -> anyhow::Result<Value> {
        match render_child {
            Some(render_child) => (self.0)(config, env, render_child),
            None => (self.0)(config, env, &|child: &Value, _env: &Value| Ok(child.clone())),
        }
    }

    fn signature(&self) -> Signature {
        Signature::CONFIG_ENV_RENDER_CHILD
    }

    fn is_component(&self) -> Option<bool> {
        Some(true)
    }
}

/// A helper implemented by a closure taking `(config, env)`.
pub struct HelperFn<F>(F);

impl<F> Implementation for HelperFn<F>
where
    F: Fn(Value, &Value) -> anyhow::Result<Value> + Send + Sync,
{
    fn call(
        &self,
        config: Value,
        env: &Value,
        _render_child: Option<&RenderChild<'_>>,
    ) -> anyhow::Result<Value> {
        (self.0)(config, env)
    }

    fn is_helper(&self) -> Option<bool> {
        Some(true)
    }
}

/// Wrap a closure as a component implementation.
pub fn component<F>(f: F) -> ImplementationRef
where
    F: Fn(Value, &Value, &RenderChild<'_>) -> anyhow::Result<Value> + Send + Sync + 'static,
{
    Arc::new(ComponentFn(f))
}

/// Wrap a closure as a helper implementation.
pub fn helper<F>(f: F) -> ImplementationRef
where
    F: Fn(Value, &Value) -> anyhow::Result<Value> + Send + Sync + 'static,
{
    Arc::new(HelperFn(f))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_closure_roles() {
        let text = component(|config, _env, _render_child| Ok(config));
        assert_eq!(text.is_component(), Some(true));
        assert_eq!(text.is_helper(), None);
        assert_eq!(text.signature(), Signature::CONFIG_ENV_RENDER_CHILD);

        let join = helper(|config, _env| Ok(config));
        assert_eq!(join.is_helper(), Some(true));
        assert_eq!(join.is_component(), None);
        assert_eq!(join.signature(), Signature::CONFIG_ENV);
    }

    #[test]
    fn test_component_without_callback_returns_children_as_is() {
        let first = component(|config, env, render_child| {
            let child = config.into_items().into_iter().next().unwrap_or_default();
            Ok(render_child(&child, env)?)
        });
        let out = first
            .call(Value::from(vec![Value::from("a")]), &Value::Null, None)
            .unwrap();
        assert_eq!(out, Value::from("a"));
    }

    #[test]
    fn test_signature_display() {
        assert_eq!(Signature::CONFIG_ENV.to_string(), "2 positional parameters");
        assert_eq!(
            Signature { positional: 1, render_child: true }.to_string(),
            "1 positional parameter and a render_child callback"
        );
    }
}
