use std::any::Any;
use std::fmt;
use std::sync::Arc;

use indexmap::IndexMap;
use serde_json::Number;

use crate::element::Component;
use crate::escape::{escape_html, SafeHtml};

/// Ordered map used for object values; iteration follows insertion order.
pub type Map = IndexMap<String, Value>;

/// Runtime value shared by environments, resolved element configs and
/// implementation output.
///
/// Besides the JSON shapes it carries two kinds the renderer never looks
/// inside: [`Value::Element`], a nested component handed unevaluated to its
/// parent's implementation, and [`Value::Opaque`], an arbitrary wrapper
/// produced by an implementation.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum Value {
    #[default]
    Null,
    Bool(bool),
    Number(Number),
    String(String),
    Array(Vec<Value>),
    Object(Map),
    Element(Arc<Component>),
    Opaque(Opaque),
}

impl Value {
    pub fn opaque<T: Any + Send + Sync>(value: T) -> Self {
        Value::Opaque(Opaque::new(value))
    }

    pub fn safe_html(html: impl Into<String>) -> Self {
        Value::opaque(SafeHtml::new(html))
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// `null` and `false` are falsy, everything else is truthy.
    pub fn is_truthy(&self) -> bool {
        !matches!(self, Value::Null | Value::Bool(false))
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&Vec<Value>> {
        match self {
            Value::Array(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_object(&self) -> Option<&Map> {
        match self {
            Value::Object(map) => Some(map),
            _ => None,
        }
    }

    pub fn as_opaque(&self) -> Option<&Opaque> {
        match self {
            Value::Opaque(opaque) => Some(opaque),
            _ => None,
        }
    }

    /// Look up `key` when this value is an object.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.as_object().and_then(|map| map.get(key))
    }

    /// First of `keys` holding a truthy value.
    pub fn first_truthy(&self, keys: &[&str]) -> Option<&Value> {
        keys.iter()
            .filter_map(|key| self.get(key))
            .find(|value| value.is_truthy())
    }

    /// Items of an array, an empty list for `null`, or the value on its own.
    pub fn into_items(self) -> Vec<Value> {
        match self {
            Value::Array(items) => items,
            Value::Null => Vec::new(),
            other => vec![other],
        }
    }

    /// Escape every string leaf, recursing through arrays and objects.
    ///
    /// Numbers, booleans and null are left alone, as are elements and opaque
    /// values: those are trusted to the implementation that produced them.
    pub fn escape_html(self) -> Self {
        match self {
            Value::String(s) => Value::String(escape_html(&s)),
            Value::Array(items) => Value::Array(items.into_iter().map(Value::escape_html).collect()),
            Value::Object(map) => Value::Object(
                map.into_iter()
                    .map(|(key, value)| (key, value.escape_html()))
                    .collect(),
            ),
            other => other,
        }
    }

    /// Short name of the value's shape, used in error messages.
    pub fn kind(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Bool(_) => "boolean",
            Value::Number(_) => "number",
            Value::String(_) => "string",
            Value::Array(_) => "array",
            Value::Object(_) => "map",
            Value::Element(_) => "element",
            Value::Opaque(_) => "opaque",
        }
    }
}

/// Text form of a value: strings verbatim, `null` empty, arrays joined
/// without a separator.
impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => Ok(()),
            Value::Bool(b) => write!(f, "{}", b),
            Value::Number(n) => write!(f, "{}", n),
            Value::String(s) => f.write_str(s),
            Value::Array(items) => items.iter().try_for_each(|item| write!(f, "{}", item)),
            Value::Object(map) => {
                let json = serde_json::Value::Object(
                    map.iter()
                        .map(|(key, value)| (key.clone(), value.to_json()))
                        .collect(),
                );
                write!(f, "{}", json)
            }
            Value::Element(component) => write!(f, "<{}>", component.name),
            Value::Opaque(opaque) => match opaque.downcast_ref::<SafeHtml>() {
                Some(html) => write!(f, "{}", html),
                None => Ok(()),
            },
        }
    }
}

impl Value {
    /// Lossy conversion back to JSON. Elements and opaque values have no JSON
    /// form and become their text form.
    pub fn to_json(&self) -> serde_json::Value {
        match self {
            Value::Null => serde_json::Value::Null,
            Value::Bool(b) => serde_json::Value::Bool(*b),
            Value::Number(n) => serde_json::Value::Number(n.clone()),
            Value::String(s) => serde_json::Value::String(s.clone()),
            Value::Array(items) => serde_json::Value::Array(items.iter().map(Value::to_json).collect()),
            Value::Object(map) => serde_json::Value::Object(
                map.iter()
                    .map(|(key, value)| (key.clone(), value.to_json()))
                    .collect(),
            ),
            other => serde_json::Value::String(other.to_string()),
        }
    }
}

impl From<&serde_json::Value> for Value {
    fn from(value: &serde_json::Value) -> Self {
        match value {
            serde_json::Value::Null => Value::Null,
            serde_json::Value::Bool(b) => Value::Bool(*b),
            serde_json::Value::Number(n) => Value::Number(n.clone()),
            serde_json::Value::String(s) => Value::String(s.clone()),
            serde_json::Value::Array(items) => Value::Array(items.iter().map(Value::from).collect()),
            serde_json::Value::Object(map) => Value::Object(
                map.iter()
                    .map(|(key, value)| (key.clone(), Value::from(value)))
                    .collect(),
            ),
        }
    }
}

impl From<serde_json::Value> for Value {
    fn from(value: serde_json::Value) -> Self {
        Value::from(&value)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Number(n.into())
    }
}

impl From<Vec<Value>> for Value {
    fn from(items: Vec<Value>) -> Self {
        Value::Array(items)
    }
}

impl From<Map> for Value {
    fn from(map: Map) -> Self {
        Value::Object(map)
    }
}

impl From<Component> for Value {
    fn from(component: Component) -> Self {
        Value::Element(Arc::new(component))
    }
}

/// Implementation-defined payload. Compared by identity.
#[derive(Clone)]
pub struct Opaque(Arc<dyn Any + Send + Sync>);

impl Opaque {
    pub fn new<T: Any + Send + Sync>(value: T) -> Self {
        Opaque(Arc::new(value))
    }

    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        self.0.downcast_ref::<T>()
    }
}

impl fmt::Debug for Opaque {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Opaque(..)")
    }
}

impl PartialEq for Opaque {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}
