use std::fmt;
use std::sync::Arc;

use indexmap::IndexMap;

use crate::bind::Bind;
use crate::implementation::ImplementationRef;

/// A node of a parsed declaration tree.
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    Bind(Bind),
    Helper(Box<Helper>),
    /// Shared so a render can hand the subtree to a parent implementation
    /// without copying it.
    Component(Arc<Component>),
    /// A map holding no element marker; keys keep their declaration order.
    Map(IndexMap<String, Node>),
    Sequence(Vec<Node>),
    /// `null`, boolean, number or string, exactly as declared.
    Scalar(serde_json::Value),
}

impl Node {
    /// The element this node is, if it is one.
    pub fn as_element(&self) -> Option<ElementRef<'_>> {
        match self {
            Node::Bind(bind) => Some(ElementRef::Bind(bind)),
            Node::Helper(helper) => Some(ElementRef::Helper(helper)),
            Node::Component(component) => Some(ElementRef::Component(component)),
            _ => None,
        }
    }

    /// Pre-order walk over every element in this subtree.
    pub fn elements(&self) -> Elements<'_> {
        Elements {
            stack: vec![Frame::Node(self)],
        }
    }
}

impl Default for Node {
    fn default() -> Self {
        Node::Map(IndexMap::new())
    }
}

impl From<Helper> for Node {
    fn from(helper: Helper) -> Self {
        Node::Helper(Box::new(helper))
    }
}

impl From<Component> for Node {
    fn from(component: Component) -> Self {
        Node::Component(Arc::new(component))
    }
}

/// An element that computes an intermediate value for its parent's config.
#[derive(Clone)]
pub struct Helper {
    pub name: String,
    pub implementation: ImplementationRef,
    pub config: Node,
    pub declaration: serde_json::Value,
}

/// An element whose implementation produces rendered output and may render
/// the elements nested in its config.
#[derive(Clone)]
pub struct Component {
    pub name: String,
    pub implementation: ImplementationRef,
    pub config: Node,
    pub declaration: serde_json::Value,
}

impl Helper {
    /// A helper with an empty config and no raw declaration.
    pub fn new(name: impl Into<String>, implementation: ImplementationRef) -> Self {
        Helper {
            name: name.into(),
            implementation,
            config: Node::default(),
            declaration: serde_json::Value::Null,
        }
    }

    pub fn with_config(mut self, config: Node) -> Self {
        self.config = config;
        self
    }
}

impl Component {
    /// A component with an empty config and no raw declaration.
    pub fn new(name: impl Into<String>, implementation: ImplementationRef) -> Self {
        Component {
            name: name.into(),
            implementation,
            config: Node::default(),
            declaration: serde_json::Value::Null,
        }
    }

    pub fn with_config(mut self, config: Node) -> Self {
        self.config = config;
        self
    }

    /// Pre-order walk over this component and every element below it.
    pub fn elements(&self) -> Elements<'_> {
        Elements {
            stack: vec![Frame::Element(ElementRef::Component(self))],
        }
    }
}

impl fmt::Debug for Helper {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Helper")
            .field("name", &self.name)
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl fmt::Debug for Component {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Component")
            .field("name", &self.name)
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl PartialEq for Helper {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
            && Arc::ptr_eq(&self.implementation, &other.implementation)
            && self.config == other.config
            && self.declaration == other.declaration
    }
}

impl PartialEq for Component {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
            && Arc::ptr_eq(&self.implementation, &other.implementation)
            && self.config == other.config
            && self.declaration == other.declaration
    }
}

/// Borrowed view of a Bind, Helper or Component.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ElementRef<'a> {
    Bind(&'a Bind),
    Helper(&'a Helper),
    Component(&'a Component),
}

impl<'a> ElementRef<'a> {
    /// Registry name of the element; binds are named `bind`.
    pub fn name(&self) -> &'a str {
        match self {
            ElementRef::Bind(_) => "bind",
            ElementRef::Helper(helper) => &helper.name,
            ElementRef::Component(component) => &component.name,
        }
    }

    /// The raw declaration the element was parsed from.
    pub fn declaration(&self) -> &'a serde_json::Value {
        match self {
            ElementRef::Bind(bind) => &bind.declaration,
            ElementRef::Helper(helper) => &helper.declaration,
            ElementRef::Component(component) => &component.declaration,
        }
    }

    fn config(&self) -> Option<&'a Node> {
        match self {
            ElementRef::Bind(_) => None,
            ElementRef::Helper(helper) => Some(&helper.config),
            ElementRef::Component(component) => Some(&component.config),
        }
    }
}

enum Frame<'a> {
    Element(ElementRef<'a>),
    Node(&'a Node),
}

/// Iterator returned by [`Node::elements`] and [`Component::elements`].
/// An element is yielded before anything nested in its config.
pub struct Elements<'a> {
    stack: Vec<Frame<'a>>,
}

impl<'a> Iterator for Elements<'a> {
    type Item = ElementRef<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        while let Some(frame) = self.stack.pop() {
            let node = match frame {
                Frame::Element(element) => {
                    if let Some(config) = element.config() {
                        self.stack.push(Frame::Node(config));
                    }
                    return Some(element);
                }
                Frame::Node(node) => node,
            };

            match node {
                Node::Bind(bind) => return Some(ElementRef::Bind(bind)),
                Node::Helper(helper) => {
                    self.stack.push(Frame::Node(&helper.config));
                    return Some(ElementRef::Helper(helper));
                }
                Node::Component(component) => {
                    self.stack.push(Frame::Node(&component.config));
                    return Some(ElementRef::Component(component));
                }
                Node::Map(map) => self.stack.extend(map.values().rev().map(Frame::Node)),
                Node::Sequence(items) => self.stack.extend(items.iter().rev().map(Frame::Node)),
                Node::Scalar(_) => {}
            }
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::implementation::{component, helper};
    use crate::value::Value;
    use pretty_assertions::assert_eq;

    fn map(entries: Vec<(&str, Node)>) -> Node {
        Node::Map(
            entries
                .into_iter()
                .map(|(key, node)| (key.to_string(), node))
                .collect(),
        )
    }

    #[test]
    fn test_elements_pre_order() {
        let noop = component(|_config, _env, _render_child| Ok(Value::Null));
        let join = helper(|_config, _env| Ok(Value::Null));

        let child = Component::new("child", noop.clone()).with_config(map(vec![(
            "label",
            Node::Bind(Bind::new("label")),
        )]));
        let root = Component::new("root", noop).with_config(map(vec![
            ("first", Node::Bind(Bind::new("a"))),
            (
                "helper",
                Node::from(Helper::new("join", join).with_config(map(vec![(
                    "items",
                    Node::Sequence(vec![Node::Bind(Bind::new("b")), Node::Scalar("x".into())]),
                )]))),
            ),
            ("children", Node::Sequence(vec![Node::from(child)])),
        ]));

        let names: Vec<&str> = root.elements().map(|e| e.name()).collect();
        assert_eq!(names, vec!["root", "bind", "join", "bind", "child", "bind"]);
    }

    #[test]
    fn test_cloned_tree_shares_nested_components() {
        let noop = component(|_config, _env, _render_child| Ok(Value::Null));
        let leaf = Component::new("leaf", noop.clone());
        let inner = Helper::new("pick", helper(|config, _env| Ok(config)))
            .with_config(map(vec![("then", Node::from(leaf))]));
        let node = Node::from(
            Component::new("root", noop).with_config(map(vec![("child", Node::from(inner))])),
        );

        let copy = node.clone();
        let (Node::Component(a), Node::Component(b)) = (&node, &copy) else {
            panic!("expected components");
        };
        assert!(Arc::ptr_eq(a, b));
        let names: Vec<&str> = copy.elements().map(|e| e.name()).collect();
        assert_eq!(names, vec!["root", "pick", "leaf"]);
    }

    #[test]
    fn test_scalar_tree_has_no_elements() {
        let node = Node::Sequence(vec![Node::Scalar(serde_json::json!(1)), Node::default()]);
        assert_eq!(node.elements().count(), 0);
    }

    #[test]
    fn test_equality_compares_implementation_identity() {
        let a = component(|_config, _env, _render_child| Ok(Value::Null));
        let b = component(|_config, _env, _render_child| Ok(Value::Null));
        assert_eq!(Component::new("x", a.clone()), Component::new("x", a.clone()));
        assert_ne!(Component::new("x", a), Component::new("x", b));
    }
}
