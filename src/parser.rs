use std::fmt;
use std::sync::Arc;

use indexmap::IndexMap;
use serde_json::{Map, Value as JsonValue};

use crate::bind::{json_kind, Bind};
use crate::diagnostics::Diagnostics;
use crate::element::{Component, Helper, Node};
use crate::error::{ConfigurationError, ExclaimResult};
use crate::registry::{Registry, RegistryEntry, Role};
use crate::MARKER;

pub const COMPONENT_KEY: &str = "$component";
pub const HELPER_KEY: &str = "$helper";
pub const BIND_KEY: &str = "$bind";

const RESERVED_KEYS: [&str; 3] = [COMPONENT_KEY, HELPER_KEY, BIND_KEY];

// ─── Public parse functions ──────────────────────────────────────────────────

/// Parse a declaration into an element tree rooted in a component.
pub fn parse_declaration(
    registry: &Registry,
    declaration: &JsonValue,
    diagnostics: &dyn Diagnostics,
) -> ExclaimResult<Component> {
    if !declaration.is_object() {
        return Err(ConfigurationError::DeclarationNotAMap {
            kind: json_kind(declaration).to_string(),
        }
        .into());
    }

    let parser = Parser {
        registry,
        diagnostics,
    };
    match parser.parse_value(declaration)? {
        Node::Component(component) => {
            tracing::debug!(root = %component.name, "parsed declaration");
            Ok(Arc::unwrap_or_clone(component))
        }
        _ => Err(ConfigurationError::TopLevelNotComponent.into()),
    }
}

/// Name of the element a raw declaration map declares, without consulting a
/// registry: explicit `$component`, then `$helper`, then `bind` for `$bind`,
/// then the first `$`-prefixed key with the marker removed.
pub fn element_name(declaration: &JsonValue) -> Option<&str> {
    let Some(map) = declaration.as_object() else {
        tracing::warn!(
            "element_name can only determine name from a map, given {} value",
            json_kind(declaration)
        );
        return None;
    };

    if let Some(name) = map.get(COMPONENT_KEY) {
        return name.as_str();
    }
    if let Some(name) = map.get(HELPER_KEY) {
        return name.as_str();
    }
    if map.contains_key(BIND_KEY) {
        return Some("bind");
    }
    map.keys().find_map(|key| key.strip_prefix(MARKER))
}

// ─── Parser ──────────────────────────────────────────────────────────────────

/// An element found at one level of a declaration.
#[derive(Debug, Clone, Copy)]
enum Candidate<'r> {
    Named(&'r RegistryEntry),
    Bind,
}

impl fmt::Display for Candidate<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Candidate::Named(entry) => f.write_str(&entry.name),
            Candidate::Bind => f.write_str("bind"),
        }
    }
}

struct Parser<'a> {
    registry: &'a Registry,
    diagnostics: &'a dyn Diagnostics,
}

impl<'a> Parser<'a> {
    fn parse_value(&self, value: &JsonValue) -> ExclaimResult<Node> {
        match value {
            JsonValue::Object(map) => self.parse_map(map, value),
            JsonValue::Array(items) => items
                .iter()
                .map(|item| self.parse_value(item))
                .collect::<ExclaimResult<Vec<_>>>()
                .map(Node::Sequence),
            scalar => Ok(Node::Scalar(scalar.clone())),
        }
    }

    fn parse_map(
        &self,
        map: &Map<String, JsonValue>,
        declaration: &JsonValue,
    ) -> ExclaimResult<Node> {
        match self.element_candidate(map)? {
            None => map
                .iter()
                .map(|(key, value)| -> ExclaimResult<(String, Node)> {
                    Ok((key.clone(), self.parse_value(value)?))
                })
                .collect::<ExclaimResult<IndexMap<_, _>>>()
                .map(Node::Map),
            Some(Candidate::Bind) => {
                let path = map.get(BIND_KEY).unwrap_or(&JsonValue::Null);
                Bind::from_declaration(path, declaration.clone()).map(Node::Bind)
            }
            Some(Candidate::Named(entry)) => self.parse_element(entry, map, declaration),
        }
    }

    fn parse_element(
        &self,
        entry: &RegistryEntry,
        map: &Map<String, JsonValue>,
        declaration: &JsonValue,
    ) -> ExclaimResult<Node> {
        let config = self.parse_element_config(map)?;
        let name = entry.name.clone();
        let implementation = entry.implementation.clone();
        let declaration = declaration.clone();

        Ok(match entry.role {
            Role::Component => Node::from(Component {
                name,
                implementation,
                config,
                declaration,
            }),
            Role::Helper => Node::from(Helper {
                name,
                implementation,
                config,
                declaration,
            }),
        })
    }

    /// Explicit element names are identifiers, so their values are kept as
    /// declared; everything else is parsed.
    fn parse_element_config(&self, map: &Map<String, JsonValue>) -> ExclaimResult<Node> {
        map.iter()
            .map(|(key, value)| -> ExclaimResult<(String, Node)> {
                let node = if key == COMPONENT_KEY || key == HELPER_KEY {
                    Node::Scalar(value.clone())
                } else {
                    self.parse_value(value)?
                };
                Ok((key.clone(), node))
            })
            .collect::<ExclaimResult<IndexMap<_, _>>>()
            .map(Node::Map)
    }

    /// Collect candidates in a fixed order: shorthand keys as declared, the
    /// explicit component, the explicit helper, then `bind`. More than one is
    /// an error.
    fn element_candidate(
        &self,
        map: &Map<String, JsonValue>,
    ) -> ExclaimResult<Option<Candidate<'a>>> {
        let mut candidates = Vec::new();

        for key in map.keys() {
            let Some(name) = key.strip_prefix(MARKER) else {
                continue;
            };
            if RESERVED_KEYS.contains(&key.as_str()) {
                continue;
            }
            if let Some(entry) = self.registry.get(name) {
                candidates.push(Candidate::Named(entry));
            } else {
                self.diagnostics.warn(&format!(
                    "ui_config includes key \"{}\" which has no matching implementation",
                    key
                ));
            }
        }

        for key in [COMPONENT_KEY, HELPER_KEY] {
            if let Some(entry) = self.explicit_entry(map, key)? {
                candidates.push(Candidate::Named(entry));
            }
        }

        if map.contains_key(BIND_KEY) {
            candidates.push(Candidate::Bind);
        }

        if candidates.len() > 1 {
            return Err(ConfigurationError::AmbiguousElements {
                candidates: candidates.iter().map(Candidate::to_string).collect(),
            }
            .into());
        }
        Ok(candidates.pop())
    }

    fn explicit_entry(
        &self,
        map: &Map<String, JsonValue>,
        key: &str,
    ) -> ExclaimResult<Option<&'a RegistryEntry>> {
        let name = match map.get(key) {
            None | Some(JsonValue::Null) => return Ok(None),
            Some(JsonValue::String(name)) => name,
            Some(other) => {
                return Err(ConfigurationError::ExplicitNameNotString {
                    key: key.to_string(),
                    found: json_kind(other).to_string(),
                }
                .into())
            }
        };

        if name.starts_with(MARKER) {
            return Err(ConfigurationError::PrefixedExplicitName {
                key: key.to_string(),
                name: name.clone(),
            }
            .into());
        }
        match self.registry.get(name) {
            Some(entry) => Ok(Some(entry)),
            None => Err(ConfigurationError::UnknownExplicitName {
                key: key.to_string(),
                name: name.clone(),
            }
            .into()),
        }
    }
}
