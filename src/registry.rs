use std::collections::HashMap;
use std::fmt;

use crate::error::{ConfigurationError, ExclaimResult};
use crate::implementation::ImplementationRef;
use crate::MARKER;

/// Whether a registered implementation renders output or computes values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Role {
    Component,
    Helper,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Role::Component => f.write_str("component"),
            Role::Helper => f.write_str("helper"),
        }
    }
}

/// A validated registry entry; the role is computed once at validation.
#[derive(Clone)]
pub struct RegistryEntry {
    pub name: String,
    pub implementation: ImplementationRef,
    pub role: Role,
}

impl fmt::Debug for RegistryEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RegistryEntry")
            .field("name", &self.name)
            .field("role", &self.role)
            .finish_non_exhaustive()
    }
}

/// Validated mapping from element names to implementations.
#[derive(Debug, Clone, Default)]
pub struct Registry {
    entries: HashMap<String, RegistryEntry>,
}

impl Registry {
    /// Validate every `(name, implementation)` pair and build the registry.
    ///
    /// Fails on the first invalid entry: an empty or `$`-prefixed name, a
    /// repeated name, a call signature other than `(config, env[, render_child])`,
    /// or role predicates that are both missing or both agree.
    pub fn new<I, S>(mapping: I) -> ExclaimResult<Self>
    where
        I: IntoIterator<Item = (S, ImplementationRef)>,
        S: Into<String>,
    {
        let mut entries = HashMap::new();
        for (name, implementation) in mapping {
            let name = name.into();
            validate_name(&name)?;
            if entries.contains_key(&name) {
                return Err(ConfigurationError::DuplicateImplementationName { name }.into());
            }
            validate_signature(&name, &implementation)?;
            let role = role_of(&name, &implementation)?;

            tracing::debug!(name = %name, role = %role, "registered implementation");
            entries.insert(
                name.clone(),
                RegistryEntry {
                    name,
                    implementation,
                    role,
                },
            );
        }
        Ok(Registry { entries })
    }

    pub fn get(&self, name: &str) -> Option<&RegistryEntry> {
        self.entries.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    pub fn role(&self, name: &str) -> Option<Role> {
        self.entries.get(name).map(|entry| entry.role)
    }

    /// Registered names, sorted.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.entries.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

fn validate_name(name: &str) -> ExclaimResult<()> {
    if name.is_empty() {
        return Err(ConfigurationError::EmptyImplementationName.into());
    }
    if name.starts_with(MARKER) {
        return Err(ConfigurationError::PrefixedImplementationName {
            name: name.to_string(),
        }
        .into());
    }
    Ok(())
}

fn validate_signature(name: &str, implementation: &ImplementationRef) -> ExclaimResult<()> {
    let signature = implementation.signature();
    if !signature.is_valid() {
        return Err(ConfigurationError::InvalidSignature {
            name: name.to_string(),
            signature: signature.to_string(),
        }
        .into());
    }
    Ok(())
}

/// A single predicate decides the role on its own; with both present they
/// must disagree.
fn role_of(name: &str, implementation: &ImplementationRef) -> ExclaimResult<Role> {
    let role = match (implementation.is_component(), implementation.is_helper()) {
        (None, None) => {
            return Err(ConfigurationError::MissingRolePredicate {
                name: name.to_string(),
            }
            .into())
        }
        (Some(component), Some(helper)) if component == helper => {
            return Err(ConfigurationError::ConflictingRolePredicates {
                name: name.to_string(),
            }
            .into())
        }
        (Some(true), _) | (None, Some(false)) => Role::Component,
        (Some(false), _) | (None, Some(true)) => Role::Helper,
    };
    Ok(role)
}
