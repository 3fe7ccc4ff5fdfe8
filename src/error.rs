use thiserror::Error;

pub type ExclaimResult<T> = Result<T, ExclaimError>;

/// Every failure surfaced by the crate. Callers that only care whether
/// something went wrong can match on `ExclaimError` as a whole.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ExclaimError {
    #[error(transparent)]
    Configuration(#[from] ConfigurationError),

    /// A plug-in implementation failed while rendering. `message` is the
    /// plug-in's own error message, untouched.
    #[error("{message}")]
    Rendering { element: String, message: String },

    /// A failure the core did not anticipate, i.e. a defect in the core.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl ExclaimError {
    pub fn is_configuration(&self) -> bool {
        matches!(self, ExclaimError::Configuration(_))
    }

    pub fn is_rendering(&self) -> bool {
        matches!(self, ExclaimError::Rendering { .. })
    }

    pub fn is_internal(&self) -> bool {
        matches!(self, ExclaimError::Internal(_))
    }
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigurationError {
    // --- registry errors ---

    #[error("implementation name cannot be the empty string")]
    EmptyImplementationName,

    #[error("implementation key '{name}' must not start with the $ symbol, use the un-prefixed name")]
    PrefixedImplementationName { name: String },

    #[error("implementation '{name}' is registered more than once")]
    DuplicateImplementationName { name: String },

    #[error(
        "implementation for '{name}' must accept two positional parameters for config and env, \
         and optionally a render_child callback. Actual signature: {signature}"
    )]
    InvalidSignature { name: String, signature: String },

    #[error("implementation for '{name}' must provide a component? or helper? predicate method")]
    MissingRolePredicate { name: String },

    #[error("implementation for '{name}' must provide opposite truth values for component? and helper? methods")]
    ConflictingRolePredicates { name: String },

    // --- declaration errors ---

    #[error("ui_config must be a map, given: {kind}")]
    DeclarationNotAMap { kind: String },

    #[error("ui_config must declare a component at the top-level that is present in implementation_map")]
    TopLevelNotComponent,

    #[error("Multiple Exclaim elements defined at one configuration level: {candidates:?}. Only one allowed.")]
    AmbiguousElements { candidates: Vec<String> },

    #[error("Invalid: \"{key}\": \"{name}\", when declaring explicit \"{key}\" do not prefix the name with \"$\"")]
    PrefixedExplicitName { key: String, name: String },

    #[error("ui_config declares \"{key}\": \"{name}\" which has no matching implementation")]
    UnknownExplicitName { key: String, name: String },

    #[error("\"{key}\" name must be a string, found {found}")]
    ExplicitNameNotString { key: String, found: String },

    #[error("$bind path must be a string, found {found}")]
    BindPathNotString { found: String },

    // --- facade errors ---

    #[error("Cannot render without UI configured, must call Ui::parse_ui(ui_config) first")]
    RenderNotParsed,

    #[error("Cannot compute {operation} without UI configured, must call Ui::parse_ui(ui_config) first")]
    NotParsed { operation: String },
}

impl ConfigurationError {
    pub(crate) fn not_parsed(operation: &str) -> Self {
        ConfigurationError::NotParsed {
            operation: operation.to_string(),
        }
    }
}
