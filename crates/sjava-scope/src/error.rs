use thiserror::Error;
use miette::Diagnostic;

/// Convenience alias used by every fallible operation in this crate.
pub type Result<T, E = ValidationError> = std::result::Result<T, E>;

/// What kind of name a [`ValidationError::NameAlreadyExists`] refers to.
#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq)]
pub enum NameKind {
    Variable,
    Method,
    Parameter,
}

impl std::fmt::Display for NameKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            NameKind::Variable => write!(f, "variable"),
            NameKind::Method => write!(f, "method"),
            NameKind::Parameter => write!(f, "parameter"),
        }
    }
}

/// Semantic validation failures raised while resolving names against the scope tree.
///
/// None of these are recovered inside the crate: every operation hands the first
/// failure straight back to its caller, and the reporting layer decides what the
/// user sees.
#[derive(Debug, Error, Diagnostic, Clone, Hash, PartialEq, Eq)]
pub enum ValidationError {
    /// A variable, parameter or method name is declared twice where it must be unique.
    #[error("Name already exists: {what} `{name}` is already declared in this scope")]
    #[diagnostic(code(sjava_scope::name_already_exists))]
    NameAlreadyExists {
        /// The duplicated name.
        name: String,
        /// Which namespace the collision happened in.
        what: NameKind,
    },

    /// A referenced variable or method is not visible from the current scope.
    #[error("Name not found: could not find `{name}` in the current scope or any enclosing scope")]
    #[diagnostic(
        code(sjava_scope::name_not_found),
        help("declare the variable before referring to it")
    )]
    NameNotFound {
        /// The name that could not be resolved.
        name: String,
    },

    /// An assignment targets a variable declared `final`.
    #[error("Finality violation: `{name}` is final and cannot be assigned a new value")]
    #[diagnostic(code(sjava_scope::finality_violation))]
    FinalityViolation {
        /// The final variable.
        name: String,
    },

    /// A variable is read before any assignment to it was validated.
    #[error("Uninitialized read: `{name}` is used before it was assigned a value")]
    #[diagnostic(
        code(sjava_scope::uninitialized_read),
        help("assign a value to the variable before reading it")
    )]
    UninitializedRead {
        /// The uninitialized variable.
        name: String,
    },

    /// A method or parameter name does not form a legal identifier.
    #[error("Invalid name: `{name}` is not a legal identifier")]
    #[diagnostic(code(sjava_scope::invalid_name))]
    InvalidName {
        /// The rejected name.
        name: String,
    },

    /// A method's formal parameter list could not be parsed.
    #[error("Malformed parameters `{parameters}`: {reason}")]
    #[diagnostic(code(sjava_scope::malformed_parameters))]
    MalformedParameters {
        /// The raw parameter string handed over by the front end.
        parameters: String,
        /// What is wrong with it.
        reason: String,
    },

    /// An `if`/`while` condition could not be parsed into operands.
    #[error("Malformed condition `{condition}`: {reason}")]
    #[diagnostic(code(sjava_scope::malformed_condition))]
    MalformedCondition {
        /// The raw condition string.
        condition: String,
        /// What is wrong with it.
        reason: String,
    },

    /// A value of one type is used where another type is required.
    #[error("Type mismatch: expected `{expected}`, found `{found}` in {context}")]
    #[diagnostic(code(sjava_scope::type_mismatch))]
    TypeMismatch {
        /// The type (or types) the context accepts.
        expected: String,
        /// The type actually found.
        found: String,
        /// Where the mismatch occurred.
        context: String,
    },

    /// The caller handed the resolver an inconsistent scope tree
    /// (closed scope id, wrong node kind, cyclic parent).
    #[error("Internal resolver error: {message}")]
    #[diagnostic(code(sjava_scope::internal_error))]
    Internal {
        /// The detailed error message.
        message: String,
    },
}

impl ValidationError {
    pub(crate) fn internal(message: impl Into<String>) -> Self {
        ValidationError::Internal { message: message.into() }
    }

    pub(crate) fn not_found(name: &str) -> Self {
        ValidationError::NameNotFound { name: name.to_string() }
    }

    pub(crate) fn already_exists(name: &str, what: NameKind) -> Self {
        ValidationError::NameAlreadyExists { name: name.to_string(), what }
    }
}

/// Errors raised while loading a [`crate::config::ResolverConfig`].
#[derive(Debug, Error, Diagnostic)]
pub enum ConfigError {
    #[error("Failed to read config file {path}")]
    #[diagnostic(code(sjava_scope::config::io_error))]
    Io {
        path: std::path::PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config: {0}")]
    #[diagnostic(code(sjava_scope::config::parse_error))]
    Parse(#[from] toml::de::Error),

    #[error("Invalid config: {message}")]
    #[diagnostic(code(sjava_scope::config::invalid))]
    Invalid {
        message: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use expect_test::expect;

    #[test]
    fn test_messages_name_the_offending_symbol() {
        let err = ValidationError::already_exists("count", NameKind::Variable);
        expect![["Name already exists: variable `count` is already declared in this scope"]]
            .assert_eq(&err.to_string());

        let err = ValidationError::FinalityViolation { name: "LIMIT".to_string() };
        expect![["Finality violation: `LIMIT` is final and cannot be assigned a new value"]]
            .assert_eq(&err.to_string());

        let err = ValidationError::not_found("ghost");
        expect![["Name not found: could not find `ghost` in the current scope or any enclosing scope"]]
            .assert_eq(&err.to_string());
    }

    #[test]
    fn test_distinct_kinds_are_not_equal() {
        let uninit = ValidationError::UninitializedRead { name: "x".to_string() };
        let missing = ValidationError::not_found("x");
        assert_ne!(uninit, missing);
    }

    #[test]
    fn test_diagnostic_codes() {
        let err = ValidationError::UninitializedRead { name: "x".to_string() };
        let code = err.code().map(|c| c.to_string());
        assert_eq!(code.as_deref(), Some("sjava_scope::uninitialized_read"));
    }
}
