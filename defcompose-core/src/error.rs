//! Error types for definition composition

use thiserror::Error;

/// Main error type for definition composition and registration
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DefinitionError {
    /// A directive derives, directly or transitively, from a component
    #[error(
        "Directives cannot inherit Components. Directive {directive} is attempting to extend component {component}"
    )]
    DirectiveExtendsComponent {
        /// Name of the directive being composed
        directive: String,
        /// Name of the component found in its ownership chain
        component: String,
    },

    /// A record that was already composed was handed to the composer again
    #[error("Definition for {0} has already been composed")]
    AlreadyComposed(String),

    /// A class with this name is already registered
    #[error("Class '{0}' is already defined")]
    DuplicateClass(String),

    /// A class lookup failed
    #[error("Class '{name}' not found{}", context_suffix(.context))]
    UnknownClass {
        /// Name that was looked up
        name: String,
        /// Where the lookup happened, if known
        context: Option<String>,
    },

    /// Configuration errors
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// Serialization errors
    #[error("Serialization error: {0}")]
    SerializationError(String),
}

fn context_suffix(context: &Option<String>) -> String {
    context
        .as_deref()
        .map(|c| format!(" ({c})"))
        .unwrap_or_default()
}

/// Result type alias for definition operations
pub type Result<T> = std::result::Result<T, DefinitionError>;

impl DefinitionError {
    /// Create a structural incompatibility error
    #[must_use]
    pub fn directive_extends_component(
        directive: impl Into<String>,
        component: impl Into<String>,
    ) -> Self {
        Self::DirectiveExtendsComponent {
            directive: directive.into(),
            component: component.into(),
        }
    }

    /// Create an unknown class error
    #[must_use]
    pub fn unknown_class(name: impl Into<String>) -> Self {
        Self::UnknownClass {
            name: name.into(),
            context: None,
        }
    }

    /// Create an unknown class error with the lookup context
    #[must_use]
    pub fn unknown_class_in(name: impl Into<String>, context: impl Into<String>) -> Self {
        Self::UnknownClass {
            name: name.into(),
            context: Some(context.into()),
        }
    }

    /// Create a configuration error
    #[must_use]
    pub fn config(message: impl Into<String>) -> Self {
        Self::ConfigError(message.into())
    }

    /// Whether this error reports a broken inheritance structure
    #[must_use]
    pub fn is_structural(&self) -> bool {
        matches!(self, Self::DirectiveExtendsComponent { .. })
    }
}

impl From<serde_json::Error> for DefinitionError {
    fn from(err: serde_json::Error) -> Self {
        Self::SerializationError(err.to_string())
    }
}

impl From<serde_yaml::Error> for DefinitionError {
    fn from(err: serde_yaml::Error) -> Self {
        Self::SerializationError(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_structural_error_message() {
        let err = DefinitionError::directive_extends_component("SubDirective", "SuperComponent");
        assert!(err.is_structural());
        assert_eq!(
            err.to_string(),
            "Directives cannot inherit Components. Directive SubDirective is attempting to extend component SuperComponent"
        );
    }

    #[test]
    fn test_unknown_class_display() {
        let err = DefinitionError::unknown_class("Missing");
        assert_eq!(err.to_string(), "Class 'Missing' not found");

        let err = DefinitionError::unknown_class_in("Missing", "parent of Child");
        assert_eq!(err.to_string(), "Class 'Missing' not found (parent of Child)");
        assert!(!err.is_structural());
    }

    #[test]
    fn test_error_conversions() {
        let json_err = serde_json::from_str::<serde_json::Value>("invalid").unwrap_err();
        let err: DefinitionError = json_err.into();
        assert!(matches!(err, DefinitionError::SerializationError(_)));
    }
}
