use thiserror::Error;

use crate::registry::Phase;

/// Errors that can occur when populating or querying a `TypeRegistry`
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    /// The type was already registered in the exposed-type map
    #[error("the type '{type_name}' has already been registered")]
    DuplicateRegistration { type_name: String },

    /// The (template, arguments) pair was already registered
    #[error(
        "an instance of the template '{template}' has already been registered with arguments {args}"
    )]
    DuplicateInstance { template: String, args: String },

    /// The type was never registered in the exposed-type map
    #[error("the type '{type_name}' has not been registered")]
    UnknownType { type_name: String },

    /// No instance at all has been registered for this template name
    #[error("no instance of the template '{template}' has been registered")]
    UnknownTemplate { template: String },

    /// The template is known, but not with these arguments
    #[error("no instance of the template '{template}' has been registered with arguments {args}")]
    UnknownInstance { template: String, args: String },

    /// A template instance points to a type with no exposed entry.
    ///
    /// Both registrations are issued by the exposition layer for every
    /// instantiation, so this always indicates a bootstrap bug.
    #[error(
        "internal inconsistency: the instance of the template '{template}' with arguments {args} \
         resolves to the type '{type_name}', which has not been registered"
    )]
    InternalInconsistency {
        template: String,
        args: String,
        type_name: String,
    },

    /// A registration was attempted outside the populating window
    #[error("cannot register while the registry is {phase}")]
    RegistrationClosed { phase: Phase },

    /// The namespace already holds an attribute with this name
    #[error("an attribute called '{name}' already exists in the types namespace ({existing})")]
    DuplicateAttribute { name: String, existing: String },

    /// The namespace holds no attribute with this name
    #[error("the types namespace has no attribute called '{name}'")]
    UnknownAttribute { name: String },

    /// The attribute exists but is the wrong kind of generator
    #[error("the attribute '{name}' is not a {expected}")]
    NotA {
        name: String,
        expected: &'static str,
    },

    /// Failed to acquire the registry lock
    #[error("failed to acquire the registry lock")]
    LockError,
}

impl RegistryError {
    /// Errors raised while populating a registry. These are bootstrap bugs.
    pub fn is_registration_error(&self) -> bool {
        matches!(
            self,
            RegistryError::DuplicateRegistration { .. }
                | RegistryError::DuplicateInstance { .. }
                | RegistryError::DuplicateAttribute { .. }
                | RegistryError::RegistrationClosed { .. }
        )
    }

    /// Ordinary "not available in this build" failures a caller may recover from
    pub fn is_lookup_error(&self) -> bool {
        matches!(
            self,
            RegistryError::UnknownType { .. }
                | RegistryError::UnknownTemplate { .. }
                | RegistryError::UnknownInstance { .. }
                | RegistryError::UnknownAttribute { .. }
                | RegistryError::NotA { .. }
        )
    }
}

/// Result alias used throughout the crate
pub type Result<T> = std::result::Result<T, RegistryError>;

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn messages_carry_names_and_arguments() {
        let err = RegistryError::UnknownInstance {
            template: "polynomial".to_string(),
            args: "[f64, i64]".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "no instance of the template 'polynomial' has been registered with arguments [f64, i64]"
        );

        let err = RegistryError::UnknownType {
            type_name: "Rational".to_string(),
        };
        assert_eq!(err.to_string(), "the type 'Rational' has not been registered");
    }

    #[test]
    fn classification() {
        let dup = RegistryError::DuplicateRegistration {
            type_name: "f64".to_string(),
        };
        assert!(dup.is_registration_error());
        assert!(!dup.is_lookup_error());

        let unknown = RegistryError::UnknownTemplate {
            template: "pair".to_string(),
        };
        assert!(unknown.is_lookup_error());

        let broken = RegistryError::InternalInconsistency {
            template: "pair".to_string(),
            args: "[]".to_string(),
            type_name: "Pair".to_string(),
        };
        assert!(!broken.is_lookup_error());
        assert!(!broken.is_registration_error());
        assert!(!RegistryError::LockError.is_lookup_error());
    }
}
