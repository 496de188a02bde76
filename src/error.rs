//! Error types for assembly and wiring

use thiserror::Error;

/// Errors raised while assembling a container or wiring a factory-made instance
#[derive(Error, Debug, Clone)]
pub enum WiringError {
    /// A factory's product type is still a type variable after walking its
    /// supertypes, e.g. a generic factory base registered directly
    #[error(
        "Cannot resolve the product type of factory {factory}: type parameter `{variable}` is never bound to a concrete type"
    )]
    TypeResolution { factory: String, variable: String },

    /// The name derived for a synthesized product definition is already taken
    #[error(
        "Cannot register a prototype definition named `{name}` for the products of factory `{factory}`: a definition with this name already exists"
    )]
    DuplicateDefinition { name: String, factory: String },

    /// An explicit registration reused a component name
    #[error("Component already registered: {name}")]
    AlreadyRegistered { name: String },

    /// A class name could not be found in the type catalog
    #[error("Class not found in the type catalog: {class_name}")]
    ClassResolution { class_name: String },

    /// Injecting into an already-constructed instance failed
    #[error("Failed to wire an instance of {target}: {source}")]
    Injection {
        target: &'static str,
        #[source]
        source: Box<WiringError>,
    },

    /// No definition is registered under the name
    #[error("No component named `{name}`")]
    NotFound { name: String },

    /// No definition produces the requested type
    #[error("No component of type {type_name}")]
    NotFoundByType { type_name: &'static str },

    /// Several definitions produce the requested type
    #[error("Expected a single component of type {type_name} but found {candidates:?}")]
    Ambiguous {
        type_name: &'static str,
        candidates: Vec<String>,
    },

    /// A named definition produces a different type than requested
    #[error("Component `{name}` is a {actual}, not a {expected}")]
    TypeMismatch {
        name: String,
        expected: &'static str,
        actual: String,
    },

    /// A definition could not produce an instance
    #[error("Failed to create component `{name}`: {reason}")]
    CreationFailed { name: String, reason: String },

    /// An injection slot was read before the instance was wired
    #[error("Field `{field}` of {owner} has not been wired")]
    NotWired {
        owner: &'static str,
        field: &'static str,
    },

    /// The container behind a wiring bridge has been dropped
    #[error("The container has been dropped")]
    ContainerDropped,
}

impl WiringError {
    /// Create a NotFound error for a component name
    #[inline]
    pub fn not_found(name: impl Into<String>) -> Self {
        Self::NotFound { name: name.into() }
    }

    /// Create a NotFoundByType error for a type
    #[inline]
    pub fn not_found_by_type<T: 'static>() -> Self {
        Self::NotFoundByType {
            type_name: std::any::type_name::<T>(),
        }
    }

    /// Create a CreationFailed error
    #[inline]
    pub fn creation_failed(name: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::CreationFailed {
            name: name.into(),
            reason: reason.into(),
        }
    }

    /// Wrap a resolution failure as an injection failure for `T`
    #[inline]
    pub fn injection<T: 'static>(source: WiringError) -> Self {
        Self::Injection {
            target: std::any::type_name::<T>(),
            source: Box::new(source),
        }
    }

    /// Create a NotWired error
    #[inline]
    pub fn not_wired<T: 'static>(field: &'static str) -> Self {
        Self::NotWired {
            owner: std::any::type_name::<T>(),
            field,
        }
    }

    /// Whether this error is fatal when raised during assembly.
    ///
    /// Class resolution failures only mean "not a factory".
    #[inline]
    pub fn is_fatal_at_assembly(&self) -> bool {
        !matches!(self, Self::ClassResolution { .. })
    }

    /// Whether this error reports a missing component
    #[inline]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. } | Self::NotFoundByType { .. })
    }
}

/// Result type alias for assembly and wiring operations
pub type Result<T> = std::result::Result<T, WiringError>;
