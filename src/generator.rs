use std::fmt;
use std::sync::Arc;

use crate::argument_key::ArgumentKey;
use crate::error::Result;
use crate::registry::TypeRegistry;
use crate::type_identity::TypeIdentity;

/// A handle bound to one compile-time type.
///
/// Resolving it asks a registry for the object exposing that type. The handle
/// only holds the identity, never the exposed object itself.
///
/// # Examples
///
/// ```
/// use sovran_typegen::{RegistryError, TypeGenerator, TypeRegistry};
///
/// # fn main() -> Result<(), RegistryError> {
/// let registry = TypeRegistry::<&str>::new();
/// registry.expose::<f64>("double")?;
/// registry.finish()?;
///
/// let double = TypeGenerator::of::<f64>();
/// assert_eq!(double.resolve(&registry)?, "double");
/// assert_eq!(double.describe(), "Type generator for the type 'f64'");
///
/// let missing = TypeGenerator::of::<u128>();
/// assert!(matches!(
///     missing.resolve(&registry),
///     Err(RegistryError::UnknownType { .. })
/// ));
/// # Ok(())
/// # }
/// ```
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct TypeGenerator {
    identity: TypeIdentity,
}

impl TypeGenerator {
    /// Generator for type `T`
    pub fn of<T: ?Sized + 'static>() -> Self {
        Self::new(TypeIdentity::of::<T>())
    }

    pub fn new(identity: TypeIdentity) -> Self {
        Self { identity }
    }

    pub fn identity(&self) -> &TypeIdentity {
        &self.identity
    }

    /// The full compiler name of the type
    pub fn type_name(&self) -> &'static str {
        self.identity.raw_name()
    }

    /// Fetches the exposed object for this type
    ///
    /// # Errors
    ///
    /// Returns `RegistryError::UnknownType` if the type was never exposed.
    pub fn resolve<V>(&self, registry: &TypeRegistry<V>) -> Result<V>
    where
        V: Clone + Send + Sync,
    {
        registry.resolve_type(&self.identity)
    }

    pub fn describe(&self) -> String {
        format!(
            "Type generator for the type '{}'",
            self.identity.display_name()
        )
    }
}

impl From<TypeIdentity> for TypeGenerator {
    fn from(identity: TypeIdentity) -> Self {
        Self::new(identity)
    }
}

impl fmt::Debug for TypeGenerator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("TypeGenerator").field(&self.identity).finish()
    }
}

impl fmt::Display for TypeGenerator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.describe())
    }
}

/// A handle bound to one template name.
///
/// Resolution is two-stage: the argument generators form an [`ArgumentKey`]
/// that selects the concrete type among the template's instances, then that
/// type is resolved like a [`TypeGenerator`].
///
/// # Examples
///
/// ```
/// use sovran_typegen::{RegistryError, TemplateGenerator, TypeGenerator, TypeRegistry};
///
/// struct PairIntDouble;
///
/// # fn main() -> Result<(), RegistryError> {
/// let registry = TypeRegistry::<u32>::new();
/// registry.expose_instance::<PairIntDouble, (i32, f64)>("pair", 7)?;
/// registry.finish()?;
///
/// let pair = TemplateGenerator::new("pair");
/// let int = TypeGenerator::of::<i32>();
/// let double = TypeGenerator::of::<f64>();
///
/// assert_eq!(pair.resolve(&registry, &[int.clone(), double.clone()])?, 7);
/// assert!(matches!(
///     pair.resolve(&registry, &[double, int]),
///     Err(RegistryError::UnknownInstance { .. })
/// ));
/// # Ok(())
/// # }
/// ```
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct TemplateGenerator {
    name: Arc<str>,
}

impl TemplateGenerator {
    pub fn new(name: impl Into<Arc<str>>) -> Self {
        Self { name: name.into() }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Stage one only: the generator for the concrete instantiation
    ///
    /// # Errors
    ///
    /// - Returns `RegistryError::UnknownTemplate` if the template has no instances
    /// - Returns `RegistryError::UnknownInstance` if `args` matches none of them
    pub fn instance<V>(
        &self,
        registry: &TypeRegistry<V>,
        args: &[TypeGenerator],
    ) -> Result<TypeGenerator>
    where
        V: Clone + Send + Sync,
    {
        let key = ArgumentKey::from_generators(args);
        registry
            .resolve_instance(&self.name, &key)
            .map(TypeGenerator::new)
    }

    /// Fetches the exposed object for the template applied to `args`
    ///
    /// # Errors
    ///
    /// - Returns `RegistryError::UnknownTemplate` if the template has no instances
    /// - Returns `RegistryError::UnknownInstance` if `args` matches none of them
    /// - Returns `RegistryError::InternalInconsistency` if the instance exists
    ///   but its concrete type was never exposed
    pub fn resolve<V>(&self, registry: &TypeRegistry<V>, args: &[TypeGenerator]) -> Result<V>
    where
        V: Clone + Send + Sync,
    {
        let key = ArgumentKey::from_generators(args);
        registry.resolve_template(&self.name, &key)
    }

    /// Single-argument form of [`resolve`](Self::resolve)
    pub fn index<V>(&self, registry: &TypeRegistry<V>, arg: &TypeGenerator) -> Result<V>
    where
        V: Clone + Send + Sync,
    {
        self.resolve(registry, std::slice::from_ref(arg))
    }

    pub fn describe(&self) -> String {
        format!("Template generator for the template '{}'", self.name)
    }
}

impl fmt::Debug for TemplateGenerator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("TemplateGenerator").field(&self.name).finish()
    }
}

impl fmt::Display for TemplateGenerator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.describe())
    }
}
