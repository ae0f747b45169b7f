use std::fmt;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::argument_key::{ArgumentKey, TypeList};
use crate::error::{RegistryError, Result};
use crate::exposed::ExposedTypeMap;
use crate::generator::{TemplateGenerator, TypeGenerator};
use crate::namespace::{Generator, TypeNamespace};
use crate::template_map::TemplateInstanceMap;
use crate::type_identity::{demangle, Demangler, TypeIdentity};

/// Lifecycle of a registry.
///
/// `Uninitialized → Populating → Ready → TornDown`. Registration is only
/// accepted while populating (and, when enabled, late while ready).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Phase {
    Uninitialized,
    Populating,
    Ready,
    TornDown,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Phase::Uninitialized => "uninitialized",
            Phase::Populating => "populating",
            Phase::Ready => "ready",
            Phase::TornDown => "torn down",
        })
    }
}

/// Settings for a [`TypeRegistry`]
#[derive(Debug, Clone, Copy)]
pub struct RegistryConfig {
    /// Accept registrations once the registry is ready (plugin-style exposition).
    /// Duplicates are still rejected.
    pub allow_late_registration: bool,
    /// Renders type names in generators and error messages
    pub demangler: Demangler,
}

impl RegistryConfig {
    pub fn with_late_registration(mut self, allow: bool) -> Self {
        self.allow_late_registration = allow;
        self
    }

    pub fn with_demangler(mut self, demangler: Demangler) -> Self {
        self.demangler = demangler;
        self
    }
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            allow_late_registration: false,
            demangler: demangle::short_paths,
        }
    }
}

struct RegistryState<V> {
    phase: Phase,
    exposed: ExposedTypeMap<V>,
    templates: TemplateInstanceMap,
    namespace: TypeNamespace,
}

/// The registry of exposed types and template instances.
///
/// One registry owns an exposed-type map (type identity → exposed object of
/// type `V`), a template instance map (template name + argument key → type
/// identity) and the namespace of named generators. Clones share the same
/// state, so the registry can be handed to bootstrap code and then to any
/// number of readers.
///
/// # Thread Safety
///
/// State sits behind an `Arc<RwLock<_>>`. Registration takes the write lock
/// and is expected to happen from a single initialization routine; queries
/// take the read lock and may run concurrently from many threads once the
/// registry is ready.
///
/// # Examples
///
/// ```
/// use sovran_typegen::{RegistryConfig, RegistryError, TypeRegistry};
///
/// struct Polynomial<K, C>(K, C);
///
/// # fn main() -> Result<(), RegistryError> {
/// let registry = TypeRegistry::<&str>::bootstrap(RegistryConfig::default(), |r| {
///     r.expose::<i64>("integer")?;
///     r.expose::<f64>("double")?;
///     r.expose_instance::<Polynomial<u32, f64>, (u32, f64)>("polynomial", "poly_u32_f64")?;
///     Ok(())
/// })?;
///
/// let double = registry.type_generator::<f64>();
/// assert_eq!(double.resolve(&registry)?, "double");
///
/// let polynomial = registry.template_generator("polynomial");
/// let exposed = polynomial.resolve(
///     &registry,
///     &[registry.type_generator::<u32>(), registry.type_generator::<f64>()],
/// )?;
/// assert_eq!(exposed, "poly_u32_f64");
///
/// registry.teardown()?;
/// assert!(matches!(
///     double.resolve(&registry),
///     Err(RegistryError::UnknownType { .. })
/// ));
/// # Ok(())
/// # }
/// ```
pub struct TypeRegistry<V> {
    config: RegistryConfig,
    state: Arc<RwLock<RegistryState<V>>>,
}

impl<V> TypeRegistry<V>
where
    V: Clone + Send + Sync,
{
    /// Creates a new, empty registry with the default configuration
    pub fn new() -> Self {
        Self::with_config(RegistryConfig::default())
    }

    pub fn with_config(config: RegistryConfig) -> Self {
        Self {
            config,
            state: Arc::new(RwLock::new(RegistryState {
                phase: Phase::Uninitialized,
                exposed: ExposedTypeMap::new(),
                templates: TemplateInstanceMap::new(),
                namespace: TypeNamespace::new(),
            })),
        }
    }

    /// Builds a ready registry by running `populate` against a fresh one.
    ///
    /// If `populate` fails, the partially populated registry is torn down and
    /// the error is returned; no half-built registry escapes.
    pub fn bootstrap<F>(config: RegistryConfig, populate: F) -> Result<Self>
    where
        F: FnOnce(&Self) -> Result<()>,
    {
        let registry = Self::with_config(config);
        if let Err(err) = populate(&registry) {
            registry.teardown()?;
            return Err(err);
        }
        registry.finish()?;
        Ok(registry)
    }

    pub fn config(&self) -> &RegistryConfig {
        &self.config
    }

    pub fn phase(&self) -> Result<Phase> {
        Ok(self.read()?.phase)
    }

    /// Identity of `T`, rendered with this registry's demangler
    pub fn identity_of<T: ?Sized + 'static>(&self) -> TypeIdentity {
        TypeIdentity::with_demangler::<T>(self.config.demangler)
    }

    pub fn type_generator<T: ?Sized + 'static>(&self) -> TypeGenerator {
        TypeGenerator::new(self.identity_of::<T>())
    }

    pub fn template_generator(&self, name: &str) -> TemplateGenerator {
        TemplateGenerator::new(name)
    }

    // ==========================================================================
    // Registration
    // ==========================================================================

    /// Stores the exposed object for `identity`
    ///
    /// # Errors
    ///
    /// - Returns `RegistryError::RegistrationClosed` outside the populating window
    /// - Returns `RegistryError::DuplicateRegistration` if the identity is already exposed
    /// - Returns `RegistryError::LockError` if the lock is poisoned
    pub fn register_type(&self, identity: TypeIdentity, value: V) -> Result<()> {
        let mut state = self.write()?;
        self.open_for_registration(&mut state)?;
        state.exposed.register(identity.clone(), value)?;
        log::trace!("exposed type '{}'", identity);
        Ok(())
    }

    /// Records that `template` applied to `args` is the type `identity`
    ///
    /// # Errors
    ///
    /// - Returns `RegistryError::RegistrationClosed` outside the populating window
    /// - Returns `RegistryError::DuplicateInstance` if `(template, args)` is already known
    /// - Returns `RegistryError::LockError` if the lock is poisoned
    pub fn register_instance(
        &self,
        template: &str,
        args: ArgumentKey,
        identity: TypeIdentity,
    ) -> Result<()> {
        let mut state = self.write()?;
        self.open_for_registration(&mut state)?;
        state
            .templates
            .register(template, args.clone(), identity.clone())?;
        log::trace!("instance '{}' {} -> '{}'", template, args, identity);
        Ok(())
    }

    /// Exposes type `T` with `value` and returns its generator
    pub fn expose<T: ?Sized + 'static>(&self, value: V) -> Result<TypeGenerator> {
        let identity = self.identity_of::<T>();
        self.register_type(identity.clone(), value)?;
        Ok(TypeGenerator::new(identity))
    }

    /// Exposes `T` as the instance of `template` over the types in `Args`.
    ///
    /// Both registrations happen under one lock: either both succeed or
    /// neither is recorded.
    ///
    /// # Errors
    ///
    /// Same as [`register_type`](Self::register_type) and
    /// [`register_instance`](Self::register_instance).
    pub fn expose_instance<T, Args>(&self, template: &str, value: V) -> Result<TypeGenerator>
    where
        T: ?Sized + 'static,
        Args: TypeList,
    {
        let identity = self.identity_of::<T>();
        let args = ArgumentKey::of_with::<Args>(self.config.demangler);

        let mut state = self.write()?;
        self.open_for_registration(&mut state)?;
        if state.exposed.contains(&identity) {
            return Err(RegistryError::DuplicateRegistration {
                type_name: identity.display_name().to_string(),
            });
        }
        state
            .templates
            .register(template, args.clone(), identity.clone())?;
        state.exposed.register(identity.clone(), value)?;
        log::trace!("exposed instance '{}' {} as '{}'", template, args, identity);
        Ok(TypeGenerator::new(identity))
    }

    /// Publishes `generator` under `name` in the namespace
    ///
    /// # Errors
    ///
    /// - Returns `RegistryError::RegistrationClosed` outside the populating window
    /// - Returns `RegistryError::DuplicateAttribute` if the name is taken
    pub fn define(&self, name: &str, generator: impl Into<Generator>) -> Result<()> {
        let mut state = self.write()?;
        self.open_for_registration(&mut state)?;
        state.namespace.define(name, generator)
    }

    /// Publishes the generator for `T` under `name`
    pub fn define_type<T: ?Sized + 'static>(&self, name: &str) -> Result<TypeGenerator> {
        let generator = self.type_generator::<T>();
        self.define(name, generator.clone())?;
        Ok(generator)
    }

    /// Publishes the generator for `template` under the same name
    pub fn define_template(&self, template: &str) -> Result<TemplateGenerator> {
        let generator = self.template_generator(template);
        self.define(template, generator.clone())?;
        Ok(generator)
    }

    /// Ends population. Idempotent once ready; a torn down registry stays torn down.
    pub fn finish(&self) -> Result<()> {
        let mut state = self.write()?;
        if matches!(state.phase, Phase::Uninitialized | Phase::Populating) {
            state.phase = Phase::Ready;
            log::debug!(
                "registry ready: {} exposed types, {} template instances, {} attributes",
                state.exposed.len(),
                state.templates.len(),
                state.namespace.len()
            );
        }
        Ok(())
    }

    /// Clears every map and moves the registry to `TornDown`.
    ///
    /// Queries afterwards fail with the ordinary unknown-type and
    /// unknown-template errors. Calling it again does nothing.
    pub fn teardown(&self) -> Result<()> {
        let mut state = self.write()?;
        if state.phase == Phase::TornDown {
            return Ok(());
        }
        log::debug!(
            "tearing down registry: {} exposed types, {} template instances",
            state.exposed.len(),
            state.templates.len()
        );
        state.exposed.clear();
        state.templates.clear();
        state.namespace.clear();
        state.phase = Phase::TornDown;
        Ok(())
    }

    // ==========================================================================
    // Queries
    // ==========================================================================

    /// Retrieves a clone of the exposed object for `identity`
    ///
    /// # Errors
    ///
    /// - Returns `RegistryError::UnknownType` if the identity was never exposed
    /// - Returns `RegistryError::LockError` if the lock is poisoned
    pub fn resolve_type(&self, identity: &TypeIdentity) -> Result<V> {
        self.read()?.exposed.resolve(identity).cloned()
    }

    /// Runs `f` against the exposed object for `identity` without cloning it
    pub fn with_type<F, R>(&self, identity: &TypeIdentity, f: F) -> Result<R>
    where
        F: FnOnce(&V) -> R,
    {
        let state = self.read()?;
        let value = state.exposed.resolve(identity)?;
        Ok(f(value))
    }

    /// Stage one of template resolution: the concrete type's identity
    ///
    /// # Errors
    ///
    /// - Returns `RegistryError::UnknownTemplate` if the template has no instances
    /// - Returns `RegistryError::UnknownInstance` if `args` matches none of them
    pub fn resolve_instance(&self, template: &str, args: &ArgumentKey) -> Result<TypeIdentity> {
        self.read()?.templates.resolve(template, args).cloned()
    }

    /// Both stages of template resolution
    ///
    /// # Errors
    ///
    /// - Returns `RegistryError::UnknownTemplate` / `RegistryError::UnknownInstance`
    ///   from stage one unchanged
    /// - Returns `RegistryError::InternalInconsistency` if the instance's type
    ///   has no exposed object
    pub fn resolve_template(&self, template: &str, args: &ArgumentKey) -> Result<V> {
        let state = self.read()?;
        let identity = state.templates.resolve(template, args)?;
        state
            .exposed
            .resolve(identity)
            .cloned()
            .map_err(|_| RegistryError::InternalInconsistency {
                template: template.to_string(),
                args: args.to_string(),
                type_name: identity.display_name().to_string(),
            })
    }

    /// Looks up a published generator by name
    pub fn attribute(&self, name: &str) -> Result<Generator> {
        self.read()?.namespace.get(name).cloned()
    }

    /// Names published in the namespace, in definition order
    pub fn attribute_names(&self) -> Result<Vec<String>> {
        Ok(self.read()?.namespace.names())
    }

    pub fn templates(&self) -> Result<Vec<String>> {
        Ok(self.read()?.templates.templates())
    }

    pub fn instances(&self, template: &str) -> Result<Vec<ArgumentKey>> {
        Ok(self.read()?.templates.instances(template))
    }

    pub fn exposed_len(&self) -> Result<usize> {
        Ok(self.read()?.exposed.len())
    }

    pub fn instance_len(&self) -> Result<usize> {
        Ok(self.read()?.templates.len())
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, RegistryState<V>>> {
        self.state.read().map_err(|_| RegistryError::LockError)
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, RegistryState<V>>> {
        self.state.write().map_err(|_| RegistryError::LockError)
    }

    fn open_for_registration(&self, state: &mut RegistryState<V>) -> Result<()> {
        match state.phase {
            Phase::Uninitialized => {
                log::debug!("registry populating");
                state.phase = Phase::Populating;
                Ok(())
            }
            Phase::Populating => Ok(()),
            Phase::Ready if self.config.allow_late_registration => Ok(()),
            phase => Err(RegistryError::RegistrationClosed { phase }),
        }
    }
}

impl<V> Clone for TypeRegistry<V> {
    fn clone(&self) -> Self {
        Self {
            config: self.config,
            state: Arc::clone(&self.state),
        }
    }
}

impl<V> Default for TypeRegistry<V>
where
    V: Clone + Send + Sync,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<V> fmt::Debug for TypeRegistry<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut s = f.debug_struct("TypeRegistry");
        s.field("config", &self.config);
        match self.state.read() {
            Ok(state) => s
                .field("phase", &state.phase)
                .field("exposed", &state.exposed.len())
                .field("instances", &state.templates.len())
                .finish(),
            Err(_) => s.field("state", &"<poisoned>").finish(),
        }
    }
}
