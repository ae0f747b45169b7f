use rustc_hash::FxHashMap;

use crate::argument_key::ArgumentKey;
use crate::error::{RegistryError, Result};
use crate::type_identity::TypeIdentity;

/// Records which instantiations of which generic templates exist.
///
/// Two levels: template name, then argument key, then the identity of the
/// concrete type. The inner map for a name is created on first registration,
/// so a name is "known" exactly when it has at least one instance.
#[derive(Debug, Clone, Default)]
pub struct TemplateInstanceMap {
    templates: FxHashMap<String, FxHashMap<ArgumentKey, TypeIdentity>>,
}

impl TemplateInstanceMap {
    /// Creates a new, empty map
    pub fn new() -> Self {
        Self::default()
    }

    /// Records that `template` applied to `args` is the type `identity`
    ///
    /// # Errors
    ///
    /// Returns `RegistryError::DuplicateInstance` if `(template, args)` is
    /// already registered. Nothing is changed in that case.
    pub fn register(
        &mut self,
        template: &str,
        args: ArgumentKey,
        identity: TypeIdentity,
    ) -> Result<()> {
        let instances = self.templates.entry(template.to_string()).or_default();
        if instances.contains_key(&args) {
            return Err(RegistryError::DuplicateInstance {
                template: template.to_string(),
                args: args.to_string(),
            });
        }
        instances.insert(args, identity);
        Ok(())
    }

    /// Finds the concrete type for `template` applied to `args`
    ///
    /// # Errors
    ///
    /// - Returns `RegistryError::UnknownTemplate` if no instance of `template` exists
    /// - Returns `RegistryError::UnknownInstance` if the template exists but not with `args`
    pub fn resolve(&self, template: &str, args: &ArgumentKey) -> Result<&TypeIdentity> {
        let instances = self
            .templates
            .get(template)
            .ok_or_else(|| RegistryError::UnknownTemplate {
                template: template.to_string(),
            })?;

        instances
            .get(args)
            .ok_or_else(|| RegistryError::UnknownInstance {
                template: template.to_string(),
                args: args.to_string(),
            })
    }

    pub fn contains_template(&self, template: &str) -> bool {
        self.templates.contains_key(template)
    }

    /// Names of all templates with at least one instance
    pub fn templates(&self) -> Vec<String> {
        self.templates.keys().cloned().collect()
    }

    /// Argument keys registered for `template`; empty if the name is unknown
    pub fn instances(&self, template: &str) -> Vec<ArgumentKey> {
        self.templates
            .get(template)
            .map(|instances| instances.keys().cloned().collect())
            .unwrap_or_default()
    }

    /// Total number of instances across all templates
    pub fn len(&self) -> usize {
        self.templates.values().map(|instances| instances.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }

    pub fn clear(&mut self) {
        self.templates.clear();
    }
}
