use indexmap::IndexMap;

use crate::error::{RegistryError, Result};
use crate::generator::{TemplateGenerator, TypeGenerator};

/// A generator published under a name
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Generator {
    Type(TypeGenerator),
    Template(TemplateGenerator),
}

impl Generator {
    pub fn describe(&self) -> String {
        match self {
            Generator::Type(g) => g.describe(),
            Generator::Template(g) => g.describe(),
        }
    }
}

impl From<TypeGenerator> for Generator {
    fn from(generator: TypeGenerator) -> Self {
        Generator::Type(generator)
    }
}

impl From<TemplateGenerator> for Generator {
    fn from(generator: TemplateGenerator) -> Self {
        Generator::Template(generator)
    }
}

/// Named attributes through which a caller reaches generators, e.g.
/// `double`, `integer` or `polynomial`. Names keep their definition order.
#[derive(Debug, Clone, Default)]
pub struct TypeNamespace {
    attributes: IndexMap<String, Generator>,
}

impl TypeNamespace {
    pub fn new() -> Self {
        Self::default()
    }

    /// Publishes `generator` under `name`
    ///
    /// # Errors
    ///
    /// Returns `RegistryError::DuplicateAttribute` if the name is taken.
    pub fn define(&mut self, name: &str, generator: impl Into<Generator>) -> Result<()> {
        if let Some(existing) = self.attributes.get(name) {
            return Err(RegistryError::DuplicateAttribute {
                name: name.to_string(),
                existing: existing.describe(),
            });
        }
        self.attributes.insert(name.to_string(), generator.into());
        Ok(())
    }

    /// # Errors
    ///
    /// Returns `RegistryError::UnknownAttribute` if nothing is published under `name`.
    pub fn get(&self, name: &str) -> Result<&Generator> {
        self.attributes
            .get(name)
            .ok_or_else(|| RegistryError::UnknownAttribute {
                name: name.to_string(),
            })
    }

    pub fn type_generator(&self, name: &str) -> Result<&TypeGenerator> {
        match self.get(name)? {
            Generator::Type(g) => Ok(g),
            Generator::Template(_) => Err(RegistryError::NotA {
                name: name.to_string(),
                expected: "type generator",
            }),
        }
    }

    pub fn template_generator(&self, name: &str) -> Result<&TemplateGenerator> {
        match self.get(name)? {
            Generator::Template(g) => Ok(g),
            Generator::Type(_) => Err(RegistryError::NotA {
                name: name.to_string(),
                expected: "template generator",
            }),
        }
    }

    /// Attribute names in definition order
    pub fn names(&self) -> Vec<String> {
        self.attributes.keys().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.attributes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.attributes.is_empty()
    }

    pub fn clear(&mut self) {
        self.attributes.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn define_and_look_up() -> Result<()> {
        let mut ns = TypeNamespace::new();
        ns.define("double", TypeGenerator::of::<f64>())?;
        ns.define("polynomial", TemplateGenerator::new("polynomial"))?;

        assert_eq!(ns.type_generator("double")?, &TypeGenerator::of::<f64>());
        assert_eq!(ns.template_generator("polynomial")?.name(), "polynomial");
        assert_eq!(ns.names(), vec!["double".to_string(), "polynomial".to_string()]);
        Ok(())
    }

    #[test]
    fn redefinition_is_rejected() -> Result<()> {
        let mut ns = TypeNamespace::new();
        ns.define("integer", TypeGenerator::of::<i64>())?;

        let err = ns.define("integer", TypeGenerator::of::<i32>()).unwrap_err();
        assert_eq!(
            err,
            RegistryError::DuplicateAttribute {
                name: "integer".to_string(),
                existing: "Type generator for the type 'i64'".to_string(),
            }
        );
        assert_eq!(ns.type_generator("integer")?, &TypeGenerator::of::<i64>());
        Ok(())
    }

    #[test]
    fn wrong_kind_and_missing_names() -> Result<()> {
        let mut ns = TypeNamespace::new();
        ns.define("double", TypeGenerator::of::<f64>())?;

        assert!(matches!(
            ns.template_generator("double"),
            Err(RegistryError::NotA { expected: "template generator", .. })
        ));
        assert!(matches!(
            ns.get("real128"),
            Err(RegistryError::UnknownAttribute { .. })
        ));

        ns.clear();
        assert!(ns.is_empty());
        Ok(())
    }
}
